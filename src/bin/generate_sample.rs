use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// A measured variable driven by two hidden factors (size, shape) plus noise,
/// so the first two principal components carry most of the variance.
struct Variable {
    name: &'static str,
    base: f64,
    size_loading: f64,
    shape_loading: f64,
    noise: f64,
}

const VARIABLES: [Variable; 6] = [
    Variable { name: "length_cm", base: 42.0, size_loading: 6.0, shape_loading: 1.5, noise: 0.8 },
    Variable { name: "width_cm", base: 18.0, size_loading: 2.5, shape_loading: -1.8, noise: 0.5 },
    Variable { name: "height_cm", base: 25.0, size_loading: 3.2, shape_loading: 0.4, noise: 0.6 },
    Variable { name: "mass_kg", base: 3.4, size_loading: 0.9, shape_loading: -0.2, noise: 0.15 },
    Variable { name: "density", base: 1.05, size_loading: 0.01, shape_loading: 0.06, noise: 0.02 },
    Variable { name: "hardness", base: 55.0, size_loading: -1.0, shape_loading: 4.0, noise: 2.0 },
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let groups = [("Alpine", 0.8, -0.5), ("Coastal", -0.6, 0.9), ("Desert", 0.1, -1.1)];
    let per_group = 12;

    let output_path = "sample_pca.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let mut header = vec!["specimen"];
    header.extend(VARIABLES.iter().map(|v| v.name));
    writer.write_record(&header).context("writing header")?;

    let mut rows = 0;
    for (group, size_shift, shape_shift) in groups {
        for i in 0..per_group {
            let size = rng.gauss(size_shift, 1.0);
            let shape = rng.gauss(shape_shift, 0.7);

            let mut record = vec![format!("{group}_{:02}", i + 1)];
            for v in &VARIABLES {
                let value = v.base
                    + v.size_loading * size
                    + v.shape_loading * shape
                    + rng.gauss(0.0, v.noise);
                record.push(format!("{value:.3}"));
            }
            writer.write_record(&record).context("writing row")?;
            rows += 1;
        }
    }
    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {rows} specimens ({} variables each) to {output_path}",
        VARIABLES.len()
    );
    Ok(())
}
