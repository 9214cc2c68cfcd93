use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Colours for the explained-variance chart
// ---------------------------------------------------------------------------

/// Hue of the first component's bar; later components fade toward `HUE_END`.
const HUE_START: f32 = 210.0;
const HUE_END: f32 = 330.0;

/// One colour per component. Leading components are more saturated so the
/// dominant ones stand out.
pub fn component_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
            let hue = HUE_START + t * (HUE_END - HUE_START);
            hsl_to_color32(Hsl::new(hue, 0.75 - 0.35 * t, 0.55))
        })
        .collect()
}

/// Colour of the cumulative-variance line drawn over the bars.
pub fn cumulative_color() -> Color32 {
    hsl_to_color32(Hsl::new(5.0, 0.8, 0.5))
}

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_one_colour_per_component() {
        assert!(component_palette(0).is_empty());
        assert_eq!(component_palette(1).len(), 1);

        let colours = component_palette(6);
        assert_eq!(colours.len(), 6);
        assert_ne!(colours[0], colours[5]);
    }
}
