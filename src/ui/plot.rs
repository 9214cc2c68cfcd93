use eframe::egui::{self, Ui};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints};

use crate::color::{component_palette, cumulative_color};
use crate::controller::PlotSlot;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Results (central panel)
// ---------------------------------------------------------------------------

/// Render the central panel: placeholder, spinner or the analysis results.
pub fn results_panel(ui: &mut Ui, state: &AppState) {
    if state.loading {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.spinner();
        });
        return;
    }

    if !state.results_visible {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV file and press Analyze  (File → Open CSV…)");
        });
        return;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let width = ui.available_width();
            let tile = (width / 3.0 - 8.0).max(160.0);

            ui.horizontal_wrapped(|ui: &mut Ui| {
                for slot in PlotSlot::ALL {
                    ui.vertical(|ui: &mut Ui| {
                        ui.strong(slot.title());
                        match state.plot_uri(slot) {
                            Some(uri) => {
                                ui.add(
                                    egui::Image::new(uri)
                                        .max_width(tile)
                                        .max_height(tile)
                                        .shrink_to_fit(),
                                );
                            }
                            None => {
                                ui.label("No image returned.");
                            }
                        }
                    });
                }
            });

            ui.add_space(12.0);
            ui.separator();
            variance_chart(ui, state);
        });
}

// ---------------------------------------------------------------------------
// Explained variance chart
// ---------------------------------------------------------------------------

/// Bars per component with the cumulative share drawn on top.
fn variance_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("Explained variance");

    if state.variance_bars.is_empty() {
        ui.label("No numeric variance values to chart.");
        return;
    }

    let colours = component_palette(state.variance_bars.len());
    let bars: Vec<Bar> = state
        .variance_bars
        .iter()
        .zip(colours)
        .enumerate()
        .map(|(i, (bar, colour))| {
            Bar::new((i + 1) as f64, bar.percent)
                .name(&bar.component)
                .fill(colour)
                .width(0.6)
        })
        .collect();

    let cumulative: PlotPoints = state
        .variance_bars
        .iter()
        .scan(0.0, |total, bar| {
            *total += bar.percent;
            Some(*total)
        })
        .enumerate()
        .map(|(i, total)| [(i + 1) as f64, total])
        .collect();

    Plot::new("variance_chart")
        .legend(egui_plot::Legend::default())
        .height(260.0)
        .x_axis_label("Principal component")
        .y_axis_label("Explained variance (%)")
        .include_y(0.0)
        .include_y(100.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Per component"));
            plot_ui.line(
                Line::new(cumulative)
                    .name("Cumulative")
                    .color(cumulative_color())
                    .width(1.5),
            );
        });
}
