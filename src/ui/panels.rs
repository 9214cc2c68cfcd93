use std::time::Duration;

use eframe::egui::{self, Align2, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

/// Request raised by a widget that the app forwards to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Analyze,
    Cancel,
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar. `busy` is the time the running analysis
/// has taken so far, if one is running.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, busy: Option<Duration>) -> Option<UiAction> {
    let mut action = None;
    // A pending notice blocks the controls until it is acknowledged.
    let accepts_input = state.accepts_input();

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui
                .add_enabled(accepts_input, egui::Button::new("Open CSV…"))
                .clicked()
            {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        // Disabled while a request is in flight.
        if ui
            .add_enabled(busy.is_none() && accepts_input, egui::Button::new("Analyze"))
            .clicked()
        {
            action = Some(UiAction::Analyze);
        }

        if let Some(elapsed) = busy {
            if ui.button("Cancel").clicked() {
                action = Some(UiAction::Cancel);
            }
            ui.spinner();
            ui.label(format!("Analyzing… {}s", elapsed.as_secs()));
        }

        ui.separator();

        match &state.selected_file {
            Some(file) => ui.label(format!("{} ({} bytes)", file.name, file.len())),
            None => ui.label("No file selected"),
        };

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    action
}

// ---------------------------------------------------------------------------
// Left side panel – file preview and variance summary
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Input");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            match &state.selected_file {
                None => {
                    ui.label("No file selected.");
                }
                Some(file) => {
                    ui.strong(&file.name);
                    ui.label(RichText::new(file.path.display().to_string()).small().weak());
                    if file.is_empty() {
                        ui.label(RichText::new("File is empty.").color(Color32::YELLOW));
                    }
                    match &state.preview {
                        Some(preview) => {
                            ui.label(format!(
                                "{} rows, {} variables",
                                preview.row_count,
                                preview.variable_count()
                            ));
                            egui::CollapsingHeader::new("Preview")
                                .default_open(true)
                                .show(ui, |ui: &mut Ui| {
                                    preview_grid(ui, &preview.headers, &preview.sample_rows);
                                });
                        }
                        None => {
                            ui.label("Not readable as CSV; the service will decide.");
                        }
                    }
                }
            }

            ui.add_space(8.0);
            ui.heading("Explained variance");
            ui.separator();

            if state.results_visible {
                for line in &state.variance_lines {
                    ui.label(line);
                }
            } else {
                ui.label("—");
            }
        });
}

fn preview_grid(ui: &mut Ui, headers: &[String], rows: &[Vec<String>]) {
    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        egui::Grid::new("csv_preview")
            .striped(true)
            .show(ui, |ui: &mut Ui| {
                for h in headers {
                    ui.strong(h);
                }
                ui.end_row();
                for row in rows {
                    for cell in row {
                        ui.label(cell);
                    }
                    ui.end_row();
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Alert window
// ---------------------------------------------------------------------------

/// Show the oldest pending notice until it is acknowledged.
pub fn alert_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(message) = state.alerts.first().cloned() else {
        return;
    };

    let mut acknowledged = false;
    egui::Window::new("Notice")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            ui.label(&message);
            ui.add_space(8.0);
            ui.vertical_centered(|ui: &mut Ui| {
                if ui.button("OK").clicked() {
                    acknowledged = true;
                }
            });
        });

    if acknowledged {
        state.dismiss_alert();
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Select a CSV file")
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        state.select_file(&path);
    }
}
