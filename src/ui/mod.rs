/// egui rendering. Widgets read [`AppState`](crate::state::AppState) and
/// report clicks back as [`panels::UiAction`]; they never talk to the
/// analysis service themselves.

pub mod panels;
pub mod plot;
