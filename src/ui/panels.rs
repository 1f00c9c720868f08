use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Dimension;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// A selector interaction, applied once the panel is drawn.
enum FilterAction {
    Toggle(Dimension, String),
    All(Dimension),
    None(Dimension),
    Reset,
}

/// Render the left filter panel: one multi-select per sidebar dimension.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Please Filter Here:");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No data loaded.");
        return;
    };

    let mut actions = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::FILTERS {
                let options = table.distinct(dim);
                let selected = state.selection.get(&dim);

                // Show count of selected / total in the header
                let n_selected = selected.map_or(0, |s| s.len());
                let header_text = format!("{}  ({n_selected}/{})", dim.prompt(), options.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.column_name())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                actions.push(FilterAction::All(dim));
                            }
                            if ui.small_button("None").clicked() {
                                actions.push(FilterAction::None(dim));
                            }
                        });

                        for value in options {
                            let mut checked = selected.is_some_and(|s| s.contains(value));
                            if ui.checkbox(&mut checked, value.as_str()).changed() {
                                actions.push(FilterAction::Toggle(dim, value.clone()));
                            }
                        }
                    });
            }

            ui.separator();
            if ui.button("Reset filters").clicked() {
                actions.push(FilterAction::Reset);
            }
        });

    for action in actions {
        match action {
            FilterAction::Toggle(dim, value) => state.toggle_value(dim, &value),
            FilterAction::All(dim) => state.select_all(dim),
            FilterAction::None(dim) => state.select_none(dim),
            FilterAction::Reset => state.reset_selection(),
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} transactions loaded, {} selected",
                table.len(),
                state.visible_indices.len()
            ));
        } else {
            ui.label(state.config.source.path.display().to_string());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["xlsx", "xlsm", "csv", "json", "parquet", "pq"])
        .add_filter("Excel", &["xlsx", "xlsm"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(path);
    }
}
