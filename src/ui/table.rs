use eframe::egui::{Align, Layout, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{SalesTable, TABLE_COLUMNS};

/// Plain tabular view of the rows at `indices`.
pub fn transactions_table(ui: &mut Ui, table: &SalesTable, indices: &[usize]) {
    if indices.is_empty() {
        ui.label("No rows match the current selection.");
        return;
    }

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(60.0), TABLE_COLUMNS.len())
            .max_scroll_height(320.0)
            .header(20.0, |mut header| {
                for name in TABLE_COLUMNS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, indices.len(), |mut row| {
                    let tx = &table.rows[indices[row.index()]];
                    for cell in tx.display_cells() {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}
