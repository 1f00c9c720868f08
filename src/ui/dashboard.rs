use eframe::egui::{self, RichText, Ui};

use crate::state::AppState;
use crate::ui::{charts, map, metrics, table};

/// Hole of the gender donut, as a fraction of the outer radius.
const DONUT_HOLE: f64 = 0.3;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the whole dashboard from the current state.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ui.heading(RichText::new("📊 Sales Dashboard").size(28.0));
    ui.add_space(12.0);

    let (Some(table), Some(report)) = (&state.table, &state.report) else {
        let message = state
            .status_message
            .as_deref()
            .unwrap_or("Open a file to view sales  (File → Open…)");
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(message);
        });
        return;
    };

    metrics::metric_row(ui, &report.summary, &state.config.currency);
    ui.separator();

    egui::CollapsingHeader::new("See Data In Tabular Form")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            table::transactions_table(ui, table, &state.visible_indices);
        });

    ui.columns(2, |cols| {
        charts::hourly_bar_chart(&mut cols[0], "sales_by_hour", "Sales by hour", &report.sales_by_hour);
        charts::category_bar_chart(
            &mut cols[1],
            "sales_by_product_line",
            "Sales by Product Line",
            &report.sales_by_product_line,
        );
    });

    egui::CollapsingHeader::new("Sales Figures Based On Genders")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            charts::donut_chart(ui, "sales_by_gender", "Sales by Gender", &report.sales_by_gender, DONUT_HOLE);
        });

    egui::CollapsingHeader::new("Product Quantity Sales")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            charts::category_bar_chart(
                ui,
                "quantity_by_product_line",
                "Quantity by Product Line",
                &report.quantity_by_product_line,
            );
        });

    egui::CollapsingHeader::new("Payments Type Comparison")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            charts::category_bar_chart(ui, "sales_by_payment", "Sales by Payment Type", &report.sales_by_payment);
        });

    egui::CollapsingHeader::new("Gross Income By Product Type")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            charts::category_bar_chart(
                ui,
                "gross_income_by_product_line",
                "Gross Income by Product Line",
                &report.gross_income_by_product_line,
            );
        });

    egui::CollapsingHeader::new("Customers By Location")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            map::customer_map(ui, &state.map);
        });
}
