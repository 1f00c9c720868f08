use eframe::egui::{Stroke, Ui};
use egui_plot::{Legend, Plot, PlotPoints, Points, Polygon};

use crate::color::{density_color, SCATTER};
use crate::geo::MapLayers;

const MAP_HEIGHT: f32 = 420.0;

/// Hexagon density layer plus scatter layer, drawn in kilometres east/north
/// of the map centre with longitude/latitude tick labels.
pub fn customer_map(ui: &mut Ui, layers: &MapLayers) {
    let projection = layers.projection;
    let max_count = layers.max_count.max(1) as f64;

    Plot::new("customer_map")
        .height(MAP_HEIGHT)
        .data_aspect(1.0)
        .legend(Legend::default())
        .x_axis_formatter(move |mark, _range| {
            format!("{:.3}°", projection.unproject([mark.value * 1000.0, 0.0]).lon)
        })
        .y_axis_formatter(move |mark, _range| {
            format!("{:.3}°", projection.unproject([0.0, mark.value * 1000.0]).lat)
        })
        .x_axis_label("longitude")
        .y_axis_label("latitude")
        .show(ui, |plot_ui| {
            for bin in &layers.bins {
                let color = density_color(bin.count as f64 / max_count);
                let corners: Vec<[f64; 2]> = bin
                    .corners
                    .iter()
                    .map(|[x, y]| [x / 1000.0, y / 1000.0])
                    .collect();
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(corners))
                        .name("density")
                        .fill_color(color)
                        .stroke(Stroke::new(0.5, color)),
                );
            }

            let scatter: PlotPoints = layers
                .points
                .iter()
                .map(|[x, y]| [x / 1000.0, y / 1000.0])
                .collect();
            plot_ui.points(Points::new(scatter).name("customers").radius(1.5).color(SCATTER));
        });
}
