use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, Polygon, Text,
};

use crate::color::{generate_palette, ACCENT};

const CHART_HEIGHT: f32 = 280.0;

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong().size(16.0));
}

fn no_data(ui: &mut Ui) {
    ui.label("No data for the current selection.");
}

/// Label of the category at integer position `value`; blank elsewhere.
fn category_label(labels: &[String], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Horizontal bars, one per category, drawn bottom-up in the given order.
/// No gridlines along the value axis.
pub fn category_bar_chart(ui: &mut Ui, id: &str, title: &str, groups: &[(String, f64)]) {
    chart_title(ui, title);
    if groups.is_empty() {
        no_data(ui);
        return;
    }

    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, (name, value))| Bar::new(i as f64, *value).name(name).width(0.6))
        .collect();
    let chart = BarChart::new(bars).color(ACCENT).horizontal();

    let labels: Vec<String> = groups.iter().map(|(name, _)| name.clone()).collect();
    Plot::new(id)
        .height(CHART_HEIGHT)
        .show_grid([false, true])
        .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .y_axis_min_width(140.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Vertical bars of sales per hour of day, one tick per hour.
pub fn hourly_bar_chart(ui: &mut Ui, id: &str, title: &str, groups: &[(u8, f64)]) {
    chart_title(ui, title);
    if groups.is_empty() {
        no_data(ui);
        return;
    }

    let bars: Vec<Bar> = groups
        .iter()
        .map(|(hour, value)| Bar::new(*hour as f64, *value).name(format!("{hour}:00")).width(0.8))
        .collect();
    let chart = BarChart::new(bars).color(ACCENT);

    Plot::new(id)
        .height(CHART_HEIGHT)
        .show_grid([true, false])
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(|mark, _range| {
            if mark.value.fract() == 0.0 && mark.value >= 0.0 {
                format!("{}", mark.value as i64)
            } else {
                String::new()
            }
        })
        .x_axis_label("hour")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Donut chart
// ---------------------------------------------------------------------------

/// One slice of a donut, split into convex quads for filling.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub label: String,
    pub value: f64,
    pub fraction: f64,
    /// Angle at the middle of the slice, radians.
    pub mid_angle: f64,
    pub segments: Vec<[[f64; 2]; 4]>,
}

/// Lay out a donut of unit outer radius and inner radius `hole`, starting
/// at twelve o'clock and running clockwise. Non-positive values get no
/// slice.
pub fn donut_wedges(groups: &[(String, f64)], hole: f64) -> Vec<Wedge> {
    let total: f64 = groups.iter().map(|(_, v)| v.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let point = |radius: f64, angle: f64| [radius * angle.cos(), radius * angle.sin()];
    let mut start = FRAC_PI_2;
    let mut wedges = Vec::new();
    for (label, value) in groups {
        if *value <= 0.0 {
            continue;
        }
        let fraction = value / total;
        let sweep = fraction * TAU;
        let steps = ((fraction * 72.0).ceil() as usize).max(1);
        let segments = (0..steps)
            .map(|s| {
                let a0 = start - sweep * s as f64 / steps as f64;
                let a1 = start - sweep * (s + 1) as f64 / steps as f64;
                [point(1.0, a0), point(1.0, a1), point(hole, a1), point(hole, a0)]
            })
            .collect();
        wedges.push(Wedge {
            label: label.clone(),
            value: *value,
            fraction,
            mid_angle: start - sweep / 2.0,
            segments,
        });
        start -= sweep;
    }
    wedges
}

/// Donut chart with a legend and percentage labels.
pub fn donut_chart(ui: &mut Ui, id: &str, title: &str, groups: &[(String, f64)], hole: f64) {
    chart_title(ui, title);
    let wedges = donut_wedges(groups, hole);
    if wedges.is_empty() {
        no_data(ui);
        return;
    }
    let palette = generate_palette(wedges.len());

    Plot::new(id)
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .legend(Legend::default())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (wedge, color) in wedges.iter().zip(palette) {
                for quad in &wedge.segments {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(quad.to_vec()))
                            .name(format!("{} ({:.0})", wedge.label, wedge.value))
                            .fill_color(color)
                            .stroke(Stroke::new(0.5, color)),
                    );
                }
                let r = (1.0 + hole) / 2.0;
                let anchor = PlotPoint::new(r * wedge.mid_angle.cos(), r * wedge.mid_angle.sin());
                plot_ui.text(
                    Text::new(anchor, RichText::new(format!("{:.1}%", wedge.fraction * 100.0)))
                        .color(Color32::WHITE),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<(String, f64)> {
        vec![("Female".to_string(), 3.0), ("Male".to_string(), 1.0)]
    }

    #[test]
    fn wedges_cover_the_circle() {
        let wedges = donut_wedges(&groups(), 0.3);
        assert_eq!(wedges.len(), 2);
        let fractions: f64 = wedges.iter().map(|w| w.fraction).sum();
        assert!((fractions - 1.0).abs() < 1e-12);
        assert!((wedges[0].fraction - 0.75).abs() < 1e-12);

        // First slice starts at twelve o'clock on the outer ring.
        let first = wedges[0].segments[0][0];
        assert!(first[0].abs() < 1e-12 && (first[1] - 1.0).abs() < 1e-12);
        // Last slice ends where the first began.
        let last = wedges[1].segments.last().unwrap()[1];
        assert!(last[0].abs() < 1e-9 && (last[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn inner_corners_sit_on_the_hole() {
        for wedge in donut_wedges(&groups(), 0.3) {
            for quad in &wedge.segments {
                let r = (quad[2][0].powi(2) + quad[2][1].powi(2)).sqrt();
                assert!((r - 0.3).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn empty_or_zero_groups_have_no_wedges() {
        assert!(donut_wedges(&[], 0.3).is_empty());
        assert!(donut_wedges(&[("x".to_string(), 0.0)], 0.3).is_empty());
        let wedges = donut_wedges(&[("x".to_string(), 0.0), ("y".to_string(), 2.0)], 0.3);
        assert_eq!(wedges.len(), 1);
        assert_eq!(wedges[0].label, "y");
    }

    #[test]
    fn category_labels_only_on_integer_marks() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&labels, 1.0), "b");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 5.0), "");
    }
}
