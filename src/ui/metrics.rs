use eframe::egui::{RichText, Ui};

use crate::data::report::Summary;

const NO_DATA: &str = "No data";

/// The three headline panels above the charts.
pub fn metric_row(ui: &mut Ui, summary: &Summary, currency: &str) {
    let total = format!("{currency} {}", format_thousands(summary.total_sales));
    let rating = match summary.average_rating {
        Some(r) => format!("{r:.1} {}", star_glyphs(summary.star_count)),
        None => NO_DATA.to_string(),
    };
    let average = match summary.average_sale {
        Some(v) => format!("{currency} {v:.2}"),
        None => NO_DATA.to_string(),
    };

    ui.columns(3, |cols| {
        metric(&mut cols[0], "Total Sales:", &total);
        metric(&mut cols[1], "Average Rating:", &rating);
        metric(&mut cols[2], "Average Sales Per Transaction:", &average);
    });
    ui.label(format!("{} transactions selected", summary.transactions));
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.label(RichText::new(label).size(18.0).strong());
    ui.label(RichText::new(value).size(18.0));
}

/// Integer part of `value` with thousands separators: `3926.84` → `3,926`.
pub fn format_thousands(value: f64) -> String {
    let whole = value.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn star_glyphs(count: usize) -> String {
    "⭐".repeat(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.99), "999");
        assert_eq!(format_thousands(3926.84), "3,926");
        assert_eq!(format_thousands(322_966.75), "322,966");
        assert_eq!(format_thousands(1_234_567.0), "1,234,567");
        assert_eq!(format_thousands(-1234.5), "-1,234");
    }

    #[test]
    fn stars() {
        assert_eq!(star_glyphs(0), "");
        assert_eq!(star_glyphs(3).chars().count(), 3);
    }
}
