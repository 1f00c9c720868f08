use super::aggregate::{group_sum, mean, sort_by_value, sum};
use super::model::{Dimension, SalesTable, Transaction};

// ---------------------------------------------------------------------------
// Summary – the metric panels
// ---------------------------------------------------------------------------

/// Scalar summaries of the filtered rows.
///
/// The means are `None` when no row is selected; the dashboard shows a
/// "no data" state for them instead of NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub transactions: usize,
    pub total_sales: f64,
    /// Mean rating, rounded to one decimal.
    pub average_rating: Option<f64>,
    /// Number of star glyphs: the rounded average rating.
    pub star_count: usize,
    /// Mean `Total` per transaction, rounded to two decimals.
    pub average_sale: Option<f64>,
}

impl Summary {
    fn compute<'a>(rows: impl Iterator<Item = &'a Transaction> + Clone) -> Self {
        let average_rating = mean(rows.clone(), |r| r.rating).map(|m| round_to(m, 1));
        Summary {
            transactions: rows.clone().count(),
            total_sales: sum(rows.clone(), |r| r.total),
            average_rating,
            star_count: average_rating.map_or(0, |r| r.round().max(0.0) as usize),
            average_sale: mean(rows, |r| r.total).map(|m| round_to(m, 2)),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ---------------------------------------------------------------------------
// Report – everything the dashboard draws
// ---------------------------------------------------------------------------

/// Summaries and grouped sums of one filtered subset. Each grouping feeds
/// exactly one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub summary: Summary,
    /// `Total` per product line, ascending by sum.
    pub sales_by_product_line: Vec<(String, f64)>,
    /// `Total` per hour of day, ascending by hour.
    pub sales_by_hour: Vec<(u8, f64)>,
    /// `Total` per gender, ascending by name.
    pub sales_by_gender: Vec<(String, f64)>,
    /// `Quantity` per product line, ascending by sum.
    pub quantity_by_product_line: Vec<(String, f64)>,
    /// `Total` per payment method, ascending by name.
    pub sales_by_payment: Vec<(String, f64)>,
    /// `gross income` per product line, ascending by sum.
    pub gross_income_by_product_line: Vec<(String, f64)>,
}

impl Report {
    /// Compute the report for the rows of `table` at `indices`.
    pub fn compute(table: &SalesTable, indices: &[usize]) -> Self {
        let rows = indices.iter().map(|&i| &table.rows[i]);

        let by_category = |dim: Dimension, value: fn(&Transaction) -> f64| {
            group_sum(rows.clone(), |r| r.category(dim).to_string(), value)
        };
        let sorted = |mut groups: Vec<(String, f64)>| {
            sort_by_value(&mut groups);
            groups
        };

        Report {
            summary: Summary::compute(rows.clone()),
            sales_by_product_line: sorted(by_category(Dimension::ProductLine, |r| r.total)),
            sales_by_hour: group_sum(rows.clone(), |r| r.hour, |r| r.total),
            sales_by_gender: by_category(Dimension::Gender, |r| r.total),
            quantity_by_product_line: sorted(by_category(Dimension::ProductLine, |r| {
                r.quantity as f64
            })),
            sales_by_payment: by_category(Dimension::Payment, |r| r.total),
            gross_income_by_product_line: sorted(by_category(Dimension::ProductLine, |r| {
                r.gross_income
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filtered_indices, init_selection};
    use crate::data::fixtures::sample_table;

    fn all(table: &SalesTable) -> Vec<usize> {
        (0..table.len()).collect()
    }

    #[test]
    fn summary_over_full_table() {
        let table = sample_table();
        let summary = Report::compute(&table, &all(&table)).summary;
        assert_eq!(summary.transactions, 8);
        assert!((summary.total_sales - 3926.84).abs() < 1e-9);
        assert_eq!(summary.average_rating, Some(7.2));
        assert_eq!(summary.star_count, 7);
        assert!((summary.average_sale.unwrap() - 490.855).abs() <= 0.01);
    }

    #[test]
    fn empty_subset_is_no_data_not_nan() {
        let table = sample_table();
        let report = Report::compute(&table, &[]);
        assert_eq!(report.summary.transactions, 0);
        assert_eq!(report.summary.total_sales, 0.0);
        assert_eq!(report.summary.average_rating, None);
        assert_eq!(report.summary.average_sale, None);
        assert_eq!(report.summary.star_count, 0);
        assert!(report.sales_by_product_line.is_empty());
        assert!(report.sales_by_gender.is_empty());
    }

    #[test]
    fn product_lines_sorted_by_sales() {
        let table = sample_table();
        let report = Report::compute(&table, &all(&table));
        let names: Vec<&str> = report
            .sales_by_product_line
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(
            names,
            ["Sports and travel", "Health and beauty", "Home and lifestyle", "Electronic accessories"]
        );

        let quantities: Vec<f64> = report.quantity_by_product_line.iter().map(|(_, q)| *q).collect();
        assert_eq!(quantities, vec![7.0, 15.0, 17.0, 18.0]);
    }

    #[test]
    fn grouped_totals_add_up_to_the_summary() {
        let table = sample_table();
        let mut selection = init_selection(&table);
        selection.insert(Dimension::Branch, ["B".to_string()].into_iter().collect());
        let indices = filtered_indices(&table, &selection);
        let report = Report::compute(&table, &indices);

        let total = report.summary.total_sales;
        for groups in [&report.sales_by_product_line, &report.sales_by_gender, &report.sales_by_payment] {
            let regrouped: f64 = groups.iter().map(|(_, v)| v).sum();
            assert!((regrouped - total).abs() < 1e-9);
        }
        let by_hour: f64 = report.sales_by_hour.iter().map(|(_, v)| v).sum();
        assert!((by_hour - total).abs() < 1e-9);
    }

    #[test]
    fn gender_split_follows_the_filter() {
        let table = sample_table();
        let mut selection = init_selection(&table);
        selection.insert(Dimension::City, ["Yangon".to_string()].into_iter().collect());
        let report = Report::compute(&table, &filtered_indices(&table, &selection));

        assert_eq!(report.sales_by_gender.len(), 2);
        let (gender, female) = &report.sales_by_gender[0];
        assert_eq!(gender, "Female");
        assert!((female - (548.97 + 627.62)).abs() < 1e-9);
    }

    #[test]
    fn filtered_total_matches_manual_sum() {
        let table = sample_table();
        let mut selection = init_selection(&table);
        selection.insert(Dimension::City, ["Mandalay".to_string()].into_iter().collect());
        selection.insert(Dimension::Gender, ["Male".to_string()].into_iter().collect());
        selection.insert(Dimension::Branch, ["B".to_string()].into_iter().collect());
        let report = Report::compute(&table, &filtered_indices(&table, &selection));

        assert_eq!(report.summary.transactions, 2);
        assert!((report.summary.total_sales - (634.38 + 772.38)).abs() < 1e-9);
    }
}
