/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SalesTable (+ derived hour)
///   └──────────┘
///        │  memoized by `cache`
///        ▼
///   ┌────────────┐
///   │ SalesTable │  Vec<Transaction>, distinct category values
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply category selections → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  report   │  summary metrics + grouped sums (via `aggregate`)
///   └──────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod report;

#[cfg(test)]
pub mod fixtures {
    use chrono::{NaiveDate, NaiveTime};

    use super::model::{SalesTable, Transaction};

    /// Build a transaction whose money columns are derived from `total`.
    #[allow(clippy::too_many_arguments)]
    pub fn transaction(
        invoice_id: &str,
        branch: &str,
        city: &str,
        customer_type: &str,
        gender: &str,
        product_line: &str,
        total: f64,
        quantity: u32,
        rating: f64,
        hour: u8,
        payment: &str,
    ) -> Transaction {
        let cogs = total / 1.05;
        Transaction {
            invoice_id: invoice_id.to_string(),
            branch: branch.to_string(),
            city: city.to_string(),
            customer_type: customer_type.to_string(),
            gender: gender.to_string(),
            product_line: product_line.to_string(),
            unit_price: cogs / quantity as f64,
            quantity,
            tax: total - cogs,
            total,
            date: NaiveDate::from_ymd_opt(2019, 1, 5).unwrap(),
            time: NaiveTime::from_hms_opt(hour as u32, 15, 0).unwrap(),
            payment: payment.to_string(),
            cogs,
            gross_margin_pct: 4.761904762,
            gross_income: total - cogs,
            rating,
            hour,
        }
    }

    /// Eight rows spanning two cities, two genders and two branches.
    pub fn sample_table() -> SalesTable {
        SalesTable::from_rows(vec![
            transaction("750-67-8428", "A", "Yangon", "Member", "Female", "Health and beauty", 548.97, 7, 9.1, 13, "Ewallet"),
            transaction("226-31-3081", "B", "Mandalay", "Normal", "Female", "Electronic accessories", 80.22, 5, 9.6, 10, "Cash"),
            transaction("631-41-3108", "A", "Yangon", "Normal", "Male", "Home and lifestyle", 340.53, 7, 7.4, 13, "Credit card"),
            transaction("123-19-1176", "A", "Yangon", "Member", "Male", "Health and beauty", 489.05, 8, 8.4, 20, "Ewallet"),
            transaction("373-73-7910", "B", "Mandalay", "Normal", "Male", "Sports and travel", 634.38, 7, 5.3, 10, "Ewallet"),
            transaction("699-14-3026", "B", "Yangon", "Normal", "Female", "Electronic accessories", 627.62, 7, 4.1, 18, "Ewallet"),
            transaction("355-53-5943", "A", "Mandalay", "Member", "Female", "Electronic accessories", 433.69, 6, 5.8, 14, "Cash"),
            transaction("315-22-5665", "B", "Mandalay", "Member", "Male", "Home and lifestyle", 772.38, 10, 8.0, 11, "Credit card"),
        ])
    }
}
