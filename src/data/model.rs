use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};

// ---------------------------------------------------------------------------
// CellValue – a single decoded cell of the source grid
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as read from any of the supported source formats,
/// before it is mapped onto a [`Transaction`] field.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Time(NaiveTime),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            CellValue::Empty => Ok(()),
        }
    }
}

impl CellValue {
    /// Whether the cell carries no value (blank text counts as empty).
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Dimension – categorical columns
// ---------------------------------------------------------------------------

/// Categorical columns a transaction can be filtered or grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    City,
    CustomerType,
    Gender,
    Branch,
    ProductLine,
    Payment,
}

impl Dimension {
    /// Dimensions exposed as sidebar selectors, in display order.
    pub const FILTERS: [Dimension; 4] = [
        Dimension::City,
        Dimension::CustomerType,
        Dimension::Gender,
        Dimension::Branch,
    ];

    pub const ALL: [Dimension; 6] = [
        Dimension::City,
        Dimension::CustomerType,
        Dimension::Gender,
        Dimension::Branch,
        Dimension::ProductLine,
        Dimension::Payment,
    ];

    /// Column header in the source sheet.
    pub fn column_name(self) -> &'static str {
        match self {
            Dimension::City => "City",
            Dimension::CustomerType => "Customer_type",
            Dimension::Gender => "Gender",
            Dimension::Branch => "Branch",
            Dimension::ProductLine => "Product line",
            Dimension::Payment => "Payment",
        }
    }

    /// Sidebar prompt for the selector of this dimension.
    pub fn prompt(self) -> &'static str {
        match self {
            Dimension::City => "Select the City:",
            Dimension::CustomerType => "Select the Customer Type:",
            Dimension::Gender => "Select the Gender:",
            Dimension::Branch => "Select Branch:",
            Dimension::ProductLine => "Select the Product Line:",
            Dimension::Payment => "Select the Payment Method:",
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction – one row of the source table
// ---------------------------------------------------------------------------

/// Headers of the tabular view, in the order of [`Transaction::display_cells`].
pub const TABLE_COLUMNS: [&str; 18] = [
    "Invoice ID",
    "Branch",
    "City",
    "Customer_type",
    "Gender",
    "Product line",
    "Unit price",
    "Quantity",
    "Tax 5%",
    "Total",
    "Date",
    "Time",
    "Payment",
    "cogs",
    "gross margin percentage",
    "gross income",
    "Rating",
    "hour",
];

/// A single retail transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub invoice_id: String,
    pub branch: String,
    pub city: String,
    pub customer_type: String,
    pub gender: String,
    pub product_line: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub tax: f64,
    pub total: f64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub payment: String,
    pub cogs: f64,
    pub gross_margin_pct: f64,
    pub gross_income: f64,
    pub rating: f64,
    /// Hour of day derived from `time`.
    pub hour: u8,
}

impl Transaction {
    /// Value of a categorical column.
    pub fn category(&self, dim: Dimension) -> &str {
        match dim {
            Dimension::City => &self.city,
            Dimension::CustomerType => &self.customer_type,
            Dimension::Gender => &self.gender,
            Dimension::Branch => &self.branch,
            Dimension::ProductLine => &self.product_line,
            Dimension::Payment => &self.payment,
        }
    }

    /// Formatted cells for the tabular view (see [`TABLE_COLUMNS`]).
    pub fn display_cells(&self) -> [String; 18] {
        [
            self.invoice_id.clone(),
            self.branch.clone(),
            self.city.clone(),
            self.customer_type.clone(),
            self.gender.clone(),
            self.product_line.clone(),
            format!("{:.2}", self.unit_price),
            self.quantity.to_string(),
            format!("{:.4}", self.tax),
            format!("{:.4}", self.total),
            self.date.format("%Y-%m-%d").to_string(),
            self.time.format("%H:%M:%S").to_string(),
            self.payment.clone(),
            format!("{:.2}", self.cogs),
            format!("{:.6}", self.gross_margin_pct),
            format!("{:.4}", self.gross_income),
            format!("{:.1}", self.rating),
            self.hour.to_string(),
        ]
    }
}

// ---------------------------------------------------------------------------
// SalesTable – the complete loaded table
// ---------------------------------------------------------------------------

/// The full loaded table with the distinct values of each categorical column.
///
/// Never mutated after construction; the app shares it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesTable {
    pub rows: Vec<Transaction>,
    /// Distinct values per dimension, in order of first appearance.
    pub categories: BTreeMap<Dimension, Vec<String>>,
}

impl SalesTable {
    /// Build the category index from the loaded rows.
    pub fn from_rows(rows: Vec<Transaction>) -> Self {
        let mut categories: BTreeMap<Dimension, Vec<String>> = BTreeMap::new();
        for dim in Dimension::ALL {
            let values = categories.entry(dim).or_default();
            for row in &rows {
                let value = row.category(dim);
                if !values.iter().any(|v| v == value) {
                    values.push(value.to_string());
                }
            }
        }
        SalesTable { rows, categories }
    }

    /// Distinct values of a dimension, in order of first appearance.
    pub fn distinct(&self, dim: Dimension) -> &[String] {
        self.categories
            .get(&dim)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_table;

    #[test]
    fn distinct_values_keep_first_appearance_order() {
        let table = sample_table();
        assert_eq!(table.distinct(Dimension::City), ["Yangon", "Mandalay"]);
        assert_eq!(table.distinct(Dimension::Gender), ["Female", "Male"]);
        assert_eq!(table.distinct(Dimension::Branch), ["A", "B"]);
        assert_eq!(
            table.distinct(Dimension::Payment),
            ["Ewallet", "Cash", "Credit card"]
        );
    }

    #[test]
    fn empty_table_has_no_categories() {
        let table = SalesTable::from_rows(Vec::new());
        assert!(table.is_empty());
        assert!(table.distinct(Dimension::City).is_empty());
    }

    #[test]
    fn cell_display_drops_integral_fraction() {
        assert_eq!(CellValue::Number(7.0).to_string(), "7");
        assert_eq!(CellValue::Number(7.25).to_string(), "7.25");
        assert!(CellValue::Text("  ".into()).is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn display_cells_line_up_with_headers() {
        let table = sample_table();
        let cells = table.rows[0].display_cells();
        assert_eq!(cells.len(), TABLE_COLUMNS.len());
        assert_eq!(cells[2], "Yangon");
        assert_eq!(cells[17], "13");
    }
}
