use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_xlsxwriter::{Format, Workbook};

const HEADERS: [&str; 17] = [
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
];

const BRANCHES: [(&str, &str); 3] = [("A", "Yangon"), ("B", "Mandalay"), ("C", "Naypyitaw")];
const CUSTOMER_TYPES: [&str; 2] = ["Member", "Normal"];
const GENDERS: [&str; 2] = ["Female", "Male"];
const PRODUCT_LINES: [&str; 6] = [
    "Electronic accessories",
    "Fashion accessories",
    "Food and beverages",
    "Health and beauty",
    "Home and lifestyle",
    "Sports and travel",
];
const PAYMENTS: [&str; 3] = ["Cash", "Credit card", "Ewallet"];

const ROWS: usize = 1000;
const TAX_RATE: f64 = 0.05;

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sales")?;

    // Sales export layout: title block, header on row 4,
    // data in columns B:R.
    sheet.write_string_with_format(0, 1, "Supermarket Sales", &bold)?;
    sheet.write_string(1, 1, "Three months of transactions, three branches")?;
    for (c, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(3, c as u16 + 1, *header, &bold)?;
    }

    let first_day = NaiveDate::from_ymd_opt(2019, 1, 1).context("invalid start date")?;

    for i in 0..ROWS {
        let row = i as u32 + 4;
        let (branch, city) = *BRANCHES.choose(&mut rng).context("no branches")?;
        let unit_price = (rng.gen_range(10.0..100.0_f64) * 100.0).round() / 100.0;
        let quantity: u32 = rng.gen_range(1..=10);
        let cogs = unit_price * quantity as f64;
        let tax = cogs * TAX_RATE;
        let total = cogs + tax;
        let date = first_day
            .checked_add_days(Days::new(rng.gen_range(0..90)))
            .context("date out of range")?;
        let time = format!("{:02}:{:02}:00", rng.gen_range(10..21), rng.gen_range(0..60));
        let rating = rng.gen_range(40..=100) as f64 / 10.0;
        let invoice = format!(
            "{:03}-{:02}-{:04}",
            rng.gen_range(100..1000),
            rng.gen_range(10..100),
            rng.gen_range(1000..10000)
        );

        let date_text = date.format("%-m/%-d/%Y").to_string();
        let text = [
            (1, invoice.as_str()),
            (2, branch),
            (3, city),
            (4, *CUSTOMER_TYPES.choose(&mut rng).context("no customer types")?),
            (5, *GENDERS.choose(&mut rng).context("no genders")?),
            (6, *PRODUCT_LINES.choose(&mut rng).context("no product lines")?),
            (11, date_text.as_str()),
            (12, time.as_str()),
            (13, *PAYMENTS.choose(&mut rng).context("no payments")?),
        ];
        for (col, value) in text {
            sheet.write_string(row, col, value)?;
        }

        let numbers = [
            (7, unit_price),
            (8, quantity as f64),
            (9, tax),
            (10, total),
            (14, cogs),
            (15, TAX_RATE / (1.0 + TAX_RATE) * 100.0),
            (16, tax),
            (17, rating),
        ];
        for (col, value) in numbers {
            sheet.write_number(row, col, value)?;
        }
    }

    let output_path = "supermarkt_sales.xlsx";
    workbook
        .save(output_path)
        .with_context(|| format!("writing {output_path}"))?;

    println!("Wrote {ROWS} transactions to {output_path}");
    Ok(())
}
