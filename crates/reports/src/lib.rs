//! `smartshelf-reports`: read-side renderings of store state.
//!
//! CSV interchange for stock and orders, row tables for a PDF renderer, and
//! label/value series for a chart renderer. Nothing here mutates state; CSV
//! import only produces drafts for the store to validate.

pub mod chart;
pub mod error;
pub mod interchange;
pub mod table;

use chrono::NaiveDate;

pub use chart::{
    ChartSeries, TOP_PRODUCTS_LIMIT, orders_by_status, stock_by_category, top_products,
};
pub use error::{ReportError, ReportResult};
pub use interchange::{import_stock_csv, orders_csv, stock_csv, write_orders_csv, write_stock_csv};
pub use table::{TableReport, orders_table, stock_table};

pub const STOCK_REPORT_PREFIX: &str = "stock_report";
pub const ORDERS_REPORT_PREFIX: &str = "orders";

/// `<prefix>_<YYYY-MM-DD>.<extension>`
pub fn export_file_name(prefix: &str, date: NaiveDate, extension: &str) -> String {
    format!("{prefix}_{}.{extension}", date.format("%Y-%m-%d"))
}

/// Cents as `units.cc`.
pub fn format_amount(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_carry_the_date() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 9).unwrap();
        assert_eq!(
            export_file_name(STOCK_REPORT_PREFIX, date, "csv"),
            "stock_report_2025-08-09.csv"
        );
        assert_eq!(export_file_name(ORDERS_REPORT_PREFIX, date, "pdf"), "orders_2025-08-09.pdf");
    }

    #[test]
    fn amounts_have_two_decimals() {
        assert_eq!(format_amount(0), "0.00");
        assert_eq!(format_amount(5), "0.05");
        assert_eq!(format_amount(1450), "14.50");
    }
}
