//! CSV export of stock and orders, and CSV import of stock drafts.

use std::io;

use csv::{ReaderBuilder, StringRecord, Trim, Writer};

use smartshelf_inventory::{StockItem, StockItemDraft};
use smartshelf_sales::Order;

use crate::error::{ReportError, ReportResult};
use crate::format_amount;
use crate::table::{STOCK_HEADERS, stock_row};

const ORDER_HEADERS: [&str; 6] = ["Order ID", "Customer", "Product", "Amount", "Date", "Status"];

pub fn write_stock_csv<W: io::Write>(writer: W, items: &[StockItem]) -> ReportResult<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(STOCK_HEADERS)?;
    for item in items {
        wtr.write_record(stock_row(item))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn stock_csv(items: &[StockItem]) -> ReportResult<String> {
    let mut buf = Vec::new();
    write_stock_csv(&mut buf, items)?;
    Ok(String::from_utf8(buf)?)
}

/// One row per order. Product joins the line names with `; `, Amount is the
/// order total.
pub fn write_orders_csv<W: io::Write>(writer: W, orders: &[Order]) -> ReportResult<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(ORDER_HEADERS)?;
    for order in orders {
        wtr.write_record([
            order.id.to_string(),
            order.customer_name.clone(),
            order.product_summary(),
            format_amount(order.total()),
            order.date().format("%Y-%m-%d").to_string(),
            order.status.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn orders_csv(orders: &[Order]) -> ReportResult<String> {
    let mut buf = Vec::new();
    write_orders_csv(&mut buf, orders)?;
    Ok(String::from_utf8(buf)?)
}

/// Column positions of the five imported fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    name: usize,
    category: usize,
    quantity: usize,
    unit: usize,
    reorder_level: usize,
}

impl Layout {
    /// `name,category,quantity,unit,reorderLevel`
    const POSITIONAL: Layout = Layout {
        name: 0,
        category: 1,
        quantity: 2,
        unit: 3,
        reorder_level: 4,
    };

    /// Locate columns by name when the header carries the export headings,
    /// otherwise fall back to positions.
    fn from_header(header: &StringRecord) -> Self {
        let find = |wanted: &str| header.iter().position(|h| h.eq_ignore_ascii_case(wanted));

        match (
            find("Name"),
            find("Category"),
            find("Quantity"),
            find("Unit"),
            find("Reorder Level"),
        ) {
            (Some(name), Some(category), Some(quantity), Some(unit), Some(reorder_level)) => Self {
                name,
                category,
                quantity,
                unit,
                reorder_level,
            },
            _ => Self::POSITIONAL,
        }
    }
}

fn field<'r>(
    record: &'r StringRecord,
    index: usize,
    line: u64,
    column: &'static str,
) -> ReportResult<&'r str> {
    record
        .get(index)
        .ok_or(ReportError::MissingColumn { line, column })
}

fn whole_number(
    record: &StringRecord,
    index: usize,
    line: u64,
    column: &'static str,
) -> ReportResult<i64> {
    let raw = field(record, index, line, column)?;
    raw.parse().map_err(|_| ReportError::InvalidNumber {
        line,
        column,
        value: raw.to_string(),
    })
}

/// Parse stock drafts from CSV.
///
/// The first row is a header and is skipped. Blank rows are skipped and
/// fields are trimmed. Any non-numeric quantity or reorder level fails the
/// whole import. Range checks (negative values, empty names) are left to the
/// store, which rejects the import as a unit.
pub fn import_stock_csv<R: io::Read>(reader: R) -> ReportResult<Vec<StockItemDraft>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let mut records = rdr.records();

    let layout = match records.next() {
        Some(header) => Layout::from_header(&header?),
        None => return Ok(Vec::new()),
    };

    let mut drafts = Vec::new();
    for record in records {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let quantity = whole_number(&record, layout.quantity, line, "Quantity")?;
        let reorder_level = whole_number(&record, layout.reorder_level, line, "Reorder Level")?;
        drafts.push(StockItemDraft::new(
            field(&record, layout.name, line, "Name")?,
            field(&record, layout.category, line, "Category")?,
            quantity,
            field(&record, layout.unit, line, "Unit")?,
            reorder_level,
        ));
    }

    Ok(drafts)
}
