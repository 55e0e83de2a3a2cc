mod document;
pub mod engine;

pub use document::{InvoiceDocument, InvoiceStatus};
pub use engine::{
    add_line_item, parse_number, recompute_totals, remove_line_item, set_tax_config,
    update_line_item, InvoiceTotals, LineItem, LineItemEdit, TaxConfig,
};
