use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::engine::{
    add_line_item, recompute_totals, remove_line_item, set_tax_config, update_line_item,
    InvoiceTotals, LineItem, LineItemEdit, TaxConfig,
};
use crate::error::AgencyError;

/// Invoice status. Any status can be assigned from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Pending,
    Paid,
    Overdue,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Pending => "PENDING",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
        };
        f.write_str(label)
    }
}

impl FromStr for InvoiceStatus {
    type Err = AgencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(InvoiceStatus::Draft),
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            _ => Err(AgencyError::InvalidStatus {
                kind: "invoice status",
                value: s.to_string(),
                expected: "draft, pending, paid, overdue",
            }),
        }
    }
}

/// One billing record: items, tax settings, derived totals and status.
///
/// Every mutating method recomputes `totals` from scratch, so the totals
/// always match the current items and tax settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InvoiceDocument {
    pub id: String,
    pub number: String,
    pub client_id: String,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    items: Vec<LineItem>,
    tax: TaxConfig,
    #[serde(default)]
    totals: InvoiceTotals,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default)]
    pub notes: String,
}

impl InvoiceDocument {
    /// Start a new draft with one blank line item
    pub fn draft(
        id: impl Into<String>,
        number: impl Into<String>,
        client_id: impl Into<String>,
        date: NaiveDate,
        due_days: u32,
        tax: TaxConfig,
    ) -> Self {
        let due_date = date
            .checked_add_signed(chrono::Duration::days(due_days as i64))
            .unwrap_or(date);

        let mut doc = Self {
            id: id.into(),
            number: number.into(),
            client_id: client_id.into(),
            date,
            due_date,
            items: vec![LineItem::blank()],
            tax,
            totals: InvoiceTotals::default(),
            status: InvoiceStatus::Draft,
            notes: String::new(),
        };
        doc.recompute();
        doc
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn tax(&self) -> TaxConfig {
        self.tax
    }

    pub fn totals(&self) -> InvoiceTotals {
        self.totals
    }

    pub fn add_item(&mut self) {
        self.items = add_line_item(&self.items);
        self.recompute();
    }

    /// Panics if `index` is out of bounds
    pub fn update_item(&mut self, index: usize, edit: LineItemEdit) {
        self.items = update_line_item(&self.items, index, edit);
        self.recompute();
    }

    /// Panics if `index` is out of bounds
    pub fn remove_item(&mut self, index: usize) {
        self.items = remove_line_item(&self.items, index);
        self.recompute();
    }

    pub fn set_tax(&mut self, enabled: Option<bool>, rate: Option<f64>) {
        self.tax = set_tax_config(self.tax, enabled, rate);
        self.recompute();
    }

    /// Recompute item amounts and totals, e.g. after loading from a file
    /// where the stored derived values may be stale
    pub fn normalize(&mut self) {
        self.items.iter_mut().for_each(LineItem::refresh_amount);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.totals = recompute_totals(&self.items, &self.tax);
    }
}
