use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AgencyError;

/// A billable row on an invoice or proposal
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    pub quantity: f64,
    pub rate: f64,
    /// Always `quantity * rate`; only the engine writes it
    #[serde(default)]
    pub amount: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, rate: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            rate,
            amount: quantity * rate,
        }
    }

    /// The row a new invoice or an "add item" action starts with
    pub fn blank() -> Self {
        Self::new("", 1.0, 0.0)
    }

    pub(crate) fn refresh_amount(&mut self) {
        self.amount = self.quantity * self.rate;
    }
}

/// Flat percentage tax applied to the subtotal
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TaxConfig {
    pub enabled: bool,
    /// Percentage, e.g. 18.0 for 18%
    pub rate: f64,
}

impl TaxConfig {
    pub fn new(enabled: bool, rate: f64) -> Self {
        Self { enabled, rate }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
}

/// A single field change on one line item
#[derive(Debug, Clone, PartialEq)]
pub enum LineItemEdit {
    Description(String),
    Quantity(f64),
    Rate(f64),
}

impl LineItemEdit {
    /// Build an edit from a field name and the raw text typed for it
    pub fn from_field(field: &str, value: &str) -> Option<Self> {
        match field.trim().to_ascii_lowercase().as_str() {
            "description" | "desc" => Some(Self::Description(value.to_string())),
            "quantity" | "qty" => Some(Self::Quantity(parse_number(value))),
            "rate" => Some(Self::Rate(parse_number(value))),
            _ => None,
        }
    }
}

impl FromStr for LineItemEdit {
    type Err = AgencyError;

    /// Parse "field=value", e.g. "rate=200"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, value) = s
            .split_once('=')
            .ok_or_else(|| AgencyError::InvalidEdit(s.to_string()))?;
        Self::from_field(field, value).ok_or_else(|| AgencyError::InvalidEdit(s.to_string()))
    }
}

/// Parse numeric form input. Text that is not a number becomes NaN and
/// flows through every derived total.
pub fn parse_number(input: &str) -> f64 {
    input.trim().parse().unwrap_or(f64::NAN)
}

/// Derive subtotal, tax and total from the current items.
///
/// Summation is a single left-to-right pass so rounding is reproducible for
/// a given item order.
pub fn recompute_totals(items: &[LineItem], tax: &TaxConfig) -> InvoiceTotals {
    let subtotal = items.iter().fold(0.0, |acc, item| acc + item.amount);
    let tax_amount = if tax.enabled {
        subtotal * tax.rate / 100.0
    } else {
        0.0
    };

    tracing::debug!(items = items.len(), subtotal, tax_amount, "recomputed totals");

    InvoiceTotals {
        subtotal,
        tax_amount,
        total: subtotal + tax_amount,
    }
}

/// Return a copy of `items` with one field of the item at `index` replaced.
///
/// Quantity and rate edits refresh that item's amount. Panics if `index` is
/// out of bounds.
pub fn update_line_item(items: &[LineItem], index: usize, edit: LineItemEdit) -> Vec<LineItem> {
    assert!(
        index < items.len(),
        "line item index {index} out of bounds ({} items)",
        items.len()
    );

    let mut updated = items.to_vec();
    let item = &mut updated[index];
    match edit {
        LineItemEdit::Description(description) => item.description = description,
        LineItemEdit::Quantity(quantity) => {
            item.quantity = quantity;
            item.refresh_amount();
        }
        LineItemEdit::Rate(rate) => {
            item.rate = rate;
            item.refresh_amount();
        }
    }
    updated
}

/// Append a blank item (quantity 1, rate 0)
pub fn add_line_item(items: &[LineItem]) -> Vec<LineItem> {
    let mut updated = Vec::with_capacity(items.len() + 1);
    updated.extend_from_slice(items);
    updated.push(LineItem::blank());
    updated
}

/// Remove the item at `index`. Panics if `index` is out of bounds.
pub fn remove_line_item(items: &[LineItem], index: usize) -> Vec<LineItem> {
    assert!(
        index < items.len(),
        "line item index {index} out of bounds ({} items)",
        items.len()
    );

    items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, item)| item.clone())
        .collect()
}

/// Change either or both tax settings. Item amounts are unaffected; callers
/// recompute totals against their existing items.
pub fn set_tax_config(tax: TaxConfig, enabled: Option<bool>, rate: Option<f64>) -> TaxConfig {
    TaxConfig {
        enabled: enabled.unwrap_or(tax.enabled),
        rate: rate.unwrap_or(tax.rate),
    }
}
