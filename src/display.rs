//! Text rendering for the CLI: money amounts and invoice tables.

use tabled::{settings::Style, Table, Tabled};

use crate::invoice::{InvoiceTotals, LineItem, TaxConfig};

/// Format a money amount with two decimal places and thousands separators.
/// Non-finite values (NaN from malformed input) are shown as-is.
pub fn format_money(value: f64, currency_symbol: &str) -> String {
    if !value.is_finite() {
        return format!("{}{}", currency_symbol, value);
    }

    let rounded = format!("{:.2}", value);
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let digits = whole.trim_start_matches('-');
    let negative = whole.starts_with('-') && (digits != "0" || frac != "00");
    let grouped = group_digits(digits);

    if negative {
        format!("-{}{}.{}", currency_symbol, grouped, frac)
    } else {
        format!("{}{}.{}", currency_symbol, grouped, frac)
    }
}

/// Insert a comma every three digits, counting from the right
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// Format a plain number the way it was entered (no trailing ".0")
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "#")]
    index: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "QTY")]
    quantity: String,
    #[tabled(rename = "RATE")]
    rate: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

/// Render line items followed by subtotal, tax and total rows.
///
/// The amount column is right-aligned to the widest value, totals included.
pub fn line_items_table(
    items: &[LineItem],
    tax: &TaxConfig,
    totals: &InvoiceTotals,
    currency_symbol: &str,
) -> String {
    let tax_label = if tax.enabled {
        format!("Tax ({}%)", format_number(tax.rate))
    } else {
        "Tax (off)".to_string()
    };

    let footer = [
        ("Subtotal".to_string(), format_money(totals.subtotal, currency_symbol)),
        (tax_label, format_money(totals.tax_amount, currency_symbol)),
        ("TOTAL".to_string(), format_money(totals.total, currency_symbol)),
    ];

    let amounts: Vec<String> = items
        .iter()
        .map(|item| format_money(item.amount, currency_symbol))
        .collect();
    let width = amounts
        .iter()
        .chain(footer.iter().map(|(_, value)| value))
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0);

    let mut rows: Vec<LineRow> = items
        .iter()
        .zip(amounts)
        .enumerate()
        .map(|(idx, (item, amount))| LineRow {
            index: (idx + 1).to_string(),
            description: item.description.clone(),
            quantity: format_number(item.quantity),
            rate: format_money(item.rate, currency_symbol),
            amount: format!("{:>width$}", amount),
        })
        .collect();

    rows.extend(footer.into_iter().map(|(label, value)| LineRow {
        index: String::new(),
        description: String::new(),
        quantity: String::new(),
        rate: label,
        amount: format!("{:>width$}", value),
    }));

    Table::new(rows).with(Style::rounded()).to_string()
}
