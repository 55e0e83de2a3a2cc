use serde::{Deserialize, Serialize};

use crate::invoice::TaxConfig;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub company: Company,
    pub invoice: InvoiceSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Company {
    pub name: String,
    pub address: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InvoiceSettings {
    #[serde(default = "default_number_prefix")]
    pub number_prefix: String,
    #[serde(default = "default_proposal_prefix")]
    pub proposal_prefix: String,
    pub currency_symbol: String,
    pub due_days: u32,
    #[serde(default = "default_tax_enabled")]
    pub tax_enabled: bool,
    /// Percentage, e.g. 18.0 for 18%
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
}

impl InvoiceSettings {
    /// Tax settings a new draft starts with
    pub fn default_tax(&self) -> TaxConfig {
        TaxConfig::new(self.tax_enabled, self.tax_rate)
    }
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        Self {
            number_prefix: default_number_prefix(),
            proposal_prefix: default_proposal_prefix(),
            currency_symbol: "₹".to_string(),
            due_days: 14,
            tax_enabled: default_tax_enabled(),
            tax_rate: default_tax_rate(),
        }
    }
}

fn default_number_prefix() -> String {
    "INV".to_string()
}

fn default_proposal_prefix() -> String {
    "PROP".to_string()
}

fn default_tax_enabled() -> bool {
    true
}

fn default_tax_rate() -> f64 {
    18.0
}
