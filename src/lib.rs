pub mod config;
pub mod display;
pub mod error;
pub mod invoice;
pub mod store;

pub use config::{Company, Config, InvoiceSettings, Seed};
pub use error::{AgencyError, Result};
pub use invoice::{InvoiceDocument, InvoiceStatus, InvoiceTotals, LineItem, LineItemEdit, TaxConfig};
pub use store::{AppState, Command, DashboardStats};
