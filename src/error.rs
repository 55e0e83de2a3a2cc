use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgencyError {
    #[error("Config directory not found at {0}. Run 'agency init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("Invoice '{0}' not found")]
    InvoiceNotFound(String),

    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Task '{0}' not found")]
    TaskNotFound(String),

    #[error("Proposal '{0}' not found")]
    ProposalNotFound(String),

    #[error("Invalid item format '{0}'. Use 'description:quantity:rate', e.g. 'Design:2:1500'")]
    InvalidItemFormat(String),

    #[error("Invalid line item {index} (invoice has {count} item(s))")]
    InvalidLineIndex { index: usize, count: usize },

    #[error("Invalid edit '{0}'. Expected '<line>:<field>=<value>' (description, quantity, rate)")]
    InvalidEdit(String),

    #[error("Invalid {kind} '{value}'. Use one of: {expected}")]
    InvalidStatus {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Line item {0} needs a description before the invoice can be submitted")]
    MissingDescription(usize),

    #[error("Invoice has no line items")]
    EmptyInvoice,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AgencyError>;
