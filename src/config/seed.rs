use serde::{Deserialize, Serialize};

use crate::invoice::InvoiceDocument;
use crate::store::{Client, Project, Proposal, Task};

/// Records the in-memory store starts from on every run
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Seed {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub invoices: Vec<InvoiceDocument>,
    #[serde(default)]
    pub proposals: Vec<Proposal>,
}
