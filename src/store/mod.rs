//! In-memory application state.
//!
//! `AppState` owns every collection. It is changed only through
//! [`AppState::apply`], which consumes the current state and returns the
//! next one. Nothing here is written back to disk.

pub mod board;
mod records;
pub mod stats;

pub use board::Board;
pub use records::{
    Client, ClientPatch, ClientStatus, NewProposal, Project, ProjectPatch, ProjectStatus,
    Proposal, ProposalStatus, Task, TaskPatch, TaskPriority, TaskStatus,
};
pub use stats::DashboardStats;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::config::{InvoiceSettings, Seed};
use crate::error::{AgencyError, Result};
use crate::invoice::{InvoiceDocument, InvoiceStatus};

/// A single mutation of the application state
#[derive(Debug, Clone)]
pub enum Command {
    /// The store assigns the id
    AddClient(Client),
    UpdateClient { id: String, patch: ClientPatch },
    DeleteClient(String),

    /// The store assigns the id
    AddProject(Project),
    UpdateProject { id: String, patch: ProjectPatch },
    DeleteProject(String),

    /// The store assigns the id
    AddTask(Task),
    UpdateTask { id: String, patch: TaskPatch },
    MoveTask { id: String, status: TaskStatus },
    DeleteTask(String),

    /// Insert a new invoice, or replace the stored one with the same id
    SubmitInvoice(InvoiceDocument),
    SetInvoiceStatus { id: String, status: InvoiceStatus },
    DeleteInvoice(String),

    /// Numbered `{prefix}-NNN`; the store assigns id, number and total
    AddProposal { proposal: NewProposal, prefix: String },
    SetProposalStatus { id: String, status: ProposalStatus },
    DeleteProposal(String),
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub clients: Vec<Client>,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub invoices: Vec<InvoiceDocument>,
    pub proposals: Vec<Proposal>,
}

impl AppState {
    /// Build the starting state. Derived invoice and proposal values from
    /// the seed are recomputed rather than trusted.
    pub fn from_seed(seed: Seed) -> Self {
        let mut state = Self {
            clients: seed.clients,
            projects: seed.projects,
            tasks: seed.tasks,
            invoices: seed.invoices,
            proposals: seed.proposals,
        };
        state.invoices.iter_mut().for_each(InvoiceDocument::normalize);
        state.proposals.iter_mut().for_each(Proposal::normalize);

        tracing::debug!(
            clients = state.clients.len(),
            projects = state.projects.len(),
            tasks = state.tasks.len(),
            invoices = state.invoices.len(),
            proposals = state.proposals.len(),
            "loaded state"
        );
        state
    }

    pub fn client(&self, id: &str) -> Result<&Client> {
        self.clients
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| AgencyError::ClientNotFound(id.to_string()))
    }

    pub fn project(&self, id: &str) -> Result<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AgencyError::ProjectNotFound(id.to_string()))
    }

    /// Look up an invoice by id or by number
    pub fn invoice(&self, reference: &str) -> Result<&InvoiceDocument> {
        self.invoices
            .iter()
            .find(|i| i.id == reference || i.number == reference)
            .ok_or_else(|| AgencyError::InvoiceNotFound(reference.to_string()))
    }

    pub fn board(&self) -> Board<'_> {
        Board::from_tasks(&self.tasks)
    }

    pub fn stats(&self, today: NaiveDate) -> DashboardStats {
        DashboardStats::collect(self, today)
    }

    /// Start a new invoice for `client_id` with the next free number
    pub fn draft_invoice(
        &self,
        client_id: &str,
        date: NaiveDate,
        settings: &InvoiceSettings,
    ) -> Result<InvoiceDocument> {
        self.client(client_id)?;
        let number = next_number(
            &settings.number_prefix,
            self.invoices.iter().map(|i| i.number.as_str()),
        );
        Ok(InvoiceDocument::draft(
            new_id(),
            number,
            client_id,
            date,
            settings.due_days,
            settings.default_tax(),
        ))
    }

    /// Apply one command, returning the resulting state
    pub fn apply(mut self, command: Command) -> Result<Self> {
        tracing::debug!(?command, "applying command");
        match command {
            Command::AddClient(mut client) => {
                client.id = new_id();
                tracing::info!(id = %client.id, name = %client.name, "added client");
                self.clients.push(client);
            }
            Command::UpdateClient { id, patch } => {
                find_mut(&mut self.clients, |c| c.id == id)
                    .ok_or_else(|| AgencyError::ClientNotFound(id.clone()))?
                    .apply(patch);
                tracing::info!(%id, "updated client");
            }
            Command::DeleteClient(id) => {
                remove_where(&mut self.clients, |c| c.id == id)
                    .ok_or_else(|| AgencyError::ClientNotFound(id.clone()))?;
                tracing::info!(%id, "deleted client");
            }

            Command::AddProject(mut project) => {
                self.client(&project.client_id)?;
                project.id = new_id();
                project.progress = project.progress.min(100);
                tracing::info!(id = %project.id, name = %project.name, "added project");
                self.projects.push(project);
            }
            Command::UpdateProject { id, patch } => {
                if let Some(client_id) = &patch.client_id {
                    self.client(client_id)?;
                }
                find_mut(&mut self.projects, |p| p.id == id)
                    .ok_or_else(|| AgencyError::ProjectNotFound(id.clone()))?
                    .apply(patch);
                tracing::info!(%id, "updated project");
            }
            Command::DeleteProject(id) => {
                remove_where(&mut self.projects, |p| p.id == id)
                    .ok_or_else(|| AgencyError::ProjectNotFound(id.clone()))?;
                tracing::info!(%id, "deleted project");
            }

            Command::AddTask(mut task) => {
                self.client(&task.client_id)?;
                self.project(&task.project_id)?;
                task.id = new_id();
                tracing::info!(id = %task.id, title = %task.title, "added task");
                self.tasks.push(task);
            }
            Command::UpdateTask { id, patch } => {
                find_mut(&mut self.tasks, |t| t.id == id)
                    .ok_or_else(|| AgencyError::TaskNotFound(id.clone()))?
                    .apply(patch);
                tracing::info!(%id, "updated task");
            }
            Command::MoveTask { id, status } => {
                find_mut(&mut self.tasks, |t| t.id == id)
                    .ok_or_else(|| AgencyError::TaskNotFound(id.clone()))?
                    .status = status;
                tracing::info!(%id, %status, "moved task");
            }
            Command::DeleteTask(id) => {
                remove_where(&mut self.tasks, |t| t.id == id)
                    .ok_or_else(|| AgencyError::TaskNotFound(id.clone()))?;
                tracing::info!(%id, "deleted task");
            }

            Command::SubmitInvoice(invoice) => {
                self.check_submittable(&invoice)?;
                tracing::info!(
                    number = %invoice.number,
                    total = invoice.totals().total,
                    "submitted invoice"
                );
                match self.invoices.iter().position(|i| i.id == invoice.id) {
                    Some(idx) => self.invoices[idx] = invoice,
                    None => self.invoices.push(invoice),
                }
            }
            Command::SetInvoiceStatus { id, status } => {
                let invoice = find_mut(&mut self.invoices, |i| i.id == id || i.number == id)
                    .ok_or_else(|| AgencyError::InvoiceNotFound(id.clone()))?;
                invoice.status = status;
                tracing::info!(number = %invoice.number, %status, "set invoice status");
            }
            Command::DeleteInvoice(id) => {
                remove_where(&mut self.invoices, |i| i.id == id || i.number == id)
                    .ok_or_else(|| AgencyError::InvoiceNotFound(id.clone()))?;
                tracing::info!(%id, "deleted invoice");
            }

            Command::AddProposal { proposal: new, prefix } => {
                self.client(&new.client_id)?;
                self.project(&new.project_id)?;
                let number = next_number(
                    &prefix,
                    self.proposals.iter().map(|p| p.number.as_str()),
                );
                let mut proposal = Proposal {
                    id: new_id(),
                    number,
                    client_id: new.client_id,
                    project_id: new.project_id,
                    title: new.title,
                    valid_until: new.valid_until,
                    status: ProposalStatus::Draft,
                    items: new.items,
                    total: 0.0,
                };
                proposal.normalize();
                tracing::info!(
                    number = %proposal.number,
                    total = proposal.total,
                    "added proposal"
                );
                self.proposals.push(proposal);
            }
            Command::SetProposalStatus { id, status } => {
                find_mut(&mut self.proposals, |p| p.id == id || p.number == id)
                    .ok_or_else(|| AgencyError::ProposalNotFound(id.clone()))?
                    .status = status;
                tracing::info!(%id, ?status, "set proposal status");
            }
            Command::DeleteProposal(id) => {
                remove_where(&mut self.proposals, |p| p.id == id || p.number == id)
                    .ok_or_else(|| AgencyError::ProposalNotFound(id.clone()))?;
                tracing::info!(%id, "deleted proposal");
            }
        }
        Ok(self)
    }

    fn check_submittable(&self, invoice: &InvoiceDocument) -> Result<()> {
        self.client(&invoice.client_id)?;
        if invoice.items().is_empty() {
            return Err(AgencyError::EmptyInvoice);
        }
        if let Some(line) = invoice
            .items()
            .iter()
            .position(|item| item.description.trim().is_empty())
        {
            return Err(AgencyError::MissingDescription(line + 1));
        }
        Ok(())
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Next sequential number for `prefix`, one past the highest existing
/// numeric suffix (e.g. INV-002 after INV-001)
pub fn next_number<'a>(prefix: &str, existing: impl Iterator<Item = &'a str>) -> String {
    let last = existing
        .filter_map(|n| n.strip_prefix(prefix)?.strip_prefix('-')?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{}-{:03}", prefix, last + 1)
}

fn find_mut<T>(items: &mut [T], pred: impl Fn(&T) -> bool) -> Option<&mut T> {
    items.iter_mut().find(|item| pred(item))
}

fn remove_where<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> Option<T> {
    let idx = items.iter().position(pred)?;
    Some(items.remove(idx))
}
