use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AgencyError;
use crate::invoice::{recompute_totals, LineItem, TaxConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
    Pending,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub status: ClientStatus,
    pub created_at: NaiveDate,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
}

/// Fields a client update may change
#[derive(Debug, Clone, Default)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<ClientStatus>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
}

impl Client {
    pub(crate) fn apply(&mut self, patch: ClientPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(company) = patch.company {
            self.company = company;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if patch.address.is_some() {
            self.address = patch.address;
        }
        if patch.gst_number.is_some() {
            self.gst_number = patch.gst_number;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum ProjectStatus {
    #[default]
    Planning,
    InProgress,
    Completed,
    OnHold,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub client_id: String,
    #[serde(default)]
    pub status: ProjectStatus,
    /// Percent complete, 0..=100
    #[serde(default)]
    pub progress: u8,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub budget: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub client_id: Option<String>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<u8>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
}

impl Project {
    pub(crate) fn apply(&mut self, patch: ProjectPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(client_id) = patch.client_id {
            self.client_id = client_id;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress.min(100);
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(budget) = patch.budget {
            self.budget = budget;
        }
    }
}

/// Kanban column a task sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}

impl FromStr for TaskStatus {
    type Err = AgencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "inprogress" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            _ => Err(AgencyError::InvalidStatus {
                kind: "task status",
                value: s.to_string(),
                expected: "todo, in-progress, completed",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize, Serialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub client_id: String,
    pub project_id: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
}

impl Task {
    pub(crate) fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
    }

    /// Past its due date and not yet completed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Completed && self.due_date < today
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum ProposalStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

/// A priced offer to a client. The total is the untaxed sum of its items.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Proposal {
    pub id: String,
    pub number: String,
    pub client_id: String,
    pub project_id: String,
    pub title: String,
    pub valid_until: NaiveDate,
    #[serde(default)]
    pub status: ProposalStatus,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub total: f64,
}

impl Proposal {
    pub(crate) fn normalize(&mut self) {
        self.items.iter_mut().for_each(LineItem::refresh_amount);
        self.total = recompute_totals(&self.items, &TaxConfig::disabled()).total;
    }
}

/// Input for creating a proposal; id, number and total are assigned by the store
#[derive(Debug, Clone)]
pub struct NewProposal {
    pub client_id: String,
    pub project_id: String,
    pub title: String,
    pub valid_until: NaiveDate,
    pub items: Vec<LineItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_task_status_parse() {
        assert_eq!("todo".parse::<TaskStatus>().unwrap(), TaskStatus::Todo);
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("inProgress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("Done".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
        assert!("blocked".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_project_progress_clamped() {
        let mut project = Project {
            id: "1".into(),
            name: "Website".into(),
            client_id: "1".into(),
            status: ProjectStatus::Planning,
            progress: 0,
            start_date: date("2024-01-10"),
            end_date: date("2024-03-10"),
            budget: 10000.0,
        };
        project.apply(ProjectPatch {
            progress: Some(140),
            status: Some(ProjectStatus::InProgress),
            ..Default::default()
        });
        assert_eq!(project.progress, 100);
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(project.name, "Website");
    }

    #[test]
    fn test_task_overdue() {
        let mut task = Task {
            id: "1".into(),
            title: "Design Homepage".into(),
            description: String::new(),
            client_id: "1".into(),
            project_id: "1".into(),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            due_date: date("2024-02-20"),
        };
        assert!(task.is_overdue(date("2024-02-21")));
        assert!(!task.is_overdue(date("2024-02-20")));

        task.status = TaskStatus::Completed;
        assert!(!task.is_overdue(date("2024-03-01")));
    }

    #[test]
    fn test_proposal_total_ignores_stored_values() {
        let mut proposal = Proposal {
            id: "1".into(),
            number: "PROP-001".into(),
            client_id: "1".into(),
            project_id: "1".into(),
            title: "Redesign".into(),
            valid_until: date("2024-03-01"),
            status: ProposalStatus::Draft,
            items: vec![LineItem {
                description: "Design".into(),
                quantity: 2.0,
                rate: 1500.0,
                amount: 0.0,
            }],
            total: 1.0,
        };
        proposal.normalize();
        assert_eq!(proposal.items[0].amount, 3000.0);
        assert_eq!(proposal.total, 3000.0);
    }
}
