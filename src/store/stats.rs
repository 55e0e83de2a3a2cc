use chrono::NaiveDate;
use serde::Serialize;

use super::records::TaskStatus;
use super::AppState;
use crate::invoice::InvoiceStatus;

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_clients: usize,
    pub total_projects: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub total_invoices: usize,
    pub paid_invoices: usize,
    /// Sum of totals of paid invoices
    pub total_revenue: f64,
    /// Sum of totals of pending and overdue invoices
    pub pending_amount: f64,
    pub overdue_tasks: usize,
}

impl DashboardStats {
    pub fn collect(state: &AppState, today: NaiveDate) -> Self {
        Self {
            total_clients: state.clients.len(),
            total_projects: state.projects.len(),
            total_tasks: state.tasks.len(),
            completed_tasks: state
                .tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count(),
            total_invoices: state.invoices.len(),
            paid_invoices: state
                .invoices
                .iter()
                .filter(|i| i.status == InvoiceStatus::Paid)
                .count(),
            total_revenue: invoice_sum(state, &[InvoiceStatus::Paid]),
            pending_amount: invoice_sum(state, &[InvoiceStatus::Pending, InvoiceStatus::Overdue]),
            overdue_tasks: state.tasks.iter().filter(|t| t.is_overdue(today)).count(),
        }
    }
}

fn invoice_sum(state: &AppState, wanted: &[InvoiceStatus]) -> f64 {
    state
        .invoices
        .iter()
        .filter(|i| wanted.contains(&i.status))
        .map(|i| i.totals().total)
        .sum()
}
