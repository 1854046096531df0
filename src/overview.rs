use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Invoice, Project};

/// Figures shown on the dashboard landing page.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_clients: i64,
    pub total_projects: usize,
    pub total_invoices: usize,
    pub total_revenue: f64,
    pub pending_invoices: usize,
    pub overdue_invoices: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub completed_percent: f64,
    pub active_percent: f64,
}

impl DashboardStats {
    /// Revenue counts only `paid` invoices; an invoice is overdue when it is
    /// still `pending` after its due date.
    pub fn compute(
        total_clients: i64,
        projects: &[Project],
        invoices: &[Invoice],
        today: NaiveDate,
    ) -> Self {
        let completed_projects = projects.iter().filter(|p| p.progress >= 100).count();
        let active_projects = projects.len() - completed_projects;

        let total_revenue: f64 = invoices
            .iter()
            .filter(|inv| inv.status == "paid")
            .map(|inv| inv.total_amount)
            .sum();
        let pending_invoices = invoices.iter().filter(|inv| inv.status == "pending").count();
        let overdue_invoices = invoices
            .iter()
            .filter(|inv| inv.status == "pending" && inv.due_date < today)
            .count();

        let denominator = projects.len().max(1) as f64;

        DashboardStats {
            total_clients,
            total_projects: projects.len(),
            total_invoices: invoices.len(),
            total_revenue,
            pending_invoices,
            overdue_invoices,
            active_projects,
            completed_projects,
            completed_percent: completed_projects as f64 / denominator * 100.0,
            active_percent: active_projects as f64 / denominator * 100.0,
        }
    }

    pub fn has_alerts(&self) -> bool {
        self.pending_invoices > 0 || self.overdue_invoices > 0
    }
}
