//! Raw HTML form payloads and their validation into typed inputs.
//!
//! Every field arrives as text so a half-filled form can be rendered back to
//! the user unchanged together with the error banner.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Client, ClientInput, Invoice, InvoiceInput, Project, ProjectInput};

pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 128;

pub const INVOICE_STATUSES: [&str; 4] = ["pending", "paid", "overdue", "cancelled"];
pub const DEFAULT_STATUS: &str = "pending";

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("{} must be a date (YYYY-MM-DD)", field))
}

pub fn check_password(password: &str, confirmation: &str) -> Result<(), String> {
    if password != confirmation {
        return Err("Passwords do not match".to_owned());
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(format!(
            "Password must be at least {} characters long",
            PASSWORD_MIN_LEN
        ));
    }
    if password.chars().count() > PASSWORD_MAX_LEN {
        return Err(format!(
            "Password must be at most {} characters long",
            PASSWORD_MAX_LEN
        ));
    }
    Ok(())
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ClientForm {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ClientForm {
    pub fn from_client(client: &Client) -> Self {
        Self {
            id: client.id.to_string(),
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone().unwrap_or_default(),
        }
    }

    /// `None` for an insert, the row id for an update.
    pub fn editing(&self) -> Result<Option<i64>, String> {
        match non_empty(&self.id) {
            None => Ok(None),
            Some(id) => id
                .parse()
                .map(Some)
                .map_err(|_| "Unknown client".to_owned()),
        }
    }

    pub fn validate(&self) -> Result<ClientInput, String> {
        let name = non_empty(&self.name).ok_or("Name is required")?;
        let email = non_empty(&self.email).ok_or("Email is required")?;
        Ok(ClientInput {
            name,
            email,
            phone: non_empty(&self.phone),
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ProjectForm {
    pub id: String,
    pub name: String,
    pub client_id: String,
    pub progress: String,
    pub due: String,
}

impl ProjectForm {
    pub fn from_project(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            client_id: project.client_id.map(|id| id.to_string()).unwrap_or_default(),
            progress: project.progress.to_string(),
            due: project.due.map(|d| d.to_string()).unwrap_or_default(),
        }
    }

    pub fn editing(&self) -> Option<String> {
        non_empty(&self.id)
    }

    pub fn validate(&self) -> Result<ProjectInput, String> {
        let name = non_empty(&self.name).ok_or("Project name is required")?;
        let client_id = non_empty(&self.client_id)
            .and_then(|id| id.parse().ok())
            .ok_or("A client must be selected for the project")?;
        let progress = match non_empty(&self.progress) {
            None => 0,
            Some(raw) => {
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or("Progress must be a number")?;
                value.round() as i64
            }
        };
        if !(0..=100).contains(&progress) {
            return Err("Progress must be between 0 and 100".to_owned());
        }
        let due = match non_empty(&self.due) {
            None => None,
            Some(raw) => Some(parse_date(&raw, "Due date")?),
        };
        Ok(ProjectInput {
            name,
            client_id,
            progress,
            due,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct InvoiceForm {
    pub id: String,
    pub client_id: String,
    pub project_id: String,
    pub amount: String,
    pub tax_rate: String,
    pub status: String,
    pub issue_date: String,
    pub due_date: String,
    pub notes: String,
}

impl Default for InvoiceForm {
    fn default() -> Self {
        Self::new_for(chrono::Local::now().date_naive())
    }
}

impl InvoiceForm {
    /// Blank form with both dates set to `today`.
    pub fn new_for(today: NaiveDate) -> Self {
        Self {
            id: String::new(),
            client_id: String::new(),
            project_id: String::new(),
            amount: "0".to_owned(),
            tax_rate: "0".to_owned(),
            status: DEFAULT_STATUS.to_owned(),
            issue_date: today.to_string(),
            due_date: today.to_string(),
            notes: String::new(),
        }
    }

    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id.clone(),
            client_id: invoice.client_id.to_string(),
            project_id: invoice.project_id.clone().unwrap_or_default(),
            amount: invoice.amount.to_string(),
            tax_rate: invoice.tax_rate.to_string(),
            status: invoice.status.clone(),
            issue_date: invoice.issue_date.to_string(),
            due_date: invoice.due_date.to_string(),
            notes: invoice.notes.clone().unwrap_or_default(),
        }
    }

    pub fn editing(&self) -> Option<String> {
        non_empty(&self.id)
    }

    pub fn validate(&self) -> Result<InvoiceInput, String> {
        let client_id = non_empty(&self.client_id)
            .and_then(|id| id.parse().ok())
            .ok_or("A client must be selected")?;
        let amount = non_empty(&self.amount)
            .ok_or("Amount is required")?
            .parse::<f64>()
            .map_err(|_| "Amount must be a number".to_owned())?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err("Amount must be greater than zero".to_owned());
        }
        let tax_rate = match non_empty(&self.tax_rate) {
            None => 0.0,
            Some(raw) => raw
                .parse::<f64>()
                .map_err(|_| "Tax rate must be a number".to_owned())?,
        };
        if !(0.0..=100.0).contains(&tax_rate) {
            return Err("Tax rate must be between 0 and 100".to_owned());
        }
        let issue_date = parse_date(&self.issue_date, "Issue date")?;
        let due_date = parse_date(&self.due_date, "Due date")?;
        Ok(InvoiceInput {
            client_id,
            project_id: non_empty(&self.project_id),
            amount,
            tax_rate,
            status: non_empty(&self.status).unwrap_or_else(|| DEFAULT_STATUS.to_owned()),
            issue_date,
            due_date,
            notes: non_empty(&self.notes),
        })
    }
}
