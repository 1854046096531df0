use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Shown wherever a client or project reference no longer resolves.
pub const UNSPECIFIED: &str = "Unspecified";

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub pwd_hash: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Client {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Project {
    pub id: String,
    pub user_id: i64,
    pub name: String,
    pub client_id: Option<i64>,
    pub progress: i64,
    pub due: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Invoice {
    pub id: String,
    pub user_id: i64,
    pub invoice_number: String,
    pub client_id: i64,
    pub project_id: Option<String>,
    pub amount: f64,
    pub tax_rate: f64,
    pub total_amount: f64,
    pub status: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Id/name pair used to fill select boxes and resolve references.
#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct ClientOption {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct ProjectOption {
    pub id: String,
    pub name: String,
}

/// Invoice row joined with the owning client's name for the overview.
#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct RecentInvoice {
    pub id: String,
    pub invoice_number: String,
    pub client_name: Option<String>,
    pub amount: f64,
    pub status: String,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInput {
    pub name: String,
    pub client_id: i64,
    pub progress: i64,
    pub due: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceInput {
    pub client_id: i64,
    pub project_id: Option<String>,
    pub amount: f64,
    pub tax_rate: f64,
    pub status: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}
