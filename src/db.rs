//! Owner-scoped data access. Every statement filters on `user_id`.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    billing,
    errors::AppError,
    models::{
        Client, ClientInput, ClientOption, Invoice, InvoiceInput, Project, ProjectInput,
        ProjectOption, RecentInvoice, User,
    },
    AppState,
};

fn pool(state: &AppState) -> &SqlitePool {
    &state.db_pool
}

/// Maps "0 rows touched" onto `NotFound` so foreign rows look absent.
fn affected(rows: u64) -> Result<(), AppError> {
    if rows == 0 {
        Err(AppError::NotFound)
    } else {
        Ok(())
    }
}

// Users

pub async fn get_user_by_id(state: &AppState, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool(state))
        .await
}

pub async fn get_user_by_email(state: &AppState, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool(state))
        .await
}

pub async fn create_user(
    state: &AppState,
    email: &str,
    pwd_hash: &str,
    full_name: &str,
) -> Result<User, sqlx::Error> {
    let created_at = Utc::now();
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, pwd_hash, full_name, created_at, updated_at) VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(email)
    .bind(pwd_hash)
    .bind(full_name)
    .bind(created_at)
    .bind(created_at)
    .fetch_one(pool(state))
    .await?;
    log::info!("User created: {}", user.id);
    Ok(user)
}

pub async fn update_user_profile(
    state: &AppState,
    id: i64,
    full_name: &str,
) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE users SET full_name = $1, updated_at = $2 WHERE id = $3")
        .bind(full_name)
        .bind(Utc::now())
        .bind(id)
        .execute(pool(state))
        .await?;
    affected(result.rows_affected())?;
    log::info!("Profile updated for user {}", id);
    Ok(())
}

pub async fn update_user_password(
    state: &AppState,
    id: i64,
    pwd_hash: &str,
) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE users SET pwd_hash = $1, updated_at = $2 WHERE id = $3")
        .bind(pwd_hash)
        .bind(Utc::now())
        .bind(id)
        .execute(pool(state))
        .await?;
    affected(result.rows_affected())?;
    log::info!("Password changed for user {}", id);
    Ok(())
}

// Clients

pub async fn list_clients(state: &AppState, user_id: i64) -> Result<Vec<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        "SELECT * FROM clients WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool(state))
    .await
}

pub async fn client_options(
    state: &AppState,
    user_id: i64,
) -> Result<Vec<ClientOption>, sqlx::Error> {
    sqlx::query_as::<_, ClientOption>(
        "SELECT id, name FROM clients WHERE user_id = $1 ORDER BY name ASC",
    )
    .bind(user_id)
    .fetch_all(pool(state))
    .await
}

pub async fn count_clients(state: &AppState, user_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clients WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool(state))
        .await
}

pub async fn get_client(
    state: &AppState,
    user_id: i64,
    id: i64,
) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool(state))
        .await
}

pub async fn create_client(
    state: &AppState,
    user_id: i64,
    input: &ClientInput,
) -> Result<Client, sqlx::Error> {
    let client = sqlx::query_as::<_, Client>(
        "INSERT INTO clients (user_id, name, email, phone, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(user_id)
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(Utc::now())
    .fetch_one(pool(state))
    .await?;
    log::info!("Client {} created for user {}", client.id, user_id);
    Ok(client)
}

pub async fn update_client(
    state: &AppState,
    user_id: i64,
    id: i64,
    input: &ClientInput,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE clients SET name = $1, email = $2, phone = $3 WHERE id = $4 AND user_id = $5",
    )
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(id)
    .bind(user_id)
    .execute(pool(state))
    .await?;
    affected(result.rows_affected())?;
    log::info!("Client {} updated for user {}", id, user_id);
    Ok(())
}

/// Projects and invoices that reference the client are left in place.
pub async fn delete_client(state: &AppState, user_id: i64, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM clients WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool(state))
        .await?;
    log::info!("Client with id {} deleted for user {}", id, user_id);
    Ok(())
}

// Projects

pub async fn list_projects(state: &AppState, user_id: i64) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE user_id = $1 ORDER BY created_at DESC, rowid DESC",
    )
    .bind(user_id)
    .fetch_all(pool(state))
    .await
}

pub async fn recent_projects(
    state: &AppState,
    user_id: i64,
    limit: i64,
) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE user_id = $1 ORDER BY created_at DESC, rowid DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool(state))
    .await
}

pub async fn project_options(
    state: &AppState,
    user_id: i64,
) -> Result<Vec<ProjectOption>, sqlx::Error> {
    sqlx::query_as::<_, ProjectOption>(
        "SELECT id, name FROM projects WHERE user_id = $1 ORDER BY name ASC",
    )
    .bind(user_id)
    .fetch_all(pool(state))
    .await
}

pub async fn get_project(
    state: &AppState,
    user_id: i64,
    id: &str,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool(state))
        .await
}

pub async fn create_project(
    state: &AppState,
    user_id: i64,
    input: &ProjectInput,
) -> Result<Project, sqlx::Error> {
    let project = sqlx::query_as::<_, Project>(
        "INSERT INTO projects (id, user_id, name, client_id, progress, due, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(&input.name)
    .bind(input.client_id)
    .bind(input.progress)
    .bind(input.due)
    .bind(Utc::now())
    .fetch_one(pool(state))
    .await?;
    log::info!("Project {} created for user {}", project.id, user_id);
    Ok(project)
}

pub async fn update_project(
    state: &AppState,
    user_id: i64,
    id: &str,
    input: &ProjectInput,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE projects SET name = $1, client_id = $2, progress = $3, due = $4 WHERE id = $5 AND user_id = $6",
    )
    .bind(&input.name)
    .bind(input.client_id)
    .bind(input.progress)
    .bind(input.due)
    .bind(id)
    .bind(user_id)
    .execute(pool(state))
    .await?;
    affected(result.rows_affected())?;
    log::info!("Project {} updated for user {}", id, user_id);
    Ok(())
}

pub async fn delete_project(state: &AppState, user_id: i64, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool(state))
        .await?;
    log::info!("Project with id {} deleted for user {}", id, user_id);
    Ok(())
}

// Invoices

pub async fn list_invoices(state: &AppState, user_id: i64) -> Result<Vec<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        "SELECT * FROM invoices WHERE user_id = $1 ORDER BY created_at DESC, rowid DESC",
    )
    .bind(user_id)
    .fetch_all(pool(state))
    .await
}

pub async fn recent_invoices(
    state: &AppState,
    user_id: i64,
    limit: i64,
) -> Result<Vec<RecentInvoice>, sqlx::Error> {
    sqlx::query_as::<_, RecentInvoice>(
        r#"
        SELECT i.id, i.invoice_number, c.name AS client_name, i.amount, i.status, i.due_date
        FROM invoices i
        LEFT JOIN clients c ON c.id = i.client_id AND c.user_id = i.user_id
        WHERE i.user_id = $1
        ORDER BY i.created_at DESC, i.rowid DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool(state))
    .await
}

pub async fn get_invoice(
    state: &AppState,
    user_id: i64,
    id: &str,
) -> Result<Option<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool(state))
        .await
}

/// Issues the next `INV-` number for the user and inserts in one transaction.
pub async fn create_invoice(
    state: &AppState,
    user_id: i64,
    input: &InvoiceInput,
) -> Result<Invoice, sqlx::Error> {
    let mut tx = pool(state).begin().await?;

    let existing: Vec<String> =
        sqlx::query_scalar("SELECT invoice_number FROM invoices WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await?;
    let invoice_number = billing::next_invoice_number(existing.iter().map(String::as_str));
    let total_amount = billing::calculate_total(input.amount, input.tax_rate);

    let invoice = sqlx::query_as::<_, Invoice>(
        r#"
        INSERT INTO invoices (id, user_id, invoice_number, client_id, project_id, amount, tax_rate,
                              total_amount, status, issue_date, due_date, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(&invoice_number)
    .bind(input.client_id)
    .bind(&input.project_id)
    .bind(input.amount)
    .bind(input.tax_rate)
    .bind(total_amount)
    .bind(&input.status)
    .bind(input.issue_date)
    .bind(input.due_date)
    .bind(&input.notes)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    log::info!("Invoice {} created for user {}", invoice.invoice_number, user_id);
    Ok(invoice)
}

pub async fn update_invoice(
    state: &AppState,
    user_id: i64,
    id: &str,
    input: &InvoiceInput,
) -> Result<(), AppError> {
    let total_amount = billing::calculate_total(input.amount, input.tax_rate);
    let result = sqlx::query(
        r#"
        UPDATE invoices
        SET client_id = $1, project_id = $2, amount = $3, tax_rate = $4, total_amount = $5,
            status = $6, issue_date = $7, due_date = $8, notes = $9
        WHERE id = $10 AND user_id = $11
        "#,
    )
    .bind(input.client_id)
    .bind(&input.project_id)
    .bind(input.amount)
    .bind(input.tax_rate)
    .bind(total_amount)
    .bind(&input.status)
    .bind(input.issue_date)
    .bind(input.due_date)
    .bind(&input.notes)
    .bind(id)
    .bind(user_id)
    .execute(pool(state))
    .await?;
    affected(result.rows_affected())?;
    log::info!("Invoice {} updated for user {}", id, user_id);
    Ok(())
}

pub async fn delete_invoice(state: &AppState, user_id: i64, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM invoices WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool(state))
        .await?;
    log::info!("Invoice with id {} deleted for user {}", id, user_id);
    Ok(())
}
