use actix_web::{get, http::StatusCode, web, Responder};
use serde::Serialize;

use super::{layout_context, page, OVERVIEW_PATH};
use crate::{
    auth::CurrentUser,
    db,
    errors::AppError,
    models::{RecentInvoice, UNSPECIFIED},
    overview::DashboardStats,
    AppState,
};

const RECENT_LIMIT: i64 = 5;

#[derive(Serialize)]
struct RecentInvoiceRow<'a> {
    #[serde(flatten)]
    invoice: &'a RecentInvoice,
    client: &'a str,
}

#[get("/dashboard")]
pub async fn overview_handler(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let user_id = user.id();
    let total_clients = db::count_clients(&state, user_id).await?;
    let projects = db::list_projects(&state, user_id).await?;
    let invoices = db::list_invoices(&state, user_id).await?;
    let recent_invoices = db::recent_invoices(&state, user_id, RECENT_LIMIT).await?;
    let recent_projects = db::recent_projects(&state, user_id, RECENT_LIMIT).await?;

    let today = chrono::Local::now().date_naive();
    let stats = DashboardStats::compute(total_clients, &projects, &invoices, today);

    let recent_invoice_rows: Vec<RecentInvoiceRow> = recent_invoices
        .iter()
        .map(|invoice| RecentInvoiceRow {
            invoice,
            client: invoice.client_name.as_deref().unwrap_or(UNSPECIFIED),
        })
        .collect();

    let mut context = layout_context(&user, OVERVIEW_PATH, "Overview");
    context.insert("stats", &stats);
    context.insert("has_alerts", &stats.has_alerts());
    context.insert("recent_invoices", &recent_invoice_rows);
    context.insert("recent_projects", &recent_projects);
    page(StatusCode::OK, "dashboard.html", &context)
}
