use std::collections::HashMap;

use actix_web::{get, http::StatusCode, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use super::{
    banner_for, display_name, layout_context, page, see_other, select_options, INVOICES_PATH,
};
use crate::{
    auth::CurrentUser,
    billing, db,
    errors::AppError,
    forms::{InvoiceForm, INVOICE_STATUSES},
    models::Invoice,
    AppState,
};

#[derive(Deserialize)]
pub struct ModalQuery {
    new: Option<String>,
    edit: Option<String>,
}

#[derive(Serialize)]
struct InvoiceRow<'a> {
    #[serde(flatten)]
    invoice: &'a Invoice,
    client_name: String,
    project_name: String,
}

/// Status choices for the form; a free-text status already on the invoice stays selectable.
fn status_options(current: &str) -> Vec<super::SelectOption> {
    let mut statuses: Vec<&str> = INVOICE_STATUSES.to_vec();
    if !current.is_empty() && !statuses.contains(&current) {
        statuses.push(current);
    }
    select_options(
        statuses.into_iter().map(|s| (s, billing::status_label(s))),
        current,
    )
}

async fn invoices_page(
    state: &AppState,
    user: &CurrentUser,
    form: Option<&InvoiceForm>,
    error: Option<&str>,
    status: StatusCode,
) -> Result<HttpResponse, AppError> {
    let invoices = db::list_invoices(state, user.id()).await?;
    let clients = db::client_options(state, user.id()).await?;
    let projects = db::project_options(state, user.id()).await?;

    let client_names: HashMap<i64, String> =
        clients.iter().map(|c| (c.id, c.name.clone())).collect();
    let project_names: HashMap<String, String> =
        projects.iter().map(|p| (p.id.clone(), p.name.clone())).collect();

    let rows: Vec<InvoiceRow> = invoices
        .iter()
        .map(|invoice| InvoiceRow {
            invoice,
            client_name: display_name(&client_names, Some(&invoice.client_id)),
            project_name: display_name(&project_names, invoice.project_id.as_ref()),
        })
        .collect();

    let mut context = layout_context(user, INVOICES_PATH, "Invoices");
    context.insert("invoices", &rows);
    if let Some(form) = form {
        let client_options =
            select_options(clients.into_iter().map(|c| (c.id, c.name)), &form.client_id);
        let project_options =
            select_options(projects.into_iter().map(|p| (p.id, p.name)), &form.project_id);
        let preview_total = match (form.amount.trim().parse::<f64>(), form.tax_rate.trim().parse::<f64>()) {
            (Ok(amount), Ok(tax_rate)) => billing::calculate_total(amount, tax_rate),
            (Ok(amount), Err(_)) => amount,
            _ => 0.0,
        };
        context.insert("form", form);
        context.insert("editing", &!form.id.is_empty());
        context.insert("client_options", &client_options);
        context.insert("project_options", &project_options);
        context.insert("status_options", &status_options(&form.status));
        context.insert("preview_total", &preview_total);
    }
    if let Some(error) = error {
        context.insert("error", error);
    }
    page(status, "invoices.html", &context)
}

#[get("/dashboard/invoices")]
pub async fn invoices_handler(
    state: web::Data<AppState>,
    user: CurrentUser,
    query: web::Query<ModalQuery>,
) -> Result<impl Responder, AppError> {
    let form = match query.edit.as_deref() {
        Some(id) => {
            let invoice = db::get_invoice(&state, user.id(), id)
                .await?
                .ok_or(AppError::NotFound)?;
            Some(InvoiceForm::from_invoice(&invoice))
        }
        None if query.new.is_some() => Some(InvoiceForm::default()),
        None => None,
    };
    invoices_page(&state, &user, form.as_ref(), None, StatusCode::OK).await
}

#[post("/dashboard/invoices")]
pub async fn save_invoice_handler(
    state: web::Data<AppState>,
    user: CurrentUser,
    web::Form(form): web::Form<InvoiceForm>,
) -> Result<impl Responder, AppError> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(msg) => {
            return invoices_page(&state, &user, Some(&form), Some(&msg), StatusCode::BAD_REQUEST)
                .await
        }
    };

    let saved = match form.editing() {
        Some(id) => db::update_invoice(&state, user.id(), &id, &input).await,
        None => db::create_invoice(&state, user.id(), &input)
            .await
            .map(|_| ())
            .map_err(AppError::from),
    };
    if let Err(err) = saved {
        let msg = banner_for(err)?;
        return invoices_page(
            &state,
            &user,
            Some(&form),
            Some(&msg),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .await;
    }

    Ok(see_other(INVOICES_PATH))
}

#[post("/dashboard/invoices/{id}/delete")]
pub async fn delete_invoice_handler(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    db::delete_invoice(&state, user.id(), &path.into_inner()).await?;
    Ok(see_other(INVOICES_PATH))
}
