use std::collections::HashMap;

use actix_web::{http::header, http::StatusCode, web, HttpResponse};
use serde::Serialize;
use tera::Context;

use crate::{auth::CurrentUser, errors::AppError, TEMPLATES};

pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod invoices;
pub mod projects;
pub mod settings;
pub mod site;

pub const OVERVIEW_PATH: &str = "/dashboard";
pub const CLIENTS_PATH: &str = "/dashboard/clients";
pub const PROJECTS_PATH: &str = "/dashboard/projects";
pub const INVOICES_PATH: &str = "/dashboard/invoices";
pub const SETTINGS_PATH: &str = "/dashboard/settings";

const NAV_LINKS: [(&str, &str); 5] = [
    ("Overview", OVERVIEW_PATH),
    ("Clients", CLIENTS_PATH),
    ("Projects", PROJECTS_PATH),
    ("Invoices", INVOICES_PATH),
    ("Settings", SETTINGS_PATH),
];

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(site::index_handler)
        .service(site::sitemap_handler)
        .service(auth::login_handler)
        .service(auth::login_form_handler)
        .service(auth::register_handler)
        .service(auth::register_form_handler)
        .service(auth::logout_handler)
        .service(dashboard::overview_handler)
        .service(clients::clients_handler)
        .service(clients::save_client_handler)
        .service(clients::delete_client_handler)
        .service(projects::projects_handler)
        .service(projects::save_project_handler)
        .service(projects::delete_project_handler)
        .service(invoices::invoices_handler)
        .service(invoices::save_invoice_handler)
        .service(invoices::delete_invoice_handler)
        .service(settings::settings_handler)
        .service(settings::profile_form_handler)
        .service(settings::password_form_handler);
}

#[derive(Serialize, Debug, PartialEq)]
struct NavLink {
    label: &'static str,
    href: &'static str,
    active: bool,
}

/// The overview link only matches exactly; the others match their subtree.
fn is_active(href: &str, current: &str) -> bool {
    if href == OVERVIEW_PATH {
        current == OVERVIEW_PATH
    } else {
        current.starts_with(href)
    }
}

fn nav_links(current: &str) -> Vec<NavLink> {
    NAV_LINKS
        .iter()
        .map(|&(label, href)| NavLink {
            label,
            href,
            active: is_active(href, current),
        })
        .collect()
}

/// Context shared by every dashboard page: header identity and sidebar.
pub(crate) fn layout_context(user: &CurrentUser, current: &str, title: &str) -> Context {
    let mut context = Context::new();
    context.insert("title", title);
    context.insert("user", user.user());
    context.insert("nav", &nav_links(current));
    context.insert("version", env!("CARGO_PKG_VERSION"));
    context
}

pub(crate) fn render(template: &str, context: &Context) -> Result<String, AppError> {
    TEMPLATES.render(template, context).map_err(|e| {
        log::error!("Failed to render template: {}", e);
        AppError::TemplateError(e)
    })
}

pub(crate) fn page(
    status: StatusCode,
    template: &str,
    context: &Context,
) -> Result<HttpResponse, AppError> {
    let rendered = render(template, context)?;
    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(rendered))
}

pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header((header::LOCATION, location))
        .finish()
}

/// Database failures on a save become banner text; everything else propagates.
pub(crate) fn banner_for(err: AppError) -> Result<String, AppError> {
    match err {
        AppError::DatabaseError(e) => {
            log::error!("Save failed: {}", e);
            Ok(format!("Could not save: {}", e))
        }
        other => Err(other),
    }
}

#[derive(Serialize, Debug, PartialEq)]
pub(crate) struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub(crate) fn select_options<I, V>(items: I, selected: &str) -> Vec<SelectOption>
where
    I: IntoIterator<Item = (V, String)>,
    V: ToString,
{
    items
        .into_iter()
        .map(|(value, label)| {
            let value = value.to_string();
            SelectOption {
                selected: value == selected,
                value,
                label,
            }
        })
        .collect()
}

/// Resolves an optional reference to a display name, `Unspecified` when dangling.
pub(crate) fn display_name<K>(names: &HashMap<K, String>, key: Option<&K>) -> String
where
    K: std::hash::Hash + Eq,
{
    key.and_then(|k| names.get(k))
        .cloned()
        .unwrap_or_else(|| crate::models::UNSPECIFIED.to_owned())
}
