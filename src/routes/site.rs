use actix_files::NamedFile;
use actix_web::{
    get,
    http::{Method, StatusCode},
    web, Either, HttpResponse, Responder,
};
use tera::Context;

use super::{render, see_other, CLIENTS_PATH, INVOICES_PATH, OVERVIEW_PATH, PROJECTS_PATH, SETTINGS_PATH};
use crate::{errors::AppError, gate::LOGIN_PATH, AppState};

#[get("/")]
pub async fn index_handler() -> impl Responder {
    see_other(OVERVIEW_PATH)
}

#[derive(serde::Serialize)]
struct SitemapEntry {
    loc: String,
    changefreq: &'static str,
    priority: &'static str,
}

#[get("/sitemap.xml")]
pub async fn sitemap_handler(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let pages = [
        ("/", "weekly", "1.0"),
        (LOGIN_PATH, "monthly", "0.8"),
        (OVERVIEW_PATH, "daily", "0.9"),
        (CLIENTS_PATH, "daily", "0.7"),
        (PROJECTS_PATH, "daily", "0.7"),
        (INVOICES_PATH, "daily", "0.7"),
        (SETTINGS_PATH, "monthly", "0.6"),
    ];
    let entries: Vec<SitemapEntry> = pages
        .iter()
        .map(|&(path, changefreq, priority)| SitemapEntry {
            loc: format!("{}{}", state.site_url, path),
            changefreq,
            priority,
        })
        .collect();

    let mut context = Context::new();
    context.insert("entries", &entries);
    let rendered = render("sitemap.xml", &context)?;

    Ok(HttpResponse::Ok()
        .content_type("application/xml; charset=utf-8")
        .body(rendered))
}

pub async fn default_handler(req_method: Method) -> Result<impl Responder, std::io::Error> {
    match req_method {
        Method::GET => {
            let file = NamedFile::open("static/404.html")?
                .customize()
                .with_status(StatusCode::NOT_FOUND);
            Ok(Either::Left(file))
        }
        _ => Ok(Either::Right(HttpResponse::MethodNotAllowed().finish())),
    }
}
