#[macro_use]
extern crate lazy_static;

use std::{collections::HashMap, str::FromStr, time::Duration};

use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
    SqlitePool,
};
use tera::Tera;

pub mod app;
pub mod auth;
pub mod billing;
pub mod config;
pub mod db;
pub mod errors;
pub mod forms;
pub mod gate;
pub mod models;
pub mod overview;
pub mod password;
pub mod routes;

use errors::AppError;

#[derive(Debug, Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub session_cookie_prefix: String,
    pub site_url: String,
}

lazy_static! {
    pub static ref TEMPLATES: Tera = {
        let mut tera = match Tera::new("templates/**/*") {
            Ok(t) => t,
            Err(e) => {
                log::error!("Parsing error(s): {}", e);
                ::std::process::exit(1);
            }
        };
        tera.autoescape_on(vec![".html"]);
        tera.register_filter("money", money_filter);
        tera.register_filter("status_color", status_color_filter);
        tera.register_filter("status_label", status_label_filter);
        tera.register_filter("progress_color", progress_color_filter);
        tera
    };
}

fn money_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let amount = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg("money filter expects a number"))?;
    Ok(Value::String(billing::format_money(amount)))
}

fn status_color_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let status = value.as_str().unwrap_or_default();
    Ok(Value::String(billing::status_color(status).to_owned()))
}

fn status_label_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let status = value.as_str().unwrap_or_default();
    Ok(Value::String(billing::status_label(status)))
}

fn progress_color_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let progress = value
        .as_i64()
        .ok_or_else(|| tera::Error::msg("progress_color filter expects an integer"))?;
    Ok(Value::String(billing::progress_color(progress).to_owned()))
}

/// Opens the SQLite pool (WAL, 5s busy timeout), creating the file if needed.
pub async fn connect_pool(database_url: &str) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .read_only(false)
        .busy_timeout(Duration::from_secs(5));

    Ok(SqlitePool::connect_with(opts).await?)
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!().run(pool).await?;
    Ok(())
}
