#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    cookie::{Cookie, Key},
    dev::ServiceResponse,
    http::header,
    test,
};
use freelancer_dashboard::{app::SessionSettings, migrate, AppState};
use sqlx::sqlite::SqlitePoolOptions;

pub const PASSWORD: &str = "hunter2hunter2";
pub const COOKIE_NAME: &str = "fd-session";

/// Fresh in-memory database with migrations applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn test_state() -> AppState {
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    migrate(&db_pool).await.expect("migrations");

    AppState {
        db_pool,
        session_cookie_prefix: "fd-".to_owned(),
        site_url: "https://desk.example.com".to_owned(),
    }
}

pub fn session_settings() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
    }
}

pub fn register_request(email: &str) -> test::TestRequest {
    test::TestRequest::post().uri("/register").set_form([
        ("email", email),
        ("full_name", "Test User"),
        ("password", PASSWORD),
        ("password2", PASSWORD),
    ])
}

pub fn login_request(email: &str, password: &str, redirect: &str) -> test::TestRequest {
    test::TestRequest::post().uri("/login").set_form([
        ("email", email),
        ("password", password),
        ("redirect", redirect),
    ])
}

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == COOKIE_NAME)
        .map(|c| c.into_owned())
        .expect("session cookie set")
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .unwrap()
        .to_owned()
}

pub async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}
