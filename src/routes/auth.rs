use actix_identity::Identity;
use actix_session::Session;
use actix_web::{
    get,
    http::StatusCode,
    post,
    web::{self, Data},
    HttpMessage, HttpRequest, HttpResponse, Responder,
};
use serde::Deserialize;
use tera::Context;

use super::{page, see_other};
use crate::{
    db,
    errors::AppError,
    forms::check_password,
    gate::{safe_redirect, LOGIN_PATH},
    password::{hash_password, verify_password},
    AppState,
};

#[derive(Deserialize)]
pub struct LoginQuery {
    redirect: Option<String>,
}

#[derive(Deserialize)]
pub struct Login {
    email: String,
    password: String,
    #[serde(default)]
    redirect: String,
}

#[derive(Deserialize)]
pub struct Register {
    email: String,
    #[serde(default)]
    full_name: String,
    password: String,
    password2: String,
}

fn login_page(
    status: StatusCode,
    email: &str,
    redirect: &str,
    error: Option<&str>,
) -> Result<HttpResponse, AppError> {
    let mut context = Context::new();
    context.insert("title", "Sign in");
    context.insert("email", email);
    context.insert("redirect", redirect);
    if let Some(error) = error {
        context.insert("error", error);
    }
    page(status, "login.html", &context)
}

fn register_page(
    status: StatusCode,
    email: &str,
    full_name: &str,
    error: Option<&str>,
) -> Result<HttpResponse, AppError> {
    let mut context = Context::new();
    context.insert("title", "Create account");
    context.insert("email", email);
    context.insert("full_name", full_name);
    if let Some(error) = error {
        context.insert("error", error);
    }
    page(status, "register.html", &context)
}

fn sign_in(request: &HttpRequest, user_id: i64) -> Result<(), AppError> {
    Identity::login(&request.extensions(), user_id.to_string())
        .map(|_| ())
        .map_err(|e| {
            log::error!("Failed to attach identity: {}", e);
            AppError::IdentityError(e.to_string())
        })
}

#[get("/login")]
pub async fn login_handler(query: web::Query<LoginQuery>) -> Result<impl Responder, AppError> {
    let redirect = safe_redirect(query.redirect.as_deref());
    login_page(StatusCode::OK, "", &redirect, None)
}

#[post("/login")]
pub async fn login_form_handler(
    web::Form(form): web::Form<Login>,
    state: Data<AppState>,
    request: HttpRequest,
) -> Result<impl Responder, AppError> {
    let redirect = safe_redirect(Some(form.redirect.as_str()));
    if form.email.trim().is_empty() || form.password.is_empty() {
        return login_page(
            StatusCode::BAD_REQUEST,
            &form.email,
            &redirect,
            Some("Email and password are required"),
        );
    }
    let lc_email = form.email.trim().to_lowercase();

    let user = db::get_user_by_email(&state, &lc_email).await?;
    let verified = match &user {
        Some(user) => verify_password(&form.password, &user.pwd_hash)?,
        None => false,
    };

    match user {
        Some(user) if verified => {
            sign_in(&request, user.id)?;
            log::info!("User {} signed in", user.id);
            Ok(see_other(&redirect))
        }
        _ => {
            log::warn!("Rejected sign-in for {}", lc_email);
            login_page(
                StatusCode::UNAUTHORIZED,
                &form.email,
                &redirect,
                Some("Invalid login credentials"),
            )
        }
    }
}

#[get("/register")]
pub async fn register_handler() -> Result<impl Responder, AppError> {
    register_page(StatusCode::OK, "", "", None)
}

#[post("/register")]
pub async fn register_form_handler(
    web::Form(form): web::Form<Register>,
    state: Data<AppState>,
    request: HttpRequest,
) -> Result<impl Responder, AppError> {
    let lc_email = form.email.trim().to_lowercase();
    let full_name = form.full_name.trim();

    let invalid = if lc_email.is_empty() {
        Some("Email is required".to_owned())
    } else if !lc_email.contains('@') {
        Some("Invalid email address".to_owned())
    } else {
        check_password(&form.password, &form.password2).err()
    };
    if let Some(error) = invalid {
        return register_page(StatusCode::BAD_REQUEST, &form.email, full_name, Some(&error));
    }

    if db::get_user_by_email(&state, &lc_email).await?.is_some() {
        return register_page(
            StatusCode::CONFLICT,
            &form.email,
            full_name,
            Some("An account with this email already exists"),
        );
    }

    let pwd_hash = hash_password(&form.password)?;
    let user = db::create_user(&state, &lc_email, &pwd_hash, full_name).await?;
    sign_in(&request, user.id)?;

    Ok(see_other(super::OVERVIEW_PATH))
}

#[post("/logout")]
pub async fn logout_handler(identity: Option<Identity>, session: Session) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    session.purge();
    see_other(LOGIN_PATH)
}
