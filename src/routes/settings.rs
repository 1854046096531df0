use actix_web::{get, http::StatusCode, post, web, HttpResponse, Responder};
use serde::Deserialize;

use super::{layout_context, page, SETTINGS_PATH};
use crate::{
    auth::CurrentUser,
    db,
    errors::AppError,
    forms::check_password,
    password::{hash_password, verify_password},
    AppState,
};

#[derive(Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    full_name: String,
}

#[derive(Deserialize)]
pub struct ChangePwdForm {
    #[serde(default)]
    current_password: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    password2: String,
}

enum Banner<'a> {
    Success(&'a str),
    Error(&'a str),
}

fn settings_page(
    user: &CurrentUser,
    full_name: &str,
    banner: Option<Banner>,
    status: StatusCode,
) -> Result<HttpResponse, AppError> {
    let mut context = layout_context(user, SETTINGS_PATH, "Settings");
    context.insert("full_name", full_name);
    match banner {
        Some(Banner::Success(msg)) => context.insert("message", msg),
        Some(Banner::Error(msg)) => context.insert("error", msg),
        None => {}
    }
    page(status, "settings.html", &context)
}

#[get("/dashboard/settings")]
pub async fn settings_handler(user: CurrentUser) -> Result<impl Responder, AppError> {
    let full_name = user.user().full_name.clone();
    settings_page(&user, &full_name, None, StatusCode::OK)
}

#[post("/dashboard/settings/profile")]
pub async fn profile_form_handler(
    state: web::Data<AppState>,
    user: CurrentUser,
    web::Form(form): web::Form<ProfileForm>,
) -> Result<impl Responder, AppError> {
    let full_name = form.full_name.trim();
    db::update_user_profile(&state, user.id(), full_name).await?;
    settings_page(
        &user,
        full_name,
        Some(Banner::Success("Profile updated")),
        StatusCode::OK,
    )
}

#[post("/dashboard/settings/password")]
pub async fn password_form_handler(
    state: web::Data<AppState>,
    user: CurrentUser,
    web::Form(form): web::Form<ChangePwdForm>,
) -> Result<impl Responder, AppError> {
    let full_name = user.user().full_name.clone();

    if !verify_password(&form.current_password, &user.user().pwd_hash)? {
        log::warn!("Old password verification failed for user ID: {}", user.id());
        return settings_page(
            &user,
            &full_name,
            Some(Banner::Error("Current password is incorrect")),
            StatusCode::UNAUTHORIZED,
        );
    }
    if let Err(msg) = check_password(&form.password, &form.password2) {
        return settings_page(
            &user,
            &full_name,
            Some(Banner::Error(&msg)),
            StatusCode::BAD_REQUEST,
        );
    }

    let new_pwd_hash = hash_password(&form.password)?;
    db::update_user_password(&state, user.id(), &new_pwd_hash).await?;
    log::info!("Password changed successfully for user ID: {}", user.id());

    settings_page(
        &user,
        &full_name,
        Some(Banner::Success("Password changed")),
        StatusCode::OK,
    )
}
