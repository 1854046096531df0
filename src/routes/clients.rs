use actix_web::{get, http::StatusCode, post, web, HttpResponse, Responder};
use serde::Deserialize;

use super::{banner_for, layout_context, page, see_other, CLIENTS_PATH};
use crate::{auth::CurrentUser, db, errors::AppError, forms::ClientForm, AppState};

/// `?new=1` opens an empty form, `?edit=<id>` a pre-filled one.
#[derive(Deserialize)]
pub struct ModalQuery {
    new: Option<String>,
    edit: Option<i64>,
}

async fn clients_page(
    state: &AppState,
    user: &CurrentUser,
    form: Option<&ClientForm>,
    error: Option<&str>,
    status: StatusCode,
) -> Result<HttpResponse, AppError> {
    let clients = db::list_clients(state, user.id()).await?;

    let mut context = layout_context(user, CLIENTS_PATH, "Clients");
    context.insert("clients", &clients);
    if let Some(form) = form {
        context.insert("form", form);
        context.insert("editing", &!form.id.is_empty());
    }
    if let Some(error) = error {
        context.insert("error", error);
    }
    page(status, "clients.html", &context)
}

#[get("/dashboard/clients")]
pub async fn clients_handler(
    state: web::Data<AppState>,
    user: CurrentUser,
    query: web::Query<ModalQuery>,
) -> Result<impl Responder, AppError> {
    let form = match query.edit {
        Some(id) => {
            let client = db::get_client(&state, user.id(), id)
                .await?
                .ok_or(AppError::NotFound)?;
            Some(ClientForm::from_client(&client))
        }
        None if query.new.is_some() => Some(ClientForm::default()),
        None => None,
    };
    clients_page(&state, &user, form.as_ref(), None, StatusCode::OK).await
}

#[post("/dashboard/clients")]
pub async fn save_client_handler(
    state: web::Data<AppState>,
    user: CurrentUser,
    web::Form(form): web::Form<ClientForm>,
) -> Result<impl Responder, AppError> {
    let checked = form.editing().and_then(|id| form.validate().map(|input| (id, input)));
    let (editing, input) = match checked {
        Ok(checked) => checked,
        Err(msg) => {
            return clients_page(&state, &user, Some(&form), Some(&msg), StatusCode::BAD_REQUEST)
                .await
        }
    };

    let saved = match editing {
        Some(id) => db::update_client(&state, user.id(), id, &input).await,
        None => db::create_client(&state, user.id(), &input)
            .await
            .map(|_| ())
            .map_err(AppError::from),
    };
    if let Err(err) = saved {
        let msg = banner_for(err)?;
        return clients_page(
            &state,
            &user,
            Some(&form),
            Some(&msg),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .await;
    }

    Ok(see_other(CLIENTS_PATH))
}

#[post("/dashboard/clients/{id}/delete")]
pub async fn delete_client_handler(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    db::delete_client(&state, user.id(), path.into_inner()).await?;
    Ok(see_other(CLIENTS_PATH))
}
