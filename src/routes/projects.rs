use std::collections::HashMap;

use actix_web::{get, http::StatusCode, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use super::{
    banner_for, display_name, layout_context, page, see_other, select_options, PROJECTS_PATH,
};
use crate::{
    auth::CurrentUser,
    db,
    errors::AppError,
    forms::ProjectForm,
    models::Project,
    AppState,
};

#[derive(Deserialize)]
pub struct ModalQuery {
    new: Option<String>,
    edit: Option<String>,
}

#[derive(Serialize)]
struct ProjectRow<'a> {
    #[serde(flatten)]
    project: &'a Project,
    client_name: String,
}

async fn projects_page(
    state: &AppState,
    user: &CurrentUser,
    form: Option<&ProjectForm>,
    error: Option<&str>,
    status: StatusCode,
) -> Result<HttpResponse, AppError> {
    let projects = db::list_projects(state, user.id()).await?;
    let clients = db::client_options(state, user.id()).await?;

    let names: HashMap<i64, String> = clients.iter().map(|c| (c.id, c.name.clone())).collect();
    let rows: Vec<ProjectRow> = projects
        .iter()
        .map(|project| ProjectRow {
            project,
            client_name: display_name(&names, project.client_id.as_ref()),
        })
        .collect();

    let mut context = layout_context(user, PROJECTS_PATH, "Projects");
    context.insert("projects", &rows);
    if let Some(form) = form {
        let options = select_options(clients.into_iter().map(|c| (c.id, c.name)), &form.client_id);
        context.insert("form", form);
        context.insert("editing", &!form.id.is_empty());
        context.insert("client_options", &options);
    }
    if let Some(error) = error {
        context.insert("error", error);
    }
    page(status, "projects.html", &context)
}

#[get("/dashboard/projects")]
pub async fn projects_handler(
    state: web::Data<AppState>,
    user: CurrentUser,
    query: web::Query<ModalQuery>,
) -> Result<impl Responder, AppError> {
    let form = match query.edit.as_deref() {
        Some(id) => {
            let project = db::get_project(&state, user.id(), id)
                .await?
                .ok_or(AppError::NotFound)?;
            Some(ProjectForm::from_project(&project))
        }
        None if query.new.is_some() => Some(ProjectForm::default()),
        None => None,
    };
    projects_page(&state, &user, form.as_ref(), None, StatusCode::OK).await
}

#[post("/dashboard/projects")]
pub async fn save_project_handler(
    state: web::Data<AppState>,
    user: CurrentUser,
    web::Form(form): web::Form<ProjectForm>,
) -> Result<impl Responder, AppError> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(msg) => {
            return projects_page(&state, &user, Some(&form), Some(&msg), StatusCode::BAD_REQUEST)
                .await
        }
    };

    let saved = match form.editing() {
        Some(id) => db::update_project(&state, user.id(), &id, &input).await,
        None => db::create_project(&state, user.id(), &input)
            .await
            .map(|_| ())
            .map_err(AppError::from),
    };
    if let Err(err) = saved {
        let msg = banner_for(err)?;
        return projects_page(
            &state,
            &user,
            Some(&form),
            Some(&msg),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .await;
    }

    Ok(see_other(PROJECTS_PATH))
}

#[post("/dashboard/projects/{id}/delete")]
pub async fn delete_project_handler(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    db::delete_project(&state, user.id(), &path.into_inner()).await?;
    Ok(see_other(PROJECTS_PATH))
}
