use std::{future::Future, pin::Pin};

use actix_identity::Identity;
use actix_session::SessionExt;
use actix_web::{dev::Payload, web::Data, FromRequest, HttpRequest};

use crate::{db, errors::AppError, models::User, AppState};

/// The signed-in user, looked up from the identity cookie on every request.
///
/// When the cookie carries no usable identity, or the user row is gone, the
/// session is purged so the route gate stops treating the browser as signed
/// in, and the request is answered with a redirect to login.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn user(&self) -> &User {
        &self.0
    }
}

async fn identity_user_id(req: &HttpRequest) -> Option<i64> {
    let identity = Identity::extract(req).await.ok()?;
    identity.id().ok()?.parse().ok()
}

fn reject(req: &HttpRequest) -> AppError {
    log::warn!("Request to {} without a valid identity", req.path());
    req.get_session().purge();
    AppError::Unauthorized {
        redirect: req.path().to_owned(),
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let user = match (
                identity_user_id(&req).await,
                req.app_data::<Data<AppState>>(),
            ) {
                (Some(id), Some(state)) => db::get_user_by_id(state, id).await?,
                _ => None,
            };
            user.map(CurrentUser).ok_or_else(|| reject(&req))
        })
    }
}
