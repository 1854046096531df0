//! Cookie-presence route gate in front of `/login` and `/dashboard`.
//!
//! The gate only looks at cookie names. Handlers still resolve the identity
//! themselves through [`crate::auth::CurrentUser`].

use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::{ServiceRequest, ServiceResponse},
    http::{header, StatusCode},
    middleware::Next,
    web::Data,
    Error, HttpResponse,
};

use crate::{config, AppState};

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    /// Send the visitor to login, remembering where they were going.
    ToLogin { redirect: String },
    ToDashboard,
}

pub fn decide(path: &str, has_session: bool) -> GateDecision {
    let is_auth_route = path.starts_with(LOGIN_PATH);
    let is_dashboard_route = path.starts_with(DASHBOARD_PATH);

    if is_dashboard_route && !has_session {
        return GateDecision::ToLogin {
            redirect: path.to_owned(),
        };
    }
    if is_auth_route && has_session {
        return GateDecision::ToDashboard;
    }
    GateDecision::Pass
}

pub fn login_url(redirect: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect", redirect)
        .finish();
    format!("{}?{}", LOGIN_PATH, query)
}

/// Post-login target: local paths only, everything else lands on the dashboard.
pub fn safe_redirect(target: Option<&str>) -> String {
    match target {
        Some(t) if is_local_path(t) => t.to_owned(),
        _ => DASHBOARD_PATH.to_owned(),
    }
}

// Browsers drop tabs and newlines inside URLs, so "/\t/host" would become "//host".
fn is_local_path(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.contains('\\')
        && !target
            .chars()
            .any(|c| c.is_ascii_control() || c.is_whitespace())
}

/// Any cookie under the prefix counts, not just the session cookie itself.
/// Leftover prefixed cookies are expired by [`route_gate`] when a dashboard
/// handler bounces the request back to login.
pub fn has_session_cookie<'a, I>(cookie_names: I, prefix: &str) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    cookie_names.into_iter().any(|name| name.starts_with(prefix))
}

fn is_login_redirect<B>(res: &ServiceResponse<B>) -> bool {
    res.status() == StatusCode::SEE_OTHER
        && res
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|location| location.starts_with(LOGIN_PATH))
}

pub async fn route_gate(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let prefix = req
        .app_data::<Data<AppState>>()
        .map(|state| state.session_cookie_prefix.clone())
        .unwrap_or_default();

    let prefixed: Vec<String> = if prefix.is_empty() {
        Vec::new()
    } else {
        req.cookies()
            .map(|cookies| {
                cookies
                    .iter()
                    .map(|c| c.name().to_owned())
                    .filter(|name| name.starts_with(&prefix))
                    .collect()
            })
            .unwrap_or_default()
    };
    let has_session = has_session_cookie(prefixed.iter().map(String::as_str), &prefix);

    let location = match decide(req.path(), has_session) {
        GateDecision::Pass => {
            let on_dashboard = req.path().starts_with(DASHBOARD_PATH);
            let mut res = next.call(req).await?;
            if on_dashboard && is_login_redirect(&res) {
                // The session middleware expires its own cookie.
                let session_cookie = config::session_cookie_name(&prefix);
                for name in prefixed.into_iter().filter(|name| *name != session_cookie) {
                    let mut removal = Cookie::new(name, "");
                    removal.set_path("/");
                    removal.make_removal();
                    res.response_mut().add_cookie(&removal)?;
                }
            }
            return Ok(res.map_into_left_body());
        }
        GateDecision::ToLogin { redirect } => {
            log::debug!("No session cookie, redirecting {} to login", redirect);
            login_url(&redirect)
        }
        GateDecision::ToDashboard => DASHBOARD_PATH.to_owned(),
    };

    let response = HttpResponse::SeeOther()
        .append_header((header::LOCATION, location))
        .finish();
    Ok(req.into_response(response).map_into_right_body())
}
