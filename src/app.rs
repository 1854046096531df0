use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{
    body::MessageBody,
    cookie::Key,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{self, from_fn},
    web::{self, Data},
    App, Error,
};

use crate::{config, gate, routes, AppState};

/// Session cookie settings shared by the server and the integration tests.
#[derive(Clone)]
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
}

pub fn build_app(
    state: AppState,
    session: SessionSettings,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let cookie_name = config::session_cookie_name(&state.session_cookie_prefix);

    App::new()
        // enable automatic response compression - usually register this first
        .wrap(middleware::Compress::default())
        .wrap(from_fn(gate::route_gate))
        .wrap(IdentityMiddleware::default())
        .wrap(
            SessionMiddleware::builder(CookieSessionStore::default(), session.key)
                .cookie_name(cookie_name)
                .cookie_secure(session.cookie_secure)
                .build(),
        )
        // enable logger - always register Actix Web Logger middleware last
        .wrap(middleware::Logger::default())
        .app_data(Data::new(state))
        .service(Files::new("/static", "static"))
        .configure(routes::configure)
        .default_service(web::to(routes::site::default_handler))
}
