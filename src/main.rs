use actix_web::HttpServer;
use freelancer_dashboard::{
    app::{build_app, SessionSettings},
    config::Config,
    connect_pool, migrate, AppState,
};
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()?;
    info!("Loaded configuration: {:?}", config);

    let db_pool = connect_pool(&config.database_url).await?;
    migrate(&db_pool).await?;
    info!("Database migrated successfully");

    let state = AppState {
        db_pool,
        session_cookie_prefix: config.session_cookie_prefix.clone(),
        site_url: config.site_url.clone(),
    };
    let session = SessionSettings {
        key: config.session_key.clone(),
        cookie_secure: config.session_cookie_secure,
    };

    info!("Starting HTTP server on http://{}:{}/", config.host, config.port);

    HttpServer::new(move || build_app(state.clone(), session.clone()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
