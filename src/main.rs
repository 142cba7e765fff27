use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use edulink_server::{
    app_state::AppState,
    auth::AuthMiddleware,
    config::Config,
    graphql::create_schema,
    handlers,
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    if config.is_production() {
        config.validate_for_production();
    }

    let state = AppState::new(config.clone())
        .await
        .map_err(|e| std::io::Error::other(format!("failed to initialise application: {}", e)))?;
    let schema = create_schema(state.clone());

    let bind_address = (config.web_server_host.clone(), config.web_server_port);
    log::info!(
        "starting HTTP server on {}:{} ({})",
        bind_address.0,
        bind_address.1,
        config.app_env
    );
    log::info!(
        "GraphiQL playground: http://{}:{}/graphiql",
        bind_address.0,
        bind_address.1
    );

    let cors_origin = config.cors_allowed_origin.clone();

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(schema.clone()))
            .app_data(web::Data::from(state.jwt_service.clone()))
            .wrap(RequestIdMiddleware)
            .wrap(Logger::default())
            .wrap(cors)
            .service(handlers::health_check)
            .service(handlers::health_check_ready)
            .service(handlers::graphiql)
            .service(
                web::resource("/graphql")
                    .wrap(AuthMiddleware)
                    .route(web::post().to(handlers::graphql_handler)),
            )
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(handlers::configure_api),
            )
    })
    .bind(bind_address)?
    .run()
    .await
}
