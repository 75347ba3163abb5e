//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::health::HealthState;
use backend::inbound::http::routes::configure_api;
use backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    max_upload_bytes: usize,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        max_upload_bytes,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::PayloadConfig::new(max_upload_bytes))
        .wrap(Trace)
        .configure(configure_api);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is bound.
/// - `config`: pre-built [`ServerConfig`] holding the listener address, media
///   store, optional database pool and optional metrics.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        bind_addr,
        max_upload_bytes,
        #[cfg(feature = "metrics")]
        prometheus,
        ..
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            max_upload_bytes,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use backend::inbound::http::state::DEFAULT_MEDIA_URL;
    use backend::outbound::media::CapStdRecipeImageStore;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::net::SocketAddr;

    fn config(dir: &tempfile::TempDir, limit: usize) -> ServerConfig {
        let store = CapStdRecipeImageStore::open(dir.path()).expect("media root");
        ServerConfig::new(
            SocketAddr::from(([127, 0, 0, 1], 0)),
            store,
            DEFAULT_MEDIA_URL,
            limit,
        )
    }

    #[rstest]
    #[actix_web::test]
    async fn uploads_over_the_limit_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config(&dir, 16);
        let app = actix_test::init_service(build_app(AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: build_http_state(&config),
            max_upload_bytes: config.max_upload_bytes,
        }))
        .await;
        let credentials = json!({"email": "cook@example.com", "password": "testpass123"});
        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/user/create/")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let token: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/user/token/")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        let auth = format!("Token {}", token["token"].as_str().expect("token"));
        let recipe: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/recipe/recipes/")
                .insert_header(("authorization", auth.clone()))
                .set_json(json!({"title": "Bread", "time_minutes": 60, "price": "2.00"}))
                .to_request(),
        )
        .await;
        let id = recipe["id"].as_i64().expect("recipe id");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/recipe/recipes/{id}/upload-image/"))
                .insert_header(("authorization", auth))
                .insert_header(("content-type", "image/png"))
                .insert_header(("content-disposition", "attachment; filename=\"big.png\""))
                .set_payload(vec![0_u8; 64])
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_follows_the_health_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config(&dir, 1024);
        let health_state = web::Data::new(HealthState::new());
        let app = actix_test::init_service(build_app(AppDependencies {
            health_state: health_state.clone(),
            http_state: build_http_state(&config),
            max_upload_bytes: config.max_upload_bytes,
        }))
        .await;
        let probe = || actix_test::TestRequest::get().uri("/health/ready").to_request();

        let before = actix_test::call_service(&app, probe()).await;
        health_state.mark_ready();
        let after = actix_test::call_service(&app, probe()).await;

        assert_eq!(before.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(after.status(), StatusCode::OK);
    }
}
