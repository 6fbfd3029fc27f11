use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use leafline_core::config::Settings;
use leafline_mcp::Engine;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod error;
mod extract;
mod middleware;
mod routes;
mod state;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leafline API",
        version = "0.1.0",
        description = "Menu OCR parsing and vegetarian-dish classification with human-in-the-loop review."
    ),
    paths(
        routes::health::health_check,
        routes::menu::analyze_menu,
        routes::review::submit_review_correction,
    ),
    components(schemas(
        leafline_core::error::ApiError,
        routes::health::ComponentStatus,
        routes::health::HealthResponse,
        routes::menu::AnalyzeMenuRequest,
        leafline_core::model::MenuItem,
        leafline_core::model::Method,
        leafline_core::model::Verdict,
        leafline_core::model::Evidence,
        leafline_core::model::KeywordLabel,
        leafline_core::model::KeywordVerdict,
        leafline_core::model::ConfidentItem,
        leafline_core::model::UncertainItem,
        leafline_core::model::FinalEnvelope,
        leafline_core::model::NeedsReviewEnvelope,
        leafline_core::model::ClassifyOutcome,
        leafline_core::model::Correction,
        leafline_core::model::CorrectionInput,
    ))
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leafline_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let settings = Settings::from_env();
    let engine = Arc::new(Engine::new(&settings));
    let port = settings.port;
    let cors_layer = middleware::cors::build_cors_layer(&settings.cors_origins);

    let app_state = state::AppState {
        engine,
        settings: Arc::new(settings),
    };

    let app = Router::new()
        .merge(SwaggerUi::new("/docs").url("/v1/openapi.json", ApiDoc::openapi()))
        .merge(routes::health::router())
        .merge(routes::menu::router())
        .merge(routes::review::router())
        .layer(middleware::access_log::AccessLogLayer::new())
        .layer(middleware::request_id::propagate_request_id_layer())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .layer(middleware::request_id::set_request_id_layer())
        .with_state(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Leafline API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
