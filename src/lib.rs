use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpResponse, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod ai;
pub mod auth;
pub mod config;
pub mod db;
pub mod pdf;
pub mod report;
pub mod system;

pub use crate::config::AppConfig;
pub use crate::db::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::new("Unauthorized", message)
    }

    pub fn forbidden(message: &str) -> Self {
        Self::new("Forbidden", message)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new("Conflict", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&BearerAuth),
    paths(
        crate::system::handlers::root,
        crate::system::handlers::health,
        crate::system::handlers::ai_status,
        crate::auth::handlers::signup,
        crate::auth::handlers::login,
        crate::auth::handlers::me,
        crate::report::handlers::generate_report,
        crate::report::handlers::generate_enhanced_report,
        crate::report::handlers::list_reports,
        crate::report::download::download_report,
        crate::report::download::download_report_json
    ),
    components(
        schemas(
            ErrorResponse,
            auth::model::SignupRequest,
            auth::model::LoginRequest,
            auth::model::AuthResponse,
            auth::model::UserInfo,
            report::models::ReportRequest,
            report::models::EnhancedReportRequest,
            report::models::ReportGenerationResponse,
            report::models::GenerationMethod,
            report::models::ReportSummary,
            report::models::DownloadJsonResponse,
            system::handlers::ServiceInfo,
            system::handlers::HealthResponse,
            system::handlers::AiStatusResponse,
        )
    ),
    tags(
        (name = "System", description = "Service introspection endpoints."),
        (name = "Authentication", description = "Signup, login and identity."),
        (name = "Reports", description = "Report generation, listing and download.")
    )
)]
pub struct ApiDoc;

/// Register every API route.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse::bad_request(&err.to_string()));
        actix_web::error::InternalError::from_response(err, response).into()
    });

    cfg.app_data(json_config)
        .configure(system::config)
        .configure(auth::handlers::config)
        .configure(report::config);
}

fn build_cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };
    let bind_addr = (config.host.clone(), config.port);
    let cors_origins = config.cors_origins.clone();

    let app_state = match AppState::new_with_config(config).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to initialise application state. Check DATABASE_URL and REPORTS_DIR. Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("genai_report_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!("Starting server at http://{}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(build_cors(&cors_origins))
            .app_data(app_state.clone())
            .configure(configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(bind_addr)?
    .run()
    .await
}
