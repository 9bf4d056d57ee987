//! Unauthenticated introspection endpoints.

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    #[schema(example = "AI Report Generator API")]
    pub message: String,
    #[schema(example = "2.0.0")]
    pub version: String,
    pub features: Vec<String>,
    #[schema(example = "running")]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "available")]
    pub ai_service: String,
    #[schema(example = "available")]
    pub advanced_ai_service: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AiStatusResponse {
    pub basic_ai_service_available: bool,
    pub advanced_ai_service_available: bool,
    pub memory_enabled: bool,
    pub supported_methods: Vec<String>,
    pub memory_features: Vec<String>,
}

fn availability(available: bool) -> String {
    let label = if available { "available" } else { "unavailable" };
    label.to_string()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    responses((status = 200, description = "Service information", body = ServiceInfo))
)]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(ServiceInfo {
        message: "AI Report Generator API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        features: strings(&[
            "Basic AI Reports",
            "Enhanced Reports with Context",
            "Reports Personalised from History",
        ]),
        status: "running".to_string(),
    })
}

/// Liveness and backend availability
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    let available = state.generator.is_available();
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        ai_service: availability(available),
        advanced_ai_service: availability(available),
    })
}

/// Generation capabilities
#[utoipa::path(
    get,
    path = "/ai/status",
    tag = "System",
    responses((status = 200, description = "AI capabilities", body = AiStatusResponse))
)]
pub async fn ai_status(state: web::Data<AppState>) -> impl Responder {
    let available = state.generator.is_available();
    HttpResponse::Ok().json(AiStatusResponse {
        basic_ai_service_available: available,
        advanced_ai_service_available: available,
        memory_enabled: true,
        supported_methods: strings(&["basic_reports", "enhanced_reports", "enhanced_with_memory"]),
        memory_features: strings(&["UserInterestLog", "SharedConversationHistory"]),
    })
}

/// Configure system routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health))
        .route("/ai/status", web::get().to(ai_status));
}
