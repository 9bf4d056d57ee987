mod common;

use actix_web::{http::header, http::StatusCode, test, App};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};
use std::sync::Arc;

use common::{bearer, context_with, default_context, register_user, StubRenderer, FAKE_PDF};
use genai_report_server::ai::ReportGenerator;
use genai_report_server::configure_routes;

#[actix_web::test]
async fn test_missing_file_is_not_found_with_or_without_token() {
    let ctx = default_context().await;
    let (_, token) = register_user(&ctx.state, "alice").await;
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .configure(configure_routes),
    )
    .await;

    for uri in ["/download/report_1_99.pdf", "/download-json/report_1_99.pdf"] {
        let anonymous = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, anonymous).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Report file not found");

        let authenticated = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(
            test::call_service(&app, authenticated).await.status(),
            StatusCode::NOT_FOUND
        );
    }
}

#[actix_web::test]
async fn test_existing_file_requires_authentication() {
    let ctx = default_context().await;
    std::fs::write(ctx.report_path("report_1_10.pdf"), FAKE_PDF).unwrap();
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/download/report_1_10.pdf")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_download_generated_report() {
    let ctx = default_context().await;
    let (_, token) = register_user(&ctx.state, "alice").await;
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/generate-report")
        .insert_header(bearer(&token))
        .set_json(json!({"topic": "Batteries"}))
        .to_request();
    let generated: Value = test::call_and_read_body_json(&app, req).await;
    let filename = generated["filename"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/download/{}", filename))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains(&filename));
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    assert_eq!(test::read_body(resp).await.as_ref(), FAKE_PDF);
}

#[actix_web::test]
async fn test_download_json_encodes_file() {
    let ctx = default_context().await;
    let (_, token) = register_user(&ctx.state, "alice").await;
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/generate-enhanced-report")
        .insert_header(bearer(&token))
        .set_json(json!({"topic": "Batteries", "additional_context": "EVs"}))
        .to_request();
    let generated: Value = test::call_and_read_body_json(&app, req).await;
    let filename = generated["filename"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/download-json/{}", filename))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["filename"], filename);
    assert_eq!(body["mime_type"], "application/pdf");
    assert_eq!(body["size"], FAKE_PDF.len() as u64);
    let decoded = STANDARD.decode(body["content"].as_str().unwrap()).unwrap();
    assert_eq!(decoded, FAKE_PDF);
}

#[actix_web::test]
async fn test_foreign_report_is_served_in_permissive_mode() {
    let ctx = default_context().await;
    let (_, alice) = register_user(&ctx.state, "alice").await;
    let (_, mallory) = register_user(&ctx.state, "mallory").await;
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/generate-report")
        .insert_header(bearer(&alice))
        .set_json(json!({"topic": "Secrets"}))
        .to_request();
    let generated: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/download/{}", generated["filename"].as_str().unwrap()))
        .insert_header(bearer(&mallory))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_foreign_report_is_forbidden_in_strict_mode() {
    let ctx = context_with(
        ReportGenerator::fallback_only(),
        Arc::new(StubRenderer),
        |config| config.strict_download_ownership = true,
    )
    .await;
    let (_, alice) = register_user(&ctx.state, "alice").await;
    let (_, mallory) = register_user(&ctx.state, "mallory").await;
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/generate-report")
        .insert_header(bearer(&alice))
        .set_json(json!({"topic": "Secrets"}))
        .to_request();
    let generated: Value = test::call_and_read_body_json(&app, req).await;
    let filename = generated["filename"].as_str().unwrap();

    for (token, expected) in [(&mallory, StatusCode::FORBIDDEN), (&alice, StatusCode::OK)] {
        let req = test::TestRequest::get()
            .uri(&format!("/download-json/{}", filename))
            .insert_header(bearer(token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), expected);
    }
}

#[actix_web::test]
async fn test_path_traversal_is_not_found() {
    let ctx = default_context().await;
    let (_, token) = register_user(&ctx.state, "alice").await;
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/download/..%2Foutside.pdf")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}
