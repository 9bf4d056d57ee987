#[actix_web::main]
async fn main() -> std::io::Result<()> {
    genai_report_server::run().await
}
