use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// How a report's text was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    BasicAi,
    EnhancedWithContext,
    EnhancedWithMemory,
}

impl GenerationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMethod::BasicAi => "basic_ai",
            GenerationMethod::EnhancedWithContext => "enhanced_with_context",
            GenerationMethod::EnhancedWithMemory => "enhanced_with_memory",
        }
    }

    /// Filename prefix of PDFs produced by this method.
    pub fn filename_prefix(&self) -> &'static str {
        match self {
            GenerationMethod::BasicAi => "report",
            _ => "enhanced_report",
        }
    }
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored report row. `generation_method` is `None` on stores without
/// the column and on rows written before it existed.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Report {
    pub id: i64,
    pub user_id: i64,
    pub topic: String,
    pub filename: String,
    pub file_path: String,
    pub created_at: Option<String>,
    pub generation_method: Option<String>,
}

/// Values for a new report row.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub user_id: i64,
    pub topic: String,
    pub filename: String,
    pub file_path: String,
    pub generation_method: GenerationMethod,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReportRequest {
    #[schema(example = "Renewable energy storage")]
    pub topic: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EnhancedReportRequest {
    #[schema(example = "Renewable energy storage")]
    pub topic: String,
    #[serde(default)]
    #[schema(example = "Focus on grid-scale batteries in Europe")]
    pub additional_context: String,
    /// Personalise from recent generation history instead of the context.
    #[serde(default)]
    pub include_memory: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportGenerationResponse {
    pub content: String,
    #[schema(example = "report_1_5234.pdf")]
    pub filename: String,
    pub generation_method: GenerationMethod,
}

/// Entry of `GET /reports`.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ReportSummary {
    pub id: i64,
    pub topic: String,
    pub filename: String,
    #[schema(example = "basic_ai")]
    pub generation_method: Option<String>,
    pub created_at: Option<String>,
}

impl From<Report> for ReportSummary {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            topic: report.topic,
            filename: report.filename,
            generation_method: report.generation_method,
            created_at: report.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadJsonResponse {
    pub filename: String,
    /// Base64 of the file bytes.
    pub content: String,
    pub size: u64,
    #[schema(example = "application/pdf")]
    pub mime_type: String,
}
