//! PDF rendering for generated reports.
//!
//! - `source` - report text to Typst source (heading detection, escaping)
//! - `engine` - Typst CLI invocation

pub mod engine;
pub mod source;

pub use engine::TypstRenderEngine;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const TEMPLATE_FILE: &str = "report.typ";

/// Errors that can occur while rendering a report to PDF.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load Typst template: {0}")]
    TemplateIo(#[source] std::io::Error),
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteSource(#[source] std::io::Error),
    #[error("failed to run Typst CLI: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {code}: {stderr}")]
    TypstExit { code: i32, stderr: String },
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders report text into a PDF file.
pub trait ReportRenderer: Send + Sync {
    /// Write a PDF for `body` to `destination`, creating missing parent
    /// directories. The title block shows `topic` and `author`.
    fn render(
        &self,
        topic: &str,
        body: &str,
        author: &str,
        destination: &Path,
    ) -> Result<(), RenderError>;
}

/// Get the static assets directory path.
pub fn get_static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

/// Write rendered bytes to `destination`, creating parent directories.
pub fn write_pdf(destination: &Path, pdf: &[u8]) -> Result<(), RenderError> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| RenderError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(destination, pdf).map_err(|source| RenderError::WriteOutput {
        path: destination.to_path_buf(),
        source,
    })
}

/// Production renderer: `static/report.typ` layout compiled by Typst.
pub struct TypstReportRenderer {
    template: String,
    engine: TypstRenderEngine,
}

impl TypstReportRenderer {
    /// Load the layout template from the static directory.
    pub fn new(typst_bin: &str) -> Result<Self, RenderError> {
        let template_path = get_static_dir().join(TEMPLATE_FILE);
        let template = fs::read_to_string(&template_path).map_err(RenderError::TemplateIo)?;
        Ok(Self::with_template(template, typst_bin))
    }

    pub fn with_template(template: String, typst_bin: &str) -> Self {
        Self {
            template,
            engine: TypstRenderEngine::new(typst_bin),
        }
    }

    /// Typst source for a report, without compiling it.
    pub fn source_for(&self, topic: &str, body: &str, author: &str) -> String {
        let date = chrono::Local::now().format("%B %-d, %Y").to_string();
        source::build_report_source(&self.template, topic, author, &date, body)
    }
}

impl ReportRenderer for TypstReportRenderer {
    fn render(
        &self,
        topic: &str,
        body: &str,
        author: &str,
        destination: &Path,
    ) -> Result<(), RenderError> {
        let typst_source = self.source_for(topic, body, author);
        let pdf = self.engine.compile(&typst_source)?;
        write_pdf(destination, &pdf)?;
        log::info!(
            "Rendered report '{}' to {} ({} bytes)",
            topic,
            destination.display(),
            pdf.len()
        );
        Ok(())
    }
}
