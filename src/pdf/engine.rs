//! Typst rendering engine.
//!
//! Writes Typst source to a temporary directory, invokes the compiler and
//! reads the resulting PDF back.

use std::fs;
use std::process::Command;
use tempfile::tempdir;

use super::RenderError;

const SOURCE_FILE: &str = "report.typ";
const OUTPUT_FILE: &str = "report.pdf";

/// Stateless wrapper around the `typst` CLI.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    binary: String,
}

impl TypstRenderEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Compile a complete Typst document to PDF bytes.
    pub fn compile(&self, typst_source: &str) -> Result<Vec<u8>, RenderError> {
        let temp_dir = tempdir().map_err(RenderError::TempDir)?;
        let typ_path = temp_dir.path().join(SOURCE_FILE);
        let output_path = temp_dir.path().join(OUTPUT_FILE);

        fs::write(&typ_path, typst_source).map_err(RenderError::WriteSource)?;

        log::debug!("Compiling {} with {}", typ_path.display(), self.binary);
        let output = Command::new(&self.binary)
            .arg("compile")
            .arg(&typ_path)
            .arg(&output_path)
            .current_dir(temp_dir.path())
            .output()
            .map_err(RenderError::TypstIo)?;

        if !output.status.success() {
            return Err(RenderError::TypstExit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        fs::read(&output_path).map_err(RenderError::ReadPdf)
    }
}
