//! Headless LibreOffice PDF conversion.
//!
//! `soffice` corrupts its own output when two conversions run against the
//! same working directory at once, so every invocation in the process goes
//! through one permit. The settle window is slept while the permit is still
//! held, which keeps the next caller out until the converter has quiesced.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use tokio::process::Command;
use tokio::sync::Mutex;

use super::InvoiceError;
use crate::config::AppConfig;

pub struct PdfConverter {
    soffice: PathBuf,
    gate: Mutex<()>,
    settle: Duration,
}

impl PdfConverter {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            soffice: config.soffice_path.clone(),
            gate: Mutex::new(()),
            settle: config.settle,
        }
    }

    /// Convert one workbook to PDF. The output lands next to the input with
    /// a `.pdf` extension. The input file is left in place; deleting it is
    /// the pipeline's job.
    pub async fn convert(&self, input: &Path) -> Result<PathBuf, InvoiceError> {
        let out_dir = input
            .parent()
            .ok_or_else(|| {
                InvoiceError::ConversionFailed(format!(
                    "input path {} has no parent directory",
                    input.display()
                ))
            })?
            .to_path_buf();
        let pdf_path = input.with_extension("pdf");

        let _permit = self.gate.lock().await;
        debug!("converting {} to PDF", input.display());

        let result = Command::new(&self.soffice)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg(input)
            .arg("--outdir")
            .arg(&out_dir)
            .output()
            .await;

        // Let soffice release its profile before the permit is handed on.
        tokio::time::sleep(self.settle).await;

        let output = result.map_err(|e| {
            InvoiceError::ConversionFailed(format!(
                "failed to run {}: {}",
                self.soffice.display(),
                e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InvoiceError::ConversionFailed(format!(
                "{} exited with {}: {}",
                self.soffice.display(),
                output.status,
                stderr.trim()
            )));
        }

        if !pdf_path.exists() {
            return Err(InvoiceError::ConversionFailed(format!(
                "converter exited cleanly but {} was not produced",
                pdf_path.display()
            )));
        }

        Ok(pdf_path)
    }
}
