//! Single-invoice pipeline: fill the template, convert to PDF, and delete
//! the intermediate workbook on every path.

use std::fs;
use std::path::PathBuf;

use log::warn;

use super::convert::PdfConverter;
use super::models::InvoiceRecord;
use super::template::TemplateFiller;
use super::InvoiceError;
use crate::config::AppConfig;

pub struct InvoiceGenerator {
    filler: TemplateFiller,
    converter: PdfConverter,
}

impl InvoiceGenerator {
    pub fn new(config: AppConfig) -> Self {
        let converter = PdfConverter::new(&config);
        Self {
            filler: TemplateFiller::new(config),
            converter,
        }
    }

    /// Produce one PDF for one record. On success the caller owns the
    /// returned file; the intermediate spreadsheet is gone either way.
    pub async fn generate(&self, record: &InvoiceRecord) -> Result<PathBuf, InvoiceError> {
        let workbook = self.filler.fill(record)?;
        let result = self.converter.convert(&workbook).await;

        if let Err(e) = fs::remove_file(&workbook) {
            warn!(
                "failed to remove intermediate workbook {}: {}",
                workbook.display(),
                e
            );
        }

        result
    }
}
