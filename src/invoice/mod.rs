//! Invoice generation - filling the spreadsheet template, converting it to
//! PDF through headless LibreOffice, and packaging batches into zip archives.
//!
//! The components compose in one direction:
//! - `template::TemplateFiller` - one record into one filled workbook
//! - `convert::PdfConverter` - one workbook into one PDF (serialized)
//! - `pipeline::InvoiceGenerator` - fill, convert, clean up the workbook
//! - `archive::BatchArchiver` - many records into one zip with a failure
//!   manifest

pub mod archive;
pub mod convert;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod template;
pub mod validation;

pub use archive::BatchArchiver;
pub use convert::PdfConverter;
pub use models::{BatchRequest, InvoiceRecord};
pub use pipeline::InvoiceGenerator;
pub use template::TemplateFiller;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating or packaging invoices.
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("invoice template not found at {0}")]
    TemplateMissing(PathBuf),
    #[error("worksheet '{0}' missing from invoice template")]
    TemplateMalformed(String),
    #[error("failed to read invoice template: {0}")]
    TemplateRead(String),
    #[error("failed to write filled workbook: {0}")]
    TemplateWrite(String),
    #[error("PDF conversion failed: {0}")]
    ConversionFailed(String),
    #[error("no invoices could be generated: {0}")]
    BatchFailed(String),
    #[error("failed to build invoice archive: {0}")]
    ArchiveFailed(#[source] std::io::Error),
}

/// A PDF produced for a single record, owned by whoever holds it until the
/// file is deleted.
#[derive(Debug)]
pub struct GeneratedPdf {
    pub path: PathBuf,
    pub filename: String,
}

/// A record that could not be turned into a PDF during a batch run.
#[derive(Debug)]
pub struct FailedInvoice {
    pub invoice_num: String,
    pub error: String,
}

/// Outcome of driving the pipeline over one batch of records.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub succeeded: Vec<GeneratedPdf>,
    pub failed: Vec<FailedInvoice>,
}

impl BatchResult {
    /// One `{invoiceNum}: {message}` line per failed record.
    pub fn failure_lines(&self) -> Vec<String> {
        self.failed
            .iter()
            .map(|f| format!("{}: {}", f.invoice_num, f.error))
            .collect()
    }
}
