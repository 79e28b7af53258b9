//! Batch archiver.
//!
//! Drives the single-invoice pipeline over a list of records strictly one
//! at a time, then packs every successful PDF into a `{YYMMDD}.zip` in the
//! scratch directory. One record's failure never aborts the batch; failures
//! are reported through an `_errors.txt` manifest inside the archive. When
//! the call returns, the only file left behind is the archive itself (or
//! nothing at all on failure).

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use log::{error, warn};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use super::models::InvoiceRecord;
use super::pipeline::InvoiceGenerator;
use super::{BatchResult, FailedInvoice, GeneratedPdf, InvoiceError};
use crate::config::AppConfig;

/// Archive entry listing the records that could not be generated.
pub const ERROR_MANIFEST: &str = "_errors.txt";

pub struct BatchArchiver {
    generator: Arc<InvoiceGenerator>,
    tmp_dir: PathBuf,
}

impl BatchArchiver {
    pub fn new(generator: Arc<InvoiceGenerator>, config: &AppConfig) -> Self {
        Self {
            generator,
            tmp_dir: config.tmp_dir.clone(),
        }
    }

    /// Generate every record sequentially and pack the results into a zip.
    ///
    /// Fails with `BatchFailed` when not a single record succeeded, and
    /// with `ArchiveFailed` when packaging breaks; in both cases nothing is
    /// left on disk.
    pub async fn archive_all(&self, records: &[InvoiceRecord]) -> Result<PathBuf, InvoiceError> {
        let mut batch = BatchResult::default();

        for record in records {
            if let Err(errors) = record.validate() {
                warn!("invoice {} rejected: {}", record.invoice_num, errors);
                batch.failed.push(FailedInvoice {
                    invoice_num: record.invoice_num.clone(),
                    error: errors.to_report(),
                });
                continue;
            }

            match self.generator.generate(record).await {
                Ok(path) => batch.succeeded.push(GeneratedPdf {
                    path,
                    filename: pdf_entry_name(&record.invoice_num),
                }),
                Err(e) => {
                    error!(
                        "failed to generate PDF for invoice {}: {}",
                        record.invoice_num, e
                    );
                    batch.failed.push(FailedInvoice {
                        invoice_num: record.invoice_num.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if batch.succeeded.is_empty() {
            return Err(InvoiceError::BatchFailed(batch.failure_lines().join("; ")));
        }

        let archive_path = self
            .tmp_dir
            .join(format!("{}.zip", Local::now().format("%y%m%d")));

        if let Err(e) = write_archive(&archive_path, &batch) {
            cleanup_generated(&batch.succeeded);
            remove_if_exists(&archive_path);
            return Err(InvoiceError::ArchiveFailed(e));
        }

        // The PDF bytes live inside the archive now.
        cleanup_generated(&batch.succeeded);

        if !batch.failed.is_empty() {
            warn!(
                "{} of {} invoices failed; details in {} inside the archive",
                batch.failed.len(),
                records.len(),
                ERROR_MANIFEST
            );
        }

        Ok(archive_path)
    }
}

/// Zip entry name for one invoice, with the invoice number made safe for
/// use as a filename.
pub fn pdf_entry_name(invoice_num: &str) -> String {
    let safe = sanitize_filename::sanitize(invoice_num);
    if safe.is_empty() {
        "invoice.pdf".to_string()
    } else {
        format!("{safe}.pdf")
    }
}

fn write_archive(path: &Path, batch: &BatchResult) -> io::Result<()> {
    let file = File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));

    for pdf in &batch.succeeded {
        let bytes = fs::read(&pdf.path)?;
        zip.start_file(pdf.filename.as_str(), options)?;
        zip.write_all(&bytes)?;
    }

    if !batch.failed.is_empty() {
        let mut manifest = String::from("Failed to generate the following PDFs:\n");
        for line in batch.failure_lines() {
            manifest.push_str(&line);
            manifest.push('\n');
        }
        zip.start_file(ERROR_MANIFEST, options)?;
        zip.write_all(manifest.as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}

fn cleanup_generated(files: &[GeneratedPdf]) {
    for f in files {
        if let Err(e) = fs::remove_file(&f.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("failed to clean up {}: {}", f.path.display(), e);
            }
        }
    }
}

fn remove_if_exists(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!("failed to remove partial archive {}: {}", path.display(), e);
        }
    }
}
