use std::fs;
use std::io;
use std::path::Path;

use actix_web::{
    http::header,
    web::{self, Json},
    HttpResponse, Responder,
};
use log::{error, info, warn};

use super::archive::pdf_entry_name;
use super::models::{BatchRequest, InvoiceRecord};
use crate::{AppState, ErrorResponse};

/// Read a generated artifact and delete it; the bytes move into the
/// response, the temp file must not outlive the request.
fn read_and_remove(path: &Path) -> io::Result<Vec<u8>> {
    let bytes = fs::read(path)?;
    if let Err(e) = fs::remove_file(path) {
        warn!("failed to remove served file {}: {}", path.display(), e);
    }
    Ok(bytes)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Invoice Service",
    post,
    path = "/invoice/generate",
    request_body = InvoiceRecord,
    responses(
        (status = 200, description = "Generated invoice PDF", body = Vec<u8>, content_type = "application/pdf"),
        (status = 400, description = "Invalid invoice record", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn generate_invoice(
    state: web::Data<AppState>,
    body: Json<InvoiceRecord>,
) -> impl Responder {
    let record = body.into_inner();
    if let Err(errors) = record.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(&errors.to_report()));
    }

    info!("generating invoice {}", record.invoice_num);
    match state.generator.generate(&record).await {
        Ok(pdf_path) => match read_and_remove(&pdf_path) {
            Ok(bytes) => HttpResponse::Ok()
                .content_type("application/pdf")
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename=\"{}\"",
                        pdf_entry_name(&record.invoice_num)
                    ),
                ))
                .body(bytes),
            Err(e) => {
                error!("failed to read generated PDF {}: {}", pdf_path.display(), e);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::new("Failed to stream PDF file"))
            }
        },
        Err(e) => {
            error!("failed to generate invoice {}: {}", record.invoice_num, e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to generate PDF file"))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Invoice Service",
    post,
    path = "/invoice/generate-zip",
    request_body = BatchRequest,
    responses(
        (status = 200, description = "Zip of generated invoices, plus an _errors.txt manifest when some records failed", body = Vec<u8>, content_type = "application/zip"),
        (status = 400, description = "Empty batch", body = ErrorResponse),
        (status = 500, description = "No invoice could be generated", body = ErrorResponse)
    )
)]
pub async fn generate_invoice_zip(
    state: web::Data<AppState>,
    body: Json<BatchRequest>,
) -> impl Responder {
    let records = body.into_inner().invoices;
    if records.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::new("No invoices provided"));
    }

    info!("generating zip for {} invoices", records.len());
    match state.archiver.archive_all(&records).await {
        Ok(zip_path) => {
            let filename = zip_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("invoices.zip")
                .to_string();
            match read_and_remove(&zip_path) {
                Ok(bytes) => HttpResponse::Ok()
                    .content_type("application/zip")
                    .insert_header((
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ))
                    .body(bytes),
                Err(e) => {
                    error!("failed to read archive {}: {}", zip_path.display(), e);
                    HttpResponse::InternalServerError()
                        .json(ErrorResponse::new("Failed to stream zip file"))
                }
            }
        }
        Err(e) => {
            error!("failed to generate invoice zip: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(&e.to_string()))
        }
    }
}
