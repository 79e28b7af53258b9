use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod invoice;

use crate::config::AppConfig;
use crate::invoice::{BatchArchiver, InvoiceGenerator};

/// JSON body returned on every failed request.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// Shared application state: the single-invoice pipeline and the batch
/// archiver, both routed through the same converter permit.
pub struct AppState {
    pub generator: Arc<InvoiceGenerator>,
    pub archiver: BatchArchiver,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let generator = Arc::new(InvoiceGenerator::new(config.clone()));
        let archiver = BatchArchiver::new(Arc::clone(&generator), &config);
        Self {
            generator,
            archiver,
        }
    }
}

pub async fn run() -> std::io::Result<()> {
    unsafe {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::invoice::handlers::generate_invoice,
            crate::invoice::handlers::generate_invoice_zip,
        ),
        components(
            schemas(
                invoice::models::InvoiceRecord,
                invoice::models::BatchRequest,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Invoice Service", description = "Invoice PDF generation endpoints.")
        )
    )]
    struct ApiDoc;

    let config = AppConfig::from_env();
    if let Err(e) = config.ensure_dirs() {
        log::error!(
            "Failed to create working directories {} and {}: {}",
            config.assets_dir.display(),
            config.tmp_dir.display(),
            e
        );
        std::process::exit(1);
    }
    let app_state = web::Data::new(AppState::new(config));

    let prometheus = PrometheusMetricsBuilder::new("invoice_server")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus metrics middleware");

    log::info!("Starting server at http://0.0.0.0:8000");

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("https://internal-invoice.opendreamcorp.com")
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .service(
                web::scope("/api")
                    .service(
                        web::resource("/invoice/generate")
                            .route(web::post().to(invoice::handlers::generate_invoice)),
                    )
                    .service(
                        web::resource("/invoice/generate-zip")
                            .route(web::post().to(invoice::handlers::generate_invoice_zip)),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(("0.0.0.0", 8000))?
    .run()
    .await
}
