//! # kpidash-server
//!
//! HTTP server for the kpidash dashboard.

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use clap::Parser;
use kpidash_core::{sample_dataset, DataSource};
use kpidash_viz::{render_error, render_source, PageOptions};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Server configuration, from flags or environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "kpidash-server")]
#[command(version, about = "Serve the kpidash dashboard", long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "KPIDASH_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: String,

    /// Largest accepted upload, in bytes
    #[arg(long, env = "KPIDASH_MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:3000".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Dashboard with sample data.
pub async fn index() -> Html<String> {
    Html(render_source(&DataSource::Sample, &PageOptions::default()).html)
}

/// Fields submitted by the sidebar form.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<Vec<u8>>,
    use_sample: bool,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, MultipartError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let bytes = field.bytes().await?;
                // An empty file input still submits a field.
                if !bytes.is_empty() {
                    form.file = Some(bytes.to_vec());
                }
            }
            Some("use_sample") => {
                let value = field.text().await?;
                form.use_sample = matches!(value.as_str(), "true" | "on");
            }
            _ => {}
        }
    }
    Ok(form)
}

/// Dashboard from the submitted form: uploaded workbook or sample data.
///
/// A workbook that cannot be parsed yields the error page with 422.
pub async fn upload(multipart: Multipart) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(err) => {
            warn!(error = %err, "malformed upload form");
            let html = render_error(&err.body_text(), &PageOptions::default());
            return (err.status(), Html(html)).into_response();
        }
    };

    // An unchecked checkbox is simply absent from the form.
    let source = DataSource::select(form.file, Some(form.use_sample));
    info!(upload = source.is_upload(), "rendering dashboard");

    // Workbook parsing is CPU-bound; keep it off the async workers.
    let rendered =
        tokio::task::spawn_blocking(move || render_source(&source, &PageOptions::default())).await;
    match rendered {
        Ok(rendered) => {
            let status = if rendered.is_ok() {
                StatusCode::OK
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            (status, Html(rendered.html)).into_response()
        }
        Err(err) => {
            warn!(error = %err, "render task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "render failed").into_response()
        }
    }
}

/// The sample data as a four-sheet workbook, for use as an upload template.
pub async fn template() -> Response {
    match sample_dataset().to_book().to_xlsx_bytes() {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"kpidash_template.xlsx\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => {
            warn!(error = %err, "could not build template workbook");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(config: &Config) -> Router {
    Router::new()
        .route("/", get(index).post(upload))
        .route("/template.xlsx", get(template))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    let app = create_router(&config);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    info!(addr = %config.addr, "kpidash-server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    const BOUNDARY: &str = "kpidash-test-boundary";

    fn app() -> Router {
        create_router(&Config::default())
    }

    /// Build a multipart body with an optional file part and checkbox.
    fn multipart_body(file: Option<&[u8]>, use_sample: bool) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(bytes) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"book.xlsx\"\r\nContent-Type: {XLSX_CONTENT_TYPE}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        if use_sample {
            body.extend_from_slice(
                format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"use_sample\"\r\n\r\ntrue\r\n")
                    .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn post(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn workbook_without(sheet: &str) -> Vec<u8> {
        let mut book = sample_dataset().to_book();
        book.remove_sheet(sheet).unwrap();
        book.to_xlsx_bytes().unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint_body() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: Health = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_index_renders_sample() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("145%"));
        assert!(html.contains("RD$5,200,000"));
        assert!(html.contains("<form"));
    }

    #[tokio::test]
    async fn test_upload_valid_workbook() {
        let bytes = sample_dataset().to_book().to_xlsx_bytes().unwrap();
        let response = app().oneshot(post(multipart_body(Some(&bytes), false))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Excel cargado correctamente."));
        assert!(html.contains("<canvas"));
    }

    #[tokio::test]
    async fn test_upload_missing_sheet() {
        let bytes = workbook_without("Riesgos");
        let response = app().oneshot(post(multipart_body(Some(&bytes), false))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let html = body_text(response).await;
        assert!(html.contains("Error leyendo el Excel"));
        assert!(!html.contains("<canvas"));
    }

    #[tokio::test]
    async fn test_sample_toggle_overrides_upload() {
        let response = app()
            .oneshot(post(multipart_body(Some(b"not a workbook"), true)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(!html.contains("Excel cargado correctamente."));
        assert!(html.contains("145%"));
    }

    #[tokio::test]
    async fn test_empty_form_uses_sample() {
        let response = app().oneshot(post(multipart_body(None, false))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("RD$4,800,000"));
    }

    #[tokio::test]
    async fn test_template_download() {
        let response = app()
            .oneshot(Request::builder().uri("/template.xlsx").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            XLSX_CONTENT_TYPE
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let data = kpidash_core::load(&DataSource::Upload(bytes.to_vec())).unwrap();
        assert_eq!(data, sample_dataset());
    }

    #[tokio::test]
    async fn test_not_found() {
        let response = app()
            .oneshot(Request::builder().uri("/nonexistent").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
