use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use handlebars::Handlebars;
use log::{info, warn};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;

use crate::dashboard::{Dashboard, Status, Table};
use crate::downloader;
use crate::error::{ReportError, Result};
use crate::graph::{GraphOptions, render_svg};
use crate::labels::{Labels, Locale};
use crate::loader::LoadOptions;
use crate::record::Column;
use crate::result_set::ResultSet;
use crate::scratch::{Upload, process_uploads};
use crate::settings::Settings;

const STYLE: &str = include_str!("./static/dashboard.css");
const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Immutable configuration shared by every request
pub struct AppState {
    locale: Locale,
    labels: Labels,
    load_options: LoadOptions,
    templates: Handlebars<'static>,
}

impl AppState {
    pub fn new(locale: Locale, labels: Labels, load_options: LoadOptions) -> Result<Self> {
        let mut templates = Handlebars::new();
        let template_error = |e: handlebars::TemplateError| ReportError::Template(e.to_string());

        templates
            .register_partial("upload_form", include_str!("./static/upload_form.hbs"))
            .map_err(template_error)?;
        templates
            .register_partial("data_table", include_str!("./static/data_table.hbs"))
            .map_err(template_error)?;
        templates
            .register_template_string("landing", include_str!("./static/landing.hbs"))
            .map_err(template_error)?;
        templates
            .register_template_string("report", include_str!("./static/report.hbs"))
            .map_err(template_error)?;

        Ok(Self {
            locale,
            labels,
            load_options,
            templates,
        })
    }

    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String> {
        self.templates
            .render(name, context)
            .map_err(|e| ReportError::Template(e.to_string()))
    }
}

#[derive(Serialize)]
struct ReportResponse {
    status: &'static str,
    files: usize,
    message: String,
    warning: Option<String>,
    summary: ResultSet,
    records: ResultSet,
}

/// Build the router; uploads larger than `max_upload_bytes` are rejected
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(serve_landing))
        .route("/report", post(report_page))
        .route("/api/report", post(report_json))
        .route("/export/csv", post(export_csv))
        .route("/export/xlsx", post(export_xlsx))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .with_state(Arc::new(state))
}

pub async fn run(settings: Settings) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(
        settings.locale,
        settings.load_labels()?,
        settings.load_options(),
    )?;
    let app = router(state, settings.max_upload_bytes());

    let address = settings.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Listening on http://{}", address);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_landing(State(state): State<Arc<AppState>>) -> Response {
    let labels = &state.labels;
    let context = json!({
        "lang": state.locale.code(),
        "style": STYLE,
        "page_title": labels.page_title,
        "intro": labels.intro,
        "upload_prompt": labels.upload_prompt,
        "process_button": labels.process_button,
        "export_csv_button": labels.export_csv_button,
        "export_xlsx_button": labels.export_xlsx_button,
        "waiting": labels.waiting,
    });

    html_response(state.render("landing", &context))
}

async fn report_page(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let (files, results) = run_cycle(&state, &mut multipart).await;
    let dashboard = Dashboard::build(results, files, &state.labels);
    html_response(render_report(&state, &dashboard))
}

async fn report_json(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let (files, results) = run_cycle(&state, &mut multipart).await;
    let dashboard = Dashboard::build(results, files, &state.labels);

    let response = ReportResponse {
        status: match dashboard.status {
            Status::Waiting => "waiting",
            Status::Processed { .. } => "processed",
            Status::Failed => "failed",
        },
        files,
        message: dashboard.status_message(&state.labels),
        warning: dashboard.warning(&state.labels),
        summary: dashboard.summary,
        records: dashboard.records,
    };

    Json(response).into_response()
}

async fn export_csv(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let (_, results) = run_cycle(&state, &mut multipart).await;
    let csv = downloader::to_csv(&results, &state.labels);
    attachment(CSV_CONTENT_TYPE, "resultados.csv", csv.into_bytes())
}

async fn export_xlsx(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let (_, results) = run_cycle(&state, &mut multipart).await;
    match downloader::to_xlsx(&results, &state.labels) {
        Ok(bytes) => attachment(XLSX_CONTENT_TYPE, "resultados.xlsx", bytes),
        Err(e) => {
            warn!("{}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Read the uploads and process them off the async runtime.
///
/// Returns the number of uploaded files and the combined result set; any
/// failure degrades to an empty result set.
async fn run_cycle(state: &AppState, multipart: &mut Multipart) -> (usize, ResultSet) {
    let uploads = read_uploads(multipart).await;
    let files = uploads.len();
    let options = state.load_options;

    let outcome = tokio::task::spawn_blocking(move || process_uploads(&uploads, &options)).await;

    let results = match outcome {
        Ok(Ok(results)) => results,
        Ok(Err(e)) => {
            warn!("Failed to process uploads: {}", e);
            ResultSet::new()
        }
        Err(e) => {
            warn!("Processing task failed: {}", e);
            ResultSet::new()
        }
    };

    info!("{} file(s) uploaded, {} record(s) extracted", files, results.len());
    (files, results)
}

async fn read_uploads(multipart: &mut Multipart) -> Vec<Upload> {
    let mut uploads = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read multipart field: {}", e);
                break;
            }
        };

        // Browsers send an unnamed empty part when no file was chosen
        let name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };

        match field.bytes().await {
            Ok(bytes) => uploads.push(Upload {
                name,
                bytes: bytes.to_vec(),
            }),
            Err(e) => {
                warn!("Failed to read upload {}: {}", name, e);
                break;
            }
        }
    }

    uploads
}

fn render_report(state: &AppState, dashboard: &Dashboard) -> Result<String> {
    let labels = &state.labels;

    let charts: Vec<serde_json::Value> = dashboard
        .charts
        .iter()
        .filter_map(|chart| {
            let options = GraphOptions {
                title: chart.title.clone(),
                x_label: labels.column(Column::Direction).to_string(),
                y_label: labels.column(chart.kind.metric().column()).to_string(),
                ..GraphOptions::default()
            };
            match render_svg(&chart.bars, &options) {
                Ok(svg) => Some(json!({ "title": chart.title, "svg": svg })),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            }
        })
        .collect();

    let summary: Option<Table> =
        (!dashboard.summary.is_empty()).then(|| dashboard.summary_table(labels));
    let all: Option<Table> = dashboard
        .is_processed()
        .then(|| dashboard.full_table(labels));

    let context = json!({
        "lang": state.locale.code(),
        "style": STYLE,
        "page_title": labels.page_title,
        "intro": labels.intro,
        "upload_prompt": labels.upload_prompt,
        "process_button": labels.process_button,
        "export_csv_button": labels.export_csv_button,
        "export_xlsx_button": labels.export_xlsx_button,
        "ok": dashboard.is_processed(),
        "waiting": dashboard.is_waiting(),
        "message": dashboard.status_message(labels),
        "warning": dashboard.warning(labels),
        "summary_header": labels.summary_header,
        "summary": summary,
        "charts_header": labels.charts_header,
        "charts": charts,
        "show_all": labels.show_all,
        "all_data_header": labels.all_data_header,
        "all": all,
    });

    state.render("report", &context)
}

fn html_response(page: Result<String>) -> Response {
    match page {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!("{}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

fn attachment(content_type: &'static str, filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}
