use crate::error::Result;
use crate::labels::{Labels, Locale};
use crate::loader::LoadOptions;
use clap::Parser;
use std::path::PathBuf;

/// Web dashboard for traffic-simulation delay reports
#[derive(Parser, Debug, Clone)]
#[command(name = "dashboard", version)]
pub struct Settings {
    /// Address to bind the HTTP server to
    #[arg(long, env = "TRAFFIC_DASHBOARD_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "TRAFFIC_DASHBOARD_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Maximum size of one upload request, in megabytes
    #[arg(long, env = "TRAFFIC_DASHBOARD_MAX_UPLOAD_MB", default_value_t = 50)]
    pub max_upload_mb: usize,

    /// Language of the user-facing text
    #[arg(long, value_enum, default_value_t = Locale::Pt)]
    pub locale: Locale,

    /// JSON file overriding some or all labels of the chosen locale
    #[arg(long, env = "TRAFFIC_DASHBOARD_LABELS")]
    pub labels: Option<PathBuf>,

    /// Title rows at the top of each report that are not scanned
    #[arg(long, default_value_t = 1)]
    pub header_rows: usize,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Settings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            header_rows: self.header_rows,
        }
    }

    /// Labels of the configured locale, with the labels file applied on top
    pub fn load_labels(&self) -> Result<Labels> {
        let base = Labels::for_locale(self.locale);
        match &self.labels {
            Some(path) => Labels::from_json_file(path, &base),
            None => Ok(base),
        }
    }
}
