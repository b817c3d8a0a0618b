use clap::Parser;
use traffic_dashboard::app;
use traffic_dashboard::settings::Settings;

/// Main entry point for the report dashboard
///
/// Reads the settings from the command line and environment, installs the
/// logger and serves the dashboard until the process is stopped.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_level.as_str()),
    )
    .init();

    app::run(settings).await
}
