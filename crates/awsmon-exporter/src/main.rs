mod app;
mod config;

use anyhow::Result;
use app::AppState;
use awsmon_aws::AwsSettings;
use awsmon_collector::ec2::Ec2VolumeCollector;
use awsmon_collector::rds::RdsInstanceCollector;
use awsmon_collector::CollectorRegistry;
use clap::Parser;
use config::Config;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Prometheus exporter for AWS resource-description APIs.
#[derive(Parser)]
#[command(name = "awsmon-exporter", version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::new(cli.config.as_deref());

    let settings = AwsSettings {
        region: config.get_str("aws.region", "us-east-1"),
        access_key_id: config.get_opt_str("aws.access_key_id"),
        secret_access_key: config.get_opt_str("aws.secret_access_key"),
    };

    // Client construction failures propagate here and abort startup; they
    // must be visible before serving begins, unlike per-scrape failures.
    let mut registry = CollectorRegistry::new();
    if config.get_bool("exporter.collectors.ec2", true) {
        tracing::info!("Registering EC2 volume collector");
        registry.register(Box::new(Ec2VolumeCollector::new(&settings)?));
    }
    if config.get_bool("exporter.collectors.rds", true) {
        tracing::info!("Registering RDS instance collector");
        registry.register(Box::new(RdsInstanceCollector::new(&settings)?));
    }
    if registry.is_empty() {
        tracing::warn!("No collectors enabled, the exposition payload will be empty");
    }

    let address = config.get_str("exporter.address", "0.0.0.0");
    let port = config.get_u16("exporter.port", 9090);
    let metrics_path = resolve_metrics_path(config.get_str("exporter.metrics_path", "/metrics"))?;

    let state = Arc::new(AppState {
        registry,
        metrics_path: metrics_path.clone(),
    });
    let router = app::build_http_app(state);

    let addr: SocketAddr = format!("{address}:{port}").parse()?;
    tracing::info!(
        %addr,
        path = %metrics_path,
        region = %settings.region,
        "Starting AWS API exporter"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
            tracing::info!("Shutting down gracefully");
        })
        .await?;

    tracing::info!("Exporter stopped");
    Ok(())
}

/// Route paths must start with a slash; tolerate a config value without one.
/// The root path is taken by the index page, so a metrics path that resolves
/// to `/` is a configuration error and must fail startup before serving.
fn resolve_metrics_path(path: String) -> Result<String> {
    let path = if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    };
    if path == "/" {
        anyhow::bail!("exporter.metrics_path must not be '/' (reserved for the index page)");
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::resolve_metrics_path;

    #[test]
    fn should_prefix_missing_leading_slash() {
        assert_eq!(
            resolve_metrics_path("metrics".to_string()).expect("path resolves"),
            "/metrics"
        );
        assert_eq!(
            resolve_metrics_path("/metrics".to_string()).expect("path resolves"),
            "/metrics"
        );
    }

    #[test]
    fn should_reject_metrics_path_that_collides_with_index() {
        assert!(resolve_metrics_path("/".to_string()).is_err());
        // An empty value normalizes to "/" and is rejected the same way.
        assert!(resolve_metrics_path(String::new()).is_err());
    }
}
