//! urdf2obj entry point

mod args;

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;

use crate::args::Args;

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "urdf2obj=info,urdf_flatten=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = match args.to_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match urdf_flatten::convert(&args.urdf_path, &config) {
        Ok(report) => {
            tracing::info!(
                "Done: {} mesh(es) merged into {:?}",
                report.mesh_count,
                report.merged
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Conversion failed: {}", error_chain(&e));
            ExitCode::FAILURE
        }
    }
}

/// The error followed by each of its causes, separated by ": "
fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
