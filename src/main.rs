use std::sync::Arc;

use personalchat_auth::config::{load_config, print_schema};
use personalchat_auth::startup;
use personalchat_auth::utils::logger::init_logging;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--schema") {
        if let Err(e) = print_schema() {
            eprintln!("Failed to render config schema: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = Arc::new(load_config());
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    info!(
        "Starting {} {}",
        config.logging.service_name, config.logging.service_version
    );

    if let Err(e) = startup::run(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
