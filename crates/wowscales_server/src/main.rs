use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use wowscales_server::{Cli, HttpServer, StoreBackend};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Cli::parse().into_config();

    if let Err(err) = wowscales_core::init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("wowscales: failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match serde_json::to_string(&config) {
        Ok(json) => info!("event=server_config module=server status=ok config={json}"),
        Err(err) => error!("event=server_config module=server status=error error={err}"),
    }

    let store = match StoreBackend::from_config(&config) {
        Ok(store) => store,
        Err(err) => {
            error!("event=store_ready module=store status=error error={err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = HttpServer::new(config, store).start().await {
        error!("event=server_start module=server status=error error={err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
