//! # Static HTTP Server - Entry Point
//! src/main.rs
//!
//! Parsea la configuración, escanea los directorios permitidos y arranca el
//! servidor. Cualquier error de arranque termina el proceso con código 1.

use static_http_server::config::Config;
use static_http_server::error::Result;
use static_http_server::files::Site;
use static_http_server::server::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // La configuración se construye una sola vez y no cambia después
    let config = Config::new();

    if let Err(e) = start(&config) {
        error!("error fatal: {}", e);
        std::process::exit(1);
    }
}

fn start(config: &Config) -> Result<()> {
    config.log_summary();

    let site = Site::from_config(config)?;
    info!(directories = site.allowed().len(), "directorios permitidos escaneados");

    let mut server = Server::bind(config, site)?;
    server.run()
}
