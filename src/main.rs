//! remotify - a lightweight backend for remote-controlling Spotify playback
//!
//! Authenticates the user against Spotify via the authorization-code flow,
//! keeps the session tokens in client-side cookies and proxies playback
//! commands and lyrics lookups to the upstream APIs.

mod api;
mod config;
mod core;
mod plugins;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::config::Settings;

/// remotify - Spotify remote-control backend
#[derive(Parser, Debug)]
#[command(name = "remotify")]
#[command(version = "1.0.0")]
#[command(about = "A lightweight backend for remote-controlling Spotify playback")]
struct Args {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on, falls back to the PORT environment variable
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // initialize logging with filters to suppress noisy dependency chatter
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::new(format!(
        "{},hyper=warn,reqwest=warn",
        log_level
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    info!("remotify v1.0.0 starting...");

    let settings = Settings::load()?;
    info!("Public host: {}", settings.host);
    info!("OAuth callback: {}", settings.callback_url);

    let addr = format!("{}:{}", args.bind, args.port.unwrap_or(settings.port));
    info!("Server operating on http://{}", addr);

    use actix_cors::Cors;
    use actix_web::{middleware, web, App, HttpServer};

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&settings.cors_origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(settings.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
