use crate::config::Config;
use crate::services::{
    BackendDownloadService, BackendMediaResolver, DownloadOrchestrator, LoggingProgressSink,
};
use actix_rt::signal::unix;
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use fetcher_client::FetcherClient;
use futures_lite::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

mod config;
mod http;
mod services;
mod types;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let mut terminate = unix::signal(unix::SignalKind::terminate())?;
    let mut interrupt = unix::signal(unix::SignalKind::interrupt())?;

    dotenv::dotenv().ok();
    env_logger::init();

    let config = Arc::from(Config::from_env());

    info!(version = VERSION, "Starting application...");

    let fetcher_client = Arc::new(FetcherClient::create(&config.backend_endpoint));

    let download_orchestrator = {
        Arc::new(DownloadOrchestrator::new(
            Arc::new(BackendMediaResolver(Arc::clone(&fetcher_client))),
            Arc::new(BackendDownloadService(Arc::clone(&fetcher_client))),
            Arc::new(LoggingProgressSink),
            Duration::from_millis(config.poll_interval_ms),
        ))
    };

    let shutdown_timeout = config.shutdown_timeout.clone();
    let bind_address = config.bind_address.clone();

    let server = HttpServer::new({
        move || {
            App::new()
                .app_data(Data::new(Arc::clone(&download_orchestrator)))
                .app_data(Data::new(Arc::clone(&fetcher_client)))
                .service(web::resource("/resolve").route(web::post().to(http::resolve_media)))
                .service(web::resource("/download").route(web::post().to(http::request_download)))
                .service(web::resource("/health").route(web::get().to(http::readiness_check)))
        }
    })
    .shutdown_timeout(shutdown_timeout)
    .bind(bind_address)?
    .run();

    let server_handle = server.handle();

    actix_rt::spawn({
        async move {
            if let Err(error) = server.await {
                error!(?error, "Error on http server");
            }
        }
    });

    info!("Application started");

    interrupt.recv().or(terminate.recv()).await;

    info!("Received shutdown signal. Shutting down gracefully...");

    server_handle.stop(true).await;

    Ok(())
}
