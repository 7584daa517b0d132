use crate::config::Config;
use crate::services::{
    DockerDownloadTools, ProviderMetadataResolver, SpotifySearchBackend, SpotifyTokenIssuer,
    YouTubeSearchBackend,
};
use actix_rt::signal::unix;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use futures_lite::FutureExt;
use music_providers::{SpotifyClient, YouTubeClient};
use request_processors::{
    BatchAggregator, CredentialCache, DownloadOrchestrator, Platform, SearchAggregator,
    SystemClock,
};
use std::io::{Error, ErrorKind};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

mod config;
mod http;
mod services;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let mut terminate = unix::signal(unix::SignalKind::terminate())?;
    let mut interrupt = unix::signal(unix::SignalKind::interrupt())?;

    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|error| {
        error!(%error, "Invalid configuration");
        Error::new(ErrorKind::InvalidInput, error)
    })?;

    info!(version = VERSION, "Starting application...");

    let spotify_client = Arc::new(
        SpotifyClient::create(
            &config.spotify.api_endpoint,
            &config.spotify.accounts_endpoint,
        )
        .map_err(|error| Error::new(ErrorKind::Other, error))?,
    );
    let youtube_client = Arc::new(
        YouTubeClient::create(&config.youtube.api_endpoint)
            .map_err(|error| Error::new(ErrorKind::Other, error))?,
    );

    let credentials = {
        let cache = CredentialCache::new(Arc::new(SystemClock))
            .with_static(Platform::YouTube, config.youtube.api_key.clone());

        let cache = match (&config.spotify.client_id, &config.spotify.client_secret) {
            (Some(client_id), Some(client_secret)) => cache.with_issuer(
                Platform::Spotify,
                Arc::new(SpotifyTokenIssuer::new(
                    Arc::clone(&spotify_client),
                    client_id.clone(),
                    client_secret.clone(),
                )),
            ),
            _ => {
                warn!("Spotify client credentials are not configured");
                cache.with_static(Platform::Spotify, None)
            }
        };

        if config.youtube.api_key.is_none() {
            warn!("YouTube API key is not configured");
        }

        Arc::new(cache)
    };

    let batch_aggregator = Arc::new(BatchAggregator::new(
        Arc::new(ProviderMetadataResolver::new(
            Arc::clone(&credentials),
            Arc::clone(&spotify_client),
            Arc::clone(&youtube_client),
        )),
        Some(config.max_concurrent_lookups),
    ));
    let search_aggregator = Arc::new(SearchAggregator::new(
        Arc::new(SpotifySearchBackend::new(
            Arc::clone(&credentials),
            Arc::clone(&spotify_client),
        )),
        Arc::new(YouTubeSearchBackend::new(
            Arc::clone(&credentials),
            Arc::clone(&youtube_client),
        )),
        config.search_field_denylist.clone(),
    ));
    let download_orchestrator = Arc::new(DownloadOrchestrator::new(
        Arc::new(DockerDownloadTools::new(config.download.clone())),
        config.download.timeout.map(Duration::from_secs),
    ));

    let shutdown_timeout = config.shutdown_timeout;
    let bind_address = config.bind_address.clone();

    let server = HttpServer::new({
        move || {
            App::new()
                .wrap(Logger::default())
                .app_data(http::json_config())
                .app_data(Data::from(Arc::clone(&batch_aggregator)))
                .app_data(Data::from(Arc::clone(&search_aggregator)))
                .app_data(Data::from(Arc::clone(&download_orchestrator)))
                .service(web::resource("/process-urls").route(web::post().to(http::process_urls)))
                .service(web::resource("/search").route(web::get().to(http::search)))
                .service(web::resource("/download").route(web::post().to(http::download)))
                .service(web::resource("/health").route(web::get().to(http::health_check)))
        }
    })
    .shutdown_timeout(shutdown_timeout)
    .bind(&bind_address)?
    .run();

    let server_handle = server.handle();

    actix_rt::spawn({
        async move {
            if let Err(error) = server.await {
                error!(?error, "Error on http server");
            }
        }
    });

    info!(%bind_address, "Application started");

    interrupt.recv().or(terminate.recv()).await;

    info!("Received shutdown signal. Shutting down gracefully...");

    server_handle.stop(true).await;

    Ok(())
}
