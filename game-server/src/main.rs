use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

use game_persistence::{
    connection::connect_and_migrate,
    repositories::{GameRepository, UserRepository, WordRepository},
};
use game_server::{
    auth::AuthService, config::Config, create_routes, game_manager::GameManager,
    reports::ReportService, session::SessionStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Wordle Daily server...");

    let config = Config::new();

    // Initialize database connection and run migrations
    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };

    let user_repository = Arc::new(UserRepository::new(db.clone()));
    let word_repository = Arc::new(WordRepository::new(db.clone()));
    let game_repository = Arc::new(GameRepository::new(db));

    let seeded = word_repository.seed_words(&config.seed_words).await?;
    info!("Seeded {} new words into the word bank", seeded);

    let game_manager = Arc::new(GameManager::new(
        game_repository.clone(),
        word_repository,
        config.daily_game_limit,
    ));
    let auth_service = Arc::new(AuthService::new(
        user_repository.clone(),
        config.admin_usernames.clone(),
    ));
    let session_store = Arc::new(SessionStore::new(Duration::from_secs(
        config.session_timeout_seconds,
    )));
    let report_service = Arc::new(ReportService::new(user_repository, game_repository));

    let routes = create_routes(game_manager, auth_service, session_store, report_service);

    info!("Server starting on {}:{}", config.host, config.port);

    let addr = (config.host.parse::<std::net::IpAddr>()?, config.port);

    #[cfg(unix)]
    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())?;
    #[cfg(unix)]
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;

    let (addr, server) = warp::serve(routes).try_bind_with_graceful_shutdown(addr, async move {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            if signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C, shutting down gracefully...");
            }
        }
    })?;

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
    Ok(())
}
