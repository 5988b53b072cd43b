use anyhow::Context;
use nomad_app::NomadApp;
use nomad_store::app_config::Config;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nomad_app=debug,nomad_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load configuration")?;
    info!("Starting Nomad Trails with {:?} storage", config.storage.backend);

    let app = NomadApp::from_config(config)?;
    app.events.subscribe(|event| debug!(event = event.name(), "store event"));

    if app.config.app.seed_demo_users {
        app.seed_demo_users()?;
    }

    let language = app.language.get()?;
    info!(
        destinations = app.catalog.len(),
        continents = app.catalog.continents().len(),
        accounts = app.accounts.registered_count()?,
        language = %language,
        "Nomad Trails ready"
    );

    match app.accounts.current_user() {
        Some(session) => {
            let stats = app.profile_stats(&session.email)?;
            info!(
                user = %session.username,
                upcoming = stats.upcoming_trips,
                favorites = stats.favorites,
                reviews = stats.reviews,
                "Active session"
            );
        }
        None => info!("No active session"),
    }

    app.shutdown();
    Ok(())
}
