use fleet_compliance::AppResources;
use fleet_compliance::api::start_webserver;
use fleet_compliance::compliance::{ComplianceScheduler, spawn_daily_batch};
use fleet_compliance::config::load_config;
use fleet_compliance::delivery::SmtpDelivery;
use rustls::crypto;
use rustls::crypto::CryptoProvider;
use sea_orm::Database;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing() {
    let default_directives = "fleet_compliance=info,hyper=warn,sea_orm=info";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer().with_target(true).with_level(true);

    registry.with(layer).init();
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    // -------- Tracing Initialization --------
    initialize_tracing();

    // Load config
    let config = Arc::new(load_config()?);
    tracing::info!(
        listen_addr = %config.listen_addr,
        run_at_hour = config.compliance.run_at_hour,
        scheduler_enabled = config.compliance.scheduler_enabled,
        expiring_soon_days = config.compliance.expiring_soon_days,
        "compliance configuration"
    );

    CryptoProvider::install_default(crypto::ring::default_provider())
        .map_err(|_| color_eyre::eyre::eyre!("Failed to install crypto provider"))?;

    // Set up SeaORM database connection
    let db = Arc::new(Database::connect(&config.database_url).await?);

    // Set up lettre SMTP client
    let mailer = Arc::new(SmtpDelivery::from_config(&config.smtp)?);

    let resources = Arc::new(AppResources { db, mailer, config });
    let scheduler = Arc::new(ComplianceScheduler::new());

    if resources.config.compliance.scheduler_enabled {
        spawn_daily_batch(resources.clone(), scheduler.clone());
    } else {
        tracing::warn!("Daily compliance batch disabled; use POST /api/compliance/run");
    }

    start_webserver((*resources).clone(), scheduler).await?;
    Ok(())
}
