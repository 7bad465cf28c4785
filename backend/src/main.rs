use backend::{
    config::{AppConfig, StoreBackend},
    cors::CORS,
    queries::PgPollStore,
    routes::{build_rocket, AppState},
    store::MemoryPollStore,
};
use shuttle_runtime::CustomError;
use sqlx::PgPool;
use tracing::{info, warn};

#[shuttle_runtime::main]
async fn rocket(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secret_store: shuttle_runtime::SecretStore,
) -> shuttle_rocket::ShuttleRocket {
    info!("🚀 Starting VotePulse server");

    let config = AppConfig::from_lookup(|key| secret_store.get(key)).map_err(CustomError::new)?;

    let app_state = match config.store {
        StoreBackend::Postgres => {
            let store = PgPollStore::new(pool);
            store.migrate().await.map_err(CustomError::new)?;
            info!("📋 Migrations complete");
            AppState::new(store)
        }
        StoreBackend::Memory => {
            warn!("POLL_STORE=memory - polls will not survive a restart");
            AppState::new(MemoryPollStore::new())
        }
    };

    let rocket = build_rocket(app_state, CORS::new(config.cors_origin_prefix));

    Ok(rocket.into())
}
