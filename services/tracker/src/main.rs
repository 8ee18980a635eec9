//! FitTrack Tracker 服务入口

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use fittrack_adapter_nutrition::{OpenAiConfig, OpenAiRecognizer, UsdaClient, UsdaConfig};
use fittrack_adapter_postgres::{PostgresConfig, PostgresProfileStore, create_pool};
use fittrack_config::AppConfig;
use fittrack_ports::{ObjectStoragePort, ProfileStorePort};
use fittrack_tracker::api::http::{ApiState, router};
use fittrack_tracker::application::context::{Repositories, SessionServices};
use fittrack_tracker::application::services::{
    FoodLogService, NutritionService, RecognitionService,
};
use fittrack_tracker::identity::UserDirectory;
use fittrack_tracker::infrastructure::auth::LocalSessionStore;
use fittrack_tracker::infrastructure::storage::LocalObjectStorage;
use fittrack_tracker::runtime::{init_runtime, shutdown_signal};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load("config")?;
    init_runtime(&config);

    let metrics = if config.telemetry.metrics_enabled {
        match fittrack_telemetry::init_metrics() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "Failed to install Prometheus recorder, metrics disabled");
                None
            }
        }
    } else {
        None
    };

    let pg_config = PostgresConfig::new(config.database.url.clone())
        .with_max_connections(config.database.max_connections);
    let pool = create_pool(&pg_config).await?;
    let repos = Repositories::postgres(pool.clone());
    let store: Arc<dyn ProfileStorePort> = Arc::new(PostgresProfileStore::new(pool.clone()));

    // 对象存储
    let bucket = config.storage.bucket_name();
    let storage: Arc<dyn ObjectStoragePort> = Arc::new(LocalObjectStorage::new(
        config.storage.root.clone(),
        config.storage.public_base_url.clone(),
    ));
    match &bucket {
        Some(bucket) => info!(bucket, root = %config.storage.root, "Object storage enabled"),
        None => warn!("Storage bucket not configured, image uploads are skipped"),
    }

    // 会话
    let auth = Arc::new(LocalSessionStore::new());
    let session = Arc::new(SessionServices::new(
        auth.clone(),
        store.clone(),
        storage.clone(),
        repos.clone(),
        bucket.clone(),
    ));
    let watcher = session.session.watch();

    // 外部营养数据与识别服务
    let usda = UsdaClient::new(
        UsdaConfig::new(
            config.nutrition.usda_base_url.clone(),
            config.nutrition.usda_api_key.clone(),
        )
        .with_timeout(Duration::from_secs(config.nutrition.timeout_secs)),
    )?;
    if !usda.is_configured() {
        warn!("USDA API key not configured, nutrition search returns no results");
    }
    let recognizer = OpenAiRecognizer::new(
        OpenAiConfig::new(
            config.recognition.base_url.clone(),
            config.recognition.api_key.clone(),
        )
        .with_model(config.recognition.model.clone())
        .with_timeout(Duration::from_secs(config.recognition.timeout_secs)),
    )?;

    let state = ApiState {
        directory: Arc::new(UserDirectory::new(store)),
        food_logs: Arc::new(FoodLogService::new(repos.food_logs.clone())),
        nutrition: Arc::new(NutritionService::new(Arc::new(usda))),
        recognition: Arc::new(RecognitionService::new(
            Arc::new(recognizer),
            repos.food_logs,
            storage,
            bucket.clone(),
        )),
        auth,
        session,
        uploads_dir: bucket.map(|_| PathBuf::from(&config.storage.root)),
        pool: Some(pool),
        metrics,
    };
    let app = router(state, &config.cors.origin_list());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "Starting tracker service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    watcher.abort();
    info!("Tracker service stopped");
    Ok(())
}
