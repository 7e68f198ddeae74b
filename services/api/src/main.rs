use anyhow::Result;
use aws_config::BehaviorVersion;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use api::{
    config::AppConfig,
    image_store::{ImageStore, S3ImageStore},
    repositories::{PgUserStore, PgVinylStore, UserStore, VinylStore},
    routes,
    session::{InMemorySessionStore, RedisSessionStore, SessionStore},
    state::AppState,
};
use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting Disclist API service");

    let config = AppConfig::from_env();

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    sqlx::migrate!().run(&pool).await?;

    // Session backend: Redis when configured, in-memory otherwise
    let sessions: Arc<dyn SessionStore> = if std::env::var("REDIS_URL").is_ok() {
        let redis_config = RedisConfig::from_env()?;
        let redis_pool = RedisPool::new(&redis_config).await?;
        Arc::new(RedisSessionStore::new(
            redis_pool,
            config.session_ttl_seconds,
        ))
    } else {
        warn!("REDIS_URL not set, sessions are in-memory and lost on restart");
        Arc::new(InMemorySessionStore::new(Duration::from_secs(
            config.session_ttl_seconds,
        )))
    };

    // Initialize AWS S3 client for cover image uploads
    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_client = aws_sdk_s3::Client::new(&aws_config);
    let images: Arc<dyn ImageStore> = Arc::new(S3ImageStore::new(
        s3_client,
        config.bucket_name.clone(),
        config.region.clone(),
    ));

    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
    let vinyls: Arc<dyn VinylStore> = Arc::new(PgVinylStore::new(pool));

    let app_state = AppState {
        config: config.clone(),
        users,
        vinyls,
        sessions,
        images,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Disclist API listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
