//! # Catalog Server
//!
//! Process entry point: loads configuration, connects MySQL and Redis, wires
//! the services and runs until Ctrl+C or SIGTERM.

use catalog_config::{AppConfig, ConfigLoader};
use catalog_core::{telemetry::init_tracing, CatalogError, CatalogResult, PageRequest};
use catalog_repository::{create_pool, DatabasePoolInterface};
use catalog_server::di::{CatalogModuleBuilder, CatalogResolver};
use catalog_server::health::run_health_checks;
use catalog_server::startup::{print_banner, print_startup_info};
use catalog_service::{
    create_redis_pool, spawn_idle_reaper, warm_up, CachePolicy, RedisCacheService,
};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location().load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(&config.observability) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    info!("Starting catalog server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> CatalogResult<()> {
    print_banner();
    print_startup_info(&config);

    let db_pool = create_pool(&config.database).await?;
    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }
    if !run_health_checks(&[&*db_pool]).await {
        return Err(CatalogError::Database(
            "database failed its startup health check".to_string(),
        ));
    }

    let redis_pool = create_redis_pool(&config.redis)?;
    let reaper = match &redis_pool {
        Some(pool) => {
            match warm_up(pool, config.redis.min_idle).await {
                Ok(warmed) => info!("Opened {} idle Redis connections", warmed),
                Err(e) => warn!("Redis warm-up failed, continuing with a cold pool: {}", e),
            }
            Some(spawn_idle_reaper(
                pool.clone(),
                config.redis.max_idle,
                config.redis.reap_interval(),
            ))
        }
        None => None,
    };

    let cache_health = redis_pool
        .clone()
        .map_or_else(RedisCacheService::disabled, RedisCacheService::new);
    if !run_health_checks(&[&cache_health]).await {
        warn!("Redis is unreachable; product lookups will be served from MySQL");
    }

    let module = CatalogModuleBuilder::new()
        .with_database_pool(db_pool.inner().clone())
        .with_redis_pool(redis_pool.clone())
        .with_cache_policy(CachePolicy::from(&config.cache))
        .build()?;

    let products = module.product_service().find_all_paged(PageRequest::new(0, 1)).await?;
    let categories = module.category_service().find_all().await?;
    info!(
        "Catalog ready: {} products, {} categories",
        products.total_elements(),
        categories.len()
    );

    shutdown_signal().await;

    if let Some(reaper) = reaper {
        reaper.abort();
    }
    if let Some(pool) = redis_pool {
        pool.close();
    }
    db_pool.close().await;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
