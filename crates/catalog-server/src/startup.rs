//! Server startup utilities.

use catalog_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
   ______      __        __
  / ____/___ _/ /_____ _/ /___  ____ _
 / /   / __ `/ __/ __ `/ / __ \/ __ `/
/ /___/ /_/ / /_/ /_/ / / /_/ / /_/ /
\____/\__,_/\__/\__,_/_/\____/\__, /
                             /____/
    "#);
}

/// Prints the effective store and cache settings.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Application: {} {}", config.app.name, config.app.version);
    info!("Environment: {}", config.app.environment);
    info!("Database:    {}", redact_credentials(&config.database.url));
    if config.redis.enabled {
        info!(
            "Redis:       {}:{}/{} (max_active={}, max_idle={}, min_idle={})",
            config.redis.host,
            config.redis.port,
            config.redis.database,
            config.redis.max_active,
            config.redis.max_idle,
            config.redis.min_idle
        );
    } else {
        info!("Redis:       disabled");
    }
    info!(
        "Cache:       invalidate_on_write={}, populate_on_read={}, ttl={:?}",
        config.cache.invalidate_on_write,
        config.cache.populate_on_read,
        config.cache.ttl()
    );
    info!("{}", separator);
}

/// Hides the user-info part of a connection URL.
fn redact_credentials(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
