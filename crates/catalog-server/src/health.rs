//! Startup health checks.

use catalog_core::{HealthCheck, HealthStatus};
use tracing::{error, info, warn};

/// Runs every check once and logs the outcome.
///
/// Returns `false` if any check reports `Unhealthy`. A degraded check is
/// logged but does not fail startup.
pub async fn run_health_checks(checks: &[&dyn HealthCheck]) -> bool {
    let mut healthy = true;
    for check in checks {
        match check.check().await {
            HealthStatus::Healthy => info!("Health check '{}': healthy", check.name()),
            HealthStatus::Degraded(reason) => {
                warn!("Health check '{}': degraded ({})", check.name(), reason);
            }
            HealthStatus::Unhealthy(reason) => {
                error!("Health check '{}': unhealthy ({})", check.name(), reason);
                healthy = false;
            }
        }
    }
    healthy
}
