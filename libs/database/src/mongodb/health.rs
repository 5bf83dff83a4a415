use mongodb::{Database, bson::doc};
use std::time::Instant;

/// Result of a readiness probe against MongoDB.
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// Ping the server through `db`.
pub async fn check_health(db: &Database) -> bool {
    check_health_detailed(db).await.healthy
}

/// Ping the server and report latency, or the error on failure.
pub async fn check_health_detailed(db: &Database) -> HealthStatus {
    let start = Instant::now();
    let outcome = db.run_command(doc! { "ping": 1 }).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(_) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms,
        },
    }
}
