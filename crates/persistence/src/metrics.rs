//! Database metrics collection.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record a query duration under its name.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "sentry_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Record connection pool health; call periodically from the embedding
/// service.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("sentry_db_connections_active").set(size.saturating_sub(idle) as f64);
    gauge!("sentry_db_connections_idle").set(idle as f64);
    gauge!("sentry_db_connections_total").set(size as f64);
}

/// Times one database operation and records it on `record()`.
pub struct QueryTimer {
    query_name: String,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        record_query_duration(&self.query_name, self.start.elapsed().as_secs_f64());
    }
}
