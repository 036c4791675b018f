//! Audit trail repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use domain::models::{
    AccessAction, AccessLogEntry, AccessStatus, Alert, LogFilter, LogStats, NewAlert, NewLogEntry,
};
use domain::store::AuditLogStore;
use domain::StoreError;

use crate::entities::{AccessLogEntity, AlertEntity};
use crate::metrics::QueryTimer;
use crate::repositories::alert;

const LOG_COLUMNS: &str = "id, user_id, device_id, access_time, action, status, \
     ip_address, user_agent, details, is_suspicious";

/// Repository for the append-only audit trail.
#[derive(Clone)]
pub struct AccessLogRepository {
    pool: PgPool,
}

impl AccessLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogStore for AccessLogRepository {
    async fn append(&self, entry: &NewLogEntry) -> Result<AccessLogEntry, StoreError> {
        let entity = sqlx::query_as::<_, AccessLogEntity>(&format!(
            r#"
            INSERT INTO access_logs
                (user_id, device_id, action, status, ip_address, user_agent,
                 details, is_suspicious)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            LOG_COLUMNS
        ))
        .bind(entry.user_id)
        .bind(entry.device_id)
        .bind(entry.action.to_string())
        .bind(entry.status.to_string())
        .bind(entry.ip_address.as_deref())
        .bind(entry.user_agent.as_deref())
        .bind(entry.details.as_deref())
        .bind(entry.is_suspicious)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity_to_domain(entity))
    }

    async fn append_suspicious(
        &self,
        entry: &NewLogEntry,
        new_alert: &NewAlert,
    ) -> Result<(AccessLogEntry, Alert), StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::from)?;

        let log_entity = sqlx::query_as::<_, AccessLogEntity>(&format!(
            r#"
            INSERT INTO access_logs
                (user_id, device_id, action, status, ip_address, user_agent,
                 details, is_suspicious)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            LOG_COLUMNS
        ))
        .bind(entry.user_id)
        .bind(entry.device_id)
        .bind(entry.action.to_string())
        .bind(entry.status.to_string())
        .bind(entry.ip_address.as_deref())
        .bind(entry.user_agent.as_deref())
        .bind(entry.details.as_deref())
        .bind(entry.is_suspicious)
        .fetch_one(&mut *tx)
        .await?;

        let alert_entity = sqlx::query_as::<_, AlertEntity>(&format!(
            r#"
            INSERT INTO alerts (title, description, severity, log_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            alert::ALERT_COLUMNS
        ))
        .bind(&new_alert.title)
        .bind(new_alert.description.as_deref())
        .bind(new_alert.severity.to_string())
        .bind(log_entity.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await.map_err(StoreError::from)?;

        debug!(log_id = log_entity.id, "recorded suspicious entry with alert");

        Ok((
            entity_to_domain(log_entity),
            alert::entity_to_domain(alert_entity),
        ))
    }

    async fn query(&self, filter: &LogFilter) -> Result<Vec<AccessLogEntry>, StoreError> {
        let timer = QueryTimer::new("audit_query");

        let (from, until) = filter.time_window();
        let mut conditions: Vec<String> = Vec::new();
        let mut idx = 0;

        if filter.user_id.is_some() {
            idx += 1;
            conditions.push(format!("user_id = ${}", idx));
        }
        if filter.device_id.is_some() {
            idx += 1;
            conditions.push(format!("device_id = ${}", idx));
        }
        if from.is_some() {
            idx += 1;
            conditions.push(format!("access_time >= ${}", idx));
        }
        if until.is_some() {
            idx += 1;
            conditions.push(format!("access_time < ${}", idx));
        }
        if filter.suspicious_only {
            conditions.push("is_suspicious = TRUE".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT {} FROM access_logs {} ORDER BY access_time DESC, id DESC",
            LOG_COLUMNS, where_clause
        );

        let mut query = sqlx::query_as::<_, AccessLogEntity>(&sql);
        if let Some(user_id) = filter.user_id {
            query = query.bind(user_id);
        }
        if let Some(device_id) = filter.device_id {
            query = query.bind(device_id);
        }
        if let Some(from) = from {
            query = query.bind(from);
        }
        if let Some(until) = until {
            query = query.bind(until);
        }

        let entities = query.fetch_all(&self.pool).await?;
        timer.record();

        Ok(entities.into_iter().map(entity_to_domain).collect())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<AccessLogEntry>, StoreError> {
        let entities = sqlx::query_as::<_, AccessLogEntity>(&format!(
            "SELECT {} FROM access_logs ORDER BY access_time DESC, id DESC LIMIT $1",
            LOG_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(entity_to_domain).collect())
    }

    async fn stats(&self) -> Result<LogStats, StoreError> {
        let timer = QueryTimer::new("audit_stats");

        let row: (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE is_suspicious = TRUE),
                COUNT(*) FILTER (WHERE action = 'failed_login'),
                COUNT(*) FILTER (WHERE access_time >= NOW() - INTERVAL '24 hours')
            FROM access_logs
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        timer.record();

        Ok(LogStats {
            total_logs: row.0,
            suspicious_logs: row.1,
            failed_logins: row.2,
            recent_logs_24h: row.3,
        })
    }
}

/// Convert entity to domain model.
fn entity_to_domain(entity: AccessLogEntity) -> AccessLogEntry {
    AccessLogEntry {
        id: entity.id,
        user_id: entity.user_id,
        device_id: entity.device_id,
        access_time: entity.access_time,
        action: entity
            .action
            .parse::<AccessAction>()
            .unwrap_or(AccessAction::DeviceAccess),
        status: entity
            .status
            .parse::<AccessStatus>()
            .unwrap_or(AccessStatus::Failed),
        ip_address: entity.ip_address,
        user_agent: entity.user_agent,
        details: entity.details,
        is_suspicious: entity.is_suspicious,
    }
}
