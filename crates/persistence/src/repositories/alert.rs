//! Security alert repository for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{Alert, AlertSeverity};
use domain::store::AlertStore;
use domain::StoreError;

use crate::entities::AlertEntity;

pub(crate) const ALERT_COLUMNS: &str =
    "id, title, description, severity, created_at, is_resolved, resolved_at, log_id";

/// Repository for security alert database operations.
#[derive(Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for AlertRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Alert>, StoreError> {
        let entity = sqlx::query_as::<_, AlertEntity>(&format!(
            "SELECT {} FROM alerts WHERE id = $1",
            ALERT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(entity_to_domain))
    }

    async fn list(&self, show_resolved: bool) -> Result<Vec<Alert>, StoreError> {
        let sql = if show_resolved {
            format!(
                "SELECT {} FROM alerts ORDER BY created_at DESC",
                ALERT_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM alerts WHERE is_resolved = FALSE ORDER BY created_at DESC",
                ALERT_COLUMNS
            )
        };

        let entities = sqlx::query_as::<_, AlertEntity>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(entity_to_domain).collect())
    }

    async fn count_unresolved(&self) -> Result<i64, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM alerts WHERE is_resolved = FALSE")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn resolve(
        &self,
        id: Uuid,
        resolved_at: DateTime<Utc>,
    ) -> Result<Option<Alert>, StoreError> {
        // Conditional update keeps the first resolution timestamp; an
        // already-resolved alert is left untouched.
        let entity = sqlx::query_as::<_, AlertEntity>(&format!(
            r#"
            UPDATE alerts
            SET is_resolved = TRUE, resolved_at = $2
            WHERE id = $1 AND is_resolved = FALSE
            RETURNING {}
            "#,
            ALERT_COLUMNS
        ))
        .bind(id)
        .bind(resolved_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(entity_to_domain))
    }
}

/// Convert entity to domain model.
pub(crate) fn entity_to_domain(entity: AlertEntity) -> Alert {
    Alert {
        id: entity.id,
        title: entity.title,
        description: entity.description,
        severity: entity
            .severity
            .parse::<AlertSeverity>()
            .unwrap_or(AlertSeverity::Medium),
        created_at: entity.created_at,
        is_resolved: entity.is_resolved,
        resolved_at: entity.resolved_at,
        log_id: entity.log_id,
    }
}
