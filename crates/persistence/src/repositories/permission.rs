//! Permission grant repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{Capabilities, NewGrant, PermissionGrant};
use domain::store::PermissionStore;
use domain::StoreError;

use crate::entities::PermissionEntity;

const GRANT_COLUMNS: &str =
    "id, user_id, device_id, can_read, can_write, can_execute, granted_by, granted_at";

/// Repository for permission grant database operations.
#[derive(Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PermissionRepository {
    async fn find(
        &self,
        user_id: Uuid,
        device_id: Uuid,
    ) -> Result<Option<PermissionGrant>, StoreError> {
        let entity = sqlx::query_as::<_, PermissionEntity>(&format!(
            "SELECT {} FROM user_permissions WHERE user_id = $1 AND device_id = $2",
            GRANT_COLUMNS
        ))
        .bind(user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(entity_to_domain))
    }

    async fn upsert(&self, grant: &NewGrant) -> Result<PermissionGrant, StoreError> {
        let entity = sqlx::query_as::<_, PermissionEntity>(&format!(
            r#"
            INSERT INTO user_permissions
                (user_id, device_id, can_read, can_write, can_execute, granted_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, device_id) DO UPDATE SET
                can_read = EXCLUDED.can_read,
                can_write = EXCLUDED.can_write,
                can_execute = EXCLUDED.can_execute,
                granted_by = EXCLUDED.granted_by,
                granted_at = NOW()
            RETURNING {}
            "#,
            GRANT_COLUMNS
        ))
        .bind(grant.user_id)
        .bind(grant.device_id)
        .bind(grant.capabilities.can_read)
        .bind(grant.capabilities.can_write)
        .bind(grant.capabilities.can_execute)
        .bind(grant.granted_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity_to_domain(entity))
    }

    async fn delete(&self, user_id: Uuid, device_id: Uuid) -> Result<bool, StoreError> {
        let result =
            sqlx::query("DELETE FROM user_permissions WHERE user_id = $1 AND device_id = $2")
                .bind(user_id)
                .bind(device_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PermissionGrant>, StoreError> {
        let entities = sqlx::query_as::<_, PermissionEntity>(&format!(
            "SELECT {} FROM user_permissions WHERE user_id = $1 ORDER BY granted_at DESC",
            GRANT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(entity_to_domain).collect())
    }

    async fn list_for_device(&self, device_id: Uuid) -> Result<Vec<PermissionGrant>, StoreError> {
        let entities = sqlx::query_as::<_, PermissionEntity>(&format!(
            "SELECT {} FROM user_permissions WHERE device_id = $1 ORDER BY granted_at DESC",
            GRANT_COLUMNS
        ))
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(entity_to_domain).collect())
    }
}

/// Convert entity to domain model.
fn entity_to_domain(entity: PermissionEntity) -> PermissionGrant {
    PermissionGrant {
        id: entity.id,
        user_id: entity.user_id,
        device_id: entity.device_id,
        capabilities: Capabilities {
            can_read: entity.can_read,
            can_write: entity.can_write,
            can_execute: entity.can_execute,
        },
        granted_by: entity.granted_by,
        granted_at: entity.granted_at,
    }
}
