//! Device repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{Device, DeviceType, DeviceUpdate, NewDevice};
use domain::store::DeviceStore;
use domain::StoreError;

use crate::entities::DeviceEntity;

const DEVICE_COLUMNS: &str =
    "id, name, ip_address, device_type, description, location, is_active, created_at";

/// Repository for monitored device database operations.
#[derive(Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceStore for DeviceRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Device>, StoreError> {
        let entity = sqlx::query_as::<_, DeviceEntity>(&format!(
            "SELECT {} FROM devices WHERE id = $1",
            DEVICE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(entity_to_domain))
    }

    async fn insert(&self, input: &NewDevice) -> Result<Device, StoreError> {
        let entity = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            INSERT INTO devices (name, ip_address, device_type, description, location)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            DEVICE_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.ip_address)
        .bind(input.device_type.to_string())
        .bind(input.description.as_deref())
        .bind(input.location.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(entity_to_domain(entity))
    }

    async fn update(&self, id: Uuid, update: &DeviceUpdate) -> Result<Option<Device>, StoreError> {
        let entity = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            UPDATE devices
            SET name = COALESCE($2, name),
                ip_address = COALESCE($3, ip_address),
                device_type = COALESCE($4, device_type),
                description = COALESCE($5, description),
                location = COALESCE($6, location),
                is_active = COALESCE($7, is_active)
            WHERE id = $1
            RETURNING {}
            "#,
            DEVICE_COLUMNS
        ))
        .bind(id)
        .bind(update.name.as_deref())
        .bind(update.ip_address.as_deref())
        .bind(update.device_type.map(|t| t.to_string()))
        .bind(update.description.as_deref())
        .bind(update.location.as_deref())
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(entity_to_domain))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::from)?;

        // Alerts referencing removed entries detach via ON DELETE SET NULL.
        sqlx::query("DELETE FROM user_permissions WHERE device_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM access_logs WHERE device_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await.map_err(StoreError::from)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<Device>, StoreError> {
        let entities = sqlx::query_as::<_, DeviceEntity>(&format!(
            "SELECT {} FROM devices ORDER BY name ASC",
            DEVICE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(entity_to_domain).collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM devices")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Convert entity to domain model.
fn entity_to_domain(entity: DeviceEntity) -> Device {
    Device {
        id: entity.id,
        name: entity.name,
        ip_address: entity.ip_address,
        device_type: entity
            .device_type
            .parse::<DeviceType>()
            .unwrap_or(DeviceType::Computer),
        description: entity.description,
        location: entity.location,
        is_active: entity.is_active,
        created_at: entity.created_at,
    }
}
