//! Shared test harness: an in-memory implementation of the store seams
//! plus fixtures for an admin, a regular user and one device.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use control::AccessController;
use domain::models::{
    AccessAction, AccessLogEntry, AccessStatus, Alert, Capabilities, Device, DeviceType,
    DeviceUpdate, LogFilter, LogStats, NewAlert, NewDevice, NewGrant, NewLogEntry,
    PermissionGrant, Principal, User, UserRole, UserUpdate,
};
use domain::store::{AlertStore, AuditLogStore, DeviceStore, PermissionStore, UserStore};
use domain::StoreError;

#[derive(Default)]
struct State {
    users: Vec<User>,
    devices: Vec<Device>,
    grants: Vec<PermissionGrant>,
    logs: Vec<AccessLogEntry>,
    alerts: Vec<Alert>,
    next_log_id: i64,
}

/// One Mutex-guarded state backing all five store traits.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Raw log rows, for assertions about exactly-once recording.
    pub fn raw_logs(&self) -> Vec<AccessLogEntry> {
        self.state.lock().unwrap().logs.clone()
    }

    /// Raw alert rows.
    pub fn raw_alerts(&self) -> Vec<Alert> {
        self.state.lock().unwrap().alerts.clone()
    }

    /// Raw grant rows.
    pub fn raw_grants(&self) -> Vec<PermissionGrant> {
        self.state.lock().unwrap().grants.clone()
    }

    fn append_log(state: &mut State, entry: &NewLogEntry) -> AccessLogEntry {
        state.next_log_id += 1;
        let row = AccessLogEntry {
            id: state.next_log_id,
            user_id: entry.user_id,
            device_id: entry.device_id,
            access_time: Utc::now(),
            action: entry.action,
            status: entry.status,
            ip_address: entry.ip_address.clone(),
            user_agent: entry.user_agent.clone(),
            details: entry.details.clone(),
            is_suspicious: entry.is_suspicious,
        };
        state.logs.push(row.clone());
        row
    }

    fn remove_logs(state: &mut State, keep: impl Fn(&AccessLogEntry) -> bool) {
        let removed: Vec<i64> = state
            .logs
            .iter()
            .filter(|l| !keep(l))
            .map(|l| l.id)
            .collect();
        state.logs.retain(&keep);
        for alert in &mut state.alerts {
            if let Some(log_id) = alert.log_id {
                if removed.contains(&log_id) {
                    alert.log_id = None;
                }
            }
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state
            .users
            .iter()
            .any(|u| u.username == username || u.email == email)
        {
            return Err(StoreError::Duplicate);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            is_active: true,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, update: &UserUpdate) -> Result<Option<User>, StoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Ok(false);
        }
        for grant in &mut state.grants {
            if grant.granted_by == Some(id) {
                grant.granted_by = None;
            }
        }
        state.grants.retain(|g| g.user_id != id);
        Self::remove_logs(&mut state, |l| l.user_id != id);
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let mut users = self.state.lock().unwrap().users.clone();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.state.lock().unwrap().users.len() as i64)
    }

    async fn count_enabled_admins(&self) -> Result<i64, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .filter(|u| u.role == UserRole::Admin && u.is_active)
            .count() as i64)
    }
}

#[async_trait]
impl DeviceStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Device>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.devices.iter().find(|d| d.id == id).cloned())
    }

    async fn insert(&self, input: &NewDevice) -> Result<Device, StoreError> {
        let mut state = self.state.lock().unwrap();
        let device = Device {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            ip_address: input.ip_address.clone(),
            device_type: input.device_type,
            description: input.description.clone(),
            location: input.location.clone(),
            is_active: true,
            created_at: Utc::now(),
        };
        state.devices.push(device.clone());
        Ok(device)
    }

    async fn update(&self, id: Uuid, update: &DeviceUpdate) -> Result<Option<Device>, StoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(device) = state.devices.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            device.name = name.clone();
        }
        if let Some(ip) = &update.ip_address {
            device.ip_address = ip.clone();
        }
        if let Some(device_type) = update.device_type {
            device.device_type = device_type;
        }
        if let Some(description) = &update.description {
            device.description = Some(description.clone());
        }
        if let Some(location) = &update.location {
            device.location = Some(location.clone());
        }
        if let Some(is_active) = update.is_active {
            device.is_active = is_active;
        }
        Ok(Some(device.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.devices.len();
        state.devices.retain(|d| d.id != id);
        if state.devices.len() == before {
            return Ok(false);
        }
        state.grants.retain(|g| g.device_id != id);
        Self::remove_logs(&mut state, |l| l.device_id != Some(id));
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<Device>, StoreError> {
        let mut devices = self.state.lock().unwrap().devices.clone();
        devices.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(devices)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.state.lock().unwrap().devices.len() as i64)
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn find(
        &self,
        user_id: Uuid,
        device_id: Uuid,
    ) -> Result<Option<PermissionGrant>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .grants
            .iter()
            .find(|g| g.user_id == user_id && g.device_id == device_id)
            .cloned())
    }

    async fn upsert(&self, grant: &NewGrant) -> Result<PermissionGrant, StoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state
            .grants
            .iter_mut()
            .find(|g| g.user_id == grant.user_id && g.device_id == grant.device_id)
        {
            existing.capabilities = grant.capabilities;
            existing.granted_by = Some(grant.granted_by);
            existing.granted_at = Utc::now();
            return Ok(existing.clone());
        }
        let row = PermissionGrant {
            id: Uuid::new_v4(),
            user_id: grant.user_id,
            device_id: grant.device_id,
            capabilities: grant.capabilities,
            granted_by: Some(grant.granted_by),
            granted_at: Utc::now(),
        };
        state.grants.push(row.clone());
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, device_id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.grants.len();
        state
            .grants
            .retain(|g| !(g.user_id == user_id && g.device_id == device_id));
        Ok(state.grants.len() != before)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PermissionGrant>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .grants
            .iter()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_for_device(&self, device_id: Uuid) -> Result<Vec<PermissionGrant>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .grants
            .iter()
            .filter(|g| g.device_id == device_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AuditLogStore for MemoryStore {
    async fn append(&self, entry: &NewLogEntry) -> Result<AccessLogEntry, StoreError> {
        let mut state = self.state.lock().unwrap();
        Ok(Self::append_log(&mut state, entry))
    }

    async fn append_suspicious(
        &self,
        entry: &NewLogEntry,
        alert: &NewAlert,
    ) -> Result<(AccessLogEntry, Alert), StoreError> {
        let mut state = self.state.lock().unwrap();
        let row = Self::append_log(&mut state, entry);
        let alert = Alert {
            id: Uuid::new_v4(),
            title: alert.title.clone(),
            description: alert.description.clone(),
            severity: alert.severity,
            created_at: Utc::now(),
            is_resolved: false,
            resolved_at: None,
            log_id: Some(row.id),
        };
        state.alerts.push(alert.clone());
        Ok((row, alert))
    }

    async fn query(&self, filter: &LogFilter) -> Result<Vec<AccessLogEntry>, StoreError> {
        let state = self.state.lock().unwrap();
        let (from, until) = filter.time_window();
        let mut rows: Vec<AccessLogEntry> = state
            .logs
            .iter()
            .filter(|l| filter.user_id.is_none_or(|id| l.user_id == id))
            .filter(|l| filter.device_id.is_none_or(|id| l.device_id == Some(id)))
            .filter(|l| from.is_none_or(|t| l.access_time >= t))
            .filter(|l| until.is_none_or(|t| l.access_time < t))
            .filter(|l| !filter.suspicious_only || l.is_suspicious)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.access_time, b.id).cmp(&(a.access_time, a.id)));
        Ok(rows)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<AccessLogEntry>, StoreError> {
        let mut rows = self.query(&LogFilter::default()).await?;
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn stats(&self) -> Result<LogStats, StoreError> {
        let state = self.state.lock().unwrap();
        let cutoff = Utc::now() - chrono::Duration::hours(24);
        Ok(LogStats {
            total_logs: state.logs.len() as i64,
            suspicious_logs: state.logs.iter().filter(|l| l.is_suspicious).count() as i64,
            failed_logins: state
                .logs
                .iter()
                .filter(|l| l.action == AccessAction::FailedLogin)
                .count() as i64,
            recent_logs_24h: state
                .logs
                .iter()
                .filter(|l| l.access_time >= cutoff)
                .count() as i64,
        })
    }
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Alert>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.alerts.iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self, show_resolved: bool) -> Result<Vec<Alert>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut alerts: Vec<Alert> = state
            .alerts
            .iter()
            .filter(|a| show_resolved || !a.is_resolved)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts)
    }

    async fn count_unresolved(&self) -> Result<i64, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.alerts.iter().filter(|a| !a.is_resolved).count() as i64)
    }

    async fn resolve(
        &self,
        id: Uuid,
        resolved_at: DateTime<Utc>,
    ) -> Result<Option<Alert>, StoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(alert) = state.alerts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if alert.is_resolved {
            return Ok(None);
        }
        alert.is_resolved = true;
        alert.resolved_at = Some(resolved_at);
        Ok(Some(alert.clone()))
    }
}

/// The fixtures every scenario starts from: admin alice, regular user bob,
/// and one camera device.
pub struct Harness {
    pub controller: AccessController,
    pub store: Arc<MemoryStore>,
    pub alice: Principal,
    pub bob: Principal,
    pub bob_user: User,
    pub cam1: Device,
}

pub const ALICE_PASSWORD: &str = "alice-passw0rd";
pub const BOB_PASSWORD: &str = "bob-passw0rd";

pub async fn harness() -> Harness {
    let store = MemoryStore::new();
    let controller = AccessController::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );

    let alice_hash = shared::password::hash_password(ALICE_PASSWORD).unwrap();
    let alice = UserStore::insert(
        store.as_ref(),
        "alice",
        "alice@example.com",
        &alice_hash,
        UserRole::Admin,
    )
    .await
    .unwrap();

    let bob_hash = shared::password::hash_password(BOB_PASSWORD).unwrap();
    let bob_user = UserStore::insert(
        store.as_ref(),
        "bob",
        "bob@example.com",
        &bob_hash,
        UserRole::User,
    )
    .await
    .unwrap();

    let cam1 = DeviceStore::insert(
        store.as_ref(),
        &NewDevice {
            name: "cam1".to_string(),
            ip_address: "10.0.4.17".to_string(),
            device_type: DeviceType::Camera,
            description: Some("lobby camera".to_string()),
            location: Some("front lobby".to_string()),
        },
    )
    .await
    .unwrap();

    Harness {
        controller,
        store,
        alice: Principal::from(&alice),
        bob: Principal::from(&bob_user),
        bob_user,
        cam1,
    }
}

/// Grants bob read-only access to a device, acting as alice.
pub async fn grant_bob(h: &Harness, device_id: Uuid) -> PermissionGrant {
    h.controller
        .grant_permission(&h.alice, h.bob.user_id, device_id, Capabilities::read_only())
        .await
        .unwrap()
        .unwrap()
}

/// Count of rows matching an action/status pair, ignoring ordering.
pub fn count_logs(h: &Harness, action: AccessAction, status: AccessStatus) -> usize {
    h.store
        .raw_logs()
        .iter()
        .filter(|l| l.action == action && l.status == status)
        .count()
}
