//! Operator control panel and admin sessions
//!
//! One [`ControlPanel`] exists per gateway process. It is created at
//! startup, handed to the handlers through [`crate::AppState`], and reset to
//! defaults on request. Only holders of a live admin token may change it.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use system_health::Subsystem;
use uuid::Uuid;
use zelonia_sites::{ClusterId, ClusterStatuses, SystemStatus};

use crate::config::AdminCredentials;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPanel {
    pub clusters: ClusterStatuses,
    pub subsystems: BTreeMap<Subsystem, SystemStatus>,
    pub show_attack_server: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            clusters: ClusterId::all()
                .into_iter()
                .map(|c| (c, SystemStatus::Online))
                .collect(),
            subsystems: Subsystem::all()
                .into_iter()
                .map(|s| (s, SystemStatus::Online))
                .collect(),
            show_attack_server: false,
        }
    }
}

/// Partial update; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ControlUpdate {
    pub clusters: BTreeMap<ClusterId, SystemStatus>,
    pub subsystems: BTreeMap<Subsystem, SystemStatus>,
    pub show_attack_server: Option<bool>,
}

impl ControlUpdate {
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty() && self.subsystems.is_empty() && self.show_attack_server.is_none()
    }
}

impl ControlPanel {
    pub fn cluster_status(&self, cluster: ClusterId) -> SystemStatus {
        self.clusters.get(&cluster).copied().unwrap_or_default()
    }

    pub fn subsystem_status(&self, subsystem: Subsystem) -> SystemStatus {
        self.subsystems.get(&subsystem).copied().unwrap_or_default()
    }

    pub fn apply(&mut self, update: ControlUpdate) {
        self.clusters.extend(update.clusters);
        self.subsystems.extend(update.subsystems);
        if let Some(show) = update.show_attack_server {
            self.show_attack_server = show;
        }
    }
}

/// Admin tokens stop working this long after login
pub const SESSION_TTL_HOURS: i64 = 12;

/// Issued admin tokens with their login time
pub struct SessionStore {
    credentials: AdminCredentials,
    ttl: Duration,
    tokens: RwLock<HashMap<Uuid, DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new(credentials: AdminCredentials) -> Self {
        Self::with_ttl(credentials, Duration::hours(SESSION_TTL_HOURS))
    }

    pub fn with_ttl(credentials: AdminCredentials, ttl: Duration) -> Self {
        Self {
            credentials,
            ttl,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    fn is_live(&self, issued: &DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - *issued < self.ttl
    }

    /// Issue a token when the credential pair matches. Expired tokens are
    /// dropped on every login.
    pub fn login(&self, username: &str, password: &str) -> Option<Uuid> {
        if username != self.credentials.username || password != self.credentials.password {
            return None;
        }
        let now = Utc::now();
        let token = Uuid::new_v4();

        let mut tokens = self.tokens.write();
        let before = tokens.len();
        tokens.retain(|_, issued| self.is_live(issued, now));
        if tokens.len() < before {
            tracing::debug!("Pruned {} expired admin sessions", before - tokens.len());
        }
        tokens.insert(token, now);
        Some(token)
    }

    pub fn logout(&self, token: &Uuid) -> bool {
        self.tokens.write().remove(token).is_some()
    }

    pub fn is_admin(&self, token: &Uuid) -> bool {
        let now = Utc::now();
        self.tokens
            .read()
            .get(token)
            .map_or(false, |issued| self.is_live(issued, now))
    }

    pub fn active(&self) -> usize {
        let now = Utc::now();
        self.tokens
            .read()
            .values()
            .filter(|issued| self.is_live(issued, now))
            .count()
    }
}
