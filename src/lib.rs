//! FitTrack core.
//!
//! Member, package and session management for the FitTrack gym dashboard,
//! persisted to a local SQLite key-value store.

pub mod analytics;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;

use chrono::{DateTime, Utc};

use auth::SessionManager;
use config::Config;
use db::{MemberRepository, PackageRepository, PersistedStore, EXPIRING_SOON_DAYS};
use errors::AppError;

/// Everything the dashboard pages call into, sharing one store.
pub struct AppState {
    pub members: MemberRepository,
    pub packages: PackageRepository,
    pub session: SessionManager,
}

impl AppState {
    /// Open the configured SQLite store and load every collection.
    pub async fn from_config(config: &Config, now: DateTime<Utc>) -> Result<Self, AppError> {
        let store = db::open_store(&config.db_path).await?;
        Self::open(store, config, now).await
    }

    /// Load every collection from `store`, seeding fixtures when enabled.
    pub async fn open(
        store: PersistedStore,
        config: &Config,
        now: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let state = if config.seed_fixtures {
            Self {
                members: MemberRepository::open_seeded(store.clone(), now).await?,
                packages: PackageRepository::open_seeded(store.clone()).await?,
                session: SessionManager::open_seeded(store, config.auth_delay).await?,
            }
        } else {
            Self {
                members: MemberRepository::open(store.clone()).await?,
                packages: PackageRepository::open(store.clone()).await?,
                session: SessionManager::open(store, config.auth_delay).await?,
            }
        };

        tracing::info!(
            "Loaded {} members, {} packages, {} users",
            state.members.list().len(),
            state.packages.list().len(),
            state.session.users().len()
        );
        Ok(state)
    }

    /// Renew a member on the package they are linked to.
    pub async fn renew_member(&mut self, member_id: &str) -> Result<models::Member, AppError> {
        let member = self
            .members
            .get(member_id)
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))?;
        let package = self.packages.get(&member.package_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "Package {} for member {} not found",
                member.package_id, member_id
            ))
        })?;

        self.members.renew(member_id, package).await
    }

    pub fn dashboard(&self, now: DateTime<Utc>) -> analytics::DashboardSummary {
        analytics::dashboard_summary(
            self.members.list(),
            self.packages.list(),
            now,
            EXPIRING_SOON_DAYS,
        )
    }
}

#[cfg(test)]
mod tests;
