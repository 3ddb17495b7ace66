//! Member repository.
//!
//! Owns the in-memory member collection and mirrors it to the store after every mutation.

use chrono::{DateTime, Utc};

use super::fixtures;
use super::store::{keys, PersistedStore};
use crate::analytics::{expiring_within, renewed_expiry};
use crate::errors::AppError;
use crate::models::{
    Member, MemberEnrollment, MemberPatch, MemberStatus, NewMember, Package, PaymentStatus,
};

/// Window used by [`MemberRepository::expiring_soon`].
pub const EXPIRING_SOON_DAYS: i64 = 7;

/// Expiry length used at enrollment when the chosen package can't be found.
pub const DEFAULT_ENROLLMENT_DAYS: u32 = 30;

/// CRUD over the member collection.
pub struct MemberRepository {
    store: PersistedStore,
    members: Vec<Member>,
}

impl MemberRepository {
    /// Load stored members, starting empty if nothing was ever stored.
    pub async fn open(store: PersistedStore) -> Result<Self, AppError> {
        let members = store.load(keys::MEMBERS).await?.unwrap_or_default();
        Ok(Self { store, members })
    }

    /// Load stored members, seeding the demo fixtures on first run.
    pub async fn open_seeded(store: PersistedStore, now: DateTime<Utc>) -> Result<Self, AppError> {
        let members = store
            .load_or_seed(keys::MEMBERS, || fixtures::members(now))
            .await?;
        Ok(Self { store, members })
    }

    /// All members in insertion order.
    pub fn list(&self) -> &[Member] {
        &self.members
    }

    pub fn get(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Append a member under a freshly generated id.
    pub async fn add(&mut self, member: NewMember) -> Result<Member, AppError> {
        let member = member.with_id(uuid::Uuid::new_v4().to_string());
        self.members.push(member.clone());
        if let Err(e) = self.persist().await {
            self.members.pop();
            return Err(e);
        }

        tracing::debug!("Added member {}", member.id);
        Ok(member)
    }

    /// Merge `patch` into the member with `id`.
    pub async fn update(&mut self, id: &str, patch: MemberPatch) -> Result<Member, AppError> {
        let index = self.position(id)?;
        let previous = self.members[index].clone();
        patch.apply(&mut self.members[index]);

        if let Err(e) = self.persist().await {
            self.members[index] = previous;
            return Err(e);
        }

        tracing::debug!("Updated member {}", id);
        Ok(self.members[index].clone())
    }

    /// Remove the member with `id`. Deleting an unknown id is a no-op.
    pub async fn delete(&mut self, id: &str) -> Result<(), AppError> {
        let Some(index) = self.members.iter().position(|m| m.id == id) else {
            return Ok(());
        };

        let removed = self.members.remove(index);
        if let Err(e) = self.persist().await {
            self.members.insert(index, removed);
            return Err(e);
        }

        tracing::debug!("Deleted member {}", id);
        Ok(())
    }

    /// Active members whose expiry falls strictly inside `(now, now + 7 days)`.
    pub fn expiring_soon(&self, now: DateTime<Utc>) -> Vec<Member> {
        expiring_within(&self.members, now, EXPIRING_SOON_DAYS)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Extend the member's expiry by one package period from the current expiry.
    ///
    /// Days left on an unexpired membership are kept. An expired membership is
    /// extended from its old expiry, so the lapsed gap is not back-filled.
    pub async fn renew(&mut self, id: &str, package: &Package) -> Result<Member, AppError> {
        let current = self
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)))?;

        let patch = MemberPatch {
            expiry_date: Some(renewed_expiry(current.expiry_date, package.duration)?),
            status: Some(MemberStatus::Active),
            payment_status: Some(PaymentStatus::Paid),
            ..Default::default()
        };

        let renewed = self.update(id, patch).await?;
        tracing::info!(
            "Renewed member {} on package {} until {}",
            id,
            package.id,
            renewed.expiry_date
        );
        Ok(renewed)
    }

    /// Sign up a walk-in member on `package`, active and paid from today.
    pub async fn enroll(
        &mut self,
        enrollment: MemberEnrollment,
        package: Option<&Package>,
        now: DateTime<Utc>,
    ) -> Result<Member, AppError> {
        let duration = package.map_or(DEFAULT_ENROLLMENT_DAYS, |p| p.duration);

        let member = NewMember {
            name: enrollment.name,
            email: enrollment.email,
            phone: enrollment.phone,
            join_date: now.date_naive(),
            package_id: enrollment.package_id,
            expiry_date: renewed_expiry(now, duration)?,
            status: MemberStatus::Active,
            payment_status: PaymentStatus::Paid,
            notes: enrollment.notes,
            photo: None,
        };

        self.add(member).await
    }

    fn position(&self, id: &str) -> Result<usize, AppError> {
        self.members
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)))
    }

    async fn persist(&self) -> Result<(), AppError> {
        self.store.save(keys::MEMBERS, &self.members).await
    }
}
