//! Derived views over members and packages.
//!
//! Everything here is a pure function of its inputs and a reference `now`.
//! Stored member status is reported as-is; [`effective_status`] is the only
//! place that looks at expiry dates to classify a member.

use chrono::{DateTime, Days, Duration, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::wire::millis_timestamp;
use crate::models::{Member, MemberStatus, Package, PaymentStatus};

/// Shown wherever a member points at a package that no longer exists.
pub const UNKNOWN_PACKAGE: &str = "Unknown Package";

/// Number of members listed in the dashboard's recent section.
pub const RECENT_MEMBERS: usize = 3;

/// Colour family of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Success,
    Warning,
    Error,
}

/// Presentation category for a status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub category: &'static str,
    pub label: &'static str,
    pub tone: BadgeTone,
}

pub fn status_badge(status: MemberStatus) -> Badge {
    let (label, tone) = match status {
        MemberStatus::Active => ("Active", BadgeTone::Success),
        MemberStatus::Expired => ("Expired", BadgeTone::Error),
        MemberStatus::Pending => ("Pending", BadgeTone::Warning),
    };
    Badge {
        category: status.as_str(),
        label,
        tone,
    }
}

pub fn payment_badge(status: PaymentStatus) -> Badge {
    let (label, tone) = match status {
        PaymentStatus::Paid => ("Paid", BadgeTone::Success),
        PaymentStatus::Pending => ("Pending", BadgeTone::Warning),
        PaymentStatus::Overdue => ("Overdue", BadgeTone::Error),
    };
    Badge {
        category: status.as_str(),
        label,
        tone,
    }
}

/// Whole days between `now` and `expiry`, truncated. Negative once elapsed.
pub fn days_remaining(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expiry - now).num_days()
}

/// `expiry` moved forward by `duration_days` calendar days.
pub fn renewed_expiry(
    expiry: DateTime<Utc>,
    duration_days: u32,
) -> Result<DateTime<Utc>, AppError> {
    expiry
        .checked_add_days(Days::new(u64::from(duration_days)))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Adding {} days to {} is out of range",
                duration_days, expiry
            ))
        })
}

/// Status as of `now`: stored `active` with an elapsed expiry reads as `expired`.
///
/// Additive view only; the stored status is left untouched.
pub fn effective_status(member: &Member, now: DateTime<Utc>) -> MemberStatus {
    match member.status {
        MemberStatus::Active if member.expiry_date <= now => MemberStatus::Expired,
        status => status,
    }
}

/// Active members expiring strictly inside `(now, now + window_days)`, in collection order.
pub fn expiring_within(members: &[Member], now: DateTime<Utc>, window_days: i64) -> Vec<&Member> {
    let horizon = now + Duration::days(window_days);
    members
        .iter()
        .filter(|m| m.status == MemberStatus::Active)
        .filter(|m| m.expiry_date > now && m.expiry_date < horizon)
        .collect()
}

pub fn find_package<'a>(packages: &'a [Package], id: &str) -> Option<&'a Package> {
    packages.iter().find(|p| p.id == id)
}

/// Name of the member's package, or [`UNKNOWN_PACKAGE`] for a dangling reference.
pub fn package_name<'a>(member: &Member, packages: &'a [Package]) -> &'a str {
    find_package(packages, &member.package_id).map_or(UNKNOWN_PACKAGE, |p| p.name.as_str())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub active: usize,
    pub expired: usize,
    pub pending: usize,
}

pub fn count_by_status(members: &[Member]) -> StatusCounts {
    members
        .iter()
        .fold(StatusCounts::default(), |mut counts, m| {
            match m.status {
                MemberStatus::Active => counts.active += 1,
                MemberStatus::Expired => counts.expired += 1,
                MemberStatus::Pending => counts.pending += 1,
            }
            counts
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageCount {
    pub package_id: String,
    pub name: String,
    pub count: usize,
}

/// Member count per package, one entry per package in catalogue order.
///
/// Members on deleted packages are not attributed to any entry.
pub fn count_by_package(members: &[Member], packages: &[Package]) -> Vec<PackageCount> {
    packages
        .iter()
        .map(|p| PackageCount {
            package_id: p.id.clone(),
            name: p.name.clone(),
            count: members.iter().filter(|m| m.package_id == p.id).count(),
        })
        .collect()
}

pub fn pending_payments(members: &[Member]) -> usize {
    members
        .iter()
        .filter(|m| m.payment_status == PaymentStatus::Pending)
        .count()
}

/// Sum of linked package prices over members with stored status `active`.
pub fn active_revenue(members: &[Member], packages: &[Package]) -> f64 {
    members
        .iter()
        .filter(|m| m.status == MemberStatus::Active)
        .map(|m| find_package(packages, &m.package_id).map_or(0.0, |p| p.price))
        .sum()
}

/// Criteria from the members list search box and status dropdown.
#[derive(Debug, Clone, Default)]
pub struct MemberFilter {
    pub search: String,
    /// `None` means all statuses
    pub status: Option<MemberStatus>,
}

/// Members matching `filter`, in collection order.
///
/// Name and email match case-insensitively; phone matches the raw search text.
pub fn filter_members<'a>(members: &'a [Member], filter: &MemberFilter) -> Vec<&'a Member> {
    let needle = filter.search.to_lowercase();
    members
        .iter()
        .filter(|m| {
            let matches_search = m.name.to_lowercase().contains(&needle)
                || m.email.to_lowercase().contains(&needle)
                || m.phone.contains(&filter.search);
            let matches_status = filter.status.map_or(true, |s| m.status == s);
            matches_search && matches_status
        })
        .collect()
}

/// One member line on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDigest {
    pub id: String,
    pub name: String,
    pub status: Badge,
    pub payment: Badge,
    pub package_name: String,
    #[serde(with = "millis_timestamp")]
    pub expiry_date: DateTime<Utc>,
    pub days_remaining: i64,
}

impl MemberDigest {
    pub fn new(member: &Member, packages: &[Package], now: DateTime<Utc>) -> Self {
        Self {
            id: member.id.clone(),
            name: member.name.clone(),
            status: status_badge(member.status),
            payment: payment_badge(member.payment_status),
            package_name: package_name(member, packages).to_string(),
            expiry_date: member.expiry_date,
            days_remaining: days_remaining(member.expiry_date, now),
        }
    }
}

/// Figures shown on the dashboard landing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub generated_at: DateTime<Utc>,
    pub total_members: usize,
    pub status_counts: StatusCounts,
    pub pending_payments: usize,
    pub active_revenue: f64,
    pub expiring_soon: Vec<MemberDigest>,
    pub package_distribution: Vec<PackageCount>,
    pub recent_members: Vec<MemberDigest>,
}

pub fn dashboard_summary(
    members: &[Member],
    packages: &[Package],
    now: DateTime<Utc>,
    expiring_window_days: i64,
) -> DashboardSummary {
    DashboardSummary {
        generated_at: now,
        total_members: members.len(),
        status_counts: count_by_status(members),
        pending_payments: pending_payments(members),
        active_revenue: active_revenue(members, packages),
        expiring_soon: expiring_within(members, now, expiring_window_days)
            .into_iter()
            .map(|m| MemberDigest::new(m, packages, now))
            .collect(),
        package_distribution: count_by_package(members, packages),
        recent_members: members
            .iter()
            .take(RECENT_MEMBERS)
            .map(|m| MemberDigest::new(m, packages, now))
            .collect(),
    }
}
