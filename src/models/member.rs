//! Gym member model matching the dashboard Member shape.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::wire::{double_option, millis_timestamp, stored_precision};

/// Membership lifecycle status. Caller-set metadata, never recomputed on read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Expired,
    Pending,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Expired => "expired",
            MemberStatus::Pending => "pending",
        }
    }
}

/// Payment standing of a member.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Overdue => "overdue",
        }
    }
}

/// A gym customer with a membership lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub join_date: NaiveDate,
    /// Not checked against the package collection; may dangle
    pub package_id: String,
    #[serde(with = "millis_timestamp")]
    pub expiry_date: DateTime<Utc>,
    pub status: MemberStatus,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// A member record before an id has been assigned.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub join_date: NaiveDate,
    pub package_id: String,
    #[serde(with = "millis_timestamp")]
    pub expiry_date: DateTime<Utc>,
    pub status: MemberStatus,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl NewMember {
    pub(crate) fn with_id(self, id: String) -> Member {
        Member {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            join_date: self.join_date,
            package_id: self.package_id,
            expiry_date: stored_precision(self.expiry_date),
            status: self.status,
            payment_status: self.payment_status,
            notes: self.notes,
            photo: self.photo,
        }
    }
}

/// Contact details captured by the add-member form. Dates and statuses are derived on enrollment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberEnrollment {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub package_id: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update for an existing member. Absent fields are left untouched.
///
/// `notes` and `photo` are cleared by an explicit `null` (`Some(None)`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
    #[serde(default)]
    pub package_id: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<MemberStatus>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub photo: Option<Option<String>>,
}

impl MemberPatch {
    /// Merge the present fields into `member`.
    pub fn apply(self, member: &mut Member) {
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(email) = self.email {
            member.email = email;
        }
        if let Some(phone) = self.phone {
            member.phone = phone;
        }
        if let Some(join_date) = self.join_date {
            member.join_date = join_date;
        }
        if let Some(package_id) = self.package_id {
            member.package_id = package_id;
        }
        if let Some(expiry_date) = self.expiry_date {
            member.expiry_date = stored_precision(expiry_date);
        }
        if let Some(status) = self.status {
            member.status = status;
        }
        if let Some(payment_status) = self.payment_status {
            member.payment_status = payment_status;
        }
        if let Some(notes) = self.notes {
            member.notes = notes;
        }
        if let Some(photo) = self.photo {
            member.photo = photo;
        }
    }
}
