//! Demo data written on first run.
//!
//! Member expiry dates are relative to the moment of seeding so the dashboard
//! always shows a mix of expiring, expired and healthy memberships.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::wire::stored_precision;
use crate::models::{Member, MemberStatus, Package, PaymentStatus, User, UserRole};

pub fn packages() -> Vec<Package> {
    vec![
        Package {
            id: "1".to_string(),
            name: "Basic Monthly".to_string(),
            description: "Access to basic gym facilities".to_string(),
            price: 29.99,
            duration: 30,
            features: strings(&["Gym access", "Basic equipment", "Locker use"]),
            is_popular: None,
        },
        Package {
            id: "2".to_string(),
            name: "Premium Monthly".to_string(),
            description: "Full access to all gym facilities and classes".to_string(),
            price: 49.99,
            duration: 30,
            features: strings(&[
                "Gym access",
                "All equipment",
                "Group classes",
                "Locker use",
                "Towel service",
            ]),
            is_popular: Some(true),
        },
        Package {
            id: "3".to_string(),
            name: "Annual Membership".to_string(),
            description: "One year of premium access at a discounted rate".to_string(),
            price: 499.99,
            duration: 365,
            features: strings(&[
                "Gym access",
                "All equipment",
                "Group classes",
                "Personal trainer (2 sessions)",
                "Locker use",
                "Towel service",
            ]),
            is_popular: None,
        },
    ]
}

struct MemberSeed {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    joined: (i32, u32, u32),
    package_id: &'static str,
    expiry_offset_days: i64,
    status: MemberStatus,
    payment_status: PaymentStatus,
    photo_id: u32,
}

const MEMBER_SEEDS: [MemberSeed; 5] = [
    MemberSeed {
        id: "1",
        name: "John Doe",
        email: "john@example.com",
        phone: "(555) 123-4567",
        joined: (2023, 1, 15),
        package_id: "1",
        expiry_offset_days: 5,
        status: MemberStatus::Active,
        payment_status: PaymentStatus::Paid,
        photo_id: 220453,
    },
    MemberSeed {
        id: "2",
        name: "Jane Smith",
        email: "jane@example.com",
        phone: "(555) 987-6543",
        joined: (2023, 2, 20),
        package_id: "2",
        expiry_offset_days: -10,
        status: MemberStatus::Expired,
        payment_status: PaymentStatus::Overdue,
        photo_id: 774909,
    },
    MemberSeed {
        id: "3",
        name: "Michael Johnson",
        email: "michael@example.com",
        phone: "(555) 321-7890",
        joined: (2023, 3, 10),
        package_id: "3",
        expiry_offset_days: 45,
        status: MemberStatus::Active,
        payment_status: PaymentStatus::Paid,
        photo_id: 614810,
    },
    MemberSeed {
        id: "4",
        name: "Emily Davis",
        email: "emily@example.com",
        phone: "(555) 456-7890",
        joined: (2023, 4, 5),
        package_id: "1",
        expiry_offset_days: 20,
        status: MemberStatus::Active,
        payment_status: PaymentStatus::Paid,
        photo_id: 415829,
    },
    MemberSeed {
        id: "5",
        name: "Robert Wilson",
        email: "robert@example.com",
        phone: "(555) 789-0123",
        joined: (2023, 5, 12),
        package_id: "2",
        expiry_offset_days: 2,
        status: MemberStatus::Active,
        payment_status: PaymentStatus::Paid,
        photo_id: 1222271,
    },
];

pub fn members(now: DateTime<Utc>) -> Vec<Member> {
    let now = stored_precision(now);
    MEMBER_SEEDS
        .iter()
        .map(|seed| {
            let (year, month, day) = seed.joined;
            Member {
                id: seed.id.to_string(),
                name: seed.name.to_string(),
                email: seed.email.to_string(),
                phone: seed.phone.to_string(),
                join_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
                package_id: seed.package_id.to_string(),
                expiry_date: now + Duration::days(seed.expiry_offset_days),
                status: seed.status,
                payment_status: seed.payment_status,
                notes: None,
                photo: Some(photo_url(seed.photo_id)),
            }
        })
        .collect()
}

pub fn users() -> Vec<User> {
    vec![
        User {
            id: "1".to_string(),
            name: "Admin User".to_string(),
            email: "admin@fittrack.com".to_string(),
            role: UserRole::Admin,
            member_id: None,
        },
        User {
            id: "2".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            role: UserRole::Member,
            member_id: Some("1".to_string()),
        },
    ]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const PHOTO_HOST: &str = "https://images.pexels.com/photos";
const PHOTO_QUERY: &str = "auto=compress&cs=tinysrgb&w=300";

fn photo_url(photo_id: u32) -> String {
    format!(
        "{}/{id}/pexels-photo-{id}.jpeg?{}",
        PHOTO_HOST,
        PHOTO_QUERY,
        id = photo_id
    )
}
