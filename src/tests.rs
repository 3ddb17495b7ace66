//! Scenario tests running the whole core against a SQLite store.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use crate::analytics::{active_revenue, package_name, UNKNOWN_PACKAGE};
use crate::config::Config;
use crate::db::{init_database, keys, PersistedStore, SqliteStorage, Storage};
use crate::errors::AppError;
use crate::models::{
    Member, MemberPatch, MemberStatus, NewMember, NewPackage, Package, PaymentStatus, User,
    UserRole,
};
use crate::AppState;

/// Test fixture backed by a temporary SQLite file.
struct TestFixture {
    store: PersistedStore,
    backend: Arc<SqliteStorage>,
    config: Config,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new(seed_fixtures: bool) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");
        let pool = init_database(&db_path).await.expect("Failed to open database");
        let backend = Arc::new(SqliteStorage::new(pool));
        let store = PersistedStore::new(backend.clone());

        let config = Config {
            db_path,
            log_level: "warn".to_string(),
            log_json: false,
            auth_delay: StdDuration::ZERO,
            seed_fixtures,
        };

        TestFixture {
            store,
            backend,
            config,
            _temp_dir: temp_dir,
        }
    }

    async fn state(&self) -> AppState {
        AppState::open(self.store.clone(), &self.config, now())
            .await
            .expect("Failed to open state")
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 27, 12, 0, 0).unwrap()
}

fn new_member(name: &str, package_id: &str, expiry: DateTime<Utc>) -> NewMember {
    NewMember {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "(555) 123-4567".to_string(),
        join_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        package_id: package_id.to_string(),
        expiry_date: expiry,
        status: MemberStatus::Active,
        payment_status: PaymentStatus::Paid,
        notes: Some("Front desk note".to_string()),
        photo: None,
    }
}

/// Storage whose every call fails, for checking errors reach the caller.
struct BrokenStorage;

#[async_trait]
impl Storage for BrokenStorage {
    async fn read(&self, _key: &str) -> Result<Option<String>, AppError> {
        Ok(None)
    }

    async fn write(&self, key: &str, _value: &str) -> Result<(), AppError> {
        Err(AppError::Storage(format!("disk full writing {}", key)))
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        Err(AppError::Storage(format!("disk full removing {}", key)))
    }
}

#[tokio::test]
async fn test_single_package_scenario() {
    let fixture = TestFixture::new(false).await;
    let packages = vec![Package {
        id: "1".to_string(),
        name: "Basic Monthly".to_string(),
        description: "Access to basic gym facilities".to_string(),
        price: 29.99,
        duration: 30,
        features: vec![],
        is_popular: None,
    }];
    let members = vec![new_member("John", "1", now() + Duration::days(5)).with_id("1".to_string())];
    fixture.store.save(keys::PACKAGES, &packages).await.unwrap();
    fixture.store.save(keys::MEMBERS, &members).await.unwrap();

    let mut state = fixture.state().await;

    let expiring = state.members.expiring_soon(now());
    assert_eq!(expiring, members);
    assert_eq!(
        active_revenue(state.members.list(), state.packages.list()),
        29.99
    );

    // Dangling package reference after delete
    state.packages.delete("1").await.unwrap();
    assert!(state.packages.get("1").is_none());
    let member = state.members.get("1").unwrap();
    assert_eq!(package_name(member, state.packages.list()), UNKNOWN_PACKAGE);
    assert_eq!(
        active_revenue(state.members.list(), state.packages.list()),
        0.0
    );

    let err = state.renew_member("1").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_seeded_dashboard() {
    let fixture = TestFixture::new(true).await;
    let state = fixture.state().await;

    assert_eq!(state.members.list().len(), 5);
    assert_eq!(state.packages.list().len(), 3);
    assert_eq!(state.session.users().len(), 2);

    let summary = state.dashboard(now());
    assert_eq!(summary.total_members, 5);
    assert_eq!(summary.status_counts.active, 4);
    assert_eq!(summary.status_counts.expired, 1);

    // John (+5 days) and Robert (+2 days), in collection order
    let expiring: Vec<&str> = summary.expiring_soon.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(expiring, vec!["John Doe", "Robert Wilson"]);

    // 29.99 + 499.99 + 29.99 + 49.99
    assert!((summary.active_revenue - 609.96).abs() < 1e-9);
}

#[tokio::test]
async fn test_renewal_persists_across_reopen() {
    let fixture = TestFixture::new(true).await;
    let mut state = fixture.state().await;

    let before = state.members.get("2").unwrap().clone();
    assert_eq!(before.status, MemberStatus::Expired);

    let renewed = state.renew_member("2").await.unwrap();
    assert_eq!(renewed.expiry_date, before.expiry_date + Duration::days(30));
    assert_eq!(renewed.status, MemberStatus::Active);
    assert_eq!(renewed.payment_status, PaymentStatus::Paid);
    assert_eq!(renewed.name, before.name);

    let reopened = fixture.state().await;
    assert_eq!(reopened.members.get("2"), Some(&renewed));
}

#[tokio::test]
async fn test_update_changes_only_named_field() {
    let fixture = TestFixture::new(false).await;
    let mut state = fixture.state().await;
    let added = state
        .members
        .add(new_member("Ann", "1", now() + Duration::days(20)))
        .await
        .unwrap();

    let updated = state
        .members
        .update(
            &added.id,
            MemberPatch {
                payment_status: Some(PaymentStatus::Overdue),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(
        updated,
        Member {
            payment_status: PaymentStatus::Overdue,
            ..added
        }
    );
}

const STORED_MEMBERS: &str = concat!(
    r#"[{"id":"1","name":"John Doe","email":"john@example.com","phone":"(555) 123-4567","#,
    r#""joinDate":"2023-01-15","packageId":"1","expiryDate":"2024-11-01T12:00:00.000Z","#,
    r#""status":"active","paymentStatus":"paid","#,
    r#""photo":"https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg"},"#,
    r#"{"id":"1730030400123","name":"Ann Lee","email":"ann@example.com","phone":"555-0100","#,
    r#""joinDate":"2024-10-27","packageId":"4","expiryDate":"2024-11-26T08:15:42.123Z","#,
    r#""status":"pending","paymentStatus":"pending","notes":"Prefers mornings"}]"#
);

const STORED_PACKAGES: &str = concat!(
    r#"[{"id":"1","name":"Basic Monthly","description":"Access to basic gym facilities","#,
    r#""price":29.99,"duration":30,"features":["Gym access","Locker use"]},"#,
    r#"{"id":"4","name":"Day Pass","description":"Single visit","price":15,"#,
    r#""duration":1,"features":[],"isPopular":false}]"#
);

const STORED_USERS: &str = concat!(
    r#"[{"id":"1","name":"Admin User","email":"admin@fittrack.com","role":"admin"},"#,
    r#"{"id":"2","name":"John Doe","email":"john@example.com","role":"member","memberId":"1"}]"#
);

/// Load `raw` from `key` as `T`, save it back and return what the backend now holds.
async fn rewrite<T>(fixture: &TestFixture, key: &str, raw: &str) -> String
where
    T: serde::de::DeserializeOwned + serde::Serialize,
{
    fixture.backend.write(key, raw).await.unwrap();
    let typed: T = fixture.store.load(key).await.unwrap().unwrap();
    fixture.store.save(key, &typed).await.unwrap();
    fixture.backend.read(key).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_stored_collections_are_rewritten_verbatim() {
    let fixture = TestFixture::new(false).await;

    let members = rewrite::<Vec<Member>>(&fixture, keys::MEMBERS, STORED_MEMBERS).await;
    assert_eq!(members, STORED_MEMBERS);
    let packages = rewrite::<Vec<Package>>(&fixture, keys::PACKAGES, STORED_PACKAGES).await;
    assert_eq!(packages, STORED_PACKAGES);
    let users = rewrite::<Vec<User>>(&fixture, keys::USERS, STORED_USERS).await;
    assert_eq!(users, STORED_USERS);

    assert_eq!(rewrite::<Vec<Member>>(&fixture, keys::MEMBERS, "[]").await, "[]");
    assert_eq!(rewrite::<Vec<Package>>(&fixture, keys::PACKAGES, "[]").await, "[]");
    assert_eq!(rewrite::<Vec<User>>(&fixture, keys::USERS, "[]").await, "[]");
}

#[tokio::test]
async fn test_repository_writes_keep_stored_shapes() {
    let fixture = TestFixture::new(false).await;
    fixture.backend.write(keys::MEMBERS, STORED_MEMBERS).await.unwrap();
    fixture.backend.write(keys::PACKAGES, STORED_PACKAGES).await.unwrap();

    let mut state = fixture.state().await;
    state
        .packages
        .add(NewPackage {
            name: "Student".to_string(),
            description: "Off-peak access".to_string(),
            price: 20.0,
            duration: 90,
            features: vec!["Off-peak".to_string()],
            is_popular: None,
        })
        .await
        .unwrap();
    state.members.delete("1").await.unwrap();

    let packages = fixture.backend.read(keys::PACKAGES).await.unwrap().unwrap();
    assert!(packages.starts_with(&STORED_PACKAGES[..STORED_PACKAGES.len() - 1]));
    assert!(packages.contains(r#""price":20,"#));

    let members = fixture.backend.read(keys::MEMBERS).await.unwrap().unwrap();
    assert!(members.contains(r#""expiryDate":"2024-11-26T08:15:42.123Z""#));
    assert!(members.contains(r#""notes":"Prefers mornings""#));
    assert!(!members.contains(r#""photo""#));

    let reopened = fixture.state().await;
    assert_eq!(reopened.members.list(), state.members.list());
    assert_eq!(reopened.packages.list(), state.packages.list());
}

#[tokio::test]
async fn test_signup_then_login_after_reopen() {
    let fixture = TestFixture::new(true).await;
    let mut state = fixture.state().await;

    let user = state
        .session
        .signup("sam@example.com", "hunter2", "Sam", UserRole::Member)
        .await
        .unwrap();
    state.session.logout().await.unwrap();

    let mut reopened = fixture.state().await;
    assert!(!reopened.session.is_authenticated());
    let logged_in = reopened
        .session
        .login("sam@example.com", "anything")
        .await
        .unwrap();
    assert_eq!(logged_in, user);

    let duplicate = reopened
        .session
        .signup("sam@example.com", "pw", "Sam Again", UserRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(duplicate, AppError::Auth(_)));
    assert_eq!(reopened.session.users().len(), 3);
}

#[tokio::test]
async fn test_storage_failures_propagate() {
    let store = PersistedStore::new(Arc::new(BrokenStorage));
    let config = Config {
        db_path: "unused.sqlite".into(),
        log_level: "warn".to_string(),
        log_json: false,
        auth_delay: StdDuration::ZERO,
        seed_fixtures: false,
    };

    let mut state = AppState::open(store.clone(), &config, now()).await.unwrap();

    let err = state
        .members
        .add(new_member("Ann", "1", now()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Storage(_)));
    assert!(state.members.list().is_empty());

    let err = state.session.logout().await.unwrap_err();
    assert!(matches!(err, AppError::Storage(_)));

    // Seeding writes too
    let seeded = Config {
        seed_fixtures: true,
        ..config
    };
    assert!(matches!(
        AppState::open(store, &seeded, now()).await,
        Err(AppError::Storage(_))
    ));
}
