//! Session management for the dashboard.
//!
//! Demo mode only: login checks that the email is registered and ignores the
//! password. This is not a security boundary.

use std::time::Duration;

use crate::db::{fixtures, keys, PersistedStore};
use crate::errors::AppError;
use crate::models::{User, UserRole};

/// Holds the user registry and the current session, both persisted.
///
/// Methods take `&mut self`, so callers serialize overlapping login and signup
/// calls themselves; no extra locking happens here.
pub struct SessionManager {
    store: PersistedStore,
    users: Vec<User>,
    current: Option<User>,
    auth_delay: Duration,
}

impl SessionManager {
    /// Load the registry and any saved session, starting with an empty registry.
    pub async fn open(store: PersistedStore, auth_delay: Duration) -> Result<Self, AppError> {
        let users = store.load(keys::USERS).await?.unwrap_or_default();
        Self::with_users(store, users, auth_delay).await
    }

    /// Load the registry, seeding the demo accounts on first run.
    pub async fn open_seeded(
        store: PersistedStore,
        auth_delay: Duration,
    ) -> Result<Self, AppError> {
        let users = store.load_or_seed(keys::USERS, fixtures::users).await?;
        Self::with_users(store, users, auth_delay).await
    }

    async fn with_users(
        store: PersistedStore,
        users: Vec<User>,
        auth_delay: Duration,
    ) -> Result<Self, AppError> {
        let current: Option<User> = store.load(keys::CURRENT_USER).await?;
        if let Some(user) = &current {
            tracing::info!("Restored session for {}", user.email);
        }

        Ok(Self {
            store,
            users,
            current,
            auth_delay,
        })
    }

    /// Start a session for the registered user with `email`.
    pub async fn login(&mut self, email: &str, _password: &str) -> Result<User, AppError> {
        self.simulate_latency().await;

        let Some(user) = self.users.iter().find(|u| u.email == email).cloned() else {
            tracing::warn!("Login rejected for unknown email {}", email);
            return Err(AppError::Auth("Invalid credentials".to_string()));
        };

        self.start_session(user).await
    }

    /// Register a new user and start a session for them.
    ///
    /// Member-role signups get `member_id` set to their own user id.
    pub async fn signup(
        &mut self,
        email: &str,
        _password: &str,
        name: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        self.simulate_latency().await;

        if self.users.iter().any(|u| u.email == email) {
            tracing::warn!("Signup rejected, {} already registered", email);
            return Err(AppError::Auth("Email already exists".to_string()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let user = User {
            member_id: (role == UserRole::Member).then(|| id.clone()),
            id,
            name: name.to_string(),
            email: email.to_string(),
            role,
        };

        self.users.push(user.clone());
        if let Err(e) = self.store.save(keys::USERS, &self.users).await {
            self.users.pop();
            return Err(e);
        }

        tracing::info!("Registered {} as {:?}", user.email, user.role);
        match self.start_session(user).await {
            Ok(user) => Ok(user),
            Err(e) => {
                self.unregister_last().await;
                Err(e)
            }
        }
    }

    /// End the current session. The registry is left untouched.
    pub async fn logout(&mut self) -> Result<(), AppError> {
        self.store.remove(keys::CURRENT_USER).await?;
        if let Some(user) = self.current.take() {
            tracing::info!("Logged out {}", user.email);
        }
        Ok(())
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    async fn start_session(&mut self, user: User) -> Result<User, AppError> {
        self.store.save(keys::CURRENT_USER, &user).await?;
        tracing::info!("Session started for {}", user.email);
        self.current = Some(user.clone());
        Ok(user)
    }

    /// Drop the user just pushed by `signup` after its session failed to start.
    async fn unregister_last(&mut self) {
        if let Some(user) = self.users.pop() {
            tracing::warn!("Rolling back registration of {}", user.email);
        }
        if let Err(e) = self.store.save(keys::USERS, &self.users).await {
            tracing::error!("Failed to roll back user registry: {}", e);
        }
    }

    async fn simulate_latency(&self) {
        if !self.auth_delay.is_zero() {
            tokio::time::sleep(self.auth_delay).await;
        }
    }
}
