//! Package repository.

use super::fixtures;
use super::store::{keys, PersistedStore};
use crate::errors::AppError;
use crate::models::{NewPackage, Package, PackagePatch};

/// CRUD over the package collection.
///
/// Deleting a package does not check for members still pointing at it.
pub struct PackageRepository {
    store: PersistedStore,
    packages: Vec<Package>,
}

impl PackageRepository {
    pub async fn open(store: PersistedStore) -> Result<Self, AppError> {
        let packages = store.load(keys::PACKAGES).await?.unwrap_or_default();
        Ok(Self { store, packages })
    }

    /// Load stored packages, seeding the demo catalogue on first run.
    pub async fn open_seeded(store: PersistedStore) -> Result<Self, AppError> {
        let packages = store
            .load_or_seed(keys::PACKAGES, fixtures::packages)
            .await?;
        Ok(Self { store, packages })
    }

    pub fn list(&self) -> &[Package] {
        &self.packages
    }

    pub fn get(&self, id: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.id == id)
    }

    pub async fn add(&mut self, package: NewPackage) -> Result<Package, AppError> {
        package.validate()?;

        let package = package.with_id(uuid::Uuid::new_v4().to_string());
        self.packages.push(package.clone());
        if let Err(e) = self.persist().await {
            self.packages.pop();
            return Err(e);
        }

        tracing::debug!("Added package {} ({})", package.id, package.name);
        Ok(package)
    }

    pub async fn update(&mut self, id: &str, patch: PackagePatch) -> Result<Package, AppError> {
        patch.validate()?;

        let index = self
            .packages
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Package {} not found", id)))?;

        let previous = self.packages[index].clone();
        patch.apply(&mut self.packages[index]);
        if let Err(e) = self.persist().await {
            self.packages[index] = previous;
            return Err(e);
        }

        tracing::debug!("Updated package {}", id);
        Ok(self.packages[index].clone())
    }

    /// Remove the package with `id`. Deleting an unknown id is a no-op.
    pub async fn delete(&mut self, id: &str) -> Result<(), AppError> {
        let Some(index) = self.packages.iter().position(|p| p.id == id) else {
            return Ok(());
        };

        let removed = self.packages.remove(index);
        if let Err(e) = self.persist().await {
            self.packages.insert(index, removed);
            return Err(e);
        }

        tracing::debug!("Deleted package {}", id);
        Ok(())
    }

    async fn persist(&self) -> Result<(), AppError> {
        self.store.save(keys::PACKAGES, &self.packages).await
    }
}
