//! Membership package model.

use serde::{Deserialize, Serialize};

use super::wire;
use crate::errors::AppError;

/// A purchasable membership plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(with = "wire::price")]
    pub price: f64,
    /// Length of one membership period in days
    pub duration: u32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_popular: Option<bool>,
}

/// A package before an id has been assigned.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPackage {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub duration: u32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub is_popular: Option<bool>,
}

impl NewPackage {
    pub(crate) fn validate(&self) -> Result<(), AppError> {
        validate_price(self.price)?;
        validate_duration(self.duration)
    }

    pub(crate) fn with_id(self, id: String) -> Package {
        Package {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            duration: self.duration,
            features: self.features,
            is_popular: self.is_popular,
        }
    }
}

/// Partial update for an existing package.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub is_popular: Option<bool>,
}

impl PackagePatch {
    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(duration) = self.duration {
            validate_duration(duration)?;
        }
        Ok(())
    }

    /// Merge the present fields into `package`.
    pub fn apply(self, package: &mut Package) {
        if let Some(name) = self.name {
            package.name = name;
        }
        if let Some(description) = self.description {
            package.description = description;
        }
        if let Some(price) = self.price {
            package.price = price;
        }
        if let Some(duration) = self.duration {
            package.duration = duration;
        }
        if let Some(features) = self.features {
            package.features = features;
        }
        if self.is_popular.is_some() {
            package.is_popular = self.is_popular;
        }
    }
}

fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::Validation(format!(
            "Package price must be a non-negative amount, got {}",
            price
        )));
    }
    Ok(())
}

fn validate_duration(duration: u32) -> Result<(), AppError> {
    if duration == 0 {
        return Err(AppError::Validation(
            "Package duration must be at least one day".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic() -> NewPackage {
        NewPackage {
            name: "Basic Monthly".to_string(),
            description: "Access to basic gym facilities".to_string(),
            price: 29.99,
            duration: 30,
            features: vec!["Gym access".to_string(), "Locker use".to_string()],
            is_popular: None,
        }
    }

    #[test]
    fn test_validation() {
        assert!(basic().validate().is_ok());
        assert!(NewPackage { price: -1.0, ..basic() }.validate().is_err());
        assert!(NewPackage { price: f64::NAN, ..basic() }.validate().is_err());
        assert!(NewPackage { duration: 0, ..basic() }.validate().is_err());
        assert!(NewPackage { price: 0.0, ..basic() }.validate().is_ok());
    }

    #[test]
    fn test_wire_shape_keeps_feature_order() {
        let value = serde_json::to_value(basic().with_id("1".to_string())).unwrap();
        assert_eq!(value["features"][0], "Gym access");
        assert_eq!(value["features"][1], "Locker use");
        assert!(value.get("isPopular").is_none());
    }

    #[test]
    fn test_stored_package_is_rewritten_verbatim() {
        let raw = concat!(
            r#"{"id":"4","name":"Day Pass","description":"Single visit","price":15,"#,
            r#""duration":1,"features":["Gym access"],"isPopular":false}"#
        );
        let package: Package = serde_json::from_str(raw).unwrap();
        assert_eq!(package.price, 15.0);
        assert_eq!(serde_json::to_string(&package).unwrap(), raw);
    }
}
