//! # Product Types
//!
//! Catalog types for the storefront.
//! Products are created through the API and only ever mutated by stock updates.

use crate::error::{ShopError, ShopResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identifier
    pub id: i64,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Image reference (URL or asset key)
    #[serde(default)]
    pub image: String,

    /// Unit price
    pub price: f64,

    /// Units in stock
    pub quantity: i32,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Check whether `requested` units can be taken from stock
    pub fn has_stock_for(&self, requested: i32) -> bool {
        self.quantity >= requested
    }
}

/// Payload for creating a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub image: String,

    pub price: f64,

    pub quantity: i32,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64, quantity: i32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            image: String::new(),
            price,
            quantity,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set image reference
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Reject payloads the products table would refuse anyway
    pub fn validate(&self) -> ShopResult<()> {
        if self.name.trim().is_empty() {
            return Err(ShopError::invalid("product name is required"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ShopError::invalid(format!(
                "invalid price {} for product {}",
                self.price, self.name
            )));
        }
        if self.quantity < 0 {
            return Err(ShopError::invalid(format!(
                "invalid quantity {} for product {}",
                self.quantity, self.name
            )));
        }
        Ok(())
    }

    /// Materialize into a stored product
    pub fn into_product(self, id: i64, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            image: self.image,
            price: self.price,
            quantity: self.quantity,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_product_builder() {
        let product = NewProduct::new("Coffee Mug", 12.5, 40)
            .with_description("Ceramic, 350ml")
            .with_image("mug.png");

        assert_eq!(product.name, "Coffee Mug");
        assert_eq!(product.description, "Ceramic, 350ml");
        assert_eq!(product.image, "mug.png");
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        assert!(NewProduct::new("  ", 1.0, 1).validate().is_err());
        assert!(NewProduct::new("Mug", -0.01, 1).validate().is_err());
        assert!(NewProduct::new("Mug", f64::NAN, 1).validate().is_err());
        assert!(NewProduct::new("Mug", 1.0, -1).validate().is_err());
        assert!(NewProduct::new("Free sticker", 0.0, 0).validate().is_ok());
    }

    #[test]
    fn test_product_json_shape() {
        let product = NewProduct::new("Mug", 10.0, 5).into_product(1, Utc::now());
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["quantity"], 5);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_new_product_defaults_optional_fields() {
        let product: NewProduct =
            serde_json::from_str(r#"{"name":"Mug","price":3.5,"quantity":2}"#).unwrap();
        assert_eq!(product.description, "");
        assert_eq!(product.image, "");
    }

    #[test]
    fn test_has_stock_for() {
        let product = NewProduct::new("Mug", 10.0, 5).into_product(1, Utc::now());
        assert!(product.has_stock_for(5));
        assert!(!product.has_stock_for(6));
    }
}
