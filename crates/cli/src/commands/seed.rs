//! Seed the document store with catalog products.
//!
//! Reads products from a YAML file, validates them, and writes each one to
//! `products/{id}`, replacing any existing document with that id.
//!
//! ```yaml
//! products:
//!   - id: corduroy-jacket
//!     name: Corduroy Jacket
//!     price: "350000"
//!     createdAt: 2024-05-01T10:00:00Z
//!     size: M
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use vintage_storefront::models::{Product, collections};
use vintage_storefront::remote::{CollectionPath, DocumentStore, Fields, RemoteError};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid seed file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),

    #[error("Failed to write product: {0}")]
    Remote(#[from] RemoteError),
}

/// Seed file layout.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub products: Vec<SeedProduct>,
}

/// One product entry. Everything besides `id` becomes document fields.
#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub id: String,
    #[serde(flatten)]
    pub fields: Fields,
}

/// Check every entry, returning one message per problem.
#[must_use]
pub fn validate(file: &SeedFile) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for entry in &file.products {
        if entry.id.trim().is_empty() {
            errors.push("product with empty id".to_string());
            continue;
        }
        if !seen.insert(entry.id.as_str()) {
            errors.push(format!("{}: duplicate id", entry.id));
        }
        if entry
            .fields
            .get("name")
            .and_then(Value::as_str)
            .is_none_or(|name| name.trim().is_empty())
        {
            errors.push(format!("{}: missing name", entry.id));
        }

        let mut fields = entry.fields.clone();
        fields.insert("id".to_string(), Value::String(entry.id.clone()));
        if let Err(e) = serde_json::from_value::<Product>(Value::Object(fields)) {
            errors.push(format!("{}: {e}", entry.id));
        }
    }

    errors
}

/// Parse, validate and write the products in `content`.
///
/// Returns the number of products written.
///
/// # Errors
///
/// Returns `SeedError` if the YAML is malformed, any entry is invalid
/// (nothing is written then), or a write fails.
pub async fn seed_from_str(store: &dyn DocumentStore, content: &str) -> Result<usize, SeedError> {
    let file: SeedFile = serde_yaml::from_str(content)?;
    info!(products = file.products.len(), "Parsed seed file");

    let errors = validate(&file);
    if !errors.is_empty() {
        error!("Seed validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }

    let products = CollectionPath::new(collections::PRODUCTS);
    let count = file.products.len();
    for entry in file.products {
        store.set(&products.doc(&entry.id), entry.fields).await?;
    }
    Ok(count)
}

/// Seed products from a YAML file.
///
/// # Errors
///
/// Returns `SeedError` if the file is missing or unreadable, or seeding fails.
pub async fn products(store: &dyn DocumentStore, file_path: &str) -> Result<(), SeedError> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(SeedError::NotFound(file_path.to_string()));
    }

    info!(path = %file_path, "Loading products from file");
    let content = tokio::fs::read_to_string(path).await?;
    let written = seed_from_str(store, &content).await?;

    info!("Seeding complete!");
    info!("  Products written: {written}");
    Ok(())
}
