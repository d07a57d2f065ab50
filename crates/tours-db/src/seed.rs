//! Loading tours from JSON dumps.

use std::fs;
use std::path::Path;

use bson::{Bson, Document};

use crate::error::DbError;

/// Parse a JSON array of documents.
pub fn from_json_slice(bytes: &[u8]) -> Result<Vec<Document>, DbError> {
    let docs: Vec<Document> = serde_json::from_slice(bytes)?;
    Ok(docs)
}

/// Read and parse a JSON file holding an array of documents.
pub fn load_json(path: impl AsRef<Path>) -> Result<Vec<Document>, DbError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let docs = from_json_slice(&bytes)?;
    tracing::info!(path = %path.display(), count = docs.len(), "loaded seed documents");
    Ok(docs)
}

/// Fill in the fields a freshly created tour gets: `createdAt` (now) and
/// the `__v` version counter (0), keeping existing values. `slug` is always
/// derived from `name`.
pub fn stamp_defaults(docs: &mut [Document]) {
    let now = bson::DateTime::now();
    for doc in docs {
        if let Ok(name) = doc.get_str("name") {
            let slug = slugify(name);
            doc.insert("slug", slug);
        }
        if !doc.contains_key("createdAt") {
            doc.insert("createdAt", Bson::DateTime(now));
        }
        if !doc.contains_key("__v") {
            doc.insert("__v", 0_i32);
        }
    }
}

/// Lower-case URL slug: letters and digits are kept, runs of whitespace,
/// `-` and `_` become a single `-`, anything else is dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }
    slug
}
