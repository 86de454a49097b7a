//! Part records
//!
//! A part (`buhin`) is a code plus a fixed-width name. On the wire the
//! fields keep their legacy column names, `buno` and `bunm`.

use serde::{Deserialize, Serialize};

use super::errors::{ServiceError, ServiceResult};

/// Smallest valid part number
pub const CODE_MIN: i32 = 1;
/// Largest valid part number
pub const CODE_MAX: i32 = 99_999;
/// Maximum name length in characters
pub const NAME_MAX_LEN: usize = 50;

/// A part as stored in the backing table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(rename = "buno")]
    pub code: i32,
    #[serde(rename = "bunm")]
    pub name: String,
}

impl Part {
    /// Build a part from a stored row value, dropping the column padding
    pub fn from_stored(code: i32, stored_name: &str) -> Self {
        Self {
            code,
            name: stored_name.trim_end().to_string(),
        }
    }
}

/// Body of a create request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPart {
    #[serde(rename = "buno")]
    pub code: i32,
    #[serde(rename = "bunm")]
    pub name: String,
}

/// Body of an update request; the code comes from the path
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PartUpdate {
    #[serde(rename = "bunm")]
    pub name: String,
}

/// Result of listing parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartListing {
    pub items: Vec<Part>,
    pub count: usize,
}

impl From<Vec<Part>> for PartListing {
    fn from(items: Vec<Part>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

/// Reject part numbers outside [`CODE_MIN`]..=[`CODE_MAX`]
pub fn validate_code(code: i32) -> ServiceResult<i32> {
    if (CODE_MIN..=CODE_MAX).contains(&code) {
        Ok(code)
    } else {
        Err(ServiceError::validation(format!(
            "buno must be between {} and {} (got {})",
            CODE_MIN, CODE_MAX, code
        )))
    }
}

/// Normalize a name the way the store will return it and check its length
///
/// Trailing whitespace is indistinguishable from column padding, so it is
/// removed before the length check.
pub fn normalize_name(name: &str) -> ServiceResult<String> {
    let name = name.trim_end();
    let len = name.chars().count();
    if len == 0 || len > NAME_MAX_LEN {
        return Err(ServiceError::validation(format!(
            "bunm must be 1 to {} characters (got {})",
            NAME_MAX_LEN, len
        )));
    }
    Ok(name.to_string())
}
