//! Order intake validation.
//!
//! Only presence is checked. Values are kept exactly as submitted.

use serde::Deserialize;
use thiserror::Error;

use crate::config::OrderConfig;
use crate::order::photo::PhotoAttachment;

/// Raw order fields as submitted by the form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderFields {
    pub city: Option<String>,
    pub warehouse: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// A submission that passed validation.
#[derive(Debug)]
pub struct ValidatedOrder {
    pub city: String,
    pub warehouse: String,
    pub name: String,
    pub phone: Option<String>,
    pub photo: Option<PhotoAttachment>,
}

/// Required fields were missing or blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("All fields are required; missing: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

/// Check required fields. The photo is dropped (and any temporary file with
/// it) when validation fails.
pub fn validate(
    fields: OrderFields,
    photo: Option<PhotoAttachment>,
    policy: &OrderConfig,
) -> Result<ValidatedOrder, ValidationError> {
    let city = present(fields.city);
    let warehouse = present(fields.warehouse);
    let name = present(fields.name);
    let phone = present(fields.phone);

    let mut missing = Vec::new();
    if city.is_none() {
        missing.push("city");
    }
    if warehouse.is_none() {
        missing.push("warehouse");
    }
    if name.is_none() {
        missing.push("name");
    }
    if policy.require_phone && phone.is_none() {
        missing.push("phone");
    }

    match (city, warehouse, name) {
        (Some(city), Some(warehouse), Some(name)) if missing.is_empty() => Ok(ValidatedOrder {
            city,
            warehouse,
            name,
            phone,
            photo,
        }),
        _ => Err(ValidationError { missing }),
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
