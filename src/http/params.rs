//! Typed extraction of query parameters, path parameters, and bodies.
//!
//! # Responsibilities
//! - Coerce pagination fields with lenient defaulting
//! - Reject missing or malformed required fields before any backend call
//! - Decode and rule-check JSON bodies
//!
//! # Design Decisions
//! - Pagination never fails: bad input degrades to the defaults
//! - Required fields never default: the caller must supply them
//! - First failing field wins; violations within one body are collected

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::backend::Page;
use crate::http::error::ApiError;

/// Default page when `page` is absent or unusable.
const DEFAULT_PAGE: u32 = 1;

/// Default page size when `page_size` is absent or unusable.
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Domain rule check for request bodies; violations are collected, not
/// short-circuited, so the caller sees every broken rule at once.
pub trait ValidateBody {
    fn validate(&self) -> Vec<String>;
}

/// Lenient positive-integer coercion: `None` unless the value parses to > 0.
fn positive(value: Option<&String>) -> Option<u32> {
    value.and_then(|raw| raw.parse::<u32>().ok()).filter(|n| *n > 0)
}

/// Extract the pagination window, applying defaults for absent, non-numeric,
/// or non-positive values.
pub fn pagination(query: &HashMap<String, String>) -> Page {
    Page {
        page: positive(query.get("page")).unwrap_or(DEFAULT_PAGE),
        page_size: positive(query.get("page_size")).unwrap_or(DEFAULT_PAGE_SIZE),
        search: query.get("search").cloned().unwrap_or_default(),
    }
}

/// Required `year` query parameter; no defaulting.
pub fn required_year(query: &HashMap<String, String>) -> Result<u16, ApiError> {
    query
        .get("year")
        .and_then(|raw| raw.parse::<u16>().ok())
        .ok_or_else(|| ApiError::invalid_parameter("invalid_year", "year must be a number"))
}

/// Required `month` query parameter, 1 through 12.
pub fn required_month(query: &HashMap<String, String>) -> Result<u8, ApiError> {
    query
        .get("month")
        .and_then(|raw| raw.parse::<u8>().ok())
        .filter(|month| (1..=12).contains(month))
        .ok_or_else(|| {
            ApiError::invalid_parameter("invalid_month", "month must be a number from 1 to 12")
        })
}

/// Required `card_number` query parameter; empty is rejected.
pub fn required_card_number(query: &HashMap<String, String>) -> Result<String, ApiError> {
    match query.get("card_number").map(String::as_str) {
        Some(card_number) if !card_number.is_empty() => Ok(card_number.to_string()),
        _ => Err(ApiError::invalid_parameter(
            "invalid_card_number",
            "card_number must not be empty",
        )),
    }
}

/// Numeric ID from a path segment.
pub fn required_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>()
        .map_err(|_| ApiError::invalid_parameter("invalid_id", "id must be a number"))
}

/// Card number from a path segment; empty is rejected.
pub fn card_number_path(raw: &str) -> Result<String, ApiError> {
    if raw.is_empty() {
        return Err(ApiError::invalid_parameter(
            "invalid_card_number",
            "card_number must not be empty",
        ));
    }
    Ok(raw.to_string())
}

/// Decode a JSON body and run its domain rules.
///
/// An undecodable body is `MalformedBody`; a decodable body breaking any rule
/// is `ValidationFailed` carrying every violation.
pub fn validated_body<T: ValidateBody>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    let Json(value) = body.map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;
    let violations = value.validate();
    if violations.is_empty() {
        Ok(value)
    } else {
        Err(ApiError::ValidationFailed(violations))
    }
}
