/**
 * Request Validation
 *
 * Each request type declares a `Schema`: the rule for every path
 * parameter, query parameter and body field it reads. The `Validated`
 * extractor evaluates the whole schema once, before the handler runs,
 * and rejects with a single `BadRequest` listing every failing field:
 *
 * ```json
 * { "message": "Invalid input", "errors": ["body.name: name is required"] }
 * ```
 *
 * A missing body counts as `{}` and `null` counts as absent. Boolean
 * query strings (`?archived=TRUE`) are normalised to JSON booleans before
 * the request type is deserialized.
 */

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::backend::error::BackendError;
use crate::shared::MAX_NAME_LEN;

/// A single field rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty string (after trim) of at most `max` chars
    StringRequired { max: usize },
    /// Like `StringRequired`, but may be absent
    StringOptional { max: usize },
    /// JSON boolean, may be absent
    BooleanOptional,
    /// `"true"` / `"false"` in any case, may be absent
    BooleanStringOptional,
    /// Non-empty string taken verbatim (no trim) of at most `max_bytes`
    /// bytes
    SecretRequired { max_bytes: usize },
}

/// bcrypt ignores everything past this many bytes
pub const MAX_PASSWORD_BYTES: usize = 72;

impl Rule {
    pub const fn string_required() -> Self {
        Self::StringRequired { max: MAX_NAME_LEN }
    }

    pub const fn string_optional() -> Self {
        Self::StringOptional { max: MAX_NAME_LEN }
    }

    pub const fn secret_required() -> Self {
        Self::SecretRequired {
            max_bytes: MAX_PASSWORD_BYTES,
        }
    }

    /// Check one value; `None` means the field is absent
    pub fn check(&self, label: &str, value: Option<&Value>) -> Result<(), String> {
        match (*self, value) {
            (Self::StringRequired { .. } | Self::SecretRequired { .. }, None) => {
                Err(format!("{label} is required"))
            }
            (Self::StringOptional { .. } | Self::BooleanOptional | Self::BooleanStringOptional, None) => {
                Ok(())
            }
            (Self::StringRequired { max }, Some(value)) => check_string(label, value, max, "is required"),
            (Self::StringOptional { max }, Some(value)) => check_string(label, value, max, "cannot be empty"),
            (Self::SecretRequired { max_bytes }, Some(value)) => check_secret(label, value, max_bytes),
            (Self::BooleanOptional, Some(Value::Bool(_))) => Ok(()),
            (Self::BooleanOptional, Some(_)) => Err(format!("{label} must be a boolean")),
            (Self::BooleanStringOptional, Some(Value::String(s))) => match parse_bool(s) {
                Some(_) => Ok(()),
                None => Err(format!("{label} must be 'true' or 'false'")),
            },
            (Self::BooleanStringOptional, Some(_)) => {
                Err(format!("{label} must be a string ('true' or 'false')"))
            }
        }
    }
}

fn check_string(label: &str, value: &Value, max: usize, empty: &str) -> Result<(), String> {
    let Value::String(s) = value else {
        return Err(format!("{label} must be a string"));
    };
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(format!("{label} {empty}"));
    }
    if trimmed.chars().count() > max {
        return Err(format!("{label} is too long (max {max} chars)"));
    }
    Ok(())
}

fn check_secret(label: &str, value: &Value, max_bytes: usize) -> Result<(), String> {
    match value {
        Value::String(s) if s.is_empty() => Err(format!("{label} is required")),
        Value::String(s) if s.len() > max_bytes => {
            Err(format!("{label} is too long (max {max_bytes} bytes)"))
        }
        Value::String(_) => Ok(()),
        _ => Err(format!("{label} must be a string")),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// A named field and its rule
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub rule: Rule,
}

impl Field {
    pub const fn new(name: &'static str, rule: Rule) -> Self {
        Self { name, rule }
    }
}

/// Rules per request source
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub params: &'static [Field],
    pub query: &'static [Field],
    pub body: &'static [Field],
}

impl Schema {
    /// Run every rule and collect `"<source>.<field>: <problem>"` entries
    pub fn evaluate(
        &self,
        params: &Map<String, Value>,
        query: &Map<String, Value>,
        body: &Map<String, Value>,
    ) -> Vec<String> {
        let mut errors = Vec::new();
        run_rules("params", self.params, params, &mut errors);
        run_rules("query", self.query, query, &mut errors);
        run_rules("body", self.body, body, &mut errors);
        errors
    }
}

fn run_rules(source: &str, fields: &[Field], values: &Map<String, Value>, errors: &mut Vec<String>) {
    for field in fields {
        let value = values.get(field.name).filter(|v| !v.is_null());
        if let Err(problem) = field.rule.check(field.name, value) {
            errors.push(format!("{source}.{}: {problem}", field.name));
        }
    }
}

/// A request type with a validation schema
pub trait RequestSchema: DeserializeOwned {
    const SCHEMA: Schema;
}

/// Extractor that validates against `T::SCHEMA` and then deserializes `T`
/// from the query string and JSON body
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: RequestSchema + Send,
{
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();

        let params = if T::SCHEMA.params.is_empty() {
            Map::new()
        } else {
            let Path(raw) = Path::<HashMap<String, String>>::from_request_parts(&mut parts, state)
                .await
                .map_err(|e| BackendError::bad_request(e.body_text()))?;
            raw.into_iter().map(|(k, v)| (k, Value::String(v))).collect()
        };

        let Query(raw_query) = Query::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
            .map_err(|e| BackendError::bad_request(e.body_text()))?;
        let query: Map<String, Value> = raw_query
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();

        let req = Request::from_parts(parts, body);
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| BackendError::bad_request(e.body_text()))?;
        let body = parse_body(&bytes)?;

        let errors = T::SCHEMA.evaluate(&params, &query, &body);
        if !errors.is_empty() {
            tracing::debug!("Rejected request: {:?}", errors);
            return Err(BackendError::invalid_input(errors));
        }

        let value = merge_sources(T::SCHEMA, query, body);
        let parsed = serde_json::from_value(value)
            .map_err(|e| BackendError::bad_request(format!("Invalid request body: {e}")))?;
        Ok(Validated(parsed))
    }
}

fn parse_body(bytes: &Bytes) -> Result<Map<String, Value>, BackendError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(BackendError::bad_request("Request body must be a JSON object")),
        Err(e) => Err(BackendError::bad_request(format!("Malformed JSON body: {e}"))),
    }
}

/// Declared query and body fields only; nulls dropped, boolean strings parsed
fn merge_sources(schema: Schema, mut query: Map<String, Value>, mut body: Map<String, Value>) -> Value {
    let mut merged = Map::new();

    for field in schema.query {
        let value = match query.remove(field.name) {
            Some(Value::String(s)) if field.rule == Rule::BooleanStringOptional => {
                parse_bool(&s).map_or(Value::String(s), Value::Bool)
            }
            Some(value) => value,
            None => continue,
        };
        merged.insert(field.name.to_string(), value);
    }
    for field in schema.body {
        if let Some(value) = body.remove(field.name).filter(|v| !v.is_null()) {
            merged.insert(field.name.to_string(), value);
        }
    }
    Value::Object(merged)
}

// --------------------------------------------------------------------
// Request types
// --------------------------------------------------------------------

/// `GET /shoppingList?archived=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub archived: Option<bool>,
}

impl RequestSchema for ListQuery {
    const SCHEMA: Schema = Schema {
        params: &[],
        query: &[Field::new("archived", Rule::BooleanStringOptional)],
        body: &[],
    };
}

/// `POST /shoppingList/{list_name}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateListRequest {}

impl RequestSchema for CreateListRequest {
    const SCHEMA: Schema = Schema {
        params: &[Field::new("list_name", Rule::string_required())],
        query: &[],
        body: &[],
    };
}

/// `PUT /shoppingList/{list_name}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateListRequest {
    pub name: Option<String>,
    pub archived: Option<bool>,
}

impl RequestSchema for UpdateListRequest {
    const SCHEMA: Schema = Schema {
        params: &[],
        query: &[],
        body: &[
            Field::new("name", Rule::string_optional()),
            Field::new("archived", Rule::BooleanOptional),
        ],
    };
}

/// Body carrying a single `name`: add item, rename item, invite, remove member
#[derive(Debug, Clone, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

impl RequestSchema for NameRequest {
    const SCHEMA: Schema = Schema {
        params: &[],
        query: &[],
        body: &[Field::new("name", Rule::string_required())],
    };
}

/// `PUT /shoppingList/{list_name}/item/{item_name}/mark`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkItemRequest {
    pub checked: Option<bool>,
}

impl RequestSchema for MarkItemRequest {
    const SCHEMA: Schema = Schema {
        params: &[],
        query: &[],
        body: &[Field::new("checked", Rule::BooleanOptional)],
    };
}
