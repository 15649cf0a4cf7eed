//! Boundary checks for product write payloads.
//!
//! Request bodies arrive as untyped JSON. `ProductPayload::from_json` turns one
//! into the fixed-shape record or reports every failing field at once, so the
//! caller can echo a single complete message back to the client.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::product::ProductPayload;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// `None` when the problem is with the body as a whole.
    pub field: Option<String>,
    pub reason: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{}", render_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn body(reason: impl Into<String>) -> Self {
        Self { issues: vec![FieldIssue { field: None, reason: reason.into() }] }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().filter_map(|issue| issue.field.as_deref())
    }
}

fn render_issues(issues: &[FieldIssue]) -> String {
    let noun = if issues.len() == 1 { "error" } else { "errors" };
    let details = issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
    format!("{} validation {noun} for product: {details}", issues.len())
}

impl ProductPayload {
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let object = value
            .as_object()
            .ok_or_else(|| ValidationError::body("request body must be a JSON object"))?;

        match (required_string(object, "product_name"), required_string(object, "category")) {
            (Ok(product_name), Ok(category)) => Ok(Self { product_name, category }),
            (product_name, category) => {
                let issues = [("product_name", product_name.err()), ("category", category.err())]
                    .into_iter()
                    .filter_map(|(field, reason)| {
                        reason.map(|reason| FieldIssue { field: Some(field.to_string()), reason })
                    })
                    .collect();
                Err(ValidationError { issues })
            }
        }
    }
}

fn required_string(object: &Map<String, Value>, field: &str) -> Result<String, String> {
    match object.get(field) {
        None => Err("field required".to_string()),
        Some(Value::Null) => Err("must not be null".to_string()),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(format!("expected a string, found {}", json_type_name(other))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
