// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Declarative response schemas for structured generation
//!
//! Every structured call declares a [`ResponseSchema`] describing the fields
//! the model must return. The gateway validates the raw model output against
//! the schema before handing it back; a mismatch counts as a generation
//! failure and consumes the single fallback attempt.

use serde_json::Value;

use crate::error::GatewayError;

/// The kind of value a schema field must hold
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A JSON string
    Text,
    /// A JSON number (integer or float)
    Number,
    /// A JSON boolean
    Boolean,
    /// An array of strings
    TextArray,
    /// An array of numbers
    NumberArray,
    /// An array of objects, each validated against the nested field specs
    ObjectArray(Vec<FieldSpec>),
    /// A JSON object with unspecified interior shape
    Object,
}

impl FieldKind {
    /// Human-readable description used when rendering schema instructions
    fn describe(&self) -> String {
        match self {
            Self::Text => "string".to_string(),
            Self::Number => "number".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::TextArray => "array of strings".to_string(),
            Self::NumberArray => "array of numbers".to_string(),
            Self::ObjectArray(fields) => {
                let inner: Vec<String> = fields
                    .iter()
                    .map(|f| format!("{}: {}", f.name, f.kind.describe()))
                    .collect();
                format!("array of objects with {{{}}}", inner.join(", "))
            }
            Self::Object => "object".to_string(),
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::TextArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            Self::NumberArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_number)),
            Self::ObjectArray(fields) => value.as_array().is_some_and(|items| {
                items
                    .iter()
                    .all(|item| validate_object(item, fields).is_ok())
            }),
            Self::Object => value.is_object(),
        }
    }
}

/// A single field in a response schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name as it must appear in the JSON object
    pub name: &'static str,
    /// Expected value kind
    pub kind: FieldKind,
    /// Whether the field must be present
    pub required: bool,
    /// Short hint rendered into the schema instructions
    pub hint: &'static str,
}

impl FieldSpec {
    /// A required field
    pub fn required(name: &'static str, kind: FieldKind, hint: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            hint,
        }
    }

    /// An optional field
    pub fn optional(name: &'static str, kind: FieldKind, hint: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            hint,
        }
    }
}

/// Declarative shape of a structured model response
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    /// Name of the schema, used in logs and error messages
    pub name: &'static str,
    /// Declared fields
    pub fields: Vec<FieldSpec>,
}

impl ResponseSchema {
    /// Create a new schema
    pub fn new(name: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self { name, fields }
    }

    /// Render instructions appended to every structured prompt
    ///
    /// The model is told to respond with a single JSON object matching the
    /// declared fields and nothing else.
    pub fn instructions(&self) -> String {
        let mut lines = vec![
            "Respond with a single JSON object and no other text.".to_string(),
            "The object must have exactly these fields:".to_string(),
        ];
        for field in &self.fields {
            let requirement = if field.required {
                "required"
            } else {
                "optional"
            };
            lines.push(format!(
                "- \"{}\" ({}, {}): {}",
                field.name,
                field.kind.describe(),
                requirement,
                field.hint
            ));
        }
        lines.push("Do not include any fields that are not listed.".to_string());
        lines.join("\n")
    }

    /// Validate a parsed JSON value against this schema
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SchemaValidation`] if the value is not an
    /// object, a required field is missing, a field has the wrong kind, or
    /// the object carries a field the schema does not declare
    pub fn validate(&self, value: &Value) -> Result<(), GatewayError> {
        validate_object(value, &self.fields).map_err(|message| {
            GatewayError::schema_validation(format!("schema '{}': {message}", self.name))
        })
    }
}

fn validate_object(value: &Value, fields: &[FieldSpec]) -> Result<(), String> {
    let object = value.as_object().ok_or("expected a JSON object")?;

    for field in fields {
        match object.get(field.name) {
            Some(actual) if actual.is_null() && !field.required => {}
            Some(actual) => {
                if !field.kind.matches(actual) {
                    return Err(format!(
                        "field '{}' must be a {}",
                        field.name,
                        field.kind.describe()
                    ));
                }
            }
            None if field.required => {
                return Err(format!("missing required field '{}'", field.name));
            }
            None => {}
        }
    }

    for key in object.keys() {
        if !fields.iter().any(|field| field.name == key) {
            return Err(format!("undeclared field '{key}'"));
        }
    }

    Ok(())
}

/// Extract a JSON payload from raw model output
///
/// Models frequently wrap JSON in markdown code fences or surround it with
/// prose. This strips fences and slices from the first `{` to the matching
/// last `}` before parsing.
pub fn extract_json_payload(raw: &str) -> Result<Value, GatewayError> {
    let trimmed = raw.trim();

    let without_fence = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest.trim_end_matches("```").trim()
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest.trim_end_matches("```").trim()
    } else {
        trimmed
    };

    let candidate = match (without_fence.find('{'), without_fence.rfind('}')) {
        (Some(start), Some(end)) if start < end => &without_fence[start..=end],
        _ => {
            return Err(GatewayError::schema_validation(
                "response contains no JSON object",
            ));
        }
    };

    serde_json::from_str(candidate)
        .map_err(|e| GatewayError::schema_validation(format!("response is not valid JSON: {e}")))
}
