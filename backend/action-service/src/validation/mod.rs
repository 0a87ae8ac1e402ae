//! Input validation for actions.
//!
//! Raw inputs arrive as loosely-typed forms (every field optional, ids as
//! strings). A [`Schema`] checks the field rules declared with `validator` and
//! then converts the form into its typed input. Failures come back as a
//! field-to-messages map keyed by the caller-facing (camelCase) field names.

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

pub mod schemas;

pub use schemas::*;

/// Field name -> messages, in stable order
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const REQUIRED: &str = "Required";
pub const INVALID_ID: &str = "Invalid id";
pub const MALFORMED_BODY: &str = "Malformed request body";

/// Key for errors that belong to the body as a whole
pub const FORM_KEY: &str = "form";

/// A raw input shape that can be validated into a typed value.
pub trait Schema: Validate + Sized {
    type Output;

    /// Convert the form into its typed value, recording any parse failures.
    ///
    /// Called after the declarative rules have run, with their errors already
    /// in `errors`. Returning `None` or leaving `errors` non-empty rejects the
    /// input.
    fn into_output(self, errors: &mut FieldErrors) -> Option<Self::Output>;
}

/// Run the declarative rules and the typed conversion of a schema.
pub fn validate<S: Schema>(raw: S) -> Result<S::Output, FieldErrors> {
    let mut errors = match raw.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => flatten_errors(&e),
    };

    match raw.into_output(&mut errors) {
        Some(output) if errors.is_empty() => Ok(output),
        _ => Err(errors),
    }
}

/// Decode a JSON request body into a raw form.
///
/// An empty body reads as an empty form so missing fields surface through the
/// `required` rules. Anything that is not a JSON object of form values is
/// reported under [`FORM_KEY`].
pub fn decode<F: DeserializeOwned>(body: &[u8]) -> Result<F, FieldErrors> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };

    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "rejected request body");
        let mut errors = FieldErrors::new();
        push_error(&mut errors, FORM_KEY, MALFORMED_BODY);
        errors
    })
}

/// Flatten `validator` errors into a field -> messages map.
pub fn flatten_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (to_camel_case(&field), messages)
        })
        .collect()
}

/// Parse an id field, recording `Invalid id` when it is present but malformed.
///
/// A missing value is left to the `required` rule.
pub fn parse_id(field: &str, value: Option<String>, errors: &mut FieldErrors) -> Option<Uuid> {
    let raw = value?;
    match Uuid::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            push_error(errors, field, INVALID_ID);
            None
        }
    }
}

pub fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
