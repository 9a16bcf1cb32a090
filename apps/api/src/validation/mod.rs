//! Structural validation of incoming documents.
//!
//! Validators walk raw JSON and collect every violation as a human-readable
//! path message instead of stopping at the first one. A document is only
//! decoded into its typed model, and handed to an exporter, after it passes.

pub mod cover_letter;
pub mod resume;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::ExportError;
use crate::models::{Document, DocumentKind};

pub use cover_letter::validate_cover_letter;
pub use resume::validate_resume;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
        }
    }
}

pub fn validate(kind: DocumentKind, value: &Value) -> ValidationReport {
    match kind {
        DocumentKind::Resume => validate_resume(value),
        DocumentKind::CoverLetter => validate_cover_letter(value),
    }
}

/// Validates, then decodes into the typed document. Validation failures carry
/// the full error list.
pub fn parse_document(kind: DocumentKind, value: Value) -> Result<Document, ExportError> {
    let report = validate(kind, &value);
    if !report.ok {
        return Err(ExportError::Validation(report.errors));
    }
    Ok(match kind {
        DocumentKind::Resume => Document::Resume(serde_json::from_value(value)?),
        DocumentKind::CoverLetter => Document::CoverLetter(serde_json::from_value(value)?),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Shared checker
// ────────────────────────────────────────────────────────────────────────────

/// Accumulates violations. Optional fields accept JSON `null` as absent.
#[derive(Default)]
pub(crate) struct Checker {
    errors: Vec<String>,
}

pub(crate) fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

impl Checker {
    pub fn push(&mut self, message: String) {
        self.errors.push(message);
    }

    pub fn finish(self) -> ValidationReport {
        ValidationReport::from_errors(self.errors)
    }

    /// Returns the object at `obj[key]`, recording an error when it is not one.
    pub fn object<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<&'v Map<String, Value>> {
        let found = obj.get(key).and_then(Value::as_object);
        if found.is_none() {
            self.push(format!("{} must be an object", join(path, key)));
        }
        found
    }

    pub fn optional_object<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<&'v Map<String, Value>> {
        let value = present(obj, key)?;
        let found = value.as_object();
        if found.is_none() {
            self.push(format!("{} must be an object", join(path, key)));
        }
        found
    }

    pub fn array<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<&'v Vec<Value>> {
        let found = obj.get(key).and_then(Value::as_array);
        if found.is_none() {
            self.push(format!("{} must be an array", join(path, key)));
        }
        found
    }

    pub fn string(&mut self, obj: &Map<String, Value>, key: &str, path: &str) {
        if !obj.get(key).is_some_and(Value::is_string) {
            self.push(format!("{} must be a string", join(path, key)));
        }
    }

    pub fn optional_string(&mut self, obj: &Map<String, Value>, key: &str, path: &str) {
        if present(obj, key).is_some_and(|v| !v.is_string()) {
            self.push(format!("{} must be a string", join(path, key)));
        }
    }

    pub fn boolean(&mut self, obj: &Map<String, Value>, key: &str, path: &str) {
        if !obj.get(key).is_some_and(Value::is_boolean) {
            self.push(format!("{} must be a boolean", join(path, key)));
        }
    }

    pub fn optional_boolean(&mut self, obj: &Map<String, Value>, key: &str, path: &str) {
        if present(obj, key).is_some_and(|v| !v.is_boolean()) {
            self.push(format!("{} must be a boolean", join(path, key)));
        }
    }

    pub fn optional_number(&mut self, obj: &Map<String, Value>, key: &str, path: &str) {
        if present(obj, key).is_some_and(|v| !v.is_number()) {
            self.push(format!("{} must be a number", join(path, key)));
        }
    }

    /// Every element of `items` must be a string.
    pub fn string_elements(&mut self, items: &[Value], path: &str) {
        for (i, item) in items.iter().enumerate() {
            if !item.is_string() {
                self.push(format!("{path}[{i}] must be a string"));
            }
        }
    }

    pub fn string_array(&mut self, obj: &Map<String, Value>, key: &str, path: &str) {
        if let Some(items) = self.array(obj, key, path) {
            self.string_elements(items, &join(path, key));
        }
    }

    pub fn optional_string_array(&mut self, obj: &Map<String, Value>, key: &str, path: &str) {
        let Some(value) = present(obj, key) else {
            return;
        };
        match value.as_array() {
            Some(items) => self.string_elements(items, &join(path, key)),
            None => self.push(format!("{} must be an array of strings", join(path, key))),
        }
    }
}
