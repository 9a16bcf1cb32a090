use std::collections::HashMap;

use serde_json::{Map, Value};

use super::{Checker, ValidationReport};

pub const SECTION_TYPES: &[&str] = &[
    "education",
    "experience",
    "projects",
    "skills",
    "languages",
    "certifications",
    "custom",
];

const BASICS_FIELDS: &[&str] = &["name", "email", "phone", "location", "linkedin", "summary"];

/// Structural check of a resume payload. Collects every violation.
pub fn validate_resume(value: &Value) -> ValidationReport {
    let mut checker = Checker::default();
    let Some(root) = value.as_object() else {
        checker.push("document must be an object".to_string());
        return checker.finish();
    };

    if let Some(basics) = checker.object(root, "basics", "") {
        for field in BASICS_FIELDS {
            checker.string(basics, field, "basics");
        }
    }

    if let Some(custom) = checker.object(root, "custom", "") {
        for (key, field) in custom {
            check_custom_field(&mut checker, field, &format!("custom.{key}"));
        }
    }

    if let Some(sections) = checker.array(root, "sections", "") {
        let mut seen_ids: HashMap<&str, usize> = HashMap::new();
        for (i, section) in sections.iter().enumerate() {
            let path = format!("sections[{i}]");
            let Some(section) = section.as_object() else {
                checker.push(format!("{path} must be an object"));
                continue;
            };
            if let Some(id) = section.get("id").and_then(Value::as_str) {
                if let Some(first) = seen_ids.insert(id, i) {
                    checker.push(format!("{path}.id duplicates sections[{first}].id"));
                }
            }
            check_section(&mut checker, section, &path);
        }
    }

    checker.finish()
}

fn check_custom_field(checker: &mut Checker, field: &Value, path: &str) {
    let Some(field) = field.as_object() else {
        checker.push(format!("{path} must be an object"));
        return;
    };
    checker.string(field, "id", path);
    checker.string(field, "title", path);
    checker.string(field, "content", path);
    checker.boolean(field, "hidden", path);
    checker.boolean(field, "link", path);
    checker.optional_number(field, "order", path);
}

fn check_section(checker: &mut Checker, section: &Map<String, Value>, path: &str) {
    checker.string(section, "id", path);
    checker.string(section, "title", path);
    checker.optional_boolean(section, "hidden", path);
    checker.optional_number(section, "order", path);

    let kind = section.get("type").and_then(Value::as_str);
    let Some(kind) = kind.filter(|k| SECTION_TYPES.contains(k)) else {
        checker.push(format!(
            "{path}.type must be one of {}",
            SECTION_TYPES.join(", ")
        ));
        return;
    };

    match kind {
        "skills" | "languages" | "certifications" => checker.string_array(section, "items", path),
        "custom" => checker.string_array(section, "content", path),
        _ => {
            let Some(items) = checker.array(section, "items", path) else {
                return;
            };
            for (j, item) in items.iter().enumerate() {
                let item_path = format!("{path}.items[{j}]");
                let Some(item) = item.as_object() else {
                    checker.push(format!("{item_path} must be an object"));
                    continue;
                };
                match kind {
                    "education" => check_education(checker, item, &item_path),
                    "experience" => check_experience(checker, item, &item_path),
                    _ => check_project(checker, item, &item_path),
                }
            }
        }
    }
}

fn check_education(checker: &mut Checker, item: &Map<String, Value>, path: &str) {
    checker.string(item, "institution", path);
    checker.string(item, "degree", path);
    checker.optional_string(item, "startDate", path);
    checker.optional_string(item, "endDate", path);
    checker.optional_string(item, "location", path);
    checker.optional_string_array(item, "highlights", path);
}

fn check_experience(checker: &mut Checker, item: &Map<String, Value>, path: &str) {
    checker.string(item, "company", path);
    checker.string(item, "role", path);
    checker.string(item, "startDate", path);
    checker.string(item, "endDate", path);
    checker.optional_string(item, "location", path);
    checker.optional_string_array(item, "achievements", path);
}

fn check_project(checker: &mut Checker, item: &Map<String, Value>, path: &str) {
    checker.string(item, "name", path);
    checker.optional_string(item, "link", path);
    checker.optional_string(item, "repo", path);
    checker.optional_string_array(item, "description", path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentKind;
    use crate::validation::parse_document;
    use serde_json::json;

    fn valid_resume() -> Value {
        json!({
            "basics": {
                "name": "Jane Doe", "email": "jane@example.com", "phone": "",
                "location": "Berlin", "linkedin": "", "summary": ""
            },
            "custom": {
                "dob": { "id": "dob", "title": "Born", "content": "1990", "hidden": false, "link": false }
            },
            "sections": [
                { "id": "exp", "title": "Experience", "type": "experience", "items": [
                    { "company": "Acme", "role": "Engineer", "startDate": "2020-01",
                      "endDate": "Present", "achievements": ["Shipped X"] }
                ]},
                { "id": "edu", "title": "Education", "type": "education", "items": [
                    { "institution": "MIT", "degree": "BSc", "highlights": null }
                ]},
                { "id": "proj", "title": "Projects", "type": "projects", "items": [
                    { "name": "Tool", "link": "example.com" }
                ]},
                { "id": "sk", "title": "Skills", "type": "skills", "items": ["Rust"] },
                { "id": "notes", "title": "Notes", "type": "custom", "content": ["Hi"] }
            ]
        })
    }

    #[test]
    fn test_valid_resume_passes() {
        let report = validate_resume(&valid_resume());
        assert!(report.ok, "unexpected errors: {:?}", report.errors);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_non_object_document() {
        let report = validate_resume(&json!([1, 2]));
        assert_eq!(report.errors, vec!["document must be an object"]);
    }

    #[test]
    fn test_collects_all_independent_defects() {
        let mut doc = valid_resume();
        doc["basics"].as_object_mut().unwrap().remove("email");
        doc["sections"][3]["type"] = json!("hobbies");
        doc["sections"][0]["items"][0]["company"] = json!(42);

        let report = validate_resume(&doc);
        assert!(!report.ok);
        assert!(report.errors.len() >= 3, "got {:?}", report.errors);
        assert!(report.errors.contains(&"basics.email must be a string".to_string()));
        assert!(report
            .errors
            .contains(&"sections[0].items[0].company must be a string".to_string()));
        assert!(report
            .errors
            .iter()
            .any(|e| e.starts_with("sections[3].type must be one of")));
    }

    #[test]
    fn test_item_shape_must_match_tag() {
        let mut doc = valid_resume();
        doc["sections"][3]["items"] = json!([{ "name": "Rust" }]);
        doc["sections"][4]["content"] = json!("not a list");
        let report = validate_resume(&doc);
        assert_eq!(
            report.errors,
            vec![
                "sections[3].items[0] must be a string",
                "sections[4].content must be an array",
            ]
        );
    }

    #[test]
    fn test_optional_bullets_must_be_string_arrays() {
        let mut doc = valid_resume();
        doc["sections"][0]["items"][0]["achievements"] = json!(["ok", 3]);
        doc["sections"][2]["items"][0]["description"] = json!("flat");
        let report = validate_resume(&doc);
        assert_eq!(
            report.errors,
            vec![
                "sections[0].items[0].achievements[1] must be a string",
                "sections[2].items[0].description must be an array of strings",
            ]
        );
    }

    #[test]
    fn test_custom_field_shape() {
        let mut doc = valid_resume();
        doc["custom"]["dob"]["hidden"] = json!("no");
        doc["custom"]["dob"]["order"] = json!("first");
        let report = validate_resume(&doc);
        assert_eq!(
            report.errors,
            vec![
                "custom.dob.hidden must be a boolean",
                "custom.dob.order must be a number",
            ]
        );
    }

    #[test]
    fn test_duplicate_section_ids() {
        let mut doc = valid_resume();
        doc["sections"][1]["id"] = json!("exp");
        let report = validate_resume(&doc);
        assert_eq!(report.errors, vec!["sections[1].id duplicates sections[0].id"]);
    }

    #[test]
    fn test_missing_top_level_keys() {
        let report = validate_resume(&json!({}));
        assert_eq!(
            report.errors,
            vec![
                "basics must be an object",
                "custom must be an object",
                "sections must be an array",
            ]
        );
    }

    #[test]
    fn test_accepted_document_decodes() {
        let doc = parse_document(DocumentKind::Resume, valid_resume()).unwrap();
        assert_eq!(doc.owner_name(), "Jane Doe");
    }

    #[test]
    fn test_rejected_document_carries_errors() {
        let err = parse_document(DocumentKind::Resume, json!({ "basics": {} })).unwrap_err();
        match err {
            crate::errors::ExportError::Validation(errors) => assert!(errors.len() >= 6),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
