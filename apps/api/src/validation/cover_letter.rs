use serde_json::{Map, Value};

use super::{join, Checker, ValidationReport};

const ADDRESS_PARTS: &[&str] = &["street", "city", "state", "zipCode", "country"];

/// Structural check of a cover-letter payload. Collects every violation.
pub fn validate_cover_letter(value: &Value) -> ValidationReport {
    let mut checker = Checker::default();
    let Some(root) = value.as_object() else {
        checker.push("document must be an object".to_string());
        return checker.finish();
    };

    if let Some(applicant) = checker.object(root, "applicant", "") {
        checker.string(applicant, "name", "applicant");
        for field in ["title", "email", "phone", "linkedin", "website"] {
            checker.optional_string(applicant, field, "applicant");
        }
        check_address(&mut checker, applicant, "applicant");
    }

    if let Some(recipient) = checker.optional_object(root, "recipient", "") {
        for field in ["name", "title", "company"] {
            checker.optional_string(recipient, field, "recipient");
        }
        check_address(&mut checker, recipient, "recipient");
    }

    if let Some(content) = checker.object(root, "content", "") {
        for field in [
            "date",
            "salutation",
            "openingParagraph",
            "closingParagraph",
            "complimentaryClose",
        ] {
            checker.optional_string(content, field, "content");
        }
        if let Some(paragraphs) = checker.array(content, "bodyParagraphs", "content") {
            for (i, paragraph) in paragraphs.iter().enumerate() {
                let path = format!("content.bodyParagraphs[{i}]");
                let Some(paragraph) = paragraph.as_object() else {
                    checker.push(format!("{path} must be an object"));
                    continue;
                };
                checker.string(paragraph, "text", &path);
                checker.optional_string_array(paragraph, "keywords", &path);
            }
        }
    }

    if let Some(formatting) = checker.optional_object(root, "formatting", "") {
        checker.optional_string(formatting, "font", "formatting");
        checker.optional_number(formatting, "fontSize", "formatting");
        checker.optional_string(formatting, "colorScheme", "formatting");
        checker.optional_string(formatting, "layout", "formatting");
    }

    check_attachments(&mut checker, root);

    checker.finish()
}

fn check_address(checker: &mut Checker, owner: &Map<String, Value>, path: &str) {
    let Some(address) = owner.get("address").filter(|v| !v.is_null()) else {
        return;
    };
    let path = join(path, "address");
    match address {
        Value::String(_) => {}
        Value::Object(parts) => {
            for part in ADDRESS_PARTS {
                checker.optional_string(parts, part, &path);
            }
        }
        _ => checker.push(format!("{path} must be a string or an object")),
    }
}

fn check_attachments(checker: &mut Checker, root: &Map<String, Value>) {
    let Some(attachments) = root.get("attachments").filter(|v| !v.is_null()) else {
        return;
    };
    let Some(attachments) = attachments.as_array() else {
        checker.push("attachments must be an array".to_string());
        return;
    };
    for (i, attachment) in attachments.iter().enumerate() {
        let path = format!("attachments[{i}]");
        match attachment {
            Value::String(_) => {}
            Value::Object(obj) => checker.string(obj, "name", &path),
            _ => checker.push(format!("{path} must be a string or an object")),
        }
    }
}
