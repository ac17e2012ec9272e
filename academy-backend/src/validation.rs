//! Contact form schema checks
//!
//! The form posts camelCase JSON. Every field is checked and all failures are
//! reported together, one message per field, in form order.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::NewContactSubmission;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Length bounds for one text field, counted in characters
struct TextRule {
    field: &'static str,
    min: usize,
    max: usize,
    too_short: &'static str,
    too_long: &'static str,
}

const NAME: TextRule = TextRule {
    field: "name",
    min: 2,
    max: 100,
    too_short: "Name must be at least 2 characters",
    too_long: "Name too long",
};

const PHONE: TextRule = TextRule {
    field: "phone",
    min: 10,
    max: 20,
    too_short: "Phone number must be at least 10 digits",
    too_long: "Phone number too long",
};

const SUBJECT: TextRule = TextRule {
    field: "subject",
    min: 1,
    max: 200,
    too_short: "Subject is required",
    too_long: "Subject too long",
};

const MESSAGE: TextRule = TextRule {
    field: "message",
    min: 10,
    max: 2000,
    too_short: "Message must be at least 10 characters",
    too_long: "Message too long",
};

const REQUIRED: &str = "Required";
const EXPECTED_STRING: &str = "Expected string";
const INVALID_EMAIL: &str = "Invalid email address";
const INVALID_DATE: &str = "Preferred visit date must be a valid date (YYYY-MM-DD)";

/// Validate a decoded request body into a submission ready to store.
pub fn validate_contact(body: &Map<String, Value>) -> Result<NewContactSubmission, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = text_field(body, &NAME, &mut errors);
    let email = email_field(body, &mut errors);
    let phone = text_field(body, &PHONE, &mut errors);
    let subject = text_field(body, &SUBJECT, &mut errors);
    let message = text_field(body, &MESSAGE, &mut errors);
    let preferred_visit_date = visit_date_field(body, &mut errors);

    match (name, email, phone, subject, message, preferred_visit_date) {
        (Some(name), Some(email), Some(phone), Some(subject), Some(message), Some(preferred_visit_date)) => {
            Ok(NewContactSubmission {
                name,
                email,
                phone,
                subject,
                message,
                preferred_visit_date,
            })
        }
        _ => Err(errors),
    }
}

fn required_string<'a>(
    body: &'a Map<String, Value>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a str> {
    match body.get(field) {
        None | Some(Value::Null) => {
            errors.push(FieldError { field, message: REQUIRED });
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => {
            errors.push(FieldError { field, message: EXPECTED_STRING });
            None
        }
    }
}

fn text_field(body: &Map<String, Value>, rule: &TextRule, errors: &mut Vec<FieldError>) -> Option<String> {
    let value = required_string(body, rule.field, errors)?;
    let len = value.chars().count();

    if len < rule.min {
        errors.push(FieldError { field: rule.field, message: rule.too_short });
        return None;
    }
    if len > rule.max {
        errors.push(FieldError { field: rule.field, message: rule.too_long });
        return None;
    }

    Some(value.to_string())
}

fn email_field(body: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    let value = required_string(body, "email", errors)?;

    if !is_valid_email(value) {
        errors.push(FieldError { field: "email", message: INVALID_EMAIL });
        return None;
    }

    Some(value.to_string())
}

/// Outer Option is validity; inner Option is presence.
fn visit_date_field(body: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<Option<NaiveDate>> {
    const FIELD: &str = "preferredVisitDate";

    match body.get(FIELD) {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) if s.trim().is_empty() => Some(None),
        Some(Value::String(s)) => match parse_visit_date(s.trim()) {
            Some(date) => Some(Some(date)),
            None => {
                errors.push(FieldError { field: FIELD, message: INVALID_DATE });
                None
            }
        },
        Some(_) => {
            errors.push(FieldError { field: FIELD, message: EXPECTED_STRING });
            None
        }
    }
}

/// Exactly `YYYY-MM-DD`; chrono alone also takes unpadded or signed years.
fn parse_visit_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn is_valid_email(value: &str) -> bool {
    let Some((local, _)) = value.split_once('@') else {
        return false;
    };

    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    EMAIL_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test body must be an object"),
        }
    }

    fn valid_body() -> Value {
        json!({
            "name": "Rahul Mehta",
            "email": "rahul.mehta@example.com",
            "phone": "+91 98765 43210",
            "subject": "Campus visit",
            "message": "We would like to tour the campus next month.",
            "preferredVisitDate": "2026-11-20"
        })
    }

    fn fields(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_valid_submission() {
        let submission = validate_contact(&body(valid_body())).unwrap();
        assert_eq!(submission.name, "Rahul Mehta");
        assert_eq!(submission.phone, "+91 98765 43210");
        assert_eq!(submission.preferred_visit_date, NaiveDate::from_ymd_opt(2026, 11, 20));
    }

    #[test]
    fn test_visit_date_is_optional() {
        let mut value = valid_body();
        value.as_object_mut().unwrap().remove("preferredVisitDate");
        assert!(validate_contact(&body(value)).unwrap().preferred_visit_date.is_none());

        let mut value = valid_body();
        value["preferredVisitDate"] = json!("");
        assert!(validate_contact(&body(value)).unwrap().preferred_visit_date.is_none());
    }

    #[test]
    fn test_empty_name() {
        let mut value = valid_body();
        value["name"] = json!("");

        let errors = validate_contact(&body(value)).unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError { field: "name", message: "Name must be at least 2 characters" }]
        );
    }

    #[test]
    fn test_malformed_email() {
        for email in ["not-an-email", "a@b", "@example.com", "user@.com", "us..er@example.com", "user@example."] {
            let mut value = valid_body();
            value["email"] = json!(email);

            let errors = validate_contact(&body(value)).unwrap_err();
            assert_eq!(fields(&errors), vec!["email"], "email {:?} should be rejected", email);
            assert_eq!(errors[0].message, "Invalid email address");
        }
    }

    #[test]
    fn test_accepts_common_email_forms() {
        for email in ["a.b+tag@school.edu.in", "o'neil@example.org", "x_y@sub-domain.example.com"] {
            assert!(is_valid_email(email), "email {:?} should be accepted", email);
        }
    }

    #[test]
    fn test_missing_and_mistyped_fields() {
        let errors = validate_contact(&body(json!({
            "name": "Rahul Mehta",
            "phone": 9876543210u64,
            "subject": null,
            "message": "We would like to tour the campus."
        })))
        .unwrap_err();

        assert_eq!(
            errors,
            vec![
                FieldError { field: "email", message: "Required" },
                FieldError { field: "phone", message: "Expected string" },
                FieldError { field: "subject", message: "Required" },
            ]
        );
    }

    #[test]
    fn test_length_bounds() {
        let mut value = valid_body();
        value["name"] = json!("a".repeat(100));
        value["message"] = json!("m".repeat(2000));
        value["phone"] = json!("0123456789");
        assert!(validate_contact(&body(value)).is_ok());

        let mut value = valid_body();
        value["name"] = json!("a".repeat(101));
        value["subject"] = json!("s".repeat(201));
        value["message"] = json!("too short");
        value["phone"] = json!("1".repeat(21));

        let errors = validate_contact(&body(value)).unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError { field: "name", message: "Name too long" },
                FieldError { field: "phone", message: "Phone number too long" },
                FieldError { field: "subject", message: "Subject too long" },
                FieldError { field: "message", message: "Message must be at least 10 characters" },
            ]
        );
    }

    #[test]
    fn test_lengths_count_characters() {
        let mut value = valid_body();
        // 2 characters, 6 bytes
        value["name"] = json!("李明");
        assert!(validate_contact(&body(value)).is_ok());
    }

    #[test]
    fn test_invalid_visit_date() {
        let mut value = valid_body();
        value["preferredVisitDate"] = json!("next tuesday");

        let errors = validate_contact(&body(value)).unwrap_err();
        assert_eq!(fields(&errors), vec!["preferredVisitDate"]);
    }

    #[test]
    fn test_visit_date_must_be_padded_iso() {
        for date in ["2026-1-5", "+2026-11-14", "2026/11/14", "2026-02-30", "20261114", "2026-11-14T10:00"] {
            let mut value = valid_body();
            value["preferredVisitDate"] = json!(date);

            let errors = validate_contact(&body(value)).unwrap_err();
            assert_eq!(fields(&errors), vec!["preferredVisitDate"], "date {:?} should be rejected", date);
        }

        let mut value = valid_body();
        value["preferredVisitDate"] = json!(" 2026-01-05 ");
        assert_eq!(
            validate_contact(&body(value)).unwrap().preferred_visit_date,
            NaiveDate::from_ymd_opt(2026, 1, 5)
        );
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let mut value = valid_body();
        value["newsletter"] = json!(true);
        assert!(validate_contact(&body(value)).is_ok());
    }
}
