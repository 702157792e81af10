//! Request payload validation.
//!
//! Runs before any repository call and turns a `NotePayload` into a `Note`,
//! or reports every violated rule keyed by field name.

use notes_types::{FieldErrors, Note, NotePayload};
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, Validate)]
struct NoteRules {
    #[validate(
        required(message = "id is required"),
        range(min = 1, message = "id must be a positive integer")
    )]
    id: Option<i64>,
    #[validate(
        required(message = "title is required"),
        length(max = 200, message = "title must be at most 200 characters"),
        custom = "not_blank"
    )]
    title: Option<String>,
    #[validate(
        required(message = "content is required"),
        length(max = 10000, message = "content must be at most 10000 characters")
    )]
    content: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("title must not be blank".into());
        return Err(err);
    }
    Ok(())
}

impl From<NotePayload> for NoteRules {
    fn from(payload: NotePayload) -> Self {
        Self {
            id: payload.id,
            title: payload.title,
            content: payload.content,
        }
    }
}

/// Validate the body of a create request
pub fn validate_new(payload: NotePayload) -> Result<Note, FieldErrors> {
    check(NoteRules::from(payload), FieldErrors::new())
}

/// Validate the body of a replace request addressed to `path_id`.
///
/// The body may omit its id, in which case the path id is used. A body id
/// that disagrees with the path is rejected.
pub fn validate_replacement(path_id: i64, payload: NotePayload) -> Result<Note, FieldErrors> {
    let mut extra = FieldErrors::new();
    match payload.id {
        Some(body_id) if body_id != path_id => {
            extra.insert(
                "id".to_string(),
                vec![format!(
                    "id in body ({}) does not match id in path ({})",
                    body_id, path_id
                )],
            );
        }
        _ => {}
    }

    let mut rules = NoteRules::from(payload);
    rules.id = Some(path_id);
    check(rules, extra)
}

fn check(rules: NoteRules, mut errors: FieldErrors) -> Result<Note, FieldErrors> {
    if let Err(violations) = rules.validate() {
        merge(&mut errors, &violations);
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    match (rules.id, rules.title, rules.content) {
        (Some(id), Some(title), Some(content)) => Ok(Note { id, title, content }),
        // unreachable once `required` has passed for every field
        _ => Err(errors),
    }
}

fn merge(into: &mut FieldErrors, violations: &ValidationErrors) {
    for (field, errs) in violations.field_errors() {
        let messages = into.entry(field.to_string()).or_default();
        for err in errs.iter() {
            messages.push(
                err.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid ({})", field, err.code)),
            );
        }
    }
}

/// A single-field error, used for failures outside the payload rules
/// (undecodable body, unparsable path id).
pub fn field_error(field: &str, message: impl Into<String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![message.into()]);
    errors
}
