use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use thiserror::Error;

use crate::macros::nutype_string;

pub static SUBMISSION_EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Peruvian mobile number with optional country code, separators removed.
pub static SUBMISSION_PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+51)?9[0-9]{8}$").unwrap());

/// Contact details of a prospect, as received from the landing page form.
///
/// Every field is optional here; presence and format are checked by
/// [`RawSubmission::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSubmission {
    pub full_name: Option<String>,
    pub role_title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub institution: Option<String>,
    pub message: Option<String>,
}

/// A validated and normalized lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub full_name: SubmissionFullName,
    pub role_title: SubmissionRoleTitle,
    pub email: SubmissionEmail,
    pub phone: SubmissionPhone,
    pub institution: SubmissionInstitution,
    pub message: SubmissionMessage,
}

/// A submission handed off to the automation platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchEvent {
    pub submission: Submission,
    pub timestamp: DateTime<Utc>,
}

nutype_string!(SubmissionFullName(sanitize(trim), validate(not_empty)));
nutype_string!(SubmissionRoleTitle(sanitize(trim), validate(not_empty)));
nutype_string!(SubmissionEmail(
    sanitize(trim, lowercase),
    validate(regex = SUBMISSION_EMAIL_REGEX),
));
nutype_string!(
    /// The phone number as typed (trimmed), separators included.
    SubmissionPhone(
        sanitize(trim),
        validate(predicate = |phone| is_peruvian_mobile(phone)),
    )
);
nutype_string!(SubmissionInstitution(sanitize(trim), validate(not_empty)));
nutype_string!(SubmissionMessage(
    sanitize(trim),
    validate(len_char_min = 10),
));

fn is_peruvian_mobile(phone: &str) -> bool {
    let digits = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>();
    SUBMISSION_PHONE_REGEX.is_match(&digits)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmissionFieldError {
    #[error("El nombre completo es requerido")]
    FullNameRequired,
    #[error("El cargo es requerido")]
    RoleTitleRequired,
    #[error("El email es requerido")]
    EmailRequired,
    #[error("El email no tiene un formato válido")]
    EmailInvalid,
    #[error("El teléfono es requerido")]
    PhoneRequired,
    #[error("El teléfono no tiene un formato válido (debe ser un número peruano)")]
    PhoneInvalid,
    #[error("La institución educativa es requerida")]
    InstitutionRequired,
    #[error("El mensaje es requerido")]
    MessageRequired,
    #[error("El mensaje debe tener al menos 10 caracteres")]
    MessageTooShort,
}

/// Field errors in form order: full name, role, email, phone, institution,
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid submission: {}", self.messages().join("; "))]
pub struct ValidationErrors(pub Vec<SubmissionFieldError>);

impl ValidationErrors {
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl RawSubmission {
    pub fn validate(self) -> Result<Submission, ValidationErrors> {
        use SubmissionFieldError::*;

        let mut errors = Vec::new();

        let full_name = check(
            self.full_name,
            SubmissionFullName::try_new,
            FullNameRequired,
            FullNameRequired,
            &mut errors,
        );
        let role_title = check(
            self.role_title,
            SubmissionRoleTitle::try_new,
            RoleTitleRequired,
            RoleTitleRequired,
            &mut errors,
        );
        let email = check(
            self.email,
            SubmissionEmail::try_new,
            EmailRequired,
            EmailInvalid,
            &mut errors,
        );
        let phone = check(
            self.phone,
            SubmissionPhone::try_new,
            PhoneRequired,
            PhoneInvalid,
            &mut errors,
        );
        let institution = check(
            self.institution,
            SubmissionInstitution::try_new,
            InstitutionRequired,
            InstitutionRequired,
            &mut errors,
        );
        let message = check(
            self.message,
            SubmissionMessage::try_new,
            MessageRequired,
            MessageTooShort,
            &mut errors,
        );

        match (full_name, role_title, email, phone, institution, message) {
            (
                Some(full_name),
                Some(role_title),
                Some(email),
                Some(phone),
                Some(institution),
                Some(message),
            ) => Ok(Submission {
                full_name,
                role_title,
                email,
                phone,
                institution,
                message,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

/// Blank values are reported as `required` without running `parse`.
fn check<T, E>(
    value: Option<String>,
    parse: impl FnOnce(String) -> Result<T, E>,
    required: SubmissionFieldError,
    invalid: SubmissionFieldError,
    errors: &mut Vec<SubmissionFieldError>,
) -> Option<T> {
    let Some(value) = value.filter(|value| !value.trim().is_empty()) else {
        errors.push(required);
        return None;
    };

    parse(value).map_err(|_| errors.push(invalid)).ok()
}
