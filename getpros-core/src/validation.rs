//! Field checks for the signup, login, company, trainer profile and workshop forms.
//!
//! Validators collect every failing field instead of stopping at the first one,
//! so a form can mark all of them at once.

use crate::models::{CaseStudy, Workshop};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NAME_MAX_CHARS: usize = 50;
pub const COMPANY_NAME_MAX_CHARS: usize = 100;
pub const HEADLINE_MAX_CHARS: usize = 120;
pub const BIO_MAX_CHARS: usize = 500;
pub const WORKSHOP_TITLE_MAX_CHARS: usize = 100;
pub const WORKSHOP_DESCRIPTION_MAX_CHARS: usize = 1000;
pub const CASE_STUDY_SUMMARY_MAX_CHARS: usize = 1000;
pub const PASSWORD_MIN_CHARS: usize = 8;

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").unwrap();
    // 10 digits, optionally prefixed with the +91 country code
    static ref PHONE: Regex = Regex::new(r"^(\+91[ -]?)?\d{10}$").unwrap();
    static ref PERSON_NAME: Regex = Regex::new(r"^[A-Za-z][A-Za-z .'-]*$").unwrap();
    static ref WEBSITE: Regex =
        Regex::new(r"^(https?://)?([A-Za-z0-9-]+\.)+[A-Za-z]{2,}(/\S*)?$").unwrap();
    static ref HAS_LETTER: Regex = Regex::new(r"[A-Za-z]").unwrap();
    static ref HAS_DIGIT: Regex = Regex::new(r"\d").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message recorded for `field`
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

#[derive(Debug, Default)]
struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn failed(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "is required");
        }
        self
    }

    fn max_chars(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        let count = value.chars().count();
        if count > max {
            self.fail(field, format!("must be at most {} characters ({} given)", max, count));
        }
        self
    }

    /// Pattern check, skipped for blank values and fields that already failed
    fn pattern(&mut self, field: &str, value: &str, re: &Regex, message: &str) -> &mut Self {
        let value = value.trim();
        if !value.is_empty() && !self.failed(field) && !re.is_match(value) {
            self.fail(field, message);
        }
        self
    }

    fn positive(&mut self, field: &str, value: Option<f64>) -> &mut Self {
        match value {
            None => self.fail(field, "is required"),
            Some(v) if v.is_nan() || v <= 0.0 => self.fail(field, "must be greater than zero"),
            Some(_) => {}
        }
        self
    }

    fn person_name(&mut self, field: &str, value: &str) -> &mut Self {
        self.required(field, value)
            .max_chars(field, value, NAME_MAX_CHARS)
            .pattern(field, value, &PERSON_NAME, "may only contain letters, spaces, dots, apostrophes and hyphens")
    }

    fn email(&mut self, field: &str, value: &str) -> &mut Self {
        self.required(field, value)
            .pattern(field, value, &EMAIL, "is not a valid email address")
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            log::debug!("Form validation failed on {} field(s)", self.errors.len());
            Err(ValidationErrors {
                errors: self.errors,
            })
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE.is_match(value.trim())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl Validate for SignupForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::default();
        checks
            .person_name("first_name", &self.first_name)
            .person_name("last_name", &self.last_name)
            .email("email", &self.email)
            .required("phone", &self.phone)
            .pattern("phone", &self.phone, &PHONE, "must be a 10 digit number, optionally prefixed with +91")
            .required("password", &self.password);

        if !self.password.is_empty() {
            if self.password.chars().count() < PASSWORD_MIN_CHARS {
                checks.fail(
                    "password",
                    format!("must be at least {} characters", PASSWORD_MIN_CHARS),
                );
            } else if !HAS_LETTER.is_match(&self.password) || !HAS_DIGIT.is_match(&self.password) {
                checks.fail("password", "must contain a letter and a digit");
            }
        }
        if self.password != self.confirm_password {
            checks.fail("confirm_password", "does not match the password");
        }

        checks.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::default();
        checks
            .email("email", &self.email)
            .required("password", &self.password);
        checks.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRegistrationForm {
    pub company_name: String,
    /// Optional
    pub website: String,
    pub contact_email: String,
    pub employee_count: Option<u32>,
}

impl Validate for CompanyRegistrationForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::default();
        checks
            .required("company_name", &self.company_name)
            .max_chars("company_name", &self.company_name, COMPANY_NAME_MAX_CHARS)
            .pattern("website", &self.website, &WEBSITE, "is not a valid website address")
            .email("contact_email", &self.contact_email);

        match self.employee_count {
            None => checks.fail("employee_count", "is required"),
            Some(0) => checks.fail("employee_count", "must be greater than zero"),
            Some(_) => {}
        }

        checks.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainerProfileForm {
    pub full_name: String,
    pub headline: String,
    pub bio: String,
    pub hourly_rate: Option<f64>,
    pub expertise: Vec<String>,
}

impl Validate for TrainerProfileForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::default();
        checks
            .person_name("full_name", &self.full_name)
            .required("headline", &self.headline)
            .max_chars("headline", &self.headline, HEADLINE_MAX_CHARS)
            .max_chars("bio", &self.bio, BIO_MAX_CHARS)
            .positive("hourly_rate", self.hourly_rate);

        if self.expertise.iter().all(|t| t.trim().is_empty()) {
            checks.fail("expertise", "pick at least one area of expertise");
        }

        checks.finish()
    }
}

impl Validate for Workshop {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::default();
        checks
            .required("title", &self.title)
            .max_chars("title", &self.title, WORKSHOP_TITLE_MAX_CHARS)
            .max_chars("description", &self.description, WORKSHOP_DESCRIPTION_MAX_CHARS)
            .positive("duration_hours", Some(f64::from(self.duration_hours)))
            .positive("price", Some(self.price));
        checks.finish()
    }
}

impl Validate for CaseStudy {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::default();
        checks
            .required("title", &self.title)
            .max_chars("title", &self.title, WORKSHOP_TITLE_MAX_CHARS)
            .required("client", &self.client)
            .max_chars("summary", &self.summary, CASE_STUDY_SUMMARY_MAX_CHARS);
        checks.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::Idx;
    use crate::models::DeliveryMode;

    fn signup() -> SignupForm {
        SignupForm {
            first_name: "Asha".to_string(),
            last_name: "D'Souza".to_string(),
            email: "asha@example.co.in".to_string(),
            phone: "+91 9876543210".to_string(),
            password: "s3curepass".to_string(),
            confirm_password: "s3curepass".to_string(),
        }
    }

    #[test]
    fn email_patterns() {
        assert!(is_valid_email("hr@acme.com"));
        assert!(is_valid_email(" first.last+tag@sub.domain.org "));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@@example.com"));
    }

    #[test]
    fn phone_patterns() {
        assert!(is_valid_phone("9876543210"));
        assert!(is_valid_phone("+91-9876543210"));
        assert!(!is_valid_phone("98765"));
        assert!(!is_valid_phone("+1 9876543210"));
    }

    #[test]
    fn valid_signup_passes() {
        assert_eq!(signup().validate(), Ok(()));
    }

    #[test]
    fn signup_reports_every_failing_field() {
        let form = SignupForm {
            first_name: String::new(),
            email: "broken".to_string(),
            phone: "12".to_string(),
            password: "short1".to_string(),
            confirm_password: "different".to_string(),
            ..signup()
        };
        let errors = form.validate().unwrap_err();

        assert_eq!(errors.for_field("first_name"), Some("is required"));
        assert_eq!(errors.for_field("email"), Some("is not a valid email address"));
        assert!(errors.for_field("phone").is_some());
        assert_eq!(
            errors.for_field("password"),
            Some("must be at least 8 characters")
        );
        assert_eq!(
            errors.for_field("confirm_password"),
            Some("does not match the password")
        );
        assert_eq!(errors.for_field("last_name"), None);
    }

    #[test]
    fn password_needs_letter_and_digit() {
        let form = SignupForm {
            password: "onlyletters".to_string(),
            confirm_password: "onlyletters".to_string(),
            ..signup()
        };
        assert_eq!(
            form.validate().unwrap_err().for_field("password"),
            Some("must contain a letter and a digit")
        );
    }

    #[test]
    fn name_length_is_counted_in_chars() {
        let form = SignupForm {
            first_name: "é".repeat(NAME_MAX_CHARS),
            ..signup()
        };
        // within the limit, but not ASCII letters
        let errors = form.validate().unwrap_err();
        assert!(errors.for_field("first_name").unwrap().starts_with("may only contain"));

        let form = SignupForm {
            first_name: "a".repeat(NAME_MAX_CHARS + 1),
            ..signup()
        };
        assert_eq!(
            form.validate().unwrap_err().for_field("first_name"),
            Some("must be at most 50 characters (51 given)")
        );
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.errors.len(), 2);
        assert_eq!(errors.to_string(), "email: is required; password: is required");
    }

    #[test]
    fn company_website_is_optional_but_checked() {
        let mut form = CompanyRegistrationForm {
            company_name: "Acme Learning Pvt Ltd".to_string(),
            website: String::new(),
            contact_email: "people@acme.in".to_string(),
            employee_count: Some(250),
        };
        assert!(form.validate().is_ok());

        form.website = "https://acme.in/careers".to_string();
        assert!(form.validate().is_ok());

        form.website = "not a url".to_string();
        form.employee_count = Some(0);
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.for_field("website"), Some("is not a valid website address"));
        assert_eq!(
            errors.for_field("employee_count"),
            Some("must be greater than zero")
        );
    }

    #[test]
    fn trainer_profile_limits() {
        let form = TrainerProfileForm {
            full_name: "Asha Rao".to_string(),
            headline: "Leadership coach".to_string(),
            bio: "x".repeat(BIO_MAX_CHARS + 1),
            hourly_rate: Some(0.0),
            expertise: vec![" ".to_string()],
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.for_field("bio").is_some());
        assert_eq!(
            errors.for_field("hourly_rate"),
            Some("must be greater than zero")
        );
        assert!(errors.for_field("expertise").is_some());
        assert_eq!(errors.for_field("headline"), None);
    }

    #[test]
    fn workshop_and_case_study_checks() {
        let workshop = Workshop {
            idx: Idx::from_existing("w1"),
            title: "t".repeat(WORKSHOP_TITLE_MAX_CHARS + 1),
            description: String::new(),
            duration_hours: 0.0,
            price: 1500.0,
            mode: DeliveryMode::Offline,
        };
        let errors = workshop.validate().unwrap_err();
        assert!(errors.for_field("title").is_some());
        assert!(errors.for_field("duration_hours").is_some());
        assert_eq!(errors.for_field("price"), None);

        let study = CaseStudy {
            idx: Idx::from_existing("c1"),
            title: "Retail rollout".to_string(),
            client: " ".to_string(),
            summary: String::new(),
        };
        assert_eq!(
            study.validate().unwrap_err().for_field("client"),
            Some("is required")
        );
    }
}
