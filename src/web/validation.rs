//! # Request Validation
//!
//! A small declarative validator. Each route chains the checks it needs;
//! failures accumulate as `{ field, message }` pairs and surface as a 400
//! with the structured list under `errors`.

use crate::web::errors::{ApiError, FieldError};

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(mut self, field: &str, message: &str) -> Self {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
        self
    }

    /// Presence check for any field type.
    pub fn require(self, field: &str, present: bool, message: &str) -> Self {
        if present {
            self
        } else {
            self.fail(field, message)
        }
    }

    /// Required non-blank string.
    pub fn require_str(self, field: &str, value: Option<&str>, message: &str) -> Self {
        match value {
            Some(s) if !s.trim().is_empty() => self,
            _ => self.fail(field, message),
        }
    }

    /// Basic email shape, checked only when the value is present.
    pub fn email(self, field: &str, value: Option<&str>, message: &str) -> Self {
        match value {
            Some(s) if is_email(s) => self,
            Some(_) => self.fail(field, message),
            None => self,
        }
    }

    /// Minimum length, checked only when the value is present.
    pub fn min_len(self, field: &str, value: Option<&str>, min: usize, message: &str) -> Self {
        match value {
            Some(s) if s.chars().count() < min => self.fail(field, message),
            _ => self,
        }
    }

    /// Strictly positive number, checked only when the value is present.
    pub fn positive(self, field: &str, value: Option<f64>, message: &str) -> Self {
        match value {
            Some(n) if n <= 0.0 => self.fail(field, message),
            _ => self,
        }
    }

    /// Inclusive integer range, checked only when the value is present.
    pub fn range(self, field: &str, value: Option<i32>, min: i32, max: i32, message: &str) -> Self {
        match value {
            Some(n) if n < min || n > max => self.fail(field, message),
            _ => self,
        }
    }

    /// Short-circuit the route with a 400 when any check failed.
    pub fn check(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passing_chain() {
        let result = Validator::new()
            .require_str("name", Some("Ayité"), "Le nom est requis.")
            .email("email", Some("ayite@famille.tg"), "Email invalide.")
            .min_len(
                "password",
                Some("secret"),
                6,
                "Le mot de passe doit avoir au moins 6 caractères.",
            )
            .check();
        assert!(result.is_ok());
    }

    #[test]
    fn test_failures_accumulate() {
        let err = Validator::new()
            .require_str("name", None, "Le nom est requis.")
            .email("email", Some("pas-un-email"), "Email invalide.")
            .min_len(
                "password",
                Some("abc"),
                6,
                "Le mot de passe doit avoir au moins 6 caractères.",
            )
            .check()
            .unwrap_err();

        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors.len(), 3);
                assert_eq!(errors[0].field, "name");
                assert_eq!(errors[1].field, "email");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_optional_checks_skip_missing_values() {
        let result = Validator::new()
            .email("email", None, "Email invalide.")
            .positive("amount", None, "Le montant doit être un nombre positif.")
            .range("month", None, 1, 12, "Le mois doit être un entier entre 1 et 12.")
            .check();
        assert!(result.is_ok());
    }

    #[test]
    fn test_numeric_checks() {
        assert!(Validator::new()
            .positive("amount", Some(0.0), "Le montant doit être un nombre positif.")
            .check()
            .is_err());
        assert!(Validator::new()
            .range("month", Some(13), 1, 12, "Le mois doit être un entier entre 1 et 12.")
            .check()
            .is_err());
        assert!(Validator::new()
            .range("month", Some(12), 1, 12, "Le mois doit être un entier entre 1 et 12.")
            .check()
            .is_ok());
    }

    #[test]
    fn test_blank_string_fails_require() {
        assert!(Validator::new()
            .require_str("title", Some("   "), "Le titre de la demande est requis.")
            .check()
            .is_err());
    }
}
