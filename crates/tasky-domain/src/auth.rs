//! Sign-in and registration payloads with their client-side rules.

use serde::{Deserialize, Serialize};
use tasky_core::{TaskyError, TaskyResult};

const MIN_PASSWORD_LEN: usize = 8;
const MIN_FULL_NAME_LEN: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub confirm_password: String,
}

impl LoginPayload {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> TaskyResult<()> {
        if !is_plausible_email(&self.email) {
            return Err(TaskyError::Validation("Invalid email address".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(TaskyError::Validation(
                "Password must be at least 8 characters long".into(),
            ));
        }
        Ok(())
    }
}

impl RegisterPayload {
    pub fn validate(&self) -> TaskyResult<()> {
        LoginPayload::new(self.email.clone(), self.password.clone()).validate()?;
        if self.full_name.chars().count() < MIN_FULL_NAME_LEN {
            return Err(TaskyError::Validation(
                "Full name must be at least 3 characters long".into(),
            ));
        }
        if self.password != self.confirm_password {
            return Err(TaskyError::Validation("Password do not match".into()));
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(full_name: &str, password: &str, confirm: &str) -> RegisterPayload {
        RegisterPayload {
            email: "ana@example.com".into(),
            password: password.into(),
            full_name: full_name.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn test_login_accepts_valid_payload() {
        assert!(LoginPayload::new("ana@example.com", "hunter22!").validate().is_ok());
    }

    #[test]
    fn test_login_rejects_bad_email() {
        for email in ["", "ana", "ana@", "@example.com", "ana@example", "a na@example.com"] {
            let err = LoginPayload::new(email, "longenough").validate().unwrap_err();
            assert_eq!(err.user_message(""), "Invalid email address", "email: {email}");
        }
    }

    #[test]
    fn test_login_rejects_short_password() {
        let err = LoginPayload::new("ana@example.com", "short").validate().unwrap_err();
        assert_eq!(
            err.user_message(""),
            "Password must be at least 8 characters long"
        );
    }

    #[test]
    fn test_register_rules() {
        assert!(register("Ana", "longenough", "longenough").validate().is_ok());
        assert_eq!(
            register("An", "longenough", "longenough")
                .validate()
                .unwrap_err()
                .user_message(""),
            "Full name must be at least 3 characters long"
        );
        assert_eq!(
            register("Ana", "longenough", "different1")
                .validate()
                .unwrap_err()
                .user_message(""),
            "Password do not match"
        );
    }
}
