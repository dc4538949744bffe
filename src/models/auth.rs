//! Authentication request/response DTOs and input validation

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use super::User;

/// Declaration order used to surface the first failing field, matching the
/// order the fields are validated in.
const FIELD_ORDER: &[&str] = &[
    "username",
    "email",
    "password",
    "first_name",
    "last_name",
    "phone",
    "country",
];

/// Extract the first failing field's message from a validation result.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let by_field = errors.field_errors();
    for field in FIELD_ORDER {
        if let Some(list) = by_field.get(field) {
            if let Some(error) = list.first() {
                if let Some(message) = &error.message {
                    return message.to_string();
                }
                return format!("Invalid value for {}", field);
            }
        }
    }
    "Invalid input".to_string()
}

/// Registration request body
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    pub username: String,

    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,

    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
}

impl RegisterRequest {
    /// Trim whitespace and normalize username/email to lower case before
    /// validation, the same way every creation path must.
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_lowercase(),
            email: self.email.trim().to_lowercase(),
            password: self.password,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        }
    }
}

/// Login request body
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    pub fn normalized(self) -> Self {
        Self {
            email: self.email.trim().to_lowercase(),
            password: self.password,
        }
    }
}

/// Refresh request body, used when the refresh cookie is absent
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Profile update request body; every field optional
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: Option<String>,

    pub phone: Option<String>,
    pub country: Option<String>,
}

/// Request body for the administrative disabled toggle
#[derive(Debug, Deserialize)]
pub struct SetDisabledRequest {
    pub disabled: bool,
}

/// Response for POST /auth/register
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

/// Response for POST /auth/login and POST /auth/refresh
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: User,
}

/// Response for GET /auth/me
#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: User,
}

/// Response carrying only a human-readable message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for profile and admin mutations
#[derive(Debug, Serialize)]
pub struct UserMutationResponse {
    pub message: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
            first_name: "A".to_string(),
            last_name: "L".to_string(),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(valid_register().validate().is_ok());
    }

    #[test]
    fn test_short_username_message() {
        let req = RegisterRequest {
            username: "ab".to_string(),
            ..valid_register()
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(
            first_validation_message(&errors),
            "Username must be at least 3 characters long"
        );
    }

    #[test]
    fn test_first_failing_field_wins() {
        // Username and password both invalid: username is declared first.
        let req = RegisterRequest {
            username: "ab".to_string(),
            password: "short".to_string(),
            ..valid_register()
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(
            first_validation_message(&errors),
            "Username must be at least 3 characters long"
        );
    }

    #[test]
    fn test_invalid_email_message() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid_register()
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(first_validation_message(&errors), "Please enter a valid email");
    }

    #[test]
    fn test_missing_name_message() {
        let req = RegisterRequest {
            first_name: "".to_string(),
            ..valid_register()
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(first_validation_message(&errors), "First name is required");
    }

    #[test]
    fn test_normalization_lowercases_and_trims() {
        let req = RegisterRequest {
            username: "  Alice ".to_string(),
            email: " Alice@Example.COM ".to_string(),
            first_name: " A ".to_string(),
            ..valid_register()
        }
        .normalized();

        assert_eq!(req.username, "alice");
        assert_eq!(req.email, "alice@example.com");
        assert_eq!(req.first_name, "A");
    }

    #[test]
    fn test_login_requires_password() {
        let req = LoginRequest {
            email: "alice@example.com".to_string(),
            password: "".to_string(),
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(first_validation_message(&errors), "Password is required");
    }
}
