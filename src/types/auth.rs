//! Auth service wire types

use crate::upload::UploadFile;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Tokens issued by `/auth/login` and `/auth/signup`
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    pub token_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Profile returned by `/auth/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub role: String,
}

impl UserData {
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

/// New account registration
#[derive(Debug)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub avatar: Option<UploadFile>,
}

impl SignupRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: SecretString::from(password.into()),
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: UploadFile) -> Self {
        self.avatar = Some(avatar);
        self
    }
}

/// Partial profile update; only the fields that are set (and non-empty) are sent.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub avatar: Option<UploadFile>,
}

impl ProfileUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    pub fn with_avatar(mut self, avatar: UploadFile) -> Self {
        self.avatar = Some(avatar);
        self
    }
}

/// FastAPI-style validation error body: `{"detail": [{"msg": "..."}]}`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// `detail[0].msg`. Any other `detail` shape, a plain string included,
    /// yields `None` so the caller's fallback message is used.
    pub(crate) fn first_message(&self) -> Option<String> {
        self.detail
            .as_ref()?
            .as_array()?
            .first()?
            .get("msg")?
            .as_str()
            .map(str::to_string)
    }
}
