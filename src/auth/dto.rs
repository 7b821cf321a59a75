use serde::{Deserialize, Serialize};

/// Email and password as posted to `/register` and `/login`.
/// Either may be missing; the service decides what that means.
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    /// Both fields, if both are present and non-empty.
    pub fn present(&self) -> Option<(&str, &str)> {
        let email = self.email.as_deref().filter(|s| !s.is_empty())?;
        let password = self.password.as_deref().filter(|s| !s.is_empty())?;
        Some((email, password))
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Plain acknowledgement body, e.g. `{"msg": "Win added"}`.
#[derive(Debug, Serialize)]
pub struct MsgResponse {
    pub msg: &'static str,
}
