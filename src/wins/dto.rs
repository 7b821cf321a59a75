use serde::{Deserialize, Serialize};

/// Body of `POST /wins`.
///
/// Older clients send the description as `subject`; both names are accepted
/// and [`CreateWinRequest::description`] picks the first non-empty one.
#[derive(Debug, Default, Deserialize)]
pub struct CreateWinRequest {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

impl CreateWinRequest {
    pub fn description(&self) -> Option<&str> {
        [self.desc.as_deref(), self.subject.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
    }
}

/// One entry of `GET /wins`. `subject` mirrors `desc` for older clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinView {
    pub date: String,
    pub desc: String,
    pub subject: String,
}
