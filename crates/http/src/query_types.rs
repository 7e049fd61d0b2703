//! Request/query types (Deserialize)

use serde::Deserialize;

/// Query string of a log page, kept as raw pairs.
///
/// Only the first `date` pair counts; repeated or unknown keys never reject
/// the request.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct DateQuery(Vec<(String, String)>);

impl DateQuery {
    /// `YYYY-MM-DD`; missing or malformed means today.
    pub fn date(&self) -> Option<&str> {
        self.0.iter().find(|(key, _)| key == "date").map(|(_, value)| value.as_str())
    }
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
