use serde::{Deserialize, Serialize};

/// Login flag stored under the `session` key. Not real authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Session {
    pub(crate) email: String,
    pub(crate) login_time: String,
    #[serde(default)]
    pub(crate) is_authenticated: bool,
}

impl Session {
    pub(crate) fn new(email: String) -> Self {
        Self {
            email,
            login_time: chrono::Utc::now().to_rfc3339(),
            is_authenticated: true,
        }
    }
}
