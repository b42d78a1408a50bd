//! Instance ID token metadata.

use std::collections::HashMap;

use serde::Deserialize;

use crate::response::null_as_default;

/// Nested relation map: relation kind, then entry name, then attributes.
pub type Relations = HashMap<String, HashMap<String, HashMap<String, String>>>;

/// Metadata the lookup API reports for one registration token.
///
/// A non-empty `error` means the service does not recognize the token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetails {
    /// HTTP status of the lookup, whatever it was.
    #[serde(skip)]
    pub status_code: u16,
    #[serde(default, deserialize_with = "null_as_default")]
    pub application: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub app_signer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attest_status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authorized_entity: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub connection_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub connect_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: String,
    /// Relations such as topic subscriptions (`rel.topics.<name>.addDate`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub rel: Relations,
}

impl TokenDetails {
    /// Check whether the lookup reported no error for the token.
    pub fn is_valid(&self) -> bool {
        self.error.is_empty()
    }

    /// Names of the topics the token is subscribed to, sorted.
    pub fn topics(&self) -> Vec<&str> {
        let mut topics: Vec<&str> = self
            .rel
            .get("topics")
            .map(|t| t.keys().map(String::as_str).collect())
            .unwrap_or_default();
        topics.sort_unstable();
        topics
    }
}
