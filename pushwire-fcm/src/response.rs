//! Send response types and result correlation.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

use crate::{FcmError, Result};

/// Delivery outcome for one recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendResult {
    /// Id of the accepted message.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message_id: String,
    /// Canonical registration id, when the service has replaced the token.
    #[serde(default, deserialize_with = "null_as_default")]
    pub registration_id: String,
    /// Error code such as `InvalidRegistration`; empty when delivered.
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: String,
}

impl SendResult {
    /// Check whether the message was accepted for this recipient.
    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }
}

/// Parsed response of a successful (HTTP 200) send.
///
/// `results` is positionally aligned with the registration ids that were on
/// the message at send time, which the response keeps for correlation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FcmResponse {
    /// HTTP status of the send, always 200 for a parsed response.
    #[serde(skip)]
    pub status_code: u16,
    /// Top-level error, e.g. for topic sends.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub failure: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub multicast_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub canonical_ids: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<SendResult>,
    /// Message id of a topic send.
    #[serde(default)]
    pub message_id: Option<i64>,
    /// Raw `Retry-After` header, unparsed.
    #[serde(skip)]
    pub retry_after: Option<String>,
    #[serde(skip)]
    registration_ids: Vec<String>,
}

/// Decode a field that may be absent or `null` into its default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl FcmResponse {
    pub(crate) fn with_registration_ids(mut self, ids: Vec<String>) -> Self {
        self.registration_ids = ids;
        self
    }

    /// Registration ids that were on the message when it was sent.
    pub fn registration_ids(&self) -> &[String] {
        &self.registration_ids
    }

    /// Map each rejected token to its error code.
    ///
    /// Results are paired with the sent registration ids by position. The
    /// counts are trusted: trailing ids without a result are skipped and
    /// results beyond the id list are ignored.
    pub fn invalid_tokens(&self) -> HashMap<String, String> {
        self.registration_ids
            .iter()
            .zip(&self.results)
            .filter(|(_, result)| !result.error.is_empty())
            .map(|(token, result)| (token.clone(), result.error.clone()))
            .collect()
    }

    /// Like [`FcmResponse::invalid_tokens`], but fails when the number of
    /// results differs from the number of sent registration ids.
    pub fn try_invalid_tokens(&self) -> Result<HashMap<String, String>> {
        self.check_counts()?;
        Ok(self.invalid_tokens())
    }

    /// Map each token the service has replaced to its canonical id.
    ///
    /// Uses the same positional pairing as [`FcmResponse::invalid_tokens`].
    pub fn canonical_ids_map(&self) -> HashMap<String, String> {
        self.registration_ids
            .iter()
            .zip(&self.results)
            .filter(|(_, result)| !result.registration_id.is_empty())
            .map(|(token, result)| (token.clone(), result.registration_id.clone()))
            .collect()
    }

    fn check_counts(&self) -> Result<()> {
        if self.results.len() != self.registration_ids.len() {
            return Err(FcmError::ResultCountMismatch {
                expected: self.registration_ids.len(),
                actual: self.results.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(error: &str) -> SendResult {
        SendResult {
            error: error.to_string(),
            ..Default::default()
        }
    }

    fn response(ids: &[&str], results: Vec<SendResult>) -> FcmResponse {
        FcmResponse {
            results,
            ..Default::default()
        }
        .with_registration_ids(ids.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_deserialize() {
        let body = r#"{
            "multicast_id": 108,
            "success": 1,
            "failure": 1,
            "canonical_ids": 0,
            "results": [
                {"message_id": "1:08"},
                {"error": "NotRegistered"}
            ]
        }"#;

        let response: FcmResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.multicast_id, 108);
        assert_eq!(response.success, 1);
        assert_eq!(response.failure, 1);
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].message_id, "1:08");
        assert!(response.results[0].is_success());
        assert_eq!(response.results[1].error, "NotRegistered");
        assert_eq!(response.error, None);
        assert_eq!(response.message_id, None);
    }

    #[test]
    fn test_deserialize_null_fields() {
        let body = r#"{
            "multicast_id": null,
            "success": 1,
            "failure": 0,
            "canonical_ids": null,
            "results": [{"message_id": "m1", "registration_id": null, "error": null}]
        }"#;

        let response: FcmResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.multicast_id, 0);
        assert_eq!(response.canonical_ids, 0);
        assert_eq!(response.results[0].message_id, "m1");
        assert!(response.results[0].registration_id.is_empty());
        assert!(response.results[0].is_success());

        let response: FcmResponse = serde_json::from_str(r#"{"results": null}"#).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_deserialize_topic_response() {
        let response: FcmResponse = serde_json::from_str(r#"{"message_id": 5512}"#).unwrap();
        assert_eq!(response.message_id, Some(5512));
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_invalid_tokens() {
        let response = response(
            &["t1", "t2", "t3"],
            vec![
                SendResult::default(),
                failed("InvalidToken"),
                failed("InvalidToken"),
            ],
        );

        let invalid = response.invalid_tokens();
        assert_eq!(invalid.len(), 2);
        assert_eq!(invalid.get("t2").map(String::as_str), Some("InvalidToken"));
        assert_eq!(invalid.get("t3").map(String::as_str), Some("InvalidToken"));
        assert!(!invalid.contains_key("t1"));
    }

    #[test]
    fn test_invalid_tokens_fewer_results() {
        let response = response(&["t1", "t2", "t3"], vec![failed("Unavailable")]);

        let invalid = response.invalid_tokens();
        assert_eq!(invalid.len(), 1);
        assert!(invalid.contains_key("t1"));
    }

    #[test]
    fn test_invalid_tokens_more_results() {
        let response = response(&["t1"], vec![failed("A"), failed("B"), failed("C")]);

        let invalid = response.invalid_tokens();
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid["t1"], "A");
    }

    #[test]
    fn test_try_invalid_tokens() {
        let matched = response(&["t1", "t2"], vec![SendResult::default(), failed("X")]);
        assert_eq!(matched.try_invalid_tokens().unwrap().len(), 1);

        let short = response(&["t1", "t2"], vec![failed("X")]);
        match short.try_invalid_tokens() {
            Err(FcmError::ResultCountMismatch { expected, actual }) => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected ResultCountMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_canonical_ids_map() {
        let response = response(
            &["old", "current"],
            vec![
                SendResult {
                    message_id: "m1".into(),
                    registration_id: "new".into(),
                    error: String::new(),
                },
                SendResult {
                    message_id: "m2".into(),
                    ..Default::default()
                },
            ],
        );

        let canonical = response.canonical_ids_map();
        assert_eq!(canonical.len(), 1);
        assert_eq!(canonical["old"], "new");
    }
}
