//! FCM client: send path and token lookup path.

use std::fmt;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::{DEFAULT_LOOKUP_URL, FcmConfig};
use crate::{FcmError, FcmResponse, Message, Result, TokenDetails};

/// Client for the legacy send endpoint and the Instance ID lookup endpoint.
///
/// The client owns one [`Message`] that builder calls mutate in place and
/// [`FcmClient::send`] delivers. Sending does not reset it. Every operation
/// issues at most one request per call and never retries.
pub struct FcmClient {
    api_key: String,
    message: Message,
    http: reqwest::Client,
    send_url: String,
    lookup_url: String,
}

impl FcmClient {
    /// Create a client with default endpoints and transport.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(FcmConfig::new(api_key))
    }

    /// Create a client from a configuration, building its transport.
    pub fn from_config(config: FcmConfig) -> Result<Self> {
        let http = config.build_http_client()?;

        Ok(Self {
            api_key: config.api_key,
            message: Message::new(),
            http,
            send_url: config.send_url,
            lookup_url: config.lookup_url,
        })
    }

    /// Create a client on top of an existing transport.
    pub fn with_http_client(api_key: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            api_key: api_key.into(),
            message: Message::new(),
            http,
            send_url: crate::DEFAULT_SEND_URL.to_string(),
            lookup_url: DEFAULT_LOOKUP_URL.to_string(),
        }
    }

    /// Replace the transport.
    pub fn set_http_client(&mut self, http: reqwest::Client) {
        self.http = http;
    }

    /// Get the transport.
    pub fn http_client(&self) -> &reqwest::Client {
        &self.http
    }

    /// Get the send endpoint.
    pub fn send_url(&self) -> &str {
        &self.send_url
    }

    /// Set the send endpoint.
    pub fn set_send_url(&mut self, url: impl Into<String>) {
        self.send_url = url.into();
    }

    /// Get the token lookup endpoint.
    pub fn lookup_url(&self) -> &str {
        &self.lookup_url
    }

    /// Set the token lookup endpoint. Any value other than
    /// [`DEFAULT_LOOKUP_URL`] receives the token as a `token` query parameter.
    pub fn set_lookup_url(&mut self, url: impl Into<String>) {
        self.lookup_url = url.into();
    }

    /// Get the message.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Get the message for direct field edits.
    pub fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }

    /// Replace the payload data.
    pub fn set_data(&mut self, data: impl Into<Value>) {
        self.message.set_data(data);
    }

    /// Set the payload and the single recipient.
    pub fn push_single(&mut self, to: impl Into<String>, data: impl Into<Value>) {
        self.message.push_single(to, data);
    }

    /// Set the payload and replace the registration id list.
    pub fn push_multiple<I, S>(&mut self, ids: I, data: impl Into<Value>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.message.push_multiple(ids, data);
    }

    /// Append to the registration id list.
    pub fn append_registration_ids<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.message.append_registration_ids(ids);
    }

    /// Validate and send the message.
    ///
    /// Validation normalizes priority and time-to-live on the client's
    /// message. Any status other than 200 is an error, whatever the body.
    /// The returned response keeps the registration ids that were sent.
    pub async fn send(&mut self) -> Result<FcmResponse> {
        self.message.validate()?;

        let body = serde_json::to_vec(&self.message).map_err(FcmError::Encode)?;
        let url = Url::parse(&self.send_url)?;

        debug!(
            url = %url,
            recipients = self.message.registration_ids.len(),
            single = !self.message.to.is_empty(),
            "Sending FCM message"
        );

        let response = self.execute(Method::POST, url, Some(body)).await?;
        let parsed = parse_send_response(response).await?;

        debug!(
            success = parsed.success,
            failure = parsed.failure,
            "FCM message sent"
        );

        Ok(parsed.with_registration_ids(self.message.registration_ids.clone()))
    }

    /// Look up the metadata of a registration token.
    ///
    /// The body is decoded whatever the status; a 404 with an `error` body
    /// is a normal result, not a failure.
    pub async fn token_details(&self, token: &str) -> Result<TokenDetails> {
        let url = self.token_url(token)?;
        debug!(url = %url.path(), "Looking up token details");

        let response = self.execute(Method::GET, url, None).await?;
        parse_token_details(response).await
    }

    /// Drop registration ids the lookup API does not recognize.
    ///
    /// Tokens are looked up one at a time. A token stays only if its lookup
    /// succeeded and reported no error; kept tokens retain their order.
    /// Returns the removed tokens.
    pub async fn clean_registration_ids(&mut self) -> Vec<String> {
        let ids = self.message.registration_ids.clone();
        let mut valid = Vec::with_capacity(ids.len());
        let mut invalid = Vec::new();

        for (index, token) in ids.into_iter().enumerate() {
            match self.token_details(&token).await {
                Ok(details) if details.is_valid() => valid.push(token),
                Ok(details) => {
                    debug!(index, error = %details.error, "Dropping rejected token");
                    invalid.push(token);
                }
                Err(e) => {
                    debug!(index, error = %e, "Dropping token after failed lookup");
                    invalid.push(token);
                }
            }
        }

        debug!(
            kept = valid.len(),
            removed = invalid.len(),
            "Cleaned registration ids"
        );

        self.message.registration_ids = valid;
        invalid
    }

    fn token_url(&self, token: &str) -> Result<Url> {
        if self.lookup_url == DEFAULT_LOOKUP_URL {
            let mut url = Url::parse(&self.lookup_url.replace("{token}", ""))?;
            url.path_segments_mut()
                .map_err(|_| FcmError::Config("lookup url cannot be a base".to_string()))?
                .pop_if_empty()
                .push(token);
            return Ok(url);
        }

        let mut url = Url::parse(&self.lookup_url)?;
        url.query_pairs_mut().append_pair("token", token);
        Ok(url)
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response> {
        let mut request = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, format!("key={}", self.api_key))
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            request = request.body(body);
        }

        Ok(request.send().await?)
    }
}

impl fmt::Debug for FcmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FcmClient")
            .field("api_key", &"<redacted>")
            .field("message", &self.message)
            .field("send_url", &self.send_url)
            .field("lookup_url", &self.lookup_url)
            .finish()
    }
}

async fn parse_send_response(response: reqwest::Response) -> Result<FcmResponse> {
    let status = response.status();
    if status != StatusCode::OK {
        return Err(FcmError::UnexpectedStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response.bytes().await?;
    let mut parsed: FcmResponse = serde_json::from_slice(&body).map_err(FcmError::Decode)?;
    parsed.status_code = status.as_u16();
    parsed.retry_after = retry_after;

    Ok(parsed)
}

async fn parse_token_details(response: reqwest::Response) -> Result<TokenDetails> {
    let status = response.status();
    let body = response.bytes().await?;

    let mut details: TokenDetails = serde_json::from_slice(&body).map_err(FcmError::Decode)?;
    details.status_code = status.as_u16();

    Ok(details)
}
