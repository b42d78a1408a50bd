//! # Pushwire FCM
//!
//! Client for the Firebase Cloud Messaging legacy HTTP send API and the
//! Instance ID token lookup API.
//!
//! ## Features
//!
//! - **Message building**: single recipient, multicast lists, topic conditions
//! - **Send-time validation**: payload presence, the 1000 recipient ceiling,
//!   priority normalization and time-to-live clamping
//! - **Result correlation**: map rejected tokens back to their error codes
//! - **Token inspection**: look up token metadata and prune unknown tokens
//!
//! Nothing is retried. Every operation makes at most one request per call
//! and returns its error to the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pushwire_fcm::FcmClient;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = FcmClient::new("server-key")?;
//!
//!     client.push_multiple(["token 1", "token 2"], json!({
//!         "message": "Hello",
//!         "details": {"user": "Admin"}
//!     }));
//!
//!     let removed = client.clean_registration_ids().await;
//!     println!("removed {} unknown tokens", removed.len());
//!
//!     let response = client.send().await?;
//!     for (token, error) in response.invalid_tokens() {
//!         println!("{token}: {error}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust,no_run
//! use pushwire_fcm::{FcmClient, FcmConfig};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), pushwire_fcm::FcmError> {
//! let config = FcmConfig::builder("server-key")
//!     .timeout(Duration::from_secs(10))
//!     .build();
//! let client = FcmClient::from_config(config)?;
//!
//! // Or from FCM_API_KEY and friends
//! let client = FcmClient::from_config(FcmConfig::from_env()?)?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod message;
mod response;
mod token;

pub use client::FcmClient;
pub use config::{DEFAULT_LOOKUP_URL, DEFAULT_SEND_URL, FcmConfig, FcmConfigBuilder};
pub use error::{FcmError, Result};
pub use message::{
    HIGH_PRIORITY, MAX_RECIPIENTS, MAX_TIME_TO_LIVE, Message, NORMAL_PRIORITY,
    NotificationPayload,
};
pub use response::{FcmResponse, SendResult};
pub use token::{Relations, TokenDetails};

/// Prelude for common imports.
///
/// ```
/// use pushwire_fcm::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::FcmClient;
    pub use crate::config::{FcmConfig, FcmConfigBuilder};
    pub use crate::error::{FcmError, Result};
    pub use crate::message::{Message, NotificationPayload};
    pub use crate::response::{FcmResponse, SendResult};
    pub use crate::token::TokenDetails;
}
