//! Outbound message types and send-time validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::{FcmError, Result};

/// Longest time-to-live the service accepts, in seconds (28 days).
pub const MAX_TIME_TO_LIVE: i64 = 2_419_200;

/// Most registration ids allowed in one send.
pub const MAX_RECIPIENTS: usize = 1000;

/// High delivery priority.
pub const HIGH_PRIORITY: &str = "high";

/// Normal delivery priority.
pub const NORMAL_PRIORITY: &str = "normal";

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// Display options for the notification shown by the device.
///
/// Every field is omitted from the wire format when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body_loc_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body_loc_args: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sound: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub badge: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub click_action: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title_loc_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title_loc_args: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub android_channel_id: String,
}

impl NotificationPayload {
    /// Create a notification with a title and body.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    /// Set the localization key of the body.
    pub fn body_loc_key(mut self, key: impl Into<String>) -> Self {
        self.body_loc_key = key.into();
        self
    }

    /// Set the localization arguments of the body.
    pub fn body_loc_args(mut self, args: impl Into<String>) -> Self {
        self.body_loc_args = args.into();
        self
    }

    /// Set the icon.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Set the tag used to replace an existing notification.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the sound to play.
    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = sound.into();
        self
    }

    /// Set the badge (iOS).
    pub fn badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = badge.into();
        self
    }

    /// Set the icon color, as `#rrggbb`.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the action triggered by a tap.
    pub fn click_action(mut self, action: impl Into<String>) -> Self {
        self.click_action = action.into();
        self
    }

    /// Set the localization key of the title.
    pub fn title_loc_key(mut self, key: impl Into<String>) -> Self {
        self.title_loc_key = key.into();
        self
    }

    /// Set the localization arguments of the title.
    pub fn title_loc_args(mut self, args: impl Into<String>) -> Self {
        self.title_loc_args = args.into();
        self
    }

    /// Set the Android notification channel.
    pub fn android_channel_id(mut self, channel: impl Into<String>) -> Self {
        self.android_channel_id = channel.into();
        self
    }
}

/// A message for the legacy send endpoint.
///
/// Fields at their zero value (empty string, `0`, `false`, `None`, empty
/// list) are left out of the request body. A `Message` is not synchronized;
/// callers sharing one across tasks must guard it themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Message {
    /// Custom key/value payload. Required for send.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Single recipient: a registration token, `/topics/<name>` or a group key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub to: String,
    /// Display options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationPayload>,
    /// `normal` or `high`. Anything else becomes `high` at send time.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub priority: String,
    /// Multicast recipients, at most [`MAX_RECIPIENTS`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub registration_ids: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub mutable_content: bool,
    /// Topic expression, e.g. `'dogs' in topics || 'cats' in topics`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub condition: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub collapse_key: String,
    #[serde(skip_serializing_if = "is_false")]
    pub content_available: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub restricted_package_name: String,
    /// Validate the request on the server without delivering it.
    #[serde(skip_serializing_if = "is_false")]
    pub dry_run: bool,
    /// Seconds to keep the message while the device is offline.
    /// Clamped to [`MAX_TIME_TO_LIVE`] at send time.
    #[serde(skip_serializing_if = "is_zero")]
    pub time_to_live: i64,
}

impl Message {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the payload data.
    pub fn set_data(&mut self, data: impl Into<Value>) {
        self.data = Some(data.into());
    }

    /// Replace the payload data with any serializable value.
    pub fn try_set_data<T: Serialize + ?Sized>(&mut self, data: &T) -> Result<()> {
        let value = serde_json::to_value(data).map_err(FcmError::Encode)?;
        self.data = Some(value);
        Ok(())
    }

    /// Set the payload and the single recipient. The registration id list
    /// is left as it is.
    pub fn push_single(&mut self, to: impl Into<String>, data: impl Into<Value>) {
        self.set_data(data);
        self.to = to.into();
    }

    /// Set the payload and replace the registration id list. The single
    /// recipient is left as it is.
    pub fn push_multiple<I, S>(&mut self, ids: I, data: impl Into<Value>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_data(data);
        self.registration_ids = ids.into_iter().map(Into::into).collect();
    }

    /// Append to the registration id list. Duplicates are kept.
    pub fn append_registration_ids<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registration_ids.extend(ids.into_iter().map(Into::into));
    }

    /// Check whether payload data is present. JSON `null` counts as absent.
    pub fn has_data(&self) -> bool {
        !matches!(self.data, None | Some(Value::Null))
    }

    /// Check the message against service limits and normalize it in place.
    ///
    /// Fails on missing data or more than [`MAX_RECIPIENTS`] registration
    /// ids. Otherwise any priority other than exactly `normal` is rewritten
    /// to `high`, and a time-to-live above [`MAX_TIME_TO_LIVE`] is clamped.
    /// Negative time-to-live values pass through untouched.
    pub fn validate(&mut self) -> Result<()> {
        if !self.has_data() {
            return Err(FcmError::EmptyData);
        }

        if self.registration_ids.len() > MAX_RECIPIENTS {
            return Err(FcmError::TooManyRecipients {
                count: self.registration_ids.len(),
                limit: MAX_RECIPIENTS,
            });
        }

        if self.priority != NORMAL_PRIORITY {
            if self.priority != HIGH_PRIORITY {
                trace!(priority = %self.priority, "Normalizing priority to high");
            }
            self.priority = HIGH_PRIORITY.to_string();
        }

        if self.time_to_live > MAX_TIME_TO_LIVE {
            trace!(
                time_to_live = self.time_to_live,
                "Clamping time_to_live to maximum"
            );
            self.time_to_live = MAX_TIME_TO_LIVE;
        }

        Ok(())
    }
}
