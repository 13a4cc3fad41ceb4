//! SMS numbers, messages and SMS search parameters.

use super::{ListResponse, SearchResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phone number owned by the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsNumber {
    pub id: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

pub type ListSmsNumbersResponse = ListResponse<SmsNumber>;

/// SMS received by (or sent to) one of the account's numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_phone_number_id: Option<String>,
    pub body: String,
    pub from_number: String,
    pub to_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_message_id: Option<String>,
    /// `inbound` or `outbound`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Filters for [`MailiskClient::search_sms_messages`](crate::MailiskClient::search_sms_messages).
///
/// `from_date` and `wait` are filled in by the client when left unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSmsMessagesParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Message body must include this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Sender number filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_number: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "iso_millis"
    )]
    pub from_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "iso_millis"
    )]
    pub to_date: Option<DateTime<Utc>>,
    /// Keep the request open until at least one message matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<bool>,
}

impl SearchSmsMessagesParams {
    /// Create empty filters; the client fills in the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the number of messages to skip.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Only messages whose body contains `body`.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Only messages sent from `number`.
    pub fn with_from_number(mut self, number: impl Into<String>) -> Self {
        self.from_number = Some(number.into());
        self
    }

    /// Only messages received at or after `date`.
    pub fn with_from_date(mut self, date: DateTime<Utc>) -> Self {
        self.from_date = Some(date);
        self
    }

    /// Only messages received at or before `date`.
    pub fn with_to_date(mut self, date: DateTime<Utc>) -> Self {
        self.to_date = Some(date);
        self
    }

    /// Set the long-poll flag. Only `false` disables waiting.
    pub fn with_wait(mut self, wait: bool) -> Self {
        self.wait = Some(wait);
        self
    }
}

pub type SearchSmsMessagesResponse = SearchResponse<SearchSmsMessagesParams, SmsMessage>;

/// Body of [`MailiskClient::send_virtual_sms`](crate::MailiskClient::send_virtual_sms).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendVirtualSmsParams {
    pub from_number: String,
    pub to_number: String,
    pub body: String,
}

impl SendVirtualSmsParams {
    /// Create a message from `from_number` to one of the account's numbers.
    pub fn new(
        from_number: impl Into<String>,
        to_number: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from_number: from_number.into(),
            to_number: to_number.into(),
            body: body.into(),
        }
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix, e.g. `2023-01-01T00:00:00.000Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => {
                serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<DateTime<Utc>>::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_dates_serialize_with_millis() {
        let params = SearchSmsMessagesParams::new()
            .with_from_date(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
            .with_wait(true);
        let query = serde_urlencoded::to_string(&params).unwrap();
        assert_eq!(query, "from_date=2023-01-01T00%3A00%3A00.000Z&wait=true");
    }

    #[test]
    fn test_options_echo_roundtrips_dates() {
        let json = r#"{"from_date": "2023-01-01T00:00:00.000Z", "wait": false}"#;
        let params: SearchSmsMessagesParams = serde_json::from_str(json).unwrap();
        assert_eq!(
            params.from_date,
            Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(params.to_date, None);
        assert_eq!(params.wait, Some(false));
    }

    #[test]
    fn test_deserialize_sms_message() {
        let json = r#"{
            "id": "sms-1",
            "sms_phone_number_id": "num-1",
            "body": "Your code is 123456",
            "from_number": "+18005550123",
            "to_number": "+15557654321",
            "direction": "inbound",
            "created_at": "2025-01-01T12:05:00Z"
        }"#;
        let message: SmsMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.body, "Your code is 123456");
        assert_eq!(message.direction.as_deref(), Some("inbound"));
        assert_eq!(message.provider_message_id, None);
    }
}
