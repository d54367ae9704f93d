//! Payload models for the destination mapper
//!
//! Every optional field is skipped during serialization when it could not be
//! resolved, so an emitted payload never carries a key for a missing value.
//! `Some(Value::Null)` is kept and serializes as `null`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Operation performed against a destination
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Identify,
    Track,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Identify => "identify",
            Operation::Track => "track",
        }
    }
}

// =============================================================================
// Help Scout
// =============================================================================

/// Body of a Help Scout customer update
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Always exactly one entry
    pub emails: Vec<EmailEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub websites: Option<Vec<WebsiteEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phones: Option<Vec<PhoneEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Complete postal address; never emitted partially
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub city: Value,
    pub state: Value,
    pub postal_code: Value,
    pub country: Value,
    pub lines: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebsiteEntry {
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhoneEntry {
    pub value: Value,
    pub location: String,
}

// =============================================================================
// Outbound
// =============================================================================

/// Body of an Outbound identify call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IdentifyMessagePayload {
    V1(LegacyIdentify),
    V2(CurrentIdentify),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyIdentify {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub traits: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentIdentify {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Android push tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcm: Option<Vec<Value>>,
    /// iOS push tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apns: Option<Vec<Value>>,
}

/// Body of an Outbound track call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TrackMessagePayload {
    V1(LegacyTrack),
    V2(CurrentTrack),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyTrack {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub payload: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentTrack {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contact_payload_skips_missing_keeps_null() {
        let payload = ContactUpdatePayload {
            gender: Some(Value::Null),
            age: Some(json!(0)),
            location: None,
            photo_url: None,
            first_name: None,
            last_name: None,
            emails: vec![EmailEntry { value: None }],
            organization: Some(json!(false)),
            job_title: None,
            background: None,
            address: None,
            websites: None,
            phones: None,
        };

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"gender": null, "age": 0, "emails": [{}], "organization": false})
        );
    }

    #[test]
    fn test_outbound_payload_shapes() {
        let legacy = TrackMessagePayload::V1(LegacyTrack {
            user_id: Some("u1".to_string()),
            payload: Map::new(),
            api_key: None,
            event: Some("Signed Up".to_string()),
        });
        assert_eq!(
            serde_json::to_value(&legacy).unwrap(),
            json!({"user_id": "u1", "payload": {}, "event": "Signed Up"})
        );

        let current = IdentifyMessagePayload::V2(CurrentIdentify {
            user_id: None,
            attributes: Map::new(),
            email: None,
            phone: None,
            first_name: Some("Ada".to_string()),
            last_name: None,
            gcm: Some(vec![json!("T1")]),
            apns: None,
        });
        assert_eq!(
            serde_json::to_value(&current).unwrap(),
            json!({"attributes": {}, "first_name": "Ada", "gcm": ["T1"]})
        );
    }
}
