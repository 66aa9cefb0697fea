//! The backend's response envelope.
//!
//! Every endpoint answers with `{status, response, message, version}`. List
//! endpoints put a page object under `response`, whose `content` holds the
//! records. A missing or oddly shaped envelope is read as "no records".

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::types::UserCard;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub response: Value,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Items under `response.content`, or an empty vector if any level is
/// absent, null, or not the expected shape.
pub fn unwrap_content_or_empty(envelope: &Value) -> Vec<Value> {
    envelope
        .get("response")
        .and_then(|response| response.get("content"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Decode the envelope's records as `UserCard`s.
pub(crate) fn decode_cards(envelope: &Value) -> Result<Vec<UserCard>, ApiError> {
    unwrap_content_or_empty(envelope)
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|e| ApiError::DeserializationError(e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_is_extracted() {
        let body = json!({"response": {"content": [{"id": "u3"}], "number": 0}});
        assert_eq!(unwrap_content_or_empty(&body), vec![json!({"id": "u3"})]);
    }

    #[test]
    fn missing_levels_yield_empty() {
        for body in [
            Value::Null,
            json!({}),
            json!({"response": null}),
            json!({"response": {}}),
            json!({"response": {"content": null}}),
            json!({"response": "No SocialUsers available."}),
            json!({"response": {"content": {"id": "u3"}}}),
            json!([1, 2, 3]),
            json!("plain text"),
        ] {
            assert!(unwrap_content_or_empty(&body).is_empty(), "{body}");
        }
    }

    #[test]
    fn cards_decode_from_content() {
        let body = json!({"response": {"content": [{"id": "u3", "userName": "ana"}, {"id": "u4"}]}});
        let cards = decode_cards(&body).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].user_name.as_deref(), Some("ana"));
        assert_eq!(cards[1].id, "u4");
    }

    #[test]
    fn non_object_item_is_a_decode_error() {
        let body = json!({"response": {"content": ["u3"]}});
        assert!(matches!(decode_cards(&body), Err(ApiError::DeserializationError(_))));
    }

    #[test]
    fn envelope_parses_mutation_reply() {
        let env: ResponseEnvelope = serde_json::from_str(
            r#"{"status":"OK","response":"The user was followed successfully.","message":"Successful","version":"v0.0.1"}"#,
        )
        .unwrap();
        assert_eq!(env.status.as_deref(), Some("OK"));
        assert_eq!(env.response, json!("The user was followed successfully."));
    }
}
