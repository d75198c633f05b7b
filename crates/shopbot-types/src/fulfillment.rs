//! Wire format of the fulfillment webhook.
//!
//! The request is a Dialogflow-style detect-intent body. The response is
//! decoded leniently: only a missing or non-object `queryResult` makes it
//! unusable. Any other field that is `null` or has an unexpected shape reads
//! as absent, and `payload` entries stay free-form JSON.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Request body POSTed to the fulfillment endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentRequest {
    /// Fixed session/channel identifier.
    pub session: String,
    pub query_input: QueryInput,
    pub custom_payload: CustomPayload,
}

impl FulfillmentRequest {
    pub fn new(
        session: impl Into<String>,
        text: impl Into<String>,
        language_code: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            session: session.into(),
            query_input: QueryInput {
                text: TextInput {
                    text: text.into(),
                    language_code: language_code.into(),
                },
            },
            custom_payload: CustomPayload {
                platform: platform.into(),
            },
        }
    }

    /// The user's query text.
    pub fn query_text(&self) -> &str {
        &self.query_input.text.text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryInput {
    pub text: TextInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInput {
    pub text: String,
    pub language_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomPayload {
    pub platform: String,
}

/// Response body of the fulfillment endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentResponse {
    /// Absent envelope means the response is malformed.
    #[serde(default, deserialize_with = "lenient")]
    pub query_result: Option<QueryResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default, deserialize_with = "lenient")]
    pub fulfillment_text: Option<String>,
    /// Entries that are not objects are skipped.
    #[serde(default, deserialize_with = "lenient_list")]
    pub fulfillment_messages: Vec<FulfillmentMessage>,
}

/// One entry of `fulfillmentMessages`; any subset of the fields may be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentMessage {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub text: Option<TextEntry>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<QuickRepliesEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextEntry {
    /// Non-string lines read as empty, keeping their position.
    #[serde(default, deserialize_with = "text_lines")]
    pub text: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickRepliesEntry {
    /// Non-string replies are dropped.
    #[serde(default, deserialize_with = "lenient_list")]
    pub quick_replies: Vec<String>,
}

/// Decode `T`, reading `null` or a value of another shape as `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Decode an array, keeping only the elements that decode as `T`.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

fn text_lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .iter()
            .map(|item| item.as_str().unwrap_or_default().to_string())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = FulfillmentRequest::new("session-1", "مرحبا", "ar-EG", "CUSTOM_REACT_UI");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["session"], "session-1");
        assert_eq!(value["queryInput"]["text"]["text"], "مرحبا");
        assert_eq!(value["queryInput"]["text"]["languageCode"], "ar-EG");
        assert_eq!(value["customPayload"]["platform"], "CUSTOM_REACT_UI");
        assert_eq!(request.query_text(), "مرحبا");
    }

    #[test]
    fn test_response_without_envelope_parses_to_none() {
        let response: FulfillmentResponse = serde_json::from_str(r#"{"other":1}"#).unwrap();
        assert!(response.query_result.is_none());
    }

    #[test]
    fn test_response_with_messages() {
        let json = r#"{
            "queryResult": {
                "fulfillmentText": "أهلا بك",
                "fulfillmentMessages": [
                    {"text": {"text": ["first"]}},
                    {"quickReplies": {"quickReplies": ["a", "b"]}},
                    {"payload": {"productCard": {"name": "x"}}}
                ]
            }
        }"#;
        let response: FulfillmentResponse = serde_json::from_str(json).unwrap();
        let result = response.query_result.unwrap();
        assert_eq!(result.fulfillment_text.as_deref(), Some("أهلا بك"));
        assert_eq!(result.fulfillment_messages.len(), 3);
        assert_eq!(
            result.fulfillment_messages[1]
                .quick_replies
                .as_ref()
                .unwrap()
                .quick_replies,
            vec!["a", "b"]
        );
        assert!(result.fulfillment_messages[2].payload.is_some());
    }

    #[test]
    fn test_null_messages_read_as_empty() {
        let response: FulfillmentResponse = serde_json::from_str(
            r#"{"queryResult":{"fulfillmentText":"hi","fulfillmentMessages":null}}"#,
        )
        .unwrap();
        let result = response.query_result.unwrap();
        assert_eq!(result.fulfillment_text.as_deref(), Some("hi"));
        assert!(result.fulfillment_messages.is_empty());
    }

    #[test]
    fn test_null_and_mistyped_entries_are_tolerated() {
        let json = r#"{"queryResult":{"fulfillmentText":"hi","fulfillmentMessages":[
            {"quickReplies":{"quickReplies":null}},
            {"text":{"text":["a",null]}},
            {"text":"just a string"},
            "not an object",
            {"quickReplies":{"quickReplies":["x",3,"y"]}}
        ]}}"#;
        let response: FulfillmentResponse = serde_json::from_str(json).unwrap();
        let messages = response.query_result.unwrap().fulfillment_messages;

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].quick_replies.as_ref().unwrap().quick_replies, Vec::<String>::new());
        assert_eq!(messages[1].text.as_ref().unwrap().text, vec!["a", ""]);
        assert!(messages[2].text.is_none());
        assert_eq!(messages[3].quick_replies.as_ref().unwrap().quick_replies, vec!["x", "y"]);
    }

    #[test]
    fn test_non_object_envelope_is_absent() {
        let response: FulfillmentResponse =
            serde_json::from_str(r#"{"queryResult":null}"#).unwrap();
        assert!(response.query_result.is_none());

        let response: FulfillmentResponse =
            serde_json::from_str(r#"{"queryResult":"oops"}"#).unwrap();
        assert!(response.query_result.is_none());
    }
}
