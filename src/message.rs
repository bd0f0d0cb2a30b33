// src/message.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::services::providers::Usage;

#[derive(Debug, Default)]
pub struct ChatRequest {
    // Kept untyped so a wrong type is reported separately from a missing field.
    pub message: Option<Value>,
}

// Only a JSON object is a request body; the derived visitor would also take `["hi"]`.
impl<'de> Deserialize<'de> for ChatRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut body = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self { message: body.remove("message") })
    }
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: Some(Value::String(message.into())) }
    }

    /// Returns the trimmed message text.
    pub fn validated_message(&self) -> Result<&str, AppError> {
        match &self.message {
            None | Some(Value::Null) => Err(AppError::MissingInput),
            Some(Value::String(text)) if text.trim().is_empty() => Err(AppError::MissingInput),
            Some(Value::String(text)) => Ok(text.trim()),
            Some(_) => Err(AppError::InvalidInputType),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub usage: Option<Usage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> ChatRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn missing_null_and_blank_are_missing() {
        for body in [json!({}), json!({"message": null}), json!({"message": "  \n"})] {
            assert!(matches!(parse(body).validated_message(), Err(AppError::MissingInput)));
        }
    }

    #[test]
    fn non_strings_are_invalid_type() {
        for body in [json!({"message": 42}), json!({"message": ["hi"]}), json!({"message": {"text": "hi"}}), json!({"message": true})] {
            assert!(matches!(parse(body).validated_message(), Err(AppError::InvalidInputType)));
        }
    }

    #[test]
    fn only_objects_are_requests() {
        for body in [json!(["hi"]), json!("hi"), json!(null)] {
            assert!(serde_json::from_value::<ChatRequest>(body).is_err());
        }
    }

    #[test]
    fn text_is_trimmed() {
        assert_eq!(ChatRequest::new("  hi there ").validated_message().unwrap(), "hi there");
    }

    #[test]
    fn usage_is_omitted_when_absent() {
        let reply = ChatReply { reply: "Hello!".into(), usage: None };
        assert_eq!(serde_json::to_value(&reply).unwrap(), json!({"reply": "Hello!"}));

        let reply = ChatReply {
            reply: "Hello!".into(),
            usage: Some(Usage { prompt_tokens: 3, completion_tokens: 2, total_tokens: 5 }),
        };
        assert_eq!(
            serde_json::to_value(&reply).unwrap()["usage"],
            json!({"promptTokens": 3, "completionTokens": 2, "totalTokens": 5})
        );
    }
}
