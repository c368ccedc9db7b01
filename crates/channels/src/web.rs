//! Web channel adapter.
//!
//! The web form posts `{"mensaje": "..."}` and gets the reply in the same
//! HTTP response, so there is no outbound delivery half.

use serde_json::Value;

/// Parser for web form payloads.
pub struct WebMessage;

impl WebMessage {
    /// The `mensaje` field, if present and a string.
    pub fn parse(payload: &Value) -> Option<String> {
        payload.get("mensaje")?.as_str().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_mensaje() {
        let payload = json!({"mensaje": "¿Están abiertos?"});
        assert_eq!(WebMessage::parse(&payload).as_deref(), Some("¿Están abiertos?"));
    }

    #[test]
    fn missing_or_non_string_mensaje() {
        assert!(WebMessage::parse(&json!({})).is_none());
        assert!(WebMessage::parse(&json!({"message": "hola"})).is_none());
        assert!(WebMessage::parse(&json!({"mensaje": 42})).is_none());
        assert!(WebMessage::parse(&json!("mensaje")).is_none());
    }

    #[test]
    fn empty_mensaje_is_still_a_message() {
        assert_eq!(WebMessage::parse(&json!({"mensaje": ""})).as_deref(), Some(""));
    }
}
