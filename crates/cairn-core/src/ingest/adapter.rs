//! Record adapters: turn one raw source line into a normalized record.
//!
//! Adapters are tried in priority order; the first that recognizes a line
//! wins. Lines nobody recognizes become [`Record::Text`], so classification
//! never fails.

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::error::{CairnError, Result};

/// A normalized source record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// A conversational turn
    Chat { role: String, text: String },
    /// Anything else, kept verbatim
    Text(String),
}

impl Record {
    /// Normalized text, or `None` when the record carries nothing
    pub fn normalized(&self) -> Option<String> {
        match self {
            Record::Chat { role, text } => {
                let text = text.trim();
                (!text.is_empty()).then(|| format!("{}: {}", role, text))
            }
            Record::Text(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
        }
    }
}

/// Recognizes one record shape
pub trait RecordAdapter {
    fn name(&self) -> &'static str;
    fn parse(&self, line: &str) -> Option<Record>;
}

/// JSON objects carrying `role` and `content`, optionally nested under `message`.
/// `content` may be a string or an array of `{type: "text", text}` parts.
#[derive(Debug, Default)]
pub struct JsonChatAdapter;

impl JsonChatAdapter {
    fn content_text(content: &Value) -> Option<String> {
        match content {
            Value::String(s) => Some(s.clone()),
            Value::Array(parts) => {
                let texts: Vec<&str> = parts
                    .iter()
                    .filter_map(|p| match p {
                        Value::String(s) => Some(s.as_str()),
                        Value::Object(o) => match o.get("type").and_then(Value::as_str) {
                            Some("text") | None => o.get("text").and_then(Value::as_str),
                            Some(_) => None,
                        },
                        _ => None,
                    })
                    .collect();
                (!texts.is_empty()).then(|| texts.join("\n"))
            }
            _ => None,
        }
    }
}

impl RecordAdapter for JsonChatAdapter {
    fn name(&self) -> &'static str {
        "json-chat"
    }

    fn parse(&self, line: &str) -> Option<Record> {
        let trimmed = line.trim_start();
        if !trimmed.starts_with('{') {
            return None;
        }
        let value: Value = serde_json::from_str(trimmed).ok()?;
        let msg = value.get("message").filter(|m| m.is_object()).unwrap_or(&value);

        let role = msg
            .get("role")
            .or_else(|| value.get("role"))
            .or_else(|| value.get("type"))
            .and_then(Value::as_str)?;
        let text = Self::content_text(msg.get("content")?)?;

        Some(Record::Chat {
            role: role.to_lowercase(),
            text,
        })
    }
}

/// Plain-text transcripts: `user: ...`, `Assistant> ...`, `system: ...`
#[derive(Debug)]
pub struct PrefixedChatAdapter {
    pattern: Regex,
}

impl PrefixedChatAdapter {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(r"^(?i)\s*(user|assistant|system|human|ai)\s*[:>]\s?(.*)$")
            .map_err(|e| CairnError::Other(format!("invalid chat prefix pattern: {}", e)))?;
        Ok(Self { pattern })
    }
}

impl RecordAdapter for PrefixedChatAdapter {
    fn name(&self) -> &'static str {
        "prefixed-chat"
    }

    fn parse(&self, line: &str) -> Option<Record> {
        let caps = self.pattern.captures(line)?;
        let role = match caps[1].to_lowercase().as_str() {
            "human" => "user".to_string(),
            "ai" => "assistant".to_string(),
            other => other.to_string(),
        };
        Some(Record::Chat {
            role,
            text: caps[2].to_string(),
        })
    }
}

/// Prioritized adapter list with an opaque-text fallback
pub struct AdapterChain {
    adapters: Vec<Box<dyn RecordAdapter>>,
}

impl std::fmt::Debug for AdapterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.adapters.iter().map(|a| a.name()))
            .finish()
    }
}

impl Default for AdapterChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl AdapterChain {
    /// No adapters: every line is opaque text
    pub fn opaque() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// JSON chat records, then prefixed transcripts, then opaque text
    pub fn standard() -> Self {
        let mut chain = Self::opaque().with(JsonChatAdapter);
        match PrefixedChatAdapter::new() {
            Ok(adapter) => chain = chain.with(adapter),
            Err(e) => warn!(error = %e, "prefixed chat adapter disabled"),
        }
        chain
    }

    /// Append an adapter at the lowest priority so far
    pub fn with(mut self, adapter: impl RecordAdapter + 'static) -> Self {
        self.adapters.push(Box::new(adapter));
        self
    }

    pub fn classify(&self, line: &str) -> Record {
        self.adapters
            .iter()
            .find_map(|a| a.parse(line))
            .unwrap_or_else(|| Record::Text(line.to_string()))
    }

    /// Classify every line and join the non-empty normalized records
    pub fn normalize(&self, raw: &str) -> String {
        raw.lines()
            .filter_map(|line| self.classify(line).normalized())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_chat_string_content() {
        let chain = AdapterChain::standard();
        assert_eq!(
            chain.classify(r#"{"role": "User", "content": "deploy it"}"#),
            Record::Chat {
                role: "user".to_string(),
                text: "deploy it".to_string()
            }
        );
    }

    #[test]
    fn test_json_chat_nested_parts() {
        let chain = AdapterChain::standard();
        let line = r#"{"type": "assistant", "message": {"role": "assistant", "content": [{"type": "text", "text": "done"}, {"type": "tool_use", "name": "x"}]}}"#;
        assert_eq!(
            chain.classify(line),
            Record::Chat {
                role: "assistant".to_string(),
                text: "done".to_string()
            }
        );
    }

    #[test]
    fn test_json_without_content_falls_back_to_text() {
        let chain = AdapterChain::standard();
        let line = r#"{"event": "heartbeat"}"#;
        assert_eq!(chain.classify(line), Record::Text(line.to_string()));
    }

    #[test]
    fn test_prefixed_chat() {
        let chain = AdapterChain::standard();
        assert_eq!(
            chain.classify("Human: what broke?"),
            Record::Chat {
                role: "user".to_string(),
                text: "what broke?".to_string()
            }
        );
        assert_eq!(
            chain.classify("assistant> the cache"),
            Record::Chat {
                role: "assistant".to_string(),
                text: "the cache".to_string()
            }
        );
    }

    #[test]
    fn test_opaque_fallback() {
        let chain = AdapterChain::opaque();
        assert_eq!(
            chain.classify("user: hi"),
            Record::Text("user: hi".to_string())
        );
    }

    #[test]
    fn test_normalize_drops_blank_records() {
        let chain = AdapterChain::standard();
        let raw = "user: hello\n\n   \n{\"role\":\"assistant\",\"content\":\"\"}\nplain line\n";
        assert_eq!(chain.normalize(raw), "user: hello\nplain line");
    }

    #[test]
    fn test_custom_adapter_priority() {
        struct Shout;
        impl RecordAdapter for Shout {
            fn name(&self) -> &'static str {
                "shout"
            }
            fn parse(&self, line: &str) -> Option<Record> {
                line.starts_with('!')
                    .then(|| Record::Text(line.to_uppercase()))
            }
        }

        let chain = AdapterChain::opaque().with(Shout);
        assert_eq!(chain.classify("!hey"), Record::Text("!HEY".to_string()));
        assert_eq!(format!("{:?}", chain), "[\"shout\"]");
    }
}
