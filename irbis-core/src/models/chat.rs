// irbis-core/src/models/chat.rs
use super::tools::ToolCall;
use serde::{Deserialize, Serialize};

/// A message in the conversation sequence exchanged with the model.
/// Covers system, user, assistant, and tool roles.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ChatMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Set on tool messages; references the assistant tool call being answered.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_call_id: Option<String>,
}

/// One of the choices returned by the model API.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Choice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: String,
}

/// Overall shape of the model API response.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiResponse {
    pub id: String,
    pub choices: Vec<Choice>,
}

/// Append-only conversation history. Messages can be added but never
/// mutated or removed once appended; every read goes through a shared
/// slice of the sequence so far.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// Starts a transcript with its single system message.
    pub fn new(system_prompt: &str) -> Self {
        Transcript {
            messages: vec![ChatMessage {
                role: "system".to_string(),
                content: Some(system_prompt.to_string()),
                ..Default::default()
            }],
        }
    }

    pub fn from_messages(messages: Vec<ChatMessage>) -> Self {
        Transcript { messages }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = ChatMessage>) {
        self.messages.extend(messages);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transcript_holds_one_system_message() {
        let transcript = Transcript::new("You are helpful.");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].role, "system");
        assert_eq!(
            transcript.messages()[0].content.as_deref(),
            Some("You are helpful.")
        );
    }

    #[test]
    fn push_preserves_prior_messages() {
        let mut transcript = Transcript::new("sys");
        transcript.push(ChatMessage {
            role: "user".into(),
            content: Some("first".into()),
            ..Default::default()
        });
        let before: Vec<String> = transcript
            .messages()
            .iter()
            .map(|m| format!("{}:{}", m.role, m.content.as_deref().unwrap_or("")))
            .collect();

        transcript.push(ChatMessage {
            role: "assistant".into(),
            content: Some("second".into()),
            ..Default::default()
        });

        let after: Vec<String> = transcript
            .messages()
            .iter()
            .map(|m| format!("{}:{}", m.role, m.content.as_deref().unwrap_or("")))
            .collect();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..]);
    }

    #[test]
    fn transcript_serializes_as_bare_message_array() {
        let transcript = Transcript::new("sys");
        let value = serde_json::to_value(&transcript).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["role"], "system");
    }
}
