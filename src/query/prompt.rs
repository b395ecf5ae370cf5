//! Fixed prompt text and the chat-completion wire types.

use serde::{Deserialize, Serialize};

/// Endpoint used when neither the CLI nor the caller supplies one.
pub const DEFAULT_ENDPOINT: &str =
    "https://0x1a41767613ab2e34ce3db03917e48af0ea2b9903.us.gaianet.network/v1/chat/completions";

/// Content of the system turn sent with every request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Instruction prepended to the user's question to steer the answer's voice.
pub const PERSONA_PREFIX: &str = "Respond as if you are Naval Ravikant, the iconoclastic philosopher, \
investor, and entrepreneur. Channel his deep insights on happiness, wealth, knowledge, mindfulness, \
and living a purposeful life. Draw from his essays, interviews, and tweets to provide perspective in \
his distinctively profound yet practical style. Avoid directly quoting verbatim, but capture the \
essence of his timeless wisdom with your own unique phrasing. Here's my question: ";

/// Shown in the output slot whenever a request fails for any reason.
pub const ERROR_MESSAGE: &str = "An error occurred while fetching the response.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Request body: `{"messages": [system, user]}` and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Build the two-turn request for a raw user question.
    ///
    /// The question is used verbatim; trimming only happens in validation.
    pub fn for_question(question: &str) -> Self {
        Self {
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: Role::User,
                    content: format!("{PERSONA_PREFIX}{question}"),
                },
            ],
        }
    }

    /// Content of the user turn, if present.
    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: String,
}

impl ChatResponse {
    /// Markdown text of the first choice.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_serializes_to_wire_shape() {
        let request = ChatRequest::for_question("What is wealth?");
        let value = serde_json::to_value(&request).expect("serialize");

        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(
            value["messages"][1]["content"],
            format!("{PERSONA_PREFIX}What is wealth?")
        );
        assert_eq!(value.as_object().map(|o| o.len()), Some(1));
    }

    #[test]
    fn test_question_is_not_trimmed() {
        let request = ChatRequest::for_question("  why?  ");
        assert_eq!(
            request.user_content(),
            Some(format!("{PERSONA_PREFIX}  why?  ").as_str())
        );
    }

    #[test]
    fn test_persona_prefix_ends_with_question_lead_in() {
        assert!(PERSONA_PREFIX.ends_with("Here's my question: "));
    }

    #[test]
    fn test_response_ignores_extra_fields() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "hi"}}],
            "usage": {"total_tokens": 3}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.first_content(), Some("hi"));
    }

    #[test]
    fn test_response_without_choices_is_rejected() {
        let result: Result<ChatResponse, _> = serde_json::from_str(r#"{"id": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_choices_have_no_content() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices": []}"#).expect("deserialize");
        assert!(response.first_content().is_none());
    }
}
