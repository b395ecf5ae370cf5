use std::sync::Arc;

use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use super::client::{CompletionClient, QueryError, ReqwestCompletionClient};
use super::prompt::{ChatRequest, ERROR_MESSAGE};
use crate::markdown;

type Outcome = Result<String, QueryError>;

/// What the output slot shows after a request settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayContent {
    /// A completion, kept as its markdown source and as sanitized HTML.
    Rendered { markdown: String, html: String },
    /// The fixed failure message.
    Failed { message: String },
}

impl DisplayContent {
    fn rendered(markdown: String) -> Self {
        let html = markdown::to_html(&markdown);
        DisplayContent::Rendered { markdown, html }
    }

    fn failed() -> Self {
        DisplayContent::Failed {
            message: ERROR_MESSAGE.to_string(),
        }
    }

    /// HTML for a rendered answer, the plain message for a failure.
    pub fn as_markup(&self) -> &str {
        match self {
            DisplayContent::Rendered { html, .. } => html,
            DisplayContent::Failed { message } => message,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, DisplayContent::Failed { .. })
    }
}

/// Owns the input text, the busy flag and the output slot for one view.
///
/// At most one request is in flight: [`submit`](Self::submit) refuses to
/// dispatch while busy, and input edits are ignored until the request settles.
pub struct QueryController {
    client: Arc<dyn CompletionClient>,
    input: String,
    busy: bool,
    display: Option<DisplayContent>,
    in_flight: Option<oneshot::Receiver<Outcome>>,
}

impl std::fmt::Debug for QueryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryController")
            .field("input", &self.input)
            .field("busy", &self.busy)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

impl Default for QueryController {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestCompletionClient::default()))
    }
}

impl QueryController {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            input: String::new(),
            busy: false,
            display: None,
            in_flight: None,
        }
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self::new(Arc::new(ReqwestCompletionClient::new(endpoint)))
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn display(&self) -> Option<&DisplayContent> {
        self.display.as_ref()
    }

    /// True when a send would be accepted right now.
    pub fn can_submit(&self) -> bool {
        !self.busy && !self.input.trim().is_empty()
    }

    /// Replace the input text. Ignored while busy.
    pub fn update_input(&mut self, text: impl Into<String>) -> bool {
        if self.busy {
            return false;
        }
        self.input = text.into();
        true
    }

    pub fn push_char(&mut self, c: char) -> bool {
        if self.busy {
            return false;
        }
        self.input.push(c);
        true
    }

    pub fn pop_char(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.input.pop().is_some()
    }

    pub fn clear_input(&mut self) -> bool {
        self.update_input(String::new())
    }

    /// Dispatch the current input as a question.
    ///
    /// Returns `false` without touching any state when the input is blank or
    /// a request is already in flight. Otherwise marks the controller busy,
    /// clears the output slot and spawns the request on the current Tokio
    /// runtime. The result is picked up by [`poll`](Self::poll) or
    /// [`wait`](Self::wait).
    pub fn submit(&mut self) -> bool {
        if self.busy {
            debug!("submit ignored: a request is already in flight");
            return false;
        }
        if self.input.trim().is_empty() {
            debug!("submit ignored: input is blank");
            return false;
        }

        self.busy = true;
        self.display = None;

        // Snapshot now; later edits must not change what was asked.
        let request = ChatRequest::for_question(&self.input);
        let (tx, rx) = oneshot::channel();
        self.in_flight = Some(rx);

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(err) => {
                warn!(error = %err, "no async runtime available to send the question");
                // Dropping the sender settles the request as failed on the next poll.
                drop(tx);
                return true;
            }
        };

        info!(chars = self.input.chars().count(), "sending question");
        let client = Arc::clone(&self.client);
        handle.spawn(async move {
            let outcome = client.complete(&request).await;
            // The receiver only goes away with the controller itself.
            let _ = tx.send(outcome);
        });
        true
    }

    /// Settle the in-flight request if its result has arrived.
    ///
    /// Returns `true` when this call settled a request.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = self.in_flight.as_mut() else {
            return false;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => Err(QueryError::Dropped),
        };
        self.in_flight = None;
        self.settle(outcome);
        true
    }

    /// Wait for the in-flight request and settle it.
    ///
    /// Returns `false` immediately when nothing is in flight.
    pub async fn wait(&mut self) -> bool {
        let Some(rx) = self.in_flight.take() else {
            return false;
        };
        let outcome = rx.await.unwrap_or(Err(QueryError::Dropped));
        self.settle(outcome);
        true
    }

    /// [`submit`](Self::submit) followed by [`wait`](Self::wait).
    pub async fn submit_and_wait(&mut self) -> bool {
        if !self.submit() {
            return false;
        }
        self.wait().await
    }

    fn settle(&mut self, outcome: Outcome) {
        self.display = Some(match outcome {
            Ok(markdown) => {
                info!(chars = markdown.len(), "answer received");
                DisplayContent::rendered(markdown)
            }
            Err(err) => {
                warn!(error = %err, "question failed");
                DisplayContent::failed()
            }
        });
        self.busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::prompt::PERSONA_PREFIX;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Records every request and answers from a script.
    struct ScriptedClient {
        requests: Mutex<Vec<ChatRequest>>,
        reply: fn() -> Result<String, QueryError>,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedClient {
        fn new(reply: fn() -> Result<String, QueryError>) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                reply,
                gate: None,
            })
        }

        fn gated(reply: fn() -> Result<String, QueryError>, gate: Arc<Notify>) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                reply,
                gate: Some(gate),
            })
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, request: &ChatRequest) -> Result<String, QueryError> {
            self.requests.lock().expect("lock").push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            (self.reply)()
        }
    }

    fn wealth() -> Result<String, QueryError> {
        Ok("**Wealth** is assets that work for you.".to_string())
    }

    fn server_error() -> Result<String, QueryError> {
        Err(QueryError::Status {
            status: 500,
            body: "boom".to_string(),
        })
    }

    #[tokio::test]
    async fn test_successful_answer_is_rendered() {
        let client = ScriptedClient::new(wealth);
        let mut controller = QueryController::new(client.clone());
        controller.update_input("What is wealth?");

        assert!(controller.submit_and_wait().await);

        assert!(!controller.is_busy());
        let display = controller.display().expect("display set");
        assert!(!display.is_failure());
        assert!(display
            .as_markup()
            .contains("<strong>Wealth</strong> is assets that work for you."));
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_shows_fixed_message() {
        let mut controller = QueryController::new(ScriptedClient::new(server_error));
        controller.update_input("What is wealth?");

        assert!(controller.submit_and_wait().await);

        assert!(!controller.is_busy());
        assert_eq!(
            controller.display(),
            Some(&DisplayContent::Failed {
                message: ERROR_MESSAGE.to_string()
            })
        );
        assert_eq!(controller.input(), "What is wealth?");
    }

    #[tokio::test]
    async fn test_blank_input_is_a_no_op() {
        let client = ScriptedClient::new(wealth);
        let mut controller = QueryController::new(client.clone());

        for blank in ["", "   ", "\t\n", " \u{a0} "] {
            controller.update_input(blank);
            assert!(!controller.submit());
            assert!(!controller.is_busy());
            assert!(controller.display().is_none());
            assert_eq!(controller.input(), blank);
        }
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_submit_while_busy_is_rejected() {
        let gate = Arc::new(Notify::new());
        let client = ScriptedClient::gated(wealth, gate.clone());
        let mut controller = QueryController::new(client.clone());
        controller.update_input("first");

        assert!(controller.submit());
        assert!(controller.is_busy());
        assert!(!controller.submit());
        assert!(!controller.update_input("second"));
        assert_eq!(controller.input(), "first");

        gate.notify_one();
        assert!(controller.wait().await);
        assert!(!controller.is_busy());
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_busy_set_before_dispatch_and_cleared_once() {
        let mut controller = QueryController::new(ScriptedClient::new(server_error));
        controller.update_input("why?");

        assert!(controller.submit());
        assert!(controller.is_busy());
        assert!(controller.display().is_none());

        assert!(controller.wait().await);
        assert!(!controller.is_busy());
        // Nothing left to settle.
        assert!(!controller.wait().await);
        assert!(!controller.poll());
    }

    #[tokio::test]
    async fn test_poll_settles_when_result_arrives() {
        let mut controller = QueryController::new(ScriptedClient::new(wealth));
        controller.update_input("What is wealth?");
        assert!(controller.submit());

        let mut settled = false;
        for _ in 0..100 {
            if controller.poll() {
                settled = true;
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(settled);
        assert!(!controller.is_busy());
        assert!(controller.display().is_some());
    }

    #[tokio::test]
    async fn test_prompt_uses_input_at_submit_time() {
        let gate = Arc::new(Notify::new());
        let client = ScriptedClient::gated(wealth, gate.clone());
        let mut controller = QueryController::new(client.clone());
        controller.update_input("What is wealth?");
        assert!(controller.submit());

        // Edits are refused while busy, and the request was already built.
        controller.push_char('!');
        gate.notify_one();
        controller.wait().await;

        let requests = client.requests();
        assert_eq!(
            requests[0].user_content(),
            Some(format!("{PERSONA_PREFIX}What is wealth?").as_str())
        );
    }

    #[tokio::test]
    async fn test_new_submit_clears_previous_display() {
        let gate = Arc::new(Notify::new());
        let client = ScriptedClient::gated(wealth, gate.clone());
        let mut controller = QueryController::new(client);
        controller.update_input("one");
        assert!(controller.submit());
        gate.notify_one();
        controller.wait().await;
        assert!(controller.display().is_some());

        assert!(controller.submit());
        assert!(controller.display().is_none());
        gate.notify_one();
        controller.wait().await;
        assert!(controller.display().is_some());
    }

    #[test]
    fn test_submit_without_runtime_settles_as_failure() {
        let mut controller = QueryController::new(ScriptedClient::new(wealth));
        controller.update_input("anyone there?");

        assert!(controller.submit());
        assert!(controller.is_busy());
        assert!(controller.poll());
        assert!(!controller.is_busy());
        assert!(controller.display().is_some_and(DisplayContent::is_failure));
    }

    #[test]
    fn test_editing_helpers() {
        let mut controller = QueryController::new(ScriptedClient::new(wealth));
        assert!(!controller.can_submit());
        controller.push_char('h');
        controller.push_char('i');
        assert_eq!(controller.input(), "hi");
        assert!(controller.can_submit());
        assert!(controller.pop_char());
        assert_eq!(controller.input(), "h");
        assert!(controller.clear_input());
        assert_eq!(controller.input(), "");
        assert!(!controller.pop_char());
    }
}
