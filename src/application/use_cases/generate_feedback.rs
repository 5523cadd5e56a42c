use std::sync::Arc;

use tracing::{debug, error, info};

use crate::application::{report, HttpClient, ProgressSink};
use crate::domain::{
    ChatCompletionRequest, ChatCompletionResponse, DomainError, FileReference,
    CHAT_COMPLETIONS_PATH,
};

pub const SENDING_STATUS: &str = "Sending request to Chat API...";

/// Requests assignment feedback from the chat completions API.
///
/// The request body is currently fixed (see [`ChatCompletionRequest::placeholder`]):
/// the submitted file, student and assignment are logged but do not reach the
/// prompt yet.
pub struct GenerateFeedbackUseCase {
    client: Arc<dyn HttpClient>,
}

impl GenerateFeedbackUseCase {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    pub async fn execute(
        &self,
        file: &FileReference,
        student: &str,
        assignment: &str,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<String, DomainError> {
        debug!(
            "Feedback requested for student {} on assignment {} ({}, {})",
            student,
            assignment,
            file.uri(),
            file.content_type()
        );

        match self.request(progress).await {
            Ok(text) => Ok(text),
            Err(e) => {
                error!("Chat API error: {}", e);
                Err(e)
            }
        }
    }

    async fn request(&self, progress: Option<&dyn ProgressSink>) -> Result<String, DomainError> {
        let payload = serde_json::to_value(ChatCompletionRequest::placeholder())
            .map_err(|e| DomainError::internal(format!("failed to serialize request: {e}")))?;

        report(progress, SENDING_STATUS);
        info!("Making Chat API request...");
        let body = self.client.post(CHAT_COMPLETIONS_PATH, &payload).await?;
        info!("Chat API response received");

        let response: ChatCompletionResponse = serde_json::from_value(body)
            .map_err(|e| DomainError::invalid_response(format!("unexpected completion shape: {e}")))?;

        response
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| DomainError::invalid_response("completion has no message in its first choice"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    /// Records every post and replies with a fixed result.
    struct StubClient {
        reply: fn() -> Result<Value, DomainError>,
        posts: Mutex<Vec<(String, Value)>>,
    }

    impl StubClient {
        fn new(reply: fn() -> Result<Value, DomainError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                posts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpClient for StubClient {
        async fn post(&self, path: &str, payload: &Value) -> Result<Value, DomainError> {
            self.posts
                .lock()
                .unwrap()
                .push((path.to_string(), payload.clone()));
            (self.reply)()
        }
    }

    fn completion() -> Result<Value, DomainError> {
        Ok(json!({
            "id": "chatcmpl-42",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "Hi! How can I help?" },
                "finish_reason": "stop"
            }]
        }))
    }

    #[tokio::test]
    async fn test_returns_first_choice_content() {
        let client = StubClient::new(completion);
        let use_case = GenerateFeedbackUseCase::new(client.clone());

        let text = use_case
            .execute(&FileReference::new("essay.pdf"), "student-1", "hw-3", None)
            .await
            .unwrap();

        assert_eq!(text, "Hi! How can I help?");
        let posts = client.posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].0, "/chat/completions");
    }

    #[tokio::test]
    async fn test_payload_ignores_student_and_assignment() {
        let client = StubClient::new(completion);
        let use_case = GenerateFeedbackUseCase::new(client.clone());

        use_case
            .execute(&FileReference::new("a.png"), "alice", "essay-1", None)
            .await
            .unwrap();
        use_case
            .execute(&FileReference::new("b.docx"), "bob", "lab-7", None)
            .await
            .unwrap();

        let posts = client.posts.lock().unwrap();
        assert_eq!(posts[0].1, posts[1].1);

        let payload = &posts[0].1;
        assert_eq!(payload["model"], "gpt-3.5-turbo");
        assert_eq!(payload["messages"][0]["role"], "user");
        assert_eq!(payload["messages"][0]["content"], "hello");
        assert_eq!(payload["max_tokens"], 500);
        let rendered = payload.to_string();
        assert!(!rendered.contains("alice") && !rendered.contains("essay-1"));
    }

    #[tokio::test]
    async fn test_reports_progress_before_sending() {
        let client = StubClient::new(completion);
        let seen = Mutex::new(Vec::<String>::new());
        let sink = |status: &str| seen.lock().unwrap().push(status.to_string());

        GenerateFeedbackUseCase::new(client)
            .execute(
                &FileReference::new("essay.txt"),
                "s",
                "a",
                Some(&sink as &dyn ProgressSink),
            )
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![SENDING_STATUS.to_string()]);
    }

    #[tokio::test]
    async fn test_client_error_propagates_unchanged() {
        let client = StubClient::new(|| Err(DomainError::http(500, "upstream exploded")));
        let err = GenerateFeedbackUseCase::new(client.clone())
            .execute(&FileReference::new("essay.txt"), "s", "a", None)
            .await
            .unwrap_err();

        match err {
            DomainError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(client.posts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_choices_is_invalid_response() {
        let client = StubClient::new(|| Ok(json!({ "choices": [] })));
        let err = GenerateFeedbackUseCase::new(client)
            .execute(&FileReference::new("essay.txt"), "s", "a", None)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let client = StubClient::new(|| Ok(json!({ "choices": "nope" })));
        let err = GenerateFeedbackUseCase::new(client)
            .execute(&FileReference::new("essay.txt"), "s", "a", None)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidResponse(_)));
    }
}
