use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::command::Command;
use crate::core::intent;
use crate::core::llm::LlmProvider;

/// Fixed instruction preamble sent ahead of every user message. One example
/// output keeps the model anchored to the wire shape.
const SYSTEM_PROMPT: &str = "\
You are a Todo List Assistant. Follow these rules strictly:
1. Respond ONLY in valid JSON format.
2. Available actions: create, getAll, delete, search.
3. Example response: {\"type\":\"action\",\"function\":\"create\",\"input\":\"Buy milk\"}";

pub struct Interpreter {
    llm: Arc<dyn LlmProvider>,
    model_id: String,
}

impl Interpreter {
    pub fn new(llm: Arc<dyn LlmProvider>, model_id: String) -> Self {
        Self { llm, model_id }
    }

    /// Maps one chat message to a validated `Command` with exactly one
    /// completion call. A malformed completion becomes `Command::Error`
    /// rather than a retried call, so each turn costs at most one request.
    /// Only a failure of the call itself returns `Err`.
    pub async fn interpret(&self, user_message: &str) -> Result<Command> {
        let prompt = format!("{SYSTEM_PROMPT}\nUser: {user_message}");
        let raw = self
            .llm
            .generate(&self.model_id, &prompt)
            .await
            .context("completion call failed")?;
        debug!("raw completion: {raw}");

        let command = match intent::parse(&raw) {
            Ok(wire) => Command::validate(wire),
            Err(failure) => Command::Error {
                reason: failure.to_string(),
            },
        };
        info!("interpreted command: {:?}", command);
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeProvider {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for FakeProvider {
        async fn generate(&self, _model_id: &str, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(anyhow!("provider unreachable")),
            }
        }
    }

    #[tokio::test]
    async fn prompt_is_preamble_plus_user_message() {
        let provider = Arc::new(FakeProvider::replying(
            r#"{"type":"action","function":"getAll"}"#,
        ));
        let interpreter = Interpreter::new(provider.clone(), "test-model".to_string());

        let command = interpreter.interpret("show my todos").await.unwrap();
        assert_eq!(command, Command::GetAll);

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1, "exactly one completion call per turn");
        assert!(prompts[0].starts_with("You are a Todo List Assistant."));
        assert!(prompts[0].ends_with("User: show my todos"));
    }

    #[tokio::test]
    async fn malformed_completion_becomes_error_command_without_retry() {
        let provider = Arc::new(FakeProvider::replying("sorry, no JSON today"));
        let interpreter = Interpreter::new(provider.clone(), "test-model".to_string());

        let command = interpreter.interpret("anything").await.unwrap();
        assert!(matches!(command, Command::Error { .. }));
        assert_eq!(provider.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn provider_failure_propagates_as_err() {
        let provider = Arc::new(FakeProvider::failing());
        let interpreter = Interpreter::new(provider, "test-model".to_string());
        assert!(interpreter.interpret("anything").await.is_err());
    }

    #[tokio::test]
    async fn prose_wrapped_completion_still_interprets() {
        let provider = Arc::new(FakeProvider::replying(
            "Here you go:\n```json\n{\"type\":\"action\",\"function\":\"delete\",\"input\":\"7\"}\n```",
        ));
        let interpreter = Interpreter::new(provider, "test-model".to_string());
        assert_eq!(
            interpreter.interpret("remove number seven").await.unwrap(),
            Command::Delete {
                target: "7".to_string()
            }
        );
    }
}
