use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::core::command::Command;
use crate::core::store::{StoreError, Todo, TodoStore};

/// Reply for commands the model could not map to an action.
const FALLBACK_HELP: &str =
    "Hi, I am Todo chatbot. Available actions: create, getAll, delete and search.";

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todos: Option<Vec<Todo>>,
}

/// Dispatch outcomes that are the user's problem map to 4xx; store failures
/// map to 5xx. The HTTP layer does that mapping.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Todo not found.")]
    TodoNotFound,
    #[error("Multiple todos found. Please specify by ID.")]
    AmbiguousTarget,
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ChatError {
    fn from(err: StoreError) -> Self {
        ChatError::Store(err)
    }
}

pub struct Dispatcher {
    store: Arc<dyn TodoStore>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Executes one validated command against the store and templates the
    /// reply. Response phrasing is fixed here, never model-generated.
    pub async fn dispatch(&self, command: Command) -> Result<ChatResponse, ChatError> {
        match command {
            Command::Create { text } => {
                let todo = self.store.create(&text).await?;
                let todos = self.store.get_all().await?;
                Ok(ChatResponse {
                    message: format!("Todo created! ID: {}", todo.id),
                    todos: Some(todos),
                })
            }
            Command::GetAll => {
                let todos = self.store.get_all().await?;
                if todos.is_empty() {
                    Ok(ChatResponse {
                        message: "You have no todos.".to_string(),
                        todos: Some(todos),
                    })
                } else {
                    Ok(ChatResponse {
                        message: joined_texts(&todos),
                        todos: Some(todos),
                    })
                }
            }
            Command::Search { query } => {
                let matches = self.store.search_by_text(&query).await?;
                if matches.is_empty() {
                    Ok(ChatResponse {
                        message: "No matching todos found.".to_string(),
                        todos: None,
                    })
                } else {
                    Ok(ChatResponse {
                        message: joined_texts(&matches),
                        todos: Some(matches),
                    })
                }
            }
            Command::Delete { target } => self.delete(&target).await,
            Command::Error { reason } => {
                warn!("unusable model reply: {reason}");
                Ok(ChatResponse {
                    message: FALLBACK_HELP.to_string(),
                    todos: None,
                })
            }
        }
    }

    /// Delete precedence: literal "all", then numeric id, then text search
    /// with a cardinality check. Numeric strings are never treated as search
    /// queries, and ambiguity never deletes anything.
    async fn delete(&self, target: &str) -> Result<ChatResponse, ChatError> {
        if target.eq_ignore_ascii_case("all") {
            self.store.delete_all().await?;
            return Ok(ChatResponse {
                message: "All todos deleted".to_string(),
                todos: None,
            });
        }

        if let Ok(id) = target.parse::<i64>() {
            return self.delete_one(id).await;
        }

        let matches = self.store.search_by_text(target).await?;
        match matches.as_slice() {
            [] => Err(ChatError::TodoNotFound),
            [only] => self.delete_one(only.id).await,
            _ => Err(ChatError::AmbiguousTarget),
        }
    }

    async fn delete_one(&self, id: i64) -> Result<ChatResponse, ChatError> {
        match self.store.delete_by_id(id).await {
            Ok(()) => Ok(ChatResponse {
                message: format!("Todo with ID {id} deleted"),
                todos: None,
            }),
            Err(StoreError::NotFound(_)) => Err(ChatError::TodoNotFound),
            Err(err) => Err(ChatError::Store(err)),
        }
    }
}

fn joined_texts(todos: &[Todo]) -> String {
    todos
        .iter()
        .map(|t| t.todo.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
