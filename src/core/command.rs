use crate::core::intent::WireIntent;

/// Validated user intent for one chat turn. Exactly one variant per turn;
/// anything the model produced that does not fit the schema lands in `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create { text: String },
    GetAll,
    Delete { target: String },
    Search { query: String },
    Error { reason: String },
}

impl Command {
    /// Schema validation over a loosely decoded wire object. `Delete.target`
    /// and `Search.query` are guaranteed non-empty past this point; no
    /// partially populated command ever escapes.
    pub fn validate(wire: WireIntent) -> Command {
        if wire.kind.as_deref() != Some("action") {
            let reason = wire
                .message
                .unwrap_or_else(|| "model reply was not an action".to_string());
            return Command::Error { reason };
        }

        let input = wire
            .input
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        match wire.function.as_deref() {
            Some("create") => match input {
                Some(text) => Command::Create { text },
                None => Command::Error {
                    reason: "create action without input".to_string(),
                },
            },
            Some("getAll") => Command::GetAll,
            Some("delete") => match input {
                Some(target) => Command::Delete { target },
                None => Command::Error {
                    reason: "delete action without a target".to_string(),
                },
            },
            Some("search") => match input {
                Some(query) => Command::Search { query },
                None => Command::Error {
                    reason: "search action without a query".to_string(),
                },
            },
            Some(other) => Command::Error {
                reason: format!("unknown action {other:?}"),
            },
            None => Command::Error {
                reason: "action without a function".to_string(),
            },
        }
    }
}
