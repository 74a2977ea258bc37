pub mod command;
pub mod dispatcher;
pub mod intent;
pub mod interpreter;
pub mod llm;
pub mod store;
