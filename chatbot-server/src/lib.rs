pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod orchestrator;
pub mod tools;

pub use config::Config;
pub use error::ServiceError;
pub use http::router;
pub use llm::{Completion, FinishReason, LlmService, ModelClient};
pub use orchestrator::{Conversation, Orchestrator};
pub use tools::{Tool, ToolRegistry, WeatherTool};
