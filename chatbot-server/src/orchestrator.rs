//! Runs one prompt through the model, with at most one tool-call round trip.
//!
//! The transcript only ever grows: each model call sees the messages so far
//! and new turns are appended after it returns.

use std::sync::Arc;

use chatbot_shared::{ChatMessage, ToolDefinition};
use tracing::{info, warn};

use crate::error::ServiceError;
use crate::llm::{FinishReason, ModelClient};
use crate::tools::ToolRegistry;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Respond only in markdown format.";
pub const FALLBACK_OUTPUT: &str = "No response generated.";

/// Outcome of one `/generate` request.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub output: String,
    pub transcript: Vec<ChatMessage>,
}

pub struct Orchestrator {
    client: Arc<dyn ModelClient>,
    tools: Arc<ToolRegistry>,
    system_prompt: String,
    tools_enabled: bool,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn ModelClient>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            client,
            tools,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            tools_enabled: true,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_tools_enabled(mut self, tools_enabled: bool) -> Self {
        self.tools_enabled = tools_enabled;
        self
    }

    pub fn tools_enabled(&self) -> bool {
        self.tools_enabled
    }

    pub async fn run(&self, prompt: &str) -> Result<Conversation, ServiceError> {
        let mut transcript = vec![
            ChatMessage::system(self.system_prompt.as_str()),
            ChatMessage::user(prompt),
        ];
        let manifest: Vec<ToolDefinition> = if self.tools_enabled {
            self.tools.definitions()
        } else {
            Vec::new()
        };

        let first = self.client.complete(&transcript, &manifest).await?;
        if !self.tools_enabled || first.finish_reason != FinishReason::ToolCalls {
            return Ok(finish(transcript, first.text));
        }

        let mut calls = first.tool_calls.into_iter();
        let call = calls.next().ok_or(ServiceError::EmptyModelResponse)?;
        let skipped = calls.count();
        if skipped > 0 {
            warn!("Model requested {} extra tool calls; only the first is executed", skipped);
        }

        info!("=== TOOL CALL DETECTED ===");
        info!("Tool: {} (ID: {})", call.name, call.id);
        let result = self.tools.dispatch(&call.name, &call.arguments).await?;

        let call_id = call.id.clone();
        transcript.push(ChatMessage::assistant_tool_calls(first.text, vec![call]));
        transcript.push(ChatMessage::tool(call_id, result));

        let second = self.client.complete(&transcript, &manifest).await?;
        if second.finish_reason == FinishReason::ToolCalls {
            warn!(
                "Model requested another tool call after the tool result; returning its text as-is"
            );
        }
        Ok(finish(transcript, second.text))
    }
}

fn finish(mut transcript: Vec<ChatMessage>, text: Option<String>) -> Conversation {
    let output = match text.filter(|t| !t.is_empty()) {
        Some(text) => {
            transcript.push(ChatMessage::assistant(text.as_str()));
            text
        }
        None => {
            warn!("Model returned no text; using fallback output");
            FALLBACK_OUTPUT.to_string()
        }
    };
    Conversation { output, transcript }
}
