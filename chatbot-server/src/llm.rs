use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse, FunctionCall,
        FunctionObject,
    },
    Client,
};
use async_trait::async_trait;
use chatbot_shared::{ChatMessage, MessageRole, ToolCall, ToolDefinition};
use tracing::{error, info};

use crate::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    Other,
}

/// First choice of a chat completion, reduced to what the orchestrator reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: Option<String>,
    pub finish_reason: FinishReason,
    pub tool_calls: Vec<ToolCall>,
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<Completion, ServiceError>;
}

pub struct LlmService {
    client: Client<OpenAIConfig>,
    model: String,
}

impl LlmService {
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        info!("Initializing LLM service with model: {} ({})", model, api_base);
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        let client = Client::with_config(config);
        Self { client, model }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<CreateChatCompletionRequest, OpenAIError> {
        let messages = messages
            .iter()
            .cloned()
            .map(convert_to_openai_message)
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(messages);
        // Some compatible endpoints reject an empty tools array
        if !tools.is_empty() {
            builder.tools(tools.iter().map(convert_tool_definition).collect::<Vec<_>>());
        }
        builder.build()
    }
}

#[async_trait]
impl ModelClient for LlmService {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<Completion, ServiceError> {
        let request = self.build_request(messages, tools)?;
        info!(
            "Sending {} messages to {} ({} tools advertised)",
            messages.len(),
            self.model,
            tools.len()
        );

        let response = self.client.chat().create(request).await.map_err(|e| {
            error!("Chat completion request failed: {:?}", e);
            ServiceError::from(e)
        })?;

        let completion = completion_from_response(response)?;
        info!(
            "Model finished with {:?} ({} tool calls)",
            completion.finish_reason,
            completion.tool_calls.len()
        );
        Ok(completion)
    }
}

pub(crate) fn completion_from_response(
    response: CreateChatCompletionResponse,
) -> Result<Completion, ServiceError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(ServiceError::EmptyModelResponse)?;

    let finish_reason = match choice.finish_reason {
        Some(async_openai::types::FinishReason::Stop) => FinishReason::Stop,
        Some(async_openai::types::FinishReason::Length) => FinishReason::Length,
        Some(async_openai::types::FinishReason::ToolCalls) => FinishReason::ToolCalls,
        Some(async_openai::types::FinishReason::ContentFilter) => FinishReason::ContentFilter,
        _ => FinishReason::Other,
    };

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ToolCall {
            id: tc.id,
            name: tc.function.name,
            arguments: tc.function.arguments,
        })
        .collect();

    Ok(Completion {
        text: choice.message.content,
        finish_reason,
        tool_calls,
    })
}

fn convert_tool_definition(definition: &ToolDefinition) -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: definition.name.clone(),
            description: Some(definition.description.clone()),
            parameters: Some(definition.parameters.clone()),
            strict: Some(definition.strict),
        },
    }
}

fn convert_to_openai_message(msg: ChatMessage) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    let content = msg.content.unwrap_or_default();
    let message = match msg.role {
        MessageRole::System => ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(content)
                .build()?,
        ),
        MessageRole::User => ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()?,
        ),
        MessageRole::Assistant => {
            let mut builder = ChatCompletionRequestAssistantMessageArgs::default();

            // Only set content if it's not empty
            if !content.is_empty() {
                builder.content(content);
            }

            if let Some(tool_calls) = msg.tool_calls {
                let calls: Vec<ChatCompletionMessageToolCall> = tool_calls
                    .into_iter()
                    .map(|tc| ChatCompletionMessageToolCall {
                        id: tc.id,
                        r#type: ChatCompletionToolType::Function,
                        function: FunctionCall {
                            name: tc.name,
                            arguments: tc.arguments,
                        },
                    })
                    .collect();
                builder.tool_calls(calls);
            }

            ChatCompletionRequestMessage::Assistant(builder.build()?)
        }
        MessageRole::Tool => ChatCompletionRequestMessage::Tool(
            ChatCompletionRequestToolMessageArgs::default()
                .content(content)
                .tool_call_id(msg.tool_call_id.unwrap_or_default())
                .build()?,
        ),
    };
    Ok(message)
}
