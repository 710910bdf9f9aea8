use async_openai::error::OpenAIError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chatbot_shared::ErrorBody;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("model endpoint unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("model returned no choices")]
    EmptyModelResponse,
    #[error("invalid arguments for tool `{tool}`: {source}")]
    InvalidToolArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown tool `{0}`")]
    UnknownTool(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            ServiceError::EmptyModelResponse => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::InvalidToolArguments { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::UnknownTool(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }

    /// Stable machine-readable code sent in the error body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::UpstreamUnavailable(_) => "upstream_unavailable",
            ServiceError::EmptyModelResponse => "empty_model_response",
            ServiceError::InvalidToolArguments { .. } => "invalid_tool_arguments",
            ServiceError::UnknownTool(_) => "unknown_tool",
        }
    }
}

impl From<OpenAIError> for ServiceError {
    fn from(e: OpenAIError) -> Self {
        let detail = match &e {
            OpenAIError::ApiError(api_err) => format!(
                "API error: {} (Code: {:?}, Type: {:?})",
                api_err.message, api_err.code, api_err.r#type
            ),
            _ => e.to_string(),
        };
        ServiceError::UpstreamUnavailable(detail)
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!("Request failed with {}: {}", status, self);
        let body = ErrorBody {
            error: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
