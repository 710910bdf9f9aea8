use std::collections::HashMap;

use async_trait::async_trait;
use chatbot_shared::ToolDefinition;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

use crate::error::ServiceError;

/// A local function the model may ask us to run.
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;
    async fn call(&self, arguments: &str) -> Result<String, ServiceError>;
}

/// Decodes the model-supplied argument payload into the tool's typed input.
pub fn parse_arguments<T: DeserializeOwned>(tool: &str, arguments: &str) -> Result<T, ServiceError> {
    serde_json::from_str(arguments).map_err(|source| ServiceError::InvalidToolArguments {
        tool: tool.to_string(),
        source,
    })
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(WeatherTool));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.definition().name;
        info!("Registering tool: {}", name);
        self.tools.insert(name, tool);
    }

    /// Manifest advertised to the model, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<_> = self.tools.values().map(|tool| tool.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    pub async fn dispatch(&self, name: &str, arguments: &str) -> Result<String, ServiceError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ServiceError::UnknownTool(name.to_string()))?;
        info!("Dispatching tool {} with arguments: {}", name, arguments);
        tool.call(arguments).await
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

pub const WEATHER_TOOL_NAME: &str = "get_weather";

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    location: String,
}

/// Stub weather lookup. Always reports the same conditions.
pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: WEATHER_TOOL_NAME.to_string(),
            description: "Get the current weather for a given location".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "City and country, e.g. Paris, France"
                    }
                },
                "required": ["location"],
                "additionalProperties": false
            }),
            strict: true,
        }
    }

    async fn call(&self, arguments: &str) -> Result<String, ServiceError> {
        let args: WeatherArgs = parse_arguments(WEATHER_TOOL_NAME, arguments)?;
        Ok(format!(
            "The current weather in {} is 25°C and sunny.",
            args.location
        ))
    }
}
