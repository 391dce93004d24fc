//! Model configuration passed through to the completion service.

use serde::{Deserialize, Serialize};

/// Opaque-to-the-engine model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier.
    pub model: String,
    /// Reasoning effort hint (minimal, low, medium, high).
    pub reasoning_effort: String,
    /// Output verbosity hint.
    pub verbosity: String,
    /// Hard cap on generated tokens.
    pub max_output_tokens: u32,
    /// Sampling temperature, when the model accepts one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "gpt-5-mini".to_string(),
            reasoning_effort: "low".to_string(),
            verbosity: "medium".to_string(),
            max_output_tokens: 4096,
            temperature: None,
        }
    }
}

impl ModelConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the reasoning effort hint.
    pub fn with_reasoning_effort(mut self, effort: impl Into<String>) -> Self {
        self.reasoning_effort = effort.into();
        self
    }

    /// Sets the verbosity hint.
    pub fn with_verbosity(mut self, verbosity: impl Into<String>) -> Self {
        self.verbosity = verbosity.into();
        self
    }

    /// Sets the output token cap.
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = max;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ModelConfig::default();
        assert_eq!(config.model, "gpt-5-mini");
        assert_eq!(config.reasoning_effort, "low");
        assert_eq!(config.max_output_tokens, 4096);
        assert!(config.temperature.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ModelConfig::new()
            .with_model("gpt-5.1")
            .with_reasoning_effort("high")
            .with_max_output_tokens(1024)
            .with_temperature(0.4);
        assert_eq!(config.model, "gpt-5.1");
        assert_eq!(config.reasoning_effort, "high");
        assert_eq!(config.max_output_tokens, 1024);
        assert_eq!(config.temperature, Some(0.4));
    }
}
