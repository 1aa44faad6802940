//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async ToolExecutorPort is defined in the application layer (ports).

use super::entities::{ToolCall, ToolDefinition, ToolParameter};

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
///
/// Rejects missing required parameters, unknown parameters, values whose
/// JSON type does not match the declared `param_type`, and values outside a
/// parameter's declared choices.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for param in &definition.parameters {
            let value = call.arguments.get(&param.name).filter(|v| !v.is_null());
            match value {
                None if param.required => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        param.name, definition.name
                    ));
                }
                None => {}
                Some(value) => check_value(param, value, &definition.name)?,
            }
        }

        // Check that all provided arguments are valid parameters
        for arg_name in call.arguments.keys() {
            if definition.parameter(arg_name).is_none() {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                ));
            }
        }

        Ok(())
    }
}

fn check_value(param: &ToolParameter, value: &serde_json::Value, tool: &str) -> Result<(), String> {
    let type_ok = match param.param_type.as_str() {
        "string" => value.is_string(),
        "integer" => value.is_u64() || value.is_i64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        _ => true,
    };
    if !type_ok {
        return Err(format!(
            "Parameter '{}' for tool '{}' must be of type {}",
            param.name, tool, param.param_type
        ));
    }

    if !param.choices.is_empty() {
        let chosen = value.as_str().unwrap_or_default();
        if !param.choices.iter().any(|c| c == chosen) {
            return Err(format!(
                "Invalid value '{}' for parameter '{}' of tool '{}' (expected one of: {})",
                chosen,
                param.name,
                tool,
                param.choices.join(", ")
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolParameter;

    fn listing_tool() -> ToolDefinition {
        ToolDefinition::read_only("reddit_list", "List posts")
            .with_parameter(ToolParameter::new("subreddit", "Subreddit name", true))
            .with_parameter(
                ToolParameter::new("sort", "Sort order", false).with_choices(&["hot", "new", "top"]),
            )
            .with_parameter(ToolParameter::new("limit", "Max posts", false).with_type("integer"))
    }

    #[test]
    fn test_validator_missing_required() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("reddit_list");
        let result = validator.validate(&call, &listing_tool());
        assert!(result.unwrap_err().contains("Missing required parameter"));
    }

    #[test]
    fn test_validator_null_counts_as_missing() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("reddit_list").with_arg("subreddit", serde_json::Value::Null);
        assert!(validator.validate(&call, &listing_tool()).is_err());
    }

    #[test]
    fn test_validator_unknown_param() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("reddit_list")
            .with_arg("subreddit", "rust")
            .with_arg("flair", "news");
        let result = validator.validate(&call, &listing_tool());
        assert!(result.unwrap_err().contains("Unknown parameter 'flair'"));
    }

    #[test]
    fn test_validator_type_mismatch() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("reddit_list")
            .with_arg("subreddit", "rust")
            .with_arg("limit", "five");
        let result = validator.validate(&call, &listing_tool());
        assert!(result.unwrap_err().contains("must be of type integer"));

        let call = ToolCall::new("reddit_list").with_arg("subreddit", 42);
        assert!(validator.validate(&call, &listing_tool()).is_err());
    }

    #[test]
    fn test_validator_choice_outside_set() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("reddit_list")
            .with_arg("subreddit", "rust")
            .with_arg("sort", "controversial");
        let err = validator.validate(&call, &listing_tool()).unwrap_err();
        assert!(err.contains("controversial"));
        assert!(err.contains("hot, new, top"));
    }

    #[test]
    fn test_validator_valid_call() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("reddit_list")
            .with_arg("subreddit", "rust")
            .with_arg("sort", "new")
            .with_arg("limit", 5);

        assert!(validator.validate(&call, &listing_tool()).is_ok());
    }
}
