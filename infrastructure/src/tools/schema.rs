//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] that produces provider-neutral
//! JSON Schema for native tool-use APIs.

use scout_application::ports::tool_schema::ToolSchemaPort;
use scout_domain::tool::entities::{ToolDefinition, ToolSpec};

/// Default implementation producing provider-neutral JSON Schema.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"string"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - anything else → `"string"`
///
/// Declared choices become `enum`, declared defaults become `default`, and
/// every schema carries the tool's `safe` flag.
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                _ => "string",
            };

            let mut prop = serde_json::Map::new();
            prop.insert("type".to_string(), serde_json::json!(schema_type));
            prop.insert(
                "description".to_string(),
                serde_json::json!(param.description),
            );
            if !param.choices.is_empty() {
                prop.insert("enum".to_string(), serde_json::json!(param.choices));
            }
            if let Some(default) = &param.default {
                prop.insert("default".to_string(), default.clone());
            }
            properties.insert(param.name.clone(), serde_json::Value::Object(prop));

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "name": tool.name,
            "description": tool.description,
            "safe": tool.is_safe(),
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": required,
                "additionalProperties": false,
            }
        })
    }

    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value> {
        spec.sorted()
            .into_iter()
            .map(|t| self.tool_to_schema(t))
            .collect()
    }

    fn safe_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value> {
        let mut tools: Vec<&ToolDefinition> = spec.safe_tools().collect();
        tools.sort_by_key(|t| &t.name);
        tools.into_iter().map(|t| self.tool_to_schema(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_domain::tool::entities::{Safety, ToolParameter};

    #[test]
    fn test_tool_to_schema() {
        let converter = JsonSchemaToolConverter;
        let tool = ToolDefinition::read_only("reddit_list", "List subreddit posts")
            .with_parameter(ToolParameter::new("subreddit", "Subreddit name", true))
            .with_parameter(
                ToolParameter::new("sort", "Listing order", false)
                    .with_choices(&["hot", "new", "top", "rising"])
                    .with_default("hot"),
            )
            .with_parameter(
                ToolParameter::new("limit", "Max posts", false).with_type("integer"),
            );

        let schema = converter.tool_to_schema(&tool);

        assert_eq!(schema["name"], "reddit_list");
        assert_eq!(schema["safe"], true);
        assert_eq!(schema["input_schema"]["type"], "object");

        let sort = &schema["input_schema"]["properties"]["sort"];
        assert_eq!(sort["type"], "string");
        assert_eq!(sort["enum"].as_array().unwrap().len(), 4);
        assert_eq!(sort["default"], "hot");

        let limit = &schema["input_schema"]["properties"]["limit"];
        assert_eq!(limit["type"], "integer");
        assert!(limit.get("enum").is_none());

        let required = schema["input_schema"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "subreddit");
    }

    #[test]
    fn test_all_tools_schema_sorted() {
        let converter = JsonSchemaToolConverter;
        let spec = ToolSpec::new()
            .register(ToolDefinition::read_only("wikipedia_search", "Search"))
            .register(ToolDefinition::new("post_comment", "Post", Safety::SideEffecting))
            .register(ToolDefinition::read_only("arxiv_search", "Search"));

        let tools = converter.all_tools_schema(&spec);
        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["arxiv_search", "post_comment", "wikipedia_search"]);
        assert_eq!(tools[1]["safe"], false);
    }

    #[test]
    fn test_safe_tools_schema() {
        let converter = JsonSchemaToolConverter;
        let spec = ToolSpec::new()
            .register(ToolDefinition::read_only("wikipedia_search", "Search"))
            .register(ToolDefinition::new("post_comment", "Post", Safety::SideEffecting));

        let tools = converter.safe_tools_schema(&spec);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "wikipedia_search");
    }
}
