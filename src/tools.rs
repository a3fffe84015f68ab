//! # Tool catalog
//!
//! Tools are declared to the model in the request's `tools` array, each one a function with a
//! JSON-Schema-like parameter description:
//!
//! ```json
//! {
//!   "type": "function",
//!   "function": {
//!     "name": "get_weather",
//!     "description": "Get the current weather",
//!     "parameters": {
//!       "type": "object",
//!       "properties": { "location": { "type": "string" } },
//!       "required": ["location"]
//!     }
//!   }
//! }
//! ```
//!
//! [`ToolDefinition`] mirrors that shape field for field. [`tool()`] returns a [`ToolBuilder`]
//! for the common case of a flat parameter list:
//!
//! ```rust
//! use workers_ai::{tool, Parameter};
//!
//! let weather = tool("get_weather", "Get the current weather in a given location")
//!     .param("location", "string")
//!     .optional_param_with(
//!         "unit",
//!         Parameter::new("string")
//!             .with_description("The unit of temperature")
//!             .with_enum(["celsius", "fahrenheit"]),
//!     )
//!     .build();
//!
//! assert_eq!(weather.function.parameters.required, vec!["location"]);
//! ```
//!
//! Type names are normalized the same way everywhere, so `"str"`, `"int"`, `"f64"` or `"vec"`
//! are accepted and sent as their JSON Schema spelling.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A tool the model may call. `tool_type` is always `"function"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

/// Name, purpose, and parameters of a function tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub parameters: FunctionParameters,
}

/// Parameter schema of a function. `schema_type` is always `"object"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionParameters {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, Parameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl Default for FunctionParameters {
    fn default() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }
}

/// A single property in a function's parameter schema.
///
/// Also used by the model catalog, which describes model inputs with the same structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    #[serde(rename = "type", default)]
    pub param_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Value>,
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Element schema when the type is `"array"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Parameter>>,
}

impl Parameter {
    /// Create a parameter of the given type; aliases like `"int"` are normalized.
    pub fn new(type_str: &str) -> Self {
        Self {
            param_type: normalize_type(type_str).to_string(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_range(mut self, minimum: impl Into<Value>, maximum: impl Into<Value>) -> Self {
        self.minimum = Some(minimum.into());
        self.maximum = Some(maximum.into());
        self
    }

    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_items(mut self, items: Parameter) -> Self {
        self.items = Some(Box::new(items));
        self
    }
}

impl ToolDefinition {
    /// Create a function tool with an empty object schema.
    pub fn function(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters: FunctionParameters::default(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// Map a friendly type name to its JSON Schema type.
///
/// | Input | Schema type |
/// |-------|-------------|
/// | `string`, `str` | `string` |
/// | `integer`, `int`, `i32`, `i64`, `u32`, `u64` | `integer` |
/// | `number`, `float`, `f32`, `f64` | `number` |
/// | `boolean`, `bool` | `boolean` |
/// | `array`, `list`, `vec` | `array` |
/// | `object`, `dict`, `map` | `object` |
/// | anything else | `string` |
fn normalize_type(type_str: &str) -> &'static str {
    match type_str {
        "string" | "str" => "string",
        "integer" | "int" | "i32" | "i64" | "u32" | "u64" => "integer",
        "number" | "float" | "f32" | "f64" => "number",
        "boolean" | "bool" => "boolean",
        "array" | "list" | "vec" => "array",
        "object" | "dict" | "map" => "object",
        // Unknown names fall back to string rather than failing tool creation
        _ => "string",
    }
}

/// Builder for [`ToolDefinition`] with a fluent API.
///
/// Parameters added with [`param`](ToolBuilder::param) or
/// [`param_with`](ToolBuilder::param_with) are required; the `optional_*` variants leave the
/// parameter out of the `required` list. Re-adding a name replaces its schema and updates its
/// required flag.
#[derive(Debug, Clone)]
pub struct ToolBuilder {
    definition: ToolDefinition,
}

impl ToolBuilder {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            definition: ToolDefinition::function(name, description),
        }
    }

    /// Add a required parameter by type name.
    pub fn param(self, name: &str, type_str: &str) -> Self {
        self.param_with(name, Parameter::new(type_str))
    }

    /// Add an optional parameter by type name.
    pub fn optional_param(self, name: &str, type_str: &str) -> Self {
        self.optional_param_with(name, Parameter::new(type_str))
    }

    /// Add a required parameter with a full schema.
    pub fn param_with(self, name: &str, parameter: Parameter) -> Self {
        self.insert(name, parameter, true)
    }

    /// Add an optional parameter with a full schema.
    pub fn optional_param_with(self, name: &str, parameter: Parameter) -> Self {
        self.insert(name, parameter, false)
    }

    fn insert(mut self, name: &str, parameter: Parameter, required: bool) -> Self {
        let params = &mut self.definition.function.parameters;
        params.properties.insert(name.to_string(), parameter);
        params.required.retain(|existing| existing != name);
        if required {
            params.required.push(name.to_string());
        }
        self
    }

    pub fn build(self) -> ToolDefinition {
        self.definition
    }
}

/// Start building a function tool.
pub fn tool(name: impl Into<String>, description: impl Into<String>) -> ToolBuilder {
    ToolBuilder::new(name, description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_type() {
        assert_eq!(normalize_type("string"), "string");
        assert_eq!(normalize_type("i64"), "integer");
        assert_eq!(normalize_type("f32"), "number");
        assert_eq!(normalize_type("bool"), "boolean");
        assert_eq!(normalize_type("vec"), "array");
        assert_eq!(normalize_type("dict"), "object");
        assert_eq!(normalize_type("unknown"), "string");
    }

    #[test]
    fn test_tool_wire_format() {
        let weather = tool("get_weather", "Get the current weather")
            .param("location", "string")
            .build();

        let json = serde_json::to_value(&weather).unwrap();
        assert_eq!(
            json,
            json!({
                "type": "function",
                "function": {
                    "name": "get_weather",
                    "description": "Get the current weather",
                    "parameters": {
                        "type": "object",
                        "properties": {"location": {"type": "string"}},
                        "required": ["location"]
                    }
                }
            })
        );
    }

    #[test]
    fn test_optional_params_not_required() {
        let gablorken = tool("gablorken", "Calculates a gablorken.")
            .param("Value", "int")
            .optional_param("Over", "float")
            .build();

        let params = &gablorken.function.parameters;
        assert_eq!(params.required, vec!["Value"]);
        assert_eq!(params.properties["Value"].param_type, "integer");
        assert_eq!(params.properties["Over"].param_type, "number");
    }

    #[test]
    fn test_readding_param_updates_required() {
        let def = tool("t", "")
            .param("x", "string")
            .optional_param("x", "int")
            .build();
        assert!(def.function.parameters.required.is_empty());
        assert_eq!(def.function.parameters.properties["x"].param_type, "integer");
    }

    #[test]
    fn test_empty_description_and_required_omitted() {
        let json = serde_json::to_value(ToolDefinition::function("noop", "")).unwrap();
        assert!(json["function"].get("description").is_none());
        assert!(json["function"]["parameters"].get("required").is_none());
        assert_eq!(json["function"]["parameters"]["properties"], json!({}));
    }

    #[test]
    fn test_parameter_schema_fields() {
        let unit = Parameter::new("str")
            .with_description("The unit of temperature")
            .with_enum(["celsius", "fahrenheit"])
            .with_default("celsius");
        let json = serde_json::to_value(&unit).unwrap();
        assert_eq!(
            json,
            json!({
                "type": "string",
                "description": "The unit of temperature",
                "default": "celsius",
                "enum": ["celsius", "fahrenheit"]
            })
        );

        let scores = Parameter::new("list").with_items(Parameter::new("int").with_range(0, 100));
        let json = serde_json::to_value(&scores).unwrap();
        assert_eq!(json["items"], json!({"type": "integer", "minimum": 0, "maximum": 100}));
    }

    #[test]
    fn test_tool_definition_deserializes() {
        let def: ToolDefinition = serde_json::from_value(json!({
            "type": "function",
            "function": {
                "name": "get_weather",
                "parameters": {"type": "object", "properties": {"location": {"type": "string"}}}
            }
        }))
        .unwrap();
        assert_eq!(def.name(), "get_weather");
        assert!(def.function.description.is_empty());
        assert!(def.function.parameters.required.is_empty());
    }
}
