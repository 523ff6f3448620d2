//! Tool catalog adapter.
//!
//! Reshapes backend tool descriptors into the function schemas the model
//! clients declare. `properties` and `required` are copied verbatim; the
//! `type: object` wrapper is not stored and each wire encoder re-adds it.
//! Malformed schemas are passed through untouched.

use crate::domain::types::ToolDescriptor;
use serde_json::{Value, json};

/// Parameters object of a function declaration, minus the `type` key.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionParameters {
    pub properties: Value,
    pub required: Option<Value>,
}

impl FunctionParameters {
    /// Full JSON-Schema object as the model APIs expect it.
    pub fn to_object_schema(&self) -> Value {
        let mut schema = json!({
            "type": "object",
            "properties": self.properties,
        });
        if let Some(required) = &self.required {
            schema["required"] = required.clone();
        }
        schema
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: Option<FunctionParameters>,
}

impl From<&ToolDescriptor> for FunctionSchema {
    fn from(tool: &ToolDescriptor) -> Self {
        let parameters = tool
            .input_schema
            .get("properties")
            .filter(|props| !matches!(props, Value::Object(map) if map.is_empty()))
            .filter(|props| !props.is_null())
            .map(|props| FunctionParameters {
                properties: props.clone(),
                required: tool.input_schema.get("required").cloned(),
            });

        Self {
            name: tool.name.clone(),
            description: tool.description.clone().unwrap_or_default(),
            parameters,
        }
    }
}

/// Function schemas for every tool the backend listed, in listing order.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    schemas: Vec<FunctionSchema>,
}

impl ToolCatalog {
    pub fn from_descriptors(tools: &[ToolDescriptor]) -> Self {
        Self {
            schemas: tools.iter().map(FunctionSchema::from).collect(),
        }
    }

    pub fn schemas(&self) -> &[FunctionSchema] {
        &self.schemas
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|s| s.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.iter().any(|s| s.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&FunctionSchema> {
        self.schemas.iter().find(|s| s.name == name)
    }

    /// Declared parameter names of `name`, or `None` if the tool is unknown.
    pub fn parameter_names(&self, name: &str) -> Option<Vec<String>> {
        let schema = self.get(name)?;
        Some(
            schema
                .parameters
                .as_ref()
                .and_then(|p| p.properties.as_object())
                .map(|props| props.keys().cloned().collect())
                .unwrap_or_default(),
        )
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_user() -> ToolDescriptor {
        ToolDescriptor::new(
            "create-user",
            "Create a new user in the database",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "email": { "type": "string" },
                    "address": { "type": "string" },
                    "phone": { "type": "string" }
                },
                "required": ["name", "email", "address", "phone"]
            }),
        )
    }

    #[test]
    fn parameter_names_match_declared_properties_in_order() {
        let tool = create_user();
        let catalog = ToolCatalog::from_descriptors(std::slice::from_ref(&tool));

        assert_eq!(
            catalog.parameter_names("create-user"),
            Some(tool.property_names())
        );
        assert_eq!(
            catalog.parameter_names("create-user").expect("known"),
            vec!["name", "email", "address", "phone"]
        );
    }

    #[test]
    fn properties_and_required_are_copied_verbatim_without_type() {
        let tool = create_user();
        let schema = FunctionSchema::from(&tool);
        let params = schema.parameters.expect("has parameters");

        assert_eq!(params.properties, tool.input_schema["properties"]);
        assert_eq!(params.required, Some(tool.input_schema["required"].clone()));
        assert_eq!(params.to_object_schema(), tool.input_schema);
    }

    #[test]
    fn no_properties_means_no_parameters() {
        let empty = ToolDescriptor::new(
            "create-random-user",
            "Create a random user",
            json!({ "type": "object", "properties": {} }),
        );
        let bare = ToolDescriptor::new("ping", "", json!({ "type": "object" }));
        let catalog = ToolCatalog::from_descriptors(&[empty, bare]);

        assert!(catalog.schemas().iter().all(|s| s.parameters.is_none()));
        assert_eq!(catalog.parameter_names("ping"), Some(Vec::new()));
    }

    #[test]
    fn malformed_properties_pass_through() {
        let odd = ToolDescriptor::new("odd", "", json!({ "properties": ["not", "a", "map"] }));
        let schema = FunctionSchema::from(&odd);
        assert_eq!(
            schema.parameters.map(|p| p.properties),
            Some(json!(["not", "a", "map"]))
        );
    }

    #[test]
    fn keeps_listing_order_and_membership() {
        let catalog = ToolCatalog::from_descriptors(&[
            create_user(),
            ToolDescriptor::new("create-random-user", "", json!({})),
        ]);

        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["create-user", "create-random-user"]
        );
        assert!(catalog.contains("create-random-user"));
        assert!(!catalog.contains("delete-user"));
        assert_eq!(catalog.parameter_names("delete-user"), None);
    }
}
