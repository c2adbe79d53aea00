//! Minimal JSON-schema builder for tool parameters

use serde_json::{json, Map, Value};

/// Schema of a single property
#[derive(Debug, Clone)]
pub struct PropertySchema {
    description: String,
    enum_values: Option<Vec<String>>,
}

impl PropertySchema {
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            enum_values: None,
        }
    }

    pub fn enum_type(description: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            description: description.into(),
            enum_values: Some(values),
        }
    }

    fn to_value(&self) -> Value {
        let mut value = json!({
            "type": "string",
            "description": self.description,
        });
        if let (Some(values), Some(obj)) = (&self.enum_values, value.as_object_mut()) {
            obj.insert("enum".to_string(), json!(values));
        }
        value
    }
}

/// Object schema with ordered properties
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    properties: Vec<(String, PropertySchema)>,
    required: Vec<String>,
}

impl InputSchema {
    pub fn object() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: &str, schema: PropertySchema, required: bool) -> Self {
        if required {
            self.required.push(name.to_string());
        }
        self.properties.push((name.to_string(), schema));
        self
    }

    pub fn to_value(&self) -> Value {
        let properties: Map<String, Value> = self
            .properties
            .iter()
            .map(|(name, schema)| (name.clone(), schema.to_value()))
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        })
    }
}
