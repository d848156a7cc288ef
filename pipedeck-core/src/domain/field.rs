//! Field domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// A piece of information collected while a record sits in a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: Uuid,

    /// Owning stage. Fixed at creation.
    pub stage_id: Uuid,

    pub name: String,
    pub field_type: FieldType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Kind of value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free-form text
    #[default]
    Text,

    /// Yes/no flag
    Checkbox,

    /// File attachment
    File,
}

impl FieldType {
    pub const ALL: [FieldType; 3] = [FieldType::Text, FieldType::Checkbox, FieldType::File];

    /// Wire/storage name of the type tag
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Checkbox => "checkbox",
            FieldType::File => "file",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown field type tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldType(pub String);

impl std::fmt::Display for UnknownFieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown field type '{}' (expected one of: text, checkbox, file)",
            self.0
        )
    }
}

impl std::error::Error for UnknownFieldType {}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "checkbox" => Ok(FieldType::Checkbox),
            "file" => Ok(FieldType::File),
            _ => Err(UnknownFieldType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_parse() {
        assert_eq!("text".parse::<FieldType>(), Ok(FieldType::Text));
        assert_eq!(" Checkbox ".parse::<FieldType>(), Ok(FieldType::Checkbox));
        assert_eq!("FILE".parse::<FieldType>(), Ok(FieldType::File));
        assert!("number".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_field_type_serde_matches_display() {
        for ty in FieldType::ALL {
            let json = serde_json::to_value(ty).unwrap();
            assert_eq!(json, serde_json::Value::String(ty.to_string()));
        }
    }
}
