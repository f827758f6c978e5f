//! Editor-supplied schema snapshot.
//!
//! Hosts push the graph's metadata (labels, relationship types, procedure
//! signatures, console commands) into the engine so schema-backed completion
//! has something to offer. The snapshot is immutable once supplied; pushing
//! a new one invalidates the engine's cached item lists.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Schema snapshot supplied by the hosting editor.
///
/// Labels and relationship types carry their leading `:` sigil (host
/// convention, e.g. `":Person"`); parameters are bare names. Missing or
/// malformed fields deserialize to empty lists, never to an error, so a
/// partially-populated host never breaks completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Schema {
    pub labels: Vec<String>,
    pub relationship_types: Vec<String>,
    pub property_keys: Vec<String>,
    pub functions: Vec<SchemaFunction>,
    pub procedures: Vec<SchemaProcedure>,
    pub console_commands: Vec<ConsoleCommand>,
    pub parameters: Vec<String>,
}

/// A callable function, e.g. `{name: "toFloat", signature: "(expression)"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaFunction {
    pub name: String,
    pub signature: String,
}

/// A callable procedure with its yieldable outputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaProcedure {
    pub name: String,
    pub signature: String,
    pub return_items: Vec<ProcedureReturn>,
}

/// One yieldable output of a procedure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcedureReturn {
    pub name: String,
    pub signature: String,
}

/// A console command, optionally with nested subcommands.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsoleCommand {
    /// Command or subcommand name; top-level names carry the `:` sigil
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub commands: Vec<ConsoleCommand>,
}

impl Schema {
    /// Builds a schema from an untyped JSON value, mapping every missing or
    /// wrong-shaped field to an empty list. Never fails.
    pub fn from_value(value: &serde_json::Value) -> Schema {
        let Some(obj) = value.as_object() else {
            return Schema::default();
        };
        Schema {
            labels: string_list(obj.get("labels")),
            relationship_types: string_list(obj.get("relationshipTypes")),
            property_keys: string_list(obj.get("propertyKeys")),
            functions: typed_list(obj.get("functions")),
            procedures: typed_list(obj.get("procedures")),
            console_commands: typed_list(obj.get("consoleCommands")),
            parameters: string_list(obj.get("parameters")),
        }
    }

    /// Parses a schema from JSON text. Invalid JSON is a host bug and is
    /// reported; shape problems inside valid JSON still degrade to empty
    /// lists via [`Schema::from_value`].
    pub fn from_json(text: &str) -> Result<Schema, SchemaError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Ok(Schema::from_value(&value))
    }
}

fn string_list(value: Option<&serde_json::Value>) -> Vec<String> {
    value
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn typed_list<T: serde::de::DeserializeOwned>(value: Option<&serde_json::Value>) -> Vec<T> {
    value
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}
