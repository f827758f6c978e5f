use cypherscope_core::{EditorSupport, Schema};
use serde_json::json;

/// Schema snapshot shared by the integration fixtures.
pub fn sample_schema() -> Schema {
    Schema::from_value(&json!({
        "labels": [":y", ":x"],
        "relationshipTypes": [":KNOWS", ":LIKES"],
        "propertyKeys": ["prop1", "prop2"],
        "functions": [
            { "name": "toFloat", "signature": "(expression)" },
            { "name": "apoc.text.join", "signature": "(texts, delimiter)" }
        ],
        "procedures": [
            {
                "name": "db.indexes",
                "signature": "() :: (description :: STRING)",
                "returnItems": [
                    { "name": "description", "signature": "STRING" }
                ]
            }
        ],
        "consoleCommands": [
            { "name": ":play" },
            { "name": ":server", "commands": [
                { "name": "user", "commands": [
                    { "name": "add" },
                    { "name": "list", "description": "List users" }
                ]}
            ]}
        ],
        "parameters": ["param1", "param2"]
    }))
}

/// Splits a fixture on the `▼` cursor marker, returning the clean text and
/// the 1-based line/column of the caret.
pub fn at_cursor(fixture: &str) -> (String, u32, u32) {
    let offset = fixture.find('▼').expect("fixture must contain the ▼ cursor marker");
    let clean = fixture.replacen('▼', "", 1);
    let before = &clean[..offset];
    let line = before.matches('\n').count() as u32 + 1;
    let column = match before.rfind('\n') {
        Some(newline) => before[newline + 1..].chars().count() as u32 + 1,
        None => before.chars().count() as u32 + 1,
    };
    (clean, line, column)
}

/// Editor loaded with the fixture text and the sample schema, plus the
/// caret coordinates of the `▼` marker.
pub fn editor_at(fixture: &str) -> (EditorSupport, u32, u32) {
    let (text, line, column) = at_cursor(fixture);
    let mut editor = EditorSupport::new(&text);
    editor.update_schema(sample_schema());
    (editor, line, column)
}
