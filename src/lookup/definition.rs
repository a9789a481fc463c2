use serde_json::Value;

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Definition {
    pub definition: String,
    pub example: String,
}

impl Definition {
    pub fn unavailable() -> Self {
        Self {
            definition: NOT_AVAILABLE.to_string(),
            example: NOT_AVAILABLE.to_string(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.definition != NOT_AVAILABLE || self.example != NOT_AVAILABLE
    }
}

/// Extract the first definition from a dictionary API response body.
///
/// The body is expected to be an array of entries shaped like
/// `[{ "meanings": [{ "definitions": [{ "definition": .., "example": .. }] }] }]`.
/// Only the first entry is consulted; its meanings are flattened in order and
/// the first definition object wins. Anything missing or of the wrong type
/// maps to `N/A`.
pub fn parse_entries(body: &str) -> Definition {
    let Ok(root) = serde_json::from_str::<Value>(body) else {
        return Definition::unavailable();
    };

    let first = root
        .as_array()
        .and_then(|entries| entries.first())
        .and_then(|entry| entry.get("meanings"))
        .and_then(Value::as_array)
        .and_then(|meanings| {
            meanings
                .iter()
                .filter_map(|m| m.get("definitions").and_then(Value::as_array))
                .flatten()
                .next()
        });

    let Some(first) = first else {
        return Definition::unavailable();
    };

    let field = |name: &str| {
        first
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or(NOT_AVAILABLE)
            .to_string()
    };

    Definition {
        definition: field("definition"),
        example: field("example"),
    }
}
