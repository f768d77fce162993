//! Ad copy supplied alongside a creative.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Caller-supplied ad copy. Never derived from the media itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdCopy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AdCopy {
    /// Returns true when no field carries non-blank text.
    pub fn is_empty(&self) -> bool {
        [&self.primary_text, &self.headline, &self.description]
            .iter()
            .all(|field| field.as_deref().map_or(true, |s| s.trim().is_empty()))
    }

    /// Drop blank fields; returns `None` when nothing is left.
    pub fn normalized(self) -> Option<Self> {
        fn keep(field: Option<String>) -> Option<String> {
            field
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        }

        let copy = Self {
            primary_text: keep(self.primary_text),
            headline: keep(self.headline),
            description: keep(self.description),
        };
        (!copy.is_empty()).then_some(copy)
    }
}
