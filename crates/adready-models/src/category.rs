//! The fixed scoring categories.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a category name is not one of the fixed eight.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown scoring category: {0}")]
pub struct CategoryError(pub String);

/// One of the eight scoring categories, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ScrollStoppingPower,
    VisualHierarchy,
    MessageClarity,
    OfferStrength,
    CallToAction,
    BrandPresence,
    TextReadability,
    PlatformFit,
}

impl Category {
    /// All categories in the order they are requested and presented.
    pub const ALL: [Category; 8] = [
        Category::ScrollStoppingPower,
        Category::VisualHierarchy,
        Category::MessageClarity,
        Category::OfferStrength,
        Category::CallToAction,
        Category::BrandPresence,
        Category::TextReadability,
        Category::PlatformFit,
    ];

    /// Display name used verbatim in prompts and results.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ScrollStoppingPower => "Scroll-Stopping Power",
            Self::VisualHierarchy => "Visual Hierarchy",
            Self::MessageClarity => "Message Clarity",
            Self::OfferStrength => "Offer Strength",
            Self::CallToAction => "Call to Action",
            Self::BrandPresence => "Brand Presence",
            Self::TextReadability => "Text Readability",
            Self::PlatformFit => "Platform Fit",
        }
    }

    /// Resolve a display name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Result<Self, CategoryError> {
        let needle = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CategoryError(name.to_string()))
    }

    /// Zero-based position in the canonical order.
    pub fn position(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(Self::ALL.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(
            Category::from_name("  call to ACTION "),
            Ok(Category::CallToAction)
        );
        assert!(Category::from_name("Vibes").is_err());
    }

    #[test]
    fn test_names_round_trip_in_order() {
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(Category::from_name(c.name()), Ok(*c));
            assert_eq!(c.position(), i);
        }
    }
}
