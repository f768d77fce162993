//! The evidence bundle submitted to the reasoning oracle.

use serde::Serialize;

/// One ordered piece of evidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    Image { mime_type: String, data_base64: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image(mime_type: impl Into<String>, data_base64: impl Into<String>) -> Self {
        Self::Image {
            mime_type: mime_type.into(),
            data_base64: data_base64.into(),
        }
    }
}

/// System prompt plus ordered content blocks. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisPrompt {
    system_prompt: String,
    blocks: Vec<ContentBlock>,
}

impl AnalysisPrompt {
    pub fn new(system_prompt: impl Into<String>, blocks: Vec<ContentBlock>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            blocks,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    /// Number of image blocks.
    pub fn image_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, ContentBlock::Image { .. }))
            .count()
    }

    /// Concatenated text blocks, for logging and tests.
    pub fn instruction_text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
