//! Copy-analysis fragment shared by both prompt variants.

use adready_models::AdCopy;

/// Submitted copy plus the rubric for judging it.
pub(crate) fn copy_block(copy: &AdCopy) -> String {
    let field = |value: &Option<String>| value.as_deref().unwrap_or("(not provided)").to_string();

    format!(
        r#"AD COPY SUBMITTED WITH THIS CREATIVE:
- Headline: {headline}
- Primary text: {primary}
- Description: {description}

Score the copy from 1 to 10 in "copyAnalysis":
- The headline should state the benefit or offer in under 40 characters.
- The first line of the primary text must hook before the "See more" truncation (about 125 characters).
- The description supports the headline; it must not repeat it.
- The copy and the visual must tell the same story. Flag any mismatch in "copyVisualAlignment".
- Suggest a rewritten headline and primary text that fix the biggest weakness.
For fields that were not provided, say what is missing and what it costs."#,
        headline = field(&copy.headline),
        primary = field(&copy.primary_text),
        description = field(&copy.description),
    )
}

/// Schema lines for the `copyAnalysis` block.
pub(crate) const COPY_SCHEMA: &str = r#"  "copyAnalysis": {
    "copyScore": <integer 1-10>,
    "headlineFeedback": "<string>",
    "primaryTextFeedback": "<string>",
    "descriptionFeedback": "<string>",
    "copyVisualAlignment": "<string>",
    "suggestedHeadline": "<string>",
    "suggestedPrimaryText": "<string>"
  },"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_are_marked() {
        let copy = AdCopy {
            headline: Some("Half price today".into()),
            ..Default::default()
        };
        let block = copy_block(&copy);
        assert!(block.contains("- Headline: Half price today"));
        assert!(block.contains("- Description: (not provided)"));
    }
}
