//! Scoring rubric, policy checklist and response schema text.

use adready_models::{Category, MediaKind};

use super::copy::COPY_SCHEMA;

fn image_guidance(category: Category) -> &'static str {
    match category {
        Category::ScrollStoppingPower => {
            "Would this stop a thumb mid-scroll? Contrast, faces, motion cues, an unexpected subject. \
             9-10: impossible to ignore. 5: pleasant but generic stock look. 1-2: blends into the feed."
        }
        Category::VisualHierarchy => {
            "Is there one clear focal point, then a path to the offer and the CTA? \
             Penalise clutter and competing elements."
        }
        Category::MessageClarity => {
            "Can a stranger say what is being sold and why in under two seconds? \
             9-10: product and benefit are obvious. 1-2: the viewer cannot tell what this is."
        }
        Category::OfferStrength => {
            "Is there a concrete reason to act now (price, discount, free trial, bonus)? \
             Vague claims like \"quality products\" score 3 or lower."
        }
        Category::CallToAction => {
            "Is the next step explicit and visible? A button-style or verb-led CTA scores higher than an implied one."
        }
        Category::BrandPresence => {
            "Is the brand identifiable (logo, colours, product packaging) without dominating the message?"
        }
        Category::TextReadability => {
            "Is on-image text legible on a phone: size, contrast, amount of text? More than about 20% of the frame as text is a drag."
        }
        Category::PlatformFit => {
            "Does it look native to a social feed (aspect ratio, UGC feel, no TV-ad polish) rather than a banner or print ad?"
        }
    }
}

fn video_guidance(category: Category) -> &'static str {
    match category {
        Category::ScrollStoppingPower => {
            "Judge the first frame and the first 3 seconds only. Movement, a face, a pattern interrupt or a bold claim before 1s scores highest. \
             A logo sting or slow fade-in scores 3 or lower."
        }
        Category::VisualHierarchy => {
            "Across the sampled frames, is the subject always clear, and does each scene lead the eye to one thing?"
        }
        Category::MessageClarity => {
            "By the 5 second mark, is it clear what is being sold and why? Consider on-screen text and the audio context."
        }
        Category::OfferStrength => {
            "Is a concrete offer shown or said, and how early? An offer that only appears on the end card scores at most 5."
        }
        Category::CallToAction => {
            "Is there an explicit CTA, on screen in the final seconds and ideally earlier? Check the end-card frames."
        }
        Category::BrandPresence => {
            "Is the brand visible in the first 3 seconds and again at the end, without a long branded intro?"
        }
        Category::TextReadability => {
            "Are captions and overlays large, high contrast, and on screen long enough to read? Assume most viewers watch with sound off."
        }
        Category::PlatformFit => {
            "Vertical or square framing, fast cuts, native feel, works with sound off. Horizontal TV-style edits score lower."
        }
    }
}

/// The eight categories with per-kind guidance, in canonical order.
pub(crate) fn category_rubric(kind: MediaKind) -> String {
    let mut out = String::from("SCORE THESE 8 CATEGORIES FROM 1 TO 10, IN THIS ORDER, USING THESE EXACT NAMES:\n");
    for (i, category) in Category::ALL.iter().enumerate() {
        let guidance = match kind {
            MediaKind::Image => image_guidance(*category),
            MediaKind::Video => video_guidance(*category),
        };
        out.push_str(&format!("{}. {}: {}\n", i + 1, category.name(), guidance));
    }
    out
}

pub(crate) const POLICY_CHECKLIST: &str = r#"POLICY CHECK. Add a short entry to "policyFlags" for each issue you see (empty array if none):
- Before/after body or health claims, or implied personal attributes ("Are you overweight?")
- Income or financial guarantees
- Misleading UI (fake play buttons, fake notifications, fake close buttons)
- Prohibited or restricted products (weapons, tobacco, adult content, unapproved supplements)
- Excessive profanity, shock imagery, or sensationalism
- Trademark or celebrity use that implies an endorsement"#;

pub(crate) fn quick_audit_instructions(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => {
            "QUICK AUDIT: set \"offerMentioned\" if a concrete offer is visible, and \"urgencyPresent\" if there is a deadline or scarcity cue."
        }
        MediaKind::Video => {
            "QUICK AUDIT: set \"offerMentioned\" if a concrete offer is shown or spoken, \"urgencyPresent\" if there is a deadline or scarcity cue, \
             and \"endCardPresent\" if the final frames show a dedicated end card with brand and CTA."
        }
    }
}

/// Exact JSON shape requested from the oracle.
pub(crate) fn response_schema(kind: MediaKind, with_copy: bool) -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| {
            format!(
                r#"    {{"name": "{}", "score": <integer 1-10>, "reason": "<one sentence>"}}"#,
                c.name()
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");

    let end_card = match kind {
        MediaKind::Image => "",
        MediaKind::Video => ",\n    \"endCardPresent\": <boolean>",
    };

    let mut schema = format!(
        r#"{{
  "overallScore": <integer 0-100>,
  "quickAudit": {{
    "offerMentioned": <boolean>,
    "urgencyPresent": <boolean>{end_card}
  }},
  "categories": [
{categories}
  ],
"#
    );

    if kind == MediaKind::Video {
        schema.push_str(
            r#"  "hookAnalysis": {
    "firstFrameScore": <integer 1-10>,
    "firstFrameAssessment": "<string>",
    "firstThreeSecondsAssessment": "<string>",
    "hookType": "<e.g. question, bold claim, problem, demo, UGC, none>"
  },
  "videoNotes": {
    "pacing": "<string>",
    "soundOffCompatible": <boolean>,
    "endCardAssessment": "<string>"
  },
"#,
        );
    }

    if with_copy {
        schema.push_str(COPY_SCHEMA);
        schema.push('\n');
    }

    schema.push_str(
        r#"  "policyFlags": ["<string>"],
  "topFixes": ["<most impactful fix>", "<second fix>", "<third fix>"],
  "verdictReason": "<one or two sentences>",
  "whatsWorking": "<string>",
  "executiveSummary": {
    "biggestStrength": "<string>",
    "biggestRisk": "<string>",
    "quickWin": "<string>"
  },
  "scoreExplanation": {
    "scoreDriver": "<what lifted the score most>",
    "scoreDrag": "<what held it back most>"
  }
}"#,
    );

    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rubric_lists_categories_in_order() {
        let rubric = category_rubric(MediaKind::Image);
        let positions: Vec<usize> = Category::ALL
            .iter()
            .map(|c| rubric.find(c.name()).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_image_schema_omits_video_blocks() {
        let schema = response_schema(MediaKind::Image, false);
        assert!(!schema.contains("hookAnalysis"));
        assert!(!schema.contains("videoNotes"));
        assert!(!schema.contains("endCardPresent"));
        assert!(!schema.contains("copyAnalysis"));
    }

    #[test]
    fn test_video_schema_with_copy() {
        let schema = response_schema(MediaKind::Video, true);
        assert!(schema.contains("\"hookAnalysis\""));
        assert!(schema.contains("\"videoNotes\""));
        assert!(schema.contains("\"endCardPresent\""));
        assert!(schema.contains("\"copyAnalysis\""));
    }
}
