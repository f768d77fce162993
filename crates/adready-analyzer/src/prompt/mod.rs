//! Evidence assembly for the reasoning oracle.
//!
//! A [`PromptSpec`] carries the media evidence for one kind; [`build_prompt`]
//! turns it and the optional ad copy into an [`AnalysisPrompt`] whose content
//! blocks are the media (frames chronologically, each preceded by its
//! timestamp label) followed by a single instruction text.

mod copy;
mod rubric;

use adready_models::{AdCopy, AudioAnalysis, ExtractedFrame, MediaKind};
use adready_oracle::{AnalysisPrompt, ContentBlock};

pub const SYSTEM_PROMPT: &str = "You are a senior paid-social creative strategist who reviews ad creatives before launch. \
You score strictly and consistently against the rubric you are given, you cite what you actually see, \
and you respond with a single JSON object only.";

/// Media evidence for one analysis.
#[derive(Debug, Clone, Copy)]
pub enum PromptSpec<'a> {
    Image {
        mime_type: &'a str,
        data_base64: &'a str,
    },
    Video {
        frames: &'a [ExtractedFrame],
        audio: Option<&'a AudioAnalysis>,
    },
}

impl PromptSpec<'_> {
    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Image { .. } => MediaKind::Image,
            Self::Video { .. } => MediaKind::Video,
        }
    }
}

/// Build the prompt. Identical inputs give identical prompts.
pub fn build_prompt(spec: &PromptSpec<'_>, ad_copy: Option<&AdCopy>) -> AnalysisPrompt {
    let mut blocks = Vec::new();

    match spec {
        PromptSpec::Image {
            mime_type,
            data_base64,
        } => {
            blocks.push(ContentBlock::image(*mime_type, *data_base64));
        }
        PromptSpec::Video { frames, .. } => {
            for frame in frames.iter() {
                blocks.push(ContentBlock::text(format!("Frame at {}", frame.label())));
                blocks.push(ContentBlock::image(
                    frame.mime_type.as_str(),
                    frame.image_base64.as_str(),
                ));
            }
        }
    }

    blocks.push(ContentBlock::text(instruction_text(spec, ad_copy)));
    AnalysisPrompt::new(SYSTEM_PROMPT, blocks)
}

fn instruction_text(spec: &PromptSpec<'_>, ad_copy: Option<&AdCopy>) -> String {
    let kind = spec.kind();
    let mut sections: Vec<String> = Vec::new();

    sections.push(match spec {
        PromptSpec::Image { .. } => {
            "Analyze this static ad creative for paid social (Meta, TikTok, YouTube). The image above is the full creative.".to_string()
        }
        PromptSpec::Video { frames, .. } => format!(
            "Analyze this video ad creative for paid social (Meta, TikTok, YouTube). \
             The {} frames above were sampled at the labelled timestamps, weighted toward the opening and the final seconds. \
             Most viewers decide to keep watching within the first 3 seconds, so weigh the opening frames most heavily.",
            frames.len()
        ),
    });

    sections.push(rubric::category_rubric(kind));

    if let PromptSpec::Video { audio, .. } = spec {
        sections.push(audio_context(*audio));
    }

    if let Some(copy) = ad_copy {
        sections.push(copy::copy_block(copy));
    }

    sections.push(rubric::quick_audit_instructions(kind).to_string());
    sections.push(rubric::POLICY_CHECKLIST.to_string());

    sections.push(format!(
        "Return ONLY a single JSON object with exactly this schema:\n{}",
        rubric::response_schema(kind, ad_copy.is_some())
    ));

    sections.push(
        "Rules:\n\
         - Return ONLY the JSON object. No markdown, no code fences, no commentary.\n\
         - Include every field shown. Never use null.\n\
         - \"categories\" must contain exactly the 8 categories above, with the exact names, in the same order.\n\
         - \"overallScore\" reflects launch readiness, not the average of the category scores.\n\
         - \"topFixes\" lists exactly 3 concrete, specific changes, most impactful first."
            .to_string(),
    );

    sections.join("\n\n")
}

fn audio_context(audio: Option<&AudioAnalysis>) -> String {
    let Some(audio) = audio.filter(|a| a.available) else {
        return "AUDIO CONTEXT: Audio was not analyzed for this video. Judge the creative on visuals and on-screen text only, \
                and do not penalise or reward the audio."
            .to_string();
    };

    let mut out = String::from("AUDIO CONTEXT (first 15 seconds, measured before this review):\n");
    if audio.is_music_only || !audio.has_voiceover {
        out.push_str(&format!("- No spoken hook. {}\n", audio.audio_hook_assessment));
    } else {
        out.push_str(&format!(
            "- Voiceover present, starts {}.\n",
            if audio.voiceover_starts_early { "early (within 2 seconds)" } else { "late (after 2 seconds)" }
        ));
        if let Some(line) = &audio.opening_line {
            out.push_str(&format!("- Opening line: \"{}\"\n", line));
        }
        if let Some(transcript) = &audio.transcript {
            out.push_str(&format!("- First 10 seconds: \"{}\"\n", transcript));
        }
    }
    out.push_str(&format!("- Audio hook score: {}/10\n", audio.audio_hook_score));
    out.push_str(audio_guidance(audio));
    out
}

fn audio_guidance(audio: &AudioAnalysis) -> &'static str {
    if audio.is_music_only || !audio.has_voiceover {
        "Scoring guidance: there is no spoken hook, so treat audio as a sound-off question. \
         The opening frames and on-screen text must carry the hook and the offer on their own. \
         Judge soundOffCompatible and Platform Fit on that basis, and do not credit a voiceover hook in hookAnalysis."
    } else if audio.voiceover_starts_early {
        "Scoring guidance: the voiceover speaks within the first 2 seconds. \
         Give weight to early attention under Scroll-Stopping Power and in hookAnalysis when the opening line is direct. \
         Still check that captions or on-screen text carry the message for sound-off viewers."
    } else {
        "Scoring guidance: the voiceover starts late, after the 2-second attention window. \
         Do not credit audio under Scroll-Stopping Power; the first seconds must hook visually. \
         Note the late start in hookAnalysis and suggest moving the opening line earlier if it matters."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adready_models::Category;

    fn frames() -> Vec<ExtractedFrame> {
        vec![
            ExtractedFrame::jpeg(0.0, "AAA"),
            ExtractedFrame::jpeg(1.0, "BBB"),
            ExtractedFrame::jpeg(29.5, "CCC"),
        ]
    }

    #[test]
    fn test_video_blocks_are_labelled_and_chronological() {
        let frames = frames();
        let prompt = build_prompt(
            &PromptSpec::Video {
                frames: &frames,
                audio: None,
            },
            None,
        );
        let blocks = prompt.blocks();

        assert_eq!(blocks.len(), 7);
        assert_eq!(blocks[0], ContentBlock::text("Frame at 0.0s"));
        assert_eq!(blocks[1], ContentBlock::image("image/jpeg", "AAA"));
        assert_eq!(blocks[4], ContentBlock::text("Frame at 29.5s"));
        assert_eq!(blocks[5], ContentBlock::image("image/jpeg", "CCC"));
        assert!(matches!(blocks[6], ContentBlock::Text { ref text } if text.contains("hookAnalysis")));
        assert_eq!(prompt.image_count(), 3);
    }

    #[test]
    fn test_image_prompt_has_no_video_sections() {
        let prompt = build_prompt(
            &PromptSpec::Image {
                mime_type: "image/png",
                data_base64: "PNG",
            },
            None,
        );
        assert_eq!(prompt.blocks()[0], ContentBlock::image("image/png", "PNG"));

        let text = prompt.instruction_text();
        assert!(!text.contains("AUDIO CONTEXT"));
        assert!(!text.contains("hookAnalysis"));
        assert!(!text.contains("copyAnalysis"));
        for category in Category::ALL {
            assert!(text.contains(category.name()));
        }
    }

    #[test]
    fn test_copy_section_only_when_supplied() {
        let copy = AdCopy {
            headline: Some("Free shipping this week".into()),
            ..Default::default()
        };
        let spec = PromptSpec::Image {
            mime_type: "image/jpeg",
            data_base64: "JPG",
        };

        let with = build_prompt(&spec, Some(&copy)).instruction_text();
        assert!(with.contains("Free shipping this week"));
        assert!(with.contains("\"copyAnalysis\""));
    }

    #[test]
    fn test_audio_context_embeds_opening_line() {
        let audio = AudioAnalysis {
            available: true,
            has_voiceover: true,
            voiceover_starts_early: true,
            opening_line: Some("Tired of waiting?".into()),
            transcript: Some("Tired of waiting? Meet the kettle".into()),
            audio_hook_score: 9,
            audio_hook_assessment: "Strong".into(),
            is_music_only: false,
        };
        let frames = frames();
        let text = build_prompt(
            &PromptSpec::Video {
                frames: &frames,
                audio: Some(&audio),
            },
            None,
        )
        .instruction_text();

        assert!(text.contains("Opening line: \"Tired of waiting?\""));
        assert!(text.contains("Audio hook score: 9/10"));
    }

    fn voiced(starts_early: bool) -> AudioAnalysis {
        AudioAnalysis {
            available: true,
            has_voiceover: true,
            voiceover_starts_early: starts_early,
            opening_line: Some("You need this right now".into()),
            transcript: Some("You need this right now".into()),
            audio_hook_score: if starts_early { 9 } else { 5 },
            audio_hook_assessment: "Direct".into(),
            is_music_only: false,
        }
    }

    fn audio_text(audio: &AudioAnalysis) -> String {
        let frames = frames();
        build_prompt(
            &PromptSpec::Video {
                frames: &frames,
                audio: Some(audio),
            },
            None,
        )
        .instruction_text()
    }

    #[test]
    fn test_early_voiceover_weights_early_attention() {
        let text = audio_text(&voiced(true));
        assert!(text.contains("speaks within the first 2 seconds"));
        assert!(text.contains("early attention under Scroll-Stopping Power"));
        assert!(!text.contains("treat audio as a sound-off question"));
    }

    #[test]
    fn test_late_voiceover_gets_no_audio_credit() {
        let text = audio_text(&voiced(false));
        assert!(text.contains("voiceover starts late"));
        assert!(text.contains("Do not credit audio under Scroll-Stopping Power"));
        assert!(!text.contains("early attention"));
    }

    #[test]
    fn test_music_only_is_framed_as_sound_off() {
        let audio = AudioAnalysis::music_only("Music bed with no spoken hook", None);
        let text = audio_text(&audio);
        assert!(text.contains("treat audio as a sound-off question"));
        assert!(text.contains("Audio hook score: 6/10"));
        assert!(!text.contains("voiceover starts late"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let frames = frames();
        let spec = PromptSpec::Video {
            frames: &frames,
            audio: None,
        };
        assert_eq!(build_prompt(&spec, None), build_prompt(&spec, None));
    }
}
