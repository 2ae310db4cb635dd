//! Lexicon-based mood classification for AI response text.
//!
//! Classification is pure and deterministic: each tag owns a keyword list,
//! tags are tried in a fixed priority order, and the first tag with a
//! case-insensitive match anywhere in the text wins. No match means Calm.

use serde::{Deserialize, Serialize};

/// Discrete emotional tag applied to modulate handwriting style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum MoodTag {
    Excited = 0,
    #[default]
    Calm = 1,
    Formal = 2,
    Casual = 3,
    Urgent = 4,
    Thoughtful = 5,
}

/// Geometric modulation associated with a mood.
///
/// Applied additively to the base [`StyleProfile`](crate::profile::StyleProfile)
/// before synthesis; mood never influences which trained variation is picked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodDelta {
    /// Multiplier on positional jitter amplitude
    pub jitter_scale: f32,
    /// Added to the profile slant, degrees
    pub slant_delta_deg: f32,
    /// Added to the profile messiness
    pub messiness_delta: f32,
}

impl Default for MoodDelta {
    fn default() -> Self {
        MoodTag::Calm.delta()
    }
}

impl MoodDelta {
    /// Linear interpolation between two deltas for gradual mood transitions.
    ///
    /// `weight` 0.0 yields `a`, 1.0 yields `b`.
    pub fn blend(a: MoodTag, b: MoodTag, weight: f32) -> Self {
        let t = weight.clamp(0.0, 1.0);
        let (a, b) = (a.delta(), b.delta());
        Self {
            jitter_scale: a.jitter_scale + (b.jitter_scale - a.jitter_scale) * t,
            slant_delta_deg: a.slant_delta_deg + (b.slant_delta_deg - a.slant_delta_deg) * t,
            messiness_delta: a.messiness_delta + (b.messiness_delta - a.messiness_delta) * t,
        }
    }
}

/// Match priority. The first tag whose lexicon hits wins; Calm is the
/// no-match default and carries no lexicon.
const PRIORITY: [MoodTag; 5] = [
    MoodTag::Excited,
    MoodTag::Urgent,
    MoodTag::Formal,
    MoodTag::Thoughtful,
    MoodTag::Casual,
];

impl MoodTag {
    /// Keyword/phrase lexicon for this tag, matched case-insensitively
    pub fn lexicon(self) -> &'static [&'static str] {
        match self {
            Self::Excited => &[
                "wow", "amazing", "awesome", "incredible", "fantastic", "brilliant",
                "can't wait", "love this", "yay", "!!",
            ],
            Self::Urgent => &[
                "urgent", "asap", "immediately", "right away", "deadline", "hurry",
                "time-sensitive", "as soon as possible",
            ],
            Self::Formal => &[
                "dear sir", "dear madam", "to whom it may concern", "sincerely",
                "regards", "respectfully", "yours faithfully", "pursuant",
            ],
            Self::Thoughtful => &[
                "hmm", "i wonder", "perhaps", "let's consider", "reflecting on",
                "on the other hand", "it depends", "interesting question",
            ],
            Self::Casual => &[
                "hey", "yeah", "lol", "gonna", "kinda", "btw", "no worries", "cool",
            ],
            Self::Calm => &[],
        }
    }

    /// Geometric delta this mood applies to the base profile
    pub fn delta(self) -> MoodDelta {
        match self {
            Self::Excited => MoodDelta {
                jitter_scale: 1.6,
                slant_delta_deg: 4.0,
                messiness_delta: 0.15,
            },
            Self::Calm => MoodDelta {
                jitter_scale: 0.8,
                slant_delta_deg: 0.0,
                messiness_delta: -0.05,
            },
            Self::Formal => MoodDelta {
                jitter_scale: 0.5,
                slant_delta_deg: -2.0,
                messiness_delta: -0.2,
            },
            Self::Casual => MoodDelta {
                jitter_scale: 1.2,
                slant_delta_deg: 1.0,
                messiness_delta: 0.08,
            },
            Self::Urgent => MoodDelta {
                jitter_scale: 1.8,
                slant_delta_deg: 6.0,
                messiness_delta: 0.25,
            },
            Self::Thoughtful => MoodDelta {
                jitter_scale: 0.7,
                slant_delta_deg: -1.0,
                messiness_delta: -0.1,
            },
        }
    }
}

/// Classify response text into a mood tag.
pub fn classify(text: &str) -> MoodTag {
    let lowered = text.to_lowercase();
    for tag in PRIORITY {
        if tag.lexicon().iter().any(|kw| lowered.contains(kw)) {
            return tag;
        }
    }
    MoodTag::Calm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_excited() {
        assert_eq!(classify("Wow! That's amazing!!"), MoodTag::Excited);
    }

    #[test]
    fn test_classify_formal() {
        assert_eq!(classify("Dear Sir, sincerely yours"), MoodTag::Formal);
    }

    #[test]
    fn test_classify_empty_defaults_to_calm() {
        assert_eq!(classify(""), MoodTag::Calm);
        assert_eq!(classify("the weather is unremarkable"), MoodTag::Calm);
    }

    #[test]
    fn test_classify_priority_order() {
        // Contains both an excited and a casual keyword; excited has priority
        assert_eq!(classify("hey, this is amazing"), MoodTag::Excited);
    }

    #[test]
    fn test_classify_is_pure() {
        let text = "Hurry, the deadline is today";
        let first = classify(text);
        for _ in 0..10 {
            assert_eq!(classify(text), first);
        }
        assert_eq!(first, MoodTag::Urgent);
    }

    #[test]
    fn test_blend_endpoints_and_midpoint() {
        let a = MoodTag::Calm.delta();
        let b = MoodTag::Excited.delta();

        assert_eq!(MoodDelta::blend(MoodTag::Calm, MoodTag::Excited, 0.0), a);
        assert_eq!(MoodDelta::blend(MoodTag::Calm, MoodTag::Excited, 1.0), b);

        let mid = MoodDelta::blend(MoodTag::Calm, MoodTag::Excited, 0.5);
        assert!((mid.jitter_scale - (a.jitter_scale + b.jitter_scale) / 2.0).abs() < 1e-6);
        assert!((mid.slant_delta_deg - (a.slant_delta_deg + b.slant_delta_deg) / 2.0).abs() < 1e-6);
    }
}
