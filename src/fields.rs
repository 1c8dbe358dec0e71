//! Form field model for the post composer.
//!
//! A `FormFields` snapshot is assembled per invocation from CLI arguments
//! and fed to the prompt builder. Fields live only for the lifetime of one
//! invocation; only the generated post and the history survive in the store.

use serde::{Deserialize, Serialize};

/// Tone of the requested post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    /// Uplifting, motivational voice.
    Inspirational,
    /// Playful, humorous voice.
    Funny,
    /// Polished, businesslike voice (default).
    #[default]
    Professional,
    /// Reflective, discussion-starting voice.
    ThoughtProvoking,
    /// Relaxed, conversational voice.
    Casual,
}

impl Tone {
    /// Parse a tone from a string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "inspirational" => Some(Self::Inspirational),
            "funny" => Some(Self::Funny),
            "professional" => Some(Self::Professional),
            "thought-provoking" | "thought_provoking" => Some(Self::ThoughtProvoking),
            "casual" => Some(Self::Casual),
            _ => None,
        }
    }

    /// The lowercase name used in prompts and CLI values.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inspirational => "inspirational",
            Self::Funny => "funny",
            Self::Professional => "professional",
            Self::ThoughtProvoking => "thought-provoking",
            Self::Casual => "casual",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested length of the post, mapped to a generated-token budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    /// Around a sentence or two.
    Short,
    /// A few paragraphs (default).
    #[default]
    Medium,
    /// A full-length post.
    Long,
}

impl Length {
    /// Parse a length from a string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "short" => Some(Self::Short),
            "medium" => Some(Self::Medium),
            "long" => Some(Self::Long),
            _ => None,
        }
    }

    /// The lowercase name used in prompts and CLI values.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    /// Maximum generated-token count requested for this length.
    pub fn max_tokens(&self) -> u32 {
        match self {
            Self::Short => 100,
            Self::Medium => 300,
            Self::Long => 500,
        }
    }
}

impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-entered parameters for one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    /// Topic of the post. Must be non-empty in topic-driven profiles.
    pub topic: String,

    /// Tone of the post.
    pub tone: Tone,

    /// Length of the post, controlling the token budget.
    pub length: Length,

    /// Buzzwords to weave into the post, if any.
    pub buzzwords: Option<String>,

    /// Whether the post should end with hashtags.
    pub include_hashtags: bool,

    /// Scenario to narrate (scenario-driven profiles). When absent, the
    /// generator is asked to invent a random relatable situation.
    pub scenario: Option<String>,

    /// System instruction override. Only honored when the active profile
    /// allows custom system instructions.
    pub system_instruction: Option<String>,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            topic: String::new(),
            tone: Tone::default(),
            length: Length::default(),
            buzzwords: None,
            include_hashtags: true,
            scenario: None,
            system_instruction: None,
        }
    }
}

impl FormFields {
    /// Whether the topic field holds a usable value.
    pub fn has_topic(&self) -> bool {
        !self.topic.trim().is_empty()
    }

    /// The scenario text, if one was supplied and is non-empty.
    pub fn scenario_text(&self) -> Option<&str> {
        self.scenario
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
