//! Prompt construction for the generation request.
//!
//! Given a `FormFields` snapshot and the active profile, this module
//! deterministically renders the system-role instruction and the user-role
//! content that are sent to the text-generation endpoint. Building a prompt
//! has no side effects: identical inputs produce byte-identical strings.
//!
//! Two template families exist:
//!
//! - **Scenario-driven** (profiles with `scenario_mode`): a fixed narrative
//!   template asking for a humorous first-person anecdote with a title, a
//!   moral section, and hashtags. With a supplied scenario the literal text
//!   is embedded; without one the generator invents a random relatable
//!   situation.
//! - **Parameter-driven**: a structured instruction embedding topic, tone,
//!   length, buzzwords (or the literal token `None`), and the hashtag flag.
//!
//! Profiles may override the user template with a `{placeholder}` string;
//! the set of placeholders the builder provides is fixed and validated at
//! config load time.

pub mod template;

use crate::config::Profile;
use crate::fields::FormFields;
use template::TemplateError;

/// Placeholders the prompt builder provides to template overrides.
pub const KNOWN_PLACEHOLDERS: &[&str] = &[
    "topic",
    "tone",
    "length",
    "buzzwords",
    "hashtags",
    "scenario",
];

/// Default system instruction for parameter-driven profiles.
pub const TOPIC_SYSTEM_INSTRUCTION: &str = "You are a professional LinkedIn content writer who \
     crafts engaging, well-structured posts matching the requested topic, tone, and length.";

/// Default system instruction for scenario-driven profiles.
pub const SCENARIO_SYSTEM_INSTRUCTION: &str = "You are a creative assistant who writes dynamic, \
     engaging, and hilariously funny LinkedIn posts in a specific format. Posts should include a \
     catchy title with an emoji, a humorous and relatable narrative, a moral with concise \
     takeaways, and end with relevant hashtags.";

/// User template for scenario-driven generation with a supplied scenario.
const SCENARIO_TEMPLATE: &str = r#"Write a funny, creative LinkedIn-style post in the following format:
---
🥄 *[Insert a quirky or humorous title related to the situation here]*

Describe the situation: "{scenario}" in a playful, engaging, and lighthearted tone. Narrate it from my perspective ('I', 'I'm'). Use relatable humor and emojis to add flair.

Conclude with:
🔑 *Moral of the story?*
- Include 2-3 concise, witty takeaways from the story.
- Frame these insights positively, making them motivational or funny.

End with relevant hashtags like #OfficeWisdom or #LifeLessons.
---
Make the story concise and entertaining while keeping the format exactly like the one above."#;

/// User template for scenario-driven generation without a supplied scenario.
const RANDOM_STORY_TEMPLATE: &str = r#"Write a funny, creative LinkedIn-style post in the following format:
---
🥄 *[Insert a quirky or humorous title related to an everyday situation]*

Describe a random, relatable situation in a playful, engaging, and lighthearted tone. Narrate it from my perspective ('I', 'I'm'). Use relatable humor and emojis to add flair.

Conclude with:
🔑 *Moral of the story?*
- Include 2-3 concise, witty takeaways from the story.
- Frame these insights positively, making them motivational or funny.

End with relevant hashtags like #OfficeWisdom or #LifeLessons.
---
Make the story concise and entertaining while keeping the format exactly like the one above."#;

/// User template for parameter-driven generation.
const TOPIC_TEMPLATE: &str = r#"Write a LinkedIn post with the following parameters:
- Topic: {topic}
- Tone: {tone}
- Length: {length}
- Buzzwords: {buzzwords}
- Hashtags: {hashtags}

Match the requested tone and length, weave the buzzwords in naturally, and return the post ready to publish without any surrounding commentary."#;

/// A rendered prompt, ready to be sent as chat messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// The system-role instruction string.
    pub system: String,
    /// The user-role content string.
    pub user: String,
}

/// Build the prompt for a generation request.
///
/// Pure function of the field snapshot and profile. The only failure mode
/// is a profile template override referencing an unknown placeholder, which
/// config validation normally rejects before this point.
pub fn build(fields: &FormFields, profile: &Profile) -> Result<Prompt, TemplateError> {
    let buzzwords = fields
        .buzzwords
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or("None");

    let hashtags = if fields.include_hashtags {
        "include relevant hashtags at the end"
    } else {
        "do not include hashtags"
    };

    let vars = template::vars([
        ("topic", fields.topic.trim()),
        ("tone", fields.tone.as_str()),
        ("length", fields.length.as_str()),
        ("buzzwords", buzzwords),
        ("hashtags", hashtags),
        ("scenario", fields.scenario_text().unwrap_or("")),
    ]);

    let user = if let Some(custom) = &profile.user_template {
        template::render(custom, &vars)?
    } else if profile.scenario_mode {
        match fields.scenario_text() {
            Some(_) => template::render(SCENARIO_TEMPLATE, &vars)?,
            None => RANDOM_STORY_TEMPLATE.to_string(),
        }
    } else {
        template::render(TOPIC_TEMPLATE, &vars)?
    };

    let system = system_instruction(fields, profile);

    Ok(Prompt { system, user })
}

/// Select the system instruction for this request.
///
/// Precedence: the user's `--system` override (when the profile allows it),
/// then the profile's configured instruction, then the built-in default for
/// the template family.
fn system_instruction(fields: &FormFields, profile: &Profile) -> String {
    if profile.custom_system_instruction
        && let Some(custom) = fields
            .system_instruction
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    {
        return custom.to_string();
    }

    if let Some(configured) = &profile.system_instruction {
        return configured.clone();
    }

    if profile.scenario_mode {
        SCENARIO_SYSTEM_INSTRUCTION.to_string()
    } else {
        TOPIC_SYSTEM_INSTRUCTION.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Length, Tone};

    fn topic_profile() -> Profile {
        Profile {
            scenario_mode: false,
            history: true,
            custom_system_instruction: true,
            ..Default::default()
        }
    }

    fn scenario_profile() -> Profile {
        Profile {
            scenario_mode: true,
            history: false,
            custom_system_instruction: false,
            ..Default::default()
        }
    }

    fn topic_fields() -> FormFields {
        FormFields {
            topic: "remote work".to_string(),
            tone: Tone::Funny,
            length: Length::Short,
            buzzwords: Some("synergy, alignment".to_string()),
            include_hashtags: true,
            ..Default::default()
        }
    }

    #[test]
    fn identical_inputs_produce_identical_prompts() {
        let fields = topic_fields();
        let profile = topic_profile();

        let first = build(&fields, &profile).unwrap();
        let second = build(&fields, &profile).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn topic_prompt_embeds_all_parameters() {
        let prompt = build(&topic_fields(), &topic_profile()).unwrap();

        assert!(prompt.user.contains("Topic: remote work"));
        assert!(prompt.user.contains("Tone: funny"));
        assert!(prompt.user.contains("Length: short"));
        assert!(prompt.user.contains("Buzzwords: synergy, alignment"));
        assert!(prompt.user.contains("include relevant hashtags"));
        assert_eq!(prompt.system, TOPIC_SYSTEM_INSTRUCTION);
    }

    #[test]
    fn empty_buzzwords_become_the_none_token() {
        let mut fields = topic_fields();
        fields.buzzwords = None;
        let prompt = build(&fields, &topic_profile()).unwrap();
        assert!(prompt.user.contains("Buzzwords: None"));

        fields.buzzwords = Some("   ".to_string());
        let prompt = build(&fields, &topic_profile()).unwrap();
        assert!(prompt.user.contains("Buzzwords: None"));
    }

    #[test]
    fn hashtag_flag_switches_the_instruction() {
        let mut fields = topic_fields();
        fields.include_hashtags = false;
        let prompt = build(&fields, &topic_profile()).unwrap();
        assert!(prompt.user.contains("do not include hashtags"));
        assert!(!prompt.user.contains("include relevant hashtags"));
    }

    #[test]
    fn scenario_prompt_embeds_the_literal_scenario() {
        let mut fields = FormFields::default();
        fields.scenario = Some("my cat knocked over my coffee".to_string());

        let prompt = build(&fields, &scenario_profile()).unwrap();
        assert!(
            prompt
                .user
                .contains("Describe the situation: \"my cat knocked over my coffee\"")
        );
        assert!(prompt.user.contains("Moral of the story?"));
        assert_eq!(prompt.system, SCENARIO_SYSTEM_INSTRUCTION);
    }

    #[test]
    fn missing_scenario_falls_back_to_a_random_situation() {
        let fields = FormFields::default();
        let prompt = build(&fields, &scenario_profile()).unwrap();

        assert!(prompt.user.contains("Describe a random, relatable situation"));
        assert!(!prompt.user.contains("Describe the situation:"));
    }

    #[test]
    fn blank_scenario_falls_back_to_a_random_situation() {
        let mut fields = FormFields::default();
        fields.scenario = Some("   ".to_string());
        let prompt = build(&fields, &scenario_profile()).unwrap();
        assert!(prompt.user.contains("Describe a random, relatable situation"));
    }

    #[test]
    fn custom_system_instruction_is_honored_when_allowed() {
        let mut fields = topic_fields();
        fields.system_instruction = Some("You are a pirate copywriter.".to_string());

        let prompt = build(&fields, &topic_profile()).unwrap();
        assert_eq!(prompt.system, "You are a pirate copywriter.");
    }

    #[test]
    fn custom_system_instruction_is_ignored_without_the_capability() {
        let mut fields = FormFields::default();
        fields.system_instruction = Some("You are a pirate copywriter.".to_string());

        let prompt = build(&fields, &scenario_profile()).unwrap();
        assert_eq!(prompt.system, SCENARIO_SYSTEM_INSTRUCTION);
    }

    #[test]
    fn profile_system_instruction_overrides_the_builtin_default() {
        let mut profile = topic_profile();
        profile.system_instruction = Some("House style: always start with a question.".to_string());

        let prompt = build(&topic_fields(), &profile).unwrap();
        assert_eq!(prompt.system, "House style: always start with a question.");
    }

    #[test]
    fn user_template_override_is_rendered() {
        let mut profile = topic_profile();
        profile.user_template = Some("Post about {topic} in a {tone} voice.".to_string());

        let prompt = build(&topic_fields(), &profile).unwrap();
        assert_eq!(prompt.user, "Post about remote work in a funny voice.");
    }

    #[test]
    fn user_template_with_unknown_placeholder_errors() {
        let mut profile = topic_profile();
        profile.user_template = Some("Post about {subject}".to_string());

        let err = build(&topic_fields(), &profile).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownPlaceholder {
                name: "subject".to_string()
            }
        );
    }

    #[test]
    fn builtin_templates_reference_only_known_placeholders() {
        for tpl in [SCENARIO_TEMPLATE, RANDOM_STORY_TEMPLATE, TOPIC_TEMPLATE] {
            for name in template::placeholders(tpl).unwrap() {
                assert!(
                    KNOWN_PLACEHOLDERS.contains(&name.as_str()),
                    "template references unknown placeholder '{}'",
                    name
                );
            }
        }
    }
}
