/*!
 * Instruction prompts for subtitle translation.
 *
 * Prompts are deterministic: the same target language, honorific policy, tic
 * policy and glossary presence always produce the same text.
 */

use std::fmt;
use std::str::FromStr;

use crate::errors::ConfigError;

/// How honorific suffixes (-san, -kun, ...) are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HonorificPolicy {
    #[default]
    Keep,
    Drop,
}

impl HonorificPolicy {
    fn rule(&self) -> &'static str {
        match self {
            Self::Keep => "Keep honorific suffixes exactly as-is.",
            Self::Drop => "Drop honorific suffixes.",
        }
    }
}

impl FromStr for HonorificPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(Self::Keep),
            "drop" => Ok(Self::Drop),
            _ => Err(ConfigError::InvalidOption {
                name: "honorifics",
                value: s.to_string(),
                expected: "'keep' or 'drop'",
            }),
        }
    }
}

impl fmt::Display for HonorificPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keep => "keep",
            Self::Drop => "drop",
        })
    }
}

/// How verbal tics and interjections are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TicPolicy {
    #[default]
    Keep,
    Light,
}

impl TicPolicy {
    fn rule(&self) -> &'static str {
        match self {
            Self::Keep => "Preserve interjections and tics verbatim.",
            Self::Light => "Lightly soften tics but do not remove them.",
        }
    }
}

impl FromStr for TicPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(Self::Keep),
            "light" => Ok(Self::Light),
            _ => Err(ConfigError::InvalidOption {
                name: "tics",
                value: s.to_string(),
                expected: "'keep' or 'light'",
            }),
        }
    }
}

impl fmt::Display for TicPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keep => "keep",
            Self::Light => "light",
        })
    }
}

/// Single-pass translation or draft followed by a post-edit pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationMode {
    #[default]
    SinglePass,
    DraftPostedit,
}

impl TranslationMode {
    /// Parse a mode name. Only `draft+postedit` (any case) selects the
    /// two-pass mode; every other name is single-pass.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("draft+postedit") {
            Self::DraftPostedit
        } else {
            Self::SinglePass
        }
    }
}

impl fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SinglePass => "llm",
            Self::DraftPostedit => "draft+postedit",
        })
    }
}

/// Inputs that fully determine a prompt
#[derive(Debug, Clone, Copy)]
pub struct PromptSettings<'a> {
    pub target_lang: &'a str,
    pub honorifics: HonorificPolicy,
    pub tics: TicPolicy,
    pub has_glossary: bool,
}

fn join_rules(rules: &[&str]) -> String {
    rules.join("\n").trim().to_string()
}

/// Prompt for the first (or only) translation pass
pub fn build_translate_prompt(settings: &PromptSettings<'_>) -> String {
    let role = format!(
        "You are a professional Japanese-to-{} subtitle translator for anime.",
        settings.target_lang
    );
    let glossary_rule = if settings.has_glossary {
        "Respect mandatory glossary replacements when applicable."
    } else {
        ""
    };
    join_rules(&[
        &role,
        settings.honorifics.rule(),
        settings.tics.rule(),
        "Do not invent or omit meaning; keep repetitions and hesitations.",
        glossary_rule,
        "Input format: ID\tJA_TEXT.",
        "Output format: ID\tTRANSLATION.",
        "Return exactly one line per input line, in the same order, preserving all IDs.",
    ])
}

/// Prompt for revising a draft against the source
pub fn build_postedit_prompt(settings: &PromptSettings<'_>) -> String {
    let glossary_rule = if settings.has_glossary {
        "Apply glossary replacements even if the draft missed them."
    } else {
        ""
    };
    join_rules(&[
        "You are improving a machine-translated draft without drifting from the Japanese.",
        settings.honorifics.rule(),
        settings.tics.rule(),
        glossary_rule,
        "Input format: ID\tJA_TEXT\tDRAFT_TRANSLATION.",
        "Anchor revisions on the Japanese source; fix only fluency and clarity.",
        "Output format: ID\tTRANSLATION.",
        "Return exactly one line per input line, keeping IDs and order unchanged.",
    ])
}
