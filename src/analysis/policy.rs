//! Policy Engine
//!
//! Compares the declarations a member carries with the ones its override
//! source requires.
//!
//! | source    | style          | required        | forbidden |
//! |-----------|----------------|-----------------|-----------|
//! | none      | any            | -               | tag, keyword |
//! | interface | any            | tag             | -         |
//! | class     | `tag-only`     | tag             | keyword   |
//! | class     | `keyword-only` | keyword         | tag       |
//! | class     | `both`         | tag and keyword | -         |
//! | class     | `either`       | tag or keyword  | -         |

use super::{DeclarationState, MessageKind, OverrideSource};
use crate::hierarchy::TypeKind;
use serde::{Deserialize, Serialize};

/// Which forms are required for class-sourced overrides
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyStyle {
    TagOnly,
    KeywordOnly,
    Both,
    #[default]
    Either,
}

impl PolicyStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStyle::TagOnly => "tag-only",
            PolicyStyle::KeywordOnly => "keyword-only",
            PolicyStyle::Both => "both",
            PolicyStyle::Either => "either",
        }
    }
}

impl std::fmt::Display for PolicyStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PolicyStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "tag-only" | "tag" => Ok(PolicyStyle::TagOnly),
            "keyword-only" | "keyword" => Ok(PolicyStyle::KeywordOnly),
            "both" => Ok(PolicyStyle::Both),
            "either" => Ok(PolicyStyle::Either),
            other => Err(format!(
                "unknown policy style '{}', expected one of: tag-only, keyword-only, both, either",
                other
            )),
        }
    }
}

/// One of the two override declaration forms
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum DeclarationForm {
    #[default]
    Tag,
    Keyword,
}

impl DeclarationForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationForm::Tag => "tag",
            DeclarationForm::Keyword => "keyword",
        }
    }
}

impl std::fmt::Display for DeclarationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeclarationForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tag" => Ok(DeclarationForm::Tag),
            "keyword" => Ok(DeclarationForm::Keyword),
            other => Err(format!(
                "unknown declaration form '{}', expected 'tag' or 'keyword'",
                other
            )),
        }
    }
}

/// Policy for one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfiguration {
    pub style: PolicyStyle,

    /// Form inserted by the fix for `missing-either`
    pub prefer: DeclarationForm,
}

impl PolicyConfiguration {
    pub fn new(style: PolicyStyle) -> Self {
        Self {
            style,
            prefer: DeclarationForm::default(),
        }
    }

    pub fn with_prefer(mut self, prefer: DeclarationForm) -> Self {
        self.prefer = prefer;
        self
    }
}

/// Message kinds to report for a member, in a stable order
pub fn decide(
    source: Option<&OverrideSource>,
    state: DeclarationState,
    policy: &PolicyConfiguration,
) -> Vec<MessageKind> {
    let mut kinds = Vec::new();

    let Some(source) = source else {
        if state.has_tag {
            kinds.push(MessageKind::UnnecessaryTag);
        }
        if state.has_keyword {
            kinds.push(MessageKind::UnnecessaryKeyword);
        }
        return kinds;
    };

    if source.kind == TypeKind::Interface {
        if !state.has_tag {
            kinds.push(MessageKind::MissingTag);
        }
        return kinds;
    }

    match policy.style {
        PolicyStyle::TagOnly => {
            if !state.has_tag {
                kinds.push(MessageKind::MissingTag);
            }
            if state.has_keyword {
                kinds.push(MessageKind::UnnecessaryKeyword);
            }
        }
        PolicyStyle::KeywordOnly => {
            if !state.has_keyword {
                kinds.push(MessageKind::MissingKeyword);
            }
            if state.has_tag {
                kinds.push(MessageKind::UnnecessaryTag);
            }
        }
        PolicyStyle::Both => match (state.has_tag, state.has_keyword) {
            (false, false) => kinds.push(MessageKind::MissingBoth),
            (false, true) => kinds.push(MessageKind::MissingTag),
            (true, false) => kinds.push(MessageKind::MissingKeyword),
            (true, true) => {}
        },
        PolicyStyle::Either => {
            if !state.has_any() {
                kinds.push(MessageKind::MissingEither);
            }
        }
    }

    kinds
}
