//! Error types for request input and composition

use thiserror::Error;

use crate::sheet::AttributeGroup;

/// Errors raised while turning user input into a sheet request
#[derive(Error, Debug)]
pub enum InputError {
    #[error("score for {group} must contain digits only, got {value:?}")]
    InvalidScore { group: AttributeGroup, value: String },

    #[error("score for {group} is out of range: {value}")]
    ScoreOutOfRange { group: AttributeGroup, value: String },

    #[error("unknown skill '{name}'{}", format_suggestions(.suggestions))]
    UnknownSkill {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("unknown attribute group '{0}' (expected body, technique, spirit or social)")]
    UnknownGroup(String),

    #[error("unknown faction '{0}' (expected fugeki or tsukumogami)")]
    UnknownFaction(String),

    #[error("Failed to read character file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse character TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

impl InputError {
    /// Create an unknown skill error with suggestions
    pub fn unknown_skill(name: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::UnknownSkill {
            name: name.into(),
            suggestions,
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::UnknownSkill { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean {}?)", suggestions.join(", "))
    }
}

/// Errors that can occur while producing the output image
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The finished canvas could not be written as PNG
    #[error("failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),

    /// An input PNG could not be decoded
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// Downscale factor outside (0, 1]
    #[error("invalid scale factor {0} (expected a value in (0, 1])")]
    InvalidScale(f64),
}
