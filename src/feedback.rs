//! User-visible status surface
//!
//! A single observational channel showing the last transcript and whether it
//! was understood, plus notices for non-fatal command failures. The core
//! logic only writes to it and never reads it back.

use serde::{Deserialize, Serialize};

/// Outcome flag for the last command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusFlag {
    /// Nothing handled yet.
    #[default]
    Neutral,
    /// The last transcript mapped to a known command.
    Understood,
    /// The last transcript matched nothing in the grammar.
    Unrecognized,
}

/// Sink for user-visible feedback.
pub trait Feedback: Send + Sync {
    /// Display the most recent transcript.
    fn transcript(&self, text: &str);

    /// Flag the last command as understood or not.
    fn flag(&self, flag: StatusFlag);

    /// Show a notice for a non-fatal command failure
    /// (e.g. "Location not found").
    fn notice(&self, message: &str);
}

/// Feedback sink that writes to the log; stands in for a real status bar in
/// the console demo.
pub struct TracingFeedback;

impl Feedback for TracingFeedback {
    fn transcript(&self, text: &str) {
        tracing::info!("Heard: '{}'", text);
    }

    fn flag(&self, flag: StatusFlag) {
        match flag {
            StatusFlag::Neutral => {}
            StatusFlag::Understood => tracing::debug!("Command understood"),
            StatusFlag::Unrecognized => tracing::info!("Command not understood"),
        }
    }

    fn notice(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flag_is_neutral() {
        assert_eq!(StatusFlag::default(), StatusFlag::Neutral);
    }

    #[test]
    fn test_flag_serialisation() {
        let json = serde_json::to_string(&StatusFlag::Unrecognized).unwrap();
        assert_eq!(json, "\"unrecognized\"");
    }
}
