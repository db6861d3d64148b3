use std::fmt;

use serde::{Deserialize, Serialize};

/// What the assistant decided to do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SearchTrains,
    CheckAvailability,
    CancellationPolicy,
    GeneralChat,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::SearchTrains,
        Action::CheckAvailability,
        Action::CancellationPolicy,
        Action::GeneralChat,
    ];

    /// Reads a model's answer. Surrounding whitespace, quotes and
    /// punctuation are ignored; anything unrecognised is general chat.
    pub fn parse(output: &str) -> Self {
        let name = output
            .trim()
            .trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == name)
            .unwrap_or(Action::GeneralChat)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::SearchTrains => "search_trains",
            Action::CheckAvailability => "check_availability",
            Action::CancellationPolicy => "cancellation_policy",
            Action::GeneralChat => "general_chat",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_names() {
        for action in Action::ALL {
            assert_eq!(Action::parse(action.as_str()), action);
        }
    }

    #[test]
    fn tolerates_noise_around_the_name() {
        assert_eq!(Action::parse("  Search_Trains\n"), Action::SearchTrains);
        assert_eq!(Action::parse("\"check_availability\"."), Action::CheckAvailability);
        assert_eq!(Action::parse("`cancellation_policy`"), Action::CancellationPolicy);
    }

    #[test]
    fn unknown_output_is_general_chat() {
        assert_eq!(Action::parse(""), Action::GeneralChat);
        assert_eq!(Action::parse("book_ticket"), Action::GeneralChat);
        assert_eq!(
            Action::parse("I think you want search_trains"),
            Action::GeneralChat
        );
    }

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&Action::CheckAvailability).unwrap(),
            "\"check_availability\""
        );
    }
}
