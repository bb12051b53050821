//! Homework record model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValueError;

/// Keys every homework record must carry
pub const REQUIRED_KEYS: [&str; 6] = [
    "date_updated",
    "homework_name",
    "id",
    "lesson_name",
    "reviewer_comment",
    "status",
];

/// Review verdict of a homework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Accepted by the reviewer
    Approved,
    /// Taken for review
    Reviewing,
    /// Returned with remarks
    Rejected,
}

impl Verdict {
    /// All known verdicts
    pub const ALL: [Verdict; 3] = [Verdict::Approved, Verdict::Reviewing, Verdict::Rejected];

    /// Status string used by the API
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Approved => "approved",
            Verdict::Reviewing => "reviewing",
            Verdict::Rejected => "rejected",
        }
    }

    /// Human-readable phrase sent to the chat
    pub fn phrase(self) -> &'static str {
        match self {
            Verdict::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Verdict::Reviewing => "Работа взята на проверку ревьюером.",
            Verdict::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for Verdict {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verdict::ALL
            .into_iter()
            .find(|verdict| verdict.as_str() == s)
            .ok_or_else(|| ValueError::UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated homework record
#[derive(Debug, Clone, PartialEq)]
pub struct Homework {
    /// Opaque identifier
    pub id: Value,
    /// Current verdict
    pub status: Verdict,
    /// Display name, never empty
    pub homework_name: String,
    /// Reviewer comment, if any
    pub reviewer_comment: Option<String>,
    /// Last update timestamp as sent by the API
    pub date_updated: Option<String>,
    /// Lesson the homework belongs to
    pub lesson_name: Option<String>,
}

impl Homework {
    /// Chat message announcing the current verdict
    pub fn status_message(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.homework_name,
            self.status.phrase()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_round_trips_through_str() {
        for verdict in Verdict::ALL {
            assert_eq!(verdict.as_str().parse::<Verdict>().unwrap(), verdict);
        }
    }

    #[test]
    fn test_unknown_verdict() {
        assert_eq!(
            "done".parse::<Verdict>(),
            Err(ValueError::UnknownStatus("done".to_string()))
        );
    }

    #[test]
    fn test_verdict_is_case_sensitive() {
        assert!("Approved".parse::<Verdict>().is_err());
    }
}
