use crate::{Score, MAX_NAME_LEN};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub moves: u32,
    pub time: u32,
    pub date: String,
}

impl LeaderboardEntry {
    pub fn score(&self) -> Score {
        Score::encode(self.moves, self.time)
    }

    pub fn normalized(mut self) -> Option<Self> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        self.name = name.chars().take(MAX_NAME_LEN).collect();
        Some(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn entry(name: &str) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.to_string(),
            moves: 12,
            time: 45,
            date: "2024-05-01T12:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_score() {
        assert_eq!(entry("Ann").score(), Score::encode(12, 45));
    }

    #[test]
    fn test_normalized_trims() {
        assert_eq!(entry("  Ann \t").normalized().unwrap().name, "Ann");
    }

    #[test]
    fn test_normalized_truncates_chars() {
        let name = "ÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅ";
        let normalized = entry(name).normalized().unwrap();
        assert_eq!(normalized.name.chars().count(), MAX_NAME_LEN);
        assert!(name.starts_with(&normalized.name));
    }

    #[test]
    fn test_normalized_blank() {
        assert_eq!(entry("").normalized(), None);
        assert_eq!(entry("   ").normalized(), None);
    }

    #[test]
    fn test_normalized_keeps_scores() {
        let normalized = entry(" Bo ").normalized().unwrap();
        assert_eq!(normalized.moves, 12);
        assert_eq!(normalized.time, 45);
        assert_eq!(normalized.date, "2024-05-01T12:00:00.000Z");
    }
}
