//! Data models for the flashcard study tool.

use serde::{Deserialize, Serialize};

/// A question/answer pair, the atomic unit of study.
///
/// Cards are immutable once parsed. Within a session they are distinguished
/// by identity (two cards with identical text are still two cards), which the
/// store realizes with `Rc` pointers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Front of the card.
    pub question: String,
    /// Back of the card.
    pub answer: String,
}

impl Card {
    /// Create a new card.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Study mode for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyMode {
    /// Cards in file order.
    Sequential,
    /// Cards shuffled once at session start.
    Random,
    /// Type the answer before flipping.
    Quiz,
}

impl StudyMode {
    /// All modes, in menu order.
    pub const ALL: [StudyMode; 3] = [Self::Sequential, Self::Random, Self::Quiz];

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sequential => "Sequential",
            Self::Random => "Random",
            Self::Quiz => "Quiz",
        }
    }

    /// One-line description for the mode menu.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Sequential => "Review cards in the order they were loaded",
            Self::Random => "Review cards in shuffled order",
            Self::Quiz => "Type your answer, then rate yourself",
        }
    }
}

/// User self-assessment after viewing an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Did not know it, see it again.
    Again,
    /// Difficult recall.
    Hard,
    /// Normal recall.
    Good,
    /// Effortless recall.
    Easy,
}

impl Confidence {
    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Again => "Again",
            Self::Hard => "Hard",
            Self::Good => "Good",
            Self::Easy => "Easy",
        }
    }

    /// Get associated key.
    pub fn key(&self) -> char {
        match self {
            Self::Again => '1',
            Self::Hard => '2',
            Self::Good => '3',
            Self::Easy => '4',
        }
    }

    /// Map a digit key back to a rating.
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Self::Again),
            '2' => Some(Self::Hard),
            '3' => Some(Self::Good),
            '4' => Some(Self::Easy),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_creation() {
        let card = Card::new("What is 2+2?", "4");
        assert_eq!(card.question, "What is 2+2?");
        assert_eq!(card.answer, "4");
    }

    #[test]
    fn test_confidence_keys() {
        for c in [
            Confidence::Again,
            Confidence::Hard,
            Confidence::Good,
            Confidence::Easy,
        ] {
            assert_eq!(Confidence::from_key(c.key()), Some(c));
        }
        assert_eq!(Confidence::from_key('5'), None);
    }
}
