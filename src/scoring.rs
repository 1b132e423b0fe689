//! Composite desirability score for target companies.

use crate::error::ValidationError;
use crate::models::{Affinity, Company};

pub const MAX_MOTIVATION: u8 = 4;
pub const MAX_POSTING: u8 = 2;
pub const MAX_STRENGTHS: u8 = 4;
pub const MAX_VALUES: u8 = 4;
pub const AFFINITY_BONUS: u8 = 4;
pub const MAX_SCORE: u8 = MAX_MOTIVATION + MAX_POSTING + MAX_STRENGTHS + MAX_VALUES + AFFINITY_BONUS;

/// Sum of the four attributes, plus the affinity bonus.
///
/// Total over its declared domain; range-checking belongs to
/// [`CompanyInput::validate`]. Saturates rather than overflowing on
/// out-of-contract input.
pub fn score(motivation: u8, posting: u8, strengths: u8, values: u8, affinity: Affinity) -> u8 {
    let base = motivation
        .saturating_add(posting)
        .saturating_add(strengths)
        .saturating_add(values);
    match affinity {
        Affinity::Yes => base.saturating_add(AFFINITY_BONUS),
        Affinity::No => base,
    }
}

/// Display-only conversion of a score to a 0-100 percentage.
pub fn score_percentage(score: u8) -> u8 {
    (f64::from(score) / f64::from(MAX_SCORE) * 100.0).round() as u8
}

/// Company fields as entered by the user; the score is never among them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyInput {
    pub name: String,
    pub affinity: Affinity,
    pub motivation: u8,
    pub posting: u8,
    pub strengths: u8,
    pub values: u8,
}

impl CompanyInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty("company name"));
        }
        for (field, value, max) in [
            ("motivation", self.motivation, MAX_MOTIVATION),
            ("posting", self.posting, MAX_POSTING),
            ("strengths", self.strengths, MAX_STRENGTHS),
            ("values", self.values, MAX_VALUES),
        ] {
            if value > max {
                return Err(ValidationError::OutOfRange { field, value, max });
            }
        }
        Ok(())
    }

    pub fn score(&self) -> u8 {
        score(
            self.motivation,
            self.posting,
            self.strengths,
            self.values,
            self.affinity,
        )
    }

    pub fn into_company(self, id: String) -> Company {
        let score = self.score();
        Company {
            id,
            name: self.name.trim().to_string(),
            affinity: self.affinity,
            motivation: self.motivation,
            posting: self.posting,
            strengths: self.strengths,
            values: self.values,
            score,
        }
    }
}

impl Company {
    pub fn computed_score(&self) -> u8 {
        score(
            self.motivation,
            self.posting,
            self.strengths,
            self.values,
            self.affinity,
        )
    }

    /// Re-derives `score` from the other fields.
    pub fn rescored(mut self) -> Self {
        self.score = self.computed_score();
        self
    }

    pub fn to_input(&self) -> CompanyInput {
        CompanyInput {
            name: self.name.clone(),
            affinity: self.affinity,
            motivation: self.motivation,
            posting: self.posting,
            strengths: self.strengths,
            values: self.values,
        }
    }
}
