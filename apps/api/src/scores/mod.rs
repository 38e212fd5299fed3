// Score Collector: seven subject scores, derived GPA, validation and auto-save.

pub mod collector;
pub mod gpa;
pub mod handlers;
pub mod validation;

use serde::{Deserialize, Serialize};

use crate::scores::gpa::compute_gpa;
use crate::scores::validation::{check_range, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Math,
    History,
    Physics,
    Chemistry,
    Biology,
    English,
    Geography,
}

impl Subject {
    pub const ALL: [Subject; 7] = [
        Subject::Math,
        Subject::History,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::English,
        Subject::Geography,
    ];

    /// Wire and column name, e.g. `math_score`.
    pub fn field(self) -> &'static str {
        match self {
            Subject::Math => "math_score",
            Subject::History => "history_score",
            Subject::Physics => "physics_score",
            Subject::Chemistry => "chemistry_score",
            Subject::Biology => "biology_score",
            Subject::English => "english_score",
            Subject::Geography => "geography_score",
        }
    }
}

/// A full set of seven scores. Serializes to the flat
/// `{math_score, ..., geography_score}` shape the predictor expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectScores {
    pub math_score: i32,
    pub history_score: i32,
    pub physics_score: i32,
    pub chemistry_score: i32,
    pub biology_score: i32,
    pub english_score: i32,
    pub geography_score: i32,
}

impl SubjectScores {
    pub fn get(&self, subject: Subject) -> i32 {
        match subject {
            Subject::Math => self.math_score,
            Subject::History => self.history_score,
            Subject::Physics => self.physics_score,
            Subject::Chemistry => self.chemistry_score,
            Subject::Biology => self.biology_score,
            Subject::English => self.english_score,
            Subject::Geography => self.geography_score,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Subject, i32)> + '_ {
        Subject::ALL.iter().map(move |&s| (s, self.get(s)))
    }

    /// Fails on the first score outside [0, 100], naming its field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.iter()
            .try_for_each(|(subject, value)| check_range(subject, value))
    }

    pub fn gpa(&self) -> f64 {
        compute_gpa(self.iter().map(|(_, v)| v)).unwrap_or(0.0)
    }
}

/// A partially filled score form. Unset fields are `None` and are ignored by
/// the GPA calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDraft {
    #[serde(default)]
    pub math_score: Option<i32>,
    #[serde(default)]
    pub history_score: Option<i32>,
    #[serde(default)]
    pub physics_score: Option<i32>,
    #[serde(default)]
    pub chemistry_score: Option<i32>,
    #[serde(default)]
    pub biology_score: Option<i32>,
    #[serde(default)]
    pub english_score: Option<i32>,
    #[serde(default)]
    pub geography_score: Option<i32>,
}

impl ScoreDraft {
    pub fn zeros() -> Self {
        Self::from(SubjectScores::default())
    }

    pub fn get(&self, subject: Subject) -> Option<i32> {
        match subject {
            Subject::Math => self.math_score,
            Subject::History => self.history_score,
            Subject::Physics => self.physics_score,
            Subject::Chemistry => self.chemistry_score,
            Subject::Biology => self.biology_score,
            Subject::English => self.english_score,
            Subject::Geography => self.geography_score,
        }
    }

    pub fn set(&mut self, subject: Subject, value: Option<i32>) {
        let slot = match subject {
            Subject::Math => &mut self.math_score,
            Subject::History => &mut self.history_score,
            Subject::Physics => &mut self.physics_score,
            Subject::Chemistry => &mut self.chemistry_score,
            Subject::Biology => &mut self.biology_score,
            Subject::English => &mut self.english_score,
            Subject::Geography => &mut self.geography_score,
        };
        *slot = value;
    }

    /// Applies every field present in `changes`. Nothing is applied if any
    /// changed value is out of range.
    pub fn apply(&mut self, changes: &ScoreDraft) -> Result<(), ValidationError> {
        for subject in Subject::ALL {
            if let Some(value) = changes.get(subject) {
                check_range(subject, value)?;
            }
        }
        for subject in Subject::ALL {
            if let Some(value) = changes.get(subject) {
                self.set(subject, Some(value));
            }
        }
        Ok(())
    }

    /// Mean of the set fields, or `None` when nothing is set.
    pub fn gpa(&self) -> Option<f64> {
        compute_gpa(Subject::ALL.iter().filter_map(|&s| self.get(s)))
    }

    /// Returns the full score set once all seven fields are filled.
    pub fn complete(&self) -> Option<SubjectScores> {
        Some(SubjectScores {
            math_score: self.math_score?,
            history_score: self.history_score?,
            physics_score: self.physics_score?,
            chemistry_score: self.chemistry_score?,
            biology_score: self.biology_score?,
            english_score: self.english_score?,
            geography_score: self.geography_score?,
        })
    }
}

impl From<SubjectScores> for ScoreDraft {
    fn from(scores: SubjectScores) -> Self {
        let mut draft = ScoreDraft::default();
        for (subject, value) in scores.iter() {
            draft.set(subject, Some(value));
        }
        draft
    }
}
