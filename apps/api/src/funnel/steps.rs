use serde::{Deserialize, Serialize};

/// Stages of the recommendation funnel, numbered 1 to 5 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    AcademicScores = 1,
    Prediction = 2,
    Universities = 3,
    Alternatives = 4,
    Roadmap = 5,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::AcademicScores,
        Step::Prediction,
        Step::Universities,
        Step::Alternatives,
        Step::Roadmap,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::AcademicScores => "Academic Scores",
            Step::Prediction => "Prediction",
            Step::Universities => "Universities",
            Step::Alternatives => "Alternatives",
            Step::Roadmap => "Roadmap",
        }
    }

    /// Steps that must all have results before this one can be entered.
    pub fn prerequisites(self) -> impl Iterator<Item = Step> {
        Step::ALL.into_iter().take_while(move |s| *s < self)
    }
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Step::ALL
            .into_iter()
            .find(|s| s.number() == value)
            .ok_or_else(|| format!("step must be between 1 and 5, got {value}"))
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> u8 {
        step.number()
    }
}
