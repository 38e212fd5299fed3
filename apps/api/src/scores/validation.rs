use thiserror::Error;

use crate::scores::Subject;

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

/// A score outside [0, 100]. Raised before any upstream call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {}. Must be between 0 and 100.", .field.replace('_', " "))]
pub struct ValidationError {
    pub field: &'static str,
    pub value: i32,
}

pub fn check_range(subject: Subject, value: i32) -> Result<(), ValidationError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError {
            field: subject.field(),
            value,
        })
    }
}
