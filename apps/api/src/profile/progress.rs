//! Dashboard checklist. Each item's status depends only on which rows exist
//! for the user.

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::store::ProfileStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Completed,
    Ready,
    Incomplete,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChecklistItem {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub status: ItemStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub profile_items: Vec<ChecklistItem>,
    pub planning_items: Vec<ChecklistItem>,
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

/// Which of the user's rows exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressInputs {
    pub has_scores: bool,
    pub has_activities: bool,
    pub has_recommendation: bool,
    pub has_university_snapshot: bool,
    pub has_preferences: bool,
}

fn item(
    id: &'static str,
    title: &'static str,
    subtitle: &'static str,
    status: ItemStatus,
) -> ChecklistItem {
    ChecklistItem {
        id,
        title,
        subtitle,
        status,
    }
}

fn done_or(flag: bool, otherwise: ItemStatus) -> ItemStatus {
    if flag {
        ItemStatus::Completed
    } else {
        otherwise
    }
}

pub fn build_report(inputs: ProgressInputs) -> ProgressReport {
    use ItemStatus::{Incomplete, Ready};

    let profile_items = vec![
        item(
            "academic",
            "Academic Scores",
            "Enter your grades and academic achievements",
            done_or(inputs.has_scores, Incomplete),
        ),
        item(
            "activities",
            "Activities & Preferences",
            "Tell us about your study habits and interests",
            done_or(inputs.has_activities, Incomplete),
        ),
    ];

    // The roadmap is never marked completed, only ready once a career exists.
    let planning_items = vec![
        item(
            "prediction",
            "Career Prediction",
            "Generate your personalized career recommendations",
            done_or(inputs.has_recommendation, Ready),
        ),
        item(
            "universities",
            "University Recommendations",
            "View recommended universities based on your profile",
            done_or(inputs.has_university_snapshot, Incomplete),
        ),
        item(
            "alternatives",
            "Alternative Careers",
            "Explore related career options and alternatives",
            done_or(inputs.has_preferences, Incomplete),
        ),
        item(
            "roadmap",
            "Roadmap",
            "View your personalized career path",
            if inputs.has_recommendation {
                Ready
            } else {
                Incomplete
            },
        ),
    ];

    let total = profile_items.len() + planning_items.len();
    let completed = profile_items
        .iter()
        .chain(&planning_items)
        .filter(|i| i.status == ItemStatus::Completed)
        .count();
    let percentage = (completed as f64 / total as f64 * 100.0).round() as u32;

    ProgressReport {
        profile_items,
        planning_items,
        completed,
        total,
        percentage,
    }
}

/// Runs the five existence lookups concurrently.
pub async fn load_inputs(
    store: &dyn ProfileStore,
    user_id: Uuid,
) -> Result<ProgressInputs, AppError> {
    let (scores, activities, recommendation, universities, preferences) = tokio::join!(
        store.latest_scores(user_id),
        store.activities(user_id),
        store.latest_recommendation(user_id),
        store.latest_university_preferences(user_id),
        store.user_preferences(user_id),
    );

    Ok(ProgressInputs {
        has_scores: scores?.is_some(),
        has_activities: activities?.is_some(),
        has_recommendation: recommendation?.is_some(),
        has_university_snapshot: universities?.is_some(),
        has_preferences: preferences?.is_some(),
    })
}
