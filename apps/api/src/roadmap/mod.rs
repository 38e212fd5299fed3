// Career roadmap: generated once per (user, career), then tracked milestone
// by milestone.

pub mod handlers;
pub mod service;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::models::career::CareerRoadmapRow;

/// Field of `roadmap_steps` holding the trackable milestones.
pub const MILESTONES_FIELD: &str = "timeline_milestones";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapView {
    pub roadmap_id: Uuid,
    pub career: String,
    pub roadmap_steps: Value,
    pub current_step: i32,
    pub completed_steps: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CareerRoadmapRow> for RoadmapView {
    fn from(row: CareerRoadmapRow) -> Self {
        Self {
            roadmap_id: row.id,
            career: row.career,
            roadmap_steps: row.roadmap_steps,
            current_step: row.current_step,
            completed_steps: row.completed_steps,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub fn milestone_count(roadmap_steps: &Value) -> usize {
    roadmap_steps
        .get(MILESTONES_FIELD)
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

/// One past the highest completed index, or 1 when nothing is complete.
pub fn next_step(completed: &[i32]) -> i32 {
    completed.iter().max().map_or(1, |max| max + 1)
}

/// Adds `index` to the completed set, kept sorted. Returns `None` when it was
/// already there.
pub fn mark_complete(completed: &[i32], index: i32) -> Option<Vec<i32>> {
    if completed.contains(&index) {
        return None;
    }
    let mut updated = completed.to_vec();
    updated.push(index);
    updated.sort_unstable();
    Some(updated)
}
