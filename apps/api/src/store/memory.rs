use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::activities::{ActivitiesProfile, StudentActivitiesRow};
use crate::models::career::{CareerRecommendationRow, CareerRoadmapRow, UserPreferencesRow};
use crate::models::scores::AcademicScoreRow;
use crate::models::university::{SavedUniversityRow, UniversityPreferenceRow};
use crate::scores::SubjectScores;
use crate::store::{NewRecommendation, PreferencesPatch, ProfileStore};

#[derive(Default)]
struct Tables {
    academic_scores: Vec<AcademicScoreRow>,
    career_recommendations: Vec<CareerRecommendationRow>,
    career_roadmaps: Vec<CareerRoadmapRow>,
    university_preferences: Vec<UniversityPreferenceRow>,
    saved_universities: Vec<SavedUniversityRow>,
    student_activities: Vec<StudentActivitiesRow>,
    user_preferences: Vec<UserPreferencesRow>,
}

/// In-process store used when no database is configured. Same semantics as
/// `PgStore`; contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn latest_scores(&self, user_id: Uuid) -> Result<Option<AcademicScoreRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .academic_scores
            .iter()
            .filter(|r| r.user_id == user_id)
            .max_by_key(|r| r.recorded_at)
            .cloned())
    }

    async fn insert_scores(
        &self,
        user_id: Uuid,
        scores: &SubjectScores,
        gpa: f64,
    ) -> Result<AcademicScoreRow, AppError> {
        let row = AcademicScoreRow {
            id: Uuid::new_v4(),
            user_id,
            math_score: scores.math_score,
            history_score: scores.history_score,
            physics_score: scores.physics_score,
            chemistry_score: scores.chemistry_score,
            biology_score: scores.biology_score,
            english_score: scores.english_score,
            geography_score: scores.geography_score,
            gpa,
            recorded_at: Utc::now(),
        };
        self.tables.write().await.academic_scores.push(row.clone());
        Ok(row)
    }

    async fn latest_recommendation(
        &self,
        user_id: Uuid,
    ) -> Result<Option<CareerRecommendationRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .career_recommendations
            .iter()
            .filter(|r| r.user_id == user_id)
            .max_by_key(|r| r.recommended_at)
            .cloned())
    }

    async fn insert_recommendation(
        &self,
        new: NewRecommendation<'_>,
    ) -> Result<CareerRecommendationRow, AppError> {
        let row = CareerRecommendationRow {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            recommended_career: new.career.to_string(),
            confidence_score: new.confidence_score,
            career_details: new.career_details.cloned(),
            recommended_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .career_recommendations
            .push(row.clone());
        Ok(row)
    }

    async fn latest_roadmap(
        &self,
        user_id: Uuid,
        career: &str,
    ) -> Result<Option<CareerRoadmapRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .career_roadmaps
            .iter()
            .filter(|r| r.user_id == user_id && r.career == career)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn insert_roadmap(
        &self,
        user_id: Uuid,
        career: &str,
        roadmap_steps: &Value,
    ) -> Result<CareerRoadmapRow, AppError> {
        let now = Utc::now();
        let row = CareerRoadmapRow {
            id: Uuid::new_v4(),
            user_id,
            career: career.to_string(),
            roadmap_steps: roadmap_steps.clone(),
            current_step: 1,
            completed_steps: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.career_roadmaps.push(row.clone());
        Ok(row)
    }

    async fn update_roadmap_progress(
        &self,
        roadmap_id: Uuid,
        completed_steps: &[i32],
        current_step: i32,
    ) -> Result<Option<CareerRoadmapRow>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .career_roadmaps
            .iter_mut()
            .find(|r| r.id == roadmap_id)
            .map(|row| {
                row.completed_steps = completed_steps.to_vec();
                row.current_step = current_step;
                row.updated_at = Utc::now();
                row.clone()
            }))
    }

    async fn latest_university_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UniversityPreferenceRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .university_preferences
            .iter()
            .find(|r| r.user_id == user_id)
            .cloned())
    }

    async fn upsert_university_preferences(
        &self,
        user_id: Uuid,
        universities: &[String],
    ) -> Result<UniversityPreferenceRow, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        if let Some(row) = tables
            .university_preferences
            .iter_mut()
            .find(|r| r.user_id == user_id)
        {
            row.preferred_universities = universities.to_vec();
            row.updated_at = now;
            return Ok(row.clone());
        }
        let row = UniversityPreferenceRow {
            id: Uuid::new_v4(),
            user_id,
            preferred_universities: universities.to_vec(),
            created_at: now,
            updated_at: now,
        };
        tables.university_preferences.push(row.clone());
        Ok(row)
    }

    async fn insert_saved_university(
        &self,
        user_id: Uuid,
        university_name: &str,
        notes: Option<&str>,
    ) -> Result<SavedUniversityRow, AppError> {
        let row = SavedUniversityRow {
            id: Uuid::new_v4(),
            user_id,
            university_name: university_name.to_string(),
            notes: notes.map(str::to_string),
            saved_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .saved_universities
            .push(row.clone());
        Ok(row)
    }

    async fn saved_universities(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SavedUniversityRow>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<_> = tables
            .saved_universities
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        // Stable sort keeps later inserts first among equal timestamps.
        rows.reverse();
        rows.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(rows)
    }

    async fn activities(&self, user_id: Uuid) -> Result<Option<StudentActivitiesRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .student_activities
            .iter()
            .find(|r| r.user_id == user_id)
            .cloned())
    }

    async fn upsert_activities(
        &self,
        user_id: Uuid,
        profile: &ActivitiesProfile,
    ) -> Result<StudentActivitiesRow, AppError> {
        let mut tables = self.tables.write().await;
        let row = StudentActivitiesRow {
            user_id,
            profile: profile.clone(),
            recorded_at: Utc::now(),
        };
        tables.student_activities.retain(|r| r.user_id != user_id);
        tables.student_activities.push(row.clone());
        Ok(row)
    }

    async fn user_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserPreferencesRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_preferences
            .iter()
            .find(|r| r.user_id == user_id)
            .cloned())
    }

    async fn upsert_user_preferences(
        &self,
        user_id: Uuid,
        patch: PreferencesPatch,
    ) -> Result<UserPreferencesRow, AppError> {
        let mut tables = self.tables.write().await;
        let index = match tables.user_preferences.iter().position(|r| r.user_id == user_id) {
            Some(index) => index,
            None => {
                tables.user_preferences.push(UserPreferencesRow {
                    user_id,
                    preferred_career_fields: Vec::new(),
                    salary_expectations: None,
                    work_life_balance_preference: None,
                    preferred_universities: Vec::new(),
                    updated_at: Utc::now(),
                });
                tables.user_preferences.len() - 1
            }
        };

        let row = &mut tables.user_preferences[index];
        if let Some(fields) = patch.preferred_career_fields {
            row.preferred_career_fields = fields;
        }
        if patch.salary_expectations.is_some() {
            row.salary_expectations = patch.salary_expectations;
        }
        if patch.work_life_balance_preference.is_some() {
            row.work_life_balance_preference = patch.work_life_balance_preference;
        }
        if let Some(universities) = patch.preferred_universities {
            row.preferred_universities = universities;
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_latest_read_is_none_when_empty() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        assert!(store.latest_scores(user).await.unwrap().is_none());
        assert!(store.latest_recommendation(user).await.unwrap().is_none());
        assert!(store.latest_roadmap(user, "Doctor").await.unwrap().is_none());
        assert!(store.activities(user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_scores_returns_most_recent_insert() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let mut scores = SubjectScores::default();
        store.insert_scores(user, &scores, 0.0).await.unwrap();
        scores.math_score = 70;
        store.insert_scores(user, &scores, 10.0).await.unwrap();

        let latest = store.latest_scores(user).await.unwrap().unwrap();
        assert_eq!(latest.math_score, 70);
        assert_eq!(latest.gpa, 10.0);
    }

    #[tokio::test]
    async fn test_reads_are_scoped_to_user() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        store
            .insert_saved_university(owner, "MIT", None)
            .await
            .unwrap();
        assert!(store
            .saved_universities(Uuid::new_v4())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_university_preferences_upsert_overwrites() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store
            .upsert_university_preferences(user, &["MIT".to_string()])
            .await
            .unwrap();
        let row = store
            .upsert_university_preferences(user, &["Yale University".to_string()])
            .await
            .unwrap();
        assert_eq!(row.preferred_universities, vec!["Yale University"]);
        let latest = store
            .latest_university_preferences(user)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, row.id);
    }

    #[tokio::test]
    async fn test_preferences_patch_keeps_unset_fields() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store
            .upsert_user_preferences(
                user,
                PreferencesPatch {
                    preferred_career_fields: Some(vec!["Doctor".into()]),
                    salary_expectations: Some("$200k".into()),
                    ..PreferencesPatch::default()
                },
            )
            .await
            .unwrap();
        let row = store
            .upsert_user_preferences(
                user,
                PreferencesPatch {
                    preferred_universities: Some(vec!["Harvard University".into()]),
                    ..PreferencesPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(row.preferred_career_fields, vec!["Doctor"]);
        assert_eq!(row.salary_expectations.as_deref(), Some("$200k"));
        assert_eq!(row.preferred_universities, vec!["Harvard University"]);
    }

    #[tokio::test]
    async fn test_update_missing_roadmap_is_none() {
        let store = MemoryStore::new();
        let updated = store
            .update_roadmap_progress(Uuid::new_v4(), &[0], 1)
            .await
            .unwrap();
        assert!(updated.is_none());
    }
}
