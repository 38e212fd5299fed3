use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::activities::{ActivitiesProfile, StudentActivitiesRow};
use crate::models::career::{CareerRecommendationRow, CareerRoadmapRow, UserPreferencesRow};
use crate::models::scores::AcademicScoreRow;
use crate::models::university::{SavedUniversityRow, UniversityPreferenceRow};
use crate::scores::SubjectScores;
use crate::store::{NewRecommendation, PreferencesPatch, ProfileStore};

/// PostgreSQL-backed store. "Latest" reads order by the row timestamp and take
/// one row; `fetch_optional` maps an empty result to the not-found outcome.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn latest_scores(&self, user_id: Uuid) -> Result<Option<AcademicScoreRow>, AppError> {
        Ok(sqlx::query_as::<_, AcademicScoreRow>(
            "SELECT * FROM academic_scores WHERE user_id = $1 ORDER BY recorded_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_scores(
        &self,
        user_id: Uuid,
        scores: &SubjectScores,
        gpa: f64,
    ) -> Result<AcademicScoreRow, AppError> {
        let row = sqlx::query_as::<_, AcademicScoreRow>(
            r#"
            INSERT INTO academic_scores
                (id, user_id, math_score, history_score, physics_score, chemistry_score,
                 biology_score, english_score, geography_score, gpa)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(scores.math_score)
        .bind(scores.history_score)
        .bind(scores.physics_score)
        .bind(scores.chemistry_score)
        .bind(scores.biology_score)
        .bind(scores.english_score)
        .bind(scores.geography_score)
        .bind(gpa)
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted academic scores {} for user {user_id}", row.id);
        Ok(row)
    }

    async fn latest_recommendation(
        &self,
        user_id: Uuid,
    ) -> Result<Option<CareerRecommendationRow>, AppError> {
        Ok(sqlx::query_as::<_, CareerRecommendationRow>(
            "SELECT * FROM career_recommendations WHERE user_id = $1 ORDER BY recommended_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_recommendation(
        &self,
        new: NewRecommendation<'_>,
    ) -> Result<CareerRecommendationRow, AppError> {
        Ok(sqlx::query_as::<_, CareerRecommendationRow>(
            r#"
            INSERT INTO career_recommendations
                (id, user_id, recommended_career, confidence_score, career_details)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.career)
        .bind(new.confidence_score)
        .bind(new.career_details)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn latest_roadmap(
        &self,
        user_id: Uuid,
        career: &str,
    ) -> Result<Option<CareerRoadmapRow>, AppError> {
        Ok(sqlx::query_as::<_, CareerRoadmapRow>(
            r#"
            SELECT * FROM career_roadmaps
            WHERE user_id = $1 AND career = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(career)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_roadmap(
        &self,
        user_id: Uuid,
        career: &str,
        roadmap_steps: &Value,
    ) -> Result<CareerRoadmapRow, AppError> {
        Ok(sqlx::query_as::<_, CareerRoadmapRow>(
            r#"
            INSERT INTO career_roadmaps (id, user_id, career, roadmap_steps, current_step, completed_steps)
            VALUES ($1, $2, $3, $4, 1, '{}')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(career)
        .bind(roadmap_steps)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_roadmap_progress(
        &self,
        roadmap_id: Uuid,
        completed_steps: &[i32],
        current_step: i32,
    ) -> Result<Option<CareerRoadmapRow>, AppError> {
        Ok(sqlx::query_as::<_, CareerRoadmapRow>(
            r#"
            UPDATE career_roadmaps
            SET completed_steps = $2, current_step = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(roadmap_id)
        .bind(completed_steps)
        .bind(current_step)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn latest_university_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UniversityPreferenceRow>, AppError> {
        Ok(sqlx::query_as::<_, UniversityPreferenceRow>(
            "SELECT * FROM university_preferences WHERE user_id = $1 ORDER BY updated_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn upsert_university_preferences(
        &self,
        user_id: Uuid,
        universities: &[String],
    ) -> Result<UniversityPreferenceRow, AppError> {
        Ok(sqlx::query_as::<_, UniversityPreferenceRow>(
            r#"
            INSERT INTO university_preferences (id, user_id, preferred_universities)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
                SET preferred_universities = EXCLUDED.preferred_universities,
                    updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(universities)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn insert_saved_university(
        &self,
        user_id: Uuid,
        university_name: &str,
        notes: Option<&str>,
    ) -> Result<SavedUniversityRow, AppError> {
        Ok(sqlx::query_as::<_, SavedUniversityRow>(
            r#"
            INSERT INTO saved_universities (id, user_id, university_name, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(university_name)
        .bind(notes)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn saved_universities(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SavedUniversityRow>, AppError> {
        Ok(sqlx::query_as::<_, SavedUniversityRow>(
            "SELECT * FROM saved_universities WHERE user_id = $1 ORDER BY saved_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn activities(&self, user_id: Uuid) -> Result<Option<StudentActivitiesRow>, AppError> {
        Ok(sqlx::query_as::<_, StudentActivitiesRow>(
            "SELECT * FROM student_activities WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn upsert_activities(
        &self,
        user_id: Uuid,
        profile: &ActivitiesProfile,
    ) -> Result<StudentActivitiesRow, AppError> {
        Ok(sqlx::query_as::<_, StudentActivitiesRow>(
            r#"
            INSERT INTO student_activities
                (user_id, preferred_study_time, study_environment, learning_style, study_methods,
                 academic_interests, extracurricular_activities, career_interests, skills)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO UPDATE SET
                preferred_study_time = EXCLUDED.preferred_study_time,
                study_environment = EXCLUDED.study_environment,
                learning_style = EXCLUDED.learning_style,
                study_methods = EXCLUDED.study_methods,
                academic_interests = EXCLUDED.academic_interests,
                extracurricular_activities = EXCLUDED.extracurricular_activities,
                career_interests = EXCLUDED.career_interests,
                skills = EXCLUDED.skills,
                recorded_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&profile.preferred_study_time)
        .bind(&profile.study_environment)
        .bind(&profile.learning_style)
        .bind(&profile.study_methods)
        .bind(&profile.academic_interests)
        .bind(&profile.extracurricular_activities)
        .bind(&profile.career_interests)
        .bind(&profile.skills)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn user_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserPreferencesRow>, AppError> {
        Ok(sqlx::query_as::<_, UserPreferencesRow>(
            "SELECT * FROM user_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn upsert_user_preferences(
        &self,
        user_id: Uuid,
        patch: PreferencesPatch,
    ) -> Result<UserPreferencesRow, AppError> {
        Ok(sqlx::query_as::<_, UserPreferencesRow>(
            r#"
            INSERT INTO user_preferences
                (user_id, preferred_career_fields, salary_expectations,
                 work_life_balance_preference, preferred_universities)
            VALUES ($1, COALESCE($2, '{}'::TEXT[]), $3, $4, COALESCE($5, '{}'::TEXT[]))
            ON CONFLICT (user_id) DO UPDATE SET
                preferred_career_fields = COALESCE($2, user_preferences.preferred_career_fields),
                salary_expectations = COALESCE($3, user_preferences.salary_expectations),
                work_life_balance_preference =
                    COALESCE($4, user_preferences.work_life_balance_preference),
                preferred_universities = COALESCE($5, user_preferences.preferred_universities),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(patch.preferred_career_fields)
        .bind(patch.salary_expectations)
        .bind(patch.work_life_balance_preference)
        .bind(patch.preferred_universities)
        .fetch_one(&self.pool)
        .await?)
    }
}
