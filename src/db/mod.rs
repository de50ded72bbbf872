pub mod seed;

use crate::domain::models::{FitnessLevel, Goal, UserRole};
use crate::domain::validation::{NewAccount, ProfileChanges, WorkoutPlanFields};
use crate::services::nutrition::{NutritionInput, NutritionPlan};
use crate::services::workout::{WorkoutInput, WorkoutPlan};
use anyhow::{Context, Result};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, SaltString},
    Argon2, PasswordVerifier,
};
use chrono::{DateTime, NaiveDate, Utc};
use rand_core::OsRng;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const USER_COLUMNS: &str = r#"
    id, first_name, last_name, email, hash, date_of_birth, role, phone, gender,
    height, weight, age, daily_calories, protein_intake, carb_intake, fat_intake,
    goal, activity_level, fitness_level, gym_days_per_week, session_duration,
    is_active, created_at, updated_at
"#;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hash: String,
    pub date_of_birth: Option<NaiveDate>,
    pub role: UserRole,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub age: Option<f64>,
    pub daily_calories: Option<i64>,
    pub protein_intake: Option<i64>,
    pub carb_intake: Option<i64>,
    pub fat_intake: Option<i64>,
    pub goal: Option<String>,
    pub activity_level: Option<String>,
    pub fitness_level: Option<String>,
    pub gym_days_per_week: Option<i32>,
    pub session_duration: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The stored plan, present once all four macro fields have been written.
    pub fn nutrition_plan(&self) -> Option<StoredNutrition> {
        Some(StoredNutrition {
            daily_calories: self.daily_calories?,
            protein_intake: self.protein_intake?,
            carb_intake: self.carb_intake?,
            fat_intake: self.fat_intake?,
            weight: self.weight,
            height: self.height,
            goal: self.goal.clone(),
            activity_level: self.activity_level.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredNutrition {
    pub daily_calories: i64,
    pub protein_intake: i64,
    pub carb_intake: i64,
    pub fat_intake: i64,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub goal: Option<String>,
    pub activity_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlanRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub goal: String,
    pub fitness_level: String,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlanAssignment {
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub name: String,
    pub goal: String,
    pub fitness_level: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserWorkoutRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub goal: String,
    pub fitness_level: String,
    pub gym_days_per_week: i32,
    pub session_duration: String,
    pub workout_split: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserListing {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

// ---------------------------------------------------------------------------
// users

pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// True when another user already holds the email or the phone number.
pub async fn contact_taken(pool: &PgPool, email: Option<&str>, phone: Option<&str>, except: Option<Uuid>) -> Result<bool> {
    if email.is_none() && phone.is_none() {
        return Ok(false);
    }
    let taken: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM users
            WHERE (email = $1 OR ($2::text IS NOT NULL AND phone = $2))
              AND ($3::uuid IS NULL OR id <> $3)
        )
        "#,
    )
    .bind(email)
    .bind(phone)
    .bind(except)
    .fetch_one(pool)
    .await?;
    Ok(taken)
}

pub async fn insert_user(pool: &PgPool, account: &NewAccount, role: UserRole) -> Result<DbUser> {
    let hash = hash_password(&account.password)?;
    let user = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        INSERT INTO users (id, first_name, last_name, email, hash, date_of_birth, role, phone)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(&account.first_name)
    .bind(&account.last_name)
    .bind(&account.email)
    .bind(hash)
    .bind(account.date_of_birth)
    .bind(role)
    .bind(&account.phone)
    .fetch_one(pool)
    .await
    .context("insert user")?;
    Ok(user)
}

pub async fn update_password(pool: &PgPool, user_id: Uuid, new_password: &str) -> Result<()> {
    let hash = hash_password(new_password)?;
    sqlx::query("UPDATE users SET hash = $2, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .bind(hash)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_profile(pool: &PgPool, user_id: Uuid, changes: &ProfileChanges) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        UPDATE users SET
            first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            email = COALESCE($4, email),
            phone = COALESCE($5, phone),
            height = COALESCE($6, height),
            weight = COALESCE($7, weight),
            age = COALESCE($8, age),
            goal = COALESCE($9, goal),
            activity_level = COALESCE($10, activity_level),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(user_id)
    .bind(&changes.first_name)
    .bind(&changes.last_name)
    .bind(&changes.email)
    .bind(&changes.phone)
    .bind(changes.height)
    .bind(changes.weight)
    .bind(changes.age)
    .bind(changes.goal.map(|g| g.as_str()))
    .bind(changes.activity_level.map(|a| a.as_str()))
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn save_nutrition(pool: &PgPool, user_id: Uuid, input: &NutritionInput, plan: &NutritionPlan) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE users SET
            weight = $2, height = $3, age = $4, gender = $5, goal = $6, activity_level = $7,
            daily_calories = $8, protein_intake = $9, carb_intake = $10, fat_intake = $11,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(input.weight)
    .bind(input.height)
    .bind(input.age)
    .bind(input.gender.as_str())
    .bind(input.goal.as_str())
    .bind(input.activity_level.as_str())
    .bind(plan.daily_calories)
    .bind(plan.protein_intake)
    .bind(plan.carb_intake)
    .bind(plan.fat_intake)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn save_workout_preferences(pool: &PgPool, user_id: Uuid, input: &WorkoutInput) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users SET
            gym_days_per_week = $2, fitness_level = $3, gender = $4,
            session_duration = $5, goal = $6, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(input.gym_days_per_week)
    .bind(input.fitness_level.as_str())
    .bind(input.gender.as_str())
    .bind(input.session_duration.as_str())
    .bind(input.goal.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_user(pool: &PgPool, user_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Flips `is_active` and returns the new value.
pub async fn toggle_user_active(pool: &PgPool, user_id: Uuid) -> Result<Option<bool>> {
    let active: Option<bool> = sqlx::query_scalar(
        "UPDATE users SET is_active = NOT is_active, updated_at = NOW() WHERE id = $1 RETURNING is_active",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(active)
}

pub async fn get_all_users(pool: &PgPool) -> Result<Vec<DbUser>> {
    let users = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {} FROM users ORDER BY created_at DESC",
        USER_COLUMNS
    ))
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn list_members(pool: &PgPool) -> Result<Vec<UserListing>> {
    let users = sqlx::query_as::<_, UserListing>(
        r#"
        SELECT id, first_name, last_name, email, created_at
        FROM users
        WHERE role = 'user'
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(users)
}

// ---------------------------------------------------------------------------
// workout plans

pub async fn plan_name_taken(pool: &PgPool, name: &str, except: Option<Uuid>) -> Result<bool> {
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM workout_plans WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(name)
    .bind(except)
    .fetch_one(pool)
    .await?;
    Ok(taken)
}

pub async fn insert_workout_plan(pool: &PgPool, fields: &WorkoutPlanFields, file_name: &str) -> Result<WorkoutPlanRecord> {
    let plan = sqlx::query_as::<_, WorkoutPlanRecord>(
        r#"
        INSERT INTO workout_plans (id, name, description, goal, fitness_level, file_name)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, description, goal, fitness_level, file_name, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.goal.map(|g| g.as_str()))
    .bind(fields.fitness_level.map(|l| l.as_str()))
    .bind(file_name)
    .fetch_one(pool)
    .await
    .context("insert workout plan")?;
    Ok(plan)
}

pub async fn get_workout_plan(pool: &PgPool, id: Uuid) -> Result<Option<WorkoutPlanRecord>> {
    let plan = sqlx::query_as::<_, WorkoutPlanRecord>(
        r#"
        SELECT id, name, description, goal, fitness_level, file_name, created_at, updated_at
        FROM workout_plans WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(plan)
}

pub async fn get_all_workout_plans(pool: &PgPool) -> Result<Vec<WorkoutPlanRecord>> {
    let plans = sqlx::query_as::<_, WorkoutPlanRecord>(
        r#"
        SELECT id, name, description, goal, fitness_level, file_name, created_at, updated_at
        FROM workout_plans ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(plans)
}

pub async fn update_workout_plan(
    pool: &PgPool,
    id: Uuid,
    fields: &WorkoutPlanFields,
    file_name: Option<&str>,
) -> Result<Option<WorkoutPlanRecord>> {
    let plan = sqlx::query_as::<_, WorkoutPlanRecord>(
        r#"
        UPDATE workout_plans SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            goal = COALESCE($4, goal),
            fitness_level = COALESCE($5, fitness_level),
            file_name = COALESCE($6, file_name),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, description, goal, fitness_level, file_name, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.goal.map(|g| g.as_str()))
    .bind(fields.fitness_level.map(|l| l.as_str()))
    .bind(file_name)
    .fetch_optional(pool)
    .await?;
    Ok(plan)
}

pub async fn delete_workout_plan(pool: &PgPool, id: Uuid) -> Result<Option<WorkoutPlanRecord>> {
    let plan = sqlx::query_as::<_, WorkoutPlanRecord>(
        r#"
        DELETE FROM workout_plans WHERE id = $1
        RETURNING id, name, description, goal, fitness_level, file_name, created_at, updated_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(plan)
}

pub async fn find_matching_plan(pool: &PgPool, goal: Goal, level: FitnessLevel) -> Result<Option<WorkoutPlanRecord>> {
    let plan = sqlx::query_as::<_, WorkoutPlanRecord>(
        r#"
        SELECT id, name, description, goal, fitness_level, file_name, created_at, updated_at
        FROM workout_plans
        WHERE goal = $1 AND fitness_level = $2
        ORDER BY created_at
        LIMIT 1
        "#,
    )
    .bind(goal.as_str())
    .bind(level.as_str())
    .fetch_optional(pool)
    .await?;
    Ok(plan)
}

/// Returns false when the pair already existed.
pub async fn assign_plan(pool: &PgPool, user_id: Uuid, plan_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        "INSERT INTO user_workout_plans (user_id, plan_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(plan_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn plans_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<WorkoutPlanRecord>> {
    let plans = sqlx::query_as::<_, WorkoutPlanRecord>(
        r#"
        SELECT p.id, p.name, p.description, p.goal, p.fitness_level, p.file_name, p.created_at, p.updated_at
        FROM workout_plans p
        JOIN user_workout_plans a ON a.plan_id = p.id
        WHERE a.user_id = $1
        ORDER BY a.assigned_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(plans)
}

pub async fn get_all_assignments(pool: &PgPool) -> Result<Vec<PlanAssignment>> {
    let rows = sqlx::query_as::<_, PlanAssignment>(
        r#"
        SELECT a.user_id, a.plan_id, p.name, p.goal, p.fitness_level
        FROM user_workout_plans a
        JOIN workout_plans p ON p.id = a.plan_id
        ORDER BY a.assigned_at
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// generated workouts

pub async fn insert_user_workout(pool: &PgPool, user_id: Uuid, user_name: &str, plan: &WorkoutPlan) -> Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO user_workouts
            (id, user_id, user_name, goal, fitness_level, gym_days_per_week, session_duration,
             workout_split, weekly_plan, recommendations, general_tips)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(user_name)
    .bind(plan.summary.goal.as_str())
    .bind(plan.summary.fitness_level.as_str())
    .bind(plan.summary.gym_days_per_week)
    .bind(plan.summary.session_duration.as_str())
    .bind(&plan.summary.workout_split)
    .bind(serde_json::to_value(&plan.weekly_plan)?)
    .bind(serde_json::to_value(&plan.recommendations)?)
    .bind(serde_json::to_value(&plan.general_tips)?)
    .execute(pool)
    .await
    .context("insert user workout")?;
    Ok(id)
}

pub async fn get_all_user_workouts(pool: &PgPool) -> Result<Vec<UserWorkoutRecord>> {
    let rows = sqlx::query_as::<_, UserWorkoutRecord>(
        r#"
        SELECT id, user_id, user_name, goal, fitness_level, gym_days_per_week, session_duration, workout_split, created_at
        FROM user_workouts
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// dashboard counts; all restricted to role `user`

pub async fn count_members(pool: &PgPool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'user'")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_active_members(pool: &PgPool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'user' AND is_active = true")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Members created in `[from, to)`; an open end counts up to now.
pub async fn count_signups_between(pool: &PgPool, from: DateTime<Utc>, to: Option<DateTime<Utc>>) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM users
        WHERE role = 'user' AND created_at >= $1 AND ($2::timestamptz IS NULL OR created_at < $2)
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Members whose record changed in `[from, to)`.
pub async fn count_updated_between(pool: &PgPool, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM users WHERE role = 'user' AND updated_at >= $1 AND updated_at < $2",
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// (members created before `before`, those among them holding at least one plan).
/// `None` counts everyone.
pub async fn count_members_with_plans(pool: &PgPool, before: Option<DateTime<Utc>>) -> Result<(i64, i64)> {
    let row: (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COUNT(*) FILTER (
                WHERE EXISTS (SELECT 1 FROM user_workout_plans a WHERE a.user_id = u.id)
            )
        FROM users u
        WHERE u.role = 'user'
          AND ($1::timestamptz IS NULL OR u.created_at < $1)
        "#,
    )
    .bind(before)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> DbUser {
        let now = Utc::now();
        DbUser {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            hash: "secret-hash".into(),
            date_of_birth: None,
            role: UserRole::User,
            phone: None,
            gender: None,
            height: None,
            weight: None,
            age: None,
            daily_calories: None,
            protein_intake: None,
            carb_intake: None,
            fat_intake: None,
            goal: None,
            activity_level: None,
            fitness_level: None,
            gym_days_per_week: None,
            session_duration: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "not-a-hash"));
    }

    #[test]
    fn test_user_serialization_hides_hash() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("hash").is_none());
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["role"], "user");
        assert_eq!(json["isActive"], true);
    }

    #[test]
    fn test_nutrition_plan_requires_all_macros() {
        let mut user = sample_user();
        assert!(user.nutrition_plan().is_none());

        user.daily_calories = Some(2759);
        user.protein_intake = Some(207);
        user.carb_intake = Some(276);
        assert!(user.nutrition_plan().is_none());

        user.fat_intake = Some(92);
        user.goal = Some("fitness".into());
        let plan = user.nutrition_plan().unwrap();
        assert_eq!(plan.daily_calories, 2759);
        assert_eq!(plan.fat_intake, 92);
        assert_eq!(plan.goal.as_deref(), Some("fitness"));
        assert_eq!(user.full_name(), "Ada Lovelace");
    }
}
