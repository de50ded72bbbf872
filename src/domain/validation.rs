use crate::domain::models::{ActivityLevel, FitnessLevel, Gender, Goal, SessionDuration};
use crate::services::nutrition::NutritionInput;
use crate::services::workout::WorkoutInput;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

/// Every rule a payload broke, in field order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .0.join(", "))]
pub struct ValidationError(pub Vec<String>);

#[derive(Default)]
struct Violations(Vec<String>);

impl Violations {
    fn push(&mut self, msg: impl Into<String>) {
        self.0.push(msg.into());
    }

    fn check(&mut self, ok: bool, msg: &str) {
        if !ok {
            self.push(msg);
        }
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationError> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(ValidationError(self.0))
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

fn is_digits(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.len()) && value.chars().all(|c| c.is_ascii_digit())
}

fn char_len_between(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.trim().chars().count())
}

fn check_range(v: &mut Violations, value: Option<f64>, label: &str, unit: &str, min: f64, max: f64) {
    match value {
        None => v.push(format!("{label} is required")),
        Some(x) if x.is_nan() => v.push(format!("{label} must be a number")),
        Some(x) if x < min => v.push(format!("{label} must be at least {min} {unit}")),
        Some(x) if x > max => v.push(format!("{label} must not exceed {max} {unit}")),
        Some(_) => {}
    }
}

/// Accepts a JSON number or a numeric string. Anything else that is not null
/// becomes NaN so the range check reports it as not a number.
fn deserialize_loose_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(n.as_f64().unwrap_or(f64::NAN)),
        Some(Value::String(s)) => Some(s.trim().parse().unwrap_or(f64::NAN)),
        Some(_) => Some(f64::NAN),
    };
    Ok(number)
}

fn parse_gender(v: &mut Violations, raw: Option<&str>) -> Option<Gender> {
    match raw {
        None => {
            v.push("Gender is required");
            None
        }
        Some(g) => match Gender::try_from(g) {
            Ok(gender) => Some(gender),
            Err(_) => {
                v.push("Gender must be either male or female");
                None
            }
        },
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRequest {
    #[serde(default, deserialize_with = "deserialize_loose_number")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_loose_number")]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_loose_number")]
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
}

impl NutritionRequest {
    pub fn validate(&self) -> Result<NutritionInput, ValidationError> {
        let mut v = Violations::default();
        check_range(&mut v, self.weight, "Weight", "kg", 20.0, 500.0);
        check_range(&mut v, self.height, "Height", "cm", 50.0, 300.0);
        check_range(&mut v, self.age, "Age", "years", 10.0, 120.0);
        let gender = parse_gender(&mut v, self.gender.as_deref());

        let activity_level = self
            .activity_level
            .as_deref()
            .map(ActivityLevel::from)
            .unwrap_or_default();
        v.check(
            activity_level != ActivityLevel::Unrecognized,
            "Activity level must be one of sedentary, light, moderate, active, very_active",
        );

        let goal = self.goal.as_deref().map(Goal::from).unwrap_or_default();
        v.check(
            goal != Goal::Unrecognized,
            "Goal must be one of lose_weight, gain_muscle, maintain_weight, fitness",
        );

        v.finish(|| NutritionInput {
            weight: self.weight.unwrap_or_default(),
            height: self.height.unwrap_or_default(),
            age: self.age.unwrap_or_default(),
            gender: gender.unwrap_or(Gender::Female),
            activity_level,
            goal,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizeRequest {
    #[serde(default, deserialize_with = "deserialize_loose_number")]
    pub gym_days_per_week: Option<f64>,
    pub fitness_level: Option<String>,
    pub gender: Option<String>,
    pub session_duration: Option<String>,
    pub goal: Option<String>,
}

impl CustomizeRequest {
    pub fn validate(&self) -> Result<WorkoutInput, ValidationError> {
        let mut v = Violations::default();

        match self.gym_days_per_week {
            None => v.push("Gym days per week is required"),
            Some(d) if d.is_nan() => v.push("Gym days per week must be a number"),
            Some(d) if d.fract() != 0.0 => v.push("Gym days per week must be an integer"),
            Some(d) if d < 1.0 => v.push("Gym days per week must be at least 1"),
            Some(d) if d > 7.0 => v.push("Gym days per week cannot exceed 7"),
            Some(_) => {}
        }

        let fitness_level = match self.fitness_level.as_deref().map(FitnessLevel::from) {
            None => {
                v.push("Fitness level is required");
                None
            }
            Some(FitnessLevel::Unrecognized) => {
                v.push("Fitness level must be beginner, intermediate, or advanced");
                None
            }
            Some(level) => Some(level),
        };

        let gender = parse_gender(&mut v, self.gender.as_deref());

        let session_duration = match self.session_duration.as_deref() {
            None => {
                v.push("Session duration is required");
                None
            }
            Some(raw) => match SessionDuration::try_from(raw) {
                Ok(d) => Some(d),
                Err(_) => {
                    v.push("Session duration must be 30-45min, 45-60min, or 60-90min");
                    None
                }
            },
        };

        let goal = self.goal.as_deref().map(Goal::from).unwrap_or_default();
        v.check(goal.is_workout_goal(), "Goal must be one of lose_weight, gain_muscle, fitness");

        v.finish(|| WorkoutInput {
            gym_days_per_week: self.gym_days_per_week.unwrap_or_default() as i32,
            fitness_level: fitness_level.unwrap_or(FitnessLevel::Unrecognized),
            gender: gender.unwrap_or(Gender::Female),
            session_duration: session_duration.unwrap_or(SessionDuration::Medium),
            goal,
        })
    }
}

fn check_names(v: &mut Violations, first: Option<&str>, last: Option<&str>) {
    match first {
        Some(name) if char_len_between(name, 2, 50) => {}
        Some(_) => v.push("First name must be between 2 and 50 characters"),
        None => v.push("First name is required"),
    }
    match last {
        Some(name) if char_len_between(name, 2, 50) => {}
        Some(_) => v.push("Last name must be between 2 and 50 characters"),
        None => v.push("Last name is required"),
    }
}

fn check_credentials(v: &mut Violations, email: Option<&str>, password: Option<&str>, min_password: usize) {
    match email {
        Some(e) if is_valid_email(&normalize_email(e)) => {}
        Some(_) => v.push("Email must be a valid email"),
        None => v.push("Email is required"),
    }
    match password {
        Some(p) if p.chars().count() >= min_password => {}
        Some(_) => v.push(format!("Password must be at least {min_password} characters long")),
        None => v.push("Password is required"),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
}

/// A registration that passed validation.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self, today: NaiveDate) -> Result<NewAccount, ValidationError> {
        let mut v = Violations::default();
        check_names(&mut v, self.first_name.as_deref(), self.last_name.as_deref());
        check_credentials(&mut v, self.email.as_deref(), self.password.as_deref(), 6);
        match self.date_of_birth {
            None => v.push("Date of birth is required"),
            Some(dob) => v.check(dob <= today, "Date of birth must not be in the future"),
        }
        if let Some(phone) = &self.phone {
            v.check(is_digits(phone, 8, 15), "Phone number must be between 8 and 15 digits");
        }
        v.finish(|| self.account())
    }

    fn account(&self) -> NewAccount {
        NewAccount {
            first_name: self.first_name.as_deref().unwrap_or_default().trim().to_string(),
            last_name: self.last_name.as_deref().unwrap_or_default().trim().to_string(),
            email: normalize_email(self.email.as_deref().unwrap_or_default()),
            password: self.password.clone().unwrap_or_default(),
            date_of_birth: self.date_of_birth,
            phone: self.phone.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

impl AdminRequest {
    pub fn validate(&self) -> Result<NewAccount, ValidationError> {
        let mut v = Violations::default();
        check_names(&mut v, self.first_name.as_deref(), self.last_name.as_deref());
        check_credentials(&mut v, self.email.as_deref(), self.password.as_deref(), 6);
        if let Some(phone) = &self.phone {
            v.check(is_digits(phone, 8, 15), "Phone number must be between 8 and 15 digits");
        }
        v.check(self.role.as_deref() == Some("admin"), "Role must be admin");
        v.finish(|| NewAccount {
            first_name: self.first_name.as_deref().unwrap_or_default().trim().to_string(),
            last_name: self.last_name.as_deref().unwrap_or_default().trim().to_string(),
            email: normalize_email(self.email.as_deref().unwrap_or_default()),
            password: self.password.clone().unwrap_or_default(),
            date_of_birth: None,
            phone: self.phone.clone(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns the normalized email and the password.
    pub fn validate(&self) -> Result<(String, String), ValidationError> {
        let mut v = Violations::default();
        match self.email.as_deref() {
            Some(e) if is_valid_email(&normalize_email(e)) => {}
            Some(_) => v.push("Email must be a valid email"),
            None => v.push("Email is required"),
        }
        v.check(self.password.is_some(), "Password is required");
        v.finish(|| {
            (
                normalize_email(self.email.as_deref().unwrap_or_default()),
                self.password.clone().unwrap_or_default(),
            )
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

impl PasswordUpdateRequest {
    pub fn validate(&self) -> Result<(String, String), ValidationError> {
        let mut v = Violations::default();
        for (value, label) in [(&self.old_password, "Old password"), (&self.new_password, "New password")] {
            match value {
                Some(p) if p.chars().count() >= 5 => {}
                Some(_) => v.push(format!("{label} must be at least 5 characters long")),
                None => v.push(format!("{label} is required")),
            }
        }
        v.finish(|| {
            (
                self.old_password.clone().unwrap_or_default(),
                self.new_password.clone().unwrap_or_default(),
            )
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_number")]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_loose_number")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_loose_number")]
    pub age: Option<f64>,
    pub goal: Option<String>,
    pub activity_level: Option<String>,
}

/// Partial profile change; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub age: Option<f64>,
    pub goal: Option<Goal>,
    pub activity_level: Option<ActivityLevel>,
}

impl ProfileUpdateRequest {
    pub fn validate(&self) -> Result<ProfileChanges, ValidationError> {
        let mut v = Violations::default();
        if let Some(name) = &self.first_name {
            v.check(char_len_between(name, 2, 50), "First name must be between 2 and 50 characters");
        }
        if let Some(name) = &self.last_name {
            v.check(char_len_between(name, 2, 50), "Last name must be between 2 and 50 characters");
        }
        if let Some(email) = &self.email {
            v.check(is_valid_email(&normalize_email(email)), "Email must be a valid email");
        }
        if let Some(phone) = &self.phone {
            v.check(is_digits(phone, 6, 12), "Phone number must be between 6 and 12 digits");
        }
        if self.height.is_some() {
            check_range(&mut v, self.height, "Height", "cm", 50.0, 300.0);
        }
        if self.weight.is_some() {
            check_range(&mut v, self.weight, "Weight", "kg", 20.0, 500.0);
        }
        if self.age.is_some() {
            check_range(&mut v, self.age, "Age", "years", 10.0, 120.0);
        }
        let goal = self.goal.as_deref().map(Goal::from);
        if let Some(g) = goal {
            v.check(g != Goal::Unrecognized, "Goal must be one of lose_weight, gain_muscle, maintain_weight, fitness");
        }
        let activity_level = self.activity_level.as_deref().map(ActivityLevel::from);
        if let Some(level) = activity_level {
            v.check(
                level != ActivityLevel::Unrecognized,
                "Activity level must be one of sedentary, light, moderate, active, very_active",
            );
        }

        v.finish(|| ProfileChanges {
            first_name: self.first_name.as_deref().map(|s| s.trim().to_string()),
            last_name: self.last_name.as_deref().map(|s| s.trim().to_string()),
            email: self.email.as_deref().map(normalize_email),
            phone: self.phone.clone(),
            height: self.height,
            weight: self.weight,
            age: self.age,
            goal,
            activity_level,
        })
    }
}

/// Text fields of a workout-plan upload form.
#[derive(Debug, Default, Clone)]
pub struct WorkoutPlanForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub activity_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutPlanFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub goal: Option<Goal>,
    pub fitness_level: Option<FitnessLevel>,
}

impl WorkoutPlanForm {
    /// All fields required.
    pub fn validate_new(&self) -> Result<WorkoutPlanFields, ValidationError> {
        self.validate_fields(true)
    }

    /// Only fields present are checked.
    pub fn validate_update(&self) -> Result<WorkoutPlanFields, ValidationError> {
        self.validate_fields(false)
    }

    fn validate_fields(&self, required: bool) -> Result<WorkoutPlanFields, ValidationError> {
        let mut v = Violations::default();

        match self.name.as_deref() {
            Some(n) => v.check(char_len_between(n, 3, 100), "Name must be between 3 and 100 characters"),
            None if required => v.push("Name is required"),
            None => {}
        }
        match self.description.as_deref() {
            Some(d) => v.check(
                char_len_between(d, 10, 500),
                "Description must be between 10 and 500 characters",
            ),
            None if required => v.push("Description is required"),
            None => {}
        }

        let goal = self.goal.as_deref().map(Goal::from);
        match goal {
            Some(g) => v.check(g.is_workout_goal(), "Goal must be one of lose_weight, gain_muscle, fitness"),
            None if required => v.push("Goal is required"),
            None => {}
        }

        let fitness_level = self.activity_level.as_deref().map(FitnessLevel::from);
        match fitness_level {
            Some(l) => v.check(
                l != FitnessLevel::Unrecognized,
                "Activity level must be one of beginner, intermediate, advanced",
            ),
            None if required => v.push("Activity level is required"),
            None => {}
        }

        v.finish(|| WorkoutPlanFields {
            name: self.name.as_deref().map(|s| s.trim().to_string()),
            description: self.description.as_deref().map(|s| s.trim().to_string()),
            goal,
            fitness_level,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPlanRequest {
    pub user_id: Option<String>,
    pub plan_id: Option<String>,
}

impl AssignPlanRequest {
    pub fn validate(&self) -> Result<(Uuid, Uuid), ValidationError> {
        let mut v = Violations::default();
        let user_id = parse_id(&mut v, self.user_id.as_deref(), "User ID");
        let plan_id = parse_id(&mut v, self.plan_id.as_deref(), "Plan ID");
        match (user_id, plan_id) {
            (Some(u), Some(p)) => v.finish(|| (u, p)),
            _ => Err(ValidationError(v.0)),
        }
    }
}

fn parse_id(v: &mut Violations, raw: Option<&str>, label: &str) -> Option<Uuid> {
    match raw.map(str::trim) {
        None | Some("") => {
            v.push(format!("{label} is required"));
            None
        }
        Some(id) => match Uuid::parse_str(id) {
            Ok(id) => Some(id),
            Err(_) => {
                v.push(format!("{label} must be a valid id"));
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nutrition_defaults_and_conversion() {
        let req = NutritionRequest {
            weight: Some(80.0),
            height: Some(180.0),
            age: Some(30.0),
            gender: Some("male".into()),
            ..Default::default()
        };
        let input = req.validate().unwrap();
        assert_eq!(input.gender, Gender::Male);
        assert_eq!(input.activity_level, ActivityLevel::Moderate);
        assert_eq!(input.goal, Goal::Fitness);
    }

    #[test]
    fn test_nutrition_collects_all_violations() {
        let req = NutritionRequest {
            weight: Some(10.0),
            height: Some(400.0),
            age: None,
            gender: Some("other".into()),
            activity_level: Some("couch".into()),
            goal: Some("maintain_weight".into()),
        };
        let err = req.validate().unwrap_err();
        assert_eq!(
            err.0,
            vec![
                "Weight must be at least 20 kg",
                "Height must not exceed 300 cm",
                "Age is required",
                "Gender must be either male or female",
                "Activity level must be one of sedentary, light, moderate, active, very_active",
            ]
        );
    }

    #[test]
    fn test_customize_accepts_valid_payload() {
        let req = CustomizeRequest {
            gym_days_per_week: Some(4.0),
            fitness_level: Some("advanced".into()),
            gender: Some("female".into()),
            session_duration: Some("60-90min".into()),
            goal: None,
        };
        let input = req.validate().unwrap();
        assert_eq!(input.gym_days_per_week, 4);
        assert_eq!(input.fitness_level, FitnessLevel::Advanced);
        assert_eq!(input.session_duration, SessionDuration::Long);
        assert_eq!(input.goal, Goal::Fitness);
    }

    #[test]
    fn test_customize_rejects_maintain_weight_and_bad_days() {
        let req = CustomizeRequest {
            gym_days_per_week: Some(8.0),
            fitness_level: Some("beginner".into()),
            gender: Some("male".into()),
            session_duration: Some("2h".into()),
            goal: Some("maintain_weight".into()),
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.0.len(), 3);
        assert_eq!(err.0[0], "Gym days per week cannot exceed 7");
        assert_eq!(
            err.to_string(),
            "Gym days per week cannot exceed 7, Session duration must be 30-45min, 45-60min, or 60-90min, Goal must be one of lose_weight, gain_muscle, fitness"
        );
    }

    #[test]
    fn test_nutrition_accepts_numeric_strings() {
        let req: NutritionRequest = serde_json::from_str(
            r#"{"weight":"80","height":" 180.5 ","age":30,"gender":"male"}"#,
        )
        .unwrap();
        let input = req.validate().unwrap();
        assert_eq!(input.weight, 80.0);
        assert_eq!(input.height, 180.5);
        assert_eq!(input.age, 30.0);
    }

    #[test]
    fn test_nutrition_reports_non_numeric_values() {
        let req: NutritionRequest = serde_json::from_str(
            r#"{"weight":"abc","height":true,"age":null,"gender":"female"}"#,
        )
        .unwrap();
        assert_eq!(
            req.validate().unwrap_err().0,
            vec!["Weight must be a number", "Height must be a number", "Age is required"]
        );
    }

    #[test]
    fn test_customize_gym_days_must_be_whole() {
        let parse = |days: &str| {
            let body = format!(
                r#"{{"gymDaysPerWeek":{days},"fitnessLevel":"beginner","gender":"male","sessionDuration":"30-45min","goal":"fitness"}}"#
            );
            serde_json::from_str::<CustomizeRequest>(&body).unwrap().validate()
        };
        assert_eq!(parse("\"3\"").unwrap().gym_days_per_week, 3);
        assert_eq!(parse("3.5").unwrap_err().0, vec!["Gym days per week must be an integer"]);
        assert_eq!(parse("\"three\"").unwrap_err().0, vec!["Gym days per week must be a number"]);
    }

    #[test]
    fn test_profile_update_parses_numeric_strings() {
        let req: ProfileUpdateRequest = serde_json::from_str(r#"{"weight":"72.5","age":"x"}"#).unwrap();
        assert_eq!(req.validate().unwrap_err().0, vec!["Age must be a number"]);

        let req: ProfileUpdateRequest = serde_json::from_str(r#"{"weight":"72.5"}"#).unwrap();
        assert_eq!(req.validate().unwrap().weight, Some(72.5));
    }

    #[test]
    fn test_register_rules() {
        let today = day(2025, 6, 1);
        let mut req = RegisterRequest {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: Some(" Ada@Example.COM ".into()),
            password: Some("secret1".into()),
            date_of_birth: Some(day(1990, 1, 1)),
            phone: Some("0123456789".into()),
        };
        let account = req.validate(today).unwrap();
        assert_eq!(account.email, "ada@example.com");

        req.date_of_birth = Some(day(2030, 1, 1));
        req.phone = Some("12ab".into());
        req.password = Some("123".into());
        let err = req.validate(today).unwrap_err();
        assert_eq!(err.0.len(), 3);
    }

    #[test]
    fn test_admin_request_requires_admin_role() {
        let req = AdminRequest {
            first_name: Some("Root".into()),
            last_name: Some("Admin".into()),
            email: Some("root@fittrack.com".into()),
            password: Some("hunter22".into()),
            phone: None,
            role: Some("user".into()),
        };
        assert_eq!(req.validate().unwrap_err().0, vec!["Role must be admin"]);
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@@b.co"));
    }

    #[test]
    fn test_profile_update_is_partial() {
        let req = ProfileUpdateRequest {
            phone: Some("123456".into()),
            goal: Some("gain_muscle".into()),
            ..Default::default()
        };
        let changes = req.validate().unwrap();
        assert_eq!(changes.goal, Some(Goal::GainMuscle));
        assert!(changes.email.is_none());

        let bad = ProfileUpdateRequest {
            phone: Some("1234567890123".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_workout_plan_form_new_vs_update() {
        let form = WorkoutPlanForm {
            name: Some("Starter".into()),
            ..Default::default()
        };
        assert_eq!(form.validate_new().unwrap_err().0.len(), 3);

        let fields = form.validate_update().unwrap();
        assert_eq!(fields.name.as_deref(), Some("Starter"));
        assert!(fields.goal.is_none());

        let bad = WorkoutPlanForm {
            activity_level: Some("moderate".into()),
            ..Default::default()
        };
        assert!(bad.validate_update().is_err());
    }

    #[test]
    fn test_password_update_lengths() {
        let req = PasswordUpdateRequest {
            old_password: Some("abcd".into()),
            new_password: None,
        };
        assert_eq!(
            req.validate().unwrap_err().0,
            vec!["Old password must be at least 5 characters long", "New password is required"]
        );
    }

    #[test]
    fn test_assign_plan_ids() {
        let user = Uuid::new_v4();
        let plan = Uuid::new_v4();
        let req = AssignPlanRequest {
            user_id: Some(user.to_string()),
            plan_id: Some(plan.to_string()),
        };
        assert_eq!(req.validate().unwrap(), (user, plan));

        let err = AssignPlanRequest {
            user_id: Some("nope".into()),
            plan_id: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.0, ["User ID must be a valid id", "Plan ID is required"]);
    }
}
