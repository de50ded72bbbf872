use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl TryFrom<&str> for Gender {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(()),
        }
    }
}

/// Daily activity used for the TDEE multiplier.
/// Strings outside the known set land on `Unrecognized` instead of failing to parse.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
    #[serde(other)]
    Unrecognized,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::Unrecognized => "unrecognized",
        }
    }
}

impl From<&str> for ActivityLevel {
    fn from(value: &str) -> Self {
        match value {
            "sedentary" => ActivityLevel::Sedentary,
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very_active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Unrecognized,
        }
    }
}

/// Training goal. `MaintainWeight` is accepted by the nutrition calculator only
/// and is treated like any other non-deficit, non-surplus goal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    GainMuscle,
    #[default]
    Fitness,
    MaintainWeight,
    #[serde(other)]
    Unrecognized,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "lose_weight",
            Goal::GainMuscle => "gain_muscle",
            Goal::Fitness => "fitness",
            Goal::MaintainWeight => "maintain_weight",
            Goal::Unrecognized => "unrecognized",
        }
    }

    /// Goals a workout plan can be tagged with.
    pub fn is_workout_goal(&self) -> bool {
        matches!(self, Goal::LoseWeight | Goal::GainMuscle | Goal::Fitness)
    }
}

impl From<&str> for Goal {
    fn from(value: &str) -> Self {
        match value {
            "lose_weight" => Goal::LoseWeight,
            "gain_muscle" => Goal::GainMuscle,
            "fitness" => Goal::Fitness,
            "maintain_weight" => Goal::MaintainWeight,
            _ => Goal::Unrecognized,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
    #[serde(other)]
    Unrecognized,
}

impl FitnessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessLevel::Beginner => "beginner",
            FitnessLevel::Intermediate => "intermediate",
            FitnessLevel::Advanced => "advanced",
            FitnessLevel::Unrecognized => "unrecognized",
        }
    }
}

impl From<&str> for FitnessLevel {
    fn from(value: &str) -> Self {
        match value {
            "beginner" => FitnessLevel::Beginner,
            "intermediate" => FitnessLevel::Intermediate,
            "advanced" => FitnessLevel::Advanced,
            _ => FitnessLevel::Unrecognized,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionDuration {
    #[serde(rename = "30-45min")]
    Short,
    #[serde(rename = "45-60min")]
    Medium,
    #[serde(rename = "60-90min")]
    Long,
}

impl SessionDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionDuration::Short => "30-45min",
            SessionDuration::Medium => "45-60min",
            SessionDuration::Long => "60-90min",
        }
    }
}

impl TryFrom<&str> for SessionDuration {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "30-45min" => Ok(SessionDuration::Short),
            "45-60min" => Ok(SessionDuration::Medium),
            "60-90min" => Ok(SessionDuration::Long),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_strings_deserialize_to_unrecognized() {
        let level: ActivityLevel = serde_json::from_str("\"couch\"").unwrap();
        assert_eq!(level, ActivityLevel::Unrecognized);

        let goal: Goal = serde_json::from_str("\"bulk\"").unwrap();
        assert_eq!(goal, Goal::Unrecognized);

        let fitness: FitnessLevel = serde_json::from_str("\"elite\"").unwrap();
        assert_eq!(fitness, FitnessLevel::Unrecognized);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&ActivityLevel::VeryActive).unwrap(), "\"very_active\"");
        assert_eq!(serde_json::to_string(&Goal::LoseWeight).unwrap(), "\"lose_weight\"");
        assert_eq!(serde_json::to_string(&SessionDuration::Medium).unwrap(), "\"45-60min\"");
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn test_string_conversions_match_wire_names() {
        for level in [
            ActivityLevel::Sedentary,
            ActivityLevel::Light,
            ActivityLevel::Moderate,
            ActivityLevel::Active,
            ActivityLevel::VeryActive,
        ] {
            assert_eq!(ActivityLevel::from(level.as_str()), level);
        }
        assert_eq!(Goal::from("maintain_weight"), Goal::MaintainWeight);
        assert!(!Goal::MaintainWeight.is_workout_goal());
        assert_eq!(SessionDuration::try_from("60-90min"), Ok(SessionDuration::Long));
        assert!(SessionDuration::try_from("2h").is_err());
        assert_eq!(Gender::try_from("female"), Ok(Gender::Female));
    }
}
