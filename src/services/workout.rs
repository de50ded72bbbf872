use crate::domain::models::{FitnessLevel, Gender, Goal, SessionDuration};
use crate::services::exercises::{self, FALLBACK_SPLIT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutInput {
    pub gym_days_per_week: i32,
    pub fitness_level: FitnessLevel,
    pub gender: Gender,
    pub session_duration: SessionDuration,
    #[serde(default)]
    pub goal: Goal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    pub exercise: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDay {
    pub day: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub duration: SessionDuration,
    pub exercises: Vec<ExerciseEntry>,
}

/// Lookups without an entry for the requested goal / level stay `None`
/// and are left out of the serialized plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cardio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rest_days: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nutrition: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub progression: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub gym_days_per_week: i32,
    pub fitness_level: FitnessLevel,
    pub gender: Gender,
    pub session_duration: SessionDuration,
    pub goal: Goal,
    pub workout_split: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub summary: WorkoutSummary,
    pub weekly_plan: Vec<WorkoutDay>,
    pub recommendations: Recommendations,
    pub general_tips: Vec<String>,
}

pub const GENERAL_TIPS: [&str; 5] = [
    "Always warm up for 5-10 minutes before training",
    "Focus on progressive overload - increase weight, reps, or volume over time",
    "Rest 2-3 minutes between heavy compound lifts, 60-90 seconds for accessories",
    "Track your workouts to monitor progress",
    "Listen to your body and take extra rest if needed",
];

const DEFAULT_DAYS: i32 = 3;

/// Deterministic weekly plan builder. Holds no state besides its options.
#[derive(Debug, Clone, Copy)]
pub struct WorkoutGenerator {
    pub include_descriptions: bool,
}

impl Default for WorkoutGenerator {
    fn default() -> Self {
        Self {
            include_descriptions: true,
        }
    }
}

impl WorkoutGenerator {
    pub fn new(include_descriptions: bool) -> Self {
        Self { include_descriptions }
    }

    pub fn generate(&self, input: &WorkoutInput) -> WorkoutPlan {
        let split = split_for(input.gym_days_per_week);

        let weekly_plan = split
            .iter()
            .enumerate()
            .map(|(idx, label)| WorkoutDay {
                day: idx as u32 + 1,
                kind: (*label).to_string(),
                duration: input.session_duration,
                exercises: self.day_exercises(label, input.fitness_level),
            })
            .collect();

        WorkoutPlan {
            summary: WorkoutSummary {
                gym_days_per_week: input.gym_days_per_week,
                fitness_level: input.fitness_level,
                gender: input.gender,
                session_duration: input.session_duration,
                goal: input.goal,
                workout_split: split.join(", "),
            },
            weekly_plan,
            recommendations: Recommendations {
                cardio: cardio_advice(input.goal).map(str::to_string),
                rest_days: rest_day_advice(input.fitness_level).map(str::to_string),
                nutrition: nutrition_tips(input.goal)
                    .map(|tips| tips.iter().map(|t| t.to_string()).collect()),
                progression: progression_advice(input.fitness_level).map(str::to_string),
            },
            general_tips: GENERAL_TIPS.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn day_exercises(&self, label: &str, level: FitnessLevel) -> Vec<ExerciseEntry> {
        let entries = exercises::exercises_for(label, level)
            .or_else(|| exercises::exercises_for(FALLBACK_SPLIT, level))
            .unwrap_or(&[]);

        entries
            .iter()
            .map(|entry| ExerciseEntry {
                exercise: (*entry).to_string(),
                description: self
                    .include_descriptions
                    .then(|| exercises::describe(entry).to_string()),
            })
            .collect()
    }
}

/// Ordered split-day labels for a training week. Counts outside 1..=7 get the 3-day split.
pub fn split_for(days_per_week: i32) -> &'static [&'static str] {
    match days_per_week {
        1 => &["Full Body"],
        2 => &["Upper Body", "Lower Body"],
        3 => &["Push", "Pull", "Legs"],
        4 => &["Upper Body", "Lower Body", "Upper Body", "Lower Body"],
        5 => &["Push", "Pull", "Legs", "Upper Body", "Lower Body"],
        6 => &["Push", "Pull", "Legs", "Push", "Pull", "Legs"],
        7 => &[
            "Push",
            "Pull",
            "Legs",
            "Upper Body",
            "Lower Body",
            "Core/Cardio",
            "Active Recovery",
        ],
        _ => split_for(DEFAULT_DAYS),
    }
}

fn cardio_advice(goal: Goal) -> Option<&'static str> {
    match goal {
        Goal::LoseWeight => Some("Add 20-30 minutes of moderate cardio after each workout or on rest days"),
        Goal::GainMuscle => Some("Limit cardio to 10-15 minutes of light activity for warm-up"),
        Goal::Fitness => Some("Include 15-20 minutes of moderate cardio 2-3 times per week"),
        Goal::MaintainWeight | Goal::Unrecognized => None,
    }
}

fn rest_day_advice(level: FitnessLevel) -> Option<&'static str> {
    match level {
        FitnessLevel::Beginner => {
            Some("Take 2-3 rest days per week. Focus on light stretching and staying active with walks.")
        }
        FitnessLevel::Intermediate => {
            Some("Take 1-2 rest days per week. Consider active recovery like yoga or light cardio.")
        }
        FitnessLevel::Advanced => {
            Some("Take 1-2 rest days per week. Include mobility work and foam rolling for recovery.")
        }
        FitnessLevel::Unrecognized => None,
    }
}

const LOSE_WEIGHT_TIPS: &[&str] = &[
    "Maintain a caloric deficit",
    "Prioritize protein (1g per lb bodyweight)",
    "Stay hydrated (3-4L water/day)",
    "Avoid processed foods and sugary drinks",
];

const GAIN_MUSCLE_TIPS: &[&str] = &[
    "Eat in a slight caloric surplus",
    "Consume 1.2-1.5g protein per lb bodyweight",
    "Time carbs around workouts",
    "Get 7-9 hours of sleep for recovery",
];

const FITNESS_TIPS: &[&str] = &[
    "Maintain balanced caloric intake",
    "Eat adequate protein (0.8-1g per lb)",
    "Include variety of whole foods",
    "Stay consistent with meal timing",
];

fn nutrition_tips(goal: Goal) -> Option<&'static [&'static str]> {
    match goal {
        Goal::LoseWeight => Some(LOSE_WEIGHT_TIPS),
        Goal::GainMuscle => Some(GAIN_MUSCLE_TIPS),
        Goal::Fitness => Some(FITNESS_TIPS),
        Goal::MaintainWeight | Goal::Unrecognized => None,
    }
}

fn progression_advice(level: FitnessLevel) -> Option<&'static str> {
    match level {
        FitnessLevel::Beginner => Some(
            "Focus on learning proper form. Increase weight by 5-10lbs when you can complete all sets with good form.",
        ),
        FitnessLevel::Intermediate => Some(
            "Track your weights and aim to increase load or reps each week. Consider deload weeks every 4-6 weeks.",
        ),
        FitnessLevel::Advanced => Some(
            "Use periodization. Follow a structured program with heavy, medium, and light days. Track all metrics closely.",
        ),
        FitnessLevel::Unrecognized => None,
    }
}
