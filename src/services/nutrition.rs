use crate::domain::models::{ActivityLevel, Gender, Goal};
use serde::{Deserialize, Serialize};

/// Body metrics and preferences for a daily calorie / macro target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionInput {
    /// kg
    pub weight: f64,
    /// cm
    pub height: f64,
    pub age: f64,
    pub gender: Gender,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goal: Goal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionPlan {
    pub daily_calories: i64,
    pub protein_intake: i64,
    pub carb_intake: i64,
    pub fat_intake: i64,
    pub bmr: i64,
    pub tdee: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Macros {
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

const PROTEIN_KCAL_PER_GRAM: f64 = 4.0;
const CARB_KCAL_PER_GRAM: f64 = 4.0;
const FAT_KCAL_PER_GRAM: f64 = 9.0;

const WEIGHT_LOSS_DEFICIT: f64 = 500.0;
const MUSCLE_GAIN_SURPLUS: f64 = 300.0;

/// Mifflin-St Jeor basal metabolic rate in kcal/day.
pub fn calculate_bmr(weight: f64, height: f64, age: f64, gender: Gender) -> f64 {
    let base = 10.0 * weight + 6.25 * height - 5.0 * age;
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

pub fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::Light => 1.375,
        ActivityLevel::Moderate => 1.55,
        ActivityLevel::Active => 1.725,
        ActivityLevel::VeryActive => 1.9,
        ActivityLevel::Unrecognized => 1.2,
    }
}

pub fn calculate_tdee(bmr: f64, level: ActivityLevel) -> f64 {
    bmr * activity_multiplier(level)
}

/// Offset is applied to the unrounded TDEE, then the sum is rounded.
pub fn calculate_daily_calories(tdee: f64, goal: Goal) -> i64 {
    let target = match goal {
        Goal::LoseWeight => tdee - WEIGHT_LOSS_DEFICIT,
        Goal::GainMuscle => tdee + MUSCLE_GAIN_SURPLUS,
        Goal::Fitness | Goal::MaintainWeight | Goal::Unrecognized => tdee,
    };
    round_half_up(target)
}

/// (protein, carbs, fat) share of daily calories.
pub fn macro_split(goal: Goal) -> (f64, f64, f64) {
    match goal {
        Goal::LoseWeight => (0.35, 0.35, 0.30),
        Goal::GainMuscle => (0.30, 0.45, 0.25),
        Goal::Fitness | Goal::MaintainWeight | Goal::Unrecognized => (0.30, 0.40, 0.30),
    }
}

pub fn calculate_macros(daily_calories: i64, goal: Goal) -> Macros {
    let (protein_pct, carb_pct, fat_pct) = macro_split(goal);
    let calories = daily_calories as f64;

    Macros {
        protein: round_half_up(calories * protein_pct / PROTEIN_KCAL_PER_GRAM),
        carbs: round_half_up(calories * carb_pct / CARB_KCAL_PER_GRAM),
        fat: round_half_up(calories * fat_pct / FAT_KCAL_PER_GRAM),
    }
}

pub fn calculate_nutrition(input: &NutritionInput) -> NutritionPlan {
    let bmr = calculate_bmr(input.weight, input.height, input.age, input.gender);
    let tdee = calculate_tdee(bmr, input.activity_level);
    let daily_calories = calculate_daily_calories(tdee, input.goal);
    let macros = calculate_macros(daily_calories, input.goal);

    NutritionPlan {
        daily_calories,
        protein_intake: macros.protein,
        carb_intake: macros.carbs,
        fat_intake: macros.fat,
        bmr: round_half_up(bmr),
        tdee: round_half_up(tdee),
    }
}

/// Halves round toward positive infinity (2.5 -> 3, -2.5 -> -2).
/// Non-finite values saturate through the `as` cast (NaN -> 0).
pub(crate) fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_input(goal: Goal) -> NutritionInput {
        NutritionInput {
            weight: 80.0,
            height: 180.0,
            age: 30.0,
            gender: Gender::Male,
            activity_level: ActivityLevel::Moderate,
            goal,
        }
    }

    #[test]
    fn test_bmr_by_gender() {
        assert_eq!(calculate_bmr(80.0, 180.0, 30.0, Gender::Male), 1780.0);
        assert_eq!(calculate_bmr(80.0, 180.0, 30.0, Gender::Female), 1614.0);
    }

    #[test]
    fn test_fitness_goal_reference_values() {
        let plan = calculate_nutrition(&reference_input(Goal::Fitness));
        assert_eq!(plan.bmr, 1780);
        assert_eq!(plan.tdee, 2759);
        assert_eq!(plan.daily_calories, 2759);
        assert_eq!(plan.protein_intake, 207);
        assert_eq!(plan.carb_intake, 276);
        assert_eq!(plan.fat_intake, 92);
    }

    #[test]
    fn test_lose_weight_reference_values() {
        let plan = calculate_nutrition(&reference_input(Goal::LoseWeight));
        assert_eq!(plan.daily_calories, 2259);
        assert_eq!(plan.protein_intake, 198);
        assert_eq!(plan.carb_intake, 198);
        assert_eq!(plan.fat_intake, 75);
        assert_eq!(plan.tdee, 2759);
    }

    #[test]
    fn test_gain_muscle_adds_surplus() {
        let plan = calculate_nutrition(&reference_input(Goal::GainMuscle));
        assert_eq!(plan.daily_calories, 3059);
        assert_eq!(plan.protein_intake, 229);
        assert_eq!(plan.carb_intake, 344);
        assert_eq!(plan.fat_intake, 85);
    }

    #[test]
    fn test_unrecognized_activity_uses_sedentary_multiplier() {
        let bmr = calculate_bmr(80.0, 180.0, 30.0, Gender::Male);
        assert_eq!(
            calculate_tdee(bmr, ActivityLevel::Unrecognized),
            calculate_tdee(bmr, ActivityLevel::Sedentary)
        );
    }

    #[test]
    fn test_unlisted_goals_fall_back_to_maintenance() {
        let fitness = calculate_nutrition(&reference_input(Goal::Fitness));
        assert_eq!(calculate_nutrition(&reference_input(Goal::MaintainWeight)), fitness);
        assert_eq!(calculate_nutrition(&reference_input(Goal::Unrecognized)), fitness);
    }

    #[test]
    fn test_daily_calories_round_offset_target() {
        assert_eq!(calculate_daily_calories(1999.5, Goal::LoseWeight), 1500);
        assert_eq!(calculate_daily_calories(1999.5, Goal::Fitness), 2000);
        assert_eq!(calculate_daily_calories(1999.4, Goal::GainMuscle), 2299);
    }

    #[test]
    fn test_macro_calories_track_daily_target() {
        for goal in [Goal::LoseWeight, Goal::GainMuscle, Goal::Fitness] {
            let plan = calculate_nutrition(&reference_input(goal));
            let kcal = plan.protein_intake * 4 + plan.carb_intake * 4 + plan.fat_intake * 9;
            assert!((kcal - plan.daily_calories).abs() <= 10, "{:?}: {} vs {}", goal, kcal, plan.daily_calories);
        }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(f64::NAN), 0);
    }

    #[test]
    fn test_defaults_when_fields_missing() {
        let input: NutritionInput =
            serde_json::from_str(r#"{"weight":80,"height":180,"age":30,"gender":"male"}"#).unwrap();
        assert_eq!(input.activity_level, ActivityLevel::Moderate);
        assert_eq!(input.goal, Goal::Fitness);
    }
}
