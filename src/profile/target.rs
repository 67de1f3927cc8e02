/// Minimum daily target enforced on the weight-loss branch.
const LOSS_FLOOR: f64 = 1200.0;
/// Largest daily deficit or surplus applied toward a weight goal.
const MAX_ADJUSTMENT: f64 = 500.0;

/// Daily calorie budget from Harris-Benedict BMR, an activity multiplier
/// and a goal-weight adjustment. Total over all numeric inputs: unknown
/// genders fall back to the female formula, unknown activity levels to the
/// lightly-active multiplier.
pub fn daily_calorie_target(
    age: i32,
    gender: &str,
    height_cm: f64,
    weight_kg: f64,
    activity_level: &str,
    goal_weight_kg: f64,
) -> f64 {
    let age = f64::from(age);
    let bmr = if gender.eq_ignore_ascii_case("male") {
        88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age
    } else {
        447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age
    };

    let tdee = bmr * activity_multiplier(activity_level);

    if goal_weight_kg < weight_kg {
        let deficit = MAX_ADJUSTMENT.min((weight_kg - goal_weight_kg) * 50.0);
        (tdee - deficit).max(LOSS_FLOOR)
    } else if goal_weight_kg > weight_kg {
        let surplus = MAX_ADJUSTMENT.min((goal_weight_kg - weight_kg) * 50.0);
        tdee + surplus
    } else {
        tdee
    }
}

fn activity_multiplier(level: &str) -> f64 {
    match level {
        "sedentary" => 1.2,
        "lightly_active" => 1.375,
        "moderately_active" => 1.55,
        "very_active" => 1.725,
        "extra_active" => 1.9,
        _ => 1.375,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn male_moderate_loss_example() {
        // BMR 1724.925, TDEE 2673.63375, deficit 250
        let target = daily_calorie_target(25, "male", 175.0, 70.0, "moderately_active", 65.0);
        assert_eq!(target, 2423.63375);
    }

    #[test]
    fn female_formula_used_for_non_male() {
        let target = daily_calorie_target(30, "female", 165.0, 60.0, "sedentary", 60.0);
        let bmr = 447.593 + 9.247 * 60.0 + 3.098 * 165.0 - 4.330 * 30.0;
        assert_eq!(target, bmr * 1.2);
    }

    #[test]
    fn gender_check_is_case_insensitive() {
        let upper = daily_calorie_target(25, "MALE", 175.0, 70.0, "sedentary", 70.0);
        let lower = daily_calorie_target(25, "male", 175.0, 70.0, "sedentary", 70.0);
        assert_eq!(upper, lower);
    }

    #[test]
    fn unknown_gender_defaults_to_female_formula() {
        let other = daily_calorie_target(40, "nonbinary", 170.0, 65.0, "sedentary", 65.0);
        let female = daily_calorie_target(40, "female", 170.0, 65.0, "sedentary", 65.0);
        assert_eq!(other, female);
    }

    #[test]
    fn loss_never_drops_below_floor() {
        // Tiny biometrics push TDEE below the floor
        let target = daily_calorie_target(90, "female", 140.0, 40.0, "sedentary", 35.0);
        assert!(target >= 1200.0);
        assert_eq!(target, 1200.0);
    }

    #[test]
    fn deficit_capped_at_500() {
        let far = daily_calorie_target(25, "male", 180.0, 120.0, "very_active", 80.0);
        let tdee = (88.362 + 13.397 * 120.0 + 4.799 * 180.0 - 5.677 * 25.0) * 1.725;
        assert_eq!(far, tdee - 500.0);
    }

    #[test]
    fn surplus_capped_at_500() {
        let target = daily_calorie_target(25, "male", 180.0, 60.0, "sedentary", 90.0);
        let tdee = (88.362 + 13.397 * 60.0 + 4.799 * 180.0 - 5.677 * 25.0) * 1.2;
        assert_eq!(target, tdee + 500.0);
    }

    #[test]
    fn small_gain_scales_with_distance() {
        let target = daily_calorie_target(25, "male", 180.0, 60.0, "sedentary", 62.0);
        let tdee = (88.362 + 13.397 * 60.0 + 4.799 * 180.0 - 5.677 * 25.0) * 1.2;
        assert_eq!(target, tdee + 100.0);
    }

    #[test]
    fn maintenance_returns_tdee() {
        let target = daily_calorie_target(35, "male", 178.0, 75.0, "lightly_active", 75.0);
        let tdee = (88.362 + 13.397 * 75.0 + 4.799 * 178.0 - 5.677 * 35.0) * 1.375;
        assert_eq!(target, tdee);
    }

    #[test]
    fn unknown_activity_level_defaults() {
        let typo = daily_calorie_target(25, "male", 175.0, 70.0, "couch_potato", 70.0);
        let lightly = daily_calorie_target(25, "male", 175.0, 70.0, "lightly_active", 70.0);
        assert_eq!(typo, lightly);
    }

    #[test]
    fn deterministic_across_calls() {
        let a = daily_calorie_target(25, "male", 175.0, 70.0, "moderately_active", 65.0);
        let b = daily_calorie_target(25, "male", 175.0, 70.0, "moderately_active", 65.0);
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
