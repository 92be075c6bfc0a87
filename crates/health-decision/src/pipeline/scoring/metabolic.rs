/// BMI contribution. Unknown BMI contributes nothing.
pub fn bmi_penalty(bmi: Option<f64>) -> i32 {
    match bmi {
        Some(bmi) if bmi >= 30.0 => -15,
        Some(bmi) if bmi >= 25.0 => -8,
        Some(bmi) if bmi < 18.5 => -5,
        _ => 0,
    }
}

/// Progressive age contribution in five-year bands from 20.
pub fn age_penalty(age: Option<u32>) -> i32 {
    let Some(age) = age else {
        return 0;
    };
    match age {
        65.. => -28,
        60..=64 => -22,
        55..=59 => -17,
        50..=54 => -13,
        45..=49 => -10,
        40..=44 => -7,
        35..=39 => -5,
        30..=34 => -3,
        25..=29 => -2,
        20..=24 => -1,
        _ => 0,
    }
}

pub fn metabolic_axis(bmi: Option<f64>, age: Option<u32>) -> i32 {
    bmi_penalty(bmi) + age_penalty(age)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmi_bands() {
        assert_eq!(bmi_penalty(None), 0);
        assert_eq!(bmi_penalty(Some(17.9)), -5);
        assert_eq!(bmi_penalty(Some(22.0)), 0);
        assert_eq!(bmi_penalty(Some(25.0)), -8);
        assert_eq!(bmi_penalty(Some(32.0)), -15);
    }

    #[test]
    fn age_penalty_never_shrinks_with_age() {
        let mut previous = 0;
        for age in 0..100 {
            let penalty = age_penalty(Some(age));
            assert!(penalty <= previous, "penalty eased at age {age}");
            previous = penalty;
        }
        assert_eq!(age_penalty(Some(19)), 0);
        assert_eq!(age_penalty(Some(20)), -1);
        assert_eq!(age_penalty(Some(70)), -28);
        assert_eq!(age_penalty(None), 0);
    }
}
