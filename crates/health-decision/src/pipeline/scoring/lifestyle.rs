//! Nicotine and alcohol penalty model.
//!
//! Penalties are computed as positive magnitudes and negated once at the end so rounding is
//! symmetric.

use chrono::{Datelike, NaiveDate};

use crate::pipeline::facts::{AlcoholLevel, Lifestyle, SmokingSeverity, VapingLevel};

const SMOKING_HEAVY: f64 = 15.0;
const SMOKING_MODERATE: f64 = 10.0;
const SMOKING_LIGHT: f64 = 6.0;

const VAPING_HIGH: f64 = 8.0;
const VAPING_MODERATE: f64 = 4.0;
const VAPING_LOW: f64 = 2.0;

const ALCOHOL_HIGH: f64 = 10.0;
const ALCOHOL_MODERATE: f64 = 5.0;

const NICOTINE_SYNERGY: f64 = 1.2;

/// Whole calendar months from `quit` to `as_of`; zero when `quit` is in the future.
pub fn months_since(quit: NaiveDate, as_of: NaiveDate) -> u32 {
    if quit >= as_of {
        return 0;
    }
    let mut months = (as_of.year() - quit.year()) * 12 + as_of.month() as i32 - quit.month() as i32;
    if as_of.day() < quit.day() {
        months -= 1;
    }
    u32::try_from(months).unwrap_or(0)
}

/// Share of a behavioral penalty still applied after the behavior stopped.
pub fn recovery_factor(quit: Option<NaiveDate>, as_of: NaiveDate) -> f64 {
    let Some(quit) = quit else {
        return 1.0;
    };
    match months_since(quit, as_of) {
        0 => 1.0,
        1..=5 => 0.7,
        6..=11 => 0.4,
        12..=23 => 0.2,
        _ => 0.0,
    }
}

/// Multiplier applied to the combined lifestyle penalty as behavioral risk compounds with age.
pub fn age_behavior_factor(age: Option<u32>) -> f64 {
    match age {
        Some(age) if age >= 65 => 1.6,
        Some(age) if age >= 55 => 1.4,
        Some(age) if age >= 45 => 1.25,
        Some(age) if age >= 35 => 1.1,
        _ => 1.0,
    }
}

fn smoking_penalty(lifestyle: &Lifestyle, as_of: NaiveDate) -> f64 {
    let recovery = recovery_factor(lifestyle.smoking_quit_date, as_of);
    if lifestyle.smoking {
        let base = match lifestyle.smoking_severity {
            SmokingSeverity::Heavy => SMOKING_HEAVY,
            SmokingSeverity::Moderate => SMOKING_MODERATE,
            SmokingSeverity::Light | SmokingSeverity::None => SMOKING_LIGHT,
        };
        base * recovery
    } else if lifestyle.smoking_quit_date.is_some() {
        SMOKING_LIGHT / 2.0 * recovery
    } else {
        0.0
    }
}

fn vaping_penalty(lifestyle: &Lifestyle, as_of: NaiveDate) -> f64 {
    let recovery = recovery_factor(lifestyle.vaping_quit_date, as_of);
    match lifestyle.vaping {
        VapingLevel::High => VAPING_HIGH * recovery,
        VapingLevel::Moderate => VAPING_MODERATE * recovery,
        VapingLevel::Low => VAPING_LOW * recovery,
        VapingLevel::None if lifestyle.vaping_quit_date.is_some() => VAPING_LOW / 2.0 * recovery,
        VapingLevel::None => 0.0,
    }
}

/// Combined smoking and vaping magnitude, with synergy when both are active.
pub fn nicotine_penalty(lifestyle: &Lifestyle, as_of: NaiveDate) -> f64 {
    let smoking = smoking_penalty(lifestyle, as_of);
    let vaping = vaping_penalty(lifestyle, as_of);
    if lifestyle.smoking && lifestyle.is_vaping() {
        (smoking + vaping) * NICOTINE_SYNERGY
    } else {
        smoking + vaping
    }
}

fn alcohol_penalty(alcohol: AlcoholLevel) -> f64 {
    match alcohol {
        AlcoholLevel::High => ALCOHOL_HIGH,
        AlcoholLevel::Moderate => ALCOHOL_MODERATE,
        AlcoholLevel::Low => 0.0,
    }
}

fn alcohol_synergy(alcohol: AlcoholLevel) -> f64 {
    match alcohol {
        AlcoholLevel::High => 1.2,
        AlcoholLevel::Moderate => 1.1,
        AlcoholLevel::Low => 1.0,
    }
}

/// Signed lifestyle axis contribution.
pub fn lifestyle_axis(lifestyle: &Lifestyle, age: Option<u32>, as_of: NaiveDate) -> i32 {
    let nicotine = nicotine_penalty(lifestyle, as_of);
    let alcohol = alcohol_penalty(lifestyle.alcohol);

    let combined = if nicotine > 0.0 {
        nicotine + alcohol * alcohol_synergy(lifestyle.alcohol)
    } else {
        alcohol
    };

    -((combined * age_behavior_factor(age)).round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn as_of() -> NaiveDate {
        date(2026, 10, 16)
    }

    #[test]
    fn months_count_whole_calendar_months() {
        assert_eq!(months_since(date(2026, 9, 16), as_of()), 1);
        assert_eq!(months_since(date(2026, 9, 17), as_of()), 0);
        assert_eq!(months_since(date(2024, 10, 16), as_of()), 24);
        assert_eq!(months_since(date(2027, 1, 1), as_of()), 0);
    }

    #[test]
    fn recovery_never_increases_with_time() {
        let mut previous = f64::INFINITY;
        for months_ago in 0..40u32 {
            let quit = as_of()
                .checked_sub_months(chrono::Months::new(months_ago))
                .expect("valid date");
            let factor = recovery_factor(Some(quit), as_of());
            assert!(factor <= previous, "factor rose at {months_ago} months");
            previous = factor;
        }
        let two_years = date(2024, 10, 16);
        assert_eq!(recovery_factor(Some(two_years), as_of()), 0.0);
        assert_eq!(recovery_factor(None, as_of()), 1.0);
    }

    #[test]
    fn active_smoking_and_vaping_compound() {
        let lifestyle = Lifestyle {
            smoking: true,
            smoking_severity: SmokingSeverity::Heavy,
            vaping: VapingLevel::High,
            alcohol: AlcoholLevel::High,
            ..Lifestyle::default()
        };
        assert!((nicotine_penalty(&lifestyle, as_of()) - 27.6).abs() < 1e-9);
        assert_eq!(lifestyle_axis(&lifestyle, Some(70), as_of()), -63);
        assert_eq!(lifestyle_axis(&lifestyle, Some(30), as_of()), -40);
    }

    #[test]
    fn former_smoker_keeps_a_fading_residual() {
        let recent = Lifestyle {
            smoking_quit_date: Some(date(2026, 8, 1)),
            ..Lifestyle::default()
        };
        assert!((nicotine_penalty(&recent, as_of()) - 2.1).abs() < 1e-9);
        assert_eq!(lifestyle_axis(&recent, None, as_of()), -2);

        let long_ago = Lifestyle {
            smoking_quit_date: Some(date(2020, 1, 1)),
            ..Lifestyle::default()
        };
        assert_eq!(lifestyle_axis(&long_ago, None, as_of()), 0);
    }

    #[test]
    fn former_vaper_keeps_a_fading_residual() {
        let recent = Lifestyle {
            vaping_quit_date: Some(date(2026, 8, 1)),
            ..Lifestyle::default()
        };
        assert!((nicotine_penalty(&recent, as_of()) - 0.7).abs() < 1e-9);
        assert_eq!(lifestyle_axis(&recent, Some(30), as_of()), -1);
        assert_eq!(lifestyle_axis(&recent, Some(40), as_of()), -1);

        let long_ago = Lifestyle {
            vaping_quit_date: Some(date(2024, 10, 16)),
            ..Lifestyle::default()
        };
        assert_eq!(nicotine_penalty(&long_ago, as_of()), 0.0);
        assert_eq!(lifestyle_axis(&long_ago, Some(70), as_of()), 0);
    }

    #[test]
    fn active_behavior_with_quit_date_is_scaled_by_recovery() {
        let smoker = Lifestyle {
            smoking: true,
            smoking_severity: SmokingSeverity::Heavy,
            smoking_quit_date: Some(date(2026, 3, 16)),
            ..Lifestyle::default()
        };
        assert!((nicotine_penalty(&smoker, as_of()) - 15.0 * 0.4).abs() < 1e-9);
        assert_eq!(lifestyle_axis(&smoker, None, as_of()), -6);

        let vaper = Lifestyle {
            vaping: VapingLevel::High,
            vaping_quit_date: Some(date(2026, 3, 16)),
            ..Lifestyle::default()
        };
        assert!((nicotine_penalty(&vaper, as_of()) - 8.0 * 0.4).abs() < 1e-9);
    }

    #[test]
    fn alcohol_alone_has_no_synergy() {
        let lifestyle = Lifestyle {
            alcohol: AlcoholLevel::Moderate,
            ..Lifestyle::default()
        };
        assert_eq!(lifestyle_axis(&lifestyle, None, as_of()), -5);
        assert_eq!(lifestyle_axis(&lifestyle, Some(50), as_of()), -6);
    }

    #[test]
    fn age_factor_steps_up() {
        assert_eq!(age_behavior_factor(None), 1.0);
        assert_eq!(age_behavior_factor(Some(34)), 1.0);
        assert_eq!(age_behavior_factor(Some(35)), 1.1);
        assert_eq!(age_behavior_factor(Some(64)), 1.4);
        assert_eq!(age_behavior_factor(Some(65)), 1.6);
    }
}
