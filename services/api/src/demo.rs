use crate::infra::{InMemoryDietAnalyses, InMemoryProfileRepository, InMemoryScoreHistory};
use chrono::{Months, NaiveDate, NaiveTime, Utc};
use clap::Args;
use health_decision::assessment::{HealthAssessmentService, IndividualId, ProfileSubmission};
use health_decision::config::AppConfig;
use health_decision::error::AppError;
use health_decision::pipeline::delta::ScoreHistoryEntry;
use health_decision::pipeline::facts::{
    AlcoholLevel, DietProfile, Frequency, HealthFacts, IntakeLevel, SmokingSeverity, SymptomEntry,
    VapingLevel,
};
use health_decision::pipeline::triage::RuleTable;
use health_decision::pipeline::{HealthAssessment, HealthPipeline};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON document describing the individual's facts
    #[arg(long)]
    pub(crate) facts: PathBuf,
    /// Optional JSON score history entry from a previous evaluation
    #[arg(long)]
    pub(crate) previous: Option<PathBuf>,
    /// Rule table to use instead of the configured one
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date of the second assessment (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        facts,
        previous,
        rules,
        as_of,
    } = args;

    let pipeline = load_pipeline(rules)?;
    let facts: HealthFacts = read_json(&facts)?;
    let previous: Option<ScoreHistoryEntry> = previous.map(|path| read_json(&path)).transpose()?;
    let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());

    let assessment = pipeline.evaluate(&facts, previous.as_ref(), as_of);
    let rendered = serde_json::to_string_pretty(&assessment).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let as_of = args.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let earlier = as_of.checked_sub_months(Months::new(3)).unwrap_or(as_of);

    let diets = Arc::new(InMemoryDietAnalyses::default());
    let service = HealthAssessmentService::new(
        load_pipeline(None)?,
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(InMemoryScoreHistory::default()),
        diets.clone(),
    );
    let id = IndividualId::from("demo-0001");

    println!("Health decision demo");
    let mut profile = demo_profile(as_of);
    for (label, date) in [("Intake", earlier), ("Follow-up", as_of)] {
        if let Err(err) = service.put_profile(&id, profile.clone()) {
            println!("  Profile rejected: {err}");
            return Ok(());
        }
        let timestamp = date.and_time(NaiveTime::MIN).and_utc();
        match service.assess_at(&id, timestamp) {
            Ok(assessment) => render_assessment(label, date, &assessment),
            Err(err) => {
                println!("  {label} assessment unavailable: {err}");
                return Ok(());
            }
        }

        // Quit smoking at intake and cut back on alcohol before the follow-up.
        profile.smoking = Some(false);
        profile.smoking_quit_date = Some(earlier);
        profile.alcohol = Some(AlcoholLevel::Moderate);
        if let Some(diet) = profile.diet.as_mut() {
            diet.vegetables_frequency = Some(Frequency::Daily);
        }
    }

    match diets.get(&id) {
        Some(analysis) => println!(
            "\nStored diet analysis: {} signal(s), confidence {:?}",
            analysis.signals.fired(),
            analysis.signals.confidence
        ),
        None => println!("\nStored diet analysis: none"),
    }

    Ok(())
}

fn load_pipeline(rules: Option<PathBuf>) -> Result<HealthPipeline, AppError> {
    let path = match rules {
        Some(path) => path,
        None => AppConfig::load()?.pipeline.triage_rules_path,
    };
    let table = RuleTable::load(path)?;
    Ok(HealthPipeline::new(Arc::new(table)))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw).map_err(std::io::Error::from)?)
}

fn render_assessment(label: &str, date: NaiveDate, assessment: &HealthAssessment) {
    let score = &assessment.health_score;
    println!("\n{label} ({date})");
    println!(
        "- Triage {} | score {} ({})",
        assessment.triage.triage_level,
        score.score,
        score.label.as_str()
    );
    println!("- {}", assessment.explanation.summary);
    println!("  Breakdown:");
    for (axis, value) in score.breakdown.axes() {
        println!("    - {}: {}", axis.label(), value);
    }
    if !assessment.delta.drivers.is_empty() {
        println!("  Changes since last assessment:");
        for driver in &assessment.delta.drivers {
            println!("    - {}: {:+}", driver.factor.label(), driver.change);
        }
    }
    for alert in &assessment.alerts {
        println!("  [{:?}] {}", alert.level, alert.message);
    }
    for projection in &assessment.projections {
        println!(
            "  {:?}: {:+} in {} days -> {}",
            projection.action,
            projection.expected_score_change,
            projection.timeframe_days,
            projection.projected_score
        );
    }
    if !assessment.recommendations.risk_summary.is_empty() {
        println!("  Risks: {}", assessment.recommendations.risk_summary.join(", "));
    }
}

fn demo_profile(as_of: NaiveDate) -> ProfileSubmission {
    let recorded_at = as_of
        .checked_sub_months(Months::new(3))
        .unwrap_or(as_of)
        .and_time(NaiveTime::MIN)
        .and_utc();

    ProfileSubmission {
        smoking: Some(true),
        smoking_severity: Some(SmokingSeverity::Moderate),
        smoking_years: Some(12),
        vaping: Some(VapingLevel::None),
        alcohol: Some(AlcoholLevel::High),
        height_cm: Some(176.0),
        weight_kg: Some(84.0),
        birth_date: NaiveDate::from_ymd_opt(1979, 5, 21),
        diagnoses: vec!["gastritis".to_string()],
        symptoms: vec![SymptomEntry {
            name: "bloating".to_string(),
            severity: 4,
            recorded_at: Some(recorded_at),
        }],
        medications: vec!["omeprazole".to_string()],
        diet: Some(DietProfile {
            fast_food_frequency: Some(Frequency::Often),
            sugar_level: Some(IntakeLevel::High),
            vegetables_frequency: Some(Frequency::Rare),
            protein_level: Some(IntakeLevel::Moderate),
            ..DietProfile::default()
        }),
        ..ProfileSubmission::default()
    }
}
