//! Assess command - run the symptom checker on supplied readings

use anyhow::Result;
use colored::Colorize;
use healthbridge_core::domain::assessment::COMMON_SYMPTOMS;
use healthbridge_core::{analyze_health, HealthCheck, LogEvent, VitalSigns};

use super::{get_logger, log_event};
use crate::output;

#[derive(clap::Args)]
pub struct AssessArgs {
    /// Systolic blood pressure (mmHg)
    #[arg(long, default_value = "")]
    pub systolic: String,
    /// Diastolic blood pressure (mmHg)
    #[arg(long, default_value = "")]
    pub diastolic: String,
    /// Heart rate (bpm)
    #[arg(long, default_value = "")]
    pub heart_rate: String,
    /// Blood sugar (mg/dL)
    #[arg(long, default_value = "")]
    pub blood_sugar: String,
    /// Temperature
    #[arg(long, default_value = "")]
    pub temperature: String,
    /// Weight
    #[arg(long, default_value = "")]
    pub weight: String,
    /// Symptom name (repeatable), e.g. "Chest Pain"
    #[arg(long = "symptom")]
    pub symptoms: Vec<String>,
    /// Pain level on a 0-10 scale
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=10))]
    pub pain_level: u8,
    /// List known symptom names and exit
    #[arg(long)]
    pub list_symptoms: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: AssessArgs) -> Result<()> {
    if args.list_symptoms {
        if args.json {
            let names: Vec<&str> = COMMON_SYMPTOMS.iter().map(|(name, _)| *name).collect();
            output::json(&names)?;
        } else {
            for (name, _) in COMMON_SYMPTOMS {
                println!("  • {}", name);
            }
        }
        return Ok(());
    }

    let check = HealthCheck {
        vitals: VitalSigns {
            blood_pressure_systolic: args.systolic,
            blood_pressure_diastolic: args.diastolic,
            heart_rate: args.heart_rate,
            blood_sugar: args.blood_sugar,
            temperature: args.temperature,
            weight: args.weight,
        },
        symptoms: args.symptoms,
        pain_level: args.pain_level,
    };
    let assessment = analyze_health(&check);

    // Readings stay out of the log
    let logger = get_logger().map(std::sync::Arc::new);
    log_event(
        &logger,
        LogEvent::new("health_assessed")
            .with_command("assess")
            .with_outcome(if assessment.is_urgent() { "urgent" } else { "routine" }),
    );

    if args.json {
        return output::json(&assessment);
    }

    println!("{}", "Health Assessment".bold());
    println!();

    let mut table = output::table(&["Condition", "Risk", "Details"]);
    for risk in &assessment.risks {
        table.add_row(vec![
            risk.condition.clone(),
            output::risk_label(risk.level),
            risk.description.clone(),
        ]);
    }
    println!("{}", table);

    println!();
    println!("{}", "Recommendations".bold());
    for recommendation in &assessment.recommendations {
        println!("  • {}", recommendation);
    }
    println!();
    println!("Pain: {}", assessment.pain_description);

    if assessment.is_urgent() {
        println!();
        output::warning("One or more readings need prompt medical attention.");
    }

    Ok(())
}
