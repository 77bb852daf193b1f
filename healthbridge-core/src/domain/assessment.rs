//! Symptom checker domain model and rule-based risk scoring

use serde::{Deserialize, Serialize};

/// Systolic pressure above this is elevated
pub const SYSTOLIC_ELEVATED: i64 = 140;
/// Systolic pressure above this is severe
pub const SYSTOLIC_SEVERE: i64 = 180;
/// Blood sugar (mg/dL) above this is elevated
pub const BLOOD_SUGAR_ELEVATED: i64 = 140;
/// Blood sugar (mg/dL) above this is dangerous
pub const BLOOD_SUGAR_SEVERE: i64 = 200;

/// Symptom names offered by the checker
pub const COMMON_SYMPTOMS: &[(&str, &str)] = &[
    ("Headache", "Neurological"),
    ("Chest Pain", "Cardiac"),
    ("Shortness of Breath", "Respiratory"),
    ("Fatigue", "General"),
    ("Nausea", "Digestive"),
    ("Dizziness", "Neurological"),
    ("Fever", "General"),
    ("Joint Pain", "Musculoskeletal"),
];

const CHEST_PAIN: &str = "Chest Pain";

/// Vital signs as typed into the form; blank or non-numeric values are ignored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    #[serde(default)]
    pub blood_pressure_systolic: String,
    #[serde(default)]
    pub blood_pressure_diastolic: String,
    #[serde(default)]
    pub heart_rate: String,
    #[serde(default)]
    pub blood_sugar: String,
    #[serde(default)]
    pub temperature: String,
    #[serde(default)]
    pub weight: String,
}

/// Everything the checker collects before analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    #[serde(default)]
    pub vitals: VitalSigns,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub pain_level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Good,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::Good => "Good",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthRisk {
    pub condition: String,
    pub level: RiskLevel,
    pub description: String,
}

impl HealthRisk {
    fn new(condition: &str, level: RiskLevel, description: &str) -> Self {
        Self {
            condition: condition.to_string(),
            level,
            description: description.to_string(),
        }
    }
}

/// Result of a health analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub risks: Vec<HealthRisk>,
    pub recommendations: Vec<String>,
    pub pain_description: String,
}

impl Assessment {
    /// True when any risk is high
    pub fn is_urgent(&self) -> bool {
        self.risks.iter().any(|r| r.level == RiskLevel::High)
    }
}

fn parse_reading(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Score a health check against the fixed threshold rules
///
/// Rules are evaluated in order: blood pressure, blood sugar, chest pain.
/// When none fire, a single "General Health" entry is returned.
pub fn analyze_health(check: &HealthCheck) -> Assessment {
    let mut risks = Vec::new();
    let mut recommendations = Vec::new();

    if let Some(systolic) = parse_reading(&check.vitals.blood_pressure_systolic) {
        if systolic > SYSTOLIC_ELEVATED {
            let risk = if systolic > SYSTOLIC_SEVERE {
                HealthRisk::new(
                    "Blood Pressure",
                    RiskLevel::High,
                    "Severely elevated blood pressure - seek immediate care",
                )
            } else {
                HealthRisk::new(
                    "Blood Pressure",
                    RiskLevel::Medium,
                    "Elevated blood pressure - consult your doctor",
                )
            };
            risks.push(risk);
            recommendations.push("Schedule appointment with cardiologist".to_string());
        }
    }

    if let Some(sugar) = parse_reading(&check.vitals.blood_sugar) {
        if sugar > BLOOD_SUGAR_ELEVATED {
            let risk = if sugar > BLOOD_SUGAR_SEVERE {
                HealthRisk::new(
                    "Blood Sugar",
                    RiskLevel::High,
                    "Dangerously high blood sugar levels detected",
                )
            } else {
                HealthRisk::new(
                    "Blood Sugar",
                    RiskLevel::Medium,
                    "Elevated blood sugar levels detected",
                )
            };
            risks.push(risk);
            recommendations.push("Consult an endocrinologist".to_string());
        }
    }

    if check.symptoms.iter().any(|s| s == CHEST_PAIN) {
        risks.push(HealthRisk::new(
            "Cardiac Concern",
            RiskLevel::High,
            "Chest pain requires immediate medical attention",
        ));
        recommendations.push("Seek emergency care if pain persists".to_string());
    }

    if risks.is_empty() {
        risks.push(HealthRisk::new(
            "General Health",
            RiskLevel::Good,
            "No immediate health concerns detected",
        ));
        recommendations.push("Maintain regular checkups and healthy lifestyle".to_string());
    }

    Assessment {
        risks,
        recommendations,
        pain_description: pain_level_description(check.pain_level).to_string(),
    }
}

/// Human label for a 0-10 pain scale value
pub fn pain_level_description(level: u8) -> &'static str {
    match level {
        0 => "No pain",
        1..=3 => "Mild",
        4..=6 => "Moderate",
        7..=8 => "Severe",
        _ => "Extreme",
    }
}
