// Project cost form - field set defined by the prediction API contract
use crate::application::form_schema::{FieldRule, FormSchema};
use crate::domain::prediction::format_usd;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    Tunnel,
    Dam,
    Building,
    Road,
    Bridge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    Snowy,
    Cloudy,
    Sunny,
    Rainy,
    Stormy,
}

/// Flat form state for the project cost prediction.
///
/// The backend contract uses capitalized snake case for this schema, so
/// every field carries an explicit rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCostForm {
    #[serde(rename = "Project_Type")]
    pub project_type: ProjectType,
    #[serde(rename = "Planned_Cost")]
    pub planned_cost: f64,
    #[serde(rename = "Planned_Duration")]
    pub planned_duration: f64,
    #[serde(rename = "Load_Bearing_Capacity")]
    pub load_bearing_capacity: f64,
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    #[serde(rename = "Humidity")]
    pub humidity: f64,
    #[serde(rename = "Weather_Condition")]
    pub weather_condition: WeatherCondition,
    #[serde(rename = "Air_Quality_Index")]
    pub air_quality_index: f64,
    #[serde(rename = "Energy_Consumption")]
    pub energy_consumption: f64,
    #[serde(rename = "Material_Usage")]
    pub material_usage: f64,
    #[serde(rename = "Labor_Hours")]
    pub labor_hours: f64,
    #[serde(rename = "Accident_Count")]
    pub accident_count: f64,
}

impl Default for ProjectCostForm {
    fn default() -> Self {
        Self {
            project_type: ProjectType::Building,
            planned_cost: 500000.0,
            planned_duration: 365.0,
            load_bearing_capacity: 1000.0,
            temperature: 25.0,
            humidity: 60.0,
            weather_condition: WeatherCondition::Sunny,
            air_quality_index: 50.0,
            energy_consumption: 15000.0,
            material_usage: 2500.0,
            labor_hours: 8000.0,
            accident_count: 2.0,
        }
    }
}

const PROJECT_RULES: &[FieldRule] = &[
    FieldRule::at_least("Planned_Cost", 0.0),
    FieldRule::at_least("Planned_Duration", 0.0),
    FieldRule::at_least("Load_Bearing_Capacity", 0.0),
    FieldRule::range("Humidity", 0.0, 100.0),
    FieldRule::range("Air_Quality_Index", 0.0, 500.0),
    FieldRule::at_least("Energy_Consumption", 0.0),
    FieldRule::at_least("Material_Usage", 0.0),
    FieldRule::at_least("Labor_Hours", 0.0),
    FieldRule::at_least("Accident_Count", 0.0),
];

pub struct ProjectCostSchema;

impl FormSchema for ProjectCostSchema {
    type Form = ProjectCostForm;

    const ENDPOINT: &'static str = "/predict_actual_cost";
    const RESPONSE_LABEL: &'static str = "Predicted Actual Cost of Project (USD)";
    const FALLBACK_ERROR: &'static str =
        "Failed to predict actual cost. Please check your inputs and try again.";

    fn defaults() -> Self::Form {
        ProjectCostForm::default()
    }

    fn rules() -> &'static [FieldRule] {
        PROJECT_RULES
    }

    fn format_result(value: f64) -> String {
        format_usd(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categoricals_serialize_by_name() {
        assert_eq!(
            serde_json::to_string(&ProjectType::Building).unwrap(),
            "\"Building\""
        );
        assert_eq!(
            serde_json::to_string(&WeatherCondition::Stormy).unwrap(),
            "\"Stormy\""
        );
    }

    #[test]
    fn test_wire_field_names() {
        let flat = serde_json::to_value(ProjectCostForm::default()).unwrap();
        let fields = flat.as_object().unwrap();
        assert!(fields.contains_key("Project_Type"));
        assert!(fields.contains_key("Accident_Count"));
        assert_eq!(fields.len(), 12);
    }

    #[test]
    fn test_unknown_categorical_rejected() {
        let result = serde_json::from_str::<WeatherCondition>("\"Foggy\"");
        assert!(result.is_err());
    }
}
