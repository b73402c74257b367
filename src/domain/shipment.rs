// Shipment delay form - field set defined by the prediction API contract
use crate::application::form_schema::{FieldRule, FormSchema};
use crate::domain::prediction::format_hours;
use serde::{Deserialize, Serialize};

/// Flat form state for the shipment delay prediction.
///
/// Field names and declaration order match the `/predict_time_delay`
/// request contract; the wire mapper passes both through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentDelayForm {
    pub timestamp: String,
    pub vehicle_gps_latitude: f64,
    pub vehicle_gps_longitude: f64,
    pub fuel_consumption_rate: f64,
    pub eta_variation_hours: f64,
    pub traffic_congestion_level: f64,
    pub warehouse_inventory_level: f64,
    pub loading_unloading_time: f64,
    pub handling_equipment_availability: f64,
    pub order_fulfillment_status: f64,
    pub weather_condition_severity: f64,
    pub port_congestion_level: f64,
    pub shipping_costs: f64,
    pub supplier_reliability_score: f64,
    pub lead_time_days: f64,
    pub historical_demand: f64,
    pub iot_temperature: f64,
    pub cargo_condition_status: f64,
    pub route_risk_level: f64,
    pub customs_clearance_time: f64,
    pub driver_behavior_score: f64,
    pub fatigue_monitoring_score: f64,
}

impl Default for ShipmentDelayForm {
    fn default() -> Self {
        Self {
            timestamp: chrono::Local::now().format("%Y-%m-%dT%H:%M").to_string(),
            vehicle_gps_latitude: 40.7128,
            vehicle_gps_longitude: -74.0060,
            fuel_consumption_rate: 8.5,
            eta_variation_hours: 2.0,
            traffic_congestion_level: 5.0,
            warehouse_inventory_level: 75.0,
            loading_unloading_time: 1.5,
            handling_equipment_availability: 0.8,
            order_fulfillment_status: 0.9,
            weather_condition_severity: 3.0,
            port_congestion_level: 4.0,
            shipping_costs: 2500.0,
            supplier_reliability_score: 8.0,
            lead_time_days: 7.0,
            historical_demand: 1000.0,
            iot_temperature: 22.0,
            cargo_condition_status: 0.95,
            route_risk_level: 3.0,
            customs_clearance_time: 4.0,
            driver_behavior_score: 7.5,
            fatigue_monitoring_score: 8.0,
        }
    }
}

// Client-side hints only; the backend is the source of truth for acceptance.
const SHIPMENT_RULES: &[FieldRule] = &[
    FieldRule::range("vehicle_gps_latitude", -90.0, 90.0),
    FieldRule::range("vehicle_gps_longitude", -180.0, 180.0),
    FieldRule::at_least("fuel_consumption_rate", 0.0),
    FieldRule::range("traffic_congestion_level", 0.0, 10.0),
    FieldRule::at_least("warehouse_inventory_level", 0.0),
    FieldRule::at_least("loading_unloading_time", 0.0),
    FieldRule::range("handling_equipment_availability", 0.0, 1.0),
    FieldRule::range("order_fulfillment_status", 0.0, 1.0),
    FieldRule::range("weather_condition_severity", 0.0, 10.0),
    FieldRule::range("port_congestion_level", 0.0, 10.0),
    FieldRule::at_least("shipping_costs", 0.0),
    FieldRule::range("supplier_reliability_score", 0.0, 10.0),
    FieldRule::at_least("lead_time_days", 0.0),
    FieldRule::at_least("historical_demand", 0.0),
    FieldRule::range("cargo_condition_status", 0.0, 1.0),
    FieldRule::range("route_risk_level", 0.0, 10.0),
    FieldRule::at_least("customs_clearance_time", 0.0),
    FieldRule::range("driver_behavior_score", 0.0, 10.0),
    FieldRule::range("fatigue_monitoring_score", 0.0, 10.0),
];

pub struct ShipmentDelaySchema;

impl FormSchema for ShipmentDelaySchema {
    type Form = ShipmentDelayForm;

    const ENDPOINT: &'static str = "/predict_time_delay";
    const RESPONSE_LABEL: &'static str = "Time Delay (In Hours)";
    const FALLBACK_ERROR: &'static str =
        "Failed to predict time delay. Please check your inputs and try again.";

    fn defaults() -> Self::Form {
        ShipmentDelayForm::default()
    }

    fn rules() -> &'static [FieldRule] {
        SHIPMENT_RULES
    }

    fn format_result(value: f64) -> String {
        format_hours(value)
    }
}
