// Application layer - Use cases and ports
pub mod form_controller;
pub mod form_schema;
pub mod prediction_gateway;
