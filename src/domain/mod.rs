// Domain layer - Form records and presentation rules
pub mod prediction;
pub mod project;
pub mod shipment;
