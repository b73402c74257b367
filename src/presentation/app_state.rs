// Application state for HTTP handlers
use crate::application::form_controller::FormController;
use crate::application::prediction_gateway::GatewayHandle;
use crate::domain::project::ProjectCostSchema;
use crate::domain::shipment::ShipmentDelaySchema;
use std::path::PathBuf;

pub struct AppState {
    pub delay_form: FormController<ShipmentDelaySchema>,
    pub cost_form: FormController<ProjectCostSchema>,
    pub gateway: GatewayHandle,
    pub override_store: PathBuf,
}
