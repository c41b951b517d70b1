//! Serialized shape of `dataset.json`.

use serde::Serialize;

use evl_optimize::SolveStatus;
use evl_platform::{ArtificialMap, OptimizeRequest, OptimizeResponse, TruckAssignment};

/// Run parameters and headline results of one run, optionally with the map
/// and the assignment list.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub parameters:          OptimizeRequest,
    pub seed:                u64,
    pub strategy:            String,
    pub status:              SolveStatus,
    pub objective_value:     Option<f64>,
    pub n_assigned:          usize,
    pub n_trucks:            usize,
    pub green_zones:         Vec<u16>,
    pub assigned_energy_kwh: f64,
    pub training_records:    usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignments:         Option<Vec<TruckAssignment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artificial_map:      Option<ArtificialMap>,
}

impl DatasetSummary {
    pub fn from_response(
        response: &OptimizeResponse,
        training_records: usize,
        with_assignments: bool,
        with_map: bool,
    ) -> Self {
        Self {
            parameters: response.request.clone(),
            seed: response.seed,
            strategy: response.strategy.clone(),
            status: response.status,
            objective_value: response.objective_value,
            n_assigned: response.n_assigned,
            n_trucks: response.request.num_trucks,
            green_zones: response.green_zones.clone(),
            assigned_energy_kwh: response.assigned_energy_kwh(),
            training_records,
            assignments: with_assignments.then(|| response.truck_assignments.clone()),
            artificial_map: with_map.then(|| response.artificial_map.clone()),
        }
    }
}
