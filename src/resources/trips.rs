//! Trips: a planned haul from the driver's current location via pickup to dropoff.

use serde::{Deserialize, Serialize};

use crate::http::ApiError;
use crate::resources::model::{Model, ModelViewSet};

/// Hours available in the 70-hour/8-day duty cycle.
pub const MAX_CYCLE_HOURS: f64 = 70.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(default)]
    pub id: u64,
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    /// Cycle hours already used when the trip starts.
    pub current_cycle_used: f64,
}

pub type TripViewSet = ModelViewSet<Trip>;

impl Model for Trip {
    const BASENAME: &'static str = "trip";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ApiError> {
        let locations = [
            ("current_location", &self.current_location),
            ("pickup_location", &self.pickup_location),
            ("dropoff_location", &self.dropoff_location),
        ];
        for (field, value) in locations {
            if value.trim().is_empty() {
                return Err(ApiError::Validation(format!("{field}: may not be blank")));
            }
        }

        if !(0.0..=MAX_CYCLE_HOURS).contains(&self.current_cycle_used) {
            return Err(ApiError::Validation(format!(
                "current_cycle_used: must be between 0 and {MAX_CYCLE_HOURS} hours"
            )));
        }
        Ok(())
    }
}
