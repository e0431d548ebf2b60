//! Log sheets: one driver's daily duty-status totals for a trip.

use serde::{Deserialize, Serialize};

use std::sync::Arc;

use crate::http::ApiError;
use crate::resources::model::{Model, ModelViewSet};
use crate::resources::store::Store;
use crate::resources::trips::Trip;

pub const HOURS_PER_DAY: f64 = 24.0;
pub const MAX_DRIVING_HOURS: f64 = 11.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSheet {
    #[serde(default)]
    pub id: u64,
    /// Id of the trip this sheet belongs to.
    pub trip: u64,
    pub date: String,
    #[serde(default)]
    pub off_duty_hours: f64,
    #[serde(default)]
    pub sleeper_berth_hours: f64,
    #[serde(default)]
    pub driving_hours: f64,
    #[serde(default)]
    pub on_duty_hours: f64,
    #[serde(default)]
    pub remarks: String,
}

pub type LogSheetViewSet = ModelViewSet<LogSheet>;

impl LogSheet {
    pub fn total_hours(&self) -> f64 {
        self.off_duty_hours + self.sleeper_berth_hours + self.driving_hours + self.on_duty_hours
    }
}

/// Log sheets whose `trip` must name a record in `trips`.
pub fn log_sheets_for(trips: Arc<Store<Trip>>) -> LogSheetViewSet {
    LogSheetViewSet::new().with_check(move |sheet: &LogSheet| {
        if trips.contains(sheet.trip) {
            Ok(())
        } else {
            Err(ApiError::Validation(format!(
                "trip: invalid pk \"{}\" - object does not exist",
                sheet.trip
            )))
        }
    })
}

impl Model for LogSheet {
    const BASENAME: &'static str = "logsheet";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.trip == 0 {
            return Err(ApiError::Validation("trip: must reference a trip".to_string()));
        }
        if self.date.trim().is_empty() {
            return Err(ApiError::Validation("date: may not be blank".to_string()));
        }

        let durations = [
            ("off_duty_hours", self.off_duty_hours),
            ("sleeper_berth_hours", self.sleeper_berth_hours),
            ("driving_hours", self.driving_hours),
            ("on_duty_hours", self.on_duty_hours),
        ];
        for (field, hours) in durations {
            if !hours.is_finite() || hours < 0.0 {
                return Err(ApiError::Validation(format!("{field}: must be a non-negative number")));
            }
        }

        if self.driving_hours > MAX_DRIVING_HOURS {
            return Err(ApiError::Validation(format!(
                "driving_hours: exceeds the {MAX_DRIVING_HOURS}-hour driving limit"
            )));
        }
        if self.total_hours() > HOURS_PER_DAY {
            return Err(ApiError::Validation(format!(
                "duty totals add up to {} hours, more than a day",
                self.total_hours()
            )));
        }
        Ok(())
    }
}
