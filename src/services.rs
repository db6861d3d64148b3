//! Canned IRCTC lookups backing the assistant's actions.
//!
//! These are deterministic stand-ins: no network, no booking state.

use serde::{Deserialize, Serialize};

/// One train on a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainRecord {
    pub train_name: String,
    pub train_number: String,
    pub departure: String,
    pub arrival: String,
}

impl TrainRecord {
    fn new(name: &str, number: &str, departure: &str, arrival: &str) -> Self {
        Self {
            train_name: name.to_string(),
            train_number: number.to_string(),
            departure: departure.to_string(),
            arrival: arrival.to_string(),
        }
    }
}

/// Seat availability per class for one train.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub train_number: String,
    #[serde(rename = "SL")]
    pub sleeper: String,
    #[serde(rename = "3AC")]
    pub third_ac: String,
    #[serde(rename = "2AC")]
    pub second_ac: String,
}

const CANCELLATION_POLICY: &str = "IRCTC Cancellation Policy:
- 48 hrs before departure: 25% deduction
- 12-48 hrs: 50% deduction
- Less than 12 hrs: No refund";

/// Trains between two stations. The route does not narrow the result.
pub fn search_trains(source: &str, destination: &str) -> Vec<TrainRecord> {
    tracing::debug!(source, destination, "searching trains");
    vec![
        TrainRecord::new("Rajdhani Express", "12301", "18:00", "06:00"),
        TrainRecord::new("Shatabdi Express", "12002", "07:00", "13:00"),
    ]
}

pub fn check_availability(train_number: &str) -> Availability {
    Availability {
        train_number: train_number.to_string(),
        sleeper: "Available 45".to_string(),
        third_ac: "WL 12".to_string(),
        second_ac: "Available 10".to_string(),
    }
}

pub fn cancellation_policy() -> &'static str {
    CANCELLATION_POLICY
}
