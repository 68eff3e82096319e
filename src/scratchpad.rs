//! Process-wide scratch state
//!
//! Holds the per-fleet trip lists and the briefing history. Nothing in here
//! is persisted: a restart starts from an empty scratchpad. That volatility
//! is intended, both features are quick data-entry scratch lists.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::Mutex;

/// A trip entry on a fleet scratch list
///
/// Unrelated to the persisted trip ledger.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetTrip {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub purpose: Option<String>,
}

/// One submitted briefing form
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefingEntry {
    pub name: String,
    pub date: String,
    pub vessel_name: String,
    pub person_in_charge: String,
    pub status: String,
}

/// In-memory scratch store, shared between all requests
#[derive(Clone, Default)]
pub struct Scratchpad {
    /// Fleet name to ordered trip list
    fleet_trips: Arc<Mutex<HashMap<String, Vec<FleetTrip>>>>,

    /// Append-only briefing history
    briefing_history: Arc<Mutex<Vec<BriefingEntry>>>,
}

impl Scratchpad {
    /// Create a new empty scratchpad
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trip to a fleet, creating the fleet bucket if absent
    pub async fn add_fleet_trip(&self, fleet: &str, trip: FleetTrip) {
        self.fleet_trips
            .lock()
            .await
            .entry(fleet.to_string())
            .or_default()
            .push(trip);
    }

    /// Snapshot of the whole fleet map
    pub async fn fleet_trips(&self) -> HashMap<String, Vec<FleetTrip>> {
        self.fleet_trips.lock().await.clone()
    }

    /// Append an entry to the briefing history
    pub async fn add_briefing_entry(&self, entry: BriefingEntry) {
        self.briefing_history.lock().await.push(entry);
    }

    /// Snapshot of the briefing history, oldest first
    pub async fn briefing_history(&self) -> Vec<BriefingEntry> {
        self.briefing_history.lock().await.clone()
    }
}
