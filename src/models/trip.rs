use serde::{Deserialize, Serialize};

use super::itinerary::ItineraryElement;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Assigned by storage; empty until the trip has been saved.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub start: String,
    pub end: String,
    pub owner: String,
    pub shared_with: Vec<String>,
    pub itinerary: Vec<ItineraryElement>,
}

/// Caller-supplied trip fields, used for both creation and full replacement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripInput {
    pub name: String,
    pub description: String,
    pub start: String,
    pub end: String,
    pub owner: String,
    pub shared_with: Vec<String>,
    pub itinerary: Vec<ItineraryElement>,
}

impl Trip {
    /// Unsaved trip built from input, with the itinerary kept in input order.
    pub fn from_input(input: TripInput) -> Self {
        Self {
            id: String::new(),
            name: input.name,
            description: input.description,
            start: input.start,
            end: input.end,
            owner: input.owner,
            shared_with: input.shared_with,
            itinerary: input.itinerary,
        }
    }

    /// Overwrites every caller-owned field. The id is left alone.
    pub fn replace_with(&mut self, input: TripInput) {
        self.name = input.name;
        self.description = input.description;
        self.start = input.start;
        self.end = input.end;
        self.owner = input.owner;
        self.shared_with = input.shared_with;
        self.itinerary = input.itinerary;
    }
}
