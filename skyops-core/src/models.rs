use serde::{Deserialize, Serialize};

/// A scheduled flight as served by the backend. Timestamps are kept as the
/// backend's own strings; the console never does date arithmetic on them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    #[serde(rename = "flightId")]
    pub id: i64,
    pub flight_number: Option<String>,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub departure_time: String,
    pub arrival_time: String,
    pub available_seats: Option<i32>,
    pub route: Option<String>,
}

impl Flight {
    /// One-line label for pickers and log lines, e.g. "AI-204 DEL → BOM".
    pub fn display_label(&self) -> String {
        format!(
            "{} {} → {}",
            self.flight_number.as_deref().unwrap_or("N/A"),
            self.source.as_deref().unwrap_or(""),
            self.destination.as_deref().unwrap_or(""),
        )
    }
}

/// A passenger booked onto exactly one flight.
///
/// `wheelchair` and `infant` are tri-state: the backend may send a boolean,
/// a Y/N marker, or nothing at all. `None` means unknown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    #[serde(rename = "passengerId")]
    pub id: i64,
    pub name: String,
    pub dob: Option<String>,
    pub passport: Option<String>,
    pub address: Option<String>,
    pub meal_preference: Option<String>,
    pub wheelchair: Option<bool>,
    pub infant: Option<bool>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub flight_id: Option<i64>,
}

/// One physical seat on one flight.
///
/// Invariant: `passenger_id` is only meaningful while `occupied` is true;
/// an unoccupied seat may still carry a stale passenger id from the backend
/// and callers must treat it as free.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    #[serde(rename = "seatId")]
    pub id: i64,
    pub seat_number: String,
    pub flight_id: i64,
    pub occupied: bool,
    pub passenger_id: Option<i64>,
}

/// Broad service classification sold per flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceKind {
    Ancillary,
    Meal,
    Shopping,
}

impl ServiceKind {
    /// Tolerant parse of the backend's service type/category strings.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "ANCILLARY" => Some(Self::Ancillary),
            "MEAL" => Some(Self::Meal),
            "SHOPPING" => Some(Self::Shopping),
            _ => None,
        }
    }

    /// The lowercase category string the backend stores.
    pub fn backend_category(&self) -> &'static str {
        match self {
            Self::Ancillary => "ancillary",
            Self::Meal => "meal",
            Self::Shopping => "shopping",
        }
    }
}

/// Meal subtype refinement, only meaningful for `ServiceKind::Meal`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealKind {
    Veg,
    NonVeg,
    Jain,
    Vegan,
    GlutenFree,
}

impl MealKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().replace('-', "_").as_str() {
            "VEG" => Some(Self::Veg),
            "NON_VEG" => Some(Self::NonVeg),
            "JAIN" => Some(Self::Jain),
            "VEGAN" => Some(Self::Vegan),
            "GLUTEN_FREE" => Some(Self::GlutenFree),
            _ => None,
        }
    }

    /// The string the backend stores in the service `type` column for meals.
    pub fn backend_subtype(&self) -> &'static str {
        match self {
            Self::Veg => "veg",
            Self::NonVeg => "non-veg",
            Self::Jain => "jain",
            Self::Vegan => "vegan",
            Self::GlutenFree => "gluten_free",
        }
    }
}

/// An in-flight service (meal, ancillary, or shopping item) owned by a flight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "serviceId")]
    pub id: i64,
    pub name: String,
    pub kind: ServiceKind,
    pub category: Option<String>,
    pub price: f64,
    pub flight_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_kind_parse_is_case_insensitive() {
        assert_eq!(ServiceKind::parse("meal"), Some(ServiceKind::Meal));
        assert_eq!(ServiceKind::parse("ANCILLARY"), Some(ServiceKind::Ancillary));
        assert_eq!(ServiceKind::parse("duty-free"), None);
    }

    #[test]
    fn meal_kind_maps_to_backend_strings() {
        assert_eq!(MealKind::parse("NON_VEG"), Some(MealKind::NonVeg));
        assert_eq!(MealKind::parse("non-veg"), Some(MealKind::NonVeg));
        assert_eq!(MealKind::NonVeg.backend_subtype(), "non-veg");
        assert_eq!(MealKind::GlutenFree.backend_subtype(), "gluten_free");
    }

    #[test]
    fn service_kind_serializes_screaming_snake() {
        let json = serde_json::to_string(&ServiceKind::Shopping).unwrap();
        assert_eq!(json, "\"SHOPPING\"");
    }

    #[test]
    fn flight_display_label_tolerates_missing_fields() {
        let flight = Flight {
            id: 1,
            flight_number: None,
            source: Some("DEL".into()),
            destination: None,
            departure_time: "2026-01-01T08:00:00".into(),
            arrival_time: "2026-01-01T10:00:00".into(),
            available_seats: None,
            route: None,
        };
        assert_eq!(flight.display_label(), "N/A DEL → ");
    }
}
