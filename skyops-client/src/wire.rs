//! Tolerance for backend payload-shape variance lives here and nowhere else.
//!
//! Depending on which serializer the backend runs, the same record arrives
//! under camelCase, snake_case, or nested-object keys. Each normalizer below
//! documents its field-priority order: the first present key wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use skyops_core::models::{Passenger, Seat, Service, ServiceKind};

/// Y/N marker used by the backend for seat occupancy and passenger flags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum YesNo {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
}

impl From<bool> for YesNo {
    fn from(v: bool) -> Self {
        if v {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// Integer that may arrive as a JSON number or a numeric string.
fn as_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_float(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First present key wins.
fn int_field(v: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| v.get(k).and_then(as_int))
}

fn str_field(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| v.get(k).and_then(Value::as_str))
        .map(str::to_string)
}

/// Tri-state flag: boolean, "Y"/"N" marker (case-insensitive), or absent.
fn tristate_field(v: &Value, key: &str) -> Option<bool> {
    match v.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_uppercase().as_str() {
            "Y" => Some(true),
            "N" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Normalize one seat record.
///
/// Priority order:
/// - id: `seatId`, `id`, `seat_id`
/// - number: `seatNumber`, `seat_number`
/// - flight: `flightId`, `flight.flightId`, `flight_id`, `flight.flight_id`
/// - passenger: `passengerId`, `passenger_id`, `passenger.passengerId`,
///   `passenger.passenger_id`
/// - occupancy: `checkedIn`/`checked_in` equal to "Y" (case-insensitive),
///   else boolean `occupied`
///
/// Records missing an id or flight reference are unusable and dropped.
pub fn seat_from_value(v: &Value) -> Option<Seat> {
    let id = int_field(v, &["seatId", "id", "seat_id"])?;
    let seat_number = str_field(v, &["seatNumber", "seat_number"]).unwrap_or_default();

    let flight_id = int_field(v, &["flightId"])
        .or_else(|| v.get("flight").and_then(|f| int_field(f, &["flightId"])))
        .or_else(|| int_field(v, &["flight_id"]))
        .or_else(|| v.get("flight").and_then(|f| int_field(f, &["flight_id"])))?;

    let passenger_id = int_field(v, &["passengerId", "passenger_id"]).or_else(|| {
        v.get("passenger")
            .and_then(|p| int_field(p, &["passengerId", "passenger_id"]))
    });

    let checked_in = str_field(v, &["checkedIn", "checked_in"])
        .map(|s| s.eq_ignore_ascii_case("Y"))
        .unwrap_or(false);
    let occupied = checked_in || v.get("occupied").and_then(Value::as_bool) == Some(true);

    Some(Seat {
        id,
        seat_number,
        flight_id,
        occupied,
        passenger_id,
    })
}

/// Normalize one passenger record.
///
/// Flight reference priority: `flight.flightId`, then `flightId`.
pub fn passenger_from_value(v: &Value) -> Option<Passenger> {
    let id = int_field(v, &["passengerId", "id", "passenger_id"])?;
    let name = str_field(v, &["name"]).unwrap_or_default();

    let flight_id = v
        .get("flight")
        .and_then(|f| int_field(f, &["flightId", "flight_id"]))
        .or_else(|| int_field(v, &["flightId", "flight_id"]));

    Some(Passenger {
        id,
        name,
        dob: str_field(v, &["dob"]),
        passport: str_field(v, &["passport"]),
        address: str_field(v, &["address"]),
        meal_preference: str_field(v, &["mealPreference", "meal_preference"]),
        wheelchair: tristate_field(v, "wheelchair"),
        infant: tristate_field(v, "infant"),
        email: str_field(v, &["email"]),
        phone: str_field(v, &["phone"]),
        flight_id,
    })
}

/// Normalize one service record.
///
/// The backend stores the broad class in `category` (lowercase) and, for
/// meals, the subtype in `type`; older rows have the broad class in `type`
/// instead. Priority: a `category` that parses as a broad class wins, then
/// `type`; whichever of the two is left over and is not a broad class is
/// kept as the category/subtype. Rows with no recognizable class are
/// dropped with a warning.
pub fn service_from_value(v: &Value) -> Option<Service> {
    let id = int_field(v, &["serviceId", "id"])?;
    let name = str_field(v, &["name"]).unwrap_or_default();

    let type_raw = str_field(v, &["type"]).unwrap_or_default();
    let cat_raw = str_field(v, &["category"]).unwrap_or_default();

    let kind = ServiceKind::parse(&cat_raw).or_else(|| ServiceKind::parse(&type_raw));
    let Some(kind) = kind else {
        tracing::warn!(id, %name, "service row has no recognizable class, dropping");
        return None;
    };

    let category = [type_raw.as_str(), cat_raw.as_str()]
        .into_iter()
        .find(|s| !s.is_empty() && ServiceKind::parse(s).is_none())
        .map(|s| s.to_lowercase());

    let flight_id = v
        .get("flight")
        .and_then(|f| int_field(f, &["flightId", "flight_id"]))
        .or_else(|| int_field(v, &["flightId", "flight_id"]))?;

    let price = v.get("price").and_then(as_float).unwrap_or(0.0);

    Some(Service {
        id,
        name,
        kind,
        category,
        price,
        flight_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seat_accepts_camel_snake_and_nested_shapes() {
        let shapes = [
            json!({"seatId": 5, "seatNumber": "3C", "flightId": 9, "passengerId": 7, "checkedIn": "Y"}),
            json!({"id": 5, "seat_number": "3C", "flight": {"flightId": 9}, "passenger_id": 7, "checked_in": "y"}),
            json!({"seat_id": 5, "seatNumber": "3C", "flight": {"flight_id": 9}, "passenger": {"passengerId": 7}, "occupied": true}),
            json!({"seatId": 5, "seatNumber": "3C", "flight_id": 9, "passenger": {"passenger_id": 7}, "checkedIn": "Y"}),
        ];
        let expected = Seat {
            id: 5,
            seat_number: "3C".into(),
            flight_id: 9,
            occupied: true,
            passenger_id: Some(7),
        };
        for shape in &shapes {
            assert_eq!(seat_from_value(shape).as_ref(), Some(&expected), "shape {shape}");
        }
    }

    #[test]
    fn seat_occupancy_needs_y_or_boolean() {
        let free = json!({"seatId": 1, "seatNumber": "1A", "flightId": 2, "checkedIn": "N"});
        assert!(!seat_from_value(&free).unwrap().occupied);

        let no_marker = json!({"seatId": 1, "seatNumber": "1A", "flightId": 2});
        assert!(!seat_from_value(&no_marker).unwrap().occupied);
    }

    #[test]
    fn seat_without_id_or_flight_is_dropped() {
        assert!(seat_from_value(&json!({"seatNumber": "1A", "flightId": 2})).is_none());
        assert!(seat_from_value(&json!({"seatId": 1, "seatNumber": "1A"})).is_none());
    }

    #[test]
    fn numeric_strings_are_tolerated() {
        let v = json!({"seatId": "5", "seatNumber": "3C", "flightId": "9", "checkedIn": "N"});
        let seat = seat_from_value(&v).unwrap();
        assert_eq!(seat.id, 5);
        assert_eq!(seat.flight_id, 9);
    }

    #[test]
    fn passenger_prefers_nested_flight_reference() {
        let v = json!({
            "passengerId": 3,
            "name": "A. Rao",
            "wheelchair": "Y",
            "infant": false,
            "flight": {"flightId": 11},
            "flightId": 99
        });
        let p = passenger_from_value(&v).unwrap();
        assert_eq!(p.flight_id, Some(11));
        assert_eq!(p.wheelchair, Some(true));
        assert_eq!(p.infant, Some(false));
    }

    #[test]
    fn passenger_unknown_flags_stay_unknown() {
        let v = json!({"passengerId": 3, "name": "A. Rao", "wheelchair": "maybe"});
        let p = passenger_from_value(&v).unwrap();
        assert_eq!(p.wheelchair, None);
        assert_eq!(p.infant, None);
    }

    #[test]
    fn service_class_resolution() {
        // New rows: category holds the class, type holds the meal subtype.
        let meal = json!({"serviceId": 1, "name": "Dinner", "category": "meal", "type": "non-veg",
                          "price": 12.5, "flight": {"flightId": 4}});
        let s = service_from_value(&meal).unwrap();
        assert_eq!(s.kind, ServiceKind::Meal);
        assert_eq!(s.category.as_deref(), Some("non-veg"));
        assert_eq!(s.price, 12.5);

        // Old rows: type holds the class.
        let old = json!({"id": 2, "name": "Extra bag", "type": "ANCILLARY", "flightId": 4, "price": 30});
        let s = service_from_value(&old).unwrap();
        assert_eq!(s.kind, ServiceKind::Ancillary);
        assert_eq!(s.category, None);

        // Unclassifiable rows are dropped.
        let junk = json!({"serviceId": 3, "name": "?", "type": "mystery", "flightId": 4});
        assert!(service_from_value(&junk).is_none());
    }

    #[test]
    fn yes_no_wire_format() {
        assert_eq!(serde_json::to_string(&YesNo::Yes).unwrap(), "\"Y\"");
        assert_eq!(serde_json::to_string(&YesNo::from(false)).unwrap(), "\"N\"");
    }
}
