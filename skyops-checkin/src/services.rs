use std::sync::Arc;

use skyops_client::api::{FlightApi, ServiceApi, ServicePayload};
use skyops_client::ApiError;
use skyops_core::models::{Flight, MealKind, Service, ServiceKind};

/// Backend surface the service desk needs. Flight access is required
/// because the services controller wants the full flight object embedded
/// in create and update payloads.
pub trait ServiceDeskApi: ServiceApi + FlightApi {}

impl<T: ServiceApi + FlightApi> ServiceDeskApi for T {}

/// Operator input for creating or editing a service.
#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub kind: ServiceKind,
    /// Meal subtype; only meaningful when `kind` is `Meal`.
    pub meal: Option<MealKind>,
    pub price: f64,
    pub flight_id: i64,
}

/// In-flight service management for one backend.
///
/// Create and update resolve the owning flight first; a dangling flight
/// reference is a `NotFound` error before any write is attempted.
pub struct ServiceDesk {
    api: Arc<dyn ServiceDeskApi>,
}

impl ServiceDesk {
    pub fn new(api: Arc<dyn ServiceDeskApi>) -> Self {
        Self { api }
    }

    pub async fn services_for_flight(&self, flight_id: i64) -> Result<Vec<Service>, ApiError> {
        self.api.services_for_flight(flight_id).await
    }

    pub async fn create(&self, request: &NewService) -> Result<(), ApiError> {
        let flight = self.lookup_flight(request.flight_id).await?;
        let payload = build_payload(None, request, flight);
        self.api.create_service(&payload).await
    }

    pub async fn update(&self, id: i64, request: &NewService) -> Result<(), ApiError> {
        let flight = self.lookup_flight(request.flight_id).await?;
        let payload = build_payload(Some(id), request, flight);
        self.api.update_service(id, &payload).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete_service(id).await
    }

    async fn lookup_flight(&self, flight_id: i64) -> Result<Flight, ApiError> {
        let flights = self.api.list_flights().await?;
        flights
            .into_iter()
            .find(|f| f.id == flight_id)
            .ok_or_else(|| ApiError::NotFound(format!("flight {flight_id} not found")))
    }
}

/// Map operator input onto the backend's column semantics: `category` holds
/// the broad class in lowercase, `type` holds the meal subtype for meals
/// and null for everything else.
fn build_payload(id: Option<i64>, request: &NewService, flight: Flight) -> ServicePayload {
    let subtype = match request.kind {
        ServiceKind::Meal => request.meal.map(|m| m.backend_subtype().to_string()),
        _ => None,
    };
    ServicePayload {
        service_id: id,
        name: request.name.clone(),
        subtype,
        category: request.kind.backend_category().to_string(),
        price: request.price,
        flight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::InMemoryApi;

    fn desk_with_flight() -> (Arc<InMemoryApi>, ServiceDesk) {
        let api = Arc::new(InMemoryApi::default());
        api.state.lock().unwrap().add_flight(4, "SK-404");
        (api.clone(), ServiceDesk::new(api))
    }

    #[tokio::test]
    async fn create_meal_maps_columns() {
        let (api, desk) = desk_with_flight();
        desk.create(&NewService {
            name: "Dinner".into(),
            kind: ServiceKind::Meal,
            meal: Some(MealKind::NonVeg),
            price: 12.5,
            flight_id: 4,
        })
        .await
        .unwrap();

        let state = api.state.lock().unwrap();
        let service = &state.services[0];
        assert_eq!(service.kind, ServiceKind::Meal);
        assert_eq!(service.category.as_deref(), Some("non-veg"));
        assert_eq!(service.flight_id, 4);
    }

    #[tokio::test]
    async fn create_ancillary_has_no_subtype() {
        let (api, desk) = desk_with_flight();
        desk.create(&NewService {
            name: "Extra bag".into(),
            kind: ServiceKind::Ancillary,
            meal: None,
            price: 30.0,
            flight_id: 4,
        })
        .await
        .unwrap();

        let state = api.state.lock().unwrap();
        assert_eq!(state.services[0].category, None);
    }

    #[tokio::test]
    async fn update_rewrites_columns_in_place() {
        let (api, desk) = desk_with_flight();
        {
            let mut state = api.state.lock().unwrap();
            state.add_flight(5, "SK-505");
            state.add_service(7, "Lunch", ServiceKind::Meal, 4);
        }

        desk.update(
            7,
            &NewService {
                name: "Dinner".into(),
                kind: ServiceKind::Meal,
                meal: Some(MealKind::GlutenFree),
                price: 18.0,
                flight_id: 5,
            },
        )
        .await
        .unwrap();

        let state = api.state.lock().unwrap();
        assert_eq!(state.services.len(), 1, "edits in place, no new row");
        let service = &state.services[0];
        assert_eq!(service.name, "Dinner");
        assert_eq!(service.category.as_deref(), Some("gluten_free"));
        assert_eq!(service.price, 18.0);
        assert_eq!(service.flight_id, 5, "moved to the new flight");
    }

    #[tokio::test]
    async fn update_for_missing_flight_leaves_service_untouched() {
        let (api, desk) = desk_with_flight();
        api.state
            .lock()
            .unwrap()
            .add_service(7, "Lunch", ServiceKind::Meal, 4);

        let err = desk
            .update(
                7,
                &NewService {
                    name: "Dinner".into(),
                    kind: ServiceKind::Meal,
                    meal: Some(MealKind::Veg),
                    price: 18.0,
                    flight_id: 999,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(api.state.lock().unwrap().services[0].name, "Lunch");
    }

    #[tokio::test]
    async fn create_for_missing_flight_is_not_found() {
        let (api, desk) = desk_with_flight();
        let err = desk
            .create(&NewService {
                name: "Dinner".into(),
                kind: ServiceKind::Meal,
                meal: Some(MealKind::Veg),
                price: 9.0,
                flight_id: 999,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(api.state.lock().unwrap().services.is_empty(), "no write attempted");
    }

    #[tokio::test]
    async fn services_filter_to_one_flight() {
        let (api, desk) = desk_with_flight();
        {
            let mut state = api.state.lock().unwrap();
            state.add_flight(5, "SK-505");
            state.add_service(1, "Dinner", ServiceKind::Meal, 4);
            state.add_service(2, "Duty free", ServiceKind::Shopping, 5);
        }

        let services = desk.services_for_flight(4).await.unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name, "Dinner");
    }
}
