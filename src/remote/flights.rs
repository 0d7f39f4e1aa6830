//! Flight (recorded dataset) CRUD and search.

use super::*;

impl RemoteClient {
    pub async fn create_flight(&self, flight: &Flight) -> Result<Flight> {
        self.post(
            Call::new(EntityKind::Flight, "create flight"),
            "dxpm/flights",
            flight,
        )
        .await
    }

    pub async fn read_flight(&self, flight_id: &str) -> Result<Flight> {
        self.get(
            Call::new(EntityKind::Flight, "read flight").on(flight_id),
            &format!("dxpm/flights/{}", flight_id),
        )
        .await
    }

    pub async fn update_flight(&self, flight: &Flight) -> Result<Flight> {
        let id = require_id(flight.id.as_deref(), EntityKind::Flight, "update")?;
        self.put(
            Call::new(EntityKind::Flight, "update flight").on(id),
            &format!("dxpm/flights/{}", id),
            flight,
        )
        .await
    }

    pub async fn search_flights(&self, filter: &SearchFilter) -> Result<Vec<Flight>> {
        let list: FlightList = self
            .post(
                Call::new(EntityKind::Flight, "search flights"),
                "dxpm/flights/search",
                filter,
            )
            .await?;
        Ok(list.flights)
    }
}
