//! Flight plan CRUD and search. Single-entity responses are nested under `flight_plan`.

use super::*;

impl RemoteClient {
    pub async fn create_flight_plan(&self, flight_plan: &FlightPlan) -> Result<FlightPlan> {
        let created: FlightPlanEnvelope = self
            .post(
                Call::new(EntityKind::FlightPlan, "create flight plan"),
                "uisrv/flight-plan",
                flight_plan,
            )
            .await?;
        Ok(created.flight_plan)
    }

    pub async fn read_flight_plan(&self, flight_plan_id: &str) -> Result<FlightPlan> {
        let found: FlightPlanEnvelope = self
            .get(
                Call::new(EntityKind::FlightPlan, "read flight plan").on(flight_plan_id),
                &format!("uisrv/flight-plan/{}", flight_plan_id),
            )
            .await?;
        Ok(found.flight_plan)
    }

    pub async fn update_flight_plan(&self, flight_plan: &FlightPlan) -> Result<FlightPlan> {
        let id = require_id(flight_plan.id.as_deref(), EntityKind::FlightPlan, "update")?;
        let updated: FlightPlanEnvelope = self
            .put(
                Call::new(EntityKind::FlightPlan, "update flight plan").on(id),
                &format!("uisrv/flight-plan/{}", id),
                flight_plan,
            )
            .await?;
        Ok(updated.flight_plan)
    }

    pub async fn search_flight_plans(&self, filter: &SearchFilter) -> Result<Vec<FlightPlan>> {
        let list: FlightPlanList = self
            .post(
                Call::new(EntityKind::FlightPlan, "search flight plans"),
                "uisrv/flight-plan/search",
                filter,
            )
            .await?;
        Ok(list.flight_plans)
    }
}
