//! Event browsing endpoints:
//! - GET /api/events - List events with current availability
//! - GET /api/events/:id - Get one event

use super::AppError;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ticketing_core::{Event, EventId};
use uuid::Uuid;

/// Event details response.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventResponse {
    /// Event ID
    pub id: Uuid,
    /// Event name
    pub name: String,
    /// Venue
    pub location: String,
    /// Start time
    pub starts_at: DateTime<Utc>,
    /// Unit price, formatted with two decimals
    pub price: String,
    /// Unit price in minor currency units
    pub price_minor_units: u64,
    /// Tickets still for sale
    pub available_tickets: u32,
    /// Capacity
    pub total_tickets: u32,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: *event.id.as_uuid(),
            price: event.price.to_string(),
            price_minor_units: event.price.minor_units(),
            available_tickets: event.available_tickets,
            total_tickets: event.total_tickets,
            starts_at: event.starts_at,
            name: event.name,
            location: event.location,
        }
    }
}

/// List all events, soonest first.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/events
/// ```
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventResponse>>, AppError> {
    let events = state.coordinator.events().await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

/// Get event details by ID.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/events/550e8400-e29b-41d4-a716-446655440000
/// ```
pub async fn get_event(
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<EventResponse>, AppError> {
    let event = state.coordinator.event(EventId::from_uuid(event_id)).await?;
    Ok(Json(event.into()))
}
