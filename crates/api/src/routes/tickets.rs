//! Ticket booking, seat change, cancellation and listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use reservation::{
    CancelTicket, ModifyTicket, ParseSectionError, Passenger, PassengerDetails, ReservationEngine,
    ReserveTicket, Seat, SeatChange, SeatMap, SeatPreference, Section, Ticket, TicketId,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub engine: ReservationEngine,
}

// -- Request types --

#[derive(Deserialize)]
pub struct ReserveRequest {
    pub from_code: String,
    pub to_code: String,
    #[serde(default)]
    pub price_paid: u64,
    pub passengers: Vec<PassengerRequest>,
}

#[derive(Deserialize)]
pub struct PassengerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
    /// Preferred section letter.
    pub section: Option<String>,
    /// Preferred seat index; 0 or absent means any.
    pub seat: Option<u32>,
}

#[derive(Deserialize)]
pub struct ModifyRequest {
    /// One entry per passenger position; `null` leaves that passenger alone.
    pub passengers: Vec<Option<SeatRequest>>,
}

#[derive(Deserialize)]
pub struct SeatRequest {
    pub section: String,
    pub seat: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct TicketResponse {
    pub ticket_no: u64,
    pub from_code: String,
    pub to_code: String,
    pub price_paid: u64,
    pub passenger_count: usize,
    pub passengers: Vec<PassengerResponse>,
    pub status: String,
    pub message: String,
    pub booked_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct PassengerResponse {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    /// Empty when the passenger holds no seat.
    pub section: String,
    /// 0 when the passenger holds no seat.
    pub seat: u32,
}

#[derive(Serialize)]
pub struct ModifyResponse {
    pub ticket: TicketResponse,
    pub status: String,
    pub message: String,
    pub changes: Vec<SeatChange>,
}

impl From<&Passenger> for PassengerResponse {
    fn from(p: &Passenger) -> Self {
        Self {
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            email: p.email.clone(),
            address: p.address.clone(),
            section: p.seat.map(|s| s.section.to_string()).unwrap_or_default(),
            seat: p.seat.map(|s| s.index).unwrap_or_default(),
        }
    }
}

impl From<&Ticket> for TicketResponse {
    fn from(t: &Ticket) -> Self {
        Self {
            ticket_no: t.id().as_u64(),
            from_code: t.from_code().to_string(),
            to_code: t.to_code().to_string(),
            price_paid: t.price_paid(),
            passenger_count: t.passenger_count(),
            passengers: t.passengers().iter().map(PassengerResponse::from).collect(),
            status: t.status().to_string(),
            message: t.message().to_string(),
            booked_at: t.booked_at(),
            updated_at: t.updated_at(),
        }
    }
}

// -- Handlers --

/// POST /tickets - book a ticket.
#[tracing::instrument(skip(state, req))]
pub async fn reserve(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReserveRequest>,
) -> Result<(StatusCode, Json<TicketResponse>), ApiError> {
    let passengers = req
        .passengers
        .into_iter()
        .map(|p| {
            let preference = SeatPreference {
                section: p.section.as_deref().map(parse_section).transpose()?,
                index: p.seat,
            };
            Ok(PassengerDetails::new(p.first_name, p.last_name, p.email, p.address)
                .with_preference(preference))
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    let ticket = state
        .engine
        .reserve(ReserveTicket::new(
            req.from_code,
            req.to_code,
            req.price_paid,
            passengers,
        ))
        .await?;

    Ok((StatusCode::CREATED, Json(TicketResponse::from(&ticket))))
}

/// GET /tickets - list every ticket, newest first.
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<TicketResponse>> {
    let tickets = state.engine.list().await;
    Json(tickets.iter().map(TicketResponse::from).collect())
}

/// GET /tickets/:id - look up one ticket.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TicketResponse>, ApiError> {
    let ticket_id = parse_ticket_id(&id)?;
    let ticket = state.engine.get(ticket_id).await?;
    Ok(Json(TicketResponse::from(&ticket)))
}

/// PUT /tickets/:id/seats - move passengers to other seats.
#[tracing::instrument(skip(state, req))]
pub async fn modify(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ModifyRequest>,
) -> Result<Json<ModifyResponse>, ApiError> {
    let ticket_id = parse_ticket_id(&id)?;
    let seats = req
        .passengers
        .into_iter()
        .map(|entry| match entry {
            Some(SeatRequest { seat: 0, .. }) | None => Ok(None),
            Some(req) => Ok(Some(Seat::new(parse_section(&req.section)?, req.seat))),
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    let outcome = state
        .engine
        .modify(ModifyTicket::new(ticket_id, seats))
        .await?;

    Ok(Json(ModifyResponse {
        ticket: TicketResponse::from(&outcome.ticket),
        status: outcome.status.to_string(),
        message: outcome.message(),
        changes: outcome.changes,
    }))
}

/// DELETE /tickets/:id - cancel a ticket.
#[tracing::instrument(skip(state))]
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TicketResponse>, ApiError> {
    let ticket_id = parse_ticket_id(&id)?;
    let ticket = state.engine.cancel(CancelTicket::new(ticket_id)).await?;
    Ok(Json(TicketResponse::from(&ticket)))
}

/// GET /seats - seat ownership map.
#[tracing::instrument(skip(state))]
pub async fn seat_map(State(state): State<Arc<AppState>>) -> Json<SeatMap> {
    Json(state.engine.seat_map().await)
}

fn parse_ticket_id(id: &str) -> Result<TicketId, ApiError> {
    id.parse::<u64>()
        .map(TicketId::new)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ticket ID: {e}")))
}

fn parse_section(raw: &str) -> Result<Section, ApiError> {
    raw.parse()
        .map_err(|e: ParseSectionError| ApiError::BadRequest(e.to_string()))
}
