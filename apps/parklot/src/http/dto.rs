//! JSON response bodies.
//!
//! Field names are camelCase to match the web frontend; money goes out as a
//! number in major units.

use serde::Serialize;

use parklot_core::report::{ExitReceipt, LotStatus, Occupancy, ParkReceipt, ParkedVehicle, VehicleLookup};
use parklot_core::{Ticket, VehicleType};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkResponse {
    pub success: bool,
    pub ticket_id: i64,
    pub slot: String,
}

impl From<ParkReceipt> for ParkResponse {
    fn from(receipt: ParkReceipt) -> Self {
        ParkResponse {
            success: true,
            ticket_id: receipt.ticket_id,
            slot: receipt.slot.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitResponse {
    pub success: bool,
    pub amount: f64,
    pub hours: i64,
}

impl From<ExitReceipt> for ExitResponse {
    fn from(receipt: ExitReceipt) -> Self {
        ExitResponse {
            success: true,
            amount: receipt.bill.amount.to_major_f64(),
            hours: receipt.bill.hours,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OccupancyDto {
    pub total: i64,
    pub available: i64,
}

impl From<Occupancy> for OccupancyDto {
    fn from(o: Occupancy) -> Self {
        OccupancyDto {
            total: o.total,
            available: o.available,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub car: OccupancyDto,
    pub bike: OccupancyDto,
}

impl From<&LotStatus> for StatusResponse {
    fn from(status: &LotStatus) -> Self {
        StatusResponse {
            car: status.get(VehicleType::Car).into(),
            bike: status.get(VehicleType::Bike).into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub found: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<VehicleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<i64>,
}

impl SearchResponse {
    pub fn not_found() -> Self {
        SearchResponse {
            found: false,
            vehicle_type: None,
            ticket_id: None,
            minutes: None,
        }
    }
}

impl From<VehicleLookup> for SearchResponse {
    fn from(lookup: VehicleLookup) -> Self {
        SearchResponse {
            found: true,
            vehicle_type: Some(lookup.vehicle_type),
            ticket_id: Some(lookup.ticket_id),
            minutes: Some(lookup.elapsed.total_minutes()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub vehicle_no: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub amount: f64,
}

impl From<Ticket> for HistoryEntry {
    fn from(ticket: Ticket) -> Self {
        HistoryEntry {
            amount: ticket.amount().unwrap_or_default().to_major_f64(),
            vehicle_no: ticket.vehicle_no,
            vehicle_type: ticket.vehicle_type,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkedEntry {
    pub vehicle_no: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub slot: String,
    pub duration: String,
}

impl From<ParkedVehicle> for ParkedEntry {
    fn from(parked: ParkedVehicle) -> Self {
        ParkedEntry {
            slot: parked.slot.to_string(),
            duration: parked.elapsed.to_string(),
            vehicle_no: parked.vehicle_no,
            vehicle_type: parked.vehicle_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
}
