//! Vehicle API endpoints

use api_types::{
    Message,
    vehicle::{SaleRecord, Vehicle, VehicleNew, VehicleStatus, VehicleSummary},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::{User, VehicleInput};

use crate::{ServerError, server::ServerState};

fn status_to_engine(status: VehicleStatus) -> engine::VehicleStatus {
    match status {
        VehicleStatus::Purchased => engine::VehicleStatus::Purchased,
        VehicleStatus::Shipped => engine::VehicleStatus::Shipped,
        VehicleStatus::Landed => engine::VehicleStatus::Landed,
        VehicleStatus::Delivered => engine::VehicleStatus::Delivered,
        VehicleStatus::Reserved => engine::VehicleStatus::Reserved,
        VehicleStatus::Sold => engine::VehicleStatus::Sold,
    }
}

fn status_from_engine(status: engine::VehicleStatus) -> VehicleStatus {
    match status {
        engine::VehicleStatus::Purchased => VehicleStatus::Purchased,
        engine::VehicleStatus::Shipped => VehicleStatus::Shipped,
        engine::VehicleStatus::Landed => VehicleStatus::Landed,
        engine::VehicleStatus::Delivered => VehicleStatus::Delivered,
        engine::VehicleStatus::Reserved => VehicleStatus::Reserved,
        engine::VehicleStatus::Sold => VehicleStatus::Sold,
    }
}

fn input_from_payload(payload: VehicleNew) -> VehicleInput {
    VehicleInput {
        chassis_no: payload.chassis_no,
        vehicle_type: payload.vehicle_type,
        year: payload.year,
        total_cost: payload.total_cost,
        sale_price: payload.sale_price,
        profit: payload.profit,
        status: payload.status.map(status_to_engine),
    }
}

fn view(vehicle: engine::Vehicle) -> Vehicle {
    Vehicle {
        id: vehicle.id,
        chassis_no: vehicle.chassis_no,
        vehicle_type: vehicle.vehicle_type,
        year: vehicle.year,
        total_cost: vehicle.total_cost,
        sale_price: vehicle.sale_price,
        profit: vehicle.profit,
        status: status_from_engine(vehicle.status),
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Vehicle>>, ServerError> {
    let vehicles = state.engine.vehicles().await?;
    Ok(Json(vehicles.into_iter().map(view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Vehicle>, ServerError> {
    Ok(Json(view(state.engine.vehicle(id).await?)))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<VehicleNew>,
) -> Result<Json<Vehicle>, ServerError> {
    let vehicle = state
        .engine
        .new_vehicle(input_from_payload(payload), &user.username)
        .await?;
    Ok(Json(view(vehicle)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<VehicleNew>,
) -> Result<Json<Vehicle>, ServerError> {
    let vehicle = state
        .engine
        .update_vehicle(id, input_from_payload(payload), &user.username)
        .await?;
    Ok(Json(view(vehicle)))
}

/// Mark a vehicle sold and record its sale price and profit.
pub async fn record_sale(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<SaleRecord>,
) -> Result<Json<Vehicle>, ServerError> {
    let vehicle = state
        .engine
        .record_sale(id, payload.sale_price, payload.profit, &user.username)
        .await?;
    Ok(Json(view(vehicle)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_vehicle(id, &user.username).await?;
    Ok(Json(Message {
        message: "Vehicle deleted successfully".to_string(),
    }))
}

pub async fn summary(State(state): State<ServerState>) -> Result<Json<VehicleSummary>, ServerError> {
    let summary = state.engine.vehicle_summary().await?;
    Ok(Json(VehicleSummary {
        total: summary.total,
        purchased: summary.purchased,
        shipped: summary.shipped,
        landed: summary.landed,
        delivered: summary.delivered,
        reserved: summary.reserved,
        sold: summary.sold,
    }))
}
