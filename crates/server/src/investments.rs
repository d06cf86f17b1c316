//! Investment API endpoints

use api_types::{
    Message,
    investment::{
        Investment, InvestmentNew, InvestmentSummary, InvestmentUpdate,
        InvestorInvestmentSummary, VehicleInvestmentTotals,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::User;

use crate::{ServerError, server::ServerState};

fn view(investment: engine::Investment) -> Investment {
    Investment {
        id: investment.id,
        vehicle_id: investment.vehicle_id,
        investor_id: investment.investor_id,
        amount: investment.amount,
        investment_date: investment.investment_date,
        notes: investment.notes,
    }
}

fn views(investments: Vec<engine::Investment>) -> Json<Vec<Investment>> {
    Json(investments.into_iter().map(view).collect())
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Investment>>, ServerError> {
    Ok(views(state.engine.investments().await?))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Investment>, ServerError> {
    Ok(Json(view(state.engine.investment(id).await?)))
}

pub async fn for_vehicle(
    State(state): State<ServerState>,
    Path(vehicle_id): Path<i32>,
) -> Result<Json<Vec<Investment>>, ServerError> {
    Ok(views(state.engine.investments_for_vehicle(vehicle_id).await?))
}

pub async fn for_investor(
    State(state): State<ServerState>,
    Path(investor_id): Path<i32>,
) -> Result<Json<Vec<Investment>>, ServerError> {
    Ok(views(
        state.engine.investments_for_investor(investor_id).await?,
    ))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<InvestmentNew>,
) -> Result<Json<Investment>, ServerError> {
    let investment = state
        .engine
        .new_investment(
            payload.vehicle_id,
            payload.investor_id,
            payload.amount,
            payload.investment_date,
            payload.notes.as_deref(),
            &user.username,
        )
        .await?;
    Ok(Json(view(investment)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<InvestmentUpdate>,
) -> Result<Json<Investment>, ServerError> {
    let investment = state
        .engine
        .update_investment(
            id,
            payload.amount,
            payload.investment_date,
            payload.notes.as_deref(),
            &user.username,
        )
        .await?;
    Ok(Json(view(investment)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_investment(id, &user.username).await?;
    Ok(Json(Message {
        message: "Investment deleted successfully".to_string(),
    }))
}

pub async fn investor_summary(
    State(state): State<ServerState>,
    Path(investor_id): Path<i32>,
) -> Result<Json<InvestorInvestmentSummary>, ServerError> {
    let summary = state.engine.investor_investment_summary(investor_id).await?;
    Ok(Json(InvestorInvestmentSummary {
        investor_id: summary.investor_id,
        total_amount: summary.total_amount,
        total_vehicles: summary.total_vehicles,
    }))
}

pub async fn summary(
    State(state): State<ServerState>,
) -> Result<Json<InvestmentSummary>, ServerError> {
    let summary = state.engine.investment_summary().await?;
    Ok(Json(InvestmentSummary {
        total_investment: summary.total_investment,
        vehicles_with_investments: summary.vehicles_with_investments,
        vehicles: summary
            .vehicles
            .into_iter()
            .map(|totals| VehicleInvestmentTotals {
                has_investments: totals.has_investments(),
                vehicle_id: totals.vehicle_id,
                chassis_no: totals.chassis_no,
                total_investment: totals.total_investment,
                investor_count: totals.investor_count,
            })
            .collect(),
    }))
}
