//! Profit distribution API endpoints

use api_types::distribution::{
    Distribution, DistributionResult, DistributionSummary, DistributionsDeleted,
    InvestorDistributions,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::User;

use crate::{ServerError, server::ServerState};

fn view(distribution: engine::Distribution) -> Distribution {
    Distribution {
        id: distribution.id,
        vehicle_id: distribution.vehicle_id,
        investor_id: distribution.investor_id,
        amount: distribution.amount,
        percentage: distribution.percentage,
        distribution_date: distribution.distribution_date,
        notes: distribution.notes,
    }
}

/// Handle requests for distributing the profit of a sold vehicle.
pub async fn calculate(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<i32>,
) -> Result<Json<DistributionResult>, ServerError> {
    let result = state
        .engine
        .distribute_profit(vehicle_id, &user.username)
        .await?;

    Ok(Json(DistributionResult {
        success: true,
        message: "Profit distributions created successfully".to_string(),
        distributions_count: result.distributions_count(),
        total_distributed: result.total_distributed,
    }))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<Distribution>>, ServerError> {
    let rows = state.engine.distributions().await?;
    Ok(Json(rows.into_iter().map(view).collect()))
}

pub async fn for_vehicle(
    State(state): State<ServerState>,
    Path(vehicle_id): Path<i32>,
) -> Result<Json<Vec<Distribution>>, ServerError> {
    let rows = state.engine.distributions_for_vehicle(vehicle_id).await?;
    Ok(Json(rows.into_iter().map(view).collect()))
}

/// Drop the distribution rows of a vehicle so it can be distributed again.
pub async fn delete_for_vehicle(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(vehicle_id): Path<i32>,
) -> Result<Json<DistributionsDeleted>, ServerError> {
    let deleted_count = state
        .engine
        .delete_distributions(vehicle_id, &user.username)
        .await?;
    Ok(Json(DistributionsDeleted {
        message: "Profit distributions deleted successfully".to_string(),
        deleted_count,
    }))
}

pub async fn for_investor(
    State(state): State<ServerState>,
    Path(investor_id): Path<i32>,
) -> Result<Json<InvestorDistributions>, ServerError> {
    let paid = state.engine.investor_distributions(investor_id).await?;
    let total_vehicles = paid.distributions.len();
    Ok(Json(InvestorDistributions {
        investor_id: paid.investor_id,
        distributions: paid.distributions.into_iter().map(view).collect(),
        total_profit: paid.total_profit,
        total_vehicles,
    }))
}

pub async fn summary(
    State(state): State<ServerState>,
) -> Result<Json<DistributionSummary>, ServerError> {
    let summary = state.engine.distribution_summary().await?;
    Ok(Json(DistributionSummary {
        total_distributed: summary.total_distributed,
        vehicles_with_profit: summary.vehicles_with_profit,
        total_investors: summary.total_investors,
    }))
}
