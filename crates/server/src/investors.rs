//! Investor API endpoints

use api_types::investor::{Investor, InvestorDeleted, InvestorNew};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::{InvestorInput, User};

use crate::{ServerError, server::ServerState};

fn input_from_payload(payload: InvestorNew) -> InvestorInput {
    InvestorInput {
        name: payload.name,
        contact_info: payload.contact_info,
        email: payload.email,
        notes: payload.notes,
    }
}

fn view(investor: engine::Investor) -> Investor {
    Investor {
        id: investor.id,
        name: investor.name,
        contact_info: investor.contact_info,
        email: investor.email,
        notes: investor.notes,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Investor>>, ServerError> {
    let investors = state.engine.investors().await?;
    Ok(Json(investors.into_iter().map(view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Investor>, ServerError> {
    Ok(Json(view(state.engine.investor(id).await?)))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<InvestorNew>,
) -> Result<Json<Investor>, ServerError> {
    let investor = state
        .engine
        .new_investor(&input_from_payload(payload), &user.username)
        .await?;
    Ok(Json(view(investor)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<InvestorNew>,
) -> Result<Json<Investor>, ServerError> {
    let investor = state
        .engine
        .update_investor(id, &input_from_payload(payload), &user.username)
        .await?;
    Ok(Json(view(investor)))
}

/// Delete an investor and, with it, their investments.
pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<InvestorDeleted>, ServerError> {
    let deleted_investments = state.engine.delete_investor(id, &user.username).await?;
    Ok(Json(InvestorDeleted {
        message: "Investor deleted successfully".to_string(),
        deleted_investments,
    }))
}
