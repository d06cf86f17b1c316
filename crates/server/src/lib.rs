use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener};

mod distributions;
mod investments;
mod investors;
mod server;
mod vehicles;

pub enum ServerError {
    Engine(EngineError),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) | EngineError::VehicleNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::NoInvestments(_)
        | EngineError::VehicleNotSold(_)
        | EngineError::NoProfitToDistribute(_)
        | EngineError::InvalidInvestmentTotal(_)
        | EngineError::AlreadyDistributed(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidName(_)
        | EngineError::InUse(_) => StatusCode::BAD_REQUEST,
        // Roles and statuses only fail to parse when stored data is corrupt.
        EngineError::InvalidRole(_)
        | EngineError::InvalidStatus(_)
        | EngineError::DistributionPersistFailed(_)
        | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let ServerError::Engine(err) = self;
        let (status, error) = (status_for_engine_error(&err), message_for_engine_error(err));

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: EngineError) -> StatusCode {
        ServerError::from(err).into_response().status()
    }

    #[test]
    fn engine_forbidden_maps_to_403() {
        assert_eq!(
            status_of(EngineError::Forbidden("forbidden".to_string())),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn missing_records_map_to_404() {
        assert_eq!(
            status_of(EngineError::KeyNotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(EngineError::VehicleNotFound("1".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        assert_eq!(
            status_of(EngineError::ExistingKey("x".to_string())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn distribution_preconditions_map_to_400() {
        for err in [
            EngineError::NoInvestments("1".to_string()),
            EngineError::VehicleNotSold("1".to_string()),
            EngineError::NoProfitToDistribute("1".to_string()),
            EngineError::InvalidInvestmentTotal("0".to_string()),
            EngineError::AlreadyDistributed("1".to_string()),
            EngineError::InvalidAmount("x".to_string()),
            EngineError::InUse("x".to_string()),
        ] {
            assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn persistence_failures_map_to_500() {
        assert_eq!(
            status_of(EngineError::DistributionPersistFailed("disk".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(EngineError::Database(sea_orm::DbErr::Custom(
                "boom".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn database_message_is_hidden() {
        use http_body_util::BodyExt;

        let res = ServerError::from(EngineError::Database(sea_orm::DbErr::Custom(
            "disk I/O error at /var/lib/pavilion.db".to_string(),
        )))
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "internal server error");
    }
}
