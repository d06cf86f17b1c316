use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::{future::Future, sync::Arc};

use crate::{distributions, investments, investors, vehicles};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Basic authentication against the `users` table.
///
/// On success the authenticated [`engine::User`] is stored as a request
/// extension; role checks happen in the engine.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let user = state
        .engine
        .authenticate(auth_header.username(), auth_header.password())
        .await
        .map_err(|err| {
            tracing::error!("authentication lookup failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let api = Router::new()
        .route(
            "/profit-distribution/calculate/{vehicle_id}",
            post(distributions::calculate),
        )
        .route("/profit-distributions", get(distributions::list))
        .route(
            "/profit-distribution/vehicle/{vehicle_id}",
            get(distributions::for_vehicle).delete(distributions::delete_for_vehicle),
        )
        .route(
            "/profit-distribution/investor/{investor_id}",
            get(distributions::for_investor),
        )
        .route("/profit-distribution/summary", get(distributions::summary))
        .route("/vehicles", get(vehicles::list).post(vehicles::create))
        .route("/vehicles/summary", get(vehicles::summary))
        .route(
            "/vehicles/{id}",
            get(vehicles::get)
                .put(vehicles::update)
                .delete(vehicles::delete),
        )
        .route("/vehicles/{id}/sale", post(vehicles::record_sale))
        .route("/investors", get(investors::list).post(investors::create))
        .route(
            "/investors/{id}",
            get(investors::get)
                .put(investors::update)
                .delete(investors::delete),
        )
        .route(
            "/investments",
            get(investments::list).post(investments::create),
        )
        .route("/investments/summary", get(investments::summary))
        .route(
            "/investments/summary/investor/{investor_id}",
            get(investments::investor_summary),
        )
        .route(
            "/investments/vehicle/{vehicle_id}",
            get(investments::for_vehicle),
        )
        .route(
            "/investments/investor/{investor_id}",
            get(investments::for_investor),
        )
        .route(
            "/investments/{id}",
            get(investments::get)
                .put(investments::update)
                .delete(investments::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state);

    Router::new().nest("/api", api)
}

/// Serve the API on `listener` until `shutdown` resolves, then close the
/// database connection.
pub async fn run_with_listener<F>(
    engine: Engine,
    listener: tokio::net::TcpListener,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let engine = Arc::new(engine);
    let state = ServerState {
        engine: Arc::clone(&engine),
    };

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    match Arc::try_unwrap(engine) {
        Ok(engine) => {
            if let Err(err) = engine.close().await {
                tracing::error!("failed to close database: {err}");
            }
        }
        Err(_) => tracing::warn!("engine still shared at shutdown, database left open"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::Body,
        http::{Method, Request, header},
    };
    use base64::Engine as _;
    use engine::{InvestorInput, Role, VehicleInput};
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ConnectOptions, ConnectionTrait, DatabaseConnection, Statement};
    use tower::ServiceExt;

    async fn state() -> ServerState {
        state_with_db().await.0
    }

    async fn state_with_db() -> (ServerState, DatabaseConnection) {
        // One connection, so per-connection pragmas reach the engine.
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = sea_orm::Database::connect(options).await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap();
        engine.new_user("admin", "secret", Role::Admin).await.unwrap();
        engine
            .new_user("viewer", "secret", Role::ReadOnly)
            .await
            .unwrap();
        let state = ServerState {
            engine: Arc::new(engine),
        };
        (state, db)
    }

    fn basic(username: &str, password: &str) -> String {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        format!("Basic {encoded}")
    }

    fn request(method: Method, uri: &str, user: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, basic(user, "secret"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Sold vehicle with profit 1000 and investments of 300 and 700.
    async fn sold_vehicle(state: &ServerState) -> i32 {
        let engine = &state.engine;
        let vehicle = engine
            .new_vehicle(
                VehicleInput {
                    chassis_no: "NZE161-0001".to_string(),
                    ..Default::default()
                },
                "admin",
            )
            .await
            .unwrap();
        for (name, amount) in [("A", 300.0), ("B", 700.0)] {
            let investor = engine
                .new_investor(
                    &InvestorInput {
                        name: name.to_string(),
                        ..Default::default()
                    },
                    "admin",
                )
                .await
                .unwrap();
            engine
                .new_investment(vehicle.id, investor.id, amount, None, None, "admin")
                .await
                .unwrap();
        }
        engine
            .record_sale(vehicle.id, Some(5000.0), 1000.0, "admin")
            .await
            .unwrap();
        vehicle.id
    }

    #[tokio::test]
    async fn missing_or_wrong_credentials_are_unauthorized() {
        let state = state().await;

        let response = router(state.clone())
            .oneshot(request(Method::GET, "/api/vehicles", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/vehicles")
                    .header(header::AUTHORIZATION, basic("admin", "nope"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn readonly_user_can_read_but_not_distribute() {
        let state = state().await;
        let vehicle_id = sold_vehicle(&state).await;

        let response = router(state.clone())
            .oneshot(request(Method::GET, "/api/vehicles", Some("viewer")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let uri = format!("/api/profit-distribution/calculate/{vehicle_id}");
        let response = router(state.clone())
            .oneshot(request(Method::POST, &uri, Some("viewer")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(state.engine.count_distributions(vehicle_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn distribution_endpoint_reports_count_and_total() {
        let state = state().await;
        let vehicle_id = sold_vehicle(&state).await;
        let uri = format!("/api/profit-distribution/calculate/{vehicle_id}");

        let response = router(state.clone())
            .oneshot(request(Method::POST, &uri, Some("admin")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["distributionsCount"], 2);
        assert!((body["totalDistributed"].as_f64().unwrap() - 1000.0).abs() < 1e-6);
        assert!(body["message"].is_string());

        let response = router(state.clone())
            .oneshot(request(Method::POST, &uri, Some("admin")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("already"));

        let listed = format!("/api/profit-distribution/vehicle/{vehicle_id}");
        let response = router(state)
            .oneshot(request(Method::GET, &listed, Some("viewer")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert!((body[0]["amount"].as_f64().unwrap() - 300.0).abs() < 1e-6);
        assert!((body[1]["percentage"].as_f64().unwrap() - 70.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn distribution_without_investments_is_bad_request() {
        let state = state().await;
        let vehicle = state
            .engine
            .new_vehicle(
                VehicleInput {
                    chassis_no: "GP5-1".to_string(),
                    ..Default::default()
                },
                "admin",
            )
            .await
            .unwrap();
        let uri = format!("/api/profit-distribution/calculate/{}", vehicle.id);

        let response = router(state)
            .oneshot(request(Method::POST, &uri, Some("admin")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("No investments"));
    }

    #[tokio::test]
    async fn unknown_records_are_not_found() {
        let state = state().await;

        let response = router(state.clone())
            .oneshot(request(Method::GET, "/api/vehicles/42", Some("viewer")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = router(state)
            .oneshot(request(Method::GET, "/api/investors/42", Some("viewer")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn distribution_for_missing_vehicle_is_not_found() {
        let (state, db) = state_with_db().await;
        let investor = state
            .engine
            .new_investor(
                &InvestorInput {
                    name: "Orphan".to_string(),
                    ..Default::default()
                },
                "admin",
            )
            .await
            .unwrap();
        db.execute_unprepared("PRAGMA foreign_keys = OFF").await.unwrap();
        db.execute(Statement::from_sql_and_values(
            db.get_database_backend(),
            "INSERT INTO vehicle_investments (vehicle_id, investor_id, amount) VALUES (?, ?, ?)",
            vec![77.into(), investor.id.into(), 100.0.into()],
        ))
        .await
        .unwrap();
        db.execute_unprepared("PRAGMA foreign_keys = ON").await.unwrap();

        let response = router(state.clone())
            .oneshot(request(
                Method::POST,
                "/api/profit-distribution/calculate/77",
                Some("admin"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("77"));
        assert_eq!(state.engine.count_distributions(77).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_credential_lookup_is_server_error() {
        let (state, db) = state_with_db().await;
        db.execute_unprepared("DROP TABLE users").await.unwrap();

        let response = router(state)
            .oneshot(request(Method::GET, "/api/vehicles", Some("admin")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn vehicle_can_be_created_and_sold_over_http() {
        let state = state().await;

        let response = router(state.clone())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/vehicles")
                    .header(header::AUTHORIZATION, basic("admin", "secret"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({ "chassis_no": "ZVW30-77", "year": 2012 })
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = json_body(response).await;
        assert_eq!(created["status"], "purchased");
        let id = created["id"].as_i64().unwrap();

        let response = router(state.clone())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(format!("/api/vehicles/{id}/sale"))
                    .header(header::AUTHORIZATION, basic("admin", "secret"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({ "sale_price": 4200.0, "profit": 600.0 }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let sold = json_body(response).await;
        assert_eq!(sold["status"], "sold");
        assert_eq!(sold["profit"], 600.0);

        let response = router(state)
            .oneshot(request(Method::GET, "/api/vehicles/summary", Some("viewer")))
            .await
            .unwrap();
        let summary = json_body(response).await;
        assert_eq!(summary["total"], 1);
        assert_eq!(summary["sold"], 1);
    }
}
