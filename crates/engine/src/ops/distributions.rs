use chrono::Utc;
use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, Statement, prelude::*};

use crate::{
    Contribution, Distribution, EngineError, ProfitDistribution, ResultEngine, distributions,
    investments, split_profit,
};

use super::{Engine, with_tx};

/// Dashboard totals over every distribution row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DistributionSummary {
    pub total_distributed: f64,
    pub vehicles_with_profit: u64,
    pub total_investors: u64,
}

/// Every distribution paid to one investor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvestorDistributions {
    pub investor_id: i32,
    pub distributions: Vec<Distribution>,
    pub total_profit: f64,
}

impl Engine {
    async fn distributions_count(
        &self,
        db: &DatabaseTransaction,
        vehicle_id: i32,
    ) -> ResultEngine<u64> {
        distributions::Entity::find()
            .filter(distributions::Column::VehicleId.eq(vehicle_id))
            .count(db)
            .await
            .map_err(Into::into)
    }

    /// Split the profit of a sold vehicle among its investors.
    ///
    /// Preconditions, checked in this order:
    /// 1. the caller is an admin (`Forbidden`);
    /// 2. the vehicle has at least one investment (`NoInvestments`);
    /// 3. the vehicle exists (`VehicleNotFound`);
    /// 4. the vehicle is sold, by legacy flag or status (`VehicleNotSold`);
    /// 5. the profit is present and positive (`NoProfitToDistribute`);
    /// 6. no distribution exists yet for the vehicle (`AlreadyDistributed`).
    ///
    /// One row per investment is written in the same transaction as the
    /// checks. If any insert fails the transaction is rolled back and
    /// `DistributionPersistFailed` is returned, leaving no rows behind.
    /// To recompute, delete the existing rows with
    /// [`Engine::delete_distributions`] first.
    pub async fn distribute_profit(
        &self,
        vehicle_id: i32,
        user_id: &str,
    ) -> ResultEngine<ProfitDistribution> {
        tracing::info!(vehicle_id, user = user_id, "profit distribution requested");
        let distribution_date = Utc::now().date_naive();

        let outcome = with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;

            let investment_models = investments::Entity::find()
                .filter(investments::Column::VehicleId.eq(vehicle_id))
                .order_by_asc(investments::Column::Id)
                .all(&db_tx)
                .await?;
            if investment_models.is_empty() {
                return Err(EngineError::NoInvestments(vehicle_id.to_string()));
            }

            let vehicle = self.require_vehicle(&db_tx, vehicle_id).await?;
            if !vehicle.status.is_sold() {
                return Err(EngineError::VehicleNotSold(vehicle_id.to_string()));
            }
            let profit = match vehicle.profit {
                Some(profit) if profit > 0.0 => profit,
                _ => return Err(EngineError::NoProfitToDistribute(vehicle_id.to_string())),
            };

            if self.distributions_count(&db_tx, vehicle_id).await? > 0 {
                return Err(EngineError::AlreadyDistributed(vehicle_id.to_string()));
            }

            let contributions: Vec<Contribution> = investment_models
                .iter()
                .map(|model| Contribution {
                    investor_id: model.investor_id,
                    amount: model.amount,
                })
                .collect();
            let split = split_profit(profit, &contributions)?;

            let notes = format!("Profit distribution for vehicle {vehicle_id}");
            let mut rows = Vec::with_capacity(split.shares.len());
            for share in &split.shares {
                let model = distributions::ActiveModel::from_share(
                    vehicle_id,
                    share,
                    distribution_date,
                    &notes,
                )
                .insert(&db_tx)
                .await
                .map_err(|err| {
                    tracing::error!(
                        vehicle_id,
                        investor_id = share.investor_id,
                        "failed to insert profit distribution: {err}"
                    );
                    EngineError::DistributionPersistFailed(err.to_string())
                })?;
                rows.push(Distribution::from(model));
            }

            Ok(ProfitDistribution {
                vehicle_id,
                distributions: rows,
                total_distributed: split.total_distributed,
            })
        });

        match &outcome {
            Ok(result) => tracing::info!(
                vehicle_id,
                distributions = result.distributions_count(),
                total = result.total_distributed,
                "profit distributed"
            ),
            Err(EngineError::DistributionPersistFailed(_)) => {
                tracing::warn!(vehicle_id, "profit distribution rolled back")
            }
            Err(err) => tracing::debug!(vehicle_id, "profit distribution rejected: {err}"),
        }
        outcome
    }

    /// Number of distribution rows recorded for a vehicle.
    pub async fn count_distributions(&self, vehicle_id: i32) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| self.distributions_count(&db_tx, vehicle_id).await)
    }

    /// Remove every distribution row of a vehicle so that the profit can be
    /// distributed again. Returns the number of rows deleted.
    ///
    /// Authorization: requires the `admin` role.
    pub async fn delete_distributions(&self, vehicle_id: i32, user_id: &str) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            let deleted = distributions::Entity::delete_many()
                .filter(distributions::Column::VehicleId.eq(vehicle_id))
                .exec(&db_tx)
                .await?
                .rows_affected;
            tracing::info!(vehicle_id, deleted, "profit distributions deleted");
            Ok(deleted)
        })
    }

    /// Return every distribution row.
    pub async fn distributions(&self) -> ResultEngine<Vec<Distribution>> {
        with_tx!(self, |db_tx| {
            let models = distributions::Entity::find()
                .order_by_asc(distributions::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Distribution::from).collect())
        })
    }

    pub async fn distributions_for_vehicle(
        &self,
        vehicle_id: i32,
    ) -> ResultEngine<Vec<Distribution>> {
        with_tx!(self, |db_tx| {
            let models = distributions::Entity::find()
                .filter(distributions::Column::VehicleId.eq(vehicle_id))
                .order_by_asc(distributions::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Distribution::from).collect())
        })
    }

    /// Every distribution paid to an investor, with the total received.
    pub async fn investor_distributions(
        &self,
        investor_id: i32,
    ) -> ResultEngine<InvestorDistributions> {
        with_tx!(self, |db_tx| {
            let models = distributions::Entity::find()
                .filter(distributions::Column::InvestorId.eq(investor_id))
                .order_by_asc(distributions::Column::Id)
                .all(&db_tx)
                .await?;
            let distributions: Vec<Distribution> =
                models.into_iter().map(Distribution::from).collect();
            let total_profit = distributions.iter().map(|d| d.amount).sum();
            Ok(InvestorDistributions {
                investor_id,
                distributions,
                total_profit,
            })
        })
    }

    pub async fn distribution_summary(&self) -> ResultEngine<DistributionSummary> {
        with_tx!(self, |db_tx| {
            let backend = self.database.get_database_backend();
            let stmt = Statement::from_string(
                backend,
                "SELECT COALESCE(SUM(amount), 0.0) AS total_distributed, \
                 COUNT(DISTINCT vehicle_id) AS vehicles_with_profit, \
                 COUNT(DISTINCT investor_id) AS total_investors \
                 FROM profit_distributions;",
            );
            let Some(row) = db_tx.query_one(stmt).await? else {
                return Ok(DistributionSummary::default());
            };
            Ok(DistributionSummary {
                total_distributed: row.try_get("", "total_distributed")?,
                vehicles_with_profit: u64::try_from(
                    row.try_get::<i64>("", "vehicles_with_profit")?,
                )
                .unwrap_or_default(),
                total_investors: u64::try_from(row.try_get::<i64>("", "total_investors")?)
                    .unwrap_or_default(),
            })
        })
    }
}
