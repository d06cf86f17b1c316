use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, Statement, prelude::*};

use crate::{
    EngineError, Investment, ResultEngine, investments,
    util::{normalize_optional_text, validate_positive_amount},
};

use super::{Engine, with_tx};

/// Totals for a single investor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvestorInvestmentSummary {
    pub investor_id: i32,
    pub total_amount: f64,
    pub total_vehicles: u64,
}

/// Investment totals for one vehicle. Vehicles without investments are
/// reported with zeros.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleInvestmentTotals {
    pub vehicle_id: i32,
    pub chassis_no: String,
    pub total_investment: f64,
    pub investor_count: u64,
}

impl VehicleInvestmentTotals {
    #[must_use]
    pub fn has_investments(&self) -> bool {
        self.investor_count > 0
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvestmentSummary {
    pub total_investment: f64,
    pub vehicles_with_investments: u64,
    pub vehicles: Vec<VehicleInvestmentTotals>,
}

impl Engine {
    /// Record capital contributed by an investor toward a vehicle.
    ///
    /// `investment_date` defaults to today.
    ///
    /// Authorization: requires the `admin` role.
    pub async fn new_investment(
        &self,
        vehicle_id: i32,
        investor_id: i32,
        amount: f64,
        investment_date: Option<NaiveDate>,
        notes: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<Investment> {
        let amount = validate_positive_amount(amount, "investment amount")?;
        let investment_date = investment_date.unwrap_or_else(|| Utc::now().date_naive());
        let notes = normalize_optional_text(notes);
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            self.require_vehicle(&db_tx, vehicle_id).await?;
            self.require_investor(&db_tx, investor_id).await?;

            let model = investments::ActiveModel {
                id: ActiveValue::NotSet,
                vehicle_id: ActiveValue::Set(vehicle_id),
                investor_id: ActiveValue::Set(investor_id),
                amount: ActiveValue::Set(amount),
                investment_date: ActiveValue::Set(Some(investment_date)),
                notes: ActiveValue::Set(notes.clone()),
            }
            .insert(&db_tx)
            .await?;
            Ok(Investment::from(model))
        })
    }

    pub async fn investment(&self, investment_id: i32) -> ResultEngine<Investment> {
        with_tx!(self, |db_tx| {
            investments::Entity::find_by_id(investment_id)
                .one(&db_tx)
                .await?
                .map(Investment::from)
                .ok_or_else(|| EngineError::KeyNotFound(format!("investment {investment_id}")))
        })
    }

    /// Return every investment, most recent first.
    pub async fn investments(&self) -> ResultEngine<Vec<Investment>> {
        with_tx!(self, |db_tx| {
            let models = investments::Entity::find()
                .order_by_desc(investments::Column::InvestmentDate)
                .order_by_desc(investments::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Investment::from).collect())
        })
    }

    /// Return the investments of a vehicle in insertion order.
    pub async fn investments_for_vehicle(&self, vehicle_id: i32) -> ResultEngine<Vec<Investment>> {
        with_tx!(self, |db_tx| {
            let models = investments::Entity::find()
                .filter(investments::Column::VehicleId.eq(vehicle_id))
                .order_by_asc(investments::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Investment::from).collect())
        })
    }

    /// Return the investments of an investor, most recent first.
    pub async fn investments_for_investor(
        &self,
        investor_id: i32,
    ) -> ResultEngine<Vec<Investment>> {
        with_tx!(self, |db_tx| {
            let models = investments::Entity::find()
                .filter(investments::Column::InvestorId.eq(investor_id))
                .order_by_desc(investments::Column::InvestmentDate)
                .order_by_desc(investments::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Investment::from).collect())
        })
    }

    /// Change amount, date and notes of an investment.
    ///
    /// Authorization: requires the `admin` role.
    pub async fn update_investment(
        &self,
        investment_id: i32,
        amount: f64,
        investment_date: Option<NaiveDate>,
        notes: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<Investment> {
        let amount = validate_positive_amount(amount, "investment amount")?;
        let notes = normalize_optional_text(notes);
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            if investments::Entity::find_by_id(investment_id)
                .one(&db_tx)
                .await?
                .is_none()
            {
                return Err(EngineError::KeyNotFound(format!(
                    "investment {investment_id}"
                )));
            }

            let active = investments::ActiveModel {
                id: ActiveValue::Unchanged(investment_id),
                amount: ActiveValue::Set(amount),
                investment_date: ActiveValue::Set(investment_date),
                notes: ActiveValue::Set(notes.clone()),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Ok(Investment::from(model))
        })
    }

    /// Authorization: requires the `admin` role.
    pub async fn delete_investment(&self, investment_id: i32, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            let result = investments::Entity::delete_by_id(investment_id)
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(format!(
                    "investment {investment_id}"
                )));
            }
            Ok(())
        })
    }

    /// Total invested and number of distinct vehicles for one investor.
    pub async fn investor_investment_summary(
        &self,
        investor_id: i32,
    ) -> ResultEngine<InvestorInvestmentSummary> {
        with_tx!(self, |db_tx| {
            let backend = self.database.get_database_backend();
            let stmt = Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(amount), 0.0) AS total_amount, \
                 COUNT(DISTINCT vehicle_id) AS total_vehicles \
                 FROM vehicle_investments WHERE investor_id = ?;",
                vec![investor_id.into()],
            );
            let row = db_tx.query_one(stmt).await?;
            let (total_amount, total_vehicles) = match row {
                Some(row) => (
                    row.try_get::<f64>("", "total_amount")?,
                    row.try_get::<i64>("", "total_vehicles")?,
                ),
                None => (0.0, 0),
            };
            Ok(InvestorInvestmentSummary {
                investor_id,
                total_amount,
                total_vehicles: u64::try_from(total_vehicles).unwrap_or_default(),
            })
        })
    }

    /// Investment totals across all vehicles.
    pub async fn investment_summary(&self) -> ResultEngine<InvestmentSummary> {
        with_tx!(self, |db_tx| {
            let backend = self.database.get_database_backend();
            let stmt = Statement::from_string(
                backend,
                "SELECT v.id AS vehicle_id, v.chassis_no AS chassis_no, \
                 COALESCE(SUM(vi.amount), 0.0) AS total_investment, \
                 COUNT(DISTINCT vi.investor_id) AS investor_count \
                 FROM vehicles v \
                 LEFT JOIN vehicle_investments vi ON v.id = vi.vehicle_id \
                 GROUP BY v.id, v.chassis_no \
                 ORDER BY v.id;",
            );

            let mut summary = InvestmentSummary::default();
            for row in db_tx.query_all(stmt).await? {
                let totals = VehicleInvestmentTotals {
                    vehicle_id: row.try_get("", "vehicle_id")?,
                    chassis_no: row.try_get("", "chassis_no")?,
                    total_investment: row.try_get("", "total_investment")?,
                    investor_count: u64::try_from(row.try_get::<i64>("", "investor_count")?)
                        .unwrap_or_default(),
                };
                summary.total_investment += totals.total_investment;
                if totals.has_investments() {
                    summary.vehicles_with_investments += 1;
                }
                summary.vehicles.push(totals);
            }
            Ok(summary)
        })
    }
}
