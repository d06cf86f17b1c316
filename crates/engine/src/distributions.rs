//! Profit distribution rows.
//!
//! Rows are only created by [`Engine::distribute_profit`], one per
//! investment of the vehicle, and only removed all at once by
//! [`Engine::delete_distributions`].
//!
//! [`Engine::distribute_profit`]: crate::Engine::distribute_profit
//! [`Engine::delete_distributions`]: crate::Engine::delete_distributions

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};

use crate::profit::Share;

#[derive(Clone, Debug, PartialEq)]
pub struct Distribution {
    pub id: i32,
    pub vehicle_id: i32,
    pub investor_id: i32,
    pub amount: f64,
    /// Share of the vehicle's total investment, in `0..=100`.
    pub percentage: f64,
    pub distribution_date: NaiveDate,
    pub notes: Option<String>,
}

impl From<Model> for Distribution {
    fn from(model: Model) -> Self {
        Distribution {
            id: model.id,
            vehicle_id: model.vehicle_id,
            investor_id: model.investor_id,
            amount: model.amount,
            percentage: model.percentage,
            distribution_date: model.distribution_date,
            notes: model.notes,
        }
    }
}

/// Outcome of a successful profit distribution for one vehicle.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfitDistribution {
    pub vehicle_id: i32,
    pub distributions: Vec<Distribution>,
    pub total_distributed: f64,
}

impl ProfitDistribution {
    #[must_use]
    pub fn distributions_count(&self) -> usize {
        self.distributions.len()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "profit_distributions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vehicle_id: i32,
    pub investor_id: i32,
    pub amount: f64,
    pub percentage: f64,
    pub distribution_date: Date,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicles::Entity",
        from = "Column::VehicleId",
        to = "super::vehicles::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Vehicles,
    #[sea_orm(
        belongs_to = "super::investors::Entity",
        from = "Column::InvestorId",
        to = "super::investors::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Investors,
}

impl Related<super::vehicles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicles.def()
    }
}

impl Related<super::investors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Investors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_share(
        vehicle_id: i32,
        share: &Share,
        distribution_date: NaiveDate,
        notes: &str,
    ) -> Self {
        Self {
            id: ActiveValue::NotSet,
            vehicle_id: ActiveValue::Set(vehicle_id),
            investor_id: ActiveValue::Set(share.investor_id),
            amount: ActiveValue::Set(share.amount),
            percentage: ActiveValue::Set(share.percentage),
            distribution_date: ActiveValue::Set(distribution_date),
            notes: ActiveValue::Set(Some(notes.to_string())),
        }
    }
}
