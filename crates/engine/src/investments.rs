//! Capital contributed by an investor toward a specific vehicle.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct Investment {
    pub id: i32,
    pub vehicle_id: i32,
    pub investor_id: i32,
    pub amount: f64,
    pub investment_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl From<Model> for Investment {
    fn from(model: Model) -> Self {
        Investment {
            id: model.id,
            vehicle_id: model.vehicle_id,
            investor_id: model.investor_id,
            amount: model.amount,
            investment_date: model.investment_date,
            notes: model.notes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicle_investments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vehicle_id: i32,
    pub investor_id: i32,
    pub amount: f64,
    pub investment_date: Option<Date>,
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
