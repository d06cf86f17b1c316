//! Investors contributing capital to vehicle imports.

use sea_orm::entity::{ActiveValue, prelude::*};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Investor {
    pub id: i32,
    pub name: String,
    pub contact_info: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl From<Model> for Investor {
    fn from(model: Model) -> Self {
        Investor {
            id: model.id,
            name: model.name,
            contact_info: model.contact_info,
            email: model.email,
            notes: model.notes,
        }
    }
}

/// Editable investor fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvestorInput {
    pub name: String,
    pub contact_info: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "investors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub contact_info: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::investments::Entity")]
    Investments,
    #[sea_orm(has_many = "super::distributions::Entity")]
    Distributions,
}

impl Related<super::investments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Investments.def()
    }
}

impl Related<super::distributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Distributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&InvestorInput> for ActiveModel {
    fn from(value: &InvestorInput) -> Self {
        Self {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(value.name.clone()),
            contact_info: ActiveValue::Set(value.contact_info.clone()),
            email: ActiveValue::Set(value.email.clone()),
            notes: ActiveValue::Set(value.notes.clone()),
        }
    }
}
