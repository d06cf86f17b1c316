//! The module contains `Vehicle` struct, its sale status and the storage
//! entity.

use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{EngineError, ResultEngine};

/// Legacy affirmative value of the `sold` column.
const LEGACY_SOLD_YES: &str = "Yes";
const LEGACY_SOLD_NO: &str = "No";

/// Where a vehicle is in its import/sale lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VehicleStatus {
    #[default]
    Purchased,
    Shipped,
    Landed,
    Delivered,
    Reserved,
    Sold,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 6] = [
        VehicleStatus::Purchased,
        VehicleStatus::Shipped,
        VehicleStatus::Landed,
        VehicleStatus::Delivered,
        VehicleStatus::Reserved,
        VehicleStatus::Sold,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            VehicleStatus::Purchased => "Purchased",
            VehicleStatus::Shipped => "Shipped",
            VehicleStatus::Landed => "Landed",
            VehicleStatus::Delivered => "Delivered",
            VehicleStatus::Reserved => "Reserved",
            VehicleStatus::Sold => "Sold",
        }
    }

    #[must_use]
    pub const fn is_sold(self) -> bool {
        matches!(self, VehicleStatus::Sold)
    }

    /// Fold the two stored sale representations into a single status.
    ///
    /// Older rows only carry the text flag `sold = "Yes"`, newer rows carry
    /// `vehicle_status`. Either one saying "sold" wins; a missing status
    /// means the vehicle was just purchased.
    pub fn from_storage(sold: Option<&str>, status: Option<&str>) -> ResultEngine<Self> {
        if sold.is_some_and(|flag| flag.trim().eq_ignore_ascii_case(LEGACY_SOLD_YES)) {
            return Ok(VehicleStatus::Sold);
        }
        match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => VehicleStatus::try_from(value),
            None => Ok(VehicleStatus::Purchased),
        }
    }

    /// Value written to the legacy `sold` column.
    pub(crate) const fn legacy_flag(self) -> &'static str {
        if self.is_sold() {
            LEGACY_SOLD_YES
        } else {
            LEGACY_SOLD_NO
        }
    }
}

impl TryFrom<&str> for VehicleStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        VehicleStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| EngineError::InvalidStatus(value.to_string()))
    }
}

/// An imported vehicle.
#[derive(Clone, Debug, PartialEq)]
pub struct Vehicle {
    pub id: i32,
    pub chassis_no: String,
    pub vehicle_type: Option<String>,
    pub year: Option<i32>,
    pub total_cost: Option<f64>,
    pub sale_price: Option<f64>,
    /// Profit recorded when the sale was closed. `None` until then.
    pub profit: Option<f64>,
    pub status: VehicleStatus,
}

impl TryFrom<Model> for Vehicle {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status =
            VehicleStatus::from_storage(model.sold.as_deref(), model.vehicle_status.as_deref())?;
        Ok(Vehicle {
            id: model.id,
            chassis_no: model.chassis_no,
            vehicle_type: model.vehicle_type,
            year: model.year,
            total_cost: model.total_cost,
            sale_price: model.sale_price,
            profit: model.profit,
            status,
        })
    }
}

/// Editable vehicle fields, used for both creation and update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VehicleInput {
    pub chassis_no: String,
    pub vehicle_type: Option<String>,
    pub year: Option<i32>,
    pub total_cost: Option<f64>,
    pub sale_price: Option<f64>,
    pub profit: Option<f64>,
    pub status: Option<VehicleStatus>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub chassis_no: String,
    pub vehicle_type: Option<String>,
    pub year: Option<i32>,
    pub total_cost: Option<f64>,
    pub sale_price: Option<f64>,
    pub profit: Option<f64>,
    pub sold: Option<String>,
    pub vehicle_status: Option<String>,
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

impl From<&VehicleInput> for ActiveModel {
    fn from(value: &VehicleInput) -> Self {
        let status = value.status.unwrap_or_default();
        Self {
            id: ActiveValue::NotSet,
            chassis_no: ActiveValue::Set(value.chassis_no.clone()),
            vehicle_type: ActiveValue::Set(value.vehicle_type.clone()),
            year: ActiveValue::Set(value.year),
            total_cost: ActiveValue::Set(value.total_cost),
            sale_price: ActiveValue::Set(value.sale_price),
            profit: ActiveValue::Set(value.profit),
            sold: ActiveValue::Set(Some(status.legacy_flag().to_string())),
            vehicle_status: ActiveValue::Set(Some(status.as_str().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_flag_marks_vehicle_sold() {
        assert_eq!(
            VehicleStatus::from_storage(Some("Yes"), None),
            Ok(VehicleStatus::Sold)
        );
        assert_eq!(
            VehicleStatus::from_storage(Some("Yes"), Some("Shipped")),
            Ok(VehicleStatus::Sold)
        );
    }

    #[test]
    fn status_enum_marks_vehicle_sold() {
        assert_eq!(
            VehicleStatus::from_storage(Some("No"), Some("Sold")),
            Ok(VehicleStatus::Sold)
        );
        assert_eq!(
            VehicleStatus::from_storage(None, Some("Sold")),
            Ok(VehicleStatus::Sold)
        );
    }

    #[test]
    fn neither_representation_means_not_sold() {
        let status = VehicleStatus::from_storage(Some("No"), Some("Reserved")).unwrap();
        assert_eq!(status, VehicleStatus::Reserved);
        assert!(!status.is_sold());

        let status = VehicleStatus::from_storage(None, None).unwrap();
        assert_eq!(status, VehicleStatus::Purchased);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!(
            VehicleStatus::from_storage(None, Some("Sunk")),
            Err(EngineError::InvalidStatus("Sunk".to_string()))
        );
    }

    #[test]
    fn new_vehicle_mirrors_legacy_flag() {
        let input = VehicleInput {
            chassis_no: "NZE141-1234".to_string(),
            status: Some(VehicleStatus::Sold),
            ..Default::default()
        };
        let model = ActiveModel::from(&input);
        assert_eq!(model.sold, ActiveValue::Set(Some("Yes".to_string())));
        assert_eq!(
            model.vehicle_status,
            ActiveValue::Set(Some("Sold".to_string()))
        );

        let model = ActiveModel::from(&VehicleInput::default());
        assert_eq!(model.sold, ActiveValue::Set(Some("No".to_string())));
    }
}
