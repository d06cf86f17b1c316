use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, ResultEngine, Vehicle, VehicleInput, VehicleStatus, distributions, investments,
    util::{normalize_optional_text, normalize_required_name, validate_optional_amount},
    vehicles,
};

use super::{Engine, with_tx};

/// Vehicle counts per lifecycle status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VehicleSummary {
    pub total: u64,
    pub purchased: u64,
    pub shipped: u64,
    pub landed: u64,
    pub delivered: u64,
    pub reserved: u64,
    pub sold: u64,
}

impl VehicleSummary {
    fn add(&mut self, status: VehicleStatus) {
        self.total += 1;
        let slot = match status {
            VehicleStatus::Purchased => &mut self.purchased,
            VehicleStatus::Shipped => &mut self.shipped,
            VehicleStatus::Landed => &mut self.landed,
            VehicleStatus::Delivered => &mut self.delivered,
            VehicleStatus::Reserved => &mut self.reserved,
            VehicleStatus::Sold => &mut self.sold,
        };
        *slot += 1;
    }
}

fn normalize_vehicle_input(input: VehicleInput) -> ResultEngine<VehicleInput> {
    Ok(VehicleInput {
        chassis_no: normalize_required_name(&input.chassis_no, "chassis number")?,
        vehicle_type: normalize_optional_text(input.vehicle_type.as_deref()),
        total_cost: validate_optional_amount(input.total_cost, "total cost")?,
        sale_price: validate_optional_amount(input.sale_price, "sale price")?,
        profit: validate_optional_amount(input.profit, "profit")?,
        ..input
    })
}

impl Engine {
    /// Load a vehicle or fail with [`EngineError::VehicleNotFound`].
    pub(super) async fn require_vehicle(
        &self,
        db: &DatabaseTransaction,
        vehicle_id: i32,
    ) -> ResultEngine<Vehicle> {
        vehicles::Entity::find_by_id(vehicle_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::VehicleNotFound(vehicle_id.to_string()))
            .and_then(Vehicle::try_from)
    }

    /// Register a new vehicle.
    ///
    /// Authorization: requires the `admin` role.
    pub async fn new_vehicle(&self, input: VehicleInput, user_id: &str) -> ResultEngine<Vehicle> {
        let input = normalize_vehicle_input(input)?;
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            let model = vehicles::ActiveModel::from(&input).insert(&db_tx).await?;
            tracing::info!(vehicle_id = model.id, chassis_no = %model.chassis_no, "vehicle created");
            Vehicle::try_from(model)
        })
    }

    /// Return a single vehicle.
    pub async fn vehicle(&self, vehicle_id: i32) -> ResultEngine<Vehicle> {
        with_tx!(self, |db_tx| self.require_vehicle(&db_tx, vehicle_id).await)
    }

    /// Return every vehicle, newest first.
    pub async fn vehicles(&self) -> ResultEngine<Vec<Vehicle>> {
        with_tx!(self, |db_tx| {
            vehicles::Entity::find()
                .order_by_desc(vehicles::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Vehicle::try_from)
                .collect()
        })
    }

    /// Replace the editable fields of a vehicle.
    ///
    /// When `input.status` is `None` the current status is kept.
    ///
    /// Authorization: requires the `admin` role.
    pub async fn update_vehicle(
        &self,
        vehicle_id: i32,
        input: VehicleInput,
        user_id: &str,
    ) -> ResultEngine<Vehicle> {
        let input = normalize_vehicle_input(input)?;
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            let current = self.require_vehicle(&db_tx, vehicle_id).await?;

            let mut active = vehicles::ActiveModel::from(&VehicleInput {
                status: Some(input.status.unwrap_or(current.status)),
                ..input.clone()
            });
            active.id = ActiveValue::Unchanged(vehicle_id);
            let model = active.update(&db_tx).await?;
            Vehicle::try_from(model)
        })
    }

    /// Close the sale of a vehicle: mark it sold and record price and profit.
    ///
    /// Authorization: requires the `admin` role.
    pub async fn record_sale(
        &self,
        vehicle_id: i32,
        sale_price: Option<f64>,
        profit: f64,
        user_id: &str,
    ) -> ResultEngine<Vehicle> {
        let sale_price = validate_optional_amount(sale_price, "sale price")?;
        let profit = validate_optional_amount(Some(profit), "profit")?;
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            self.require_vehicle(&db_tx, vehicle_id).await?;

            let active = vehicles::ActiveModel {
                id: ActiveValue::Unchanged(vehicle_id),
                sale_price: ActiveValue::Set(sale_price),
                profit: ActiveValue::Set(profit),
                sold: ActiveValue::Set(Some(VehicleStatus::Sold.legacy_flag().to_string())),
                vehicle_status: ActiveValue::Set(Some(VehicleStatus::Sold.as_str().to_string())),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            tracing::info!(vehicle_id, ?profit, "vehicle sale recorded");
            Vehicle::try_from(model)
        })
    }

    /// Delete a vehicle that no investment or distribution refers to.
    ///
    /// Authorization: requires the `admin` role.
    pub async fn delete_vehicle(&self, vehicle_id: i32, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            self.require_vehicle(&db_tx, vehicle_id).await?;

            let investments = investments::Entity::find()
                .filter(investments::Column::VehicleId.eq(vehicle_id))
                .count(&db_tx)
                .await?;
            let distributions = distributions::Entity::find()
                .filter(distributions::Column::VehicleId.eq(vehicle_id))
                .count(&db_tx)
                .await?;
            if investments > 0 || distributions > 0 {
                return Err(EngineError::InUse(format!(
                    "vehicle {vehicle_id} has {investments} investments and {distributions} distributions"
                )));
            }

            vehicles::Entity::delete_by_id(vehicle_id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Count vehicles per status. Legacy rows flagged `sold = "Yes"` count as
    /// sold whatever their status column says.
    pub async fn vehicle_summary(&self) -> ResultEngine<VehicleSummary> {
        with_tx!(self, |db_tx| {
            let models = vehicles::Entity::find().all(&db_tx).await?;
            let mut summary = VehicleSummary::default();
            for model in models {
                let status = VehicleStatus::from_storage(
                    model.sold.as_deref(),
                    model.vehicle_status.as_deref(),
                )?;
                summary.add(status);
            }
            Ok(summary)
        })
    }
}
