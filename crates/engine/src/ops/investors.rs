use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, Investor, InvestorInput, ResultEngine, investments, investors,
    util::{normalize_optional_text, normalize_required_name},
};

use super::{Engine, with_tx};

fn normalize_investor_input(input: &InvestorInput) -> ResultEngine<InvestorInput> {
    Ok(InvestorInput {
        name: normalize_required_name(&input.name, "investor name")?,
        contact_info: normalize_optional_text(input.contact_info.as_deref()),
        email: normalize_optional_text(input.email.as_deref()),
        notes: normalize_optional_text(input.notes.as_deref()),
    })
}

impl Engine {
    pub(super) async fn require_investor(
        &self,
        db: &DatabaseTransaction,
        investor_id: i32,
    ) -> ResultEngine<Investor> {
        investors::Entity::find_by_id(investor_id)
            .one(db)
            .await?
            .map(Investor::from)
            .ok_or_else(|| EngineError::KeyNotFound(format!("investor {investor_id}")))
    }

    /// Add a new investor.
    ///
    /// Authorization: requires the `admin` role.
    pub async fn new_investor(&self, input: &InvestorInput, user_id: &str) -> ResultEngine<Investor> {
        let input = normalize_investor_input(input)?;
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            let model = investors::ActiveModel::from(&input).insert(&db_tx).await?;
            Ok(Investor::from(model))
        })
    }

    pub async fn investor(&self, investor_id: i32) -> ResultEngine<Investor> {
        with_tx!(self, |db_tx| self.require_investor(&db_tx, investor_id).await)
    }

    /// Return every investor ordered by name.
    pub async fn investors(&self) -> ResultEngine<Vec<Investor>> {
        with_tx!(self, |db_tx| {
            let models = investors::Entity::find()
                .order_by_asc(investors::Column::Name)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Investor::from).collect())
        })
    }

    /// Authorization: requires the `admin` role.
    pub async fn update_investor(
        &self,
        investor_id: i32,
        input: &InvestorInput,
        user_id: &str,
    ) -> ResultEngine<Investor> {
        let input = normalize_investor_input(input)?;
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            self.require_investor(&db_tx, investor_id).await?;

            let mut active = investors::ActiveModel::from(&input);
            active.id = ActiveValue::Unchanged(investor_id);
            let model = active.update(&db_tx).await?;
            Ok(Investor::from(model))
        })
    }

    /// Delete an investor together with all of their investments.
    ///
    /// Investors that already received a profit distribution cannot be
    /// deleted: the distribution rows are the payout record.
    ///
    /// Authorization: requires the `admin` role.
    pub async fn delete_investor(&self, investor_id: i32, user_id: &str) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            self.require_investor(&db_tx, investor_id).await?;

            let paid_out = crate::distributions::Entity::find()
                .filter(crate::distributions::Column::InvestorId.eq(investor_id))
                .count(&db_tx)
                .await?;
            if paid_out > 0 {
                return Err(EngineError::InUse(format!(
                    "investor {investor_id} has {paid_out} profit distributions"
                )));
            }

            let removed = investments::Entity::delete_many()
                .filter(investments::Column::InvestorId.eq(investor_id))
                .exec(&db_tx)
                .await?
                .rows_affected;
            investors::Entity::delete_by_id(investor_id)
                .exec(&db_tx)
                .await?;
            tracing::info!(investor_id, investments = removed, "investor deleted");
            Ok(removed)
        })
    }
}
