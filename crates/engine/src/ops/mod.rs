use sea_orm::DatabaseConnection;

use crate::ResultEngine;

mod access;
mod distributions;
mod investments;
mod investors;
mod vehicles;

pub use distributions::{DistributionSummary, InvestorDistributions};
pub use investments::{InvestmentSummary, InvestorInvestmentSummary, VehicleInvestmentTotals};
pub use vehicles::VehicleSummary;

/// Run a block inside a DB transaction, committing on success and rolling
/// back explicitly on error.
///
/// The block is evaluated inside an `async` block so that `?` inside it
/// still reaches the rollback.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = sea_orm::TransactionTrait::begin(&$self.database).await?;
        let result: $crate::ResultEngine<_> = async {
            let out: $crate::ResultEngine<_> = $body;
            out
        }
        .await;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                $tx.rollback().await?;
                Err(err)
            }
        }
    }};
}

pub(crate) use with_tx;

/// Entry point of every ledger operation.
///
/// The engine holds no state besides the database handle; it is opened by
/// the caller, injected through [`EngineBuilder`], and dropped at shutdown.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Close the underlying database connection.
    pub async fn close(self) -> ResultEngine<()> {
        self.database.close().await?;
        Ok(())
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
