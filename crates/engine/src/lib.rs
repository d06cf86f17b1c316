//! Bookkeeping engine for vehicle imports: vehicles, investors, investments
//! and the pro-rata distribution of a sold vehicle's profit.
//!
//! All operations go through [`Engine`], which owns the database handle and
//! runs each call as one database transaction.

pub use distributions::{Distribution, ProfitDistribution};
pub use error::EngineError;
pub use investments::Investment;
pub use investors::{Investor, InvestorInput};
pub use ops::{
    DistributionSummary, Engine, EngineBuilder, InvestmentSummary, InvestorDistributions,
    InvestorInvestmentSummary, VehicleInvestmentTotals, VehicleSummary,
};
pub use profit::{Contribution, ProfitSplit, Share, split_profit};
pub use users::{Role, User};
pub use vehicles::{Vehicle, VehicleInput, VehicleStatus};

mod distributions;
mod error;
mod investments;
mod investors;
mod ops;
mod profit;
mod users;
mod util;
mod vehicles;

type ResultEngine<T> = Result<T, EngineError>;
