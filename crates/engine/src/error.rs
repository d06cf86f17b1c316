//! The module contains the error the engine can throw.
//!
//! Validation errors are terminal: the caller must fix the underlying data
//! before retrying. The profit distribution errors are:
//!
//! - [`NoInvestments`] when a vehicle has no investment records.
//! - [`VehicleNotFound`] when the vehicle does not exist.
//! - [`VehicleNotSold`] when neither the legacy flag nor the status say sold.
//! - [`NoProfitToDistribute`] when the profit is missing or not positive.
//! - [`InvalidInvestmentTotal`] when the investments do not sum to a positive value.
//! - [`AlreadyDistributed`] when distribution rows already exist.
//!
//! [`DistributionPersistFailed`] is raised when writing the distribution rows
//! fails; the transaction is rolled back and the call can be retried.
//!
//!  [`NoInvestments`]: EngineError::NoInvestments
//!  [`VehicleNotFound`]: EngineError::VehicleNotFound
//!  [`VehicleNotSold`]: EngineError::VehicleNotSold
//!  [`NoProfitToDistribute`]: EngineError::NoProfitToDistribute
//!  [`InvalidInvestmentTotal`]: EngineError::InvalidInvestmentTotal
//!  [`AlreadyDistributed`]: EngineError::AlreadyDistributed
//!  [`DistributionPersistFailed`]: EngineError::DistributionPersistFailed
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("Invalid vehicle status: {0}")]
    InvalidStatus(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Still referenced: {0}")]
    InUse(String),
    #[error("No investments found for vehicle {0}. Add investments before distributing profit.")]
    NoInvestments(String),
    #[error("Vehicle {0} not found")]
    VehicleNotFound(String),
    #[error("Vehicle {0} is not marked as sold")]
    VehicleNotSold(String),
    #[error("Vehicle {0} does not have any profit to distribute")]
    NoProfitToDistribute(String),
    #[error("Invalid total investment amount: {0}")]
    InvalidInvestmentTotal(String),
    #[error("Profit has already been distributed for vehicle {0}")]
    AlreadyDistributed(String),
    #[error("Failed to create profit distributions: {0}")]
    DistributionPersistFailed(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidRole(a), Self::InvalidRole(b)) => a == b,
            (Self::InvalidStatus(a), Self::InvalidStatus(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InUse(a), Self::InUse(b)) => a == b,
            (Self::NoInvestments(a), Self::NoInvestments(b)) => a == b,
            (Self::VehicleNotFound(a), Self::VehicleNotFound(b)) => a == b,
            (Self::VehicleNotSold(a), Self::VehicleNotSold(b)) => a == b,
            (Self::NoProfitToDistribute(a), Self::NoProfitToDistribute(b)) => a == b,
            (Self::InvalidInvestmentTotal(a), Self::InvalidInvestmentTotal(b)) => a == b,
            (Self::AlreadyDistributed(a), Self::AlreadyDistributed(b)) => a == b,
            (Self::DistributionPersistFailed(a), Self::DistributionPersistFailed(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
