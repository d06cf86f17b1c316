use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Generic acknowledgement body for mutations without a payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

pub mod vehicle {
    use super::*;

    /// Lifecycle status of an imported vehicle.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum VehicleStatus {
        #[default]
        Purchased,
        Shipped,
        Landed,
        Delivered,
        Reserved,
        Sold,
    }

    /// Request body for creating or replacing a vehicle.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct VehicleNew {
        pub chassis_no: String,
        pub vehicle_type: Option<String>,
        pub year: Option<i32>,
        pub total_cost: Option<f64>,
        pub sale_price: Option<f64>,
        pub profit: Option<f64>,
        /// On update, `None` keeps the current status.
        pub status: Option<VehicleStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleRecord {
        pub sale_price: Option<f64>,
        pub profit: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Vehicle {
        pub id: i32,
        pub chassis_no: String,
        pub vehicle_type: Option<String>,
        pub year: Option<i32>,
        pub total_cost: Option<f64>,
        pub sale_price: Option<f64>,
        pub profit: Option<f64>,
        pub status: VehicleStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehicleSummary {
        pub total: u64,
        pub purchased: u64,
        pub shipped: u64,
        pub landed: u64,
        pub delivered: u64,
        pub reserved: u64,
        pub sold: u64,
    }
}

pub mod investor {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct InvestorNew {
        pub name: String,
        pub contact_info: Option<String>,
        pub email: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Investor {
        pub id: i32,
        pub name: String,
        pub contact_info: Option<String>,
        pub email: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestorDeleted {
        pub message: String,
        /// Investments removed together with the investor.
        pub deleted_investments: u64,
    }
}

pub mod investment {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentNew {
        pub vehicle_id: i32,
        pub investor_id: i32,
        pub amount: f64,
        /// Defaults to today when omitted.
        pub investment_date: Option<NaiveDate>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentUpdate {
        pub amount: f64,
        pub investment_date: Option<NaiveDate>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Investment {
        pub id: i32,
        pub vehicle_id: i32,
        pub investor_id: i32,
        pub amount: f64,
        pub investment_date: Option<NaiveDate>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestorInvestmentSummary {
        pub investor_id: i32,
        pub total_amount: f64,
        pub total_vehicles: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehicleInvestmentTotals {
        pub vehicle_id: i32,
        pub chassis_no: String,
        pub total_investment: f64,
        pub investor_count: u64,
        pub has_investments: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentSummary {
        pub total_investment: f64,
        pub vehicles_with_investments: u64,
        pub vehicles: Vec<VehicleInvestmentTotals>,
    }
}

pub mod distribution {
    use super::*;

    /// Result of a successful profit distribution.
    ///
    /// Field names are camelCase on the wire.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DistributionResult {
        pub success: bool,
        pub message: String,
        pub distributions_count: usize,
        pub total_distributed: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DistributionsDeleted {
        pub message: String,
        pub deleted_count: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Distribution {
        pub id: i32,
        pub vehicle_id: i32,
        pub investor_id: i32,
        pub amount: f64,
        pub percentage: f64,
        pub distribution_date: NaiveDate,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestorDistributions {
        pub investor_id: i32,
        pub distributions: Vec<Distribution>,
        pub total_profit: f64,
        pub total_vehicles: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DistributionSummary {
        pub total_distributed: f64,
        pub vehicles_with_profit: u64,
        pub total_investors: u64,
    }
}

#[cfg(test)]
mod tests {
    use super::distribution::DistributionResult;
    use super::vehicle::VehicleStatus;

    #[test]
    fn distribution_result_is_camel_case() {
        let body = serde_json::to_value(DistributionResult {
            success: true,
            message: "ok".to_string(),
            distributions_count: 2,
            total_distributed: 1000.0,
        })
        .unwrap();
        assert_eq!(body["distributionsCount"], 2);
        assert_eq!(body["totalDistributed"], 1000.0);
        assert_eq!(body["success"], true);
    }

    #[test]
    fn status_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&VehicleStatus::Delivered).unwrap(),
            "\"delivered\""
        );
        let status: VehicleStatus = serde_json::from_str("\"sold\"").unwrap();
        assert_eq!(status, VehicleStatus::Sold);
    }
}
