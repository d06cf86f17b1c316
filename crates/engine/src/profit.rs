//! Pro-rata split of a vehicle's profit over its investments.
//!
//! Each investment receives `amount / total * 100` percent of the profit.
//! Values are `f64`: the distributed total may drift from the profit by a
//! sub-cent epsilon and percentages may not add up to exactly `100.0`.

use crate::{EngineError, ResultEngine};

/// One investment as seen by the split: who invested and how much.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contribution {
    pub investor_id: i32,
    pub amount: f64,
}

/// The portion of the profit assigned to one contribution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Share {
    pub investor_id: i32,
    pub amount: f64,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfitSplit {
    /// One share per contribution, in input order.
    pub shares: Vec<Share>,
    pub total_distributed: f64,
}

/// Split `profit` proportionally to `contributions`.
///
/// Fails with [`EngineError::NoProfitToDistribute`] when `profit` is not a
/// positive finite number and with [`EngineError::InvalidInvestmentTotal`]
/// when the contributions do not sum to a positive finite number.
pub fn split_profit(profit: f64, contributions: &[Contribution]) -> ResultEngine<ProfitSplit> {
    if !profit.is_finite() || profit <= 0.0 {
        return Err(EngineError::NoProfitToDistribute(format!(
            "profit {profit} is not positive"
        )));
    }

    let total_investment: f64 = contributions.iter().map(|c| c.amount).sum();
    if !total_investment.is_finite() || total_investment <= 0.0 {
        return Err(EngineError::InvalidInvestmentTotal(total_investment.to_string()));
    }

    let shares: Vec<Share> = contributions
        .iter()
        .map(|contribution| {
            let percentage = contribution.amount / total_investment * 100.0;
            Share {
                investor_id: contribution.investor_id,
                amount: percentage / 100.0 * profit,
                percentage,
            }
        })
        .collect();
    let total_distributed = shares.iter().map(|share| share.amount).sum();

    Ok(ProfitSplit {
        shares,
        total_distributed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn contributions(amounts: &[(i32, f64)]) -> Vec<Contribution> {
        amounts
            .iter()
            .map(|&(investor_id, amount)| Contribution {
                investor_id,
                amount,
            })
            .collect()
    }

    #[test]
    fn splits_thirty_seventy() {
        let split = split_profit(1000.0, &contributions(&[(1, 300.0), (2, 700.0)])).unwrap();

        assert_eq!(split.shares.len(), 2);
        assert_eq!(split.shares[0].investor_id, 1);
        assert!((split.shares[0].amount - 300.0).abs() < EPSILON);
        assert!((split.shares[0].percentage - 30.0).abs() < EPSILON);
        assert_eq!(split.shares[1].investor_id, 2);
        assert!((split.shares[1].amount - 700.0).abs() < EPSILON);
        assert!((split.shares[1].percentage - 70.0).abs() < EPSILON);
        assert!((split.total_distributed - 1000.0).abs() < EPSILON);
    }

    #[test]
    fn uneven_split_stays_within_tolerance() {
        let profit = 1234.57;
        let split = split_profit(
            profit,
            &contributions(&[(1, 100.0), (2, 100.0), (3, 100.0), (4, 33.33)]),
        )
        .unwrap();

        let percentages: f64 = split.shares.iter().map(|s| s.percentage).sum();
        assert!((percentages - 100.0).abs() < EPSILON);
        assert!((split.total_distributed - profit).abs() < EPSILON);
        for (share, amount) in split.shares.iter().zip([100.0, 100.0, 100.0, 33.33]) {
            assert!((share.amount - amount / 333.33 * profit).abs() < EPSILON);
        }
    }

    #[test]
    fn same_investor_keeps_one_share_per_contribution() {
        let split = split_profit(90.0, &contributions(&[(7, 10.0), (7, 20.0)])).unwrap();

        assert_eq!(split.shares.len(), 2);
        assert!((split.shares[0].amount - 30.0).abs() < EPSILON);
        assert!((split.shares[1].amount - 60.0).abs() < EPSILON);
    }

    #[test]
    fn empty_contributions_are_an_invalid_total() {
        let err = split_profit(100.0, &[]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInvestmentTotal(_)));
    }

    #[test]
    fn non_positive_total_is_rejected() {
        let err = split_profit(100.0, &contributions(&[(1, 50.0), (2, -50.0)])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInvestmentTotal(_)));
    }

    #[test]
    fn non_positive_profit_is_rejected() {
        for profit in [0.0, -10.0, f64::NAN] {
            let err = split_profit(profit, &contributions(&[(1, 50.0)])).unwrap_err();
            assert!(matches!(err, EngineError::NoProfitToDistribute(_)));
        }
    }
}
