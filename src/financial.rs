//! Financial mode: loan amortisation, compound interest and investment growth.
//!
//! Rates are annual percentages. A zero principal, rate or term is rejected
//! rather than producing a meaningless figure.

use crate::error::{Error, Result};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanPayment {
    pub monthly_payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompoundInterest {
    pub amount: f64,
    pub interest_earned: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Investment {
    pub future_value: f64,
    pub total_contributions: f64,
    pub gains: f64,
}

/// Fixed monthly payment of an amortised loan.
pub fn loan_payment(principal: f64, annual_rate: f64, years: f64) -> Result<LoanPayment> {
    require("principal", principal)?;
    require("rate", annual_rate)?;
    require("term", years)?;

    let r = annual_rate / 100.0 / 12.0;
    let n = years * 12.0;
    let growth = (1.0 + r).powf(n);
    let monthly_payment = finite(principal * (r * growth) / (growth - 1.0))?;
    let total_paid = monthly_payment * n;
    debug!("Loan {} at {}% over {}y: {}", principal, annual_rate, years, monthly_payment);

    Ok(LoanPayment {
        monthly_payment,
        total_paid,
        total_interest: total_paid - principal,
    })
}

/// `P(1 + r/n)^(n t)` for `times_per_year` compounding periods.
pub fn compound_interest(
    principal: f64,
    annual_rate: f64,
    times_per_year: f64,
    years: f64,
) -> Result<CompoundInterest> {
    require("principal", principal)?;
    require("rate", annual_rate)?;
    require("compounding frequency", times_per_year)?;
    require("time", years)?;

    let r = annual_rate / 100.0;
    let amount = finite(principal * (1.0 + r / times_per_year).powf(times_per_year * years))?;
    debug!("Compound {} at {}% x{} for {}y: {}", principal, annual_rate, times_per_year, years, amount);

    Ok(CompoundInterest {
        amount,
        interest_earned: amount - principal,
    })
}

/// Future value of an initial sum plus a monthly contribution, compounded monthly.
/// Either the initial sum or the contribution may be zero, not both.
pub fn investment_future_value(
    initial: f64,
    monthly: f64,
    annual_rate: f64,
    years: f64,
) -> Result<Investment> {
    if !initial.is_finite() || !monthly.is_finite() {
        return Err(Error::InvalidArgument("amounts must be numbers".to_string()));
    }
    if initial == 0.0 && monthly == 0.0 {
        return Err(Error::InvalidArgument(
            "initial amount or monthly contribution is required".to_string(),
        ));
    }
    require("rate", annual_rate)?;
    require("years", years)?;

    let r = annual_rate / 100.0 / 12.0;
    let n = years * 12.0;
    let growth = (1.0 + r).powf(n);
    let lump_sum = initial * growth;
    let annuity = monthly * ((growth - 1.0) / r);
    let future_value = finite(lump_sum + annuity)?;
    let total_contributions = initial + monthly * n;

    Ok(Investment {
        future_value,
        total_contributions,
        gains: future_value - total_contributions,
    })
}

/// Two decimals, no grouping, as the financial forms show amounts.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

fn require(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value == 0.0 {
        return Err(Error::InvalidArgument(format!(
            "{} must be a non-zero number, got {}",
            field, value
        )));
    }
    Ok(())
}

fn finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NonFiniteResult(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_payment() {
        let loan = loan_payment(200_000.0, 6.0, 30.0).unwrap();
        assert_eq!(format_amount(loan.monthly_payment), "1199.10");
        assert!((loan.total_paid - loan.monthly_payment * 360.0).abs() < 1e-9);
        assert!((loan.total_interest - (loan.total_paid - 200_000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_compound_interest() {
        let compound = compound_interest(1000.0, 5.0, 12.0, 10.0).unwrap();
        assert_eq!(format_amount(compound.amount), "1647.01");
        assert_eq!(format_amount(compound.interest_earned), "647.01");
    }

    #[test]
    fn test_investment() {
        let investment = investment_future_value(1000.0, 100.0, 7.0, 10.0).unwrap();
        assert_eq!(format_amount(investment.future_value), "19318.14");
        assert_eq!(format_amount(investment.total_contributions), "13000.00");
        assert_eq!(format_amount(investment.gains), "6318.14");

        let lump = investment_future_value(1000.0, 0.0, 7.0, 10.0).unwrap();
        assert!(lump.future_value > 1000.0);
    }

    #[test]
    fn test_zero_inputs_rejected() {
        assert!(matches!(loan_payment(0.0, 6.0, 30.0), Err(Error::InvalidArgument(_))));
        assert!(matches!(loan_payment(1000.0, 0.0, 30.0), Err(Error::InvalidArgument(_))));
        assert!(compound_interest(1000.0, 5.0, 0.0, 10.0).is_err());
        assert!(compound_interest(f64::NAN, 5.0, 12.0, 10.0).is_err());
        assert!(matches!(
            investment_future_value(0.0, 0.0, 7.0, 10.0),
            Err(Error::InvalidArgument(_))
        ));
    }
}
