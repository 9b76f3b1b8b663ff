use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CarbonLoanError;
use crate::types::*;
use crate::CarbonLoanResult;

/// Number of months reported in a schedule, whatever the loan term.
pub const SCHEDULE_MONTHS_CAP: u32 = 60;

/// Input for a fixed-rate amortization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,
    /// Annual interest rate in percent (6.75 = 6.75%)
    pub annual_rate_percent: Percent,
    pub term_months: u32,
}

/// A single month in the amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub remaining_balance: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
}

/// Level payment and month-by-month breakdown of a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub monthly_rate: Decimal,
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    /// First `min(term_months, 60)` months
    pub schedule: Vec<AmortizationRow>,
}

/// Amortize `principal` over `term_months` at a fixed annual rate.
///
/// The level payment follows the annuity formula
/// `P * r * (1 + r)^n / ((1 + r)^n - 1)` with `r` the monthly rate. A zero
/// rate repays principal in equal instalments instead.
pub fn amortize(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: u32,
) -> CarbonLoanResult<AmortizationOutput> {
    if principal <= Decimal::ZERO {
        return Err(CarbonLoanError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if term_months == 0 {
        return Err(CarbonLoanError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(CarbonLoanError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }

    let monthly_rate = annual_rate_percent / dec!(100) / dec!(12);
    let monthly_payment = level_payment(principal, monthly_rate, term_months)?;

    let months_shown = term_months.min(SCHEDULE_MONTHS_CAP);
    let mut schedule = Vec::with_capacity(months_shown as usize);
    let mut balance = principal;
    for month in 1..=months_shown {
        let interest_portion = balance
            .checked_mul(monthly_rate)
            .ok_or_else(|| overflow("monthly interest"))?;
        let principal_portion = monthly_payment
            .checked_sub(interest_portion)
            .ok_or_else(|| overflow("principal repaid"))?;
        balance = balance
            .checked_sub(principal_portion)
            .ok_or_else(|| overflow("remaining balance"))?
            .max(Decimal::ZERO);
        schedule.push(AmortizationRow {
            month,
            remaining_balance: balance,
            interest_portion,
            principal_portion,
        });
    }

    let total_payment = monthly_payment
        .checked_mul(Decimal::from(term_months))
        .ok_or_else(|| overflow("total payment"))?;
    let total_interest = total_payment - principal;

    Ok(AmortizationOutput {
        monthly_rate,
        monthly_payment,
        total_payment,
        total_interest,
        schedule,
    })
}

/// Fixed monthly payment that retires `principal` in `n` months.
fn level_payment(principal: Money, monthly_rate: Decimal, n: u32) -> CarbonLoanResult<Money> {
    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(n));
    }

    // P * r * g / (g - 1), rearranged as P * r / (1 - 1/g) to stay in range.
    // Past the decimal range 1/g is below its resolution and the factor is 1.
    let annuity_factor = match (Decimal::ONE + monthly_rate).checked_powu(u64::from(n)) {
        Some(growth) => Decimal::ONE - Decimal::ONE / growth,
        None => Decimal::ONE,
    };
    if annuity_factor.is_zero() {
        return Err(CarbonLoanError::DivisionByZero {
            context: "amortization annuity factor".into(),
        });
    }
    principal
        .checked_mul(monthly_rate)
        .and_then(|interest| interest.checked_div(annuity_factor))
        .ok_or_else(|| overflow("monthly payment"))
}

fn overflow(quantity: &str) -> CarbonLoanError {
    CarbonLoanError::FinancialImpossibility(format!("{quantity} exceeds decimal range"))
}

/// Amortization wrapped in the standard output envelope.
pub fn build_amortization_schedule(
    input: &AmortizationInput,
) -> CarbonLoanResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = amortize(input.principal, input.annual_rate_percent, input.term_months)?;

    if output.monthly_rate.is_zero() {
        warnings.push("Zero interest rate; principal repaid in equal instalments.".into());
    }
    if input.term_months > SCHEDULE_MONTHS_CAP {
        warnings.push(format!(
            "Schedule truncated to the first {SCHEDULE_MONTHS_CAP} of {} months.",
            input.term_months
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate annuity amortization (monthly compounding)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
