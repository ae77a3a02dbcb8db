use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{AmortizationError, EngineResult};
use crate::types::{AmortizationInput, RecommendationPolicy};

/// Longest term accepted, in months (100 years).
pub const MAX_TERM_MONTHS: u32 = 1200;

/// Checks every constraint on a computation's inputs and returns the first violation.
pub fn validate(input: &AmortizationInput) -> EngineResult<()> {
    let loan = &input.loan;
    if loan.principal <= Decimal::ZERO {
        return Err(AmortizationError::invalid("principal", "must be greater than zero"));
    }
    if loan.annual_rate < Decimal::ZERO {
        return Err(AmortizationError::invalid("annual_rate", "cannot be negative"));
    }
    if loan.term_months == 0 {
        return Err(AmortizationError::invalid("term_months", "must be at least one month"));
    }
    if loan.term_months > MAX_TERM_MONTHS {
        return Err(AmortizationError::invalid(
            "term_months",
            format!("cannot exceed {MAX_TERM_MONTHS} months"),
        ));
    }

    let extra = &input.extra;
    non_negative("lump_sum", extra.lump_sum)?;
    non_negative("monthly_extra", extra.monthly_extra)?;
    non_negative("fixed_monthly_fee", extra.fixed_monthly_fee)?;
    non_negative("early_repayment_fee_rate", extra.early_repayment_fee_rate)?;
    within_term("lump_sum_month", extra.lump_sum_month, loan.term_months)?;
    within_term(
        "monthly_extra_start_month",
        extra.monthly_extra_start_month,
        loan.term_months,
    )?;

    if input.opportunity.alternative_annual_return <= dec!(-1) {
        return Err(AmortizationError::invalid(
            "alternative_annual_return",
            "must be greater than -100%",
        ));
    }

    if let RecommendationPolicy::InterestShare { share } = input.options.recommendation_policy {
        non_negative("share", share)?;
    }

    Ok(())
}

fn non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(AmortizationError::invalid(field, "cannot be negative"));
    }
    Ok(())
}

fn within_term(field: &str, month: u32, term_months: u32) -> EngineResult<()> {
    if month == 0 || month > term_months {
        return Err(AmortizationError::invalid(
            field,
            format!("must be between 1 and {term_months}"),
        ));
    }
    Ok(())
}
