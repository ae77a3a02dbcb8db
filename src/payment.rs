use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::{AmortizationError, EngineResult};
use crate::validation::MAX_TERM_MONTHS;

/// Converts a nominal annual rate into the rate charged each month.
pub fn monthly_rate(annual_rate: Decimal) -> Decimal {
    annual_rate / dec!(12)
}

/// Calculates the fixed monthly payment that fully amortizes `principal` in `term_months`.
///
/// The annuity formula is: PMT = P * [r(1 + r)^n] / [(1 + r)^n - 1], with `r` the
/// monthly rate. A zero rate spreads the principal evenly over the term.
///
/// # Errors
///
/// Returns `InvalidInput` if the principal is not positive, the rate is negative or
/// the term is zero or longer than `MAX_TERM_MONTHS`, and `Overflow` if the payment
/// does not fit in a `Decimal`.
pub fn scheduled_payment(
    principal: Decimal,
    annual_rate: Decimal,
    term_months: u32,
) -> EngineResult<Decimal> {
    if term_months == 0 {
        return Err(AmortizationError::invalid("term_months", "must be at least one month"));
    }
    if term_months > MAX_TERM_MONTHS {
        return Err(AmortizationError::invalid(
            "term_months",
            format!("cannot exceed {MAX_TERM_MONTHS} months"),
        ));
    }
    if principal <= Decimal::ZERO {
        return Err(AmortizationError::invalid("principal", "must be greater than zero"));
    }
    if annual_rate < Decimal::ZERO {
        return Err(AmortizationError::invalid("annual_rate", "cannot be negative"));
    }

    let rate = monthly_rate(annual_rate);
    if rate.is_zero() {
        return Ok(principal / Decimal::from(term_months));
    }

    let r_plus_1_pow_n = (dec!(1) + rate)
        .checked_powu(term_months.into())
        .ok_or_else(|| AmortizationError::overflow("annuity factor"))?;

    rate
        .checked_mul(r_plus_1_pow_n)
        .and_then(|numerator| principal.checked_mul(numerator))
        .and_then(|numerator| numerator.checked_div(r_plus_1_pow_n - dec!(1)))
        .ok_or_else(|| AmortizationError::overflow("scheduled payment"))
}
