use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::{AmortizationError, EngineResult};
use crate::payment::monthly_rate;
use crate::types::{ExtraCostBasis, OpportunityHorizon, PeriodRecord};

/// Growth `extra` would earn compounding monthly at `alternative_annual_return` for `periods` months.
pub fn compound_growth(
    extra: Decimal,
    alternative_annual_return: Decimal,
    periods: u32,
) -> EngineResult<Decimal> {
    if extra.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let factor = (dec!(1) + monthly_rate(alternative_annual_return))
        .checked_powu(periods.into())
        .ok_or_else(|| AmortizationError::overflow("opportunity cost compounding"))?;

    extra
        .checked_mul(factor - dec!(1))
        .ok_or_else(|| AmortizationError::overflow("opportunity cost"))
}

/// Last period of the investment horizon.
pub fn horizon_month(horizon: OpportunityHorizon, term_months: u32, payoff_month: u32) -> u32 {
    match horizon {
        OpportunityHorizon::OriginalTerm => term_months,
        OpportunityHorizon::ActualPayoff => payoff_month,
    }
}

/// Fills in the opportunity cost of every period's extra, taken on `basis`.
///
/// An extra paid in `period` compounds for `horizon - period + 1` months.
pub fn accrue(
    schedule: &mut [PeriodRecord],
    alternative_annual_return: Decimal,
    horizon: u32,
    basis: ExtraCostBasis,
) -> EngineResult<Decimal> {
    let mut total = Decimal::ZERO;
    for record in schedule.iter_mut() {
        let periods = horizon.saturating_add(1).saturating_sub(record.period_index);
        record.opportunity_cost = compound_growth(
            record.costed_extra(basis),
            alternative_annual_return,
            periods,
        )?;
        total = total
            .checked_add(record.opportunity_cost)
            .ok_or_else(|| AmortizationError::overflow("total opportunity cost"))?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(period_index: u32, extra_scheduled: Decimal, extra_applied: Decimal) -> PeriodRecord {
        PeriodRecord {
            period_index,
            period_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            opening_balance: dec!(1000),
            interest_accrued: dec!(0),
            scheduled_payment: dec!(100),
            extra_scheduled,
            extra_applied,
            principal_portion: dec!(100),
            closing_balance: dec!(900),
            opportunity_cost: dec!(0),
        }
    }

    #[test]
    fn test_compound_growth() {
        // 12% a year is exactly 1% a month: 1000 * (1.01^2 - 1) = 20.1
        let growth = compound_growth(dec!(1000), dec!(0.12), 2).unwrap();
        assert_eq!(growth, dec!(20.1));
    }

    #[test]
    fn test_compound_growth_zero_extra() {
        assert_eq!(compound_growth(dec!(0), dec!(0.12), 60).unwrap(), dec!(0));
    }

    #[test]
    fn test_compound_growth_zero_return() {
        assert_eq!(compound_growth(dec!(2000), dec!(0), 64).unwrap(), dec!(0));
    }

    #[test]
    fn test_compound_growth_negative_return_is_a_loss() {
        let growth = compound_growth(dec!(1000), dec!(-0.12), 1).unwrap();
        assert_eq!(growth, dec!(-10));
    }

    #[test]
    fn test_compound_growth_overflow_is_an_error() {
        let err = compound_growth(Decimal::MAX, dec!(0.12), 600).unwrap_err();
        assert!(matches!(err, AmortizationError::Overflow { .. }));
    }

    #[test]
    fn test_horizon_month() {
        assert_eq!(horizon_month(OpportunityHorizon::OriginalTerm, 64, 50), 64);
        assert_eq!(horizon_month(OpportunityHorizon::ActualPayoff, 64, 50), 50);
    }

    #[test]
    fn test_accrue_uses_remaining_periods() {
        let mut schedule = vec![
            record(1, dec!(1000), dec!(1000)),
            record(2, dec!(0), dec!(0)),
            record(3, dec!(1000), dec!(1000)),
        ];

        let total = accrue(&mut schedule, dec!(0.12), 3, ExtraCostBasis::Scheduled).unwrap();

        // period 1 compounds 3 months, period 3 compounds 1 month
        assert_eq!(schedule[0].opportunity_cost, dec!(30.301));
        assert_eq!(schedule[1].opportunity_cost, dec!(0));
        assert_eq!(schedule[2].opportunity_cost, dec!(10));
        assert_eq!(total, dec!(40.301));
    }

    #[test]
    fn test_accrue_on_scheduled_or_applied_extra() {
        // the balance only absorbed 400 of the 1000 configured for period 2
        let mut scheduled = vec![record(1, dec!(0), dec!(0)), record(2, dec!(1000), dec!(400))];
        let mut applied = scheduled.clone();

        let scheduled_total =
            accrue(&mut scheduled, dec!(0.12), 2, ExtraCostBasis::Scheduled).unwrap();
        let applied_total = accrue(&mut applied, dec!(0.12), 2, ExtraCostBasis::Applied).unwrap();

        assert_eq!(scheduled_total, dec!(10));
        assert_eq!(applied_total, dec!(4));
        assert_eq!(scheduled[1].opportunity_cost, dec!(10));
        assert_eq!(applied[1].opportunity_cost, dec!(4));
    }
}
