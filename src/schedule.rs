use chrono::{Days, Months, NaiveDate};
use log::{debug, trace, warn};
use rust_decimal::Decimal;

use crate::error::{AmortizationError, EngineResult};
use crate::opportunity;
use crate::payment::monthly_rate;
use crate::types::{AmortizationInput, DateStep, PeriodRecord};

/// Outcome of simulating one scenario month by month.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub schedule: Vec<PeriodRecord>,
    /// Period in which the balance reached zero, or the term if it never did early.
    pub payoff_month: u32,
    pub total_interest: Decimal,
    pub total_fees: Decimal,
    pub total_extra_paid: Decimal,
    pub commission_cost: Decimal,
    pub total_opportunity_cost: Decimal,
}

/// Date label of `period`, counted from the loan's start date.
pub fn period_date(
    start_date: NaiveDate,
    step: DateStep,
    period: u32,
) -> EngineResult<NaiveDate> {
    let date = match step {
        DateStep::ThirtyDays => start_date.checked_add_days(Days::new(30 * u64::from(period))),
        DateStep::CalendarMonth => start_date.checked_add_months(Months::new(period)),
    };
    date.ok_or(AmortizationError::DateOutOfRange { period })
}

fn add(total: Decimal, amount: Decimal, context: &str) -> EngineResult<Decimal> {
    total
        .checked_add(amount)
        .ok_or_else(|| AmortizationError::overflow(context))
}

/// Advances one month: accrues interest, pays the scheduled payment and up to `extra` on top.
///
/// The last payment shrinks to `balance + interest` and the extra is capped at whatever
/// principal is still owed, so the closing balance never goes below zero.
fn step(
    period_index: u32,
    period_date: NaiveDate,
    balance: Decimal,
    rate: Decimal,
    payment: Decimal,
    extra: Decimal,
) -> EngineResult<PeriodRecord> {
    let interest_accrued = balance
        .checked_mul(rate)
        .ok_or_else(|| AmortizationError::overflow("interest"))?;
    let payoff_amount = add(balance, interest_accrued, "payoff amount")?;
    let (scheduled_payment, principal_portion) = if payment >= payoff_amount {
        (payoff_amount, balance)
    } else {
        (payment, payment - interest_accrued)
    };

    let owed = balance - principal_portion;
    let (extra_applied, closing_balance) = if extra >= owed {
        (owed, Decimal::ZERO)
    } else {
        (extra, owed - extra)
    };

    Ok(PeriodRecord {
        period_index,
        period_date,
        opening_balance: balance,
        interest_accrued,
        scheduled_payment,
        extra_scheduled: extra,
        extra_applied,
        principal_portion,
        closing_balance,
        opportunity_cost: Decimal::ZERO,
    })
}

/// Runs the loan for its whole term with no extra payments.
///
/// Fees are charged every period of the term. The run never stops early, since
/// without extras the balance only reaches zero with the last payment.
pub fn simulate_baseline(
    input: &AmortizationInput,
    payment: Decimal,
) -> EngineResult<Simulation> {
    let loan = &input.loan;
    let rate = monthly_rate(loan.annual_rate);

    let mut balance = loan.principal;
    let mut total_interest = Decimal::ZERO;
    let mut schedule = Vec::new();

    for period in 1..=loan.term_months {
        let date = period_date(loan.start_date, input.options.date_step, period)?;
        let record = step(period, date, balance, rate, payment, Decimal::ZERO)?;
        total_interest = add(total_interest, record.interest_accrued, "total interest")?;
        balance = record.closing_balance;
        schedule.push(record);
    }

    let total_fees = input
        .extra
        .fixed_monthly_fee
        .checked_mul(Decimal::from(loan.term_months))
        .ok_or_else(|| AmortizationError::overflow("total fees"))?;
    debug!(
        "Baseline: {} periods, total interest {}, total fees {}",
        loan.term_months, total_interest, total_fees
    );

    Ok(Simulation {
        schedule,
        payoff_month: loan.term_months,
        total_interest,
        total_fees,
        total_extra_paid: Decimal::ZERO,
        commission_cost: Decimal::ZERO,
        total_opportunity_cost: Decimal::ZERO,
    })
}

/// Runs the loan applying the configured extra payments, stopping once the balance is repaid.
///
/// Commissions and opportunity cost are charged on the extra selected by
/// `extra_cost_basis`, and fixed fees only for the periods in which the loan is still open.
pub fn simulate_with_extras(
    input: &AmortizationInput,
    payment: Decimal,
) -> EngineResult<Simulation> {
    let loan = &input.loan;
    let policy = &input.extra;
    let rate = monthly_rate(loan.annual_rate);

    let mut balance = loan.principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_fees = Decimal::ZERO;
    let mut total_extra_paid = Decimal::ZERO;
    let mut commission_cost = Decimal::ZERO;
    let mut payoff_month = loan.term_months;
    let mut schedule = Vec::new();

    for period in 1..=loan.term_months {
        let date = period_date(loan.start_date, input.options.date_step, period)?;
        let record = step(
            period,
            date,
            balance,
            rate,
            payment,
            policy.scheduled_extra(period)?,
        )?;

        commission_cost = record
            .costed_extra(input.options.extra_cost_basis)
            .checked_mul(policy.early_repayment_fee_rate)
            .and_then(|commission| commission_cost.checked_add(commission))
            .ok_or_else(|| AmortizationError::overflow("early repayment commission"))?;
        total_extra_paid = add(total_extra_paid, record.extra_applied, "total extra paid")?;
        total_interest = add(total_interest, record.interest_accrued, "total interest")?;
        if balance > Decimal::ZERO {
            total_fees = add(total_fees, policy.fixed_monthly_fee, "total fees")?;
        }

        trace!(
            "Period {}, date {}, interest {}, extra {}, closing balance {}",
            period,
            record.period_date,
            record.interest_accrued,
            record.extra_applied,
            record.closing_balance
        );

        balance = record.closing_balance;
        schedule.push(record);
        if balance <= Decimal::ZERO {
            payoff_month = period;
            break;
        }
    }

    if policy.lump_sum > Decimal::ZERO && policy.lump_sum_month > payoff_month {
        warn!(
            "Lump sum scheduled for month {} was never applied: loan paid off in month {}",
            policy.lump_sum_month, payoff_month
        );
    }

    let horizon = opportunity::horizon_month(
        input.options.opportunity_horizon,
        loan.term_months,
        payoff_month,
    );
    let total_opportunity_cost = opportunity::accrue(
        &mut schedule,
        input.opportunity.alternative_annual_return,
        horizon,
        input.options.extra_cost_basis,
    )?;

    debug!(
        "With extras: paid off in month {}, total interest {}, extra paid {}, opportunity cost {}",
        payoff_month, total_interest, total_extra_paid, total_opportunity_cost
    );

    Ok(Simulation {
        schedule,
        payoff_month,
        total_interest,
        total_fees,
        total_extra_paid,
        commission_cost,
        total_opportunity_cost,
    })
}
