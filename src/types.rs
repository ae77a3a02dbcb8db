use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AmortizationError, EngineResult};

/// The loan being amortized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Initial debt.
    pub principal: Decimal,
    /// Nominal annual rate as a fraction (e.g., 0.05 for 5%).
    pub annual_rate: Decimal,
    /// Number of scheduled monthly periods.
    pub term_months: u32,
    /// Anchor for the period date labels.
    pub start_date: NaiveDate,
}

/// Extra repayments and the costs attached to the loan.
///
/// Every amount defaults to zero, so a missing section in the input means
/// "no extra payments, no fees".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraPaymentPolicy {
    /// One-time extra amount.
    pub lump_sum: Decimal,
    /// 1-based period in which the lump sum is paid.
    pub lump_sum_month: u32,
    /// Recurring extra amount paid every period from `monthly_extra_start_month` on.
    pub monthly_extra: Decimal,
    /// 1-based period from which `monthly_extra` is paid every month.
    pub monthly_extra_start_month: u32,
    /// Insurance, account fees and the like, charged while the loan is open.
    pub fixed_monthly_fee: Decimal,
    /// Commission charged on every extra amount, as a fraction of it.
    pub early_repayment_fee_rate: Decimal,
}

impl Default for ExtraPaymentPolicy {
    fn default() -> Self {
        Self {
            lump_sum: Decimal::ZERO,
            lump_sum_month: 1,
            monthly_extra: Decimal::ZERO,
            monthly_extra_start_month: 1,
            fixed_monthly_fee: Decimal::ZERO,
            early_repayment_fee_rate: Decimal::ZERO,
        }
    }
}

impl ExtraPaymentPolicy {
    /// Extra amount scheduled for `period`, before any capping at the balance.
    pub fn scheduled_extra(&self, period: u32) -> EngineResult<Decimal> {
        let mut extra = Decimal::ZERO;
        if period == self.lump_sum_month {
            extra = self.lump_sum;
        }
        if period >= self.monthly_extra_start_month {
            extra = extra
                .checked_add(self.monthly_extra)
                .ok_or_else(|| AmortizationError::overflow("scheduled extra payment"))?;
        }
        Ok(extra)
    }
}

/// What the extra money could earn if invested instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityCostAssumption {
    /// Annual return as a fraction (e.g., 0.05 for 5%).
    pub alternative_annual_return: Decimal,
}

/// Horizon over which an extra payment would have compounded if invested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityHorizon {
    /// Until the original maturity, even if the loan is paid off sooner.
    #[default]
    OriginalTerm,
    /// Until the month the loan is actually paid off.
    ActualPayoff,
}

/// Rule that turns the totals into a recommendation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RecommendationPolicy {
    /// Prepay when interest saved plus fees saved minus commissions beats the opportunity cost.
    #[default]
    NetSaving,
    /// Prepay when interest saved alone beats the opportunity cost.
    InterestSaved,
    /// Prepay when the opportunity cost stays below `share` of the baseline interest.
    InterestShare {
        /// Fraction of the baseline interest, e.g. 0.20.
        share: Decimal,
    },
}

/// How period dates advance from the start date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStep {
    /// `start_date + 30 * period` days.
    #[default]
    ThirtyDays,
    /// `start_date + period` calendar months, clamped to the end of shorter months.
    CalendarMonth,
}

/// Amount of each period's extra that commissions and opportunity cost are charged on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraCostBasis {
    /// The extra as configured, even the part the balance could not absorb.
    #[default]
    Scheduled,
    /// Only the extra actually applied against the balance.
    Applied,
}

/// Switches between the engine's alternative conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Horizon over which extras would have compounded if invested.
    pub opportunity_horizon: OpportunityHorizon,
    /// Rule that decides between prepaying and investing.
    pub recommendation_policy: RecommendationPolicy,
    /// How period dates advance.
    pub date_step: DateStep,
    /// Amount commissions and opportunity cost are charged on.
    pub extra_cost_basis: ExtraCostBasis,
    /// Return `Neutral` instead of applying the policy when no extra was paid.
    pub neutral_without_extra: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            opportunity_horizon: OpportunityHorizon::default(),
            recommendation_policy: RecommendationPolicy::default(),
            date_step: DateStep::default(),
            extra_cost_basis: ExtraCostBasis::default(),
            neutral_without_extra: true,
        }
    }
}

/// Everything a single computation needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationInput {
    /// The loan being amortized.
    pub loan: LoanTerms,
    /// Extra repayments and fees; none when omitted.
    #[serde(default)]
    pub extra: ExtraPaymentPolicy,
    /// Alternative return the extras are compared against.
    pub opportunity: OpportunityCostAssumption,
    /// Engine conventions; defaults when omitted.
    #[serde(default)]
    pub options: EngineOptions,
}

/// One simulated month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// 1-based period number.
    pub period_index: u32,
    /// Date label of the period.
    pub period_date: NaiveDate,
    /// Balance owed before this period's payment.
    pub opening_balance: Decimal,
    /// `opening_balance * monthly_rate`.
    pub interest_accrued: Decimal,
    /// Fixed payment, or `opening_balance + interest_accrued` when that is less.
    pub scheduled_payment: Decimal,
    /// Extra configured for this period.
    pub extra_scheduled: Decimal,
    /// Extra principal actually applied in this period.
    pub extra_applied: Decimal,
    /// `scheduled_payment - interest_accrued`.
    pub principal_portion: Decimal,
    /// `max(opening_balance - (principal_portion + extra_applied), 0)`.
    pub closing_balance: Decimal,
    /// Growth this period's extra would have earned if invested instead.
    pub opportunity_cost: Decimal,
}

impl PeriodRecord {
    /// The extra that commissions and opportunity cost are charged on under `basis`.
    pub fn costed_extra(&self, basis: ExtraCostBasis) -> Decimal {
        match basis {
            ExtraCostBasis::Scheduled => self.extra_scheduled,
            ExtraCostBasis::Applied => self.extra_applied,
        }
    }

    fn round_dp(&self, dp: u32) -> Self {
        Self {
            period_index: self.period_index,
            period_date: self.period_date,
            opening_balance: self.opening_balance.round_dp(dp),
            interest_accrued: self.interest_accrued.round_dp(dp),
            scheduled_payment: self.scheduled_payment.round_dp(dp),
            extra_scheduled: self.extra_scheduled.round_dp(dp),
            extra_applied: self.extra_applied.round_dp(dp),
            principal_portion: self.principal_portion.round_dp(dp),
            closing_balance: self.closing_balance.round_dp(dp),
            opportunity_cost: self.opportunity_cost.round_dp(dp),
        }
    }
}

/// Aggregates comparing the plan with extras against the plain loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationTotals {
    /// Interest paid over the full term without extras.
    pub baseline_total_interest: Decimal,
    /// `fixed_monthly_fee * term_months`.
    pub baseline_total_fees: Decimal,
    /// Interest paid until payoff with extras.
    pub total_interest_with_extra: Decimal,
    /// `baseline_total_interest - total_interest_with_extra`.
    pub interest_saved: Decimal,
    /// Extra principal actually applied.
    pub total_extra_paid: Decimal,
    /// Sum of the periods' opportunity costs.
    pub total_opportunity_cost: Decimal,
    /// Fees charged while the loan stayed open with extras.
    pub fees_with_extra: Decimal,
    /// `baseline_total_fees - fees_with_extra`.
    pub fees_saved: Decimal,
    /// Early-repayment commission on the extras.
    pub commission_cost: Decimal,
    /// `interest_saved + fees_saved - commission_cost`.
    pub net_saving: Decimal,
    /// `term_months - actual_payoff_month`.
    pub months_saved: u32,
}

impl AmortizationTotals {
    fn round_dp(&self, dp: u32) -> Self {
        Self {
            baseline_total_interest: self.baseline_total_interest.round_dp(dp),
            baseline_total_fees: self.baseline_total_fees.round_dp(dp),
            total_interest_with_extra: self.total_interest_with_extra.round_dp(dp),
            interest_saved: self.interest_saved.round_dp(dp),
            total_extra_paid: self.total_extra_paid.round_dp(dp),
            total_opportunity_cost: self.total_opportunity_cost.round_dp(dp),
            fees_with_extra: self.fees_with_extra.round_dp(dp),
            fees_saved: self.fees_saved.round_dp(dp),
            commission_cost: self.commission_cost.round_dp(dp),
            net_saving: self.net_saving.round_dp(dp),
            months_saved: self.months_saved,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    PrepayRecommended,
    InvestRecommended,
    /// No extra money was applied, so there is nothing to compare.
    Neutral,
}

/// Full output of one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Fixed periodic payment of the loan.
    pub scheduled_payment: Decimal,
    /// Schedule with extra payments applied, ending at the payoff month.
    pub schedule: Vec<PeriodRecord>,
    pub actual_payoff_month: u32,
    pub totals: AmortizationTotals,
    pub recommendation: Recommendation,
}

impl AmortizationResult {
    /// Copy with every amount rounded to `dp` decimal places, for display.
    pub fn rounded(&self, dp: u32) -> Self {
        Self {
            scheduled_payment: self.scheduled_payment.round_dp(dp),
            schedule: self.schedule.iter().map(|r| r.round_dp(dp)).collect(),
            actual_payoff_month: self.actual_payoff_month,
            totals: self.totals.round_dp(dp),
            recommendation: self.recommendation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scheduled_extra_is_additive() {
        let policy = ExtraPaymentPolicy {
            lump_sum: dec!(2000),
            lump_sum_month: 3,
            monthly_extra: dec!(50),
            monthly_extra_start_month: 3,
            ..Default::default()
        };

        assert_eq!(policy.scheduled_extra(1).unwrap(), dec!(0));
        assert_eq!(policy.scheduled_extra(2).unwrap(), dec!(0));
        assert_eq!(policy.scheduled_extra(3).unwrap(), dec!(2050));
        assert_eq!(policy.scheduled_extra(4).unwrap(), dec!(50));
    }

    #[test]
    fn test_scheduled_extra_overflow_is_an_error() {
        let policy = ExtraPaymentPolicy {
            lump_sum: Decimal::MAX,
            monthly_extra: Decimal::MAX,
            ..Default::default()
        };

        let err = policy.scheduled_extra(1).unwrap_err();

        assert!(matches!(err, AmortizationError::Overflow { .. }));
        assert_eq!(policy.scheduled_extra(2).unwrap(), Decimal::MAX);
    }

    #[test]
    fn test_input_defaults_from_json() {
        let json = r#"{
            "loan": {
                "principal": "10000",
                "annual_rate": "0.05",
                "term_months": 64,
                "start_date": "2024-01-15"
            },
            "opportunity": { "alternative_annual_return": "0.05" }
        }"#;

        let input: AmortizationInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.extra, ExtraPaymentPolicy::default());
        assert_eq!(input.options, EngineOptions::default());
        assert_eq!(input.loan.term_months, 64);
        assert_eq!(input.loan.principal, dec!(10000));
    }

    #[test]
    fn test_options_from_json() {
        let json = r#"{
            "opportunity_horizon": "actual_payoff",
            "recommendation_policy": { "rule": "interest_share", "share": "0.20" },
            "date_step": "calendar_month",
            "extra_cost_basis": "applied",
            "neutral_without_extra": false
        }"#;

        let options: EngineOptions = serde_json::from_str(json).unwrap();

        assert_eq!(
            options,
            EngineOptions {
                opportunity_horizon: OpportunityHorizon::ActualPayoff,
                recommendation_policy: RecommendationPolicy::InterestShare { share: dec!(0.20) },
                date_step: DateStep::CalendarMonth,
                extra_cost_basis: ExtraCostBasis::Applied,
                neutral_without_extra: false,
            }
        );
    }

    #[test]
    fn test_rounded_keeps_counts() {
        let record = PeriodRecord {
            period_index: 1,
            period_date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            opening_balance: dec!(10000),
            interest_accrued: dec!(41.666666),
            scheduled_payment: dec!(178.331542),
            extra_scheduled: dec!(0),
            extra_applied: dec!(0),
            principal_portion: dec!(136.664876),
            closing_balance: dec!(9863.335124),
            opportunity_cost: dec!(0),
        };
        let result = AmortizationResult {
            scheduled_payment: dec!(178.331542),
            schedule: vec![record],
            actual_payoff_month: 1,
            totals: AmortizationTotals {
                baseline_total_interest: dec!(1413.218694),
                baseline_total_fees: dec!(0),
                total_interest_with_extra: dec!(1413.218694),
                interest_saved: dec!(0),
                total_extra_paid: dec!(0),
                total_opportunity_cost: dec!(0),
                fees_with_extra: dec!(0),
                fees_saved: dec!(0),
                commission_cost: dec!(0),
                net_saving: dec!(0),
                months_saved: 0,
            },
            recommendation: Recommendation::Neutral,
        };

        let rounded = result.rounded(2);

        assert_eq!(rounded.scheduled_payment, dec!(178.33));
        assert_eq!(rounded.schedule[0].interest_accrued, dec!(41.67));
        assert_eq!(rounded.schedule[0].closing_balance, dec!(9863.34));
        assert_eq!(rounded.totals.baseline_total_interest, dec!(1413.22));
        assert_eq!(rounded.actual_payoff_month, 1);
    }
}
