use log::debug;
use rust_decimal::Decimal;

use crate::error::{AmortizationError, EngineResult};
use crate::schedule::Simulation;
use crate::types::{AmortizationTotals, Recommendation, RecommendationPolicy};

/// Compares the run with extras against the baseline run.
pub fn aggregate(
    baseline: &Simulation,
    with_extras: &Simulation,
    term_months: u32,
) -> EngineResult<AmortizationTotals> {
    let interest_saved = baseline.total_interest - with_extras.total_interest;
    let fees_saved = baseline.total_fees - with_extras.total_fees;
    let net_saving = interest_saved
        .checked_add(fees_saved)
        .and_then(|saved| saved.checked_sub(with_extras.commission_cost))
        .ok_or_else(|| AmortizationError::overflow("net saving"))?;

    Ok(AmortizationTotals {
        baseline_total_interest: baseline.total_interest,
        baseline_total_fees: baseline.total_fees,
        total_interest_with_extra: with_extras.total_interest,
        interest_saved,
        total_extra_paid: with_extras.total_extra_paid,
        total_opportunity_cost: with_extras.total_opportunity_cost,
        fees_with_extra: with_extras.total_fees,
        fees_saved,
        commission_cost: with_extras.commission_cost,
        net_saving,
        months_saved: term_months.saturating_sub(with_extras.payoff_month),
    })
}

/// Applies `policy` to the totals.
///
/// With `neutral_without_extra` set, a run where no extra money was applied is `Neutral`
/// whatever the policy; otherwise the policy decides that case too.
pub fn recommend(
    totals: &AmortizationTotals,
    policy: RecommendationPolicy,
    neutral_without_extra: bool,
) -> Recommendation {
    if neutral_without_extra && totals.total_extra_paid.is_zero() {
        return Recommendation::Neutral;
    }

    let prepay = match policy {
        RecommendationPolicy::NetSaving => totals.net_saving > totals.total_opportunity_cost,
        RecommendationPolicy::InterestSaved => {
            totals.interest_saved > totals.total_opportunity_cost
        }
        RecommendationPolicy::InterestShare { share } => {
            totals.total_opportunity_cost < share * totals.baseline_total_interest
        }
    };

    let recommendation = if prepay {
        Recommendation::PrepayRecommended
    } else {
        Recommendation::InvestRecommended
    };
    debug!("{:?} under {:?}", recommendation, policy);
    recommendation
}
