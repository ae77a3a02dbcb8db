//! `prepay_vs_invest` is a Rust library for deciding whether paying a loan off early beats
//! investing the same money.
//!
//! It simulates a fixed-payment loan month by month under two plans:
//! - **Baseline**: the scheduled payment only, for the full term.
//! - **With extras**: a one-time lump sum and/or a recurring monthly overpayment on top,
//!   ending as soon as the balance is repaid.
//!
//! The interest and fees saved by the second plan (minus any early-repayment commission)
//! are then weighed against the opportunity cost: what the extra money would have earned
//! invested at an alternative rate of return.
//!
//! ## Usage
//!
//! Add `prepay_vs_invest` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! prepay_vs_invest = "0.1.0"
//! rust_decimal = "1.39.0"
//! rust_decimal_macros = "1.39.0"
//! chrono = "0.4"
//! ```
//!
//! Then build an [`AmortizationInput`] and call [`calculate_amortization`]:
//!
//! ```rust
//! use chrono::NaiveDate;
//! use prepay_vs_invest::{
//!     calculate_amortization, AmortizationInput, EngineOptions, ExtraPaymentPolicy, LoanTerms,
//!     OpportunityCostAssumption,
//! };
//! use rust_decimal_macros::dec;
//!
//! fn main() {
//!     let input = AmortizationInput {
//!         loan: LoanTerms {
//!             principal: dec!(10_000),
//!             annual_rate: dec!(0.05),
//!             term_months: 64,
//!             start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
//!         },
//!         extra: ExtraPaymentPolicy {
//!             lump_sum: dec!(2_000),
//!             lump_sum_month: 1,
//!             ..Default::default()
//!         },
//!         opportunity: OpportunityCostAssumption {
//!             alternative_annual_return: dec!(0.05),
//!         },
//!         options: EngineOptions::default(),
//!     };
//!
//!     match calculate_amortization(&input) {
//!         Ok(result) => {
//!             println!("Monthly payment:  {:.2}", result.scheduled_payment);
//!             println!("Paid off in:      {} months", result.actual_payoff_month);
//!             println!("Interest saved:   {:.2}", result.totals.interest_saved);
//!             println!("Opportunity cost: {:.2}", result.totals.total_opportunity_cost);
//!             println!("Recommendation:   {:?}", result.recommendation);
//!         }
//!         Err(e) => {
//!             eprintln!("Error calculating amortization: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod error;
pub mod opportunity;
pub mod payment;
pub mod recommendation;
pub mod schedule;
pub mod types;
pub mod validation;

use log::debug;

pub use error::{AmortizationError, EngineResult};
pub use types::{
    AmortizationInput, AmortizationResult, AmortizationTotals, DateStep, EngineOptions,
    ExtraCostBasis, ExtraPaymentPolicy, LoanTerms, OpportunityCostAssumption, OpportunityHorizon,
    PeriodRecord, Recommendation, RecommendationPolicy,
};

/// Simulates the loan with and without extra payments and recommends prepaying or investing.
///
/// This is the main entry point of the library. The inputs are validated first, then the
/// fixed payment is derived, both plans are simulated and their totals compared.
///
/// # Errors
///
/// Returns `InvalidInput` for out-of-range inputs (non-positive principal, negative rate,
/// zero term or one over `validation::MAX_TERM_MONTHS`, months outside the term,
/// alternative return at or below -100%), and
/// `Overflow` or `DateOutOfRange` if the numbers or dates cannot be represented.
pub fn calculate_amortization(input: &AmortizationInput) -> EngineResult<AmortizationResult> {
    validation::validate(input)?;

    let loan = &input.loan;
    let scheduled_payment =
        payment::scheduled_payment(loan.principal, loan.annual_rate, loan.term_months)?;
    debug!(
        "Scheduled payment {} for {} over {} months",
        scheduled_payment, loan.principal, loan.term_months
    );

    let baseline = schedule::simulate_baseline(input, scheduled_payment)?;
    let with_extras = schedule::simulate_with_extras(input, scheduled_payment)?;

    let totals = recommendation::aggregate(&baseline, &with_extras, loan.term_months)?;
    let recommendation = recommendation::recommend(
        &totals,
        input.options.recommendation_policy,
        input.options.neutral_without_extra,
    );

    Ok(AmortizationResult {
        scheduled_payment,
        schedule: with_extras.schedule,
        actual_payoff_month: with_extras.payoff_month,
        totals,
        recommendation,
    })
}
