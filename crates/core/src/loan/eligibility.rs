//! Loan eligibility.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::borrower::Borrower;
use crate::interest::InterestPolicy;
use crate::loan::types::LoanAccount;

/// Smallest advertised principal.
pub const MIN_LOAN_AMOUNT: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);
/// Largest advertised principal.
pub const MAX_LOAN_AMOUNT: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);
/// Shortest advertised term.
pub const MIN_MONTHS: i32 = 6;
/// Longest advertised term.
pub const MAX_MONTHS: i32 = 60;

/// Balances of the loan that blocks a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentLoanBrief {
    /// Principal.
    pub amount: Decimal,
    /// Principal not yet consumed.
    pub available_amount: Decimal,
    /// Amount still owed.
    pub remaining_balance: Decimal,
}

/// Terms offered to an eligible borrower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanOffer {
    /// Rate the borrower would be charged.
    pub interest_rate: Decimal,
    /// Whether that rate is a personal override.
    pub is_custom_rate: bool,
    /// Largest principal.
    pub max_loan_amount: Decimal,
    /// Smallest principal.
    pub min_loan_amount: Decimal,
    /// Longest term.
    pub max_months: i32,
    /// Shortest term.
    pub min_months: i32,
}

/// Eligibility verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanEligibility {
    /// Whether a loan may be taken now.
    pub eligible: bool,
    /// Why not.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
    /// What to do about it.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub next_steps: Vec<String>,
    /// The loan that blocks a new one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_loan: Option<CurrentLoanBrief>,
    /// Offered terms.
    #[serde(flatten)]
    pub offer: Option<LoanOffer>,
}

impl LoanEligibility {
    /// Evaluates whether `borrower` may take a loan.
    ///
    /// Account readiness is checked first, then the active loan, and only
    /// then are terms offered.
    #[must_use]
    pub fn evaluate(
        borrower: &Borrower,
        active_loan: Option<&LoanAccount>,
        latest_global_rate: Option<Decimal>,
    ) -> Self {
        if !borrower.email_verified || !borrower.profile_completed {
            let mut reasons = Vec::new();
            let mut next_steps = Vec::new();
            if !borrower.email_verified {
                reasons.push("Email not verified".to_string());
                next_steps.push("Verify your email address".to_string());
            }
            if !borrower.profile_completed {
                reasons.push("Profile not completed".to_string());
                next_steps.push("Complete your profile information".to_string());
            }
            return Self {
                eligible: false,
                reasons,
                next_steps,
                current_loan: None,
                offer: None,
            };
        }

        if let Some(loan) = active_loan.filter(|loan| !loan.is_completed()) {
            return Self {
                eligible: false,
                reasons: vec!["You already have an active loan".to_string()],
                next_steps: Vec::new(),
                current_loan: Some(CurrentLoanBrief {
                    amount: loan.amount,
                    available_amount: loan.available_amount,
                    remaining_balance: loan.remaining_balance,
                }),
                offer: None,
            };
        }

        let resolved = InterestPolicy::resolve_rate(borrower.interest_rate, latest_global_rate);
        Self {
            eligible: true,
            reasons: Vec::new(),
            next_steps: Vec::new(),
            current_loan: None,
            offer: Some(LoanOffer {
                interest_rate: resolved.rate,
                is_custom_rate: resolved.is_custom(),
                max_loan_amount: MAX_LOAN_AMOUNT,
                min_loan_amount: MIN_LOAN_AMOUNT,
                max_months: MAX_MONTHS,
                min_months: MIN_MONTHS,
            }),
        }
    }
}
