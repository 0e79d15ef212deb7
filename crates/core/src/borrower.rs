//! Borrower facts consulted by the loan rules.

use loandesk_shared::types::UserId;
use rust_decimal::Decimal;

/// Default credit limit for new borrowers.
pub const DEFAULT_LOAN_LIMIT: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// A borrower as the loan rules see them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Borrower {
    /// User ID.
    pub id: UserId,
    /// Contact address.
    pub email: String,
    /// Display name, if the profile has one.
    pub full_name: Option<String>,
    /// Whether the email address is verified.
    pub email_verified: bool,
    /// Whether the profile is complete.
    pub profile_completed: bool,
    /// Largest amount the borrower may request.
    pub loan_limit: Decimal,
    /// Personal interest-rate override.
    pub interest_rate: Option<Decimal>,
}

impl Borrower {
    /// Name to greet the borrower with; falls back to the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}
