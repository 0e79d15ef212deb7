//! `SeaORM` entity prelude.

pub use super::installments::Entity as Installments;
pub use super::interest_rates::Entity as InterestRates;
pub use super::loan_requests::Entity as LoanRequests;
pub use super::loans::Entity as Loans;
pub use super::repayment_slips::Entity as RepaymentSlips;
pub use super::users::Entity as Users;
