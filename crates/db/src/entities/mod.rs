//! `SeaORM` entities.

pub mod prelude;

pub mod installments;
pub mod interest_rates;
pub mod loan_requests;
pub mod loans;
pub mod repayment_slips;
pub mod sea_orm_active_enums;
pub mod users;
