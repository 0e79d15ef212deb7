//! Conversions between stored rows and domain records.

use chrono::{DateTime, Utc};
use loandesk_core::Borrower;
use loandesk_core::interest::GlobalRate;
use loandesk_core::loan::{LoanAccount, LoanStatus, RepaymentSlip};
use loandesk_core::request::{
    Installment, InstallmentStatus, LoanRequest, LoanRequestStatus, TenureType,
};
use loandesk_shared::Role;
use loandesk_shared::types::{InstallmentId, LoanId, LoanRequestId, RepaymentSlipId, UserId};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::entities::{
    installments, interest_rates, loan_requests, loans, repayment_slips, sea_orm_active_enums,
    users,
};

fn utc(ts: DateTimeWithTimeZone) -> DateTime<Utc> {
    ts.with_timezone(&Utc)
}

impl From<sea_orm_active_enums::LoanStatus> for LoanStatus {
    fn from(status: sea_orm_active_enums::LoanStatus) -> Self {
        match status {
            sea_orm_active_enums::LoanStatus::Active => Self::Active,
            sea_orm_active_enums::LoanStatus::Completed => Self::Completed,
        }
    }
}

impl From<LoanStatus> for sea_orm_active_enums::LoanStatus {
    fn from(status: LoanStatus) -> Self {
        match status {
            LoanStatus::Active => Self::Active,
            LoanStatus::Completed => Self::Completed,
        }
    }
}

impl From<sea_orm_active_enums::LoanRequestStatus> for LoanRequestStatus {
    fn from(status: sea_orm_active_enums::LoanRequestStatus) -> Self {
        match status {
            sea_orm_active_enums::LoanRequestStatus::Pending => Self::Pending,
            sea_orm_active_enums::LoanRequestStatus::Approved => Self::Approved,
            sea_orm_active_enums::LoanRequestStatus::Rejected => Self::Rejected,
            sea_orm_active_enums::LoanRequestStatus::Completed => Self::Completed,
        }
    }
}

impl From<LoanRequestStatus> for sea_orm_active_enums::LoanRequestStatus {
    fn from(status: LoanRequestStatus) -> Self {
        match status {
            LoanRequestStatus::Pending => Self::Pending,
            LoanRequestStatus::Approved => Self::Approved,
            LoanRequestStatus::Rejected => Self::Rejected,
            LoanRequestStatus::Completed => Self::Completed,
        }
    }
}

impl From<sea_orm_active_enums::TenureType> for TenureType {
    fn from(tenure: sea_orm_active_enums::TenureType) -> Self {
        match tenure {
            sea_orm_active_enums::TenureType::Days => Self::Days,
            sea_orm_active_enums::TenureType::Months => Self::Months,
            sea_orm_active_enums::TenureType::Years => Self::Years,
        }
    }
}

impl From<TenureType> for sea_orm_active_enums::TenureType {
    fn from(tenure: TenureType) -> Self {
        match tenure {
            TenureType::Days => Self::Days,
            TenureType::Months => Self::Months,
            TenureType::Years => Self::Years,
        }
    }
}

impl From<sea_orm_active_enums::InstallmentStatus> for InstallmentStatus {
    fn from(status: sea_orm_active_enums::InstallmentStatus) -> Self {
        match status {
            sea_orm_active_enums::InstallmentStatus::Pending => Self::Pending,
            sea_orm_active_enums::InstallmentStatus::Paid => Self::Paid,
        }
    }
}

impl From<InstallmentStatus> for sea_orm_active_enums::InstallmentStatus {
    fn from(status: InstallmentStatus) -> Self {
        match status {
            InstallmentStatus::Pending => Self::Pending,
            InstallmentStatus::Paid => Self::Paid,
        }
    }
}

impl From<sea_orm_active_enums::UserRole> for Role {
    fn from(role: sea_orm_active_enums::UserRole) -> Self {
        match role {
            sea_orm_active_enums::UserRole::User => Self::User,
            sea_orm_active_enums::UserRole::Admin => Self::Admin,
        }
    }
}

impl From<Role> for sea_orm_active_enums::UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Self::User,
            Role::Admin => Self::Admin,
        }
    }
}

impl From<users::Model> for Borrower {
    fn from(user: users::Model) -> Self {
        Self {
            id: UserId::from_uuid(user.id),
            email: user.email,
            full_name: user.full_name,
            email_verified: user.email_verified,
            profile_completed: user.profile_completed,
            loan_limit: user.loan_limit,
            interest_rate: user.interest_rate,
        }
    }
}

impl From<interest_rates::Model> for GlobalRate {
    fn from(row: interest_rates::Model) -> Self {
        Self {
            rate: row.rate,
            effective_date: utc(row.effective_date),
        }
    }
}

impl From<loans::Model> for LoanAccount {
    fn from(row: loans::Model) -> Self {
        Self {
            id: LoanId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            amount: row.amount,
            available_amount: row.available_amount,
            total_months: row.total_months,
            paid_months: row.paid_months,
            interest_rate: row.interest_rate,
            total_payable: row.total_payable,
            remaining_balance: row.remaining_balance,
            total_amount_paid: row.total_amount_paid,
            status: row.status.into(),
            start_date: utc(row.start_date),
            completion_date: row.completion_date.map(utc),
        }
    }
}

impl From<repayment_slips::Model> for RepaymentSlip {
    fn from(row: repayment_slips::Model) -> Self {
        Self {
            id: RepaymentSlipId::from_uuid(row.id),
            loan_id: LoanId::from_uuid(row.loan_id),
            user_id: UserId::from_uuid(row.user_id),
            amount: row.amount,
            slip_url: row.slip_url,
            uploaded_at: utc(row.uploaded_at),
        }
    }
}

impl From<loan_requests::Model> for LoanRequest {
    fn from(row: loan_requests::Model) -> Self {
        Self {
            id: LoanRequestId::from_uuid(row.id),
            request_id: row.request_id,
            user_id: UserId::from_uuid(row.user_id),
            requested_amount: row.requested_amount,
            interest_rate: row.interest_rate,
            tenure_type: row.tenure_type.into(),
            tenure_value: row.tenure_value,
            total_payable_amount: row.total_payable_amount,
            total_paid_amount: row.total_paid_amount,
            remaining_balance: row.remaining_balance,
            available_amount: row.available_amount,
            status: row.status.into(),
            approved_at: row.approved_at.map(utc),
            rejected_at: row.rejected_at.map(utc),
            completed_at: row.completed_at.map(utc),
            created_at: utc(row.created_at),
        }
    }
}

impl From<installments::Model> for Installment {
    fn from(row: installments::Model) -> Self {
        Self {
            id: InstallmentId::from_uuid(row.id),
            loan_request_id: LoanRequestId::from_uuid(row.loan_request_id),
            user_id: UserId::from_uuid(row.user_id),
            sequence: row.sequence,
            amount: row.amount,
            due_date: utc(row.due_date),
            status: row.status.into(),
            paid_at: row.paid_at.map(utc),
        }
    }
}

/// Builds a fresh row for a newly opened loan.
pub(crate) fn new_loan_row(loan: &LoanAccount, now: DateTime<Utc>) -> loans::ActiveModel {
    use sea_orm::Set;

    loans::ActiveModel {
        id: Set(loan.id.into_inner()),
        user_id: Set(loan.user_id.into_inner()),
        amount: Set(loan.amount),
        available_amount: Set(loan.available_amount),
        total_months: Set(loan.total_months),
        paid_months: Set(loan.paid_months),
        interest_rate: Set(loan.interest_rate),
        total_payable: Set(loan.total_payable),
        remaining_balance: Set(loan.remaining_balance),
        total_amount_paid: Set(loan.total_amount_paid),
        status: Set(loan.status.into()),
        start_date: Set(loan.start_date.into()),
        completion_date: Set(loan.completion_date.map(Into::into)),
        version: Set(0),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
}

/// Builds a fresh row for a newly submitted request.
pub(crate) fn new_request_row(request: &LoanRequest) -> loan_requests::ActiveModel {
    use sea_orm::Set;

    loan_requests::ActiveModel {
        id: Set(request.id.into_inner()),
        request_id: Set(request.request_id.clone()),
        user_id: Set(request.user_id.into_inner()),
        requested_amount: Set(request.requested_amount),
        interest_rate: Set(request.interest_rate),
        tenure_type: Set(request.tenure_type.into()),
        tenure_value: Set(request.tenure_value),
        total_payable_amount: Set(request.total_payable_amount),
        total_paid_amount: Set(request.total_paid_amount),
        remaining_balance: Set(request.remaining_balance),
        available_amount: Set(request.available_amount),
        status: Set(request.status.into()),
        approved_at: Set(request.approved_at.map(Into::into)),
        rejected_at: Set(request.rejected_at.map(Into::into)),
        completed_at: Set(request.completed_at.map(Into::into)),
        version: Set(0),
        created_at: Set(request.created_at.into()),
        updated_at: Set(request.created_at.into()),
    }
}

/// Builds a fresh row for a scheduled installment.
pub(crate) fn new_installment_row(
    installment: &Installment,
    now: DateTime<Utc>,
) -> installments::ActiveModel {
    use sea_orm::Set;

    installments::ActiveModel {
        id: Set(installment.id.into_inner()),
        loan_request_id: Set(installment.loan_request_id.into_inner()),
        user_id: Set(installment.user_id.into_inner()),
        sequence: Set(installment.sequence),
        amount: Set(installment.amount),
        due_date: Set(installment.due_date.into()),
        status: Set(installment.status.into()),
        paid_at: Set(installment.paid_at.map(Into::into)),
        created_at: Set(now.into()),
    }
}
