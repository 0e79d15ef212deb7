//! Initial database migration.
//!
//! Creates the enums, tables and indexes for users, loans, loan requests,
//! installments, repayment slips and the global interest-rate log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS & INTEREST RATES
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(INTEREST_RATES_SQL).await?;

        // ============================================================
        // PART 3: LOAN ACCOUNTS
        // ============================================================
        db.execute_unprepared(LOANS_SQL).await?;
        db.execute_unprepared(REPAYMENT_SLIPS_SQL).await?;

        // ============================================================
        // PART 4: LOAN REQUESTS
        // ============================================================
        db.execute_unprepared(LOAN_REQUESTS_SQL).await?;
        db.execute_unprepared(INSTALLMENTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM ('user', 'admin');

CREATE TYPE loan_status AS ENUM ('active', 'completed');

CREATE TYPE loan_request_status AS ENUM ('pending', 'approved', 'rejected', 'completed');

CREATE TYPE tenure_type AS ENUM ('days', 'months', 'years');

CREATE TYPE installment_status AS ENUM ('pending', 'paid');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    full_name VARCHAR(255),
    role user_role NOT NULL DEFAULT 'user',
    email_verified BOOLEAN NOT NULL DEFAULT false,
    profile_completed BOOLEAN NOT NULL DEFAULT false,
    loan_limit NUMERIC NOT NULL DEFAULT 5000,
    interest_rate NUMERIC,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_users_loan_limit CHECK (loan_limit >= 0),
    CONSTRAINT chk_users_interest_rate CHECK (interest_rate IS NULL OR (interest_rate > 0 AND interest_rate <= 100))
);

CREATE INDEX idx_users_role ON users(role);
";

const INTEREST_RATES_SQL: &str = r"
-- Append-only log; the newest row is the current global rate
CREATE TABLE interest_rates (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    rate NUMERIC NOT NULL,
    effective_date TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_interest_rates_range CHECK (rate > 0 AND rate <= 100)
);

CREATE INDEX idx_interest_rates_effective ON interest_rates(effective_date DESC, id DESC);
";

// Money columns are unconstrained NUMERIC: loan arithmetic is exact and
// must round-trip without rescaling.
const LOANS_SQL: &str = r"
CREATE TABLE loans (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    amount NUMERIC NOT NULL,
    available_amount NUMERIC NOT NULL,
    total_months INTEGER NOT NULL,
    paid_months INTEGER NOT NULL DEFAULT 0,
    interest_rate NUMERIC NOT NULL,
    total_payable NUMERIC NOT NULL,
    remaining_balance NUMERIC NOT NULL,
    total_amount_paid NUMERIC NOT NULL DEFAULT 0,
    status loan_status NOT NULL DEFAULT 'active',
    start_date TIMESTAMPTZ NOT NULL,
    completion_date TIMESTAMPTZ,
    version INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_loans_amount CHECK (amount > 0),
    CONSTRAINT chk_loans_term CHECK (total_months > 0),
    CONSTRAINT chk_loans_paid_months CHECK (paid_months >= 0 AND paid_months <= total_months),
    CONSTRAINT chk_loans_balances CHECK (remaining_balance >= 0 AND available_amount >= 0),
    CONSTRAINT chk_loans_completion CHECK (
        (status = 'active' AND completion_date IS NULL)
        OR (status = 'completed' AND completion_date IS NOT NULL AND remaining_balance = 0)
    )
);

-- One active loan per user
CREATE UNIQUE INDEX uq_loans_one_active_per_user ON loans(user_id) WHERE status = 'active';

CREATE INDEX idx_loans_user ON loans(user_id, created_at DESC);
CREATE INDEX idx_loans_status ON loans(status, created_at DESC);
";

const REPAYMENT_SLIPS_SQL: &str = r"
CREATE TABLE repayment_slips (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    loan_id UUID NOT NULL REFERENCES loans(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    amount NUMERIC NOT NULL,
    slip_url TEXT NOT NULL,
    uploaded_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_repayment_slips_amount CHECK (amount > 0),
    CONSTRAINT chk_repayment_slips_url CHECK (length(trim(slip_url)) > 0)
);

CREATE INDEX idx_repayment_slips_loan ON repayment_slips(loan_id, uploaded_at DESC);
CREATE INDEX idx_repayment_slips_user ON repayment_slips(user_id, uploaded_at DESC);
";

const LOAN_REQUESTS_SQL: &str = r"
CREATE TABLE loan_requests (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    request_id VARCHAR(6) NOT NULL,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    requested_amount NUMERIC NOT NULL,
    interest_rate NUMERIC NOT NULL,
    tenure_type tenure_type NOT NULL,
    tenure_value INTEGER NOT NULL,
    total_payable_amount NUMERIC(20, 2) NOT NULL,
    total_paid_amount NUMERIC(20, 2) NOT NULL DEFAULT 0,
    remaining_balance NUMERIC(20, 2) NOT NULL,
    available_amount NUMERIC NOT NULL,
    status loan_request_status NOT NULL DEFAULT 'pending',
    approved_at TIMESTAMPTZ,
    rejected_at TIMESTAMPTZ,
    completed_at TIMESTAMPTZ,
    version INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_loan_requests_amount CHECK (requested_amount > 0),
    CONSTRAINT chk_loan_requests_tenure CHECK (tenure_value BETWEEN 1 AND 360),
    CONSTRAINT chk_loan_requests_balance CHECK (remaining_balance >= 0)
);

CREATE UNIQUE INDEX uq_loan_requests_request_id ON loan_requests(request_id);

-- At most one pending or approved request per user
CREATE UNIQUE INDEX uq_loan_requests_one_open_per_user ON loan_requests(user_id)
    WHERE status IN ('pending', 'approved');

CREATE INDEX idx_loan_requests_user ON loan_requests(user_id, created_at DESC);
CREATE INDEX idx_loan_requests_created ON loan_requests(created_at DESC);
";

const INSTALLMENTS_SQL: &str = r"
CREATE TABLE installments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    loan_request_id UUID NOT NULL REFERENCES loan_requests(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    sequence INTEGER NOT NULL,
    amount NUMERIC(20, 2) NOT NULL,
    due_date TIMESTAMPTZ NOT NULL,
    status installment_status NOT NULL DEFAULT 'pending',
    paid_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_installments_sequence UNIQUE (loan_request_id, sequence),
    CONSTRAINT chk_installments_paid CHECK ((status = 'paid') = (paid_at IS NOT NULL))
);

CREATE INDEX idx_installments_request ON installments(loan_request_id, due_date);
CREATE INDEX idx_installments_pending ON installments(loan_request_id) WHERE status = 'pending';
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS installments CASCADE;
DROP TABLE IF EXISTS loan_requests CASCADE;
DROP TABLE IF EXISTS repayment_slips CASCADE;
DROP TABLE IF EXISTS loans CASCADE;
DROP TABLE IF EXISTS interest_rates CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS installment_status CASCADE;
DROP TYPE IF EXISTS tenure_type CASCADE;
DROP TYPE IF EXISTS loan_request_status CASCADE;
DROP TYPE IF EXISTS loan_status CASCADE;
DROP TYPE IF EXISTS user_role CASCADE;
";
