//! Installment schedule generation.
//!
//! The total is split into `n` installments: each of the first `n - 1` is
//! `total / n` truncated to cents and the last one absorbs the remainder,
//! so the schedule always sums exactly to the total.

use chrono::{DateTime, Duration, Months, Utc};
use loandesk_shared::types::{MONEY_SCALE, round_money};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::request::error::LoanRequestError;
use crate::request::types::TenureType;

/// One generated schedule row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleEntry {
    /// Zero-based position.
    pub sequence: i32,
    /// Amount due.
    pub amount: Decimal,
    /// Due date.
    pub due_date: DateTime<Utc>,
}

/// Installment schedule rules.
pub struct InstallmentSchedule;

impl InstallmentSchedule {
    /// Due date of installment `index`: `start + index` tenure units.
    ///
    /// Months and years respect calendar lengths (a 31 Jan start falls due on
    /// the last day of February). Returns `None` past the calendar range.
    #[must_use]
    pub fn due_date(start: DateTime<Utc>, index: u32, tenure_type: TenureType) -> Option<DateTime<Utc>> {
        match tenure_type {
            TenureType::Days => start.checked_add_signed(Duration::days(i64::from(index))),
            TenureType::Months => start.checked_add_months(Months::new(index)),
            TenureType::Years => start.checked_add_months(Months::new(index.checked_mul(12)?)),
        }
    }

    /// Splits `total` into `count` amounts summing exactly to `round_money(total)`.
    #[must_use]
    pub fn split(total: Decimal, count: u32) -> Vec<Decimal> {
        if count == 0 {
            return Vec::new();
        }

        let total = round_money(total);
        let n = Decimal::from(count);
        let base = (total / n).round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToZero);
        let last = total - base * Decimal::from(count - 1);

        let mut amounts = vec![base; count as usize];
        if let Some(tail) = amounts.last_mut() {
            *tail = last;
        }
        amounts
    }

    /// Generates the full schedule for a request.
    ///
    /// # Errors
    ///
    /// - `InvalidTenure` for a non-positive tenure
    /// - `ScheduleOutOfRange` when a due date falls outside the calendar
    pub fn generate(
        total: Decimal,
        tenure_type: TenureType,
        tenure_value: i32,
        start: DateTime<Utc>,
    ) -> Result<Vec<ScheduleEntry>, LoanRequestError> {
        let count = u32::try_from(tenure_value)
            .ok()
            .filter(|c| *c > 0)
            .ok_or(LoanRequestError::InvalidTenure {
                max: crate::request::MAX_TENURE_VALUE,
            })?;

        Self::split(total, count)
            .into_iter()
            .zip(0..count)
            .map(|(amount, index)| {
                let due_date = Self::due_date(start, index, tenure_type)
                    .ok_or(LoanRequestError::ScheduleOutOfRange)?;
                Ok(ScheduleEntry {
                    sequence: i32::try_from(index).map_err(|_| LoanRequestError::ScheduleOutOfRange)?,
                    amount,
                    due_date,
                })
            })
            .collect()
    }
}
