// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use thiserror::Error;

use crate::models::LoanRecord;

#[derive(Debug, Error)]
pub enum AmortError {
    #[error("invalid loan terms: {0}")]
    InvalidLoanTerms(String),
    #[error("loan is already settled")]
    AlreadySettled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub installment_amount: Decimal,
    pub duration_in_months: u32,
    pub total_payable: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmiQuote {
    pub monthly_emi: Decimal,
    pub total_payable: Decimal,
    pub total_interest: Decimal,
}

/// One row of a loan's payment plan; `sequence` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedInstallment {
    pub sequence: u32,
    pub due_on: NaiveDate,
    pub amount: Decimal,
    pub remaining_after: Decimal,
    pub paid: bool,
}

/// Tenure in months between two dates: a month is 30 days, rounded up.
/// Stored durations of existing loans depend on this exact rule; do not swap
/// in calendar-month arithmetic.
pub fn duration_in_months(start: NaiveDate, end: NaiveDate) -> Result<u32, AmortError> {
    let days = (end - start).num_days();
    if days <= 0 {
        return Err(AmortError::InvalidLoanTerms(
            "end date must be after start date".to_string(),
        ));
    }
    Ok(((days + 29) / 30) as u32)
}

pub fn compute_schedule(
    principal: Decimal,
    annual_rate_percent: Decimal,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Schedule, AmortError> {
    let months = duration_in_months(start, end)?;
    let (emi, total) = installment(principal, annual_rate_percent, months)?;
    Ok(Schedule {
        installment_amount: emi,
        duration_in_months: months,
        total_payable: total,
    })
}

pub fn quote(
    principal: Decimal,
    annual_rate_percent: Decimal,
    months: u32,
) -> Result<EmiQuote, AmortError> {
    let (emi, total) = installment(principal, annual_rate_percent, months)?;
    let interest = (total - principal).max(Decimal::ZERO);
    Ok(EmiQuote {
        monthly_emi: emi,
        total_payable: total,
        total_interest: interest,
    })
}

fn installment(
    principal: Decimal,
    annual_rate_percent: Decimal,
    months: u32,
) -> Result<(Decimal, Decimal), AmortError> {
    if principal <= Decimal::ZERO {
        return Err(AmortError::InvalidLoanTerms(
            "principal must be positive".to_string(),
        ));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(AmortError::InvalidLoanTerms(
            "interest rate must not be negative".to_string(),
        ));
    }
    if months == 0 {
        return Err(AmortError::InvalidLoanTerms(
            "tenure must be at least one month".to_string(),
        ));
    }
    let n = Decimal::from(months);

    // Interest-free loans repay the principal in equal exact slices
    if annual_rate_percent.is_zero() {
        let emi = principal / n;
        let total = emi
            .checked_mul(n)
            .ok_or_else(|| AmortError::InvalidLoanTerms("total payable out of range".to_string()))?;
        return Ok((emi, total));
    }

    // Closed form in f64, Decimal from here on; every later subtraction uses
    // the same Decimal installment so a fully paid loan lands on exactly zero
    let principal_f = principal
        .to_f64()
        .filter(|p| p.is_finite())
        .ok_or_else(|| AmortError::InvalidLoanTerms("principal out of range".to_string()))?;
    let monthly_rate = annual_rate_percent
        .to_f64()
        .map(|r| r / 100.0 / 12.0)
        .filter(|r| r.is_finite())
        .ok_or_else(|| AmortError::InvalidLoanTerms("interest rate out of range".to_string()))?;
    let raw = principal_f * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-f64::from(months)));
    let emi = Decimal::from_f64(raw).ok_or_else(|| {
        AmortError::InvalidLoanTerms("installment does not evaluate to a finite amount".to_string())
    })?;
    let total = emi
        .checked_mul(n)
        .ok_or_else(|| AmortError::InvalidLoanTerms("total payable out of range".to_string()))?;
    Ok((emi, total))
}

/// Apply one payment dated `on`, or fail with `AlreadySettled` leaving the
/// input untouched. The remaining amount never goes below zero and lands on
/// exactly zero with the final installment.
pub fn record_installment_paid(loan: &LoanRecord, on: NaiveDate) -> Result<LoanRecord, AmortError> {
    if is_settled(loan) {
        return Err(AmortError::AlreadySettled);
    }
    let mut updated = loan.clone();
    updated.paid_installments.push(on);
    // The final installment clears the loan outright; an uneven principal / n
    // split would otherwise strand rounding residue in the stored amount
    let paid = updated.paid_installments.len() as u32;
    updated.remaining_amount = if paid >= loan.duration_in_months {
        Decimal::ZERO
    } else {
        (loan.remaining_amount - loan.installment_amount).max(Decimal::ZERO)
    };
    Ok(updated)
}

pub fn is_settled(loan: &LoanRecord) -> bool {
    loan.paid_installments.len() as u32 >= loan.duration_in_months
        || loan.remaining_amount <= Decimal::ZERO
}

/// Due date of the next unpaid installment, `None` once all are paid.
/// Installment k falls due k months after the start date.
pub fn next_due_date(loan: &LoanRecord) -> Option<NaiveDate> {
    let paid = loan.paid_installments.len() as u32;
    if paid >= loan.duration_in_months {
        return None;
    }
    Some(add_months(loan.start_date, paid + 1))
}

/// Fraction of the total payable already repaid, clamped to `[0, 1]`;
/// zero when the total payable is zero.
pub fn progress_ratio(loan: &LoanRecord) -> Decimal {
    if loan.total_payable <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let ratio = Decimal::ONE - loan.remaining_amount / loan.total_payable;
    ratio.clamp(Decimal::ZERO, Decimal::ONE)
}

pub fn payment_plan(loan: &LoanRecord) -> Vec<PlannedInstallment> {
    let paid = loan.paid_installments.len() as u32;
    let mut remaining = loan.total_payable;
    let mut out = Vec::with_capacity(loan.duration_in_months as usize);
    for k in 1..=loan.duration_in_months {
        remaining = if k == loan.duration_in_months {
            Decimal::ZERO
        } else {
            (remaining - loan.installment_amount).max(Decimal::ZERO)
        };
        out.push(PlannedInstallment {
            sequence: k,
            due_on: add_months(loan.start_date, k),
            amount: loan.installment_amount,
            remaining_after: remaining,
            paid: k <= paid,
        });
    }
    out
}

fn add_months(d: NaiveDate, months: u32) -> NaiveDate {
    d.checked_add_months(Months::new(months)).unwrap_or(NaiveDate::MAX)
}
