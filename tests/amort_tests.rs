// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use loanbook::amort::{self, AmortError};
use loanbook::models::LoanRecord;
use rust_decimal::Decimal;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn loan(principal: &str, rate: &str, start: &str, end: &str) -> LoanRecord {
    let sched = amort::compute_schedule(dec(principal), dec(rate), date(start), date(end)).unwrap();
    LoanRecord {
        id: 1,
        owner: "default".into(),
        name: "Test loan".into(),
        principal: dec(principal),
        annual_rate_percent: dec(rate),
        start_date: date(start),
        end_date: date(end),
        duration_in_months: sched.duration_in_months,
        installment_amount: sched.installment_amount,
        total_payable: sched.total_payable,
        remaining_amount: sched.total_payable,
        paid_installments: Vec::new(),
        revision: 0,
    }
}

#[test]
fn duration_rounds_thirty_day_chunks_up() {
    let d = |e: &str| amort::duration_in_months(date("2025-01-01"), date(e)).unwrap();
    assert_eq!(d("2025-01-02"), 1); // 1 day
    assert_eq!(d("2025-01-31"), 1); // 30 days
    assert_eq!(d("2025-02-01"), 2); // 31 days
    assert_eq!(d("2025-12-27"), 12); // 360 days
    assert_eq!(d("2025-12-28"), 13); // 361 days
}

#[test]
fn duration_rejects_reversed_or_equal_dates() {
    assert!(matches!(
        amort::duration_in_months(date("2025-01-01"), date("2025-01-01")),
        Err(AmortError::InvalidLoanTerms(_))
    ));
    assert!(matches!(
        amort::duration_in_months(date("2025-01-01"), date("2024-12-31")),
        Err(AmortError::InvalidLoanTerms(_))
    ));
}

#[test]
fn quote_matches_standard_one_year_emi() {
    let q = amort::quote(dec("100000"), dec("10"), 12).unwrap();
    assert_eq!(format!("{:.2}", q.monthly_emi.round_dp(2)), "8791.59");
    assert_eq!(format!("{:.2}", q.total_interest.round_dp(2)), "5499.06");
    assert_eq!(format!("{:.2}", q.total_payable.round_dp(2)), "105499.06");
}

#[test]
fn quote_zero_rate_splits_principal_evenly() {
    let q = amort::quote(dec("1200"), dec("0"), 12).unwrap();
    assert_eq!(q.monthly_emi, dec("100"));
    assert_eq!(q.total_payable, dec("1200"));
    assert!(q.total_interest.is_zero());
}

#[test]
fn quote_rejects_bad_terms() {
    assert!(matches!(
        amort::quote(dec("0"), dec("10"), 12),
        Err(AmortError::InvalidLoanTerms(_))
    ));
    assert!(matches!(
        amort::quote(dec("-5"), dec("10"), 12),
        Err(AmortError::InvalidLoanTerms(_))
    ));
    assert!(matches!(
        amort::quote(dec("1000"), dec("-1"), 12),
        Err(AmortError::InvalidLoanTerms(_))
    ));
    assert!(matches!(
        amort::quote(dec("1000"), dec("10"), 0),
        Err(AmortError::InvalidLoanTerms(_))
    ));
}

#[test]
fn quote_rejects_an_unrepresentable_total() {
    // The EMI fits in a Decimal but EMI * 12 does not
    assert!(matches!(
        amort::quote(dec("70000000000000000000000000000"), dec("30"), 12),
        Err(AmortError::InvalidLoanTerms(_))
    ));
}

#[test]
fn schedule_rejects_invalid_terms() {
    let ok_start = date("2025-01-01");
    let ok_end = date("2025-12-27");
    assert!(amort::compute_schedule(dec("0"), dec("10"), ok_start, ok_end).is_err());
    assert!(amort::compute_schedule(dec("100000"), dec("-2"), ok_start, ok_end).is_err());
    assert!(amort::compute_schedule(dec("100000"), dec("10"), ok_start, ok_start).is_err());
}

#[test]
fn paying_every_installment_reaches_exactly_zero() {
    let mut l = loan("100000", "10", "2025-01-01", "2025-12-27");
    assert_eq!(l.duration_in_months, 12);
    assert_eq!(format!("{:.2}", l.installment_amount.round_dp(2)), "8791.59");

    let mut prev = l.remaining_amount;
    for _ in 0..12 {
        l = amort::record_installment_paid(&l, date("2025-06-01")).unwrap();
        assert!(l.remaining_amount <= prev);
        assert!(l.remaining_amount >= Decimal::ZERO);
        prev = l.remaining_amount;
    }
    assert!(l.remaining_amount.is_zero());
    assert_eq!(l.paid_installments.len(), 12);
    assert_eq!(amort::next_due_date(&l), None);

    let err = amort::record_installment_paid(&l, date("2026-01-01")).unwrap_err();
    assert!(matches!(err, AmortError::AlreadySettled));
}

#[test]
fn settled_loan_rejects_payment() {
    let mut l = loan("1200", "0", "2025-01-01", "2025-12-27");
    l.remaining_amount = Decimal::ZERO;
    assert!(matches!(
        amort::record_installment_paid(&l, date("2025-02-01")),
        Err(AmortError::AlreadySettled)
    ));
}

#[test]
fn final_payment_clamps_remaining_at_zero() {
    let mut l = loan("1200", "0", "2025-01-01", "2025-12-27");
    l.remaining_amount = dec("50"); // less than one EMI
    let paid = amort::record_installment_paid(&l, date("2025-02-01")).unwrap();
    assert!(paid.remaining_amount.is_zero());
}

#[test]
fn uneven_zero_rate_split_still_settles_at_exactly_zero() {
    // 100000 / 3 does not divide evenly at any Decimal scale
    let mut l = loan("100000", "0", "2025-01-01", "2025-04-01");
    assert_eq!(l.duration_in_months, 3);

    for d in ["2025-02-01", "2025-03-01", "2025-04-01"] {
        l = amort::record_installment_paid(&l, date(d)).unwrap();
    }
    assert_eq!(l.remaining_amount, Decimal::ZERO);
    assert_eq!(amort::progress_ratio(&l), Decimal::ONE);

    let plan = amort::payment_plan(&l);
    assert!(plan[2].remaining_after.is_zero());
}

#[test]
fn payment_records_its_date() {
    let l = loan("1200", "0", "2025-01-01", "2025-12-27");
    let paid = amort::record_installment_paid(&l, date("2025-02-03")).unwrap();
    assert_eq!(paid.paid_installments, vec![date("2025-02-03")]);
    assert_eq!(paid.remaining_amount, dec("1100"));
}

#[test]
fn next_due_steps_one_month_per_payment() {
    let mut l = loan("1200", "0", "2025-01-15", "2026-01-10");
    assert_eq!(l.duration_in_months, 12);
    assert_eq!(amort::next_due_date(&l), Some(date("2025-02-15")));
    l = amort::record_installment_paid(&l, date("2025-02-15")).unwrap();
    assert_eq!(amort::next_due_date(&l), Some(date("2025-03-15")));
}

#[test]
fn next_due_clamps_at_short_month_ends() {
    let l = loan("1200", "0", "2025-01-31", "2025-12-27");
    assert_eq!(amort::next_due_date(&l), Some(date("2025-02-28")));
}

#[test]
fn progress_after_three_of_ten_zero_rate_payments() {
    let mut l = loan("50000", "0", "2025-01-01", "2025-10-28");
    assert_eq!(l.duration_in_months, 10);
    assert_eq!(l.installment_amount, dec("5000"));
    assert_eq!(amort::progress_ratio(&l), Decimal::ZERO);

    for d in ["2025-02-01", "2025-03-01", "2025-04-01"] {
        l = amort::record_installment_paid(&l, date(d)).unwrap();
    }
    assert_eq!(l.remaining_amount, dec("35000"));
    assert_eq!(amort::progress_ratio(&l), dec("0.3"));
}

#[test]
fn progress_reaches_one_and_stays_clamped() {
    let mut l = loan("50000", "0", "2025-01-01", "2025-10-28");
    for _ in 0..10 {
        l = amort::record_installment_paid(&l, date("2025-06-01")).unwrap();
    }
    assert_eq!(amort::progress_ratio(&l), Decimal::ONE);
}

#[test]
fn progress_is_zero_without_a_total() {
    let mut l = loan("1200", "0", "2025-01-01", "2025-12-27");
    l.total_payable = Decimal::ZERO;
    l.remaining_amount = Decimal::ZERO;
    assert_eq!(amort::progress_ratio(&l), Decimal::ZERO);
}

#[test]
fn payment_plan_lists_every_installment() {
    let mut l = loan("1200", "0", "2025-01-01", "2025-12-27");
    l = amort::record_installment_paid(&l, date("2025-02-01")).unwrap();
    l = amort::record_installment_paid(&l, date("2025-03-01")).unwrap();

    let plan = amort::payment_plan(&l);
    assert_eq!(plan.len(), 12);
    assert_eq!(plan[0].sequence, 1);
    assert_eq!(plan[0].due_on, date("2025-02-01"));
    assert_eq!(plan[0].amount, dec("100"));
    assert_eq!(plan[0].remaining_after, dec("1100"));
    assert!(plan[0].paid);
    assert!(plan[1].paid);
    assert!(!plan[2].paid);
    assert_eq!(plan[11].due_on, date("2026-01-01"));
    assert!(plan[11].remaining_after.is_zero());
}
