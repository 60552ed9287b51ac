// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AllotmentInputs, AllotmentPolicy, BalanceResolution, HalfDays, LeaveBalance, LeaveType,
    StandardAllotment, check_no_pay, resolve_balance,
};
use time::{Date, Month};

fn create_test_inputs(
    year: i32,
    is_probation: bool,
    confirmed_at: Option<Date>,
) -> AllotmentInputs {
    AllotmentInputs {
        employee_id: 1,
        year,
        is_probation,
        confirmed_at,
    }
}

fn create_test_balance(annual: u32) -> LeaveBalance {
    LeaveBalance {
        employee_id: 1,
        year: 2026,
        annual: HalfDays::whole_days(annual),
        casual: HalfDays::whole_days(7),
        medical: HalfDays::whole_days(21),
        official: HalfDays::ZERO,
    }
}

#[test]
fn test_no_pay_when_request_exceeds_bucket() {
    let balance: LeaveBalance = create_test_balance(2);
    assert!(check_no_pay(&balance, LeaveType::Annual, HalfDays::whole_days(3)));
    assert!(!check_no_pay(&balance, LeaveType::Annual, HalfDays::whole_days(2)));
}

#[test]
fn test_official_is_never_no_pay() {
    let balance: LeaveBalance = create_test_balance(0);
    assert!(!check_no_pay(&balance, LeaveType::Official, HalfDays::whole_days(3)));
}

#[test]
fn test_missing_balance_is_created() {
    let inputs: AllotmentInputs = create_test_inputs(2026, false, None);
    let resolution: BalanceResolution = resolve_balance(None, &inputs, &StandardAllotment);
    assert!(matches!(resolution, BalanceResolution::Created(_)));
    assert!(resolution.needs_write());
    assert_eq!(resolution.balance().annual, HalfDays::whole_days(14));
    assert_eq!(resolution.balance().casual, HalfDays::whole_days(7));
    assert_eq!(resolution.balance().medical, HalfDays::whole_days(21));
}

#[test]
fn test_same_year_balance_reused() {
    let stored: LeaveBalance = create_test_balance(3);
    let inputs: AllotmentInputs = create_test_inputs(2026, false, None);
    let resolution: BalanceResolution = resolve_balance(Some(stored), &inputs, &StandardAllotment);
    assert_eq!(resolution, BalanceResolution::Existing(stored));
    assert!(!resolution.needs_write());
}

#[test]
fn test_year_change_resets_rather_than_accumulates() {
    let stored: LeaveBalance = create_test_balance(3);
    let inputs: AllotmentInputs = create_test_inputs(2027, false, None);
    let resolution: BalanceResolution = resolve_balance(Some(stored), &inputs, &StandardAllotment);
    assert!(matches!(resolution, BalanceResolution::Reset(_)));
    assert_eq!(resolution.balance().year, 2027);
    assert_eq!(resolution.balance().annual, HalfDays::whole_days(14));
}

#[test]
fn test_probation_allotment() {
    let inputs: AllotmentInputs = create_test_inputs(2026, true, None);
    let allotment = StandardAllotment.allotment(&inputs);
    assert_eq!(allotment.annual, HalfDays::ZERO);
    assert_eq!(allotment.casual, HalfDays::whole_days(4));
    assert_eq!(allotment.medical, HalfDays::whole_days(7));
}

#[test]
fn test_confirmed_during_year_prorates_annual_by_quarter() {
    let cases: [(Month, u32); 4] = [
        (Month::February, 14),
        (Month::May, 10),
        (Month::August, 7),
        (Month::November, 4),
    ];
    for (month, expected) in cases {
        let confirmed: Date = Date::from_calendar_date(2026, month, 15).unwrap();
        let inputs: AllotmentInputs = create_test_inputs(2026, false, Some(confirmed));
        assert_eq!(
            StandardAllotment.allotment(&inputs).annual,
            HalfDays::whole_days(expected),
            "{month}"
        );
    }
}

#[test]
fn test_confirmed_in_earlier_year_gets_full_allotment() {
    let confirmed: Date = Date::from_calendar_date(2024, Month::November, 1).unwrap();
    let inputs: AllotmentInputs = create_test_inputs(2026, false, Some(confirmed));
    assert_eq!(
        StandardAllotment.allotment(&inputs).annual,
        HalfDays::whole_days(14)
    );
}

#[test]
fn test_deduction_floors_at_zero() {
    let balance: LeaveBalance = create_test_balance(2);
    let after: LeaveBalance = balance.after_deduction(LeaveType::Annual, HalfDays::whole_days(3));
    assert_eq!(after.annual, HalfDays::ZERO);

    let after_official: LeaveBalance =
        balance.after_deduction(LeaveType::Official, HalfDays::whole_days(2));
    assert_eq!(after_official.official, HalfDays::whole_days(2));
    assert_eq!(after_official.annual, HalfDays::whole_days(2));
}

struct CarryOverAllotment;

impl AllotmentPolicy for CarryOverAllotment {
    fn allotment(&self, inputs: &AllotmentInputs) -> crate::Allotment {
        StandardAllotment.allotment(inputs)
    }

    fn rollover(&self, previous: &LeaveBalance, inputs: &AllotmentInputs) -> LeaveBalance {
        let mut fresh: LeaveBalance = self
            .allotment(inputs)
            .into_balance(inputs.employee_id, inputs.year);
        fresh.annual = fresh.annual + previous.annual;
        fresh
    }
}

#[test]
fn test_rollover_policy_is_swappable() {
    let stored: LeaveBalance = create_test_balance(3);
    let inputs: AllotmentInputs = create_test_inputs(2027, false, None);
    let resolution: BalanceResolution = resolve_balance(Some(stored), &inputs, &CarryOverAllotment);
    assert_eq!(resolution.balance().annual, HalfDays::whole_days(17));
}
