//! Progress derivation tests.

use crate::task::domain::{
    ChecklistItemDraft, Percent, TaskDomainError, average_percent, build_checklist,
    derive_percent,
};
use rstest::rstest;

fn checklist(checked: usize, total: usize) -> Vec<crate::task::domain::ChecklistItem> {
    build_checklist(
        (0..total).map(|index| ChecklistItemDraft::new(format!("step {index}")).checked(index < checked)),
    )
    .expect("valid checklist")
}

#[rstest]
#[case(0, 1, 0)]
#[case(1, 2, 50)]
#[case(1, 3, 33)]
#[case(2, 3, 67)]
#[case(1, 8, 13)]
#[case(3, 3, 100)]
fn percent_rounds_half_up(#[case] checked: usize, #[case] total: usize, #[case] expected: u8) {
    let items = checklist(checked, total);

    assert_eq!(derive_percent(&items, Percent::ZERO).value(), expected);
}

#[rstest]
fn non_empty_checklist_ignores_fallback() {
    let items = checklist(0, 4);

    assert_eq!(derive_percent(&items, Percent::COMPLETE), Percent::ZERO);
}

#[rstest]
fn empty_checklist_keeps_fallback() {
    let fallback = Percent::new(35).expect("valid percent");

    assert_eq!(derive_percent(&[], fallback), fallback);
}

#[rstest]
#[case(-1)]
#[case(101)]
fn percent_rejects_out_of_range(#[case] raw: i64) {
    assert_eq!(Percent::new(raw), Err(TaskDomainError::InvalidPercent(raw)));
}

#[rstest]
fn from_ratio_needs_a_denominator() {
    assert_eq!(Percent::from_ratio(0, 0), None);
    assert_eq!(Percent::from_ratio(5, 2), Some(Percent::COMPLETE));
}

#[rstest]
#[case(&[], 0)]
#[case(&[50], 50)]
#[case(&[0, 100, 50], 50)]
#[case(&[33, 34], 34)]
#[case(&[10, 20, 20], 17)]
fn average_rounds_half_up(#[case] values: &[i64], #[case] expected: u8) {
    let percents = values
        .iter()
        .map(|value| Percent::new(*value).expect("valid percent"));

    assert_eq!(average_percent(percents).value(), expected);
}

#[rstest]
fn percent_serialises_as_a_plain_number() {
    let json = serde_json::to_string(&Percent::new(42).expect("valid percent"))
        .expect("serialisable");

    assert_eq!(json, "42");
    assert!(serde_json::from_str::<Percent>("140").is_err());
}
