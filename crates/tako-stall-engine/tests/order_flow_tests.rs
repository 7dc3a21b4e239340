/*
[INPUT]:  Operator command sequences against a fresh board
[OUTPUT]: Test results for the order lifecycle
[POS]:    Integration tests - compose, commit, pay, remove, edit
[UPDATE]: When operator workflows change
*/

mod common;

use common::{board, countdown_board, place_order};
use rust_decimal::Decimal;
use tako_stall_engine::{
    DraftMode, EngineError, Filling, GroupOrder, OrderBoard, QueueNumber, RemovalRequest, Sauce,
    SauceSummary, Severity, TickOutcome,
};
use tokio_test::{assert_err, assert_ok};

#[test]
fn test_drinks_never_split_across_lines() {
    let mut board = board();
    board.increment_drink();
    assert_ok!(board.add_to_cart());
    board.increment_filling(Filling::Cumi);
    board.increment_drink();
    board.increment_drink();
    assert_ok!(board.add_to_cart());

    let drinks: Vec<_> = board
        .draft()
        .lines()
        .iter()
        .filter(|line| line.is_drink())
        .collect();
    assert_eq!(drinks.len(), 1);
    assert_eq!(drinks[0].quantity, 3);
    assert_eq!(drinks[0].price, Decimal::from(15));
    assert_eq!(board.draft().total(), Decimal::from(30));
}

#[test]
fn test_filling_cap_holds_through_board() {
    let mut board = board();
    for _ in 0..4 {
        assert!(board.increment_filling(Filling::Sosis));
    }
    assert!(board.increment_filling(Filling::Gurita));
    assert!(!board.increment_filling(Filling::Keju));
    assert!(!board.decrement_filling(Filling::Keju));
    assert_eq!(board.form().fillings().total(), 5);
    assert_eq!(board.form().fillings().remaining(), 0);
}

#[test]
fn test_sauce_selection_travels_with_the_line() {
    let mut board = board();
    board.increment_filling(Filling::Kepiting);
    board.toggle_all_sauces();
    assert!(board.toggle_separate(Sauce::Mayonaise));
    board.toggle_sauce(Sauce::Sambel);
    assert!(!board.form().sauces().is_separate(Sauce::Sambel));
    let id = assert_ok!(board.add_to_cart())[0];

    // the form is clear again; loading the line brings the sauces back
    assert_eq!(board.form().sauces().summary(), SauceSummary::NoSauce);
    assert_ok!(board.load_line_for_edit(id));
    assert!(board.form().sauces().is_selected(Sauce::Tomat));
    assert!(board.form().sauces().is_separate(Sauce::Mayonaise));
    assert!(!board.form().sauces().is_selected(Sauce::Sambel));
}

#[test]
fn test_queue_numbers_are_never_reused() {
    let mut board = board();
    let first = place_order(&mut board, &[Filling::Sosis], 0, "");
    assert_ok!(board.toggle_payment(first));
    assert_ok!(board.request_removal(first));
    assert_ok!(board.confirm_removal());

    let second = place_order(&mut board, &[Filling::Keju], 0, "");
    assert_eq!(second, QueueNumber::new(2));
    assert_eq!(board.groups().len(), 1);
}

#[test]
fn test_groups_follow_configured_order() {
    let mut config = tako_stall_engine::EngineConfig::default();
    config.queue.group_order = GroupOrder::Descending;
    let mut board = assert_ok!(OrderBoard::new(config));
    for name in ["ani", "budi", "citra"] {
        place_order(&mut board, &[Filling::Cumi], 1, name);
    }

    let names: Vec<String> = board
        .groups()
        .into_iter()
        .map(|group| group.customer_name)
        .collect();
    assert_eq!(names, vec!["Citra", "Budi", "Ani"]);
}

#[test]
fn test_payment_toggle_twice_restores_flags() {
    let mut board = board();
    let number = place_order(&mut board, &[Filling::Sosis, Filling::Keju], 2, "");
    let before = board.queue().group(number).expect("group");

    assert_ok!(board.toggle_payment(number));
    assert!(board.queue().group(number).expect("group").is_paid());
    assert_ok!(board.toggle_payment(number));

    let after = board.queue().group(number).expect("group");
    assert_eq!(after, before);
}

#[test]
fn test_removal_waits_for_payment() {
    let mut board = board();
    let number = place_order(&mut board, &[Filling::Kornet], 1, "");
    let other = place_order(&mut board, &[Filling::Kornet], 0, "");

    let err = assert_err!(board.request_removal(number));
    assert_eq!(err, EngineError::Unpaid(number));
    assert_eq!(
        board.take_notice().map(|notice| notice.severity),
        Some(Severity::Warning)
    );

    assert_ok!(board.toggle_payment(number));
    assert!(matches!(
        board.request_removal(number),
        Ok(RemovalRequest::AwaitingConfirmation(n)) if n == number
    ));
    assert_eq!(board.confirm_removal(), Ok(number));
    assert!(board.queue().group(number).is_none());
    assert!(board.queue().contains(other));
}

#[test]
fn test_cancelled_countdown_keeps_order() {
    let mut board = countdown_board(3);
    let number = place_order(&mut board, &[Filling::Gurita], 0, "");
    assert_ok!(board.toggle_payment(number));
    assert_ok!(board.request_removal(number));

    board.tick();
    assert!(board.cancel_removal(number));
    for _ in 0..5 {
        assert!(board.tick().is_empty());
    }
    assert!(board.queue().contains(number));
}

#[test]
fn test_unpaying_during_countdown_blocks_deletion() {
    let mut board = countdown_board(2);
    let number = place_order(&mut board, &[Filling::Gurita], 0, "");
    assert_ok!(board.toggle_payment(number));
    assert_ok!(board.request_removal(number));
    assert_ok!(board.toggle_payment(number));

    board.tick();
    let outcomes = board.tick();
    assert!(matches!(outcomes.as_slice(), [TickOutcome::Aborted { .. }]));
    assert!(board.queue().contains(number));
}

#[test]
fn test_edit_whole_group_then_commit_reproduces_group() {
    let mut board = board();
    let number = place_order(&mut board, &[Filling::Sosis, Filling::Cumi], 2, "dewi");
    let before = board.queue().group(number).expect("group");

    assert_eq!(board.edit_whole_group(number), Ok(2));
    assert!(matches!(board.draft().mode(), DraftMode::EditingOrder(_)));
    let receipt = assert_ok!(board.commit());

    let after = board.queue().group(number).expect("group");
    assert_eq!(receipt.queue_number, number);
    assert_eq!(after.customer_name, "Dewi");
    assert_eq!(after.total, before.total);
    assert_eq!(after.lines.len(), before.lines.len());
    assert_eq!(board.next_queue_number(), QueueNumber::new(2));
}

#[test]
fn test_edit_whole_group_can_change_content() {
    let mut board = board();
    let number = place_order(&mut board, &[Filling::Sosis], 1, "eka");
    assert_ok!(board.edit_whole_group(number));

    let drink_id = board
        .draft()
        .lines()
        .iter()
        .find(|line| line.is_drink())
        .map(|line| line.id)
        .expect("drink line");
    assert_ok!(board.remove_line(drink_id));
    board.apply_mixed_preset();
    assert_ok!(board.add_to_cart());
    assert_ok!(board.commit());

    let group = board.queue().group(number).expect("group");
    let names: Vec<&str> = group.lines.iter().map(|line| line.line.name.as_str()).collect();
    assert_eq!(names, vec!["Takoyaki with Sosis", "Mixed Takoyaki"]);
    assert_eq!(group.total, Decimal::from(30));
}

#[test]
fn test_abandoned_edit_drops_the_order() {
    let mut board = board();
    let number = place_order(&mut board, &[Filling::Keju], 0, "");
    assert_ok!(board.edit_whole_group(number));

    let id = board.draft().lines()[0].id;
    assert_ok!(board.remove_line(id));
    assert_eq!(board.draft().mode(), &DraftMode::Normal);
    assert!(board.groups().is_empty());
    assert_eq!(board.commit_label(), "Send order #2");
}
