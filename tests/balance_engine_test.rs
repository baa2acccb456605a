use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeSet;
use tripsplit::application::engine::{BalanceEngine, compute_balances};
use tripsplit::domain::balance::Standing;
use tripsplit::domain::expense::{Expense, ExpenseId, InvalidExpenseReason};
use tripsplit::domain::money::{Money, SplitRule};
use tripsplit::domain::participant::ParticipantId;
use tripsplit::error::TripError;

fn members(ids: &[&str]) -> BTreeSet<ParticipantId> {
    ids.iter().map(|id| ParticipantId::from(*id)).collect()
}

fn expense(id: u32, description: &str, amount: Decimal, payer: &str, with: &[&str]) -> Expense {
    Expense::new(
        id,
        description,
        Money::new(amount),
        payer.into(),
        with.iter().map(|p| ParticipantId::from(*p)).collect(),
    )
}

fn assert_entry(
    balances: &tripsplit::domain::balance::Balances,
    who: &str,
    paid: Decimal,
    owed: Decimal,
    balance: Decimal,
) {
    let entry = balances
        .get(&ParticipantId::from(who))
        .unwrap_or_else(|| panic!("no entry for {}", who));
    assert_eq!(entry.paid, Money::new(paid), "paid for {}", who);
    assert_eq!(entry.owed, Money::new(owed), "owed for {}", who);
    assert_eq!(entry.balance, Money::new(balance), "balance for {}", who);
}

fn bali_expenses() -> Vec<Expense> {
    vec![
        expense(
            1,
            "Hotel Booking",
            dec!(800),
            "Alice",
            &["Alice", "Bob", "Charlie", "Diana"],
        ),
        expense(
            2,
            "Dinner at Restaurant",
            dec!(120),
            "Bob",
            &["Alice", "Bob", "Charlie"],
        ),
        expense(3, "Airport Transfer", dec!(60), "Charlie", &["Charlie", "Diana"]),
        expense(4, "Souvenir Shopping", dec!(90), "Diana", &["Alice", "Diana"]),
    ]
}

#[test]
fn test_zero_expense_trip() {
    let balances = compute_balances(&members(&["Alice", "Bob", "Charlie"]), &[]).unwrap();

    assert_eq!(balances.len(), 3);
    for who in ["Alice", "Bob", "Charlie"] {
        assert_entry(&balances, who, dec!(0), dec!(0), dec!(0));
    }
}

#[test]
fn test_single_payer_self_only() {
    let expenses = [expense(1, "Snorkel", dec!(100), "A", &["A"])];
    let balances = compute_balances(&members(&["A"]), &expenses).unwrap();

    assert_entry(&balances, "A", dec!(100), dec!(100), dec!(0));
    assert_eq!(
        balances.get(&"A".into()).unwrap().standing(),
        Standing::Settled
    );
}

#[test]
fn test_equal_split_among_three() {
    let expenses = [expense(
        1,
        "Dinner",
        dec!(120),
        "Bob",
        &["Alice", "Bob", "Charlie"],
    )];
    let balances = compute_balances(&members(&["Alice", "Bob", "Charlie"]), &expenses).unwrap();

    assert_entry(&balances, "Bob", dec!(120), dec!(40), dec!(80));
    assert_entry(&balances, "Alice", dec!(0), dec!(40), dec!(-40));
    assert_entry(&balances, "Charlie", dec!(0), dec!(40), dec!(-40));
}

#[test]
fn test_multiple_expenses_accumulate() {
    let balances = compute_balances(
        &members(&["Alice", "Bob", "Charlie", "Diana"]),
        &bali_expenses(),
    )
    .unwrap();

    assert_entry(&balances, "Alice", dec!(800), dec!(285), dec!(515));
    assert_entry(&balances, "Bob", dec!(120), dec!(240), dec!(-120));
    assert_entry(&balances, "Charlie", dec!(60), dec!(270), dec!(-210));
    assert_entry(&balances, "Diana", dec!(90), dec!(275), dec!(-185));

    assert_eq!(balances.total_balance(), Money::ZERO);
    assert_eq!(balances.total_paid(), Money::new(dec!(1070)));
    assert_eq!(balances.total_owed(), Money::new(dec!(1070)));
}

#[test]
fn test_expense_order_does_not_matter() {
    let trip = members(&["Alice", "Bob", "Charlie", "Diana"]);
    let mut reversed = bali_expenses();
    reversed.reverse();

    assert_eq!(
        compute_balances(&trip, &bali_expenses()).unwrap(),
        compute_balances(&trip, &reversed).unwrap()
    );
}

#[test]
fn test_idempotence() {
    let trip = members(&["Alice", "Bob", "Charlie", "Diana"]);
    let expenses = bali_expenses();

    let first = compute_balances(&trip, &expenses).unwrap();
    let second = compute_balances(&trip, &expenses).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_duplicate_participants_count_once() {
    let expenses = [expense(
        1,
        "Taxi",
        dec!(90),
        "Alice",
        &["Alice", "Bob", "Bob", "Charlie", "Alice"],
    )];
    let balances = compute_balances(&members(&["Alice", "Bob", "Charlie"]), &expenses).unwrap();

    assert_entry(&balances, "Alice", dec!(90), dec!(30), dec!(60));
    assert_entry(&balances, "Bob", dec!(0), dec!(30), dec!(-30));
    assert_entry(&balances, "Charlie", dec!(0), dec!(30), dec!(-30));
}

#[test]
fn test_conservation_with_uneven_splits() {
    let expenses = [
        expense(1, "Boat", dec!(100), "A", &["A", "B", "C"]),
        expense(2, "Ice", dec!(0.10), "B", &["A", "B", "C", "D", "E", "F", "G"]),
        expense(3, "Fuel", dec!(55.55), "C", &["D"]),
    ];
    let trip = members(&["A", "B", "C", "D", "E", "F", "G"]);

    for rule in [SplitRule::Precise, SplitRule::MinorUnits(2), SplitRule::MinorUnits(0)] {
        let balances = BalanceEngine::new(rule)
            .compute_balances(&trip, &expenses)
            .unwrap();
        assert_eq!(balances.total_balance(), Money::ZERO, "rule {:?}", rule);
        assert_eq!(balances.total_owed(), Money::new(dec!(155.65)));
    }
}

#[test]
fn test_negative_amount_is_invalid_expense() {
    let expenses = [expense(9, "Refund", dec!(-20), "Alice", &["Alice"])];
    match compute_balances(&members(&["Alice"]), &expenses) {
        Err(TripError::InvalidExpense { expense, reason }) => {
            assert_eq!(expense, ExpenseId(9));
            assert_eq!(
                reason,
                InvalidExpenseReason::NegativeAmount(Money::new(dec!(-20)))
            );
        }
        other => panic!("expected InvalidExpense, got {:?}", other),
    }
}

#[test]
fn test_empty_participants_is_invalid_expense() {
    let mut bad = expense(5, "Ghost", dec!(20), "Alice", &["Alice"]);
    bad.participants.clear();

    let err = compute_balances(&members(&["Alice"]), &[bad]).unwrap_err();
    assert!(matches!(
        err,
        TripError::InvalidExpense {
            reason: InvalidExpenseReason::NoParticipants,
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "Invalid expense #5: no participants to split over"
    );
}

#[test]
fn test_non_members_are_synthesized_not_dropped() {
    let expenses = [expense(1, "Guide", dec!(60), "Zed", &["Alice", "Yan"])];
    let balances = compute_balances(&members(&["Alice"]), &expenses).unwrap();

    assert_eq!(balances.len(), 3);
    assert_entry(&balances, "Zed", dec!(60), dec!(0), dec!(60));
    assert_entry(&balances, "Yan", dec!(0), dec!(30), dec!(-30));
    assert_eq!(balances.total_balance(), Money::ZERO);
}

#[test]
fn test_engine_is_shareable_across_threads() {
    let engine = BalanceEngine::default();
    let trip = members(&["Alice", "Bob", "Charlie", "Diana"]);
    let expenses = bali_expenses();

    let (engine, trip, expenses) = (&engine, &trip, &expenses);

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || engine.compute_balances(trip, expenses).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for balances in &results {
        assert_eq!(balances, &results[0]);
    }
}
