use chrono::{DateTime, Duration, TimeZone, Utc};
use pocketbook::{Category, Kind, MAX_CENTS, Transaction};
use proptest::collection::vec;
use proptest::prelude::*;

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn transaction_strategy() -> impl Strategy<Value = Transaction> {
    (
        any::<i64>(),
        "[a-zA-Z][a-zA-Z ]{0,20}",
        1..=MAX_CENTS,
        any::<bool>(),
        prop_oneof![
            Just(Category::Food),
            Just(Category::Bills),
            "[a-z]{1,10}".prop_map(Category::from),
        ],
        0i64..10_000_000,
    )
        .prop_map(|(id, description, amount, income, category, millis)| {
            let kind = if income { Kind::Income } else { Kind::Expense };
            Transaction::new(
                id,
                &description,
                amount,
                kind,
                category,
                epoch() + Duration::milliseconds(millis),
            )
            .unwrap()
        })
}

proptest! {
    #[test]
    fn stored_form_round_trips(txs in vec(transaction_strategy(), 0..20)) {
        let json = serde_json::to_string(&txs).unwrap();
        let restored: Vec<Transaction> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(restored, txs);
    }

    #[test]
    fn amounts_at_the_ceiling_round_trip(offset in 0i64..1_000_000) {
        let amount = MAX_CENTS - offset;
        let tx = Transaction::new(1, "Large", amount, Kind::Income, Category::Other, epoch()).unwrap();

        let json = serde_json::to_string(&tx).unwrap();
        let restored: Transaction = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(restored.amount(), amount);
    }
}
