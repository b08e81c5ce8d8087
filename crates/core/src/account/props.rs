//! Property tests for debit/credit invariants.

use proptest::prelude::*;

use super::*;

fn money(cents: i64) -> Money {
    Money::from_minor_units(cents)
}

fn account_with(cents: i64) -> Account {
    Account::new(
        AccountId::new(1),
        "Holder".to_string(),
        money(cents),
        AccountStatus::Active,
    )
}

proptest! {
    /// For any balance b and any 0 < x <= b, debit succeeds, yields
    /// balance b - x, and advances the version by exactly 1.
    #[test]
    fn prop_debit_within_balance_succeeds(
        balance in 1i64..1_000_000_000,
        fraction in 1u64..=1000,
    ) {
        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        let amount = ((u128::from(fraction) * balance.unsigned_abs() as u128) / 1000).max(1) as i64;
        prop_assume!(amount <= balance);

        let mut account = account_with(balance);
        account.debit(money(amount)).unwrap();

        prop_assert_eq!(account.balance(), money(balance - amount));
        prop_assert_eq!(account.version(), 1);
    }

    /// For any x > b, debit fails with InsufficientBalance and leaves
    /// balance and version unchanged.
    #[test]
    fn prop_debit_over_balance_fails_cleanly(
        balance in 0i64..1_000_000_000,
        excess in 1i64..1_000_000,
    ) {
        let mut account = account_with(balance);
        let err = account.debit(money(balance + excess)).unwrap_err();

        prop_assert!(
            matches!(err, AccountError::InsufficientBalance { .. }),
            "expected InsufficientBalance"
        );
        prop_assert_eq!(account.balance(), money(balance));
        prop_assert_eq!(account.version(), 0);
    }

    /// Credit always adds exactly the amount and bumps the version.
    #[test]
    fn prop_credit_adds_exactly(
        balance in 0i64..1_000_000_000,
        amount in 1i64..1_000_000_000,
    ) {
        let mut account = account_with(balance);
        account.credit(money(amount)).unwrap();

        prop_assert_eq!(account.balance(), money(balance + amount));
        prop_assert_eq!(account.version(), 1);
    }

    /// A debit followed by an equal credit restores the balance while the
    /// version advances by 2 (the history of mutations stays visible).
    #[test]
    fn prop_debit_then_credit_restores_balance(
        balance in 1i64..1_000_000_000,
        amount in 1i64..1_000_000,
    ) {
        prop_assume!(amount <= balance);

        let mut account = account_with(balance);
        account.debit(money(amount)).unwrap();
        account.credit(money(amount)).unwrap();

        prop_assert_eq!(account.balance(), money(balance));
        prop_assert_eq!(account.version(), 2);
    }

    /// Mutations on non-active accounts never change state.
    #[test]
    fn prop_inactive_account_is_inert(
        balance in 0i64..1_000_000_000,
        amount in 1i64..1_000_000,
        locked in any::<bool>(),
    ) {
        let status = if locked { AccountStatus::Locked } else { AccountStatus::Closed };
        let mut account = Account::new(
            AccountId::new(1),
            "Holder".to_string(),
            money(balance),
            status,
        );

        prop_assert!(account.debit(money(amount)).is_err());
        prop_assert!(account.credit(money(amount)).is_err());
        prop_assert_eq!(account.balance(), money(balance));
        prop_assert_eq!(account.version(), 0);
    }
}
