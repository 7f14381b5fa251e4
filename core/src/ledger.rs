use core::hash::Hash;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::*;

/// Account balances the game settles against. Implemented by whatever persistence the caller uses.
pub trait BalanceStore {
    type AccountId;

    fn balance(&self, id: &Self::AccountId) -> i64;
    fn update_balance(&mut self, id: &Self::AccountId, delta: i64);
}

/// Balances kept in memory, accounts start at `opening_balance` the first time they are seen.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBalances<K: Eq + Hash> {
    balances: HashMap<K, i64>,
    opening_balance: i64,
}

impl<K: Eq + Hash> MemoryBalances<K> {
    pub fn new(opening_balance: i64) -> Self {
        Self {
            balances: HashMap::new(),
            opening_balance,
        }
    }
}

impl<K: Eq + Hash + Clone> BalanceStore for MemoryBalances<K> {
    type AccountId = K;

    fn balance(&self, id: &K) -> i64 {
        self.balances.get(id).copied().unwrap_or(self.opening_balance)
    }

    fn update_balance(&mut self, id: &K, delta: i64) {
        let balance = self
            .balances
            .entry(id.clone())
            .or_insert(self.opening_balance);
        *balance = balance.saturating_add(delta);
    }
}

/// Balance change produced by a finished session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub wagered: i64,
    pub returned: i64,
}

impl Settlement {
    /// Winnings are truncated to whole units.
    pub fn from_session(session: &MinesSession) -> Result<Self> {
        let wagered = i64::from(session.bet());
        let returned = match session.state() {
            SessionState::InProgress => return Err(GameError::NotFinished),
            SessionState::Busted => 0,
            SessionState::CashedOut => session.payout() as i64,
        };
        Ok(Self { wagered, returned })
    }

    pub const fn net(&self) -> i64 {
        self.returned - self.wagered
    }

    /// Books the net result against `id`, with a single balance update.
    pub fn apply<S: BalanceStore + ?Sized>(&self, store: &mut S, id: &S::AccountId) {
        log::debug!(
            "Settling session: wagered {}, returned {}, net {}",
            self.wagered,
            self.returned,
            self.net()
        );
        store.update_balance(id, self.net());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts calls so tests can check a session settles exactly once.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryBalances<u64>,
        updates: usize,
    }

    impl BalanceStore for CountingStore {
        type AccountId = u64;

        fn balance(&self, id: &u64) -> i64 {
            self.inner.balance(id)
        }

        fn update_balance(&mut self, id: &u64, delta: i64) {
            self.updates += 1;
            self.inner.update_balance(id, delta);
        }
    }

    fn session(bet: u32) -> MinesSession {
        let layout = MineLayout::from_mine_coords(5, &[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]).unwrap();
        MinesSession::new(layout, bet).unwrap()
    }

    #[test]
    fn unknown_accounts_start_at_opening_balance() {
        let mut balances = MemoryBalances::new(1000);

        assert_eq!(balances.balance(&"alice"), 1000);
        balances.update_balance(&"alice", -250);
        assert_eq!(balances.balance(&"alice"), 750);
        assert_eq!(balances.balance(&"bob"), 1000);
    }

    #[test]
    fn busted_session_loses_bet() {
        let mut session = session(100);
        session.reveal((0, 1)).unwrap();
        session.reveal((0, 0)).unwrap();
        let mut store = CountingStore::default();

        let settlement = Settlement::from_session(&session).unwrap();
        settlement.apply(&mut store, &7);

        assert_eq!(settlement.net(), -100);
        assert_eq!(store.balance(&7), -100);
        assert_eq!(store.updates, 1);
    }

    #[test]
    fn cashed_out_session_wins_truncated_payout() {
        let mut session = session(100);
        session.reveal((0, 1)).unwrap();
        session.reveal((0, 2)).unwrap();
        session.cash_out().unwrap();
        let mut store = CountingStore {
            inner: MemoryBalances::new(500),
            updates: 0,
        };

        let settlement = Settlement::from_session(&session).unwrap();
        settlement.apply(&mut store, &1);

        // 100 * 1.5157... pays out 151
        assert_eq!(settlement.returned, 151);
        assert_eq!(settlement.net(), 51);
        assert_eq!(store.balance(&1), 551);
        assert_eq!(store.updates, 1);
    }

    #[test]
    fn in_progress_session_cannot_settle() {
        let mut session = session(10);
        session.reveal((0, 1)).unwrap();

        assert_eq!(Settlement::from_session(&session), Err(GameError::NotFinished));
    }
}
