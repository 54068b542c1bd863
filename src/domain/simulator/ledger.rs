use slotmap::{SlotMap, new_key_type};

use crate::domain::network::route_store::RouteKey;
use crate::domain::simulator::demand::Tick;
use crate::domain::utils::id::EndpointPair;

new_key_type! {
    pub struct AllocationKey;
}

/// A granted demand waiting for its expiry tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub route: RouteKey,
    pub endpoints: EndpointPair,
    pub amount: f64,

    /// Tick in whose release phase the amount is given back.
    pub expiry: Tick,

    /// Position in grant order. Allocations expiring in the same tick are released in this order.
    pub sequence: u64,
}

/// The set of currently active allocations.
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    slots: SlotMap<AllocationKey, Allocation>,
    next_sequence: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, route: RouteKey, endpoints: EndpointPair, amount: f64, expiry: Tick) -> AllocationKey {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.slots.insert(Allocation { route, endpoints, amount, expiry, sequence })
    }

    /// Keys of every allocation expiring at `time`, in grant order.
    ///
    /// Nothing is removed; callers drop each entry with [`Ledger::remove`] once its load is gone.
    pub fn expiring(&self, time: Tick) -> Vec<AllocationKey> {
        let mut expiring: Vec<(u64, AllocationKey)> =
            self.slots.iter().filter(|(_, allocation)| allocation.expiry == time).map(|(key, allocation)| (allocation.sequence, key)).collect();
        expiring.sort_unstable_by_key(|(sequence, _)| *sequence);

        expiring.into_iter().map(|(_, key)| key).collect()
    }

    pub fn get(&self, key: AllocationKey) -> Option<&Allocation> {
        self.slots.get(key)
    }

    pub fn remove(&mut self, key: AllocationKey) -> Option<Allocation> {
        self.slots.remove(key)
    }

    /// Active allocations in grant order.
    pub fn active(&self) -> Vec<&Allocation> {
        let mut active: Vec<&Allocation> = self.slots.values().collect();
        active.sort_by_key(|allocation| allocation.sequence);
        active
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
