// crates/meridian-rates/src/registrar.rs
//
// In-memory realizations of the collaborator interfaces, for tests and
// the simulation CLI. The production registrar and gateway live with the
// host; the core only ever reads them through the traits.

use std::collections::{HashMap, HashSet};

use meridian_core::{
    Address, MinterGateway, Registrar, RegistrarId, BASE_MINTER_RATE_KEY, MAX_EARNER_RATE_KEY,
};
use primitive_types::U256;

/// Default for [`MAX_EARNER_RATE_KEY`] when governance has not set it: 10%.
pub const DEFAULT_MAX_EARNER_RATE: u64 = 1_000;

/// Default for [`BASE_MINTER_RATE_KEY`] when governance has not set it: 5%.
pub const DEFAULT_BASE_MINTER_RATE: u64 = 500;

/// A keyed parameter store held in memory.
///
/// The two known keys fall back to their protocol defaults; unknown keys
/// read as zero, matching the registrar contract.
#[derive(Debug, Clone)]
pub struct InMemoryRegistrar {
    id: RegistrarId,
    values: HashMap<String, U256>,
    earners: HashSet<Address>,
}

impl InMemoryRegistrar {
    /// An empty store with the given identity; known keys read defaults.
    pub fn new(id: RegistrarId) -> Self {
        Self {
            id,
            values: HashMap::new(),
            earners: HashSet::new(),
        }
    }

    /// Set (or overwrite) a parameter value.
    pub fn set(&mut self, key: &str, value: U256) {
        self.values.insert(key.to_string(), value);
    }

    /// Add an account to the approved-earners list.
    pub fn approve_earner(&mut self, account: Address) {
        self.earners.insert(account);
    }

    /// Remove an account from the approved-earners list.
    pub fn revoke_earner(&mut self, account: &Address) {
        self.earners.remove(account);
    }
}

impl Registrar for InMemoryRegistrar {
    fn id(&self) -> RegistrarId {
        self.id
    }

    fn get(&self, key: &str) -> U256 {
        if let Some(value) = self.values.get(key) {
            return *value;
        }
        match key {
            MAX_EARNER_RATE_KEY => U256::from(DEFAULT_MAX_EARNER_RATE),
            BASE_MINTER_RATE_KEY => U256::from(DEFAULT_BASE_MINTER_RATE),
            _ => U256::zero(),
        }
    }

    fn is_approved_earner(&self, account: &Address) -> bool {
        self.earners.contains(account)
    }
}

/// A gateway view with fixed aggregates, adjustable between reads.
#[derive(Debug, Clone, Default)]
pub struct StaticMinterGateway {
    minter_rate: u32,
    total_active_owed: U256,
}

impl StaticMinterGateway {
    /// A gateway reporting the given rate and owed total.
    pub fn new(minter_rate: u32, total_active_owed: U256) -> Self {
        Self { minter_rate, total_active_owed }
    }

    /// Replace the reported minter rate.
    pub fn set_minter_rate(&mut self, rate: u32) {
        self.minter_rate = rate;
    }

    /// Replace the reported owed total.
    pub fn set_total_active_owed(&mut self, owed: U256) {
        self.total_active_owed = owed;
    }
}

impl MinterGateway for StaticMinterGateway {
    fn minter_rate(&self) -> u32 {
        self.minter_rate
    }

    fn total_active_owed(&self) -> U256 {
        self.total_active_owed
    }
}
