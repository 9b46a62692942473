// crates/meridian-token/src/token.rs
//
// Split-cohort token accounting.
//
// The core tracks aggregates plus per-earner principal only: non-earning
// balances are face-value coins living with the host ledger, so the
// non-earning side of the book is a single present-value total. Earning
// balances are stored as principal and grow with the index.
//
// Rounding discipline: principal rounds down when the protocol credits
// (mint, non-earning -> earning) and up when it debits (burn, earning-side
// transfer debits), so every fractional remainder stays with the protocol.

use std::collections::HashMap;

use meridian_core::{
    Address, MeridianError, Registrar, RegistrarId, TokenEvent, ZERO_ADDRESS,
};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::indexing::{
    present_from_principal_down, principal_from_present_down, principal_from_present_up,
    ContinuousIndexing,
};

/// Bit width of the non-earning supply envelope.
const NON_EARNING_SUPPLY_BITS: usize = 240;

/// A member of the earning cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningAccount {
    /// Stored principal; present value is `principal · index / EXP_ONE`.
    pub principal: u128,
    /// Index at which the holder last realized accrued interest.
    pub last_claim_index: u128,
}

/// The complete mutable state of one token instance.
///
/// After every public operation:
///   - the sum of account principals equals
///     `principal_of_total_earning_supply`, and
///   - `total_supply(now)` equals the non-earning total plus the present
///     value of the earning principal at the current index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenState {
    /// The parameter store this token answers to.
    registrar_id: RegistrarId,
    /// Present-value tokens held outside the earning cohort.
    total_non_earning_supply: U256,
    /// Sum of principal across all earning accounts.
    principal_of_total_earning_supply: u128,
    /// The continuous index.
    indexing: ContinuousIndexing,
    /// Earning cohort membership and principal.
    earning: HashMap<Address, EarningAccount>,
    /// Events accumulated since the host last drained them.
    #[serde(skip)]
    events: Vec<TokenEvent>,
}

impl TokenState {
    /// A fresh token bound to `registrar_id`, anchored at `now`.
    pub fn new(registrar_id: RegistrarId, now: u64) -> Self {
        Self {
            registrar_id,
            total_non_earning_supply: U256::zero(),
            principal_of_total_earning_supply: 0,
            indexing: ContinuousIndexing::new(now),
            earning: HashMap::new(),
            events: Vec::new(),
        }
    }

    // ---- read side -------------------------------------------------------

    /// Whether `account` is in the earning cohort.
    pub fn is_earning(&self, account: &Address) -> bool {
        self.earning.contains_key(account)
    }

    /// Stored principal of `account`; zero for non-members.
    pub fn principal_balance(&self, account: &Address) -> u128 {
        self.earning.get(account).map_or(0, |a| a.principal)
    }

    /// The earning account for `account`, if any.
    pub fn earning_account(&self, account: &Address) -> Option<&EarningAccount> {
        self.earning.get(account)
    }

    /// Present-value total held outside the earning cohort.
    pub fn total_non_earning_supply(&self) -> U256 {
        self.total_non_earning_supply
    }

    /// Sum of principal across the earning cohort.
    pub fn principal_of_total_earning_supply(&self) -> u128 {
        self.principal_of_total_earning_supply
    }

    /// Present value of the earning cohort at `now`.
    pub fn total_earning_supply(&self, now: u64) -> Result<U256, MeridianError> {
        Ok(present_from_principal_down(
            self.principal_of_total_earning_supply,
            self.current_index(now)?,
        ))
    }

    /// Total supply: non-earning plus the earning cohort's present value.
    pub fn total_supply(&self, now: u64) -> Result<U256, MeridianError> {
        Ok(self.total_non_earning_supply + self.total_earning_supply(now)?)
    }

    /// The index value at `now`, without committing it.
    pub fn current_index(&self, now: u64) -> Result<u128, MeridianError> {
        self.indexing.current_index(now)
    }

    /// The continuous-indexing triple as last committed.
    pub fn indexing(&self) -> &ContinuousIndexing {
        &self.indexing
    }

    /// Hand the accumulated events to the host, in commit order.
    pub fn drain_events(&mut self) -> Vec<TokenEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- index maintenance ----------------------------------------------

    /// Advance the index to `now` and switch to a host-supplied rate.
    ///
    /// The token never calls the rate model; the host reads the model and
    /// feeds the chosen rate in here. Returns the committed index.
    pub fn update_index(&mut self, new_rate: u32, now: u64) -> Result<u128, MeridianError> {
        let before = self.indexing.clone();
        let index = self.indexing.update(new_rate, now)?;
        if self.indexing != before {
            self.events.push(TokenEvent::IndexUpdated { index, rate: new_rate });
        }
        Ok(index)
    }

    /// Advance the index to `now` at the rate already in force. Used by
    /// every balance-touching operation before it converts amounts.
    fn checkpoint_index(&mut self, now: u64) -> Result<u128, MeridianError> {
        let rate = self.indexing.latest_rate();
        self.update_index(rate, now)
    }

    // ---- operations ------------------------------------------------------

    /// Mint `amount` present-value tokens to `to`.
    pub fn mint(&mut self, to: Address, amount: U256, now: u64) -> Result<(), MeridianError> {
        if amount.is_zero() {
            return Err(MeridianError::InsufficientAmount);
        }
        if to == ZERO_ADDRESS {
            return Err(MeridianError::InvalidRecipient);
        }

        if self.is_earning(&to) {
            // Validate against the would-be index before committing anything.
            let index = self.current_index(now)?;
            let principal = principal_from_present_down(amount, index)?;
            let new_total = self
                .principal_of_total_earning_supply
                .checked_add(principal)
                .ok_or(MeridianError::OverflowsPrincipalOfTotalSupply)?;

            self.checkpoint_index(now)?;
            if let Some(account) = self.earning.get_mut(&to) {
                account.principal += principal;
            }
            self.principal_of_total_earning_supply = new_total;
        } else {
            let new_total = self.total_non_earning_supply + amount;
            if new_total.bits() > NON_EARNING_SUPPLY_BITS {
                return Err(MeridianError::OverflowsPrincipalOfTotalSupply);
            }
            if self.principal_of_total_earning_supply > 0 {
                self.checkpoint_index(now)?;
            }
            self.total_non_earning_supply = new_total;
        }

        self.events.push(TokenEvent::Transfer { from: ZERO_ADDRESS, to, amount });
        Ok(())
    }

    /// Burn `amount` present-value tokens from `from`.
    pub fn burn(&mut self, from: Address, amount: U256, now: u64) -> Result<(), MeridianError> {
        if amount.is_zero() {
            return Err(MeridianError::InsufficientAmount);
        }

        if self.is_earning(&from) {
            let index = self.current_index(now)?;
            let principal = principal_from_present_up(amount, index)?;
            if self.principal_balance(&from) < principal {
                return Err(MeridianError::InsufficientBalance);
            }

            self.checkpoint_index(now)?;
            if let Some(account) = self.earning.get_mut(&from) {
                account.principal -= principal;
            }
            self.principal_of_total_earning_supply -= principal;
        } else {
            if self.total_non_earning_supply < amount {
                return Err(MeridianError::InsufficientBalance);
            }
            self.total_non_earning_supply -= amount;
        }

        self.events.push(TokenEvent::Transfer { from, to: ZERO_ADDRESS, amount });
        Ok(())
    }

    /// Move `amount` present-value tokens from `from` to `to`.
    ///
    /// In-kind transfers inside the earning cohort move principal; the
    /// crossing cases convert with the debit side rounded up and the
    /// credit side rounded down.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
        now: u64,
    ) -> Result<(), MeridianError> {
        if amount.is_zero() {
            return Err(MeridianError::InsufficientAmount);
        }
        if to == ZERO_ADDRESS {
            return Err(MeridianError::InvalidRecipient);
        }

        match (self.is_earning(&from), self.is_earning(&to)) {
            (false, false) => {
                // Both balances live with the host ledger; nothing to move
                // inside the core.
            }
            (true, true) => {
                let index = self.current_index(now)?;
                let principal = principal_from_present_up(amount, index)?;
                if self.principal_balance(&from) < principal {
                    return Err(MeridianError::InsufficientBalance);
                }

                self.checkpoint_index(now)?;
                if let Some(account) = self.earning.get_mut(&from) {
                    account.principal -= principal;
                }
                if let Some(account) = self.earning.get_mut(&to) {
                    account.principal += principal;
                }
            }
            (true, false) => {
                let index = self.current_index(now)?;
                let principal = principal_from_present_up(amount, index)?;
                if self.principal_balance(&from) < principal {
                    return Err(MeridianError::InsufficientBalance);
                }
                let new_non_earning = self.total_non_earning_supply + amount;
                if new_non_earning.bits() > NON_EARNING_SUPPLY_BITS {
                    return Err(MeridianError::OverflowsPrincipalOfTotalSupply);
                }

                self.checkpoint_index(now)?;
                if let Some(account) = self.earning.get_mut(&from) {
                    account.principal -= principal;
                }
                self.principal_of_total_earning_supply -= principal;
                self.total_non_earning_supply = new_non_earning;
            }
            (false, true) => {
                if self.total_non_earning_supply < amount {
                    return Err(MeridianError::InsufficientBalance);
                }
                let index = self.current_index(now)?;
                let principal = principal_from_present_down(amount, index)?;
                let new_total = self
                    .principal_of_total_earning_supply
                    .checked_add(principal)
                    .ok_or(MeridianError::OverflowsPrincipalOfTotalSupply)?;

                self.checkpoint_index(now)?;
                self.total_non_earning_supply -= amount;
                if let Some(account) = self.earning.get_mut(&to) {
                    account.principal += principal;
                }
                self.principal_of_total_earning_supply = new_total;
            }
        }

        self.events.push(TokenEvent::Transfer { from, to, amount });
        Ok(())
    }

    /// Move `account` into the earning cohort, converting its reported
    /// non-earning balance to principal (rounded down). No-op when the
    /// account already earns.
    pub fn start_earning(
        &mut self,
        account: Address,
        current_non_earning_balance: U256,
        now: u64,
    ) -> Result<(), MeridianError> {
        if self.is_earning(&account) {
            return Ok(());
        }
        if self.total_non_earning_supply < current_non_earning_balance {
            return Err(MeridianError::InsufficientBalance);
        }

        let index = self.current_index(now)?;
        let principal = principal_from_present_down(current_non_earning_balance, index)?;
        let new_total = self
            .principal_of_total_earning_supply
            .checked_add(principal)
            .ok_or(MeridianError::OverflowsPrincipalOfTotalSupply)?;

        let index = self.checkpoint_index(now)?;
        self.total_non_earning_supply -= current_non_earning_balance;
        self.earning.insert(
            account,
            EarningAccount { principal, last_claim_index: index },
        );
        self.principal_of_total_earning_supply = new_total;

        tracing::debug!(account = ?account, principal, "started earning");
        self.events.push(TokenEvent::StartedEarning { account });
        Ok(())
    }

    /// Move `account` out of the earning cohort. Its principal is realized
    /// at the current index (rounded down) and folded into the non-earning
    /// total. Returns the realized present value and the retired principal;
    /// `None` when the account was not earning.
    pub fn stop_earning(
        &mut self,
        account: Address,
        now: u64,
    ) -> Result<Option<(U256, u128)>, MeridianError> {
        if !self.is_earning(&account) {
            return Ok(None);
        }

        let index = self.current_index(now)?;
        let principal = self.principal_balance(&account);
        let present = present_from_principal_down(principal, index);
        let new_non_earning = self.total_non_earning_supply + present;
        if new_non_earning.bits() > NON_EARNING_SUPPLY_BITS {
            return Err(MeridianError::OverflowsPrincipalOfTotalSupply);
        }

        self.checkpoint_index(now)?;
        self.earning.remove(&account);
        self.principal_of_total_earning_supply -= principal;
        self.total_non_earning_supply = new_non_earning;

        tracing::debug!(account = ?account, principal, "stopped earning");
        self.events.push(TokenEvent::StoppedEarning { account });
        Ok(Some((present, principal)))
    }

    /// Realize the interest accrued since the account's last claim.
    ///
    /// Returns the present-value difference between the account's value at
    /// the current index and at its last claim index, and moves the claim
    /// marker forward. Principal is untouched — the accrued value is
    /// settled externally while the account keeps compounding. Zero for
    /// non-earning accounts.
    pub fn claim(&mut self, account: Address, now: u64) -> Result<U256, MeridianError> {
        if !self.is_earning(&account) {
            return Ok(U256::zero());
        }

        let index = self.checkpoint_index(now)?;
        let account_state = match self.earning.get_mut(&account) {
            Some(state) => state,
            None => return Ok(U256::zero()),
        };

        let value_now = present_from_principal_down(account_state.principal, index);
        let value_at_last_claim =
            present_from_principal_down(account_state.principal, account_state.last_claim_index);
        account_state.last_claim_index = index;

        // Monotone index: value_now >= value_at_last_claim; clamped at zero.
        Ok(if value_now > value_at_last_claim {
            value_now - value_at_last_claim
        } else {
            U256::zero()
        })
    }

    // ---- registrar-gated transitions ------------------------------------

    /// [`Self::start_earning`], gated on the presented registrar: the
    /// registrar must be the one this token is bound to and must list the
    /// account as an approved earner.
    pub fn start_earning_approved(
        &mut self,
        registrar: &dyn Registrar,
        account: Address,
        current_non_earning_balance: U256,
        now: u64,
    ) -> Result<(), MeridianError> {
        if registrar.id() != self.registrar_id {
            return Err(MeridianError::InvalidRegistrar);
        }
        if !registrar.is_approved_earner(&account) {
            return Err(MeridianError::NotApprovedEarner { account });
        }
        self.start_earning(account, current_non_earning_balance, now)
    }

    /// [`Self::stop_earning`] on behalf of someone else: an external actor
    /// may only evict accounts that are no longer approved earners.
    pub fn stop_earning_for(
        &mut self,
        registrar: &dyn Registrar,
        account: Address,
        now: u64,
    ) -> Result<Option<(U256, u128)>, MeridianError> {
        if registrar.id() != self.registrar_id {
            return Err(MeridianError::InvalidRegistrar);
        }
        if registrar.is_approved_earner(&account) {
            return Err(MeridianError::IsApprovedEarner { account });
        }
        self.stop_earning(account, now)
    }

    /// Sum of principal across all earning accounts. O(accounts); used by
    /// tests and host-side audits to confirm the stored total.
    pub fn audit_principal_total(&self) -> u128 {
        self.earning.values().map(|a| a.principal).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_math::EXP_ONE;

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 32];
        bytes[0] = n;
        bytes
    }

    fn registrar_id() -> RegistrarId {
        [9u8; 32]
    }

    /// Minimal registrar for gating tests: fixed id, fixed earners list.
    struct TestRegistrar {
        id: RegistrarId,
        earners: Vec<Address>,
    }

    impl Registrar for TestRegistrar {
        fn id(&self) -> RegistrarId {
            self.id
        }

        fn get(&self, _key: &str) -> U256 {
            U256::zero()
        }

        fn is_approved_earner(&self, account: &Address) -> bool {
            self.earners.contains(account)
        }
    }

    fn token() -> TokenState {
        TokenState::new(registrar_id(), 0)
    }

    #[test]
    fn test_mint_zero_amount_aborts() {
        let mut state = token();
        assert_eq!(
            state.mint(addr(1), U256::zero(), 0),
            Err(MeridianError::InsufficientAmount)
        );
    }

    #[test]
    fn test_mint_to_zero_address_aborts() {
        let mut state = token();
        assert_eq!(
            state.mint(ZERO_ADDRESS, U256::from(1u8), 0),
            Err(MeridianError::InvalidRecipient)
        );
    }

    #[test]
    fn test_mint_non_earning_adds_to_total() {
        let mut state = token();
        state.mint(addr(1), U256::from(1_000u64), 0).unwrap();
        assert_eq!(state.total_non_earning_supply(), U256::from(1_000u64));
        assert_eq!(state.principal_of_total_earning_supply(), 0);
        assert_eq!(
            state.drain_events(),
            vec![TokenEvent::Transfer {
                from: ZERO_ADDRESS,
                to: addr(1),
                amount: U256::from(1_000u64),
            }]
        );
    }

    #[test]
    fn test_mint_to_earner_at_initial_index_is_one_to_one() {
        let mut state = token();
        state.start_earning(addr(1), U256::zero(), 0).unwrap();
        state.mint(addr(1), U256::from(1_000u64), 0).unwrap();
        assert_eq!(state.principal_balance(&addr(1)), 1_000);
        assert_eq!(state.principal_of_total_earning_supply(), 1_000);
    }

    #[test]
    fn test_mint_to_earner_after_growth_rounds_principal_down() {
        let mut state = token();
        state.update_index(10_000, 0).unwrap();
        state.start_earning(addr(1), U256::zero(), 0).unwrap();

        // Seven days at 100% APY.
        let now = 7 * 86_400;
        state.mint(addr(1), U256::from(1_000_000_000u64), now).unwrap();
        assert_eq!(state.principal_balance(&addr(1)), 981_004_647);

        // The protocol keeps the rounding remainder: the holder's present
        // value is one unit short of the minted amount.
        let held = state.total_earning_supply(now).unwrap();
        assert_eq!(held, U256::from(999_999_999u64));
    }

    #[test]
    fn test_burn_zero_amount_aborts() {
        let mut state = token();
        assert_eq!(
            state.burn(addr(1), U256::zero(), 0),
            Err(MeridianError::InsufficientAmount)
        );
    }

    #[test]
    fn test_burn_non_earning_insufficient_aborts() {
        let mut state = token();
        state.mint(addr(1), U256::from(10u8), 0).unwrap();
        assert_eq!(
            state.burn(addr(1), U256::from(11u8), 0),
            Err(MeridianError::InsufficientBalance)
        );
        // The failed burn left the book untouched.
        assert_eq!(state.total_non_earning_supply(), U256::from(10u8));
    }

    #[test]
    fn test_burn_earning_rounds_principal_up() {
        let mut state = token();
        state.update_index(10_000, 0).unwrap();
        state.start_earning(addr(1), U256::zero(), 0).unwrap();
        let now = 7 * 86_400;
        state.mint(addr(1), U256::from(1_000_000_000u64), now).unwrap();

        let held = state.total_earning_supply(now).unwrap();
        state.burn(addr(1), held, now).unwrap();
        assert_eq!(state.principal_balance(&addr(1)), 0);
        assert_eq!(state.principal_of_total_earning_supply(), 0);
    }

    #[test]
    fn test_burn_earning_beyond_balance_aborts() {
        let mut state = token();
        state.start_earning(addr(1), U256::zero(), 0).unwrap();
        state.mint(addr(1), U256::from(100u8), 0).unwrap();
        assert_eq!(
            state.burn(addr(1), U256::from(101u8), 0),
            Err(MeridianError::InsufficientBalance)
        );
    }

    #[test]
    fn test_transfer_between_non_earners_touches_nothing() {
        let mut state = token();
        state.mint(addr(1), U256::from(500u64), 0).unwrap();
        state.drain_events();

        state.transfer(addr(1), addr(2), U256::from(200u64), 0).unwrap();
        assert_eq!(state.total_non_earning_supply(), U256::from(500u64));
        assert_eq!(
            state.drain_events(),
            vec![TokenEvent::Transfer {
                from: addr(1),
                to: addr(2),
                amount: U256::from(200u64),
            }]
        );
    }

    #[test]
    fn test_transfer_within_earning_cohort_moves_principal_in_kind() {
        let mut state = token();
        state.start_earning(addr(1), U256::zero(), 0).unwrap();
        state.start_earning(addr(2), U256::zero(), 0).unwrap();
        state.mint(addr(1), U256::from(1_000u64), 0).unwrap();

        let total_before = state.principal_of_total_earning_supply();
        state.transfer(addr(1), addr(2), U256::from(400u64), 0).unwrap();
        assert_eq!(state.principal_balance(&addr(1)), 600);
        assert_eq!(state.principal_balance(&addr(2)), 400);
        assert_eq!(state.principal_of_total_earning_supply(), total_before);
    }

    #[test]
    fn test_transfer_across_cohorts_keeps_remainder_with_protocol() {
        let mut state = token();
        state.update_index(10_000, 0).unwrap();
        state.mint(addr(1), U256::from(1_000_000_000u64), 0).unwrap();
        state.start_earning(addr(2), U256::zero(), 0).unwrap();

        let now = 30 * 86_400;
        state.transfer(addr(1), addr(2), U256::from(500_000_000u64), now).unwrap();

        // Crediting principal rounded down: the recipient's present value
        // never exceeds what the sender gave up.
        let received = state.total_earning_supply(now).unwrap();
        assert!(received <= U256::from(500_000_000u64));
        assert!(received >= U256::from(499_999_999u64));
        assert_eq!(state.total_non_earning_supply(), U256::from(500_000_000u64));

        // And back out again: the earning side debits rounded up.
        state.transfer(addr(2), addr(1), received, now).unwrap();
        assert_eq!(state.principal_balance(&addr(2)), 0);
        assert_eq!(
            state.total_non_earning_supply(),
            U256::from(500_000_000u64) + received
        );
    }

    #[test]
    fn test_start_earning_is_idempotent() {
        let mut state = token();
        state.mint(addr(1), U256::from(1_000u64), 0).unwrap();
        state.start_earning(addr(1), U256::from(1_000u64), 0).unwrap();
        let principal = state.principal_balance(&addr(1));
        state.start_earning(addr(1), U256::from(1_000u64), 5).unwrap();
        assert_eq!(state.principal_balance(&addr(1)), principal);
    }

    #[test]
    fn test_start_earning_beyond_non_earning_total_aborts() {
        let mut state = token();
        state.mint(addr(1), U256::from(100u64), 0).unwrap();
        assert_eq!(
            state.start_earning(addr(1), U256::from(101u64), 0),
            Err(MeridianError::InsufficientBalance)
        );
    }

    #[test]
    fn test_stop_earning_realizes_present_value() {
        let mut state = token();
        state.mint(addr(1), U256::from(1_000_000u64), 0).unwrap();
        state.start_earning(addr(1), U256::from(1_000_000u64), 0).unwrap();
        state.update_index(10_000, 0).unwrap();

        let now = 365 * 86_400;
        let (present, principal) = state.stop_earning(addr(1), now).unwrap().unwrap();
        assert_eq!(principal, 1_000_000);
        // One year at 100%: the index is exponent(1) = 2.718281718281.
        assert_eq!(present, U256::from(2_718_281u64));
        assert!(!state.is_earning(&addr(1)));
        assert_eq!(state.total_non_earning_supply(), present);
        assert_eq!(state.principal_of_total_earning_supply(), 0);
    }

    #[test]
    fn test_stop_earning_non_earner_is_noop() {
        let mut state = token();
        assert_eq!(state.stop_earning(addr(1), 0).unwrap(), None);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_claim_realizes_interest_without_touching_principal() {
        let mut state = token();
        state.mint(addr(1), U256::from(1_000_000u64), 0).unwrap();
        state.start_earning(addr(1), U256::from(1_000_000u64), 0).unwrap();
        state.update_index(10_000, 0).unwrap();

        let now = 365 * 86_400;
        let claimed = state.claim(addr(1), now).unwrap();
        assert_eq!(claimed, U256::from(1_718_281u64));
        assert_eq!(state.principal_balance(&addr(1)), 1_000_000);

        // The claim marker moved to the committed index.
        let account = state.earning_account(&addr(1)).unwrap();
        assert_eq!(account.last_claim_index, state.current_index(now).unwrap());

        // Claiming again at the same instant yields nothing.
        assert_eq!(state.claim(addr(1), now).unwrap(), U256::zero());
    }

    #[test]
    fn test_claim_for_non_earner_is_zero() {
        let mut state = token();
        assert_eq!(state.claim(addr(1), 0).unwrap(), U256::zero());
    }

    #[test]
    fn test_mint_overflowing_principal_total_aborts() {
        let mut state = token();
        state.start_earning(addr(1), U256::zero(), 0).unwrap();
        state.mint(addr(1), U256::from(u128::MAX), 0).unwrap();
        assert_eq!(
            state.mint(addr(1), U256::from(EXP_ONE), 0),
            Err(MeridianError::OverflowsPrincipalOfTotalSupply)
        );
        // The failed mint left both the account and the total untouched.
        assert_eq!(state.principal_balance(&addr(1)), u128::MAX);
        assert_eq!(state.principal_of_total_earning_supply(), u128::MAX);
    }

    #[test]
    fn test_mint_overflowing_non_earning_envelope_aborts() {
        let mut state = token();
        let almost_full = (U256::one() << 240usize) - U256::one();
        state.mint(addr(1), almost_full, 0).unwrap();
        assert_eq!(
            state.mint(addr(1), U256::one(), 0),
            Err(MeridianError::OverflowsPrincipalOfTotalSupply)
        );
    }

    #[test]
    fn test_update_index_backwards_in_time_aborts() {
        let mut state = token();
        state.update_index(500, 1_000).unwrap();
        assert_eq!(
            state.update_index(500, 999),
            Err(MeridianError::NegativeTimeElapsed { now: 999, latest: 1_000 })
        );
    }

    #[test]
    fn test_update_index_emits_event_only_on_commit() {
        let mut state = token();
        state.update_index(500, 1_000).unwrap();
        assert_eq!(
            state.drain_events(),
            vec![TokenEvent::IndexUpdated { index: EXP_ONE, rate: 500 }]
        );
        // Same rate, same timestamp: a no-op with no event.
        state.update_index(500, 1_000).unwrap();
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_start_earning_approved_requires_matching_registrar() {
        let mut state = token();
        state.mint(addr(1), U256::from(100u64), 0).unwrap();

        let wrong = TestRegistrar { id: [7u8; 32], earners: vec![addr(1)] };
        assert_eq!(
            state.start_earning_approved(&wrong, addr(1), U256::from(100u64), 0),
            Err(MeridianError::InvalidRegistrar)
        );

        let right = TestRegistrar { id: registrar_id(), earners: vec![] };
        assert_eq!(
            state.start_earning_approved(&right, addr(1), U256::from(100u64), 0),
            Err(MeridianError::NotApprovedEarner { account: addr(1) })
        );

        let approving = TestRegistrar { id: registrar_id(), earners: vec![addr(1)] };
        state
            .start_earning_approved(&approving, addr(1), U256::from(100u64), 0)
            .unwrap();
        assert!(state.is_earning(&addr(1)));
    }

    #[test]
    fn test_stop_earning_for_still_approved_earner_aborts() {
        let mut state = token();
        state.mint(addr(1), U256::from(100u64), 0).unwrap();
        let registrar = TestRegistrar { id: registrar_id(), earners: vec![addr(1)] };
        state
            .start_earning_approved(&registrar, addr(1), U256::from(100u64), 0)
            .unwrap();

        assert_eq!(
            state.stop_earning_for(&registrar, addr(1), 0),
            Err(MeridianError::IsApprovedEarner { account: addr(1) })
        );

        // Once de-listed, anyone may evict the account.
        let delisted = TestRegistrar { id: registrar_id(), earners: vec![] };
        let (present, principal) = state.stop_earning_for(&delisted, addr(1), 0).unwrap().unwrap();
        assert_eq!(present, U256::from(100u64));
        assert_eq!(principal, 100);
    }
}
