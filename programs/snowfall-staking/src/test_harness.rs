// ============================================================================
// IN-MEMORY PROGRAM DRIVER FOR UNIT TESTS
// ============================================================================
//
// Runs the pool ledgers and the bridge against plain structs, with token
// balances held in a HashMap. Each operation works on copies and commits
// only on success, the same all-or-nothing outcome a failed instruction has
// on chain.
// ============================================================================

use std::collections::HashMap;

use anchor_lang::prelude::*;

use crate::bridge;
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::helpers::{accumulator, NoCustody, TokenLedger};
use crate::ledger::{PoolLedger, UnstakeReceipt, YieldClaim};
use crate::state::*;

/// Genesis timestamp of every harness
pub const T0: i64 = 1_700_000_000;

/// Balances of one token
#[derive(Clone, Default)]
pub struct TokenBook {
    pub balances: HashMap<Pubkey, u64>,
    pub supply: u64,
}

impl TokenBook {
    pub fn balance(&self, holder: &Pubkey) -> u64 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    fn debit(&mut self, holder: Pubkey, amount: u64) -> Result<()> {
        let balance = self.balances.entry(holder).or_default();
        *balance = balance
            .checked_sub(amount)
            .ok_or(ProgramError::InsufficientFunds)?;
        Ok(())
    }

    fn credit(&mut self, holder: Pubkey, amount: u64) -> Result<()> {
        let balance = self.balances.entry(holder).or_default();
        *balance = balance.checked_add(amount).ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }
}

/// `TokenLedger` over a `TokenBook`
pub struct MemoryLedger<'a> {
    pub book: &'a mut TokenBook,
    pub vault: Pubkey,
    pub counterparty: Option<Pubkey>,
    pub can_mint: bool,
}

impl TokenLedger for MemoryLedger<'_> {
    fn transfer_in(&mut self, amount: u64) -> Result<()> {
        let from = self.counterparty.ok_or(ErrorCode::MissingTokenAccount)?;
        self.book.debit(from, amount)?;
        self.book.credit(self.vault, amount)
    }

    fn transfer_out(&mut self, amount: u64) -> Result<()> {
        let to = self.counterparty.ok_or(ErrorCode::MissingTokenAccount)?;
        self.book.debit(self.vault, amount)?;
        self.book.credit(to, amount)
    }

    fn mint(&mut self, amount: u64) -> Result<()> {
        require!(self.can_mint, ErrorCode::MintNotAuthorized);
        self.book.supply = self
            .book
            .supply
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        self.book.credit(self.vault, amount)
    }
}

/// Both pools, their users and stakes, and the two token books
pub struct Harness {
    pub now: i64,
    pub owner: Pubkey,
    pub primary_key: Pubkey,
    pub secondary_key: Pubkey,
    pub primary: PoolState,
    pub secondary: PoolState,
    pub users: HashMap<(Pubkey, Pubkey), UserAccount>,
    pub stakes: HashMap<(Pubkey, Pubkey, u64), StakeRecord>,
    pub reward_token: TokenBook,
    pub lp_token: TokenBook,
}

impl Harness {
    /// Two pools created at T0 and linked to each other
    pub fn new() -> Self {
        let mut harness = Self::unlinked();
        let (primary, secondary) = (harness.primary_key, harness.secondary_key);
        let owner = harness.owner;

        harness
            .initialize(PoolKind::Primary, owner, primary, secondary)
            .unwrap();
        harness
            .initialize(PoolKind::Secondary, owner, primary, secondary)
            .unwrap();
        harness
    }

    /// Two pools at genesis, before `initialize`
    pub fn unlinked() -> Self {
        let owner = Pubkey::new_unique();
        let genesis = |kind: PoolKind| {
            PoolState::genesis(PoolGenesis {
                kind,
                owner,
                stake_mint: Pubkey::new_unique(),
                vault: Pubkey::new_unique(),
                base_emission_per_second: BASE_EMISSION_PER_SECOND,
                now: T0,
                can_mint: true,
                bump: 255,
                authority_bump: 254,
            })
            .unwrap()
        };

        Self {
            now: T0,
            owner,
            primary_key: Pubkey::new_unique(),
            secondary_key: Pubkey::new_unique(),
            primary: genesis(PoolKind::Primary),
            secondary: genesis(PoolKind::Secondary),
            users: HashMap::new(),
            stakes: HashMap::new(),
            reward_token: TokenBook::default(),
            lp_token: TokenBook::default(),
        }
    }

    pub fn advance(&mut self, seconds: i64) {
        self.now += seconds;
    }

    pub fn pool(&self, kind: PoolKind) -> &PoolState {
        match kind {
            PoolKind::Primary => &self.primary,
            PoolKind::Secondary => &self.secondary,
        }
    }

    pub fn pool_key(&self, kind: PoolKind) -> Pubkey {
        match kind {
            PoolKind::Primary => self.primary_key,
            PoolKind::Secondary => self.secondary_key,
        }
    }

    pub fn user(&self, kind: PoolKind, owner: Pubkey) -> Option<&UserAccount> {
        self.users.get(&(self.pool_key(kind), owner))
    }

    pub fn stake_record(&self, kind: PoolKind, owner: Pubkey, id: u64) -> Option<&StakeRecord> {
        self.stakes.get(&(self.pool_key(kind), owner, id))
    }

    pub fn book(&self, kind: PoolKind) -> &TokenBook {
        match kind {
            PoolKind::Primary => &self.reward_token,
            PoolKind::Secondary => &self.lp_token,
        }
    }

    /// Give `holder` tokens of the pool's stake mint
    pub fn fund(&mut self, kind: PoolKind, holder: Pubkey, amount: u64) {
        let book = match kind {
            PoolKind::Primary => &mut self.reward_token,
            PoolKind::Secondary => &mut self.lp_token,
        };
        book.credit(holder, amount).unwrap();
        book.supply += amount;
    }

    /// A funded wallet
    pub fn staker(&mut self, kind: PoolKind, amount: u64) -> Pubkey {
        let staker = Pubkey::new_unique();
        self.fund(kind, staker, amount);
        staker
    }

    pub fn initialize(
        &mut self,
        kind: PoolKind,
        caller: Pubkey,
        primary_pool: Pubkey,
        secondary_pool: Pubkey,
    ) -> Result<()> {
        let pool_key = self.pool_key(kind);
        let mut pool = self.pool(kind).clone();
        pool.link(pool_key, caller, primary_pool, secondary_pool)?;
        self.set_pool(kind, pool);
        Ok(())
    }

    pub fn stake(
        &mut self,
        kind: PoolKind,
        staker: Pubkey,
        value: u64,
        lock_duration: i64,
    ) -> Result<StakeRecord> {
        let pool_key = self.pool_key(kind);
        let mut pool = self.pool(kind).clone();
        let mut user = self.user_or_new(kind, staker);
        let mut book = self.book(kind).clone();

        let token = MemoryLedger {
            book: &mut book,
            vault: pool.vault,
            counterparty: Some(staker),
            can_mint: false,
        };
        let record =
            PoolLedger::new(pool_key, &mut pool, token).stake(&mut user, staker, value, lock_duration, self.now)?;

        self.set_pool(kind, pool);
        self.set_book(kind, book);
        self.users.insert((pool_key, staker), user);
        self.stakes.insert((pool_key, staker, record.id), record.clone());
        Ok(record)
    }

    pub fn unstake(&mut self, kind: PoolKind, staker: Pubkey, stake_id: u64) -> Result<UnstakeReceipt> {
        let pool_key = self.pool_key(kind);
        let mut pool = self.pool(kind).clone();
        let mut user = self.existing_user(kind, staker)?;
        let mut record = self
            .stake_record(kind, staker, stake_id)
            .cloned()
            .ok_or(anchor_lang::error::ErrorCode::AccountNotInitialized)?;
        let mut book = self.book(kind).clone();

        let token = MemoryLedger {
            book: &mut book,
            vault: pool.vault,
            counterparty: Some(staker),
            can_mint: false,
        };
        let receipt =
            PoolLedger::new(pool_key, &mut pool, token).unstake(&mut user, &mut record, staker, self.now)?;

        self.set_pool(kind, pool);
        self.set_book(kind, book);
        self.users.insert((pool_key, staker), user);
        self.stakes.insert((pool_key, staker, stake_id), record);
        Ok(receipt)
    }

    pub fn pending_rewards(&self, kind: PoolKind, account: Pubkey) -> Result<u128> {
        accumulator::pending_rewards(self.pool(kind), self.user(kind, account), &account, self.now)
    }

    /// Claim on either pool. A secondary claim lands in the primary pool.
    pub fn claim(&mut self, kind: PoolKind, staker: Pubkey) -> Result<Option<YieldClaim>> {
        match kind {
            PoolKind::Primary => self.claim_primary(staker),
            PoolKind::Secondary => self.claim_lp(staker),
        }
    }

    fn claim_primary(&mut self, staker: Pubkey) -> Result<Option<YieldClaim>> {
        // no account on chain: the handler returns before touching the pool
        let Some(mut user) = self.user(PoolKind::Primary, staker).cloned() else {
            return Ok(None);
        };
        let mut pool = self.primary.clone();
        let mut book = self.reward_token.clone();

        let token = MemoryLedger {
            book: &mut book,
            vault: pool.vault,
            counterparty: None,
            can_mint: pool.can_mint,
        };
        let claim = PoolLedger::new(self.primary_key, &mut pool, token)
            .claim_yield_rewards(&mut user, staker, self.now)?;

        self.primary = pool;
        self.reward_token = book;
        self.users.insert((self.primary_key, staker), user);
        self.record_yield_stake(&claim);
        Ok(claim)
    }

    fn claim_lp(&mut self, staker: Pubkey) -> Result<Option<YieldClaim>> {
        let Some(mut lp_user) = self.user(PoolKind::Secondary, staker).cloned() else {
            return Ok(None);
        };
        let mut lp_pool = self.secondary.clone();
        let mut primary_pool = self.primary.clone();
        let mut primary_user = self.user_or_new(PoolKind::Primary, staker);
        let mut book = self.reward_token.clone();

        let token = MemoryLedger {
            book: &mut book,
            vault: primary_pool.vault,
            counterparty: None,
            can_mint: primary_pool.can_mint,
        };
        let mut primary = PoolLedger::new(self.primary_key, &mut primary_pool, token);
        let claim = bridge::claim_lp_yield_rewards(
            self.secondary_key,
            &mut lp_pool,
            &mut lp_user,
            &mut primary,
            &mut primary_user,
            staker,
            self.now,
        )?;

        self.secondary = lp_pool;
        self.primary = primary_pool;
        self.reward_token = book;
        self.users.insert((self.secondary_key, staker), lp_user);
        // the primary account is only written when a reward lands in it
        if claim.is_some() {
            self.users.insert((self.primary_key, staker), primary_user);
        }
        self.record_yield_stake(&claim);
        Ok(claim)
    }

    /// Pool-to-pool entry against pool `kind`, signed by `caller_pool`
    pub fn stake_from_lp_pool(
        &mut self,
        kind: PoolKind,
        caller_pool: Pubkey,
        staker: Pubkey,
        amount: u64,
    ) -> Result<StakeRecord> {
        let pool_key = self.pool_key(kind);
        let mut pool = self.pool(kind).clone();
        let mut user = self.user_or_new(kind, staker);
        let mut book = self.reward_token.clone();

        let token = MemoryLedger {
            book: &mut book,
            vault: pool.vault,
            counterparty: None,
            can_mint: pool.can_mint,
        };
        let mut ledger = PoolLedger::new(pool_key, &mut pool, token);
        let record =
            bridge::stake_from_lp_pool(&mut ledger, caller_pool, &mut user, staker, amount, self.now)?;

        self.set_pool(kind, pool);
        self.reward_token = book;
        self.users.insert((pool_key, staker), user);
        self.stakes.insert((pool_key, staker, record.id), record.clone());
        Ok(record)
    }

    pub fn update_emission_rate(&mut self, kind: PoolKind) -> Result<u64> {
        let pool_key = self.pool_key(kind);
        let mut pool = self.pool(kind).clone();
        let rate = PoolLedger::new(pool_key, &mut pool, NoCustody).update_emission_rate(self.now)?;
        self.set_pool(kind, pool);
        Ok(rate)
    }

    fn user_or_new(&self, kind: PoolKind, owner: Pubkey) -> UserAccount {
        let mut user = self
            .user(kind, owner)
            .cloned()
            .unwrap_or_else(|| UserAccount::new(Pubkey::default(), Pubkey::default(), 0));
        user.bind(self.pool_key(kind), owner, 253);
        user
    }

    fn existing_user(&self, kind: PoolKind, owner: Pubkey) -> Result<UserAccount> {
        self.user(kind, owner)
            .cloned()
            .ok_or_else(|| error!(anchor_lang::error::ErrorCode::AccountNotInitialized))
    }

    fn record_yield_stake(&mut self, claim: &Option<YieldClaim>) {
        if let Some(claim) = claim {
            let stake = &claim.stake;
            self.stakes
                .insert((stake.pool, stake.owner, stake.id), stake.clone());
        }
    }

    fn set_pool(&mut self, kind: PoolKind, pool: PoolState) {
        match kind {
            PoolKind::Primary => self.primary = pool,
            PoolKind::Secondary => self.secondary = pool,
        }
    }

    fn set_book(&mut self, kind: PoolKind, book: TokenBook) {
        match kind {
            PoolKind::Primary => self.reward_token = book,
            PoolKind::Secondary => self.lp_token = book,
        }
    }
}

/// Anchor error number of a failed result, None on success or a non-program error
pub fn error_number<T>(result: &Result<T>) -> Option<u32> {
    match result {
        Err(anchor_lang::error::Error::AnchorError(e)) => Some(e.error_code_number),
        _ => None,
    }
}

/// Panics unless `result` failed with `expected`
pub fn assert_error<T>(result: Result<T>, expected: ErrorCode) {
    assert_eq!(
        error_number(&result),
        Some(u32::from(expected)),
        "expected error {:?}",
        expected
    );
}
