use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::ErrorCode;
use crate::helpers::accumulator::{self, settle_user, sync};
use crate::helpers::{compute_weight, validate_lock_duration, TokenLedger};
use crate::state::{PoolState, StakeRecord, UserAccount};

/// Outcome of a withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnstakeReceipt {
    pub stake_id: u64,
    pub value: u64,
}

/// Outcome of a claim that paid out: the amount minted and the yield
/// stake opened with it in the primary pool
#[derive(Clone)]
pub struct YieldClaim {
    pub amount: u64,
    pub stake: StakeRecord,
}

/// Stake lifecycle of one pool.
///
/// Borrows the pool for the duration of one instruction and moves tokens
/// through `T`. Both pools run the same code; they differ only in
/// configuration (`kind`, emission share, mint capability).
pub struct PoolLedger<'a, T: TokenLedger> {
    pool_key: Pubkey,
    pool: &'a mut PoolState,
    token: T,
}

impl<'a, T: TokenLedger> PoolLedger<'a, T> {
    pub fn new(pool_key: Pubkey, pool: &'a mut PoolState, token: T) -> Self {
        Self {
            pool_key,
            pool,
            token,
        }
    }

    pub fn pool_key(&self) -> Pubkey {
        self.pool_key
    }

    pub fn pool(&self) -> &PoolState {
        &*self.pool
    }

    /// Deposit `value` locked for `lock_duration` seconds.
    ///
    /// Returns the new record; the caller persists it under
    /// ["stake", pool, staker, record.id].
    pub fn stake(
        &mut self,
        user: &mut UserAccount,
        staker: Pubkey,
        value: u64,
        lock_duration: i64,
        now: i64,
    ) -> Result<StakeRecord> {
        require!(value > 0, ErrorCode::ValueCannotBeZero);
        validate_lock_duration(lock_duration)?;
        self.check_owner(user, staker)?;

        sync(self.pool, now)?;
        settle_user(self.pool, user)?;

        self.token.transfer_in(value)?;

        let weight = compute_weight(lock_duration);
        self.append_stake(user, staker, value, lock_duration, weight, false, now)
    }

    /// Withdraw an unlocked stake. The record stays, zeroed and closed.
    pub fn unstake(
        &mut self,
        user: &mut UserAccount,
        record: &mut StakeRecord,
        staker: Pubkey,
        now: i64,
    ) -> Result<UnstakeReceipt> {
        self.check_owner(user, staker)?;
        require_keys_eq!(record.owner, staker, ErrorCode::StakeOwnerMismatch);
        require_keys_eq!(record.pool, self.pool_key, ErrorCode::InvalidPoolLink);
        require!(!record.closed, ErrorCode::StakeAlreadyClosed);
        require!(record.is_unlocked(now), ErrorCode::NotUnlockedYet);

        sync(self.pool, now)?;
        settle_user(self.pool, user)?;

        let value = record.value;
        let shares = record.weighted_shares();

        self.pool.total_tokens_in_pool = self
            .pool
            .total_tokens_in_pool
            .checked_sub(value)
            .ok_or(ErrorCode::MathOverflow)?;
        self.pool.total_weighted_shares = self
            .pool
            .total_weighted_shares
            .checked_sub(shares)
            .ok_or(ErrorCode::MathOverflow)?;
        user.total_weighted_shares = user
            .total_weighted_shares
            .checked_sub(shares)
            .ok_or(ErrorCode::MathOverflow)?;

        record.value = 0;
        record.closed = true;

        self.token.transfer_out(value)?;

        Ok(UnstakeReceipt {
            stake_id: record.id,
            value,
        })
    }

    /// Settle and drain the caller's claimable reward. Token movement and the
    /// resulting yield stake are the caller's next step (directly on the
    /// primary pool, through the bridge from the secondary pool).
    pub fn take_rewards(&mut self, user: &mut UserAccount, staker: Pubkey, now: i64) -> Result<u64> {
        require_keys_neq!(staker, Pubkey::default(), ErrorCode::InvalidStakerAddress);
        self.check_owner(user, staker)?;
        accumulator::take_rewards(self.pool, user, now)
    }

    /// Claim on this pool, which must be the primary pool. Zero owed is a
    /// silent no-op (`None`).
    pub fn claim_yield_rewards(
        &mut self,
        user: &mut UserAccount,
        staker: Pubkey,
        now: i64,
    ) -> Result<Option<YieldClaim>> {
        require!(self.pool.is_primary(), ErrorCode::InvalidPoolKind);

        let amount = self.take_rewards(user, staker, now)?;
        if amount == 0 {
            return Ok(None);
        }

        let stake = self.open_yield_stake(user, staker, amount, now)?;
        Ok(Some(YieldClaim { amount, stake }))
    }

    /// Mint `amount` into custody and lock it for one year at 2.0x for `staker`
    pub fn open_yield_stake(
        &mut self,
        user: &mut UserAccount,
        staker: Pubkey,
        amount: u64,
        now: i64,
    ) -> Result<StakeRecord> {
        require!(self.pool.is_primary(), ErrorCode::InvalidPoolKind);
        require!(amount > 0, ErrorCode::ValueCannotBeZero);
        self.check_owner(user, staker)?;

        sync(self.pool, now)?;
        settle_user(self.pool, user)?;

        self.token.mint(amount)?;
        self.pool.total_yield_minted = self
            .pool
            .total_yield_minted
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;

        self.append_stake(
            user,
            staker,
            amount,
            YIELD_LOCK_DURATION,
            YIELD_STAKE_WEIGHT,
            true,
            now,
        )
    }

    /// Weekly 1% emission increase. "Too soon" and "reward period over"
    /// share one error.
    pub fn update_emission_rate(&mut self, now: i64) -> Result<u64> {
        let since_last = now.saturating_sub(self.pool.last_emission_update_time);
        require!(
            since_last >= EMISSION_UPDATE_INTERVAL && now < self.pool.staking_end_time,
            ErrorCode::CannotUpdateRewardRatioYet
        );

        // credit the elapsed interval at the old rate
        sync(self.pool, now)?;

        let grown = (self.pool.emission_rate_per_second as u128)
            .checked_mul(EMISSION_GROWTH_NUMERATOR)
            .ok_or(ErrorCode::MathOverflow)?
            / EMISSION_GROWTH_DENOMINATOR;
        self.pool.emission_rate_per_second =
            u64::try_from(grown).map_err(|_| ErrorCode::MathOverflow)?;
        self.pool.last_emission_update_time = now;

        Ok(self.pool.emission_rate_per_second)
    }

    /// Append a record and grow pool and user aggregates. Expects sync and
    /// settlement to have run at `now`.
    #[allow(clippy::too_many_arguments)]
    fn append_stake(
        &mut self,
        user: &mut UserAccount,
        staker: Pubkey,
        value: u64,
        lock_duration: i64,
        weight: u64,
        is_yield: bool,
        now: i64,
    ) -> Result<StakeRecord> {
        let record = StakeRecord {
            pool: self.pool_key,
            owner: staker,
            id: user.next_stake_id,
            value,
            locked_from: now,
            locked_until: now
                .checked_add(lock_duration)
                .ok_or(ErrorCode::MathOverflow)?,
            weight,
            is_yield,
            closed: false,
            bump: 0,
        };
        let shares = record.weighted_shares();

        self.pool.total_tokens_in_pool = self
            .pool
            .total_tokens_in_pool
            .checked_add(value)
            .ok_or(ErrorCode::MathOverflow)?;
        self.pool.total_weighted_shares = self
            .pool
            .total_weighted_shares
            .checked_add(shares)
            .ok_or(ErrorCode::MathOverflow)?;
        user.total_weighted_shares = user
            .total_weighted_shares
            .checked_add(shares)
            .ok_or(ErrorCode::MathOverflow)?;
        user.next_stake_id = user
            .next_stake_id
            .checked_add(1)
            .ok_or(ErrorCode::MathOverflow)?;

        #[cfg(feature = "verbose")]
        msg!(
            "stake {} opened: value={}, weight={}, pool shares={}",
            record.id,
            value,
            weight,
            self.pool.total_weighted_shares
        );

        Ok(record)
    }

    fn check_owner(&self, user: &UserAccount, staker: Pubkey) -> Result<()> {
        require_keys_eq!(user.owner, staker, ErrorCode::StakeOwnerMismatch);
        require_keys_eq!(user.pool, self.pool_key, ErrorCode::InvalidPoolLink);
        Ok(())
    }
}
