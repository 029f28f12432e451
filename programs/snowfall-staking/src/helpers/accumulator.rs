use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::ErrorCode;
use crate::state::{PoolState, UserAccount};

/// Accrue rewards up to `now` (capped at the end of the reward window).
///
/// Must run before any change to `total_weighted_shares` so the elapsed
/// interval is credited to the share distribution that existed during it.
/// An interval with no shares is skipped, not carried forward.
pub fn sync(pool: &mut PoolState, now: i64) -> Result<()> {
    let effective_now = now.min(pool.staking_end_time);
    if effective_now <= pool.last_sync_time {
        return Ok(());
    }

    if pool.total_weighted_shares > 0 {
        let elapsed = (effective_now - pool.last_sync_time) as u128;
        let increment = (pool.emission_rate_per_second as u128)
            .checked_mul(elapsed)
            .and_then(|r| r.checked_mul(ACC_SCALE))
            .ok_or(ErrorCode::MathOverflow)?
            / pool.total_weighted_shares;

        pool.acc_reward_per_share = pool
            .acc_reward_per_share
            .checked_add(increment)
            .ok_or(ErrorCode::MathOverflow)?;

        #[cfg(feature = "verbose")]
        msg!(
            "sync: elapsed={}, shares={}, acc={}",
            elapsed,
            pool.total_weighted_shares,
            pool.acc_reward_per_share
        );
    }

    pool.last_sync_time = effective_now;
    Ok(())
}

/// Reward earned by `user` since its last settlement, at the pool's current accumulator
pub fn accrued_since_settlement(pool: &PoolState, user: &UserAccount) -> Result<u128> {
    let delta = pool
        .acc_reward_per_share
        .checked_sub(user.reward_debt_per_share)
        .ok_or(ErrorCode::MathOverflow)?;
    let owed = delta
        .checked_mul(user.total_weighted_shares)
        .ok_or(ErrorCode::MathOverflow)?
        / ACC_SCALE;

    Ok(owed)
}

/// Move newly accrued reward into `pending_yield` and reset the debt baseline.
/// Call after `sync` on every operation that changes the user's shares or pays out.
/// Returns the amount settled by this call.
pub fn settle_user(pool: &PoolState, user: &mut UserAccount) -> Result<u128> {
    let owed = accrued_since_settlement(pool, user)?;
    user.pending_yield = user
        .pending_yield
        .checked_add(owed)
        .ok_or(ErrorCode::MathOverflow)?;
    user.reward_debt_per_share = pool.acc_reward_per_share;
    Ok(owed)
}

/// Sync, settle and drain the user's claimable reward.
/// At most u64::MAX is drained per call; any excess stays pending.
pub fn take_rewards(pool: &mut PoolState, user: &mut UserAccount, now: i64) -> Result<u64> {
    sync(pool, now)?;
    settle_user(pool, user)?;

    let payout = u64::try_from(user.pending_yield).unwrap_or(u64::MAX);
    user.pending_yield -= payout as u128;
    Ok(payout)
}

/// Claimable reward at `now`, computed on a scratch copy of the pool.
/// An owner who never staked (no account) has nothing pending.
pub fn pending_rewards(
    pool: &PoolState,
    user: Option<&UserAccount>,
    account: &Pubkey,
    now: i64,
) -> Result<u128> {
    require_keys_neq!(*account, Pubkey::default(), ErrorCode::InvalidStakerAddress);

    let Some(user) = user else {
        return Ok(0);
    };

    let mut scratch = pool.clone();
    sync(&mut scratch, now)?;
    let owed = accrued_since_settlement(&scratch, user)?;

    user.pending_yield
        .checked_add(owed)
        .ok_or(ErrorCode::MathOverflow.into())
}
