use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::helpers::{NoCustody, TokenLedger};
use crate::ledger::{PoolLedger, YieldClaim};
use crate::state::{PoolState, StakeRecord, UserAccount};

/// Pool-to-pool entry on the primary pool: mint `amount` and open a yield
/// stake for `staker`, on behalf of the registered secondary pool.
///
/// Routing is one-directional. Called against the secondary pool it always
/// fails, whoever the caller is, since only the primary pool can mint.
pub fn stake_from_lp_pool<T: TokenLedger>(
    primary: &mut PoolLedger<'_, T>,
    caller_pool: Pubkey,
    primary_user: &mut UserAccount,
    staker: Pubkey,
    amount: u64,
    now: i64,
) -> Result<StakeRecord> {
    require!(primary.pool().is_primary(), ErrorCode::CannotCallThisFunction);
    require_keys_neq!(staker, Pubkey::default(), ErrorCode::InvalidStakerAddress);
    require_keys_eq!(
        caller_pool,
        primary.pool().secondary_pool,
        ErrorCode::NotFromLPPool
    );

    primary.open_yield_stake(primary_user, staker, amount, now)
}

/// Claim on the secondary pool. Rewards are drained from the secondary
/// pool's bookkeeping and deposited as a yield stake in the primary pool;
/// the secondary pool's token and share totals are untouched.
///
/// Zero owed is a silent no-op (`None`).
pub fn claim_lp_yield_rewards<T: TokenLedger>(
    lp_pool_key: Pubkey,
    lp_pool: &mut PoolState,
    lp_user: &mut UserAccount,
    primary: &mut PoolLedger<'_, T>,
    primary_user: &mut UserAccount,
    staker: Pubkey,
    now: i64,
) -> Result<Option<YieldClaim>> {
    require!(!lp_pool.is_primary(), ErrorCode::InvalidPoolKind);
    require_keys_eq!(
        lp_pool.primary_pool,
        primary.pool_key(),
        ErrorCode::InvalidPoolLink
    );

    // the secondary pool never moves tokens on a claim
    let amount =
        PoolLedger::new(lp_pool_key, lp_pool, NoCustody).take_rewards(lp_user, staker, now)?;
    if amount == 0 {
        return Ok(None);
    }

    let stake = stake_from_lp_pool(primary, lp_pool_key, primary_user, staker, amount, now)?;
    Ok(Some(YieldClaim { amount, stake }))
}
