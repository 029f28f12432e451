use anchor_lang::prelude::*;

use crate::state::PoolKind;

// ══════════════════════════════════════════════════════════════════════════════
// SETUP EVENTS
// ══════════════════════════════════════════════════════════════════════════════

/// Emitted at pool genesis
#[event]
pub struct PoolCreated {
    pub pool: Pubkey,
    pub kind: PoolKind,
    pub stake_mint: Pubkey,
    pub emission_rate_per_second: u64,
    pub staking_start_time: i64,
    pub staking_end_time: i64,
}

/// Emitted when a pool learns its sibling
#[event]
pub struct PoolsInitialized {
    pub pool: Pubkey,
    pub primary_pool: Pubkey,
    pub secondary_pool: Pubkey,
    pub timestamp: i64,
}

// ══════════════════════════════════════════════════════════════════════════════
// STAKE LIFECYCLE EVENTS
// ══════════════════════════════════════════════════════════════════════════════

/// Emitted when a stake record is opened, by a deposit or by a yield claim
#[event]
pub struct Staked {
    pub account: Pubkey,
    pub pool: Pubkey,
    pub stake_id: u64,
    pub value: u64,
    pub locked_from: i64,
    pub locked_until: i64,
    pub weight: u64,
    pub is_yield: bool,
}

/// Emitted when a stake is withdrawn
#[event]
pub struct Unstaked {
    pub account: Pubkey,
    pub pool: Pubkey,
    pub stake_id: u64,
    pub value: u64,
}

// ══════════════════════════════════════════════════════════════════════════════
// REWARD EVENTS
// ══════════════════════════════════════════════════════════════════════════════

/// Emitted on the pool where the claim was made
#[event]
pub struct YieldRewardsClaimed {
    pub account: Pubkey,
    pub pool: Pubkey,
    pub amount: u64,
}

/// Emitted after a weekly emission increase
#[event]
pub struct EmissionRateUpdated {
    pub account: Pubkey,
    pub pool: Pubkey,
    pub emission_rate_per_second: u64,
    pub timestamp: i64,
}
