use anchor_lang::prelude::*;

/// One deposit
///
/// Never closed: unstaking zeroes `value` and sets `closed`, so historical
/// ids stay addressable.
///
/// PDA Seeds: ["stake", pool, owner, id (u64 LE)]
#[account]
pub struct StakeRecord {
    /// Pool holding the stake
    pub pool: Pubkey,

    /// Staker wallet
    pub owner: Pubkey,

    /// Per-owner sequence number
    pub id: u64,

    /// Locked amount of the pool's token (0 once closed)
    pub value: u64,

    /// Lock start
    pub locked_from: i64,

    /// Unstake allowed from this timestamp on
    pub locked_until: i64,

    /// Share multiplier, WEIGHT_SCALE = 1.0x. Fixed at creation.
    pub weight: u64,

    /// Opened by a yield claim rather than a deposit
    pub is_yield: bool,

    /// Withdrawn
    pub closed: bool,

    /// PDA bump seed
    pub bump: u8,
}

impl StakeRecord {
    /// Account size calculation:
    /// - pool, owner: 32 * 2 = 64 bytes
    /// - id, value, weight: 8 * 3 = 24 bytes
    /// - locked_from, locked_until: 8 * 2 = 16 bytes
    /// - is_yield, closed, bump: 3 bytes
    /// Total: 107 bytes
    pub const LEN: usize = 32 * 2 + 8 * 3 + 8 * 2 + 3;

    /// Contribution of this stake to the pool's weighted shares
    pub fn weighted_shares(&self) -> u128 {
        if self.closed {
            return 0;
        }
        self.value as u128 * self.weight as u128
    }

    pub fn is_unlocked(&self, now: i64) -> bool {
        now >= self.locked_until
    }
}
