use anchor_lang::prelude::*;

/// Per-pool, per-owner reward bookkeeping
///
/// Created lazily on first stake and never closed; its share total simply
/// returns to zero once every stake is withdrawn.
///
/// PDA Seeds: ["user", pool, owner]
#[account]
pub struct UserAccount {
    /// Pool this account belongs to
    pub pool: Pubkey,

    /// Wallet that owns the stakes
    pub owner: Pubkey,

    /// Sum of value * weight over this owner's live stakes
    pub total_weighted_shares: u128,

    /// Pool accumulator value at the last settlement
    pub reward_debt_per_share: u128,

    /// Settled but unclaimed rewards. Wider than a token amount: a claim pays
    /// out at most u64::MAX and leaves the rest here.
    pub pending_yield: u128,

    /// Id the next stake record will take
    pub next_stake_id: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl UserAccount {
    /// Account size calculation:
    /// - pool: 32 bytes (Pubkey)
    /// - owner: 32 bytes (Pubkey)
    /// - total_weighted_shares: 16 bytes (u128)
    /// - reward_debt_per_share: 16 bytes (u128)
    /// - pending_yield: 16 bytes (u128)
    /// - next_stake_id: 8 bytes (u64)
    /// - bump: 1 byte
    /// Total: 121 bytes
    pub const LEN: usize = 32 + 32 + 16 + 16 + 16 + 8 + 1;

    pub fn new(pool: Pubkey, owner: Pubkey, bump: u8) -> Self {
        Self {
            pool,
            owner,
            total_weighted_shares: 0,
            reward_debt_per_share: 0,
            pending_yield: 0,
            next_stake_id: 0,
            bump,
        }
    }

    /// Fills identity fields of an account created by `init_if_needed`.
    /// No-op on an account that is already bound.
    pub fn bind(&mut self, pool: Pubkey, owner: Pubkey, bump: u8) {
        if self.owner == Pubkey::default() {
            *self = Self::new(pool, owner, bump);
        }
    }
}
