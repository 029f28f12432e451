use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::ErrorCode;

/// Which side of the pool pair an account is.
///
/// The primary pool stakes the reward token itself and holds the mint
/// capability. The secondary pool stakes the LP token and routes every
/// claim into the primary pool.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolKind {
    Primary,
    Secondary,
}

impl PoolKind {
    /// (numerator, denominator) of the nominal emission this pool receives
    pub const fn emission_share(self) -> (u64, u64) {
        match self {
            PoolKind::Primary => PRIMARY_EMISSION_SHARE,
            PoolKind::Secondary => SECONDARY_EMISSION_SHARE,
        }
    }
}

/// Genesis parameters for a pool
pub struct PoolGenesis {
    pub kind: PoolKind,
    pub owner: Pubkey,
    pub stake_mint: Pubkey,
    pub vault: Pubkey,
    pub base_emission_per_second: u64,
    pub now: i64,
    pub can_mint: bool,
    pub bump: u8,
    pub authority_bump: u8,
}

/// Aggregate state of one staking pool
///
/// Created once at genesis and never closed.
/// PDA Seeds: ["pool", stake_mint]
#[account]
pub struct PoolState {
    /// Primary (reward token) or secondary (LP token)
    pub kind: PoolKind,

    /// Deploying authority, the only account allowed to initialize
    pub owner: Pubkey,

    /// Token accepted by this pool
    pub stake_mint: Pubkey,

    /// Custody token account, owned by the pool authority PDA
    pub vault: Pubkey,

    /// Registered primary pool (set by initialize)
    pub primary_pool: Pubkey,

    /// Registered secondary pool (set by initialize)
    pub secondary_pool: Pubkey,

    /// One-shot initialize flag
    pub initialized: bool,

    /// Mint capability: set only on a primary pool whose authority PDA
    /// was the stake mint's authority at genesis
    pub can_mint: bool,

    /// Sum of live stake values
    pub total_tokens_in_pool: u64,

    /// Sum of live stake value * weight
    pub total_weighted_shares: u128,

    /// Reward base units emitted per second to this pool
    pub emission_rate_per_second: u64,

    /// Cumulative reward per weighted share, scaled by ACC_SCALE. Never decreases.
    pub acc_reward_per_share: u128,

    /// Last accrual timestamp, never past staking_end_time
    pub last_sync_time: i64,

    /// Genesis timestamp
    pub staking_start_time: i64,

    /// Genesis + STAKING_PERIOD
    pub staking_end_time: i64,

    /// Timestamp of the last emission increase (genesis until the first one)
    pub last_emission_update_time: i64,

    /// Lifetime rewards minted into yield stakes (primary pool only)
    pub total_yield_minted: u64,

    /// PDA bump for the pool account
    pub bump: u8,

    /// PDA bump for the pool authority
    pub authority_bump: u8,
}

impl PoolState {
    /// Account size calculation:
    /// - kind: 1 byte (enum tag)
    /// - 5 Pubkeys: 32 * 5 = 160 bytes (owner, stake_mint, vault, primary_pool, secondary_pool)
    /// - 2 bools: 2 bytes (initialized, can_mint)
    /// - 2 u128: 16 * 2 = 32 bytes (total_weighted_shares, acc_reward_per_share)
    /// - 3 u64: 8 * 3 = 24 bytes (total_tokens_in_pool, emission_rate_per_second, total_yield_minted)
    /// - 4 i64: 8 * 4 = 32 bytes (last_sync_time, staking_start_time, staking_end_time,
    ///   last_emission_update_time)
    /// - 2 u8: 2 bytes (bump, authority_bump)
    /// Total: 1 + 160 + 2 + 32 + 24 + 32 + 2 = 253 bytes
    pub const LEN: usize = 1 + 32 * 5 + 2 + 16 * 2 + 8 * 3 + 8 * 4 + 2;

    /// Fresh pool at `params.now`, with this pool's share of the nominal emission
    pub fn genesis(params: PoolGenesis) -> Result<Self> {
        require!(params.base_emission_per_second > 0, ErrorCode::InvalidEmissionRate);

        let (numerator, denominator) = params.kind.emission_share();
        let emission_rate_per_second = u64::try_from(
            (params.base_emission_per_second as u128)
                .checked_mul(numerator as u128)
                .ok_or(ErrorCode::MathOverflow)?
                / denominator as u128,
        )
        .map_err(|_| ErrorCode::MathOverflow)?;
        require!(emission_rate_per_second > 0, ErrorCode::InvalidEmissionRate);

        let staking_end_time = params
            .now
            .checked_add(STAKING_PERIOD)
            .ok_or(ErrorCode::MathOverflow)?;

        Ok(Self {
            kind: params.kind,
            owner: params.owner,
            stake_mint: params.stake_mint,
            vault: params.vault,
            primary_pool: Pubkey::default(),
            secondary_pool: Pubkey::default(),
            initialized: false,
            can_mint: params.can_mint && params.kind == PoolKind::Primary,
            total_tokens_in_pool: 0,
            total_weighted_shares: 0,
            emission_rate_per_second,
            acc_reward_per_share: 0,
            last_sync_time: params.now,
            staking_start_time: params.now,
            staking_end_time,
            last_emission_update_time: params.now,
            total_yield_minted: 0,
            bump: params.bump,
            authority_bump: params.authority_bump,
        })
    }

    /// One-time registration of the pool pair. `pool_key` is this pool's own address.
    pub fn link(
        &mut self,
        pool_key: Pubkey,
        caller: Pubkey,
        primary_pool: Pubkey,
        secondary_pool: Pubkey,
    ) -> Result<()> {
        require_keys_eq!(caller, self.owner, ErrorCode::NotAuthorized);
        require!(!self.initialized, ErrorCode::AlreadyInitialized);
        require_keys_neq!(primary_pool, secondary_pool, ErrorCode::InvalidPoolLink);

        let own_slot = match self.kind {
            PoolKind::Primary => primary_pool,
            PoolKind::Secondary => secondary_pool,
        };
        require_keys_eq!(own_slot, pool_key, ErrorCode::InvalidPoolLink);

        self.primary_pool = primary_pool;
        self.secondary_pool = secondary_pool;
        self.initialized = true;
        Ok(())
    }

    pub fn is_primary(&self) -> bool {
        self.kind == PoolKind::Primary
    }
}
