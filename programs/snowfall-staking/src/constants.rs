// ══════════════════════════════════════════════════════════════════════════════
// PDA SEEDS
// ══════════════════════════════════════════════════════════════════════════════

/// Pool state PDA: ["pool", stake_mint]
pub const POOL_SEED: &[u8] = b"pool";

/// Pool authority PDA: ["pool_authority", pool]
/// Owns the vault. On the primary pool it is also the reward mint authority.
pub const POOL_AUTHORITY_SEED: &[u8] = b"pool_authority";

/// Per-user aggregate PDA: ["user", pool, owner]
pub const USER_SEED: &[u8] = b"user";

/// Stake record PDA: ["stake", pool, owner, id (u64 LE)]
pub const STAKE_SEED: &[u8] = b"stake";

// ══════════════════════════════════════════════════════════════════════════════
// TIME
// ══════════════════════════════════════════════════════════════════════════════

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Shortest lock a user may choose (seconds)
pub const MIN_LOCK_DURATION: i64 = 1;

/// Longest lock a user may choose: 5 years (1827 days)
pub const MAX_LOCK_DURATION: i64 = 1827 * SECONDS_PER_DAY;

/// Reward window measured from pool genesis. Nothing accrues past it.
pub const STAKING_PERIOD: i64 = 1827 * SECONDS_PER_DAY;

/// Lock applied to stakes opened by a yield claim: 1 year
pub const YIELD_LOCK_DURATION: i64 = 365 * SECONDS_PER_DAY;

/// Minimum spacing between two emission rate increases: 1 week
pub const EMISSION_UPDATE_INTERVAL: i64 = 7 * SECONDS_PER_DAY;

// ══════════════════════════════════════════════════════════════════════════════
// FIXED POINT
// ══════════════════════════════════════════════════════════════════════════════

/// Weight multiplier scale: 1_000_000 = 1.0x
pub const WEIGHT_SCALE: u64 = 1_000_000;

/// Extra weight granted for a maximum-length lock (in units of WEIGHT_SCALE).
/// A 5 year lock weighs 1 + 5 = 6x.
pub const MAX_WEIGHT_BONUS: u64 = 5;

/// Yield stakes always weigh exactly 2.0x
pub const YIELD_STAKE_WEIGHT: u64 = 2 * WEIGHT_SCALE;

/// Scale of `acc_reward_per_share`
pub const ACC_SCALE: u128 = 1_000_000_000_000;

// ══════════════════════════════════════════════════════════════════════════════
// EMISSION
// ══════════════════════════════════════════════════════════════════════════════

/// Nominal emission shared by both pools at genesis (reward base units per second)
pub const BASE_EMISSION_PER_SECOND: u64 = 39_499_007_936_507_900;

/// Primary pool receives 1/10 of the nominal emission
pub const PRIMARY_EMISSION_SHARE: (u64, u64) = (1, 10);

/// Secondary (LP) pool receives 9/10 of the nominal emission
pub const SECONDARY_EMISSION_SHARE: (u64, u64) = (9, 10);

/// Weekly emission growth: rate * 101 / 100
pub const EMISSION_GROWTH_NUMERATOR: u128 = 101;
pub const EMISSION_GROWTH_DENOMINATOR: u128 = 100;
