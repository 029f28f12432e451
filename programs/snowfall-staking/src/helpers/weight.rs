use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::ErrorCode;

/// Share multiplier for a lock of `lock_duration` seconds
/// Formula: weight = SCALE + 5 * SCALE * lock_duration / MAX_LOCK_DURATION
///
/// Callers validate the domain first (see `validate_lock_duration`).
/// A 1 second lock floors to exactly 1.0x, a 5 year lock gives 6.0x.
pub fn compute_weight(lock_duration: i64) -> u64 {
    let duration = lock_duration.clamp(0, MAX_LOCK_DURATION) as u128;
    let bonus = (MAX_WEIGHT_BONUS as u128 * WEIGHT_SCALE as u128 * duration)
        / MAX_LOCK_DURATION as u128;

    // bonus <= 5 * WEIGHT_SCALE after the clamp
    WEIGHT_SCALE + bonus as u64
}

/// Rejects locks outside [MIN_LOCK_DURATION, MAX_LOCK_DURATION]
pub fn validate_lock_duration(lock_duration: i64) -> Result<()> {
    require!(
        (MIN_LOCK_DURATION..=MAX_LOCK_DURATION).contains(&lock_duration),
        ErrorCode::InvalidLockPeriod
    );
    Ok(())
}
