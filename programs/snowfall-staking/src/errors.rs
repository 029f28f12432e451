use anchor_lang::prelude::*;

/// Snowfall Staking Error Codes
///
/// Input validation, state/timing guards and authorization failures.
/// Every failure aborts the whole instruction.
#[error_code]
pub enum ErrorCode {
    // Input validation
    #[msg("Stake value cannot be zero")]
    ValueCannotBeZero,

    #[msg("Lock duration must be between 1 second and 5 years")]
    InvalidLockPeriod,

    #[msg("Invalid staker address")]
    InvalidStakerAddress,

    #[msg("Emission rate must be greater than zero")]
    InvalidEmissionRate,

    // State and timing guards
    #[msg("Stake is still locked")]
    NotUnlockedYet,

    #[msg("Emission rate cannot be updated yet")]
    CannotUpdateRewardRatioYet,

    #[msg("Pools already initialized")]
    AlreadyInitialized,

    #[msg("Stake already withdrawn")]
    StakeAlreadyClosed,

    // Authorization
    #[msg("Unauthorized")]
    NotAuthorized,

    #[msg("Caller is not the registered LP pool")]
    NotFromLPPool,

    #[msg("This function cannot be called on the LP pool")]
    CannotCallThisFunction,

    #[msg("Pool does not hold minting rights")]
    MintNotAuthorized,

    #[msg("Stake or account does not belong to the caller")]
    StakeOwnerMismatch,

    // Configuration
    #[msg("Wrong pool kind for this instruction")]
    InvalidPoolKind,

    #[msg("Pool link does not match the registered pools")]
    InvalidPoolLink,

    #[msg("Token account missing for this transfer")]
    MissingTokenAccount,

    #[msg("Math overflow")]
    MathOverflow,
}
