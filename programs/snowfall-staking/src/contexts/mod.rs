use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::state::*;

// ACCOUNTS - Instruction account validation structs

/// CreatePool - Pool genesis
///
/// The vault is the pool authority's associated token account for the stake
/// mint. A primary pool additionally requires the stake mint's authority to
/// be the pool authority PDA (checked in the handler).
#[derive(Accounts)]
pub struct CreatePool<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(
        init,
        payer = owner,
        space = 8 + PoolState::LEN,
        seeds = [POOL_SEED, stake_mint.key().as_ref()],
        bump
    )]
    pub pool: Box<Account<'info, PoolState>>,
    /// CHECK: PDA - signs vault transfers and reward mints
    #[account(seeds = [POOL_AUTHORITY_SEED, pool.key().as_ref()], bump)]
    pub pool_authority: UncheckedAccount<'info>,
    #[account(
        init,
        payer = owner,
        associated_token::mint = stake_mint,
        associated_token::authority = pool_authority,
        associated_token::token_program = token_program
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,
    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

/// InitializePools - Register the primary/secondary pair on one pool
/// Owner and one-shot checks run in the handler so their errors keep a fixed order.
#[derive(Accounts)]
pub struct InitializePools<'info> {
    pub owner: Signer<'info>,
    #[account(mut, seeds = [POOL_SEED, pool.stake_mint.as_ref()], bump = pool.bump)]
    pub pool: Box<Account<'info, PoolState>>,
}

#[derive(Accounts)]
pub struct StakeTokens<'info> {
    #[account(mut)]
    pub staker: Signer<'info>,
    #[account(mut, seeds = [POOL_SEED, pool.stake_mint.as_ref()], bump = pool.bump)]
    pub pool: Box<Account<'info, PoolState>>,
    #[account(
        init_if_needed,
        payer = staker,
        space = 8 + UserAccount::LEN,
        seeds = [USER_SEED, pool.key().as_ref(), staker.key().as_ref()],
        bump
    )]
    pub user_account: Box<Account<'info, UserAccount>>,
    #[account(
        init,
        payer = staker,
        space = 8 + StakeRecord::LEN,
        seeds = [
            STAKE_SEED,
            pool.key().as_ref(),
            staker.key().as_ref(),
            user_account.next_stake_id.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub stake_record: Box<Account<'info, StakeRecord>>,
    #[account(address = pool.stake_mint @ ErrorCode::InvalidPoolLink)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(
        mut,
        token::mint = stake_mint,
        token::authority = staker
    )]
    pub staker_token_account: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(mut, address = pool.vault @ ErrorCode::InvalidPoolLink)]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,
    /// CHECK: PDA - vault owner
    #[account(seeds = [POOL_AUTHORITY_SEED, pool.key().as_ref()], bump = pool.authority_bump)]
    pub pool_authority: UncheckedAccount<'info>,
    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

/// UnstakeTokens - Withdraw one unlocked stake
/// The stake record's seeds include the signer, so only the owner can address it.
#[derive(Accounts)]
#[instruction(stake_id: u64)]
pub struct UnstakeTokens<'info> {
    #[account(mut)]
    pub staker: Signer<'info>,
    #[account(mut, seeds = [POOL_SEED, pool.stake_mint.as_ref()], bump = pool.bump)]
    pub pool: Box<Account<'info, PoolState>>,
    #[account(
        mut,
        seeds = [USER_SEED, pool.key().as_ref(), staker.key().as_ref()],
        bump = user_account.bump
    )]
    pub user_account: Box<Account<'info, UserAccount>>,
    #[account(
        mut,
        seeds = [
            STAKE_SEED,
            pool.key().as_ref(),
            staker.key().as_ref(),
            stake_id.to_le_bytes().as_ref()
        ],
        bump = stake_record.bump
    )]
    pub stake_record: Box<Account<'info, StakeRecord>>,
    #[account(address = pool.stake_mint @ ErrorCode::InvalidPoolLink)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(
        mut,
        token::mint = stake_mint,
        token::authority = staker
    )]
    pub staker_token_account: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(mut, address = pool.vault @ ErrorCode::InvalidPoolLink)]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,
    /// CHECK: PDA - signs the vault transfer
    #[account(seeds = [POOL_AUTHORITY_SEED, pool.key().as_ref()], bump = pool.authority_bump)]
    pub pool_authority: UncheckedAccount<'info>,
    pub token_program: Interface<'info, TokenInterface>,
}

/// PendingRewards - Read-only reward preview
/// `user_account` is omitted for an owner who never staked.
#[derive(Accounts)]
#[instruction(account: Pubkey)]
pub struct PendingRewards<'info> {
    #[account(seeds = [POOL_SEED, pool.stake_mint.as_ref()], bump = pool.bump)]
    pub pool: Box<Account<'info, PoolState>>,
    #[account(
        seeds = [USER_SEED, pool.key().as_ref(), account.as_ref()],
        bump = user_account.bump
    )]
    pub user_account: Option<Account<'info, UserAccount>>,
}

/// ClaimYieldRewards - Claim on the primary pool
///
/// `yield_stake` is the address the next stake record will take; it is only
/// created when rewards are owed.
#[derive(Accounts)]
pub struct ClaimYieldRewards<'info> {
    #[account(mut)]
    pub staker: Signer<'info>,
    #[account(
        mut,
        seeds = [POOL_SEED, pool.stake_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.is_primary() @ ErrorCode::InvalidPoolKind
    )]
    pub pool: Box<Account<'info, PoolState>>,
    #[account(
        mut,
        seeds = [USER_SEED, pool.key().as_ref(), staker.key().as_ref()],
        bump = user_account.bump
    )]
    pub user_account: Option<Account<'info, UserAccount>>,
    /// CHECK: stake PDA for the next id, derived and checked by the handler
    /// before it is created
    #[account(mut)]
    pub yield_stake: UncheckedAccount<'info>,
    #[account(mut, address = pool.stake_mint @ ErrorCode::InvalidPoolLink)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(mut, address = pool.vault @ ErrorCode::InvalidPoolLink)]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,
    /// CHECK: PDA - reward mint authority
    #[account(seeds = [POOL_AUTHORITY_SEED, pool.key().as_ref()], bump = pool.authority_bump)]
    pub pool_authority: UncheckedAccount<'info>,
    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

/// ClaimLpYieldRewards - Claim on the secondary (LP) pool
///
/// Drains the LP pool's bookkeeping and deposits the reward as a yield stake
/// in the registered primary pool. The primary user account is created only
/// when a reward is actually deposited.
#[derive(Accounts)]
pub struct ClaimLpYieldRewards<'info> {
    #[account(mut)]
    pub staker: Signer<'info>,
    #[account(
        mut,
        seeds = [POOL_SEED, lp_pool.stake_mint.as_ref()],
        bump = lp_pool.bump,
        constraint = !lp_pool.is_primary() @ ErrorCode::InvalidPoolKind
    )]
    pub lp_pool: Box<Account<'info, PoolState>>,
    #[account(
        mut,
        seeds = [USER_SEED, lp_pool.key().as_ref(), staker.key().as_ref()],
        bump = lp_user_account.bump
    )]
    pub lp_user_account: Option<Account<'info, UserAccount>>,
    #[account(
        mut,
        seeds = [POOL_SEED, primary_pool.stake_mint.as_ref()],
        bump = primary_pool.bump,
        address = lp_pool.primary_pool @ ErrorCode::InvalidPoolLink
    )]
    pub primary_pool: Box<Account<'info, PoolState>>,
    /// CHECK: PDA - user account in the primary pool, created by the handler
    /// only when a reward is deposited
    #[account(
        mut,
        seeds = [USER_SEED, primary_pool.key().as_ref(), staker.key().as_ref()],
        bump
    )]
    pub primary_user_account: UncheckedAccount<'info>,
    /// CHECK: stake PDA for the next id, derived and checked by the handler
    /// before it is created
    #[account(mut)]
    pub yield_stake: UncheckedAccount<'info>,
    #[account(mut, address = primary_pool.stake_mint @ ErrorCode::InvalidPoolLink)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(mut, address = primary_pool.vault @ ErrorCode::InvalidPoolLink)]
    pub primary_vault: Box<InterfaceAccount<'info, TokenAccount>>,
    /// CHECK: PDA - reward mint authority
    #[account(
        seeds = [POOL_AUTHORITY_SEED, primary_pool.key().as_ref()],
        bump = primary_pool.authority_bump
    )]
    pub primary_authority: UncheckedAccount<'info>,
    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

/// StakeFromLpPool - Pool-to-pool yield deposit
///
/// `caller_pool` must be the registered secondary pool's address, which only
/// this program can sign for. Any other signer is rejected in the handler.
#[derive(Accounts)]
#[instruction(staker: Pubkey)]
pub struct StakeFromLpPool<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    pub caller_pool: Signer<'info>,
    #[account(mut, seeds = [POOL_SEED, pool.stake_mint.as_ref()], bump = pool.bump)]
    pub pool: Box<Account<'info, PoolState>>,
    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + UserAccount::LEN,
        seeds = [USER_SEED, pool.key().as_ref(), staker.as_ref()],
        bump
    )]
    pub user_account: Box<Account<'info, UserAccount>>,
    /// CHECK: PDA - created by the handler
    #[account(
        mut,
        seeds = [
            STAKE_SEED,
            pool.key().as_ref(),
            staker.as_ref(),
            user_account.next_stake_id.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub yield_stake: UncheckedAccount<'info>,
    #[account(mut, address = pool.stake_mint @ ErrorCode::InvalidPoolLink)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(mut, address = pool.vault @ ErrorCode::InvalidPoolLink)]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,
    /// CHECK: PDA - reward mint authority
    #[account(seeds = [POOL_AUTHORITY_SEED, pool.key().as_ref()], bump = pool.authority_bump)]
    pub pool_authority: UncheckedAccount<'info>,
    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

/// UpdateEmissionRate - Weekly 1% growth, callable by anyone
#[derive(Accounts)]
pub struct UpdateEmissionRate<'info> {
    pub caller: Signer<'info>,
    #[account(mut, seeds = [POOL_SEED, pool.stake_mint.as_ref()], bump = pool.bump)]
    pub pool: Box<Account<'info, PoolState>>,
}
