use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;

pub mod bridge;
pub mod constants;
pub mod contexts;
pub mod errors;
pub mod events;
pub mod helpers;
pub mod ledger;
pub mod state;

#[cfg(test)]
mod test_harness;

use constants::*;
use contexts::*;
use errors::ErrorCode;
use events::*;
use helpers::{
    load_user_account, persist_user_account, persist_yield_stake, Counterparty, NoCustody,
    SplTokenLedger,
};
use ledger::{PoolLedger, YieldClaim};
use state::*;

declare_id!("DG5vEbjqHtEaMbad53hnPYuLnr7vpNT2McguSBf99WvC");

#[program]
pub mod snowfall_staking {
    use super::*;

    /// Pool genesis: fixes the reward window and this pool's emission share.
    /// A primary pool must be created over a mint whose authority is already
    /// the pool authority PDA.
    pub fn create_pool(
        ctx: Context<CreatePool>,
        kind: PoolKind,
        base_emission_per_second: u64,
    ) -> Result<()> {
        let clock = Clock::get()?;
        let pool_key = ctx.accounts.pool.key();
        let pool_authority = ctx.accounts.pool_authority.key();

        let can_mint = ctx.accounts.stake_mint.mint_authority == COption::Some(pool_authority);
        if kind == PoolKind::Primary {
            require!(can_mint, ErrorCode::MintNotAuthorized);
        }

        let pool = PoolState::genesis(PoolGenesis {
            kind,
            owner: ctx.accounts.owner.key(),
            stake_mint: ctx.accounts.stake_mint.key(),
            vault: ctx.accounts.vault.key(),
            base_emission_per_second,
            now: clock.unix_timestamp,
            can_mint,
            bump: ctx.bumps.pool,
            authority_bump: ctx.bumps.pool_authority,
        })?;

        emit!(PoolCreated {
            pool: pool_key,
            kind,
            stake_mint: pool.stake_mint,
            emission_rate_per_second: pool.emission_rate_per_second,
            staking_start_time: pool.staking_start_time,
            staking_end_time: pool.staking_end_time,
        });
        msg!(
            "Pool created: {:?}, rate={} per second",
            kind,
            pool.emission_rate_per_second
        );

        ctx.accounts.pool.set_inner(pool);
        Ok(())
    }

    /// One-shot registration of the pool pair, called once on each pool
    pub fn initialize(
        ctx: Context<InitializePools>,
        primary_pool: Pubkey,
        secondary_pool: Pubkey,
    ) -> Result<()> {
        let clock = Clock::get()?;
        let pool_key = ctx.accounts.pool.key();

        ctx.accounts.pool.link(
            pool_key,
            ctx.accounts.owner.key(),
            primary_pool,
            secondary_pool,
        )?;

        emit!(PoolsInitialized {
            pool: pool_key,
            primary_pool,
            secondary_pool,
            timestamp: clock.unix_timestamp,
        });

        Ok(())
    }

    pub fn stake(ctx: Context<StakeTokens>, value: u64, lock_duration: i64) -> Result<()> {
        let clock = Clock::get()?;
        let pool_key = ctx.accounts.pool.key();
        let staker = ctx.accounts.staker.key();
        ctx.accounts
            .user_account
            .bind(pool_key, staker, ctx.bumps.user_account);

        let authority_bump = [ctx.accounts.pool.authority_bump];
        let seeds: [&[u8]; 3] = [POOL_AUTHORITY_SEED, pool_key.as_ref(), &authority_bump];

        let token = SplTokenLedger {
            token_program: ctx.accounts.token_program.to_account_info(),
            mint: ctx.accounts.stake_mint.to_account_info(),
            decimals: ctx.accounts.stake_mint.decimals,
            vault: ctx.accounts.vault.to_account_info(),
            pool_authority: ctx.accounts.pool_authority.to_account_info(),
            authority_seeds: &seeds,
            counterparty: Some(Counterparty {
                token_account: ctx.accounts.staker_token_account.to_account_info(),
                owner: ctx.accounts.staker.to_account_info(),
            }),
            can_mint: false,
        };

        let mut record = PoolLedger::new(pool_key, &mut ctx.accounts.pool, token).stake(
            &mut ctx.accounts.user_account,
            staker,
            value,
            lock_duration,
            clock.unix_timestamp,
        )?;
        record.bump = ctx.bumps.stake_record;

        emit_staked(&record);
        msg!(
            "Stake #{}: {} tokens locked until {}",
            record.id,
            record.value,
            record.locked_until
        );

        ctx.accounts.stake_record.set_inner(record);
        Ok(())
    }

    pub fn unstake(ctx: Context<UnstakeTokens>, stake_id: u64) -> Result<()> {
        let clock = Clock::get()?;
        let pool_key = ctx.accounts.pool.key();
        let staker = ctx.accounts.staker.key();

        let authority_bump = [ctx.accounts.pool.authority_bump];
        let seeds: [&[u8]; 3] = [POOL_AUTHORITY_SEED, pool_key.as_ref(), &authority_bump];

        let token = SplTokenLedger {
            token_program: ctx.accounts.token_program.to_account_info(),
            mint: ctx.accounts.stake_mint.to_account_info(),
            decimals: ctx.accounts.stake_mint.decimals,
            vault: ctx.accounts.vault.to_account_info(),
            pool_authority: ctx.accounts.pool_authority.to_account_info(),
            authority_seeds: &seeds,
            counterparty: Some(Counterparty {
                token_account: ctx.accounts.staker_token_account.to_account_info(),
                owner: ctx.accounts.staker.to_account_info(),
            }),
            can_mint: false,
        };

        let receipt = PoolLedger::new(pool_key, &mut ctx.accounts.pool, token).unstake(
            &mut ctx.accounts.user_account,
            &mut ctx.accounts.stake_record,
            staker,
            clock.unix_timestamp,
        )?;

        emit!(Unstaked {
            account: staker,
            pool: pool_key,
            stake_id: receipt.stake_id,
            value: receipt.value,
        });
        msg!("Unstaked #{}: {} tokens", stake_id, receipt.value);

        Ok(())
    }

    /// Claimable reward of `account` right now. Also set as return data.
    pub fn pending_rewards(ctx: Context<PendingRewards>, account: Pubkey) -> Result<u128> {
        let clock = Clock::get()?;
        let user = ctx.accounts.user_account.as_deref();

        let pending = helpers::accumulator::pending_rewards(
            &ctx.accounts.pool,
            user,
            &account,
            clock.unix_timestamp,
        )?;

        msg!("Pending rewards for {}: {}", account, pending);
        Ok(pending)
    }

    /// Claim on the primary pool: owed rewards are minted and locked as a
    /// 1 year yield stake. Nothing happens when nothing is owed.
    pub fn claim_yield_rewards(ctx: Context<ClaimYieldRewards>) -> Result<()> {
        let clock = Clock::get()?;
        let pool_key = ctx.accounts.pool.key();
        let staker = ctx.accounts.staker.key();

        let authority_bump = [ctx.accounts.pool.authority_bump];
        let seeds: [&[u8]; 3] = [POOL_AUTHORITY_SEED, pool_key.as_ref(), &authority_bump];

        let token = SplTokenLedger {
            token_program: ctx.accounts.token_program.to_account_info(),
            mint: ctx.accounts.reward_mint.to_account_info(),
            decimals: ctx.accounts.reward_mint.decimals,
            vault: ctx.accounts.vault.to_account_info(),
            pool_authority: ctx.accounts.pool_authority.to_account_info(),
            authority_seeds: &seeds,
            counterparty: None,
            can_mint: ctx.accounts.pool.can_mint,
        };

        let Some(user_account) = ctx.accounts.user_account.as_mut() else {
            msg!("Nothing to claim");
            return Ok(());
        };

        let claim = PoolLedger::new(pool_key, &mut ctx.accounts.pool, token).claim_yield_rewards(
            user_account,
            staker,
            clock.unix_timestamp,
        )?;

        let Some(YieldClaim { amount, mut stake }) = claim else {
            msg!("Nothing to claim");
            return Ok(());
        };

        persist_yield_stake(
            &ctx.accounts.staker.to_account_info(),
            &ctx.accounts.yield_stake.to_account_info(),
            &ctx.accounts.system_program.to_account_info(),
            &mut stake,
            ctx.program_id,
        )?;

        emit_staked(&stake);
        emit!(YieldRewardsClaimed {
            account: staker,
            pool: pool_key,
            amount,
        });
        msg!("Claimed {} as yield stake #{}", amount, stake.id);

        Ok(())
    }

    /// Claim on the secondary pool. The reward lands in the primary pool as
    /// a yield stake; LP tokens never move.
    pub fn claim_lp_yield_rewards(ctx: Context<ClaimLpYieldRewards>) -> Result<()> {
        let clock = Clock::get()?;
        let lp_pool_key = ctx.accounts.lp_pool.key();
        let primary_key = ctx.accounts.primary_pool.key();
        let staker = ctx.accounts.staker.key();

        let Some(lp_user_account) = ctx.accounts.lp_user_account.as_mut() else {
            msg!("Nothing to claim");
            return Ok(());
        };

        let primary_user_info = ctx.accounts.primary_user_account.to_account_info();
        let mut primary_user = load_user_account(&primary_user_info, ctx.program_id)?
            .unwrap_or_else(|| {
                UserAccount::new(primary_key, staker, ctx.bumps.primary_user_account)
            });

        let authority_bump = [ctx.accounts.primary_pool.authority_bump];
        let seeds: [&[u8]; 3] = [POOL_AUTHORITY_SEED, primary_key.as_ref(), &authority_bump];

        let token = SplTokenLedger {
            token_program: ctx.accounts.token_program.to_account_info(),
            mint: ctx.accounts.reward_mint.to_account_info(),
            decimals: ctx.accounts.reward_mint.decimals,
            vault: ctx.accounts.primary_vault.to_account_info(),
            pool_authority: ctx.accounts.primary_authority.to_account_info(),
            authority_seeds: &seeds,
            counterparty: None,
            can_mint: ctx.accounts.primary_pool.can_mint,
        };

        let mut primary = PoolLedger::new(primary_key, &mut ctx.accounts.primary_pool, token);
        let claim = bridge::claim_lp_yield_rewards(
            lp_pool_key,
            &mut ctx.accounts.lp_pool,
            lp_user_account,
            &mut primary,
            &mut primary_user,
            staker,
            clock.unix_timestamp,
        )?;

        let Some(YieldClaim { amount, mut stake }) = claim else {
            msg!("Nothing to claim");
            return Ok(());
        };

        persist_user_account(
            &ctx.accounts.staker.to_account_info(),
            &primary_user_info,
            &ctx.accounts.system_program.to_account_info(),
            &primary_user,
            ctx.program_id,
        )?;
        persist_yield_stake(
            &ctx.accounts.staker.to_account_info(),
            &ctx.accounts.yield_stake.to_account_info(),
            &ctx.accounts.system_program.to_account_info(),
            &mut stake,
            ctx.program_id,
        )?;

        emit_staked(&stake);
        emit!(YieldRewardsClaimed {
            account: staker,
            pool: lp_pool_key,
            amount,
        });
        msg!(
            "Claimed {} from LP pool as primary yield stake #{}",
            amount,
            stake.id
        );

        Ok(())
    }

    /// Raise this pool's emission by 1%. At most once a week, only inside
    /// the reward window.
    pub fn update_emission_rate(ctx: Context<UpdateEmissionRate>) -> Result<()> {
        let clock = Clock::get()?;
        let pool_key = ctx.accounts.pool.key();

        let rate = PoolLedger::new(pool_key, &mut ctx.accounts.pool, NoCustody)
            .update_emission_rate(clock.unix_timestamp)?;

        emit!(EmissionRateUpdated {
            account: ctx.accounts.caller.key(),
            pool: pool_key,
            emission_rate_per_second: rate,
            timestamp: clock.unix_timestamp,
        });
        msg!("Emission rate updated: {} per second", rate);

        Ok(())
    }

    /// Pool-to-pool yield deposit into the primary pool. `caller_pool` must
    /// be the registered secondary pool.
    pub fn stake_from_lp_pool(
        ctx: Context<StakeFromLpPool>,
        staker: Pubkey,
        amount: u64,
    ) -> Result<()> {
        let clock = Clock::get()?;
        let pool_key = ctx.accounts.pool.key();
        let caller_pool = ctx.accounts.caller_pool.key();
        ctx.accounts
            .user_account
            .bind(pool_key, staker, ctx.bumps.user_account);

        let authority_bump = [ctx.accounts.pool.authority_bump];
        let seeds: [&[u8]; 3] = [POOL_AUTHORITY_SEED, pool_key.as_ref(), &authority_bump];

        let token = SplTokenLedger {
            token_program: ctx.accounts.token_program.to_account_info(),
            mint: ctx.accounts.reward_mint.to_account_info(),
            decimals: ctx.accounts.reward_mint.decimals,
            vault: ctx.accounts.vault.to_account_info(),
            pool_authority: ctx.accounts.pool_authority.to_account_info(),
            authority_seeds: &seeds,
            counterparty: None,
            can_mint: ctx.accounts.pool.can_mint,
        };

        let mut primary = PoolLedger::new(pool_key, &mut ctx.accounts.pool, token);
        let mut stake = bridge::stake_from_lp_pool(
            &mut primary,
            caller_pool,
            &mut ctx.accounts.user_account,
            staker,
            amount,
            clock.unix_timestamp,
        )?;

        persist_yield_stake(
            &ctx.accounts.payer.to_account_info(),
            &ctx.accounts.yield_stake.to_account_info(),
            &ctx.accounts.system_program.to_account_info(),
            &mut stake,
            ctx.program_id,
        )?;

        emit_staked(&stake);
        Ok(())
    }
}

fn emit_staked(record: &StakeRecord) {
    emit!(Staked {
        account: record.owner,
        pool: record.pool,
        stake_id: record.id,
        value: record.value,
        locked_from: record.locked_from,
        locked_until: record.locked_until,
        weight: record.weight,
        is_yield: record.is_yield,
    });
}
