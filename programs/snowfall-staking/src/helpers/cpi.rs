use std::io::Cursor;

use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Allocate, Assign, CreateAccount, Transfer};
use anchor_spl::token_interface::{self as token_interface, MintTo, TransferChecked};

use crate::constants::{STAKE_SEED, USER_SEED};
use crate::errors::ErrorCode;
use crate::state::{StakeRecord, UserAccount};

/// Token movements a pool performs. Implemented over SPL token CPIs on chain
/// and in memory for tests.
pub trait TokenLedger {
    /// Pull `amount` of the pool's token from the staker into custody
    fn transfer_in(&mut self, amount: u64) -> Result<()>;

    /// Return `amount` of the pool's token from custody to the staker
    fn transfer_out(&mut self, amount: u64) -> Result<()>;

    /// Mint `amount` reward tokens into custody. Only a ledger holding the
    /// mint capability may do this.
    fn mint(&mut self, amount: u64) -> Result<()>;
}

impl<L: TokenLedger + ?Sized> TokenLedger for &mut L {
    fn transfer_in(&mut self, amount: u64) -> Result<()> {
        (**self).transfer_in(amount)
    }

    fn transfer_out(&mut self, amount: u64) -> Result<()> {
        (**self).transfer_out(amount)
    }

    fn mint(&mut self, amount: u64) -> Result<()> {
        (**self).mint(amount)
    }
}

/// Ledger for a pool step that must not touch custody
pub struct NoCustody;

impl TokenLedger for NoCustody {
    fn transfer_in(&mut self, _amount: u64) -> Result<()> {
        err!(ErrorCode::MissingTokenAccount)
    }

    fn transfer_out(&mut self, _amount: u64) -> Result<()> {
        err!(ErrorCode::MissingTokenAccount)
    }

    fn mint(&mut self, _amount: u64) -> Result<()> {
        err!(ErrorCode::MintNotAuthorized)
    }
}

/// Staker side of a transfer
pub struct Counterparty<'info> {
    pub token_account: AccountInfo<'info>,
    pub owner: AccountInfo<'info>,
}

/// SPL token (or Token-2022) ledger for one pool.
///
/// Vault transfers and mints are signed by the pool authority PDA.
pub struct SplTokenLedger<'a, 'info> {
    pub token_program: AccountInfo<'info>,
    pub mint: AccountInfo<'info>,
    pub decimals: u8,
    pub vault: AccountInfo<'info>,
    pub pool_authority: AccountInfo<'info>,
    pub authority_seeds: &'a [&'a [u8]],
    pub counterparty: Option<Counterparty<'info>>,
    pub can_mint: bool,
}

impl<'a, 'info> TokenLedger for SplTokenLedger<'a, 'info> {
    fn transfer_in(&mut self, amount: u64) -> Result<()> {
        let counterparty = self
            .counterparty
            .as_ref()
            .ok_or(ErrorCode::MissingTokenAccount)?;

        token_interface::transfer_checked(
            CpiContext::new(
                self.token_program.clone(),
                TransferChecked {
                    from: counterparty.token_account.clone(),
                    mint: self.mint.clone(),
                    to: self.vault.clone(),
                    authority: counterparty.owner.clone(),
                },
            ),
            amount,
            self.decimals,
        )
    }

    fn transfer_out(&mut self, amount: u64) -> Result<()> {
        let counterparty = self
            .counterparty
            .as_ref()
            .ok_or(ErrorCode::MissingTokenAccount)?;

        token_interface::transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                TransferChecked {
                    from: self.vault.clone(),
                    mint: self.mint.clone(),
                    to: counterparty.token_account.clone(),
                    authority: self.pool_authority.clone(),
                },
                &[self.authority_seeds],
            ),
            amount,
            self.decimals,
        )
    }

    fn mint(&mut self, amount: u64) -> Result<()> {
        require!(self.can_mint, ErrorCode::MintNotAuthorized);

        token_interface::mint_to(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                MintTo {
                    mint: self.mint.clone(),
                    to: self.vault.clone(),
                    authority: self.pool_authority.clone(),
                },
                &[self.authority_seeds],
            ),
            amount,
        )
    }
}

/// How a program account gets funded at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountFunding {
    /// Empty address: a single `create_account` for the full rent
    Create { lamports: u64 },
    /// Address already holds lamports (anyone can send them): top up the
    /// rent shortfall, then allocate and assign
    Adopt { top_up: u64 },
}

/// Funding path for an address holding `current_lamports`
pub fn plan_funding(current_lamports: u64, rent_exempt_minimum: u64) -> AccountFunding {
    if current_lamports == 0 {
        AccountFunding::Create {
            lamports: rent_exempt_minimum,
        }
    } else {
        AccountFunding::Adopt {
            top_up: rent_exempt_minimum.saturating_sub(current_lamports),
        }
    }
}

/// Create a PDA owned by this program, `space` bytes, signed with `seeds`.
/// A pre-funded address is adopted instead of failing `create_account`.
#[inline(never)]
pub fn create_program_account<'info>(
    payer: &AccountInfo<'info>,
    account: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    space: usize,
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<()> {
    let rent_exempt_minimum = Rent::get()?.minimum_balance(space);

    match plan_funding(account.lamports(), rent_exempt_minimum) {
        AccountFunding::Create { lamports } => system_program::create_account(
            CpiContext::new_with_signer(
                system_program.clone(),
                CreateAccount {
                    from: payer.clone(),
                    to: account.clone(),
                },
                &[seeds],
            ),
            lamports,
            space as u64,
            program_id,
        ),
        AccountFunding::Adopt { top_up } => {
            if top_up > 0 {
                system_program::transfer(
                    CpiContext::new(
                        system_program.clone(),
                        Transfer {
                            from: payer.clone(),
                            to: account.clone(),
                        },
                    ),
                    top_up,
                )?;
            }
            system_program::allocate(
                CpiContext::new_with_signer(
                    system_program.clone(),
                    Allocate {
                        account_to_allocate: account.clone(),
                    },
                    &[seeds],
                ),
                space as u64,
            )?;
            system_program::assign(
                CpiContext::new_with_signer(
                    system_program.clone(),
                    Assign {
                        account_to_assign: account.clone(),
                    },
                    &[seeds],
                ),
                program_id,
            )
        }
    }
}

/// Write discriminator + data into a program-owned account
pub fn write_account<T: AccountSerialize>(account: &AccountInfo, value: &T) -> Result<()> {
    let mut data = account.try_borrow_mut_data()?;
    let mut cursor = Cursor::new(&mut data[..]);
    value.try_serialize(&mut cursor)
}

/// User account behind an address checked by seeds, None if never created
pub fn load_user_account(account: &AccountInfo, program_id: &Pubkey) -> Result<Option<UserAccount>> {
    if account.owner != program_id || account.data_is_empty() {
        return Ok(None);
    }
    let data = account.try_borrow_data()?;
    UserAccount::try_deserialize(&mut &data[..]).map(Some)
}

/// Persist a user account, creating its PDA first if it does not exist yet
pub fn persist_user_account<'info>(
    payer: &AccountInfo<'info>,
    account: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    user: &UserAccount,
    program_id: &Pubkey,
) -> Result<()> {
    if account.owner != program_id {
        let bump = [user.bump];
        let seeds: [&[u8]; 4] = [USER_SEED, user.pool.as_ref(), user.owner.as_ref(), &bump];
        create_program_account(
            payer,
            account,
            system_program,
            8 + UserAccount::LEN,
            &seeds,
            program_id,
        )?;
    }
    write_account(account, user)
}

/// Create the PDA for a yield stake record and persist it. The address is
/// checked against the record's seeds and the bump is filled in.
pub fn persist_yield_stake<'info>(
    payer: &AccountInfo<'info>,
    stake_account: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    record: &mut StakeRecord,
    program_id: &Pubkey,
) -> Result<()> {
    let id_bytes = record.id.to_le_bytes();
    let (expected, bump) = Pubkey::find_program_address(
        &[STAKE_SEED, record.pool.as_ref(), record.owner.as_ref(), &id_bytes],
        program_id,
    );
    require_keys_eq!(expected, stake_account.key(), ErrorCode::InvalidPoolLink);
    record.bump = bump;

    let bump_seed = [bump];
    let seeds: [&[u8]; 5] = [
        STAKE_SEED,
        record.pool.as_ref(),
        record.owner.as_ref(),
        &id_bytes,
        &bump_seed,
    ];
    create_program_account(
        payer,
        stake_account,
        system_program,
        8 + StakeRecord::LEN,
        &seeds,
        program_id,
    )?;
    write_account(stake_account, record)
}
