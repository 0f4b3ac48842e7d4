//! # Report Escrow Contract
//!
//! This contract sells report artifacts against a fixed token price. A requester
//! pays the price up front, the contract owner has a bounded time window to deliver
//! the report's content reference, and the requester can reclaim the payment once
//! that window lapses without delivery.
//!
//! ## Overview
//!
//! Funds are pulled from the requester into the contract when a report is requested
//! and stay pooled there until the report reaches a terminal state. Delivery records
//! an opaque content reference (typically an IPFS CID) and bars any later refund;
//! a lapsed deadline bars delivery and entitles the requester to a refund. The owner
//! may extend the deadline of any open report and may sweep the contract's pooled
//! balance for delivered work.
//!
//! ## Key Features
//!
//! - **Fixed-Price Escrow**: Every report costs the same configured amount
//! - **Deadline Enforcement**: Delivery only before the deadline, refund only after
//! - **One-Way Terminal States**: A report is delivered or refunded, never both
//! - **Per-Requester Index**: Each requester can enumerate their own reports
//! - **Event Emission**: All state changes emit events for off-chain indexing
//!
//! ## Security Model
//!
//! - **Authorization**: Delivery, extension and withdrawal require the owner's
//!   signature; refunds and detail reads require the report's requester (or owner)
//! - **Fail-Fast Checks**: Every precondition is verified before any token movement
//!   or storage write; a failed operation leaves no partial state behind
//! - **Host Time**: Deadline checks use the ledger timestamp, never a caller value
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! // 1. Initialize contract (one-time)
//! contract.initialize(env, owner, token, price, timeout);
//!
//! // 2. Requester pays for a report (requires prior token approval)
//! let report_id = contract.request_report(env, requester);
//!
//! // 3. Owner delivers the content reference before the deadline
//! contract.deliver_report(env, owner, report_id, content_ref);
//!
//! // 4. Or the requester reclaims the payment after the deadline
//! contract.request_refund(env, requester, report_id);
//! ```

#![no_std]

mod events;
mod registry;


pub use registry::Report;

use soroban_sdk::{
    contract, contracterror, contractimpl, token, Address, Env, String, Vec,
};

use registry::DataKey;

/// Contract errors that can occur during escrow operations.
///
/// Each error variant represents a specific failure condition with a unique error
/// code, so callers can tell a timing problem from an authorization problem from
/// a funding problem.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Contract has already been initialized and cannot be initialized again.
    AlreadyInitialized = 1,
    /// Contract has not been initialized yet. Call `initialize` first.
    NotInitialized = 2,
    /// The caller is not authorized to perform this operation.
    NotAuthorized = 3,
    /// No report found with the specified id.
    ReportNotFound = 4,
    /// The report has already been delivered; no further transition is possible.
    AlreadyDelivered = 5,
    /// The report has already been refunded; no further transition is possible.
    AlreadyRefunded = 6,
    /// The delivery deadline has passed; the report can only be refunded now.
    DeadlineExpired = 7,
    /// The deadline has not passed yet. Refunds are only allowed after it.
    DeadlineNotReached = 8,
    /// The requester's token balance is below the report price.
    InsufficientBalance = 9,
    /// The requester's allowance for this contract is below the report price.
    InsufficientAllowance = 10,
    /// The token ledger rejected a transfer.
    TransferFailed = 11,
    /// A delivered report must carry a non-empty content reference.
    EmptyContentRef = 12,
    /// The report price must be greater than zero.
    InvalidPrice = 13,
    /// The delivery timeout must be greater than zero.
    InvalidTimeout = 14,
    /// A deadline extension must be greater than zero.
    InvalidDuration = 15,
    /// Extending the deadline would overflow the timestamp.
    DeadlineOverflow = 16,
}

/// The main report escrow contract.
///
/// This contract must be initialized before use with the `initialize` function.
#[contract]
pub struct ReportEscrowContract;

#[contractimpl]
impl ReportEscrowContract {
    /// Initialize the contract with its owner, token and pricing configuration.
    ///
    /// This function must be called exactly once before any other operation.
    /// All four values are immutable afterwards.
    ///
    /// # Arguments
    ///
    /// * `env` - The contract execution environment
    /// * `owner` - Address authorized to deliver reports, extend deadlines and withdraw
    /// * `token` - Address of the token contract used for all payments
    /// * `price` - Fixed price of one report, in token base units (must be > 0)
    /// * `timeout` - Delivery window in seconds added to the creation time (must be > 0)
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If initialization succeeds
    /// * `Err(Error::AlreadyInitialized)` - If the contract was already initialized
    /// * `Err(Error::InvalidPrice)` - If `price` is zero or negative
    /// * `Err(Error::InvalidTimeout)` - If `timeout` is zero
    pub fn initialize(
        env: Env,
        owner: Address,
        token: Address,
        price: i128,
        timeout: u64,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }
        if price <= 0 {
            return Err(Error::InvalidPrice);
        }
        if timeout == 0 {
            return Err(Error::InvalidTimeout);
        }

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::Price, &price);
        env.storage().instance().set(&DataKey::Timeout, &timeout);

        events::emit_initialized(
            &env,
            events::ReportEscrowInitialized {
                owner,
                token,
                price,
                timeout,
                timestamp: env.ledger().timestamp(),
            },
        );

        Ok(())
    }

    /// Request a new report, paying the fixed price into escrow.
    ///
    /// Pulls `price` tokens from the requester into the contract and creates the
    /// report record in one atomic step. The requester must have approved the
    /// contract for at least `price` beforehand. The new report's deadline is
    /// the current ledger time plus the configured timeout.
    ///
    /// # Arguments
    ///
    /// * `env` - The contract execution environment
    /// * `requester` - Address paying for the report (must authorize this call)
    ///
    /// # Returns
    ///
    /// * `Ok(report_id)` - Id of the newly created report
    /// * `Err(Error::NotInitialized)` - If the contract hasn't been initialized
    /// * `Err(Error::InsufficientBalance)` - If the requester's balance is below the price
    /// * `Err(Error::InsufficientAllowance)` - If the contract's allowance is below the price
    /// * `Err(Error::TransferFailed)` - If the token ledger rejected the pull
    ///
    /// # Security
    ///
    /// - Requires authorization from the requester address
    /// - Funds only enter escrow together with a new record; neither happens alone
    /// - Emits `ReportRequested` event for off-chain tracking
    pub fn request_report(env: Env, requester: Address) -> Result<u64, Error> {
        requester.require_auth();

        let token_addr = read_token(&env)?;
        let price = read_price(&env)?;
        let timeout = read_timeout(&env)?;

        let client = token::Client::new(&env, &token_addr);
        let contract = env.current_contract_address();

        if client.balance(&requester) < price {
            return Err(Error::InsufficientBalance);
        }
        if client.allowance(&requester, &contract) < price {
            return Err(Error::InsufficientAllowance);
        }
        if client
            .try_transfer_from(&contract, &requester, &contract, &price)
            .is_err()
        {
            return Err(Error::TransferFailed);
        }

        let now = env.ledger().timestamp();
        let report = registry::create(&env, &requester, price, now, timeout);

        events::emit_report_requested(
            &env,
            events::ReportRequested {
                report_id: report.id,
                requester,
                amount: price,
                deadline: report.deadline,
            },
        );

        Ok(report.id)
    }

    /// Deliver a report by recording its content reference.
    ///
    /// Marks the report as delivered and stores the opaque content reference
    /// (typically an IPFS CID). Delivery moves no funds; the payment stays pooled
    /// in the contract until the owner withdraws it.
    ///
    /// # Arguments
    ///
    /// * `env` - The contract execution environment
    /// * `caller` - Must be the contract owner
    /// * `report_id` - Id of the report to deliver
    /// * `content_ref` - Non-empty reference to the delivered artifact
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the report was marked delivered
    /// * `Err(Error::NotAuthorized)` - If the caller is not the owner
    /// * `Err(Error::EmptyContentRef)` - If `content_ref` is empty
    /// * `Err(Error::ReportNotFound)` - If no report exists with this id
    /// * `Err(Error::AlreadyDelivered)` / `Err(Error::AlreadyRefunded)` - If the
    ///   report is already terminal
    /// * `Err(Error::DeadlineExpired)` - If the delivery window has lapsed
    pub fn deliver_report(
        env: Env,
        caller: Address,
        report_id: u64,
        content_ref: String,
    ) -> Result<(), Error> {
        caller.require_auth();
        if caller != read_owner(&env)? {
            return Err(Error::NotAuthorized);
        }
        if content_ref.len() == 0 {
            return Err(Error::EmptyContentRef);
        }

        let now = env.ledger().timestamp();
        registry::set_delivered(&env, report_id, content_ref.clone(), now)?;

        events::emit_report_delivered(
            &env,
            events::ReportDelivered {
                report_id,
                content_ref,
                timestamp: now,
            },
        );

        Ok(())
    }

    /// Refund an undelivered report after its deadline has lapsed.
    ///
    /// Marks the report as refunded and pushes the escrowed payment back to the
    /// requester. Only the report's requester can claim the refund, and only once
    /// the ledger time is strictly past the deadline.
    ///
    /// # Arguments
    ///
    /// * `env` - The contract execution environment
    /// * `caller` - Must be the report's requester (must authorize this call)
    /// * `report_id` - Id of the report to refund
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the payment was returned
    /// * `Err(Error::ReportNotFound)` - If no report exists with this id
    /// * `Err(Error::NotAuthorized)` - If the caller is not the requester
    /// * `Err(Error::AlreadyDelivered)` / `Err(Error::AlreadyRefunded)` - If the
    ///   report is already terminal
    /// * `Err(Error::DeadlineNotReached)` - If the deadline has not lapsed yet
    /// * `Err(Error::TransferFailed)` - If the token ledger rejected the push
    ///
    /// # Security
    ///
    /// - A failed push aborts the whole invocation, so the refunded flag never
    ///   outlives a transfer the ledger rejected
    /// - Emits `ReportRefunded` event for off-chain tracking
    pub fn request_refund(env: Env, caller: Address, report_id: u64) -> Result<(), Error> {
        caller.require_auth();

        let report = registry::get(&env, report_id)?;
        if caller != report.requester {
            return Err(Error::NotAuthorized);
        }

        let now = env.ledger().timestamp();
        let report = registry::set_refunded(&env, report_id, now)?;

        let token_addr = read_token(&env)?;
        let client = token::Client::new(&env, &token_addr);
        if client
            .try_transfer(&env.current_contract_address(), &caller, &report.amount_paid)
            .is_err()
        {
            return Err(Error::TransferFailed);
        }

        events::emit_report_refunded(
            &env,
            events::ReportRefunded {
                report_id,
                requester: caller,
                amount: report.amount_paid,
                timestamp: now,
            },
        );

        Ok(())
    }

    /// Extend the delivery deadline of an open report.
    ///
    /// Pushes the deadline of a non-terminal report further into the future.
    /// The deadline only ever increases; there is no cap on cumulative extension.
    ///
    /// # Arguments
    ///
    /// * `env` - The contract execution environment
    /// * `caller` - Must be the contract owner
    /// * `report_id` - Id of the report to extend
    /// * `extra_time` - Seconds to add to the current deadline (must be > 0)
    ///
    /// # Returns
    ///
    /// * `Ok(new_deadline)` - The deadline after the extension
    /// * `Err(Error::NotAuthorized)` - If the caller is not the owner
    /// * `Err(Error::InvalidDuration)` - If `extra_time` is zero
    /// * `Err(Error::ReportNotFound)` - If no report exists with this id
    /// * `Err(Error::AlreadyDelivered)` / `Err(Error::AlreadyRefunded)` - If the
    ///   report is already terminal
    /// * `Err(Error::DeadlineOverflow)` - If the new deadline would overflow
    pub fn extend_deadline(
        env: Env,
        caller: Address,
        report_id: u64,
        extra_time: u64,
    ) -> Result<u64, Error> {
        caller.require_auth();
        if caller != read_owner(&env)? {
            return Err(Error::NotAuthorized);
        }
        if extra_time == 0 {
            return Err(Error::InvalidDuration);
        }

        let report = registry::extend(&env, report_id, extra_time)?;

        events::emit_deadline_extended(
            &env,
            events::DeadlineExtended {
                report_id,
                new_deadline: report.deadline,
                timestamp: env.ledger().timestamp(),
            },
        );

        Ok(report.deadline)
    }

    /// Withdraw the contract's entire pooled token balance to the owner.
    ///
    /// This is a coarse sweep with no per-report accounting. It is safe because
    /// refund and withdrawal debit the same pooled balance and no report can be
    /// refunded twice.
    ///
    /// # Arguments
    ///
    /// * `env` - The contract execution environment
    /// * `caller` - Must be the contract owner
    ///
    /// # Returns
    ///
    /// * `Ok(amount)` - The amount swept to the owner
    /// * `Err(Error::NotAuthorized)` - If the caller is not the owner
    /// * `Err(Error::TransferFailed)` - If the token ledger rejected the transfer
    pub fn withdraw(env: Env, caller: Address) -> Result<i128, Error> {
        caller.require_auth();
        if caller != read_owner(&env)? {
            return Err(Error::NotAuthorized);
        }

        let token_addr = read_token(&env)?;
        let client = token::Client::new(&env, &token_addr);
        let contract = env.current_contract_address();
        let amount = client.balance(&contract);

        if client.try_transfer(&contract, &caller, &amount).is_err() {
            return Err(Error::TransferFailed);
        }

        events::emit_tokens_withdrawn(
            &env,
            events::TokensWithdrawn {
                owner: caller,
                amount,
                timestamp: env.ledger().timestamp(),
            },
        );

        Ok(amount)
    }

    /// Retrieve the full record of a report.
    ///
    /// Only the report's requester and the contract owner may read a report's
    /// details. This is a read-only view function.
    ///
    /// # Arguments
    ///
    /// * `env` - The contract execution environment
    /// * `caller` - Must be the report's requester or the owner
    /// * `report_id` - Id of the report to query
    ///
    /// # Returns
    ///
    /// * `Ok(Report)` - The complete report record
    /// * `Err(Error::ReportNotFound)` - If no report exists with this id
    /// * `Err(Error::NotAuthorized)` - If the caller is neither requester nor owner
    pub fn get_report_details(env: Env, caller: Address, report_id: u64) -> Result<Report, Error> {
        caller.require_auth();

        let report = registry::get(&env, report_id)?;
        if caller != report.requester && caller != read_owner(&env)? {
            return Err(Error::NotAuthorized);
        }
        Ok(report)
    }

    /// List the ids of all reports ever requested by `requester`, in creation order.
    ///
    /// Callers can only enumerate their own reports; the address must authorize
    /// the call. Returns an empty vector for an address with no reports.
    pub fn get_user_reports(env: Env, requester: Address) -> Vec<u64> {
        requester.require_auth();
        registry::reports_of(&env, &requester)
    }

    /// Get the fixed price of one report, in token base units.
    pub fn get_report_price(env: Env) -> Result<i128, Error> {
        read_price(&env)
    }

    /// Get the delivery timeout in seconds.
    pub fn get_report_timeout(env: Env) -> Result<u64, Error> {
        read_timeout(&env)
    }

    /// Get the contract owner address.
    pub fn get_owner(env: Env) -> Result<Address, Error> {
        read_owner(&env)
    }

    /// Get the token contract address used for all payments.
    pub fn get_token(env: Env) -> Result<Address, Error> {
        read_token(&env)
    }

    /// Get the contract's current pooled token balance.
    ///
    /// Equals the sum of `amount_paid` over all open reports, minus anything the
    /// owner has already withdrawn for delivered work. Useful for auditing.
    pub fn get_contract_balance(env: Env) -> Result<i128, Error> {
        let token_addr = read_token(&env)?;
        let client = token::Client::new(&env, &token_addr);
        Ok(client.balance(&env.current_contract_address()))
    }

    /// Get the number of reports ever created.
    pub fn report_count(env: Env) -> u64 {
        registry::count(&env)
    }
}

fn read_owner(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(Error::NotInitialized)
}

fn read_token(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)
}

fn read_price(env: &Env) -> Result<i128, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Price)
        .ok_or(Error::NotInitialized)
}

fn read_timeout(env: &Env) -> Result<u64, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Timeout)
        .ok_or(Error::NotInitialized)
}
