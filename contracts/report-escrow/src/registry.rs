//! Report record storage and record-level state machine.
//!
//! This module exclusively owns the report records and the per-requester index.
//! All transitions go through the functions here, which enforce the record-level
//! invariants: `delivered` and `refunded` are never both true, the content
//! reference is non-empty exactly when the report is delivered, and the deadline
//! only ever moves forward.

use soroban_sdk::{contracttype, Address, Env, String, Vec};

use crate::Error;

/// One escrow instance: a paid-for report awaiting delivery or refund.
///
/// Records are created by `create`, mutated at most once into a terminal state
/// (delivered or refunded), and never deleted.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Report {
    /// Unique, monotonically assigned identifier (first report has id 1).
    pub id: u64,
    /// Address that paid for this report; immutable after creation.
    pub requester: Address,
    /// Exactly the fixed report price at the time of creation (token base units).
    pub amount_paid: i128,
    /// Ledger timestamp at creation.
    pub created_at: u64,
    /// Delivery cutoff; `created_at + timeout`, extendable upward only.
    pub deadline: u64,
    /// Opaque reference to the delivered artifact; empty until delivered.
    pub content_ref: String,
    /// True once the content reference has been set.
    pub delivered: bool,
    /// True once the payment has been returned to the requester.
    pub refunded: bool,
}

impl Report {
    /// Fails with the matching terminal-state error if this report is no longer open.
    fn ensure_open(&self) -> Result<(), Error> {
        if self.delivered {
            return Err(Error::AlreadyDelivered);
        }
        if self.refunded {
            return Err(Error::AlreadyRefunded);
        }
        Ok(())
    }
}

/// Storage keys used for contract data persistence.
///
/// Configuration values live in instance storage; report records and the
/// per-requester index live in persistent storage.
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Stores the owner address authorized to deliver, extend and withdraw.
    Owner,
    /// Stores the token contract address used for all payments.
    Token,
    /// Stores the fixed report price in token base units.
    Price,
    /// Stores the delivery timeout in seconds.
    Timeout,
    /// Stores the id of the most recently created report.
    NextId,
    /// Stores the report record for a specific id.
    Report(u64),
    /// Stores the creation-ordered report ids of one requester.
    UserReports(Address),
}

/// Allocate the next id and insert a fresh record for `requester`.
///
/// The new record starts open with an empty content reference and a deadline of
/// `now + timeout`. The id is appended to the requester's index in the same step.
pub fn create(env: &Env, requester: &Address, price: i128, now: u64, timeout: u64) -> Report {
    let id = allocate_id(env);
    let report = Report {
        id,
        requester: requester.clone(),
        amount_paid: price,
        created_at: now,
        deadline: now.saturating_add(timeout),
        content_ref: String::from_str(env, ""),
        delivered: false,
        refunded: false,
    };
    save(env, &report);

    let mut index = reports_of(env, requester);
    index.push_back(id);
    env.storage()
        .persistent()
        .set(&DataKey::UserReports(requester.clone()), &index);

    report
}

/// Load the record for `id`, or fail with `ReportNotFound`.
pub fn get(env: &Env, id: u64) -> Result<Report, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Report(id))
        .ok_or(Error::ReportNotFound)
}

/// Transition an open report to the delivered terminal state.
///
/// Fails if the report is already terminal or if `now` is past the deadline.
pub fn set_delivered(env: &Env, id: u64, content_ref: String, now: u64) -> Result<Report, Error> {
    let mut report = get(env, id)?;
    report.ensure_open()?;
    if now > report.deadline {
        return Err(Error::DeadlineExpired);
    }

    report.content_ref = content_ref;
    report.delivered = true;
    save(env, &report);
    Ok(report)
}

/// Transition an open report to the refunded terminal state.
///
/// Fails if the report is already terminal or if `now` has not yet passed the
/// deadline. Token movement is the caller's responsibility.
pub fn set_refunded(env: &Env, id: u64, now: u64) -> Result<Report, Error> {
    let mut report = get(env, id)?;
    report.ensure_open()?;
    if now <= report.deadline {
        return Err(Error::DeadlineNotReached);
    }

    report.refunded = true;
    save(env, &report);
    Ok(report)
}

/// Push the deadline of an open report forward by `extra_time` seconds.
pub fn extend(env: &Env, id: u64, extra_time: u64) -> Result<Report, Error> {
    let mut report = get(env, id)?;
    report.ensure_open()?;

    report.deadline = report
        .deadline
        .checked_add(extra_time)
        .ok_or(Error::DeadlineOverflow)?;
    save(env, &report);
    Ok(report)
}

/// Creation-ordered ids of all reports belonging to `requester`.
pub fn reports_of(env: &Env, requester: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::UserReports(requester.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

/// Number of reports ever created.
pub fn count(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::NextId).unwrap_or(0)
}

fn allocate_id(env: &Env) -> u64 {
    let id = count(env) + 1;
    env.storage().instance().set(&DataKey::NextId, &id);
    id
}

fn save(env: &Env, report: &Report) {
    env.storage()
        .persistent()
        .set(&DataKey::Report(report.id), report);
}
