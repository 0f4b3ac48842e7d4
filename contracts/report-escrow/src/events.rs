//! # Report Escrow Events Module
//!
//! This module defines all events emitted by the Report Escrow contract.
//! Events provide an audit trail and enable off-chain indexing of report
//! lifecycle transitions.
//!
//! ## Event Architecture
//!
//! ```text
//! Contract Init   → ReportEscrowInitialized
//!      ↓
//! Request Report  → ReportRequested
//!      ↓
//!  ┌──────────┐
//!  │ Decision │
//!  └────┬─────┘
//!       ├─────→ Deliver (before deadline) → ReportDelivered
//!       ├─────→ Extend  (owner, open)     → DeadlineExtended
//!       └─────→ Refund  (after deadline)  → ReportRefunded
//!
//! Owner sweep     → TokensWithdrawn
//! ```

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

/// Event emitted once when the contract is initialized.
///
/// # Event Topic
/// Symbol: `init`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReportEscrowInitialized {
    pub owner: Address,
    pub token: Address,
    pub price: i128,
    pub timeout: u64,
    pub timestamp: u64,
}

/// Event emitted when a requester pays for a new report.
///
/// # Event Topic
/// Symbol: `req`
/// Indexed: `report_id`
///
/// # State Transition
/// ```text
/// NONE → CREATED
/// ```
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReportRequested {
    pub report_id: u64,
    pub requester: Address,
    pub amount: i128,
    pub deadline: u64,
}

/// Event emitted when the owner delivers a report's content reference.
///
/// # Event Topic
/// Symbol: `deliver`
/// Indexed: `report_id`
///
/// # State Transition
/// ```text
/// CREATED → DELIVERED (final state)
/// ```
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReportDelivered {
    pub report_id: u64,
    pub content_ref: String,
    pub timestamp: u64,
}

/// Event emitted when an expired report's payment is returned to its requester.
///
/// # Event Topic
/// Symbol: `refund`
/// Indexed: `report_id`
///
/// # State Transition
/// ```text
/// CREATED → REFUNDED (final state)
/// ```
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReportRefunded {
    pub report_id: u64,
    pub requester: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Event emitted when the owner extends an open report's deadline.
///
/// # Event Topic
/// Symbol: `extend`
/// Indexed: `report_id`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeadlineExtended {
    pub report_id: u64,
    pub new_deadline: u64,
    pub timestamp: u64,
}

/// Event emitted when the owner sweeps the contract's pooled balance.
///
/// # Event Topic
/// Symbol: `withdraw`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensWithdrawn {
    pub owner: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Emits a ReportEscrowInitialized event.
pub fn emit_initialized(env: &Env, event: ReportEscrowInitialized) {
    let topics = (symbol_short!("init"),);
    env.events().publish(topics, event);
}

/// Emits a ReportRequested event.
pub fn emit_report_requested(env: &Env, event: ReportRequested) {
    let topics = (symbol_short!("req"), event.report_id);
    env.events().publish(topics, event);
}

/// Emits a ReportDelivered event.
pub fn emit_report_delivered(env: &Env, event: ReportDelivered) {
    let topics = (symbol_short!("deliver"), event.report_id);
    env.events().publish(topics, event);
}

/// Emits a ReportRefunded event.
pub fn emit_report_refunded(env: &Env, event: ReportRefunded) {
    let topics = (symbol_short!("refund"), event.report_id);
    env.events().publish(topics, event);
}

/// Emits a DeadlineExtended event.
pub fn emit_deadline_extended(env: &Env, event: DeadlineExtended) {
    let topics = (symbol_short!("extend"), event.report_id);
    env.events().publish(topics, event);
}

/// Emits a TokensWithdrawn event.
pub fn emit_tokens_withdrawn(env: &Env, event: TokensWithdrawn) {
    let topics = (symbol_short!("withdraw"),);
    env.events().publish(topics, event);
}
