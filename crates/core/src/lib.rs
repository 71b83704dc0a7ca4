//! Himsols Core - Storefront page state.
//!
//! This crate holds the logic behind the Himsols storefront pages:
//! - [`cart`] - The cart ledger, its running total, and checkout
//! - [`form`] - Per-page form schemas and required-field validation
//! - [`flow`] - The validate-then-submit state machine with its delayed reset
//! - [`catalog`] - Trees, services, and service-request variants
//!
//! # Architecture
//!
//! The core crate contains only types, traits and synchronous state
//! transitions - no I/O, no timers, no async runtime. Time and identifier
//! generation come in through [`flow::ResetScheduler`] and
//! [`request_id::RequestIdGenerator`], so hosts decide how both behave.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod flow;
pub mod form;
pub mod notice;
pub mod request_id;
pub mod types;

pub use cart::{CartLedger, CartLine, OrderConfirmation};
pub use catalog::{ServiceType, Tree, TreeCatalog, Urgency};
pub use flow::{FlowState, FormFlow, ManualResetScheduler, ResetScheduler, ResetTicket};
pub use form::{FormError, FormKind, RequestForm};
pub use notice::{Notice, NoticeVariant};
pub use request_id::{
    RequestIdGenerator, RequestIdStrategy, SequentialRequestIds, SubmissionResult,
    TimestampRequestIds, UuidRequestIds,
};
pub use types::*;
