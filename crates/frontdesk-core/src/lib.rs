//! # frontdesk-core: Pure Business Logic for the Front Desk
//!
//! This crate is the **heart** of the front-desk reservation system. It
//! contains all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Front Desk Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front-desk UI                                │   │
//! │  │   Reservation table ──► New reservation form ──► Edit modal     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ReservationStore trait                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ frontdesk-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌──────────┐ ┌──────┐ │   │
//! │  │   │  types  │ │  money  │ │  billing  │ │validation│ │filter│ │   │
//! │  │   │Reserv.  │ │  Money  │ │ Breakdown │ │  rules   │ │search│ │   │
//! │  │   └─────────┘ └─────────┘ └───────────┘ └──────────┘ └──────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               frontdesk-db (Storage Layer)                      │   │
//! │  │          in-memory store, SQLite store, seed data               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Reservation, Discount, statuses, Rate)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`billing`] - The reservation billing calculator
//! - [`reservation`] - Drafting, patching and lifecycle of reservations
//! - [`filter`] - Listing filter (status + guest/room search)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use frontdesk_core::billing::{calculate, BillingInput};
//! use frontdesk_core::{Discount, Money, Rate};
//!
//! let breakdown = calculate(&BillingInput {
//!     nights: 2,
//!     price_per_night: Money::from_cents(10_000),
//!     tax_rate: Rate::from_bps(500),
//!     service_charge_rate: Rate::from_bps(1000),
//!     discount: &Discount::None,
//!     services: &[],
//! });
//!
//! assert_eq!(breakdown.grand_total.cents(), 23_100); // $231.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod error;
pub mod filter;
pub mod money;
pub mod reservation;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use billing::{BillingBreakdown, BillingDefaults, BillingInput, Quote};
pub use error::{CoreError, CoreResult, ValidationError};
pub use filter::ReservationFilter;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tax rate when a reservation does not specify one (5%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 500;

/// Default service charge rate when a reservation does not specify one (10%).
pub const DEFAULT_SERVICE_CHARGE_RATE_BPS: u32 = 1000;

/// Maximum quantity of a single additional service line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_SERVICE_QUANTITY: i64 = 999;

/// Highest accepted room rate or service unit price, in cents ($1,000,000.00).
///
/// Keeps every derived folio amount well inside i64.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Highest accepted fixed discount, in cents ($100,000,000.00).
pub const MAX_FIXED_DISCOUNT_CENTS: i64 = 10_000_000_000;

/// Maximum length of a business reservation number.
pub const MAX_RESERVATION_ID_LEN: usize = 50;
