//! Core systems for Cascade.
//!
//! This crate provides the foundational components shared by the Cascade
//! menu library:
//!
//! - **Signal/Slot System**: Type-safe synchronous notification
//! - **Timer Service**: Deterministic, host-driven one-shot timers
//! - **Errors**: Shared error taxonomy
//! - **Logging**: `tracing` targets for per-subsystem filtering
//!
//! Cascade is single-threaded and cooperative: there is no event loop in
//! this crate. Signals deliver synchronously on the emitting thread, and
//! timers only fire when the host calls
//! [`TimerService::process_expired`] with an explicit `now`.
//!
//! # Signal Example
//!
//! ```
//! use cascade_core::Signal;
//!
//! let changed = Signal::<i32>::new();
//! let conn_id = changed.connect(|value| {
//!     println!("changed to {value}");
//! });
//! changed.emit(42);
//! changed.disconnect(conn_id);
//! ```
//!
//! # Timer Example
//!
//! ```
//! use cascade_core::TimerService;
//! use std::time::{Duration, Instant};
//!
//! let mut timers = TimerService::new();
//! let t0 = Instant::now();
//! let id = timers.schedule(t0, Duration::from_millis(75));
//!
//! // Nothing fires until the host advances time past the deadline.
//! assert!(timers.process_expired(t0).is_empty());
//! assert_eq!(
//!     timers.process_expired(t0 + Duration::from_millis(75)),
//!     vec![id],
//! );
//! ```

mod error;
pub mod logging;
pub mod signal;
mod timer;

pub use error::{CoreError, Result, SignalError, TimerError};
pub use signal::{ConnectionId, Signal};
pub use timer::{TimerId, TimerService};
