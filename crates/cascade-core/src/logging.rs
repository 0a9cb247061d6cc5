//! Logging facilities for Cascade.
//!
//! Cascade uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! Signal emissions and timer fires are traced at `trace` level under the
//! targets below, so a filter such as `RUST_LOG=cascade_core::timer=trace`
//! isolates a single subsystem. Crates built on top follow the same
//! convention with their own `crate::module` target strings.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "cascade_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "cascade_core::signal";
    /// Timer service target.
    pub const TIMER: &str = "cascade_core::timer";
}
