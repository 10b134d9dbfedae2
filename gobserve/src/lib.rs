//! Production-friendly observability hooks for game lifecycle events.
//!
//! ```rust
//! use gobserve::{MetricsGameHooks, TracingGameHooks};
//!
//! let _tracing = TracingGameHooks;
//! let _metrics = MetricsGameHooks;
//! ```

mod metrics_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsGameHooks;
pub use tracing_hooks::TracingGameHooks;

pub mod prelude {
    pub use crate::{MetricsGameHooks, TracingGameHooks};
}
