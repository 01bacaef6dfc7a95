//! Pure derivation components.
//!
//! Everything here is a pure function over a read-only view of the series:
//! no shared mutable state, computed on read from the latest published
//! state rather than cached per horizon.
//!
//! ## Submodules
//!
//! - [`liveness`]: online/offline judgment from update recency
//! - [`range`]: out-of-range classification against a normal range
//! - [`trend`]: last-delta trend between the two most recent points
//! - [`window`]: horizon filtering of historical series

pub mod liveness;
pub mod range;
pub mod trend;
pub mod window;
