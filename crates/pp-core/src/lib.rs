//! pp-core: shared foundation for pidpool.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - timing (clock sources used to derive elapsed time between updates)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use timing::{Clock, ManualClock, SystemClock};
