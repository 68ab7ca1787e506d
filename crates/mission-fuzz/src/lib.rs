//! Mission Fuzz Harness
//!
//! Property-based testing support for the mission engine: strategies for
//! mission coordinates, records and requests, plus a small runner config.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mission_fuzz::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn volatility_is_bounded(lat in latitude_deg(), month in month()) {
//!         // ...
//!     }
//! }
//! ```

pub mod generators;
pub mod runner;

pub mod prelude {
    pub use crate::generators::*;
    pub use crate::runner::FuzzConfig;
    pub use proptest::prelude::*;
}

pub use proptest;
