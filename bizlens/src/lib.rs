//! bizlens - Business-intelligence dashboard analytics
//!
//! This is the convenience wrapper crate that re-exports bizlens components
//! with optional feature flags for easy usage.
//!
//! # Quick Start
//!
//! ```toml
//! [dependencies]
//! bizlens = "0.1"  # Includes core + standard views by default
//! ```
//!
//! # Features
//!
//! - `std` (default): Include the standard dashboard views

// Re-export core
pub use bizlens_core::*;
pub use bizlens_view;

// Re-export standard views if feature is enabled
#[cfg(feature = "std")]
pub use bizlens_std;

/// Prelude module for convenient imports
pub mod prelude {
    pub use bizlens_core::*;
    pub use bizlens_view::{View, ViewOutput, ViewRegistry};

    #[cfg(feature = "std")]
    pub use bizlens_std::standard_registry;
}
