//! Roster Identity
//!
//! Name normalization and exact-key identity resolution for engineer records.
//!
//! # Overview
//!
//! The identity layer provides:
//! - **normalize**: free-text display name to [`CanonicalKey`]
//! - **IdentityIndex**: canonical key to engineer lookup with collision tracking
//! - **Resolver**: authoritative exact-key resolution with an optional alias fallback
//! - **search**: non-authoritative "contains" lookup for interactive use
//!
//! # Example
//!
//! ```rust
//! use roster_identity::{EngineerId, EngineerRecord, EngineerStatus, IdentityIndex, Resolver, Slug};
//!
//! let jan = EngineerRecord::new(
//!     EngineerId::new(),
//!     "Jan Novák",
//!     Slug::derive(&roster_identity::normalize("Jan Novák")),
//!     EngineerStatus::Active,
//! );
//! let index = IdentityIndex::build(vec![jan.clone()]);
//!
//! let resolution = Resolver::new(&index).resolve("JAN  NOVAK");
//! assert_eq!(resolution.engineer().map(|e| e.id), Some(jan.id));
//! ```

#![warn(missing_docs)]

pub mod alias;
pub mod engineer;
pub mod index;
pub mod normalize;
pub mod resolver;
pub mod search;
pub mod slug;

// Re-exports
pub use alias::{AliasRule, AliasTable};
pub use engineer::{EngineerId, EngineerRecord, EngineerStatus, ParseStatusError, StatusFilter};
pub use index::{Collision, IdentityIndex, InsertOutcome};
pub use normalize::{normalize, CanonicalKey, SUBSTITUTIONS};
pub use resolver::{BatchResolution, MatchSource, Resolution, Resolver};
pub use search::{search, SearchHit};
pub use slug::{Slug, SlugError};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for identity resolution
    pub use crate::{
        normalize, AliasTable, CanonicalKey, EngineerId, EngineerRecord, EngineerStatus,
        IdentityIndex, Resolution, Resolver, Slug,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
