//! Grounding normalization for text-mined agents
//!
//! Takes statements produced by an upstream reading system, whose agents
//! carry only the raw text they were extracted from, and:
//! - rewrites each agent's identifier bundle from a curated grounding table
//! - picks a canonical display name from competing identifier namespaces
//! - aggregates raw texts with the groundings they were seen with, so the
//!   grounding table itself can be curated
//!
//! ```text
//!  statements ──► GroundingMapper ──► NameCascade ──► normalized statements
//!       │              ▲                  ▲
//!       │        GroundingTable      NameResolver
//!       │              │
//!       └──► aggregate ┴──► curation report (.tsv)
//! ```
//!
//! The grounding table is built once, explicitly, and passed by reference.
//! Every pass returns a fresh collection; inputs are never mutated.

pub mod aggregate;
pub mod bundle;
pub mod cascade;
pub mod config;
pub mod error;
pub mod mapper;
pub mod report;
pub mod resolver;
pub mod statement;
pub mod table;
mod tsv;

pub use aggregate::*;
pub use bundle::*;
pub use cascade::*;
pub use config::GroundmapConfig;
pub use error::{GroundingError, Result};
pub use mapper::GroundingMapper;
pub use report::{write_curation_report, write_curation_report_for, write_curation_report_to};
pub use resolver::{AccessionTable, CachedResolver, NameResolver, NullResolver};
pub use statement::*;
pub use table::GroundingTable;
