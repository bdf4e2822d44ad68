//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish high-level
//! use cases like "render build info for Go" or "write a pair to disk".

pub mod render_service;
pub mod stamp_service;

pub use render_service::{LanguageInfo, RenderService};
pub use stamp_service::{StampService, WriteOptions, WrittenFile, WrittenPair};
