//! HTTP clients for the two messaging platforms.
//!
//! Implements the `SourcePlatform` and `DestinationPlatform` port traits
//! from `chatlift-core` on top of reqwest, including the cursor-follow
//! pagination loops for message pages and agent directories.

mod destination;
mod http;
mod source;

pub use destination::DestinationClient;
pub use source::SourceClient;
