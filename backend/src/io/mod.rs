//! # IO Module
//!
//! Boundary between the dashboard domain logic and the outside world.
//!
//! - **report_source**: the fetch collaborator seam. Sources hand over one
//!   completed report per refresh and signal lost sessions as
//!   `Unauthenticated`.
//! - **report_decoder**: turns raw endpoint JSON into typed reports and
//!   rejects only structurally wrong input.
//! - **mappers**: convert domain views into the DTOs in `shared` that the
//!   presentation layer consumes.

pub mod mappers;
pub mod report_decoder;
pub mod report_source;

pub use mappers::*;
pub use report_decoder::*;
pub use report_source::*;
