//! Pipeline stages for catalog generation.
//!
//! Each submodule implements exactly one transformation step so each can be
//! tested without the others.
//!
//! ## Data Flow
//!
//! ```text
//! normalize ──▶ filter ──▶ join ──▶ fetch ──▶ render
//! (typed rows)  (predicates) (URLs)  (HTTP)   (lopdf)
//! ```
//!
//! 1. [`normalize`]: raw worksheets to typed tables, first-column-wins dedup
//! 2. [`filter`]: availability check plus the user's name/size/location predicates
//! 3. [`join`]: left join on style code and URL sanitisation
//! 4. [`fetch`]: the only stage with network I/O; failures become empty slots
//! 5. [`render`]: one letter-size page per entry

pub mod fetch;
pub mod filter;
pub mod join;
pub mod normalize;
pub mod render;
