//! The two batch jobs.
//!
//! # Submodules
//!
//! - [`filter`]: drops disallowed and permanently ineligible records from a
//!   collection and writes a removal audit log
//! - [`integrate`]: merges an existing trusted collection with a newly
//!   harvested one, scoring, deduplicating and optionally probing the result
//!
//! Both jobs are load → transform → save pipelines. They share the record
//! format and nothing else; `integrate` may run on the output of `filter`.

pub mod filter;
pub mod integrate;
