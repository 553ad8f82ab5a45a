//! Core data types: contig identifiers, variants, regions, and the
//! consensus sequence buffer.

pub mod consensus;
pub mod contig;
pub mod region;
pub mod variant;
