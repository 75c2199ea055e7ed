// Contract intake and dashboard queries.
// Analysis itself lives in `crate::analysis`; this module is the plumbing around it.

pub mod extract;
pub mod handlers;
pub mod ingest;
pub mod repository;
pub mod stats;
pub mod storage;
