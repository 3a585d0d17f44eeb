// src/types/mod.rs
pub mod job;
pub mod response;

pub use job::JobRecord;
