//! Data transfer objects for the backend wire protocol

pub mod job;
