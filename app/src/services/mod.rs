//! Storage services behind the upload endpoints.

pub mod blob;
pub mod storage;
