//! A thin convenience facade over object storage.
//!
//! [`storage::StorageClient`] wraps one OpenDAL operator bound to one bucket
//! and exposes folder creation, uploads, move/copy, listing, metadata,
//! deletion and pre-signed links. Storage, transport and retries all belong
//! to the backend.

pub mod cli;
pub mod config;
pub mod error;
pub mod storage;
pub mod utils;
