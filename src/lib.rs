// src/lib.rs

//! yagcil: contest task tracker library

pub mod error;
pub mod models;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;
