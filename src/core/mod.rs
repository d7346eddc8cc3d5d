//! Core server infrastructure.

pub mod http;
