//! Strategy store access (Postgres wire protocol).

mod store;

pub use store::Database;
