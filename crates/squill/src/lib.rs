//! squill core library: database execution, rendering, batch running,
//! configuration, and statement history. The editing engine itself lives in
//! the `sql-edit` crate.

pub mod config;
pub mod db;
pub mod history;
pub mod output;
pub mod pipe;
