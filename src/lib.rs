//! REST backend for a board game review site.
//!
//! `db` holds the store client and the query layer, `api` maps HTTP requests
//! onto it, and `error` is the single classification both sides share.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod utils;
