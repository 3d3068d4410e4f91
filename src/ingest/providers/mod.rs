// src/ingest/providers/mod.rs
//! Fixture-backed fetch collaborators. Network access lives outside this crate.

pub mod newsapi;
pub mod reddit;

pub use newsapi::NewsApiProvider;
pub use reddit::RedditProvider;
