//! REST market-data collaborator. Everything downstream consumes the
//! `common::MarketData` trait; this crate is the only place that knows the
//! exchange's wire format.

pub mod rest;

pub use rest::RestFeed;
