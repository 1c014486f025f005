//! Control server API

pub mod client;

pub use client::ApiClient;
