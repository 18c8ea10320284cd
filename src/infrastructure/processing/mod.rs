//! Downstream processing service integration

pub mod client;

pub use client::ProcessingClient;
