//! HTTP access to the dashboard backend.

pub mod client;
pub mod dto;

pub use client::DashboardHttpClient;
