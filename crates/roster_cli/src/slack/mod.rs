mod api;
mod client;
mod types;

pub use client::SlackClient;
