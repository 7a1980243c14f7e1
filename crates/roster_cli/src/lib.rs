//! `roster` command line: channel member sync, the stored mappings, templated
//! direct messages and the local Slack proxy.

pub mod app;
pub mod commands;
pub mod config;
pub mod export;
pub mod messaging;
pub mod setup;
pub mod slack;
pub mod support;
pub mod sync;
