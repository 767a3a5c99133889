//! Client library for the cloud bot execution API: the credentials store and
//! runtime bootstrap shared by the `cbot-cli` binary.

pub mod config;
pub mod infra;
