//! Command implementations for the xeno CLI

pub mod config;
