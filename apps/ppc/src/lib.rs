//! # ppc
//!
//! The PPC application: clap CLI, axum HTTP API, layered configuration,
//! working-set file I/O and the SIGAA CSV export, all on top of `ppc-core`.

pub mod api;
pub mod cli;
pub mod config;
pub mod datafile;
pub mod export;
