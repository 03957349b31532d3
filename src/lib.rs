//! Library crate for color-ident, exposing modules for binaries and tests.

pub mod config;
pub mod dto;
pub mod error;
pub mod render;
pub mod routes;
pub mod services;
pub mod state;
