//! Field extraction and client-folder setup for Legacy purchase contracts.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod label;
pub mod materialize;
pub mod model;
pub mod names;
pub mod overlay;
pub mod pdf_text;
pub mod pipeline;
pub mod util;
