pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod forge;
pub mod git;
pub mod package;
pub mod ui;
pub mod version;

pub use error::{ReleaseError, Result};
