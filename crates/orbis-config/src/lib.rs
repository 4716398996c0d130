//! Configuration for the orbis tools.
//!
//! Settings persist to disk as RON files, can be overridden from the command
//! line via clap, and are validated before being handed to the mesher.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, parse_caps, parse_meridian};
pub use config::{CONFIG_FILE, Config, DebugConfig, ImageConfig, MeshConfig, OutputConfig};
pub use error::ConfigError;
