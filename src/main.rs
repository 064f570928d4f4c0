//! Hello triangle.
//!
//! Opens a fixed-size window, builds one render pipeline from an embedded
//! shader pair, uploads a static three-vertex mesh, and draws it every frame
//! until the window is closed.

mod device;
mod logging;
mod render;
mod window;

use anyhow::Result;

use crate::logging::LoggingConfig;
use crate::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    logging::init_logging(LoggingConfig::default());

    // Returning an error exits the process with a non-zero status after the
    // diagnostic chain is printed.
    Runtime::run(RuntimeConfig::default())
}
