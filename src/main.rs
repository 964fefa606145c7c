//! # Tile Streamer Entry Point
//!
//! Runs the headless streaming simulation. An optional JSON configuration file may be passed as
//! the first argument.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- world.json
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    tile_streamer::run()
}
