//! # Voxel Sandbox Application Entry Point
//!
//! This is the main entry point for the native application.
//! It simply calls into the library's `run()` function to start the game.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    if let Err(err) = voxel_sandbox::run() {
        eprintln!("voxel-sandbox: {}", err);
        std::process::exit(1);
    }
}
