#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), eframe::Error> {
    // Logging to stderr for development runs.
    env_logger::init();

    prompt_board::run_app()
}

// The board ships to browsers as a library; there is no standalone wasm
// binary.
#[cfg(target_arch = "wasm32")]
fn main() {}
