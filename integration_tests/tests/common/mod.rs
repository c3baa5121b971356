#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Once;

use dino_core::{
    run_script, run_script_file, HeadlessFrontend, InterpreterConfig, SessionError, World,
};

static INIT: Once = Once::new();

pub fn ensure_test_config() {
    INIT.call_once(|| {
        let config_path = fixture("test_interpreter_config.json");

        debug_assert!(
            config_path.exists(),
            "missing test interpreter config at {}",
            config_path.display()
        );

        std::env::set_var(dino_core::config::CONFIG_PATH_ENV, &config_path);
    });
}

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Run script text with no display, no pacing and no dump.
pub fn run_text(script: &str) -> Result<World, SessionError> {
    run_script(
        Cursor::new(script),
        "inline",
        &InterpreterConfig::headless(),
        HeadlessFrontend,
    )
}

pub fn run_file(path: &Path) -> Result<World, SessionError> {
    run_script_file(path, &InterpreterConfig::headless(), HeadlessFrontend)
}
