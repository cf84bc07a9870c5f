//! SpriteStudio - command-line front end for previewing and exporting sprite sheets

use std::process::ExitCode;

use spritestudio::cli;

fn main() -> ExitCode {
    cli::run()
}
