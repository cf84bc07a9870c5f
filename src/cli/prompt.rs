//! Prompt command - print the generation request for a sprite idea

use std::process::ExitCode;

use crate::models::{AspectRatio, GridShape};
use crate::prompt::{refine_instruction, GenerationRequest};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the prompt command
pub fn run_prompt(
    description: &str,
    shape: GridShape,
    aspect: AspectRatio,
    refine: bool,
    json: bool,
) -> ExitCode {
    if description.trim().is_empty() {
        eprintln!("Error: Description must not be empty");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    if refine {
        println!("{}", refine_instruction(description));
        return ExitCode::from(EXIT_SUCCESS);
    }

    let request = GenerationRequest::new(description, shape, aspect);
    if json {
        match serde_json::to_string_pretty(&request) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        println!("{}", request.prompt);
        println!();
        println!("Grid: {} ({} frames), aspect ratio {}", shape, shape.total_frames(), aspect);
    }
    ExitCode::from(EXIT_SUCCESS)
}
