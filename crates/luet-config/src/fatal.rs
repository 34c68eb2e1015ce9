//! Opt-in fatal error handling
//!
//! Library calls return errors. Command front-ends that want a failure to
//! end the run, as directory creation failures historically did, wrap the
//! call with [`or_exit`].

use std::fmt::Display;

/// Exit status used when a fatal error terminates the process.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Unwrap `result`, or report the error on stderr and terminate the process.
pub fn or_exit<T, E: Display>(result: std::result::Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("{}", fatal_message(&e));
            std::process::exit(FATAL_EXIT_CODE);
        }
    }
}

fn fatal_message(error: &impl Display) -> String {
    format!("Error: {error}")
}
