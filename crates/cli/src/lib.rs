#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the thin command-line front-end of the `cobie-filter`
//! binary. It loads one or more filter configurations, merges them, and either
//! prints the merged [`FilterSet`](filters::FilterSet) or reports the verdict
//! for entity and attribute names given on the command line.
//!
//! # Design
//!
//! The crate exposes [`run`] as the primary entry point. The function accepts
//! an iterator of arguments together with handles for standard output and
//! error so tests can drive it with in-memory buffers. A [`clap`] builder
//! command recognises three subcommands:
//!
//! - `dump` prints the merged filter set as JSON or as configuration text.
//! - `check` reports whether IFC entities are dropped from the Component or
//!   Type sheets.
//! - `name` reports whether attribute or property-set names are dropped from
//!   a sheet.
//!
//! Every subcommand accepts repeated `--config PATH` options. The first source
//! is loaded and later sources are merged into it; without `--config` the
//! bundled defaults are used. Paths ending in `.json` are read as serialized
//! filter sets.
//!
//! # Invariants
//!
//! - `run` never panics; failures surface as exit code `1` with a diagnostic on
//!   the error handle.
//! - Verdicts are printed one per line, in argument order, as
//!   `<candidate>\t<excluded|included>`.
//!
//! # Errors
//!
//! Argument errors, unreadable or malformed configuration sources, and write
//! failures all return exit code `1`.
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = cli::run(
//!     ["cobie-filter", "check", "--kind", "asset", "IfcWall", "IfcDoor"],
//!     &mut stdout,
//!     &mut stderr,
//! );
//!
//! assert_eq!(exit_code, 0);
//! assert_eq!(
//!     String::from_utf8(stdout).unwrap(),
//!     "IfcWall\texcluded\nIfcDoor\tincluded\n"
//! );
//! ```
//!
//! # See also
//!
//! - [`filters`] for the filter engine itself.
//! - `src/bin/cobie-filter.rs` for the binary that wires [`run`] into `main`.

use std::ffi::OsString;
use std::io::Write;

mod command;
mod execute;
mod logging;
mod sources;

use command::{Invocation, parse_args};

/// Program name used in diagnostics.
pub const PROGRAM_NAME: &str = "cobie-filter";

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Runs the CLI using the provided argument iterator and output handles.
///
/// Returns the process exit code the caller should use: `0` on success and
/// `1` on any failure.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
    Out: Write,
    Err: Write,
{
    let invocation = match parse_args(arguments) {
        Ok(Invocation::Help(text)) => {
            return if stdout.write_all(text.as_bytes()).is_ok() { 0 } else { 1 };
        }
        Ok(Invocation::Run(invocation)) => invocation,
        Err(error) => {
            let _ = write!(stderr, "{error}");
            return 1;
        }
    };

    logging::init_tracing(invocation.verbose);

    match execute::execute(&invocation, stdout) {
        Ok(()) => 0,
        Err(error) => {
            tracing::debug!(target: "cobie::cli", %error, "command failed");
            let _ = writeln!(stderr, "{PROGRAM_NAME}: error: {error}");
            1
        }
    }
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    #[test]
    fn exit_code_from_clamps_out_of_range_values() {
        assert_eq!(exit_code_from(0), ExitCode::SUCCESS);
        assert_eq!(exit_code_from(1), ExitCode::from(1));
        assert_eq!(exit_code_from(-3), ExitCode::SUCCESS);
        assert_eq!(exit_code_from(1000), ExitCode::from(u8::MAX));
    }

    #[test]
    fn help_goes_to_stdout() {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let status = run([PROGRAM_NAME, "--help"], &mut stdout, &mut stderr);

        assert_eq!(status, 0);
        assert!(stderr.is_empty());
        assert!(String::from_utf8(stdout).unwrap().contains("Usage:"));
    }

    #[test]
    fn unknown_subcommand_fails() {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let status = run([PROGRAM_NAME, "explode"], &mut stdout, &mut stderr);

        assert_eq!(status, 1);
        assert!(stdout.is_empty());
        assert!(!stderr.is_empty());
    }
}
