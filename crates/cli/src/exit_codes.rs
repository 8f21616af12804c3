//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract — scripts rely on them.

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

/// Document failed to parse (malformed JSON or a scalar root).
pub const EXIT_PARSE: u8 = 3;

/// Decisions file failed to parse.
pub const EXIT_DECISIONS: u8 = 4;

/// IO failure reading or writing files.
pub const EXIT_IO: u8 = 5;
