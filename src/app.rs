// APP information
pub const CRATE_BIN_NAME: &str = "up";

/// Exit code when at least one attempt succeeded.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for configuration and usage errors.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when the run completed without a single success.
pub const EXIT_NO_RESPONSE: i32 = 2;

/// Map the number of successful reports of a finished run to an exit code.
pub fn exit_code(successes: u64) -> i32 {
    if successes > 0 {
        EXIT_SUCCESS
    } else {
        EXIT_NO_RESPONSE
    }
}

/// Print an error the way every fatal error of the app is reported.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{}: {:#}", CRATE_BIN_NAME, err);
}
