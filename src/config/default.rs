use std::time::Duration;

/// Default time to wait for a response
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default delay between requests
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);
/// Default number of iterations (0 = run until cancelled)
pub const DEFAULT_COUNT: u64 = 0;
/// Port used for DNS resolvers given without an explicit port
pub const DEFAULT_DNS_PORT: u16 = 53;
/// Capacity of the report channel between the engine and the printer.
/// Kept at one so a slow consumer applies backpressure to the engine.
pub const REPORT_CHANNEL_CAPACITY: usize = 1;
/// Width of the protocol column in human output
pub const PROTOCOL_COLUMN_WIDTH: usize = 15;
/// Width of the elapsed-time column in human output
pub const TIME_COLUMN_WIDTH: usize = 14;
