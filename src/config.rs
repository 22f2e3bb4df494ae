/// Number of buckets a freshly created `Dictionary` starts with.
pub const INITIAL_CAPACITY: usize = 100;

/// Maximum load factor `size / capacity`, stored as a fraction so the growth
/// check stays in integer arithmetic.
pub const LOAD_FACTOR_NUM: usize = 3;
pub const LOAD_FACTOR_DEN: usize = 4;

/// Side length of the square board shots are recorded against.
pub const BOARD_SIZE: u8 = 10;

/// Length of generated match identifiers.
pub const MATCH_ID_LEN: usize = 5;

/// Alphabet match identifiers are drawn from.
pub const MATCH_ID_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Draws `start_match` makes before giving up on finding an unused id.
pub const MATCH_ID_ATTEMPTS: usize = 64;

/// Environment variable read by `init_logging`.
pub const LOG_ENV_VAR: &str = "BATTLESHIP_LOG";
