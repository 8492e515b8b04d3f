//! Process-level error type.
//!
//! Every failure carries the exit code `main` should return.

/// Bad input: unreadable files, schema problems, invalid flags.
pub const EXIT_INPUT: u8 = 2;
/// The register had no usable rows after validation/filtering.
pub const EXIT_NO_ROWS: u8 = 3;
/// Unexpected internal failure (export/serialization).
pub const EXIT_INTERNAL: u8 = 4;
/// `risk register --check` found assessments needing action.
pub const EXIT_CHECK_FAILED: u8 = 5;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
