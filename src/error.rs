//! Application error type.
//!
//! Every fallible operation returns `Result<_, AppError>`; the binary maps the
//! error to a process exit code:
//!
//! - `2`: invalid input, configuration, or file IO
//! - `3`: not enough data to fit
//! - `4`: numerical or rendering failure

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub const INVALID_INPUT: u8 = 2;
    pub const INSUFFICIENT_DATA: u8 = 3;
    pub const NUMERICAL: u8 = 4;

    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(Self::INVALID_INPUT, message)
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::new(Self::INSUFFICIENT_DATA, message)
    }

    pub fn numerical(message: impl Into<String>) -> Self {
        Self::new(Self::NUMERICAL, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_carry_exit_codes() {
        assert_eq!(AppError::invalid_input("x").exit_code(), 2);
        assert_eq!(AppError::insufficient_data("x").exit_code(), 3);
        assert_eq!(AppError::numerical("x").exit_code(), 4);
        assert_eq!(AppError::numerical("boom").to_string(), "boom");
    }
}
