use crate::numerics::special::{BesselError, GauntError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type MultipoleResult<T> = Result<T, MultipoleError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultipoleErrorCategory {
    Usage,
    InputValidation,
    IoSystem,
    Computation,
    Internal,
}

impl MultipoleErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Usage => 1,
            Self::InputValidation => 2,
            Self::IoSystem => 3,
            Self::Computation => 4,
            Self::Internal => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Usage => "Usage",
            Self::InputValidation => "InputValidation",
            Self::IoSystem => "IoSystem",
            Self::Computation => "Computation",
            Self::Internal => "Internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipoleError {
    category: MultipoleErrorCategory,
    code: &'static str,
    message: String,
}

impl MultipoleError {
    pub fn new(
        category: MultipoleErrorCategory,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code,
            message: message.into(),
        }
    }

    pub fn usage(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(MultipoleErrorCategory::Usage, code, message)
    }

    pub fn input_validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(MultipoleErrorCategory::InputValidation, code, message)
    }

    pub fn io_system(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(MultipoleErrorCategory::IoSystem, code, message)
    }

    pub fn computation(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(MultipoleErrorCategory::Computation, code, message)
    }

    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(MultipoleErrorCategory::Internal, code, message)
    }

    pub const fn category(&self) -> MultipoleErrorCategory {
        self.category
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.code, self.message)
    }
}

impl Display for MultipoleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.code,
            self.message
        )
    }
}

impl Error for MultipoleError {}

impl From<BesselError> for MultipoleError {
    fn from(error: BesselError) -> Self {
        let code = match error {
            BesselError::NegativeOrder { .. } => "BESSEL.NEGATIVE_ORDER",
            BesselError::NanArgument { .. } => "BESSEL.NAN_ARGUMENT",
        };
        Self::input_validation(code, error.to_string())
    }
}

impl From<GauntError> for MultipoleError {
    fn from(error: GauntError) -> Self {
        match error {
            GauntError::InvalidIndices { .. } => {
                Self::input_validation("GAUNT.INVALID_INDICES", error.to_string())
            }
            GauntError::BufferTooShort { .. } => {
                Self::internal("GAUNT.BUFFER_TOO_SHORT", error.to_string())
            }
        }
    }
}
