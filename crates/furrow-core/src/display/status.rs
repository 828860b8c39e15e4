//! Status and confirmation message types for operation feedback.

use std::fmt;

/// One-line confirmation for operations that have no richer result, such as
/// a sweep or a reminder sync.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }

    /// Confirmation for a cleanup sweep.
    pub fn swept(removed: usize) -> Self {
        match removed {
            0 => Self::success("No expired plans to remove."),
            1 => Self::success("Removed 1 expired plan."),
            n => Self::success(format!("Removed {n} expired plans.")),
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.success { "Success:" } else { "Error:" };
        writeln!(f, "{label} {}", self.message)
    }
}
