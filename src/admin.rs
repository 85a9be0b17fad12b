//! Shared admin code check for catalog writes
//!
//! The configured code is injected at startup. Every write presents a code
//! and is rejected before any other validation when it does not match.

use crate::error::AppError;
use tracing::warn;

/// HTTP header carrying the presented admin code
pub const ADMIN_CODE_HEADER: &str = "x-admin-code";

#[derive(Clone)]
pub struct AdminGuard {
    expected: Option<String>,
}

impl std::fmt::Debug for AdminGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGuard")
            .field("configured", &self.expected.is_some())
            .finish()
    }
}

impl AdminGuard {
    pub fn new(expected: Option<String>) -> Self {
        Self {
            expected: expected.filter(|code| !code.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.expected.is_some()
    }

    /// Authorize a write presenting `presented`
    pub fn check(&self, presented: Option<&str>) -> Result<(), AppError> {
        let Some(expected) = self.expected.as_deref() else {
            warn!("Rejected catalog write: no admin code configured");
            return Err(AppError::Unauthorized(
                "catalog writes are disabled (no admin code configured)".to_string(),
            ));
        };

        match presented {
            Some(code) if constant_time_eq(code.as_bytes(), expected.as_bytes()) => Ok(()),
            Some(_) => {
                warn!("Rejected catalog write: admin code mismatch");
                Err(AppError::Unauthorized("admin code mismatch".to_string()))
            }
            None => Err(AppError::Unauthorized("admin code required".to_string())),
        }
    }
}

/// Compare without short-circuiting on the first differing byte
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
