use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::identity::{CollegeInfo, college_code, college_for_code};

pub const DEFAULT_LOOKUP_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("student id {0} cannot be resolved")]
    Unresolvable(String),
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Resolves the college a student belongs to.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn resolve(&self, student_id: &str) -> Result<CollegeInfo, LookupError>;
}

/// Stand-in for the campus directory: waits a fixed delay, then reads the
/// college code embedded in the student id.
#[derive(Debug, Clone)]
pub struct SimulatedDirectory {
    delay: Duration,
}

impl SimulatedDirectory {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedDirectory {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKUP_DELAY)
    }
}

#[async_trait]
impl IdentityLookup for SimulatedDirectory {
    async fn resolve(&self, student_id: &str) -> Result<CollegeInfo, LookupError> {
        tokio::time::sleep(self.delay).await;
        let code = college_code(student_id).ok_or_else(|| LookupError::Unresolvable(student_id.to_string()))?;
        Ok(college_for_code(code))
    }
}
