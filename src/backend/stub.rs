use super::{Frame, PoseBackend};
use crate::error::BackendResult;
use crate::landmarks::LandmarkSet;
use async_trait::async_trait;

/// Never detects anyone. Sessions driven by it produce no scores.
#[derive(Debug, Clone)]
pub struct StubBackend {
    joint_count: usize,
    submitted: u64,
}

impl StubBackend {
    pub fn new(joint_count: usize) -> Self {
        Self {
            joint_count,
            submitted: 0,
        }
    }

    pub fn submitted(&self) -> u64 {
        self.submitted
    }
}

#[async_trait]
impl PoseBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn joint_count(&self) -> usize {
        self.joint_count
    }

    async fn submit(&mut self, _frame: &Frame) -> BackendResult<Option<LandmarkSet>> {
        self.submitted += 1;
        Ok(None)
    }

    async fn release(&mut self) -> BackendResult<()> {
        Ok(())
    }
}
