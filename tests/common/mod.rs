// Shared test doubles for the assistant and media seams
#![allow(dead_code)]

use async_trait::async_trait;
use communisync::assistant::{Assistant, AssistantError};
use communisync::media::{DeviceBehavior, DeviceMonitor, VirtualMediaBackend};
use communisync::InterviewSession;
use std::sync::Arc;
use std::time::Duration;

/// Replies with `"echo: <text>"` after a per-message delay.
///
/// A message starting with `slow` waits 5 seconds, anything else 1 second.
pub struct EchoAssistant;

#[async_trait]
impl Assistant for EchoAssistant {
    async fn reply(&self, text: &str) -> Result<String, AssistantError> {
        let delay = if text.starts_with("slow") { 5 } else { 1 };
        tokio::time::sleep(Duration::from_secs(delay)).await;
        Ok(format!("echo: {}", text))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// Fails every request the way an unreachable endpoint would
pub struct FailingAssistant;

#[async_trait]
impl Assistant for FailingAssistant {
    async fn reply(&self, _text: &str) -> Result<String, AssistantError> {
        Err(AssistantError::Network("connection refused".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

pub fn session_with(
    behavior: DeviceBehavior,
    assistant: Arc<dyn Assistant>,
) -> (InterviewSession, DeviceMonitor) {
    let backend = VirtualMediaBackend::with_behavior(behavior);
    let monitor = backend.monitor();
    (InterviewSession::new(Arc::new(backend), assistant), monitor)
}

pub fn echo_session() -> (InterviewSession, DeviceMonitor) {
    session_with(DeviceBehavior::Grant, Arc::new(EchoAssistant))
}
