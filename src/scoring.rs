//! Transcript assessment
//!
//! Sessions hand their transcript to a [`Scorer`] at termination. The only
//! scorer shipped today is [`CannedScorer`], which does not read the
//! transcript at all.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::session::{ChatMessage, SessionConfig};

/// Strengths and improvements shown on the feedback view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// Scorer output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    /// 0..=100
    pub performance: u8,
    pub feedback: Feedback,
}

pub trait Scorer: Send + Sync {
    fn assess(&self, config: &SessionConfig, transcript: &[ChatMessage]) -> Assessment;
}

/// Random score in a fixed range plus fixed feedback
#[derive(Debug, Clone)]
pub struct CannedScorer {
    range: Range<u8>,
}

impl CannedScorer {
    /// `range` is clamped to 0..=100 and widened to at least one value.
    pub fn new(range: Range<u8>) -> Self {
        let start = range.start.min(100);
        let end = range.end.clamp(start + 1, 101);
        Self { range: start..end }
    }

    pub fn range(&self) -> Range<u8> {
        self.range.clone()
    }

    pub fn canned_feedback() -> Feedback {
        Feedback {
            strengths: vec![
                "Good communication skills".to_string(),
                "Clear problem-solving approach".to_string(),
            ],
            improvements: vec![
                "Could provide more specific examples".to_string(),
                "Consider discussing trade-offs more".to_string(),
            ],
        }
    }
}

impl Default for CannedScorer {
    fn default() -> Self {
        Self::new(70..100)
    }
}

impl Scorer for CannedScorer {
    fn assess(&self, _config: &SessionConfig, _transcript: &[ChatMessage]) -> Assessment {
        Assessment {
            performance: rand::thread_rng().gen_range(self.range.clone()),
            feedback: Self::canned_feedback(),
        }
    }
}
