//! Feedback view
//!
//! Turns a statistics record (or the built-in default) into the data behind
//! the two charts and the two text lists of the feedback page. Rendering is
//! pure: no state, no I/O.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scoring::Feedback;
use crate::session::InterviewStats;

/// Values the feedback view displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDisplayStats {
    pub correct: u32,
    pub wrong: u32,
    pub unanswered: u32,
    /// [technical, behavioral, communication], each 0..=100
    pub scores: [u8; 3],
    pub feedback: Feedback,
}

impl Default for FeedbackDisplayStats {
    fn default() -> Self {
        Self {
            correct: 5,
            wrong: 3,
            unanswered: 2,
            scores: [75, 65, 80],
            feedback: Feedback {
                strengths: vec![
                    "Strong problem-solving approach".to_string(),
                    "Clear communication style".to_string(),
                    "Good technical knowledge".to_string(),
                ],
                improvements: vec![
                    "Could elaborate more on solutions".to_string(),
                    "Consider alternative approaches".to_string(),
                    "Work on time management".to_string(),
                ],
            },
        }
    }
}

impl From<&InterviewStats> for FeedbackDisplayStats {
    fn from(stats: &InterviewStats) -> Self {
        // Counts beyond the chart's range saturate
        let answered = u32::try_from(stats.questions_answered).unwrap_or(u32::MAX);
        let performance = stats.performance.min(100);
        let correct = (u64::from(answered) * u64::from(performance) + 50) / 100;
        let correct = u32::try_from(correct).unwrap_or(answered);

        Self {
            correct,
            wrong: answered.saturating_sub(correct),
            unanswered: 0,
            scores: [performance; 3],
            feedback: stats.feedback.clone(),
        }
    }
}

/// Pie chart: share of correct / wrong / unanswered questions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionChart {
    pub title: String,
    pub labels: [&'static str; 3],
    pub data: [u32; 3],
    pub background_colors: [&'static str; 3],
    pub border_colors: [&'static str; 3],
}

/// Bar chart: one score per skill, y axis fixed to 0..=100
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsChart {
    pub title: String,
    pub labels: [&'static str; 3],
    pub dataset_label: String,
    pub data: [u8; 3],
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub y_max: u8,
}

/// Everything the feedback page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReport {
    pub title: String,
    pub subtitle: String,
    /// Whether the report shows the built-in default record
    pub is_default: bool,
    pub distribution: DistributionChart,
    pub skills: SkillsChart,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

impl FeedbackReport {
    /// Render the report for `stats`, or for the default record when `None`
    pub fn render(stats: Option<&InterviewStats>) -> Self {
        let display = stats.map(FeedbackDisplayStats::from).unwrap_or_default();
        let mut report = Self::from_display(&display);
        report.is_default = stats.is_none();
        report
    }

    pub fn from_display(display: &FeedbackDisplayStats) -> Self {
        Self {
            title: "Interview Feedback".to_string(),
            subtitle: "Here's a detailed analysis of your interview performance".to_string(),
            is_default: false,
            distribution: DistributionChart {
                title: "Question Response Distribution".to_string(),
                labels: ["Correct", "Wrong", "Unanswered"],
                data: [display.correct, display.wrong, display.unanswered],
                background_colors: [
                    "rgba(75, 192, 192, 0.8)",
                    "rgba(255, 99, 132, 0.8)",
                    "rgba(255, 206, 86, 0.8)",
                ],
                border_colors: [
                    "rgba(75, 192, 192, 1)",
                    "rgba(255, 99, 132, 1)",
                    "rgba(255, 206, 86, 1)",
                ],
            },
            skills: SkillsChart {
                title: "Skills Assessment".to_string(),
                labels: ["Technical Skills", "Behavioral Skills", "Communication"],
                dataset_label: "Performance Score (%)".to_string(),
                data: display.scores,
                background_color: "rgba(53, 162, 235, 0.8)",
                border_color: "rgba(53, 162, 235, 1)",
                y_max: 100,
            },
            strengths: display.feedback.strengths.clone(),
            improvements: display.feedback.improvements.clone(),
        }
    }
}

impl fmt::Display for FeedbackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.subtitle)?;
        writeln!(f)?;

        writeln!(f, "{}", self.distribution.title)?;
        for (label, value) in self.distribution.labels.iter().zip(self.distribution.data) {
            writeln!(f, "  {:<12} {}", label, value)?;
        }
        writeln!(f)?;

        writeln!(f, "{}", self.skills.title)?;
        for (label, score) in self.skills.labels.iter().zip(self.skills.data) {
            let bar = "#".repeat(score as usize / 5);
            writeln!(f, "  {:<18} {:>3}% {}", label, score, bar)?;
        }
        writeln!(f)?;

        writeln!(f, "Strengths")?;
        for strength in &self.strengths {
            writeln!(f, "  ✓ {}", strength)?;
        }
        writeln!(f, "Areas for Improvement")?;
        for improvement in &self.improvements {
            writeln!(f, "  i {}", improvement)?;
        }
        Ok(())
    }
}
