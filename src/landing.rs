use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

const KEYWORDS: [&str; 3] = ["Interviews", "Presentations", "Customer Calls"];

/// Cycles the landing page keyword on a fixed interval
#[derive(Debug, Clone)]
pub struct KeywordRotator {
    keywords: Vec<String>,
    interval: Duration,
    started: Instant,
}

impl KeywordRotator {
    pub fn new(interval: Duration) -> Self {
        Self::with_keywords(KEYWORDS.iter().map(|k| k.to_string()).collect(), interval)
    }

    pub fn with_keywords(keywords: Vec<String>, interval: Duration) -> Self {
        Self {
            keywords,
            interval: interval.max(Duration::from_millis(1)),
            started: Instant::now(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn index_at(&self, elapsed: Duration) -> usize {
        if self.keywords.is_empty() {
            return 0;
        }
        let steps = elapsed.as_millis() / self.interval.as_millis();
        (steps % self.keywords.len() as u128) as usize
    }

    pub fn current(&self) -> &str {
        self.keywords
            .get(self.index_at(self.started.elapsed()))
            .map(String::as_str)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureCard {
    pub title: &'static str,
    pub description: &'static str,
}

/// Marketing content for the landing route
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingContent {
    pub headline: &'static str,
    pub keywords: Vec<String>,
    pub current_keyword: String,
    pub description: &'static str,
    pub call_to_action: CallToAction,
    pub cards: Vec<FeatureCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallToAction {
    pub label: &'static str,
    pub href: &'static str,
}

impl LandingContent {
    pub fn build(rotator: &KeywordRotator) -> Self {
        Self {
            headline: "Your AI Feedback Partner in:",
            keywords: rotator.keywords().to_vec(),
            current_keyword: rotator.current().to_string(),
            description: "CommuniSync is your AI communication coach, offering real-time feedback \
                to help you speak confidently during calls. Get personalized suggestions and \
                actionable insights. Your progress is tracked privately, just for you.",
            call_to_action: CallToAction {
                label: "Try for Free",
                href: "/login",
            },
            cards: vec![
                FeatureCard {
                    title: "Get feedback on your communication in real-time",
                    description: "Designed to be not distracting and immediately actionable. \
                        The best part? No one else knows you're using it.",
                },
                FeatureCard {
                    title: "Stay clear and focused with live speaker notes",
                    description: "CommuniSync automatically brings up your meeting notes and \
                        crosses items off as you cover them, so you can easily track what's left.",
                },
                FeatureCard {
                    title: "Immediate Actionable feedback on what to try for next time",
                    description: "CommuniSync provides feedback based on meeting goals. \
                        Track progress on your growth areas over time.",
                },
                FeatureCard {
                    title: "Let AI make follow-ups easier",
                    description: "With AI, streamline your follow-up processes, making \
                        communication more effective and efficient.",
                },
            ],
        }
    }
}
