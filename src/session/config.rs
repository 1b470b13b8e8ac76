use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Interview difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

/// Setup parameters for an interview session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Position being interviewed for (e.g., "Software Engineer")
    pub role: String,

    #[serde(default)]
    pub difficulty: Difficulty,

    /// Subject area (e.g., "System Design")
    pub topic: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("role is required")]
    MissingRole,

    #[error("topic is required")]
    MissingTopic,
}

impl SessionConfig {
    pub fn new(role: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            difficulty: Difficulty::default(),
            topic: topic.into(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.role.trim().is_empty() {
            return Err(ValidationError::MissingRole);
        }
        if self.topic.trim().is_empty() {
            return Err(ValidationError::MissingTopic);
        }
        Ok(())
    }

    /// Opening assistant message for a session with this config
    pub fn greeting(&self) -> String {
        format!(
            "Hello! I'll be your interviewer today for the {} position. \
             We'll focus on {} at the {} level. Let's begin: tell me a bit about yourself.",
            self.role, self.topic, self.difficulty
        )
    }
}
