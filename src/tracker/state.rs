use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::MangoError;

/// Workflow state of a story, as stored in its `current_state` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryState {
    Accepted,
    Delivered,
    Finished,
    Started,
    Rejected,
    Unstarted,
    Unscheduled,
}

impl StoryState {
    pub const ALL: [StoryState; 7] = [
        StoryState::Accepted,
        StoryState::Delivered,
        StoryState::Finished,
        StoryState::Started,
        StoryState::Rejected,
        StoryState::Unstarted,
        StoryState::Unscheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoryState::Accepted => "accepted",
            StoryState::Delivered => "delivered",
            StoryState::Finished => "finished",
            StoryState::Started => "started",
            StoryState::Rejected => "rejected",
            StoryState::Unstarted => "unstarted",
            StoryState::Unscheduled => "unscheduled",
        }
    }

    /// Read the state of a story object. `None` if the field is absent or unknown.
    pub fn of(story: &Value) -> Option<Self> {
        story.get("current_state")?.as_str()?.parse().ok()
    }
}

impl FromStr for StoryState {
    type Err = MangoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        StoryState::ALL
            .into_iter()
            .find(|state| state.as_str() == lowered)
            .ok_or_else(|| MangoError::InvalidState(s.to_string()))
    }
}

impl fmt::Display for StoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
