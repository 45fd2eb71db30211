use serde::{Deserialize, Serialize};

use crate::model::ids::GoalId;
use crate::model::validation::{ContentError, require_text};

/// A learning track the user can commit to from the goal picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    id: GoalId,
    title: String,
    description: String,
    lessons_label: String,
    difficulty: String,
}

impl Goal {
    /// Create a goal.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptyField` if the title is blank.
    pub fn new(
        id: GoalId,
        title: impl Into<String>,
        description: impl Into<String>,
        lessons_label: impl Into<String>,
        difficulty: impl Into<String>,
    ) -> Result<Self, ContentError> {
        Ok(Self {
            id,
            title: require_text(title.into(), "goal title")?,
            description: description.into(),
            lessons_label: lessons_label.into(),
            difficulty: difficulty.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &GoalId {
        &self.id
    }

    /// Title stored as the user's `selected_goal`.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn lessons_label(&self) -> &str {
        &self.lessons_label
    }

    #[must_use]
    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }
}
