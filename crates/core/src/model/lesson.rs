use serde::{Deserialize, Serialize};

use crate::model::ids::LessonId;
use crate::model::validation::{ContentError, require_text};

//
// ─── LESSON TYPES ──────────────────────────────────────────────────────────────
//

/// Unvalidated lesson as authored in the content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDraft {
    pub id: LessonId,
    pub title: String,
    pub topic: String,
    pub content: String,
    pub steps: Vec<String>,
    pub xp_reward: u32,
}

impl LessonDraft {
    /// Validate the draft into an immutable `Lesson`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptyField` if the title, topic, or a step is blank.
    pub fn validate(self) -> Result<Lesson, ContentError> {
        let title = require_text(self.title, "lesson title")?;
        let topic = require_text(self.topic, "lesson topic")?;
        let steps = self
            .steps
            .into_iter()
            .map(|step| require_text(step, "lesson step"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Lesson {
            id: self.id,
            title,
            topic,
            content: self.content,
            steps,
            xp_reward: self.xp_reward,
        })
    }
}

/// A unit of instructional content with ordered steps and an XP reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lesson {
    id: LessonId,
    title: String,
    topic: String,
    content: String,
    steps: Vec<String>,
    xp_reward: u32,
}

impl Lesson {
    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    #[must_use]
    pub fn xp_reward(&self) -> u32 {
        self.xp_reward
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> LessonDraft {
        LessonDraft {
            id: LessonId::new("budgeting-101").unwrap(),
            title: "Budgeting 101".into(),
            topic: "Personal Finance".into(),
            content: "Learn the fundamentals of a personal budget.".into(),
            steps: vec![
                "Track your expenses for one week".into(),
                "Categorize your spending into needs vs wants".into(),
            ],
            xp_reward: 15,
        }
    }

    #[test]
    fn valid_lesson_keeps_step_order() {
        let lesson = draft().validate().unwrap();
        assert_eq!(lesson.title(), "Budgeting 101");
        assert_eq!(lesson.steps().len(), 2);
        assert_eq!(lesson.steps()[0], "Track your expenses for one week");
        assert_eq!(lesson.xp_reward(), 15);
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut d = draft();
        d.title = "  ".into();
        let err = d.validate().unwrap_err();
        assert_eq!(
            err,
            ContentError::EmptyField {
                field: "lesson title"
            }
        );
    }

    #[test]
    fn blank_step_is_rejected() {
        let mut d = draft();
        d.steps.push(String::new());
        assert!(matches!(
            d.validate(),
            Err(ContentError::EmptyField {
                field: "lesson step"
            })
        ));
    }
}
