//! Bundled "Personal Finance" catalog used for seeding and the in-memory backend.

use learn_core::Error as CoreError;
use learn_core::model::{
    DeckId, Flashcard, FlashcardDeck, Goal, GoalId, LeaderboardEntry, LeaderboardScope,
    LessonDraft, LessonId, QuestionDraft, QuestionId, QuizDraft, QuizId,
};

/// Every record a content backend can hold.
#[derive(Debug, Clone, Default)]
pub struct SampleCatalog {
    pub lessons: Vec<LessonDraft>,
    pub quizzes: Vec<QuizDraft>,
    pub decks: Vec<FlashcardDeck>,
    pub goals: Vec<Goal>,
    pub leaderboards: Vec<(LeaderboardScope, Vec<LeaderboardEntry>)>,
}

impl SampleCatalog {
    /// The budgeting lesson, its quizzes, the reinforcement deck, goals, and leaderboards.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if any bundled record fails validation.
    pub fn budgeting() -> Result<Self, CoreError> {
        let lesson_id = LessonId::new("budgeting-101")?;

        let lesson = LessonDraft {
            id: lesson_id.clone(),
            title: "Budgeting 101".into(),
            topic: "Personal Finance".into(),
            content: "Learn the fundamentals of creating and managing a personal budget. \
                      We'll cover the 50/30/20 rule, tracking expenses, and building \
                      sustainable spending habits."
                .into(),
            steps: vec![
                "Track your expenses for one week".into(),
                "Categorize your spending into needs vs wants".into(),
                "Allocate 50% for needs, 30% for wants, 20% for savings".into(),
            ],
            xp_reward: 15,
        };

        let lesson_quiz = QuizDraft {
            id: QuizId::new("budgeting-quiz")?,
            lesson_id: lesson_id.clone(),
            questions: vec![
                question(
                    "1",
                    "What is the first step in creating a budget?",
                    &[
                        "Set financial goals",
                        "Track your expenses",
                        "Calculate income",
                        "Pay bills",
                    ],
                    1,
                )?,
                question(
                    "2",
                    "In the 50/30/20 rule, what does the 20% represent?",
                    &["Entertainment", "Housing", "Savings", "Food"],
                    2,
                )?,
                question(
                    "3",
                    "Which category is considered a \"need\"?",
                    &[
                        "Netflix subscription",
                        "Rent payment",
                        "Dining out",
                        "Gym membership",
                    ],
                    1,
                )?,
            ],
        };

        let daily_quiz = QuizDraft {
            id: QuizId::new("daily-reinforcement")?,
            lesson_id,
            questions: vec![
                question(
                    "1",
                    "What percentage should you allocate for needs in the 50/30/20 rule?",
                    &["30%", "50%", "20%", "40%"],
                    1,
                )?,
                question(
                    "2",
                    "Which category should emergency savings fall under?",
                    &["Needs", "Wants", "Savings", "Investments"],
                    2,
                )?,
            ],
        };

        let deck = FlashcardDeck::new(
            DeckId::new("budgeting-basics")?,
            "Budgeting Memory Check",
            vec![
                Flashcard::new(
                    "What does the 50% represent in the 50/30/20 rule?",
                    "Essential needs like housing, food, utilities, and minimum debt payments",
                    "Budgeting Basics",
                )?,
                Flashcard::new(
                    "Name three examples of 'wants' in a budget",
                    "Entertainment, dining out, hobbies, subscriptions, and non-essential shopping",
                    "Budgeting Basics",
                )?,
                Flashcard::new(
                    "What should you do before creating a budget?",
                    "Track your expenses for at least one week to understand your spending patterns",
                    "Budget Planning",
                )?,
                Flashcard::new(
                    "Why is the 20% savings rate important?",
                    "It builds an emergency fund, pays off debt, and creates long-term financial security",
                    "Saving Strategies",
                )?,
                Flashcard::new(
                    "How often should you review your budget?",
                    "Monthly to track progress and make adjustments based on changing circumstances",
                    "Budget Management",
                )?,
            ],
        )?;

        let goals = vec![
            Goal::new(
                GoalId::new("personal-finance")?,
                "Personal Finance",
                "Master budgeting, saving, and investing",
                "12 lessons",
                "Beginner",
            )?,
            Goal::new(
                GoalId::new("python-basics")?,
                "Python Basics",
                "Learn programming fundamentals",
                "15 lessons",
                "Beginner",
            )?,
            Goal::new(
                GoalId::new("english-communication")?,
                "English Communication",
                "Improve speaking and writing skills",
                "10 lessons",
                "Intermediate",
            )?,
        ];

        let global = vec![
            entry(1, "Sarah Chen", 2890, 45, 6),
            entry(2, "Alex Rodriguez", 2650, 32, 5),
            entry(3, "Maya Patel", 2340, 28, 5),
            entry(4, "David Kim", 2180, 22, 4),
            entry(5, "Emma Wilson", 1890, 19, 4),
            entry(6, "Jainil", 1250, 12, 3),
            entry(7, "Ryan Foster", 1180, 15, 3),
            entry(8, "Lily Zhang", 980, 8, 2),
        ];
        let friends = vec![
            entry(1, "Alex Rodriguez", 2650, 32, 5),
            entry(2, "Maya Patel", 2340, 28, 5),
            entry(3, "Jainil", 1250, 12, 3),
            entry(4, "Ryan Foster", 1180, 15, 3),
            entry(5, "Lily Zhang", 980, 8, 2),
        ];

        Ok(Self {
            lessons: vec![lesson],
            quizzes: vec![lesson_quiz, daily_quiz],
            decks: vec![deck],
            goals,
            leaderboards: vec![
                (LeaderboardScope::Global, global),
                (LeaderboardScope::Friends, friends),
            ],
        })
    }
}

fn question(
    id: &str,
    text: &str,
    options: &[&str],
    correct_answer: usize,
) -> Result<QuestionDraft, CoreError> {
    Ok(QuestionDraft {
        id: QuestionId::new(id)?,
        question: text.into(),
        options: options.iter().map(|o| (*o).to_string()).collect(),
        correct_answer,
        xp_reward: 10,
    })
}

fn entry(rank: u32, name: &str, xp: u64, streak: u32, level: u32) -> LeaderboardEntry {
    LeaderboardEntry {
        rank,
        name: name.into(),
        xp,
        streak,
        level,
    }
}
