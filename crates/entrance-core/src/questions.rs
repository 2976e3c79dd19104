//! The fixed entrance-exam question bank.

use serde::{Deserialize, Serialize};

/// Number of questions in the standard bank.
pub const EXAM_QUESTIONS: usize = 10;

/// Option labels, in display order.
pub const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: [String; 4],
    /// Index into `options`, 0..=3.
    pub correct_option: usize,
    /// Weight of the question.
    pub marks: u32,
    pub category: String,
    /// 1 (easy) to 5 (hard).
    pub difficulty: u8,
}

impl Question {
    pub fn new(
        text: &str,
        options: [&str; 4],
        correct: char,
        category: &str,
        difficulty: u8,
    ) -> Self {
        let correct_option = label_index(correct);
        debug_assert!(
            correct_option.is_some(),
            "correct answer must be A-D, got {correct:?}"
        );
        Self {
            text: text.to_string(),
            options: options.map(str::to_string),
            // Out of range: no pick can match.
            correct_option: correct_option.unwrap_or(OPTION_LABELS.len()),
            marks: 1,
            category: category.to_string(),
            difficulty,
        }
    }

    pub fn with_marks(mut self, marks: u32) -> Self {
        self.marks = marks;
        self
    }

    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_option
    }

    /// Label of the correct option, or `?` if `correct_option` is out of range.
    pub fn correct_label(&self) -> char {
        OPTION_LABELS
            .get(self.correct_option)
            .copied()
            .unwrap_or('?')
    }
}

/// Map `A`-`D` (any case) to an option index.
pub fn label_index(label: char) -> Option<usize> {
    OPTION_LABELS
        .iter()
        .position(|&l| l == label.to_ascii_uppercase())
}

/// Highest reachable score for a bank.
pub fn max_score(bank: &[Question]) -> f64 {
    bank.iter().map(|q| f64::from(q.marks)).sum()
}

/// The standard ten-question entrance exam.
pub fn standard_bank() -> Vec<Question> {
    vec![
        Question::new(
            "The word 'engineer' has its primary stress on its ______ syllable:",
            ["first", "second", "third", "fourth"],
            'C',
            "English",
            2,
        ),
        Question::new(
            "Two and two _____ four.",
            ["makes", "make", "have made", "will be made"],
            'A',
            "English",
            1,
        ),
        Question::new(
            "pH of 0.2 N H2SO4 is:",
            ["0.69", "1.2", "0.76", "0.56"],
            'A',
            "Chemistry",
            3,
        ),
        Question::new(
            "Catalytic oxidation of ammonia in air forms:",
            ["NO2", "N2O5", "N2O", "NO"],
            'D',
            "Chemistry",
            3,
        ),
        Question::new(
            "The magnetism of the magnet is due to:",
            [
                "the spin motion of electron",
                "cosmic ray",
                "the earth",
                "pressure of big magnet inside the earth",
            ],
            'A',
            "Physics",
            2,
        ),
        Question::new(
            "The maximum percentage of ingredients in cement is that of:",
            ["magnesia", "lime", "alumina", "silica"],
            'B',
            "Chemistry",
            4,
        ),
        Question::new(
            "The second derivative of f(x) = 1/x at point (1,1) is equal to:",
            ["1", "-1", "2", "-2"],
            'C',
            "Mathematics",
            4,
        ),
        Question::new(
            "Which of the following is a logic gate?",
            ["PUT", "THEN", "NOR", "WHEN"],
            'C',
            "Computer Science",
            2,
        ),
        Question::new(
            "If the line 2x+3y+4+k(-x+y+5)=0 is horizontal then the value of k is:",
            ["0", "1", "3", "2"],
            'D',
            "Mathematics",
            5,
        ),
        Question::new(
            "IUPAC name of CH3-CH2-CH2-CH(OCH3)-CO Br is:",
            [
                "2-methoxylpentanoyl bromide",
                "3-methoxylpentanoyl bromide",
                "3-methoxyhexanoyl bromide",
                "2-methoxyhexanoyl bromide",
            ],
            'A',
            "Chemistry",
            5,
        ),
    ]
}
