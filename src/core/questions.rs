//! Built-in quiz questions.
//!
//! Every answer carries a number of "nice points". A player's score is the
//! share of the maximum reachable nice points, scaled to 0..=100.
use crate::core::scan::Verdict;

use once_cell::sync::Lazy;
use serde::Serialize;

pub const MAX_NICE_POINTS: u8 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: &'static str,
    pub nice_points: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: u8,
    pub text: &'static str,
    pub answers: Vec<Answer>,
}

impl Question {
    fn new(id: u8, text: &'static str, answers: &[(&'static str, u8)]) -> Self {
        Question {
            id,
            text,
            answers: answers
                .iter()
                .map(|&(text, nice_points)| Answer { text, nice_points })
                .collect(),
        }
    }

    fn max_points(&self) -> u32 {
        self.answers
            .iter()
            .map(|a| a.nice_points as u32)
            .max()
            .unwrap_or_default()
    }
}

pub static QUESTIONS: Lazy<Vec<Question>> = Lazy::new(|| {
    vec![
        Question::new(
            1,
            "Your sibling gets the last cookie. You...",
            &[
                ("Congratulate them", 10),
                ("Sulk quietly", 5),
                ("Lick all the other cookies first next time", 0),
            ],
        ),
        Question::new(
            2,
            "How often did you hold the door for someone this year?",
            &[("Every single time", 10), ("When I noticed", 6), ("Doors are for me", 0)],
        ),
        Question::new(
            3,
            "A neighbour's cat is stuck in a tree.",
            &[
                ("Climb up and rescue it", 10),
                ("Call someone who can", 8),
                ("Film it for the internet", 2),
            ],
        ),
        Question::new(
            4,
            "You find a wallet on the sidewalk.",
            &[
                ("Return it untouched", 10),
                ("Return it, minus a 'finder's fee'", 3),
                ("Finders keepers", 0),
            ],
        ),
        Question::new(
            5,
            "Did you eat your vegetables?",
            &[("Always", 10), ("Most of them", 7), ("The dog did", 1)],
        ),
        Question::new(
            6,
            "Someone asks you to help them move house.",
            &[
                ("I bring boxes and snacks", 10),
                ("I show up late", 5),
                ("My phone was mysteriously off", 0),
            ],
        ),
        Question::new(
            7,
            "How did you treat the office printer this year?",
            &[
                ("With patience", 10),
                ("With mild swearing", 4),
                ("There is no office printer anymore", 0),
            ],
        ),
        Question::new(
            8,
            "What will you leave out for Santa?",
            &[
                ("Milk, cookies and a carrot for the reindeer", 10),
                ("A glass of water", 5),
                ("A bill for chimney cleaning", 0),
            ],
        ),
    ]
});

/// Score a set of picked answers, one answer index per question in order.
/// Missing or out-of-range picks count as zero nice points.
pub fn score(picks: &[usize]) -> u8 {
    let max: u32 = QUESTIONS.iter().map(Question::max_points).sum();
    if max == 0 {
        return 0;
    }

    let earned: u32 = QUESTIONS
        .iter()
        .zip(picks.iter())
        .filter_map(|(question, pick)| question.answers.get(*pick))
        .map(|answer| answer.nice_points as u32)
        .sum();

    // rounded to the nearest integer
    ((earned * 100 + max / 2) / max) as u8
}

pub fn verdict(picks: &[usize]) -> (u8, Verdict) {
    let score = score(picks);
    (score, Verdict::from_score(score))
}
