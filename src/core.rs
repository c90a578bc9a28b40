pub mod leaderboard;
pub mod questions;
pub mod scan;
pub mod templates;
