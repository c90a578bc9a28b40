//! Backend of the naughty-or-nice Christmas quiz.
//!
//! Players answer a few questions, get a score out of 100 and a verdict, and
//! submit it to the global leaderboard. Scan results live in a document store
//! (MongoDB); the leaderboard is served through a read-through cache (Redis)
//! that answers hits immediately and refreshes itself in the background.
//!
//! # Endpoints
//! - `GET /api/leaderboard`: top 100, tagged with `X-Cache: HIT|MISS`
//! - `POST /api/scan-results`: submit a score, invalidates the leaderboard cache
//! - `GET /api/questions`: the quiz
//! - `GET /health`: liveness
//!
//! # Running
//! ```sh
//! MONGODB_URI=mongodb://localhost:27017 REDIS_URL=redis://localhost:6379 naughty-nice serve
//! naughty-nice load --target http://localhost:3000 --scenario mixed --users 20
//! ```
pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod load;
pub mod routes;
pub mod scheduler;
pub mod server;
pub mod state;
pub mod storage;
pub mod utils;
