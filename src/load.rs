//! Load generator for a running instance (`naughty-nice load`).
use futures::{stream, StreamExt};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use crate::cli::{LoadArgs, Scenario};
use crate::core::questions::{self, QUESTIONS};
use crate::core::scan::NewScanResult;
use crate::error::AppResult;

pub mod client;
pub mod report;

use client::{Endpoint, QuizClient};
use report::LoadReport;

const COUNTRIES: [&str; 6] = ["FI", "FR", "US", "JP", "BR", "NO"];
// In the mixed scenario, one request out of this many is a submission.
const MIXED_SUBMISSION_EVERY: usize = 10;
// What a front-end session does, in order.
const JOURNEY: [Endpoint; 4] = [
    Endpoint::Health,
    Endpoint::Questions,
    Endpoint::ScanResults,
    Endpoint::Leaderboard,
];

/// Which endpoint the `index`-th request of a scenario targets.
pub fn plan(scenario: Scenario, index: usize) -> Endpoint {
    match scenario {
        Scenario::Leaderboard => Endpoint::Leaderboard,
        Scenario::Submit => Endpoint::ScanResults,
        Scenario::Mixed => match index % MIXED_SUBMISSION_EVERY == MIXED_SUBMISSION_EVERY - 1 {
            true => Endpoint::ScanResults,
            false => Endpoint::Leaderboard,
        },
        Scenario::Journey => JOURNEY[index % JOURNEY.len()],
    }
}

/// A plausible quiz submission, answers derived from the request index.
pub fn synthetic_submission(index: usize) -> NewScanResult {
    let picks = QUESTIONS
        .iter()
        .enumerate()
        .map(|(q, question)| (index + q) % question.answers.len())
        .collect::<Vec<usize>>();
    let (score, verdict) = questions::verdict(&picks);
    let elf = Uuid::new_v4().simple().to_string();

    NewScanResult {
        name: format!("elf-{}", &elf[..8]),
        verdict,
        score: score.into(),
        message: None,
        country: Some(COUNTRIES[index % COUNTRIES.len()].to_string()),
    }
}

pub async fn run(args: &LoadArgs) -> AppResult<LoadReport> {
    let client = QuizClient::new(&args.target, Duration::from_secs(args.timeout_secs))?;
    info!(
        target = %args.target,
        scenario = %args.scenario,
        users = args.users,
        requests = args.requests,
        "Starting load test."
    );

    let started = Instant::now();
    let outcomes = stream::iter(0..args.requests)
        .map(|index| {
            let client = &client;
            async move {
                match plan(args.scenario, index) {
                    Endpoint::Leaderboard => client.leaderboard().await,
                    Endpoint::ScanResults => client.submit(&synthetic_submission(index)).await,
                    Endpoint::Questions => client.questions().await,
                    Endpoint::Health => client.health().await,
                }
            }
        })
        .buffer_unordered(args.users.max(1))
        .collect::<Vec<_>>()
        .await;
    let elapsed = started.elapsed();

    let mut samples = Vec::with_capacity(outcomes.len());
    let mut transport_errors = 0;
    for outcome in outcomes {
        match outcome {
            Ok(sample) => samples.push(sample),
            Err(e) => {
                debug!(error = %e, "Request failed.");
                transport_errors += 1;
            }
        }
    }

    Ok(LoadReport {
        scenario: args.scenario,
        samples,
        transport_errors,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scan::Verdict;

    #[test]
    fn mixed_scenario_submits_every_tenth_request() {
        let submissions = (0..100)
            .filter(|i| plan(Scenario::Mixed, *i) == Endpoint::ScanResults)
            .count();
        assert_eq!(submissions, 10);
        assert_eq!(plan(Scenario::Mixed, 9), Endpoint::ScanResults);
        assert_eq!(plan(Scenario::Leaderboard, 9), Endpoint::Leaderboard);
        assert_eq!(plan(Scenario::Submit, 0), Endpoint::ScanResults);
    }

    #[test]
    fn journey_scenario_walks_every_endpoint() {
        let endpoints = (0..8)
            .map(|i| plan(Scenario::Journey, i))
            .collect::<Vec<Endpoint>>();
        assert_eq!(
            endpoints,
            vec![
                Endpoint::Health,
                Endpoint::Questions,
                Endpoint::ScanResults,
                Endpoint::Leaderboard,
                Endpoint::Health,
                Endpoint::Questions,
                Endpoint::ScanResults,
                Endpoint::Leaderboard,
            ]
        );
    }

    #[test]
    fn synthetic_submissions_are_valid() {
        for index in 0..12 {
            let submission = synthetic_submission(index);
            let expected = Verdict::from_score(submission.score as u8);
            assert_eq!(submission.verdict, expected);
            assert!(submission.into_scan_result().is_ok());
        }
    }
}
