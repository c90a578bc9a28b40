use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::cli::Scenario;
use crate::load::client::{Endpoint, Sample};
use crate::utils::{format_duration, percentile};

#[derive(Debug)]
pub struct LoadReport {
    pub scenario: Scenario,
    pub samples: Vec<Sample>,
    /// Requests that never got a response (connection refused, timeout, ...)
    pub transport_errors: usize,
    pub elapsed: Duration,
}

#[derive(Debug, PartialEq)]
pub struct EndpointStats {
    pub requests: usize,
    pub failures: usize,
    pub hits: usize,
    pub misses: usize,
    pub min: Duration,
    pub p50: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub max: Duration,
}

impl LoadReport {
    pub fn requests(&self) -> usize {
        self.samples.len() + self.transport_errors
    }

    pub fn failures(&self) -> usize {
        self.transport_errors + self.samples.iter().filter(|s| !s.is_success()).count()
    }

    pub fn throughput(&self) -> f64 {
        match self.elapsed.as_secs_f64() {
            secs if secs > 0.0 => self.requests() as f64 / secs,
            _ => 0.0,
        }
    }

    pub fn stats_per_endpoint(&self) -> HashMap<Endpoint, EndpointStats> {
        self.samples
            .iter()
            .into_group_map_by(|s| s.endpoint)
            .into_iter()
            .map(|(endpoint, samples)| (endpoint, EndpointStats::from_samples(&samples)))
            .collect()
    }
}

impl EndpointStats {
    fn from_samples(samples: &[&Sample]) -> Self {
        let sorted = samples.iter().map(|s| s.latency).sorted().collect_vec();
        let cache_count = |value: &str| {
            samples
                .iter()
                .filter(|s| s.cache.as_deref() == Some(value))
                .count()
        };

        EndpointStats {
            requests: samples.len(),
            failures: samples.iter().filter(|s| !s.is_success()).count(),
            hits: cache_count("HIT"),
            misses: cache_count("MISS"),
            min: sorted.first().copied().unwrap_or_default(),
            p50: percentile(&sorted, 50.0).unwrap_or_default(),
            p95: percentile(&sorted, 95.0).unwrap_or_default(),
            p99: percentile(&sorted, 99.0).unwrap_or_default(),
            max: sorted.last().copied().unwrap_or_default(),
        }
    }

    /// Share of cache-tagged responses that were hits.
    pub fn hit_ratio(&self) -> Option<f64> {
        match self.hits + self.misses {
            0 => None,
            tagged => Some(self.hits as f64 / tagged as f64),
        }
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Scenario '{}': {} requests in {} ({:.1} req/s), {} failed",
            self.scenario,
            self.requests(),
            format_duration(self.elapsed),
            self.throughput(),
            self.failures()
        )?;

        let stats = self.stats_per_endpoint();
        // calculate width for endpoint paths
        let width_endpoint = stats
            .keys()
            .map(|e| e.to_string().len())
            .max()
            .unwrap_or_default();

        for (endpoint, s) in stats.iter().sorted_by_key(|(e, _)| e.to_string()) {
            writeln!(
                f,
                "  {:<width_endpoint$}  n={:<6} err={:<4} min={:<8} p50={:<8} p95={:<8} p99={:<8} max={:<8} {}",
                endpoint.to_string(),
                s.requests,
                s.failures,
                format_duration(s.min),
                format_duration(s.p50),
                format_duration(s.p95),
                format_duration(s.p99),
                format_duration(s.max),
                s.hit_ratio()
                    .map_or("".to_string(), |r| format!("hit={:.0}%", r * 100.0)),
            )?;
        }
        Ok(())
    }
}
