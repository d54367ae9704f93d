//! Metrics tracking for the destination mapper
//!
//! Lock-free counters of mapped and failed events per destination, with a
//! serializable snapshot and Prometheus text rendering.

use crate::destinations::Destination;
use crate::models::Operation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters for one destination
#[derive(Debug, Default)]
pub struct DestinationCounters {
    pub identify: AtomicU64,
    pub track: AtomicU64,
    pub failures: AtomicU64,
}

impl DestinationCounters {
    fn stats(&self, name: &str) -> DestinationStats {
        DestinationStats {
            name: name.to_string(),
            identify: self.identify.load(Ordering::Relaxed),
            track: self.track.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Metrics collector shared by every dispatch
#[derive(Debug, Default)]
pub struct MappingMetrics {
    help_scout: DestinationCounters,
    outbound: DestinationCounters,
    /// Failures that could not be attributed to a destination
    unattributed_failures: AtomicU64,
}

/// Per-destination statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationStats {
    pub name: String,
    pub identify: u64,
    pub track: u64,
    pub failures: u64,
}

/// Metrics snapshot for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub total_mapped: u64,
    pub total_failures: u64,
    pub destinations: HashMap<String, DestinationStats>,
}

impl MappingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn counters(&self, destination: Destination) -> &DestinationCounters {
        match destination {
            Destination::HelpScout => &self.help_scout,
            Destination::Outbound => &self.outbound,
        }
    }

    pub fn record_success(&self, destination: Destination, operation: Operation) {
        let counters = self.counters(destination);
        let counter = match operation {
            Operation::Identify => &counters.identify,
            Operation::Track => &counters.track,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, destination: Option<Destination>) {
        match destination {
            Some(destination) => self.counters(destination).failures.fetch_add(1, Ordering::Relaxed),
            None => self.unattributed_failures.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let destinations: HashMap<String, DestinationStats> = Destination::ALL
            .iter()
            .map(|destination| {
                let key = destination_label(*destination);
                (key.to_string(), self.counters(*destination).stats(key))
            })
            .collect();

        let total_mapped = destinations.values().map(|s| s.identify + s.track).sum();
        let total_failures = destinations.values().map(|s| s.failures).sum::<u64>()
            + self.unattributed_failures.load(Ordering::Relaxed);

        MetricsSnapshot {
            timestamp: Utc::now(),
            total_mapped,
            total_failures,
            destinations,
        }
    }

    /// Render the counters in Prometheus text exposition format
    pub fn to_prometheus_format(&self) -> String {
        let mut output = String::new();

        output.push_str("# HELP destination_mapper_events_total Events mapped per destination\n");
        output.push_str("# TYPE destination_mapper_events_total counter\n");
        for destination in Destination::ALL {
            let label = destination_label(destination);
            let counters = self.counters(destination);
            for (operation, counter) in [
                (Operation::Identify, &counters.identify),
                (Operation::Track, &counters.track),
            ] {
                output.push_str(&format!(
                    "destination_mapper_events_total{{destination=\"{}\",operation=\"{}\"}} {}\n",
                    label,
                    operation.as_str(),
                    counter.load(Ordering::Relaxed)
                ));
            }
        }

        output.push_str("# HELP destination_mapper_failures_total Events that could not be mapped\n");
        output.push_str("# TYPE destination_mapper_failures_total counter\n");
        for destination in Destination::ALL {
            output.push_str(&format!(
                "destination_mapper_failures_total{{destination=\"{}\"}} {}\n",
                destination_label(destination),
                self.counters(destination).failures.load(Ordering::Relaxed)
            ));
        }
        output.push_str(&format!(
            "destination_mapper_failures_total{{destination=\"unknown\"}} {}\n",
            self.unattributed_failures.load(Ordering::Relaxed)
        ));

        output
    }
}

fn destination_label(destination: Destination) -> &'static str {
    match destination {
        Destination::HelpScout => "help_scout",
        Destination::Outbound => "outbound",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let snapshot = MappingMetrics::new().snapshot();
        assert_eq!(snapshot.total_mapped, 0);
        assert_eq!(snapshot.total_failures, 0);
        assert_eq!(snapshot.destinations.len(), 2);
    }

    #[test]
    fn test_record_success_and_failure() {
        let metrics = MappingMetrics::new();
        metrics.record_success(Destination::Outbound, Operation::Identify);
        metrics.record_success(Destination::Outbound, Operation::Track);
        metrics.record_success(Destination::HelpScout, Operation::Identify);
        metrics.record_failure(Some(Destination::HelpScout));
        metrics.record_failure(None);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_mapped, 3);
        assert_eq!(snapshot.total_failures, 2);

        let outbound = &snapshot.destinations["outbound"];
        assert_eq!((outbound.identify, outbound.track, outbound.failures), (1, 1, 0));

        let help_scout = &snapshot.destinations["help_scout"];
        assert_eq!((help_scout.identify, help_scout.track, help_scout.failures), (1, 0, 1));
    }

    #[test]
    fn test_prometheus_format() {
        let metrics = MappingMetrics::new();
        metrics.record_success(Destination::Outbound, Operation::Track);

        let output = metrics.to_prometheus_format();
        assert!(output.contains("# TYPE destination_mapper_events_total counter"));
        assert!(output.contains(
            "destination_mapper_events_total{destination=\"outbound\",operation=\"track\"} 1"
        ));
        assert!(output.contains("destination_mapper_failures_total{destination=\"unknown\"} 0"));
    }
}
