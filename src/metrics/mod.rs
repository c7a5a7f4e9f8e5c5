mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};

pub use server::start_metrics_server;

// ============================================================================
// Metrics - Prometheus metrics for the label sync
// ============================================================================
//
// - Consumed UiTPAS events (throughput, failures, latency)
// - Commands published to the command bus and commands rejected on the way
// - Circuit breaker state of the command bus producer
//
// Scraped via /metrics on the metrics server.
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub events_processed: IntCounterVec,
    pub events_failed: IntCounterVec,
    pub event_processing_duration: HistogramVec,
    pub messages_undecodable: IntCounter,

    pub commands_dispatched: IntCounterVec,
    pub commands_rejected: IntCounterVec,

    pub circuit_breaker_state: IntGauge,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let events_processed = IntCounterVec::new(
            Opts::new("uitpas_events_processed_total", "Total UiTPAS events handled"),
            &["event_type"],
        )?;
        registry.register(Box::new(events_processed.clone()))?;

        let events_failed = IntCounterVec::new(
            Opts::new("uitpas_events_failed_total", "Total UiTPAS events whose handling failed"),
            &["event_type"],
        )?;
        registry.register(Box::new(events_failed.clone()))?;

        let event_processing_duration = HistogramVec::new(
            HistogramOpts::new("uitpas_event_processing_duration_seconds", "UiTPAS event handling duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["event_type"],
        )?;
        registry.register(Box::new(event_processing_duration.clone()))?;

        let messages_undecodable = IntCounter::new(
            "uitpas_messages_undecodable_total",
            "Messages on the events topic that could not be decoded",
        )?;
        registry.register(Box::new(messages_undecodable.clone()))?;

        let commands_dispatched = IntCounterVec::new(
            Opts::new("commands_dispatched_total", "Commands published to the command bus"),
            &["command"],
        )?;
        registry.register(Box::new(commands_dispatched.clone()))?;

        let commands_rejected = IntCounterVec::new(
            Opts::new("commands_rejected_total", "Commands that were not published"),
            &["command", "reason"],
        )?;
        registry.register(Box::new(commands_rejected.clone()))?;

        let circuit_breaker_state = IntGauge::new(
            "circuit_breaker_state",
            "Command bus circuit breaker state (0=Closed, 1=Open, 2=HalfOpen)",
        )?;
        registry.register(Box::new(circuit_breaker_state.clone()))?;

        Ok(Self {
            registry,
            events_processed,
            events_failed,
            event_processing_duration,
            messages_undecodable,
            commands_dispatched,
            commands_rejected,
            circuit_breaker_state,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_event(&self, event_type: &str, duration_secs: f64, success: bool) {
        if success {
            self.events_processed.with_label_values(&[event_type]).inc();
        } else {
            self.events_failed.with_label_values(&[event_type]).inc();
        }
        self.event_processing_duration
            .with_label_values(&[event_type])
            .observe(duration_secs);
    }

    pub fn record_undecodable_message(&self) {
        self.messages_undecodable.inc();
    }

    pub fn record_command_dispatched(&self, command: &str) {
        self.commands_dispatched.with_label_values(&[command]).inc();
    }

    pub fn record_command_rejected(&self, command: &str, reason: &str) {
        self.commands_rejected.with_label_values(&[command, reason]).inc();
    }

    pub fn update_circuit_breaker_state(&self, state: i64) {
        self.circuit_breaker_state.set(state);
    }
}
