use std::time::Duration;
use anyhow::{Context, Result};
use clap::Parser;

const DEFAULT_BROKERS: &str = "127.0.0.1:9092";
const DEFAULT_METRICS_PORT: u16 = 9090;

/// Runtime settings, taken from the command line or `UITPAS_SYNC_*` variables
#[derive(Parser, Debug, Clone)]
#[command(name = "uitpas-sync", about = "Keeps UiTPAS labels of events in line with their card systems", version)]
pub struct Settings {
    #[arg(long, env = "UITPAS_SYNC_BROKERS", default_value = DEFAULT_BROKERS, help = "Redpanda bootstrap servers")]
    pub brokers: String,

    #[arg(long, env = "UITPAS_SYNC_CONSUMER_GROUP", default_value = "uitpas-sync")]
    pub consumer_group: String,

    #[arg(long, env = "UITPAS_SYNC_EVENTS_TOPIC", default_value = "uitpas-events", help = "Topic carrying UiTPAS events")]
    pub events_topic: String,

    #[arg(long, env = "UITPAS_SYNC_COMMANDS_TOPIC", default_value = "udb3-commands", help = "Topic receiving event commands")]
    pub commands_topic: String,

    #[arg(long, env = "UITPAS_SYNC_REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    #[arg(long, env = "UITPAS_SYNC_DOCUMENT_PREFIX", default_value = "event_jsonld:", help = "Key prefix of event documents")]
    pub document_prefix: String,

    #[arg(long, env = "UITPAS_SYNC_LABELS_URL", help = "Endpoint returning the UiTPAS label vocabulary")]
    pub labels_url: String,

    #[arg(long, env = "UITPAS_SYNC_API_URL", help = "Base URL of the UiTPAS API")]
    pub uitpas_api_url: String,

    #[arg(long, env = "UITPAS_SYNC_HTTP_TIMEOUT_SECS", default_value_t = 10)]
    pub http_timeout_secs: u64,

    #[arg(
        long,
        env = "UITPAS_SYNC_VOCABULARY_TTL_SECS",
        default_value_t = 300,
        help = "How long the label vocabulary is cached, 0 disables the cache"
    )]
    pub vocabulary_ttl_secs: u64,

    #[arg(long, env = "UITPAS_SYNC_METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("brokers", &self.brokers),
            ("consumer group", &self.consumer_group),
            ("events topic", &self.events_topic),
            ("commands topic", &self.commands_topic),
        ] {
            anyhow::ensure!(!value.trim().is_empty(), "{} must not be empty", name);
        }

        reqwest::Url::parse(&self.labels_url)
            .with_context(|| format!("invalid labels url {:?}", self.labels_url))?;
        reqwest::Url::parse(&self.uitpas_api_url)
            .with_context(|| format!("invalid UiTPAS API url {:?}", self.uitpas_api_url))?;
        anyhow::ensure!(
            self.redis_url.starts_with("redis://") || self.redis_url.starts_with("rediss://"),
            "redis url must use the redis:// or rediss:// scheme"
        );
        anyhow::ensure!(self.http_timeout_secs > 0, "http timeout must be at least one second");

        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// `None` when vocabulary caching is switched off
    pub fn vocabulary_ttl(&self) -> Option<Duration> {
        (self.vocabulary_ttl_secs > 0).then(|| Duration::from_secs(self.vocabulary_ttl_secs))
    }
}
