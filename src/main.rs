use std::sync::Arc;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use uitpas_sync::config::Settings;
use uitpas_sync::domain::event::{EventHasTicketSalesValidator, EventProcessManager, HttpTicketSalesOracle};
use uitpas_sync::domain::label::{CachedLabelVocabulary, HttpLabelVocabulary, LabelVocabulary};
use uitpas_sync::domain::Command;
use uitpas_sync::event_sourcing::{RedisDocumentRepository, ValidatingCommandBus};
use uitpas_sync::messaging::{EventConsumer, RedpandaClient, RedpandaCommandBus};
use uitpas_sync::metrics::{self, Metrics};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,uitpas_sync=debug"))
        )
        .init();

    let settings = Settings::parse();
    settings.validate()?;

    tracing::info!(
        brokers = %settings.brokers,
        events_topic = %settings.events_topic,
        commands_topic = %settings.commands_topic,
        "Starting UiTPAS label sync"
    );

    // === 1. Metrics ===
    let metrics = Arc::new(Metrics::new()?);
    let registry = metrics.registry().clone();
    let metrics_port = settings.metrics_port;
    std::thread::spawn(move || {
        let result = actix_web::rt::System::new()
            .block_on(metrics::start_metrics_server(registry, metrics_port));
        if let Err(e) = result {
            tracing::error!("Metrics server error: {}", e);
        }
    });

    // === 2. HTTP collaborators ===
    let http = reqwest::Client::builder()
        .timeout(settings.http_timeout())
        .build()?;

    let http_vocabulary = HttpLabelVocabulary::new(http.clone(), settings.labels_url.clone());
    let vocabulary: Arc<dyn LabelVocabulary> = match settings.vocabulary_ttl() {
        Some(ttl) => Arc::new(CachedLabelVocabulary::new(http_vocabulary, ttl)),
        None => Arc::new(http_vocabulary),
    };

    let oracle = Arc::new(HttpTicketSalesOracle::new(http, settings.uitpas_api_url.clone()));

    // === 3. Read model ===
    let documents = Arc::new(
        RedisDocumentRepository::connect(&settings.redis_url, &settings.document_prefix).await?,
    );

    // === 4. Command bus (ticket sales guard in front of Redpanda) ===
    // The label sync itself only sends label commands, which the guard lets
    // through. It checks every organizer or price command published through
    // this bus, and is exported for command buses that carry them.
    let redpanda = Arc::new(RedpandaClient::new(&settings.brokers)?);
    let redpanda_bus = Arc::new(RedpandaCommandBus::new(
        redpanda,
        settings.commands_topic.clone(),
        metrics.clone(),
    ));
    let command_bus = Arc::new(
        ValidatingCommandBus::<Command>::new(redpanda_bus)
            .with_validator(Arc::new(
                EventHasTicketSalesValidator::new(oracle).with_metrics(metrics.clone()),
            )),
    );

    // === 5. Process manager and consumer ===
    let process_manager = Arc::new(EventProcessManager::new(documents, command_bus, vocabulary));
    let consumer = EventConsumer::new(
        &settings.brokers,
        &settings.consumer_group,
        &settings.events_topic,
        process_manager,
        metrics,
    )?;

    consumer
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    tracing::info!("UiTPAS label sync stopped");

    Ok(())
}
