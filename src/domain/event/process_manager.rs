use std::sync::Arc;
use anyhow::{Context, Result};

use crate::domain::card_system::{EventCardSystemsUpdated, UitpasEvent};
use crate::domain::commands::Command;
use crate::domain::label::{Label, LabelDelta, LabelVocabulary};
use crate::event_sourcing::{CommandBus, DocumentRepository, EventEnvelope};
use super::commands::EventCommand;
use super::errors::SyncError;
use super::projection::EventProjection;

// ============================================================================
// Event Process Manager - keeps UiTPAS labels in line with card systems
// ============================================================================
//
// Reacts to card system updates of an event:
//   no card systems left  → remove every UiTPAS label from the event
//   card systems present  → copy the organizer's UiTPAS labels to the event
//
// Each event is handled on its own, nothing is remembered between events.
// A missing document or organizer is logged and ends handling without
// commands. Handling is split in a plan phase that only reads and can be
// repeated, and an apply phase that dispatches and must run at most once.
//
// ============================================================================

/// Label commands planned for one event
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSync {
    event_id: String,
    card_systems: usize,
    delta: LabelDelta,
}

impl LabelSync {
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn delta(&self) -> &LabelDelta {
        &self.delta
    }
}

pub struct EventProcessManager {
    documents: Arc<dyn DocumentRepository>,
    command_bus: Arc<dyn CommandBus<Command>>,
    vocabulary: Arc<dyn LabelVocabulary>,
}

impl EventProcessManager {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        command_bus: Arc<dyn CommandBus<Command>>,
        vocabulary: Arc<dyn LabelVocabulary>,
    ) -> Self {
        Self {
            documents,
            command_bus,
            vocabulary,
        }
    }

    pub async fn handle(&self, envelope: &EventEnvelope<UitpasEvent>) -> Result<()> {
        match self.plan(envelope).await? {
            Some(sync) => self.apply(sync).await,
            None => Ok(()),
        }
    }

    /// Decide which commands an event calls for, without dispatching any.
    /// `None` when the read model has nothing to work with, which is logged.
    pub async fn plan(&self, envelope: &EventEnvelope<UitpasEvent>) -> Result<Option<LabelSync>> {
        tracing::debug!(
            aggregate_id = %envelope.aggregate_id,
            sequence_number = envelope.sequence_number,
            event_type = %envelope.event_type,
            "Handling UiTPAS event"
        );

        match &envelope.event_data {
            UitpasEvent::EventCardSystemsUpdated(event) => self.plan_card_systems_updated(event).await,
        }
    }

    async fn plan_card_systems_updated(&self, event: &EventCardSystemsUpdated) -> Result<Option<LabelSync>> {
        let vocabulary = self
            .vocabulary
            .load_all()
            .await
            .context("failed to load UiTPAS labels")?;

        match self.label_delta(event, &vocabulary).await {
            Ok(delta) => Ok(Some(LabelSync {
                event_id: event.event_id.clone(),
                card_systems: event.card_systems.len(),
                delta,
            })),
            Err(err) => match err.downcast_ref::<SyncError>() {
                Some(reason) => {
                    tracing::error!(event_id = %event.event_id, "{}", reason);
                    Ok(None)
                }
                None => Err(err),
            },
        }
    }

    /// Dispatch the commands of a planned sync, removals first.
    /// Stops at the first failed dispatch.
    pub async fn apply(&self, sync: LabelSync) -> Result<()> {
        let LabelSync { event_id, card_systems, delta } = sync;
        let removed = delta.remove.len();
        let added = delta.add.len();

        for label in delta.remove {
            self.dispatch(EventCommand::remove_label(&event_id, label)).await?;
        }

        for label in delta.add {
            self.dispatch(EventCommand::add_label(&event_id, label)).await?;
        }

        tracing::info!(
            event_id = %event_id,
            card_systems,
            added,
            removed,
            "Synced UiTPAS labels for event {}",
            event_id
        );

        Ok(())
    }

    async fn label_delta(&self, event: &EventCardSystemsUpdated, vocabulary: &[Label]) -> Result<LabelDelta> {
        let projection = self.load_projection(&event.event_id).await?;

        if event.card_systems.is_empty() {
            return Ok(LabelDelta::strip(vocabulary, projection.labels()));
        }

        let organizer_labels = projection
            .organizer_labels()
            .ok_or_else(|| SyncError::NoOrganizerLabels(event.event_id.clone()))?;

        Ok(LabelDelta::copy_from_organizer(vocabulary, organizer_labels))
    }

    async fn load_projection(&self, event_id: &str) -> Result<EventProjection> {
        let document = self
            .documents
            .get(event_id)
            .await
            .with_context(|| format!("failed to load document of event {}", event_id))?
            .ok_or_else(|| SyncError::EventNotFound(event_id.to_string()))?;

        EventProjection::from_document(&document)
    }

    async fn dispatch(&self, command: EventCommand) -> Result<()> {
        tracing::info!(
            event_id = %command.event_id(),
            command = command.name(),
            "Dispatching {} for event {}",
            command.name(),
            command.event_id()
        );

        self.command_bus
            .dispatch(command.into())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card_system::{CardSystem, CardSystems};
    use crate::domain::label::StaticLabelVocabulary;
    use crate::event_sourcing::{InMemoryDocumentRepository, JsonDocument};
    use crate::test_support::CapturedLogs;
    use anyhow::bail;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    const EVENT_ID: &str = "cbee7413-ac1e-4dfb-8004-34767eafb8b7";

    fn uitpas_labels() -> Vec<Label> {
        [
            "Paspartoe",
            "UiTPAS",
            "UiTPAS Gent",
            "UiTPAS Oostende",
            "UiTPAS regio Aalst",
            "UiTPAS Dender",
            "UiTPAS Zuidwest",
            "UiTPAS Mechelen",
            "UiTPAS Kempen",
            "UiTPAS Maasmechelen",
        ]
        .into_iter()
        .map(Label::from)
        .collect()
    }

    #[derive(Default)]
    struct TracingCommandBus {
        commands: Mutex<Vec<Command>>,
    }

    impl TracingCommandBus {
        fn traced(&self) -> Vec<Command> {
            self.commands.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandBus<Command> for TracingCommandBus {
        async fn dispatch(&self, command: Command) -> Result<()> {
            self.commands.lock().unwrap().push(command);
            Ok(())
        }
    }

    struct FailingBus;

    #[async_trait]
    impl CommandBus<Command> for FailingBus {
        async fn dispatch(&self, _command: Command) -> Result<()> {
            bail!("broker unavailable")
        }
    }

    struct UnreachableVocabulary;

    #[async_trait]
    impl LabelVocabulary for UnreachableVocabulary {
        async fn load_all(&self) -> Result<Vec<Label>> {
            bail!("labels endpoint unavailable")
        }
    }

    /// Fails the test when the read model is consulted
    struct UntouchedDocuments;

    #[async_trait]
    impl DocumentRepository for UntouchedDocuments {
        async fn get(&self, id: &str) -> Result<Option<JsonDocument>> {
            panic!("read model queried for {}", id);
        }
    }

    struct Fixture {
        documents: Arc<InMemoryDocumentRepository>,
        command_bus: Arc<TracingCommandBus>,
        process_manager: EventProcessManager,
    }

    fn fixture() -> Fixture {
        let documents = Arc::new(InMemoryDocumentRepository::new());
        let command_bus = Arc::new(TracingCommandBus::default());
        let process_manager = EventProcessManager::new(
            documents.clone(),
            command_bus.clone(),
            Arc::new(StaticLabelVocabulary::new(uitpas_labels())),
        );

        Fixture {
            documents,
            command_bus,
            process_manager,
        }
    }

    fn card_systems_updated(card_systems: CardSystems) -> EventEnvelope<UitpasEvent> {
        EventEnvelope::record_now(
            EVENT_ID,
            8,
            UitpasEvent::EventCardSystemsUpdated(EventCardSystemsUpdated::new(EVENT_ID, card_systems)),
        )
    }

    fn with_mock_card_system() -> CardSystems {
        CardSystems::new().with_key(7, CardSystem::new("7", "Mock CS"))
    }

    async fn save_event_ld(documents: &InMemoryDocumentRepository, body: serde_json::Value) {
        documents.save(JsonDocument::new(EVENT_ID, body.to_string())).await;
    }

    fn add_label(name: &str) -> Command {
        EventCommand::add_label(EVENT_ID, Label::new(name)).into()
    }

    fn remove_label(name: &str) -> Command {
        EventCommand::remove_label(EVENT_ID, Label::new(name)).into()
    }

    #[tokio::test]
    async fn test_removes_every_uitpas_label_when_event_has_no_card_systems() {
        let f = fixture();
        let mut event_labels: Vec<String> = uitpas_labels().iter().rev().map(|l| l.to_string()).collect();
        event_labels.push("Foo".to_string());
        save_event_ld(&f.documents, json!({
            "@id": "http://udb3.dev/event/cbee7413-ac1e-4dfb-8004-34767eafb8b7",
            "@type": "Event",
            "labels": event_labels,
        }))
        .await;

        f.process_manager.handle(&card_systems_updated(CardSystems::new())).await.unwrap();

        let expected: Vec<Command> = uitpas_labels()
            .into_iter()
            .map(|label| EventCommand::remove_label(EVENT_ID, label).into())
            .collect();
        let actual = f.command_bus.traced();

        assert_eq!(actual.len(), 10);
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_removes_only_uitpas_labels_present_on_the_event() {
        let f = fixture();
        save_event_ld(&f.documents, json!({
            "@type": "Event",
            "labels": ["UiTPAS Kempen", "Foo", "Paspartoe"],
            "organizer": {"labels": ["UiTPAS Gent"]},
        }))
        .await;

        f.process_manager.handle(&card_systems_updated(CardSystems::new())).await.unwrap();

        assert_eq!(
            f.command_bus.traced(),
            vec![remove_label("Paspartoe"), remove_label("UiTPAS Kempen")]
        );
    }

    #[tokio::test]
    async fn test_removes_nothing_when_event_has_no_uitpas_labels() {
        let f = fixture();
        save_event_ld(&f.documents, json!({"@type": "Event", "labels": ["Foo"]})).await;

        f.process_manager.handle(&card_systems_updated(CardSystems::new())).await.unwrap();

        assert!(f.command_bus.traced().is_empty());
    }

    #[tokio::test]
    async fn test_copies_organizer_uitpas_labels_to_event_with_card_systems() {
        let f = fixture();
        save_event_ld(&f.documents, json!({
            "@id": "http://udb3.dev/event/cbee7413-ac1e-4dfb-8004-34767eafb8b7",
            "@type": "Event",
            "organizer": {
                "labels": ["Foo", "UiTPAS Oostende", "Bar", "Paspartoe"],
            },
        }))
        .await;

        f.process_manager.handle(&card_systems_updated(with_mock_card_system())).await.unwrap();

        assert_eq!(
            f.command_bus.traced(),
            vec![add_label("Paspartoe"), add_label("UiTPAS Oostende")]
        );
    }

    #[tokio::test]
    async fn test_copy_never_removes_event_labels() {
        let f = fixture();
        save_event_ld(&f.documents, json!({
            "@type": "Event",
            "labels": ["UiTPAS Mechelen"],
            "organizer": {"labels": ["UiTPAS Gent"]},
        }))
        .await;

        f.process_manager.handle(&card_systems_updated(with_mock_card_system())).await.unwrap();

        assert_eq!(f.command_bus.traced(), vec![add_label("UiTPAS Gent")]);
    }

    #[tokio::test]
    async fn test_copies_no_labels_if_organizer_has_no_uitpas_labels() {
        let f = fixture();
        save_event_ld(&f.documents, json!({
            "@type": "Event",
            "organizer": {"labels": ["Foo", "Bar"]},
        }))
        .await;

        f.process_manager.handle(&card_systems_updated(with_mock_card_system())).await.unwrap();

        assert!(f.command_bus.traced().is_empty());
    }

    #[tokio::test]
    async fn test_logs_error_if_no_organizer_labels_can_be_found() {
        let (logs, _guard) = CapturedLogs::install();
        let f = fixture();
        save_event_ld(&f.documents, json!({"@type": "Event", "organizer": []})).await;

        f.process_manager.handle(&card_systems_updated(with_mock_card_system())).await.unwrap();

        assert_eq!(
            logs.errors(),
            vec![format!("Found no organizer, or no organizer labels, on event {}", EVENT_ID)]
        );
        assert!(f.command_bus.traced().is_empty());
    }

    #[tokio::test]
    async fn test_logs_error_if_event_json_ld_cannot_be_found() {
        let (logs, _guard) = CapturedLogs::install();
        let f = fixture();

        f.process_manager.handle(&card_systems_updated(with_mock_card_system())).await.unwrap();

        assert_eq!(
            logs.errors(),
            vec![format!("Event with id {} not found in injected DocumentRepository!", EVENT_ID)]
        );
        assert!(f.command_bus.traced().is_empty());
    }

    #[tokio::test]
    async fn test_logs_error_if_event_json_ld_missing_without_card_systems() {
        let (logs, _guard) = CapturedLogs::install();
        let f = fixture();

        f.process_manager.handle(&card_systems_updated(CardSystems::new())).await.unwrap();

        assert_eq!(
            logs.errors(),
            vec![format!("Event with id {} not found in injected DocumentRepository!", EVENT_ID)]
        );
        assert!(f.command_bus.traced().is_empty());
    }

    #[tokio::test]
    async fn test_logs_each_dispatched_command() {
        let (logs, _guard) = CapturedLogs::install();
        let f = fixture();
        save_event_ld(&f.documents, json!({"organizer": {"labels": ["UiTPAS"]}})).await;

        f.process_manager.handle(&card_systems_updated(with_mock_card_system())).await.unwrap();

        assert!(logs.errors().is_empty());
        assert!(logs
            .infos()
            .contains(&format!("Dispatching AddLabel for event {}", EVENT_ID)));
    }

    #[tokio::test]
    async fn test_vocabulary_failure_propagates_before_reading_documents() {
        let command_bus = Arc::new(TracingCommandBus::default());
        let process_manager = EventProcessManager::new(
            Arc::new(UntouchedDocuments),
            command_bus.clone(),
            Arc::new(UnreachableVocabulary),
        );

        let result = process_manager.handle(&card_systems_updated(with_mock_card_system())).await;

        assert!(result.is_err());
        assert!(command_bus.traced().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_document_is_an_error() {
        let f = fixture();
        f.documents.save(JsonDocument::new(EVENT_ID, "{not json")).await;

        let result = f.process_manager.handle(&card_systems_updated(with_mock_card_system())).await;

        assert!(result.is_err());
        assert!(f.command_bus.traced().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_failure_propagates() {
        let documents = Arc::new(InMemoryDocumentRepository::new());
        save_event_ld(&documents, json!({"organizer": {"labels": ["UiTPAS"]}})).await;
        let process_manager = EventProcessManager::new(
            documents,
            Arc::new(FailingBus),
            Arc::new(StaticLabelVocabulary::new(uitpas_labels())),
        );

        let result = process_manager.handle(&card_systems_updated(with_mock_card_system())).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_plan_dispatches_nothing_until_applied() {
        let f = fixture();
        save_event_ld(&f.documents, json!({"organizer": {"labels": ["UiTPAS", "Paspartoe"]}})).await;

        let sync = f
            .process_manager
            .plan(&card_systems_updated(with_mock_card_system()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(sync.event_id(), EVENT_ID);
        assert_eq!(sync.delta().add, vec![Label::new("Paspartoe"), Label::new("UiTPAS")]);
        assert!(f.command_bus.traced().is_empty());

        f.process_manager.apply(sync).await.unwrap();

        assert_eq!(f.command_bus.traced(), vec![add_label("Paspartoe"), add_label("UiTPAS")]);
    }

    #[tokio::test]
    async fn test_plan_is_none_when_event_is_missing() {
        let f = fixture();

        let sync = f.process_manager.plan(&card_systems_updated(CardSystems::new())).await.unwrap();

        assert!(sync.is_none());
    }

    #[tokio::test]
    async fn test_each_event_is_handled_independently() {
        let f = fixture();
        save_event_ld(&f.documents, json!({
            "labels": ["UiTPAS"],
            "organizer": {"labels": ["UiTPAS"]},
        }))
        .await;

        f.process_manager.handle(&card_systems_updated(with_mock_card_system())).await.unwrap();
        f.process_manager.handle(&card_systems_updated(with_mock_card_system())).await.unwrap();
        f.process_manager.handle(&card_systems_updated(CardSystems::new())).await.unwrap();

        assert_eq!(
            f.command_bus.traced(),
            vec![add_label("UiTPAS"), add_label("UiTPAS"), remove_label("UiTPAS")]
        );
    }
}
