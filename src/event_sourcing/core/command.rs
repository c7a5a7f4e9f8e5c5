use std::sync::Arc;
use anyhow::Result;
use async_trait::async_trait;

// ============================================================================
// Command Bus - Write side entry point
// ============================================================================
//
// Commands are handed to the bus and handled elsewhere. From the point of
// view of a process manager dispatch is fire-and-forget: an `Ok` only means
// the bus accepted the command.
//
// ============================================================================

/// Accepts commands of type `C` for asynchronous handling
#[async_trait]
pub trait CommandBus<C: Send + 'static>: Send + Sync {
    async fn dispatch(&self, command: C) -> Result<()>;
}

/// Inspects a command before it reaches the bus and vetoes it by returning an error
#[async_trait]
pub trait CommandValidator<C: Sync>: Send + Sync {
    async fn validate(&self, command: &C) -> Result<()>;
}

// ============================================================================
// Validating Command Bus - runs every validator before dispatching
// ============================================================================

pub struct ValidatingCommandBus<C> {
    inner: Arc<dyn CommandBus<C>>,
    validators: Vec<Arc<dyn CommandValidator<C>>>,
}

impl<C: Send + Sync + 'static> ValidatingCommandBus<C> {
    pub fn new(inner: Arc<dyn CommandBus<C>>) -> Self {
        Self {
            inner,
            validators: Vec::new(),
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn CommandValidator<C>>) -> Self {
        self.validators.push(validator);
        self
    }
}

#[async_trait]
impl<C: Send + Sync + 'static> CommandBus<C> for ValidatingCommandBus<C> {
    async fn dispatch(&self, command: C) -> Result<()> {
        for validator in &self.validators {
            validator.validate(&command).await?;
        }

        self.inner.dispatch(command).await
    }
}
