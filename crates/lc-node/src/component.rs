//! # Component Lifecycle
//!
//! The start/stop contract every long-lived part of the node implements,
//! and the manager that drives them: start in registration order, each
//! under a deadline; on any failure stop what already started, in
//! reverse.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

/// Errors raised while starting components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
    /// The component reported a startup failure.
    #[error("component {name} failed to start: {message}")]
    StartFailed { name: String, message: String },

    /// The component did not become ready before the deadline.
    #[error("component {name} missed its start deadline of {deadline:?}")]
    DeadlineExceeded { name: String, deadline: Duration },
}

/// A long-lived part of the node with a managed lifecycle.
#[async_trait]
pub trait Component: Send + Sync {
    /// Human-readable component name for logs and errors.
    fn name(&self) -> &'static str;

    /// Bring the component to ready. Called once by the manager; must
    /// return promptly once ready (the manager enforces the deadline).
    async fn start(&self) -> Result<(), ComponentError>;

    /// Release the component's resources. Must tolerate being called
    /// without a prior successful `start`.
    async fn stop(&self);
}

/// Drives a fixed list of components through start and stop.
#[derive(Default)]
pub struct ComponentManager {
    components: Vec<Arc<dyn Component>>,
    /// How many components have started; stop walks these in reverse.
    started: Mutex<usize>,
}

impl ComponentManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component. Start order is registration order.
    pub fn add(&mut self, component: Arc<dyn Component>) {
        self.components.push(component);
    }

    /// Start every component in order, allowing each `deadline` to become
    /// ready. On the first failure or missed deadline, already-started
    /// components are stopped in reverse and the error is returned.
    pub async fn start_all(&self, deadline: Duration) -> Result<(), ComponentError> {
        for component in &self.components {
            let name = component.name();
            match tokio::time::timeout(deadline, component.start()).await {
                Ok(Ok(())) => {
                    info!(component = name, "component started");
                    *self.started.lock() += 1;
                }
                Ok(Err(err)) => {
                    error!(component = name, error = %err, "component failed to start");
                    self.stop_all().await;
                    return Err(err);
                }
                Err(_elapsed) => {
                    error!(component = name, ?deadline, "component missed start deadline");
                    self.stop_all().await;
                    return Err(ComponentError::DeadlineExceeded {
                        name: name.to_string(),
                        deadline,
                    });
                }
            }
        }
        Ok(())
    }

    /// Stop every started component in reverse start order. Idempotent: a
    /// second call finds nothing left to stop.
    pub async fn stop_all(&self) {
        let started = {
            let mut started = self.started.lock();
            std::mem::take(&mut *started)
        };
        for component in self.components[..started].iter().rev() {
            info!(component = component.name(), "stopping component");
            component.stop().await;
        }
    }
}
