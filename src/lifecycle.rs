//! Collaborator interface to the downstream component-graph engine
//!
//! The engine that actually starts and stops components lives outside this
//! crate. What is defined here is the seam: the registration payload (the
//! resolved config graph plus the original [`Setup`] for later
//! re-registration), the lifecycle events it can be signalled with, and a
//! [`boot`] helper that runs resolution and hands the result over. An engine
//! handle is passed explicitly; there is no process-wide registry here.

use crate::error::Result;
use crate::resolver::{resolve, Setup};
use log::info;
use serde_json::Value;

/// Lifecycle events the engine can be signalled with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Start,
    Stop,
    Suspend,
    Resume,
}

/// Payload registered with the engine under an agreed id
#[derive(Debug)]
pub struct Registration {
    /// Fully resolved config graph
    pub graph: Value,
    /// The setup it was resolved from, kept for re-registration
    pub setup: Setup,
}

/// External component-graph/lifecycle engine.
///
/// Implementations own start/stop ordering and any concurrency; this crate
/// only produces the `graph` they consume.
pub trait LifecycleEngine {
    /// Register a resolved system under an id
    fn register(&mut self, id: &str, registration: Registration) -> Result<()>;

    /// Signal a lifecycle event, optionally scoped to a subset of top-level
    /// config keys. Returns the engine's result value.
    fn signal(&mut self, id: &str, event: LifecycleEvent, keys: Option<&[String]>)
        -> Result<Value>;
}

/// Resolve a setup, register it with the engine, and signal `Start`.
///
/// This is the embedding application's entry point; wiring a shutdown hook
/// that signals [`LifecycleEvent::Stop`] is its responsibility.
pub fn boot<E: LifecycleEngine>(engine: &mut E, id: &str, setup: Setup) -> Result<Value> {
    let graph = resolve(setup.clone())?;
    info!("registering resolved system '{id}'");
    engine.register(id, Registration { graph, setup })?;
    engine.signal(id, LifecycleEvent::Start, None)
}

// =============================================================================
// Tests
// =============================================================================
