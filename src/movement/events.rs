/// Order event log
///
/// Records the lifecycle of every order in simulation time, for replay and
/// debugging. Agents are identified by their entity bits.

use anyhow::Result;
use hecs::Entity;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::order::{entity_id, OrderKind};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum OrderEvent {
    /// An order was handed to an agent
    Issued {
        agent: u64,
        kind: OrderKind,
        append: bool,
        time: f64,
    },

    /// The order received its first tick
    Started { agent: u64, kind: OrderKind, time: f64 },

    /// The order reached its goal
    Completed { agent: u64, kind: OrderKind, time: f64 },

    /// A completed order left the queue
    Retired { agent: u64, kind: OrderKind, time: f64 },

    /// The order was discarded by a replacing order or a despawn
    Canceled { agent: u64, kind: OrderKind, time: f64 },

    /// The order's target disappeared and the order was force-canceled
    TargetLost {
        agent: u64,
        kind: OrderKind,
        target: Option<u64>,
        time: f64,
    },
}

impl OrderEvent {
    pub fn agent(&self) -> u64 {
        match self {
            OrderEvent::Issued { agent, .. } => *agent,
            OrderEvent::Started { agent, .. } => *agent,
            OrderEvent::Completed { agent, .. } => *agent,
            OrderEvent::Retired { agent, .. } => *agent,
            OrderEvent::Canceled { agent, .. } => *agent,
            OrderEvent::TargetLost { agent, .. } => *agent,
        }
    }

    pub fn kind(&self) -> OrderKind {
        match self {
            OrderEvent::Issued { kind, .. } => *kind,
            OrderEvent::Started { kind, .. } => *kind,
            OrderEvent::Completed { kind, .. } => *kind,
            OrderEvent::Retired { kind, .. } => *kind,
            OrderEvent::Canceled { kind, .. } => *kind,
            OrderEvent::TargetLost { kind, .. } => *kind,
        }
    }

    pub fn time(&self) -> f64 {
        match self {
            OrderEvent::Issued { time, .. } => *time,
            OrderEvent::Started { time, .. } => *time,
            OrderEvent::Completed { time, .. } => *time,
            OrderEvent::Retired { time, .. } => *time,
            OrderEvent::Canceled { time, .. } => *time,
            OrderEvent::TargetLost { time, .. } => *time,
        }
    }
}

/// Append-only list of order events
#[derive(Debug, Clone, Default)]
pub struct OrderEventLog {
    events: Vec<OrderEvent>,
}

impl OrderEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: OrderEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[OrderEvent] {
        &self.events
    }

    /// All events for one agent, oldest first
    pub fn events_for(&self, agent: Entity) -> Vec<&OrderEvent> {
        let id = entity_id(agent);
        self.events.iter().filter(|e| e.agent() == id).collect()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Save events to a JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.events)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load events from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let events: Vec<OrderEvent> = serde_json::from_str(&json)?;
        Ok(Self { events })
    }
}
