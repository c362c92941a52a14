/// ECS world for ships and their orders
///
/// This module provides:
/// - The `Fleet` wrapper around the hecs world, driven by an explicit `tick`
/// - Component definitions for ships and enemies
/// - Spawn helpers and the enemy patrol

pub mod components;
pub mod init;

use glam::{DQuat, DVec3};
use hecs::{Entity, World};
use std::collections::HashSet;

use crate::error::{FleetError, FleetResult};
use crate::movement::order::entity_id;
use crate::movement::{
    Agent, Feedback, FeedbackSlot, Kinematics, Order, OrderEvent, OrderEventLog, OrderKind,
    OrderRequest, PositionSnapshot, TickReport,
};
use components::{EntityType, Hostile};

/// The simulation world containing all ships
pub struct Fleet {
    /// hecs World - stores all entities and components
    pub world: World,

    /// Simulated seconds since creation
    elapsed: f64,

    events: OrderEventLog,
}

impl Fleet {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            elapsed: 0.0,
            events: OrderEventLog::new(),
        }
    }

    pub fn spawn_ship(&mut self, name: &str, position: DVec3, kinematics: Kinematics) -> Entity {
        let entity = init::create_ship_entity(
            &mut self.world,
            name.to_string(),
            position,
            DQuat::IDENTITY,
            kinematics,
        );
        log::debug!("Spawned ship '{name}' ({}) at {position:?}", entity_id(entity));
        entity
    }

    pub fn spawn_enemy(&mut self, name: &str, position: DVec3, kinematics: Kinematics) -> Entity {
        let entity = init::create_enemy_entity(
            &mut self.world,
            name.to_string(),
            position,
            DQuat::IDENTITY,
            kinematics,
        );
        log::debug!("Spawned enemy '{name}' ({}) at {position:?}", entity_id(entity));
        entity
    }

    /// Remove an agent, canceling its queued orders first
    ///
    /// Ships following it lose their target on the next tick.
    pub fn despawn(&mut self, entity: Entity) -> FleetResult<()> {
        let kinds: Vec<OrderKind> = {
            let mut agent = self.agent_mut(entity)?;
            let kinds = pending_kinds(&agent);
            agent.clear();
            kinds
        };
        self.record_canceled(entity, &kinds);

        self.world
            .despawn(entity)
            .map_err(|_| FleetError::UnknownAgent { id: entity_id(entity) })?;
        log::debug!("Despawned agent {}", entity_id(entity));

        self.refresh_tracking();
        Ok(())
    }

    /// Build an order from a selection-layer request and queue it
    ///
    /// On rejection the feedback handle is released before the error returns.
    pub fn issue(
        &mut self,
        entity: Entity,
        request: OrderRequest,
        feedback: Option<Box<dyn Feedback>>,
        append: bool,
    ) -> FleetResult<()> {
        let kind = request.kind();
        let snapshot = self.snapshot();
        let order = match self.agent(entity) {
            Ok(agent) => Order::from_request(request, agent.motion(), feedback, &snapshot),
            Err(err) => {
                FeedbackSlot::new(feedback).release();
                Err(err)
            }
        };

        match order {
            Ok(order) => self.enqueue(entity, order, append),
            Err(err) => {
                log::warn!("Rejected {kind:?} order for agent {}: {err}", entity_id(entity));
                Err(err)
            }
        }
    }

    /// Queue an already built order
    pub fn enqueue(&mut self, entity: Entity, order: Order, append: bool) -> FleetResult<()> {
        let kind = order.kind();
        let replaced: Vec<OrderKind> = {
            let mut agent = self.agent_mut(entity)?;
            let replaced = if append {
                Vec::new()
            } else {
                pending_kinds(&agent)
            };
            agent.enqueue(order, append);
            replaced
        };

        self.record_canceled(entity, &replaced);
        self.events.record(OrderEvent::Issued {
            agent: entity_id(entity),
            kind,
            append,
            time: self.elapsed,
        });
        log::debug!(
            "Agent {} queued {kind:?} order (append: {append}, replaced: {})",
            entity_id(entity),
            replaced.len()
        );

        self.refresh_tracking();
        Ok(())
    }

    pub fn toggle_selection_highlight(&mut self, entity: Entity, highlighted: bool) -> FleetResult<()> {
        self.agent_mut(entity)?.toggle_selection_highlight(highlighted);
        Ok(())
    }

    /// Positions of every agent as they stand right now
    pub fn snapshot(&self) -> PositionSnapshot {
        self.world
            .query::<&Agent>()
            .iter()
            .map(|(entity, agent)| (entity, agent.position()))
            .collect()
    }

    /// Advance every agent by one simulation step
    ///
    /// Followers see the positions committed before this step, whatever order
    /// agents are visited in.
    pub fn tick(&mut self, dt: f64) {
        let snapshot = self.snapshot();

        let mut reports = Vec::new();
        for (entity, agent) in self.world.query_mut::<&mut Agent>() {
            let tracked = agent.tracked_entity();
            let report = agent.tick(dt, &snapshot);
            if report != TickReport::Idle {
                reports.push((entity, report, tracked));
            }
        }

        for (entity, report, tracked) in reports {
            self.record_report(entity, report, tracked);
        }

        self.refresh_tracking();
        self.elapsed += dt;
    }

    fn record_report(&mut self, entity: Entity, report: TickReport, tracked: Option<Entity>) {
        let agent = entity_id(entity);
        let time = self.elapsed;

        match report {
            TickReport::Idle => {}
            TickReport::Advanced {
                kind,
                started,
                completed,
            } => {
                if started {
                    log::debug!("Agent {agent} started {kind:?} order");
                    self.events.record(OrderEvent::Started { agent, kind, time });
                }
                if completed {
                    log::debug!("Agent {agent} completed {kind:?} order at t={time:.3}");
                    self.events.record(OrderEvent::Completed { agent, kind, time });
                }
            }
            TickReport::Retired { kind } => {
                self.events.record(OrderEvent::Retired { agent, kind, time });
            }
            TickReport::TargetLost { kind } => {
                let target = tracked.map(entity_id);
                log::warn!("Agent {agent} lost target {target:?}; {kind:?} order canceled");
                self.events.record(OrderEvent::TargetLost {
                    agent,
                    kind,
                    target,
                    time,
                });
            }
        }
    }

    fn record_canceled(&mut self, entity: Entity, kinds: &[OrderKind]) {
        for &kind in kinds {
            self.events.record(OrderEvent::Canceled {
                agent: entity_id(entity),
                kind,
                time: self.elapsed,
            });
        }
    }

    /// Mark enemies that are currently being followed
    fn refresh_tracking(&mut self) {
        let followed: HashSet<Entity> = self
            .world
            .query::<&Agent>()
            .iter()
            .filter_map(|(_, agent)| agent.tracked_entity())
            .collect();

        for (entity, hostile) in self.world.query_mut::<&mut Hostile>() {
            hostile.tracked = followed.contains(&entity);
        }
    }

    pub fn agent(&self, entity: Entity) -> FleetResult<hecs::Ref<'_, Agent>> {
        self.world
            .get::<&Agent>(entity)
            .map_err(|_| FleetError::UnknownAgent { id: entity_id(entity) })
    }

    fn agent_mut(&self, entity: Entity) -> FleetResult<hecs::RefMut<'_, Agent>> {
        self.world
            .get::<&mut Agent>(entity)
            .map_err(|_| FleetError::UnknownAgent { id: entity_id(entity) })
    }

    pub fn position(&self, entity: Entity) -> FleetResult<DVec3> {
        Ok(self.agent(entity)?.position())
    }

    pub fn rotation(&self, entity: Entity) -> FleetResult<DQuat> {
        Ok(self.agent(entity)?.rotation())
    }

    pub fn queue_len(&self, entity: Entity) -> FleetResult<usize> {
        Ok(self.agent(entity)?.queue_len())
    }

    /// Whether some ship is following this enemy; false for non-enemies
    pub fn is_tracked(&self, entity: Entity) -> bool {
        self.world
            .get::<&Hostile>(entity)
            .map(|hostile| hostile.tracked)
            .unwrap_or(false)
    }

    /// Entities of one type, in world iteration order
    pub fn entities_of_type(&self, entity_type: EntityType) -> Vec<Entity> {
        self.world
            .query::<&EntityType>()
            .iter()
            .filter(|(_, ty)| **ty == entity_type)
            .map(|(entity, _)| entity)
            .collect()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn events(&self) -> &OrderEventLog {
        &self.events
    }

    /// Get the number of entities
    pub fn entity_count(&self) -> u32 {
        self.world.len() as u32
    }
}

/// Kinds of the queued orders a clear would cancel; a finished head is skipped
fn pending_kinds(agent: &Agent) -> Vec<OrderKind> {
    agent
        .orders()
        .filter(|order| !order.is_completed())
        .map(Order::kind)
        .collect()
}

impl Default for Fleet {
    fn default() -> Self {
        Self::new()
    }
}
