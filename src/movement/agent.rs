/// Agents and their order queues
///
/// An agent owns its transform and a FIFO of orders. Only the head order is
/// ever advanced, and only orders move the agent.

use glam::{DQuat, DVec3};
use hecs::Entity;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::order::{Order, OrderKind, OrderState, Step};
use super::steering;
use super::target::TargetLookup;
use crate::error::{FleetError, FleetResult};

/// Speed limits, constant for the life of an agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    /// Units per second
    pub linear_speed: f64,
    /// Degrees per second
    pub angular_speed: f64,
}

impl Kinematics {
    pub fn new(linear_speed: f64, angular_speed: f64) -> FleetResult<Self> {
        let valid = |speed: f64| speed.is_finite() && speed > 0.0;
        if !valid(linear_speed) || !valid(angular_speed) {
            return Err(FleetError::InvalidKinematics {
                linear: linear_speed,
                angular: angular_speed,
            });
        }

        Ok(Self {
            linear_speed,
            angular_speed,
        })
    }
}

/// Transform plus speed limits, lent to the head order each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub position: DVec3,
    pub rotation: DQuat,
    pub linear_speed: f64,
    pub angular_speed: f64,
}

impl Motion {
    pub fn forward(&self) -> DVec3 {
        self.rotation * DVec3::Z
    }

    pub fn up(&self) -> DVec3 {
        self.rotation * DVec3::Y
    }
}

/// What happened to an agent's queue during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReport {
    /// Nothing queued
    Idle,
    /// The head order ran; `started` on its first tick, `completed` on its last
    Advanced {
        kind: OrderKind,
        started: bool,
        completed: bool,
    },
    /// A completed head was removed; nothing else ran
    Retired { kind: OrderKind },
    /// The head lost its target and was canceled and removed
    TargetLost { kind: OrderKind },
}

#[derive(Debug)]
pub struct Agent {
    motion: Motion,
    orders: VecDeque<Order>,
    highlighted: bool,
}

impl Agent {
    pub fn new(position: DVec3, rotation: DQuat, kinematics: Kinematics) -> Self {
        Self {
            motion: Motion {
                position,
                rotation: rotation.normalize(),
                linear_speed: kinematics.linear_speed,
                angular_speed: kinematics.angular_speed,
            },
            orders: VecDeque::new(),
            highlighted: false,
        }
    }

    pub fn position(&self) -> DVec3 {
        self.motion.position
    }

    pub fn rotation(&self) -> DQuat {
        self.motion.rotation
    }

    pub fn linear_speed(&self) -> f64 {
        self.motion.linear_speed
    }

    pub fn angular_speed(&self) -> f64 {
        self.motion.angular_speed
    }

    pub fn forward(&self) -> DVec3 {
        self.motion.forward()
    }

    /// Heading for sprite lookup: degrees clockwise from +Z, `[0, 360)`
    pub fn yaw_degrees(&self) -> Option<f64> {
        steering::yaw_degrees(self.motion.rotation)
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn queue_len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_idle(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn head(&self) -> Option<&Order> {
        self.orders.front()
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Entity the head order is following, if any
    pub fn tracked_entity(&self) -> Option<Entity> {
        self.orders.front().and_then(Order::tracked_entity)
    }

    /// Queue an order
    ///
    /// Without `append` every queued order is canceled first, in queue order,
    /// and the new order becomes the only one. Returns how many were canceled.
    pub fn enqueue(&mut self, order: Order, append: bool) -> usize {
        let canceled = if append { 0 } else { self.clear() };
        self.orders.push_back(order);
        canceled
    }

    /// Cancel and drop every queued order
    ///
    /// A completed head waiting to be retired is dropped without counting as
    /// canceled.
    pub fn clear(&mut self) -> usize {
        let canceled = self.orders.iter().filter(|order| !order.is_completed()).count();
        for order in self.orders.iter_mut() {
            order.cancel();
        }
        self.orders.clear();
        canceled
    }

    /// Run one simulation step of the head order
    pub fn tick(&mut self, dt: f64, targets: &dyn TargetLookup) -> TickReport {
        let Some(head) = self.orders.front_mut() else {
            return TickReport::Idle;
        };

        let kind = head.kind();
        if head.is_completed() {
            self.orders.pop_front();
            return TickReport::Retired { kind };
        }

        let started = head.state() == OrderState::Pending;
        match head.advance(dt, &mut self.motion, targets) {
            Step::Progressed => TickReport::Advanced {
                kind,
                started,
                completed: head.is_completed(),
            },
            Step::TargetLost => {
                head.cancel();
                self.orders.pop_front();
                TickReport::TargetLost { kind }
            }
        }
    }

    pub fn toggle_selection_highlight(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }
}
