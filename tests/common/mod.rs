#![allow(dead_code)]

use fleet_orders::movement::{Agent, Feedback, Kinematics};
use glam::{DQuat, DVec3};
use std::sync::{Arc, Mutex};

/// Feedback handle that remembers every call made to it
#[derive(Debug, Default)]
pub struct Tally {
    pub starts: Vec<DVec3>,
    pub ends: Vec<(DVec3, bool)>,
    pub releases: u32,
}

impl Feedback for Tally {
    fn set_start(&mut self, point: DVec3) {
        self.starts.push(point);
    }

    fn set_end(&mut self, point: DVec3, finalize: bool) {
        self.ends.push((point, finalize));
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}

pub type SharedTally = Arc<Mutex<Tally>>;

/// A shared tally plus the boxed handle to give to an order
pub fn tally() -> (SharedTally, Option<Box<dyn Feedback>>) {
    let shared = Arc::new(Mutex::new(Tally::default()));
    let handle: Box<dyn Feedback> = Box::new(shared.clone());
    (shared, Some(handle))
}

pub fn releases(tally: &SharedTally) -> u32 {
    tally.lock().unwrap().releases
}

pub fn kinematics(linear: f64, angular: f64) -> Kinematics {
    Kinematics::new(linear, angular).unwrap()
}

pub fn agent_at(position: DVec3) -> Agent {
    Agent::new(position, DQuat::IDENTITY, kinematics(4.0, 4.0))
}
