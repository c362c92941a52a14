/// Entity construction helpers
///
/// Provides functions to create ships and enemies, and the orders of the
/// enemy's default patrol.

use glam::{DQuat, DVec3};
use hecs::{Entity, World};
use rand::Rng;

use crate::ecs::components::*;
use crate::movement::{Agent, Kinematics, Order};

/// Create a player-controllable ship
pub fn create_ship_entity(
    world: &mut World,
    name: String,
    position: DVec3,
    rotation: DQuat,
    kinematics: Kinematics,
) -> Entity {
    world.spawn((
        Agent::new(position, rotation, kinematics),
        Ship { name },
        EntityType::Ship,
    ))
}

/// Create an enemy ship
pub fn create_enemy_entity(
    world: &mut World,
    name: String,
    position: DVec3,
    rotation: DQuat,
    kinematics: Kinematics,
) -> Entity {
    world.spawn((
        Agent::new(position, rotation, kinematics),
        Ship { name },
        EntityType::Enemy,
        Hostile::default(),
    ))
}

/// Build `count` directional orders to random points of the XZ rectangle
/// `[-half_x, half_x] x [-half_z, half_z]`, each ending on a random heading.
///
/// Patrol orders carry no feedback handle; the caller appends them in order.
pub fn patrol_orders<R: Rng>(count: u32, half_x: f64, half_z: f64, rng: &mut R) -> Vec<Order> {
    (0..count)
        .map(|_| {
            let target = DVec3::new(
                rng.gen_range(-half_x..=half_x),
                0.0,
                rng.gen_range(-half_z..=half_z),
            );
            let heading = rng.gen_range(0.0..std::f64::consts::TAU);
            let facing = DVec3::new(heading.sin(), 0.0, heading.cos());

            Order::directional(target, facing, None)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::OrderKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_patrol_stays_inside_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let orders = patrol_orders(25, 10.0, 8.0, &mut rng);
        assert_eq!(orders.len(), 25);

        for order in &orders {
            assert_eq!(order.kind(), OrderKind::Directional);
            let Order::Directional(directional) = order else {
                unreachable!();
            };
            assert!(directional.target.x.abs() <= 10.0);
            assert!(directional.target.z.abs() <= 8.0);
            assert_eq!(directional.target.y, 0.0);
            assert!((directional.facing.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_patrol_is_reproducible() {
        let targets = |seed: u64| -> Vec<DVec3> {
            patrol_orders(5, 10.0, 8.0, &mut ChaCha8Rng::seed_from_u64(seed))
                .iter()
                .filter_map(|order| match order {
                    Order::Directional(directional) => Some(directional.target),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(targets(11), targets(11));
        assert_ne!(targets(11), targets(12));
    }

    #[test]
    fn test_enemy_has_hostile_marker() {
        let mut world = World::new();
        let kinematics = Kinematics::new(4.0, 4.0).unwrap();
        let ship = create_ship_entity(&mut world, "Wasp".into(), DVec3::ZERO, DQuat::IDENTITY, kinematics);
        let enemy = create_enemy_entity(&mut world, "Raider".into(), DVec3::X, DQuat::IDENTITY, kinematics);

        assert!(world.get::<&Hostile>(ship).is_err());
        assert!(world.get::<&Hostile>(enemy).is_ok());
        assert_eq!(*world.get::<&EntityType>(enemy).unwrap(), EntityType::Enemy);
        assert_eq!(world.get::<&Ship>(ship).unwrap().name, "Wasp");
    }
}
