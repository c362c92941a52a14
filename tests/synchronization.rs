/// Directional orders: translation and rotation paced to finish together

mod common;

use approx::assert_abs_diff_eq;
use common::{agent_at, kinematics};
use fleet_orders::movement::steering::vector_angle_degrees;
use fleet_orders::movement::target::NoTargets;
use fleet_orders::movement::{Agent, Motion, Order, OrderKind, SyncedSpeeds, TickReport};
use glam::{DQuat, DVec3};
use rstest::rstest;

fn synced_speeds(agent: &Agent) -> Option<SyncedSpeeds> {
    match agent.head() {
        Some(Order::Directional(order)) => order.synced_speeds(),
        _ => None,
    }
}

fn head_completed(agent: &Agent) -> bool {
    agent.head().map(Order::is_completed).unwrap_or(true)
}

#[test]
fn test_move_and_turn_finish_together() {
    let mut agent = agent_at(DVec3::ZERO);
    let target = DVec3::new(0.0, 0.0, 10.0);
    agent.enqueue(Order::directional(target, DVec3::X, None), false);

    // Setup tick: speeds only
    agent.tick(0.01, &NoTargets);
    let speeds = synced_speeds(&agent).unwrap();
    assert_abs_diff_eq!(speeds.linear, 10.0 / 22.5, epsilon = 1e-12);
    assert_abs_diff_eq!(speeds.angular, 4.0, epsilon = 1e-12);

    for _ in 0..1125 {
        agent.tick(0.01, &NoTargets);
    }
    assert_abs_diff_eq!(agent.position().z, 5.0, epsilon = 1e-6);
    assert_abs_diff_eq!(vector_angle_degrees(agent.forward(), DVec3::Z), 45.0, epsilon = 1e-3);

    let mut motion_ticks = 1125;
    while !head_completed(&agent) {
        agent.tick(0.01, &NoTargets);
        motion_ticks += 1;
        assert!(motion_ticks <= 2260, "directional order still running");
    }

    assert!((2249..=2251).contains(&motion_ticks), "took {motion_ticks} ticks");
    assert!(agent.position().distance_squared(target) < 1e-9);
    assert_abs_diff_eq!(vector_angle_degrees(agent.forward(), DVec3::X), 0.0, epsilon = 1e-4);
    assert_abs_diff_eq!(agent.yaw_degrees().unwrap(), 90.0, epsilon = 1e-4);
}

#[test]
fn test_first_tick_only_synchronizes() {
    let mut agent = agent_at(DVec3::new(1.0, 0.0, 1.0));
    agent.enqueue(Order::directional(DVec3::new(5.0, 0.0, 1.0), -DVec3::Z, None), true);
    assert!(synced_speeds(&agent).is_none());

    let report = agent.tick(0.5, &NoTargets);

    assert_eq!(
        report,
        TickReport::Advanced {
            kind: OrderKind::Directional,
            started: true,
            completed: false,
        }
    );
    assert_eq!(agent.position(), DVec3::new(1.0, 0.0, 1.0));
    assert_eq!(agent.rotation(), DQuat::IDENTITY);
    assert!(synced_speeds(&agent).is_some());

    agent.tick(0.5, &NoTargets);
    assert!(agent.position().x > 1.0);
}

#[test]
fn test_nothing_to_do_uses_nominal_speeds() {
    let mut agent = Agent::new(DVec3::X, DQuat::IDENTITY, kinematics(3.0, 7.0));
    agent.enqueue(Order::directional(DVec3::X, DVec3::Z, None), false);

    let setup = agent.tick(0.1, &NoTargets);
    assert_eq!(
        setup,
        TickReport::Advanced {
            kind: OrderKind::Directional,
            started: true,
            completed: false,
        }
    );
    let speeds = synced_speeds(&agent).unwrap();
    assert_eq!(speeds.linear, 3.0);
    assert_eq!(speeds.angular, 7.0);

    assert_eq!(
        agent.tick(0.1, &NoTargets),
        TickReport::Advanced {
            kind: OrderKind::Directional,
            started: false,
            completed: true,
        }
    );
    assert_eq!(
        agent.tick(0.1, &NoTargets),
        TickReport::Retired {
            kind: OrderKind::Directional
        }
    );
    assert_eq!(agent.tick(0.1, &NoTargets), TickReport::Idle);
}

#[test]
fn test_zero_facing_moves_without_turning() {
    let start = DQuat::from_rotation_y(30f64.to_radians());
    let mut agent = Agent::new(DVec3::ZERO, start, kinematics(4.0, 4.0));
    agent.enqueue(Order::directional(DVec3::new(2.0, 0.0, 0.0), DVec3::ZERO, None), false);

    while !head_completed(&agent) {
        agent.tick(0.1, &NoTargets);
    }

    assert!(agent.position().distance_squared(DVec3::new(2.0, 0.0, 0.0)) < 1e-9);
    assert_abs_diff_eq!(agent.rotation().dot(start).abs(), 1.0, epsilon = 1e-12);
}

fn motion_facing_z(linear_speed: f64, angular_speed: f64) -> Motion {
    Motion {
        position: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
        linear_speed,
        angular_speed,
    }
}

#[rstest]
// Turning dominates: the move is slowed down
#[case(10.0, 90.0, 4.0, 4.0, 10.0 / 22.5, 4.0)]
// Moving dominates: the turn is slowed down
#[case(10.0, 9.0, 4.0, 4.0, 4.0, 3.6)]
// Pure turn in place
#[case(0.0, 180.0, 4.0, 10.0, 0.0, 10.0)]
// Pure move, already facing the right way
#[case(8.0, 0.0, 2.0, 4.0, 2.0, 0.0)]
fn test_slower_leg_keeps_nominal_speed(
    #[case] distance: f64,
    #[case] angle: f64,
    #[case] linear_speed: f64,
    #[case] angular_speed: f64,
    #[case] expected_linear: f64,
    #[case] expected_angular: f64,
) {
    let motion = motion_facing_z(linear_speed, angular_speed);
    let heading = angle.to_radians();
    let facing = DVec3::new(heading.sin(), 0.0, heading.cos());

    let speeds = SyncedSpeeds::compute(&motion, DVec3::new(0.0, 0.0, distance), facing);

    assert_abs_diff_eq!(speeds.linear, expected_linear, epsilon = 1e-9);
    assert_abs_diff_eq!(speeds.angular, expected_angular, epsilon = 1e-6);

    // Whichever leg is paced, both take the same time
    if speeds.linear > 0.0 && speeds.angular > 0.0 {
        assert_abs_diff_eq!(distance / speeds.linear, angle / speeds.angular, epsilon = 1e-6);
    }
}

#[test]
fn test_on_target_completes_before_turn_finishes() {
    // Already on the target: completion is decided by position, so the order
    // finishes on its first motion tick even though the turn is not done
    let mut agent = agent_at(DVec3::ZERO);
    agent.enqueue(Order::directional(DVec3::ZERO, DVec3::X, None), false);

    agent.tick(0.1, &NoTargets);
    agent.tick(0.1, &NoTargets);

    assert!(head_completed(&agent));
    assert!(vector_angle_degrees(agent.forward(), DVec3::Z) > 0.0);
    assert!(vector_angle_degrees(agent.forward(), DVec3::X) > 80.0);
}
