/// Steering math for order execution
///
/// Straight-line stepping and shortest-arc turning used by the orders.
/// Angles crossing this module's public surface are in degrees.
///
/// Axes: +Y is up, an unrotated agent faces +Z.

use glam::{DMat3, DQuat, DVec3};

/// Below this squared length a direction is treated as zero
const DEGENERATE_LENGTH_SQ: f64 = 1e-12;

/// Step `current` toward `target` by at most `max_delta`.
///
/// Snaps exactly onto `target` when the remaining distance fits in the step,
/// so repeated calls converge in a bounded number of steps.
pub fn move_towards(current: DVec3, target: DVec3, max_delta: f64) -> DVec3 {
    let offset = target - current;
    let distance = offset.length();

    if distance <= max_delta || distance == 0.0 {
        return target;
    }
    if max_delta <= 0.0 {
        return current;
    }

    current + offset / distance * max_delta
}

/// Turn `current` toward `target` by at most `max_degrees` along the shortest arc
pub fn rotate_towards(current: DQuat, target: DQuat, max_degrees: f64) -> DQuat {
    let remaining = quat_angle_degrees(current, target);

    if remaining <= max_degrees || remaining == 0.0 {
        return target;
    }
    if max_degrees <= 0.0 {
        return current;
    }

    // q and -q are the same orientation; stay on the near hemisphere
    let mut delta = target * current.conjugate();
    if delta.w < 0.0 {
        delta = -delta;
    }
    let Some(axis) = delta.xyz().try_normalize() else {
        return target;
    };

    // Exact axis-angle step; slerp degrades to nlerp for close orientations
    (DQuat::from_axis_angle(axis, max_degrees.to_radians()) * current).normalize()
}

/// Angle between two orientations in degrees (0-180)
pub fn quat_angle_degrees(a: DQuat, b: DQuat) -> f64 {
    let delta = b * a.conjugate();
    (2.0 * delta.xyz().length().atan2(delta.w.abs())).to_degrees()
}

/// Unsigned angle between two vectors in degrees (0-180)
///
/// Returns 0 when either vector is degenerate rather than NaN.
pub fn vector_angle_degrees(a: DVec3, b: DVec3) -> f64 {
    let denom_sq = a.length_squared() * b.length_squared();
    if a.length_squared() < DEGENERATE_LENGTH_SQ
        || b.length_squared() < DEGENERATE_LENGTH_SQ
        || !denom_sq.is_finite()
    {
        return 0.0;
    }

    let cos = (a.dot(b) / denom_sq.sqrt()).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Rotation whose local +Z faces `direction`, keeping local +Y near `up`
///
/// Returns `None` for a zero-length direction. When `direction` is parallel to
/// `up` there is no unique answer; the result is then the shortest turn of
/// `fallback` onto `direction`.
pub fn look_rotation(direction: DVec3, up: DVec3, fallback: DQuat) -> Option<DQuat> {
    let forward = direction.try_normalize()?;

    let right = up.cross(forward);
    if right.length_squared() < DEGENERATE_LENGTH_SQ {
        let current_forward = fallback * DVec3::Z;
        let arc = DQuat::from_rotation_arc(current_forward.normalize(), forward);
        return Some((arc * fallback).normalize());
    }

    let right = right.normalize();
    let true_up = forward.cross(right);
    Some(DQuat::from_mat3(&DMat3::from_cols(right, true_up, forward)).normalize())
}

/// Heading of `rotation` on the XZ plane in degrees, clockwise from +Z seen
/// from above, in `[0, 360)`.
///
/// `None` when the forward axis is (nearly) vertical.
pub fn yaw_degrees(rotation: DQuat) -> Option<f64> {
    let mut forward = rotation * DVec3::Z;
    forward.y = 0.0;
    if forward.length_squared() < 1e-4 {
        return None;
    }

    let yaw = forward.x.atan2(forward.z).to_degrees();
    Some(yaw.rem_euclid(360.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_move_towards_clamps_at_target() {
        let target = DVec3::new(1.0, 0.0, 0.0);
        assert_eq!(move_towards(DVec3::ZERO, target, 5.0), target);

        let stepped = move_towards(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0), 2.5);
        assert_relative_eq!(stepped.x, 2.5);
        assert_eq!(stepped.y, 0.0);
    }

    #[test]
    fn test_move_towards_zero_step_stays_put() {
        let start = DVec3::new(3.0, 0.0, 4.0);
        assert_eq!(move_towards(start, DVec3::ZERO, 0.0), start);
    }

    #[test]
    fn test_rotate_towards_does_not_overshoot() {
        let target = DQuat::from_rotation_y(std::f64::consts::FRAC_PI_2);

        let partial = rotate_towards(DQuat::IDENTITY, target, 30.0);
        assert_relative_eq!(quat_angle_degrees(DQuat::IDENTITY, partial), 30.0, epsilon = 1e-9);

        let done = rotate_towards(partial, target, 1000.0);
        assert_eq!(done, target);
    }

    #[test]
    fn test_small_steps_add_up_to_the_full_turn() {
        let target = DQuat::from_rotation_y(std::f64::consts::FRAC_PI_2);
        let mut current = DQuat::IDENTITY;

        for _ in 0..2249 {
            current = rotate_towards(current, target, 0.04);
        }
        assert_relative_eq!(quat_angle_degrees(current, target), 0.04, epsilon = 1e-9);

        current = rotate_towards(current, target, 0.04);
        assert!(quat_angle_degrees(current, target) < 1e-9);
    }

    #[test]
    fn test_quat_angle_is_accurate_for_tiny_turns() {
        let tiny = DQuat::from_rotation_y(1e-9_f64.to_radians());
        assert_relative_eq!(quat_angle_degrees(DQuat::IDENTITY, tiny), 1e-9, max_relative = 1e-6);
    }

    #[test]
    fn test_rotate_towards_takes_shortest_arc() {
        // Same orientation written with opposite sign
        let target = -DQuat::from_rotation_y(0.5);
        let stepped = rotate_towards(DQuat::IDENTITY, target, 10.0);
        let remaining = quat_angle_degrees(stepped, target);
        assert_relative_eq!(remaining, 0.5f64.to_degrees() - 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_vector_angle_degenerate_is_zero() {
        assert_eq!(vector_angle_degrees(DVec3::ZERO, DVec3::Z), 0.0);
        assert_relative_eq!(vector_angle_degrees(DVec3::Z, DVec3::X), 90.0, epsilon = 1e-12);
        assert_relative_eq!(vector_angle_degrees(DVec3::Z, -DVec3::Z), 180.0, epsilon = 1e-12);
    }

    #[test]
    fn test_look_rotation_faces_direction() {
        let rotation = look_rotation(DVec3::X, DVec3::Y, DQuat::IDENTITY).unwrap();
        let forward = rotation * DVec3::Z;
        assert_relative_eq!(forward.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!((rotation * DVec3::Y).y, 1.0, epsilon = 1e-12);

        assert!(look_rotation(DVec3::ZERO, DVec3::Y, DQuat::IDENTITY).is_none());
    }

    #[test]
    fn test_look_rotation_parallel_to_up() {
        let rotation = look_rotation(DVec3::Y, DVec3::Y, DQuat::IDENTITY).unwrap();
        let forward = rotation * DVec3::Z;
        assert_relative_eq!(forward.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_yaw_is_clockwise_from_z() {
        assert_relative_eq!(yaw_degrees(DQuat::IDENTITY).unwrap(), 0.0);

        // +X is a quarter turn clockwise when looking down Y
        let east = look_rotation(DVec3::X, DVec3::Y, DQuat::IDENTITY).unwrap();
        assert_relative_eq!(yaw_degrees(east).unwrap(), 90.0, epsilon = 1e-9);

        let west = look_rotation(-DVec3::X, DVec3::Y, DQuat::IDENTITY).unwrap();
        assert_relative_eq!(yaw_degrees(west).unwrap(), 270.0, epsilon = 1e-9);

        let straight_up = DQuat::from_rotation_x(-std::f64::consts::FRAC_PI_2);
        assert!(yaw_degrees(straight_up).is_none());
    }
}
