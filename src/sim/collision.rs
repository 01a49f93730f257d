//! Contact geometry between the ball and a unit wall cell
//!
//! A wall is a unit square; the ball is a disc. For contact purposes the wall
//! is inflated by the ball radius, which gives flat faces plus rounded corners.
//! Faces and corners are tested separately so the board can try the face test
//! first and fall back to corners on a later pass.

use glam::DVec2;

/// Half the side of a grid cell
pub const HALF_CELL: f64 = 0.5;

/// A detected contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the wall toward the ball
    pub normal: DVec2,
    /// Corrected ball position, when the contact pushes the ball out
    pub resolved_pos: Option<DVec2>,
}

/// Test the ball against the four flat faces of the wall cell at `center`
///
/// The face axis is the one the ball is farther out on, provided the ball is
/// within the cell's span on the other axis. Ties favour the x axis.
pub fn face_contact(ball_pos: DVec2, center: DVec2, ball_radius: f64) -> Option<Contact> {
    let reach = HALF_CELL + ball_radius;
    let offset = ball_pos - center;
    let dist = offset.abs();

    if dist.x > reach || dist.y > reach {
        return None;
    }

    let x_face = dist.y < HALF_CELL;
    let y_face = dist.x < HALF_CELL;
    let normal = if dist.y > dist.x {
        if y_face {
            DVec2::new(0.0, sign(offset.y))
        } else if x_face {
            DVec2::new(sign(offset.x), 0.0)
        } else {
            return None;
        }
    } else if x_face {
        DVec2::new(sign(offset.x), 0.0)
    } else if y_face {
        DVec2::new(0.0, sign(offset.y))
    } else {
        return None;
    };

    // Push the ball out to exactly touching on the contact axis
    let mut resolved = ball_pos;
    if normal.x != 0.0 {
        resolved.x = center.x + normal.x * reach;
    } else {
        resolved.y = center.y + normal.y * reach;
    }

    Some(Contact {
        normal,
        resolved_pos: Some(resolved),
    })
}

/// Test the ball against the rounded corners of the wall cell at `center`
///
/// All four corners are checked and the nearest one within `ball_radius`
/// wins. The ball position is left alone; only the velocity is corrected.
pub fn corner_contact(ball_pos: DVec2, center: DVec2, ball_radius: f64) -> Option<Contact> {
    let reach = HALF_CELL + ball_radius;
    let dist = (ball_pos - center).abs();
    if dist.x > reach || dist.y > reach {
        return None;
    }

    const CORNERS: [DVec2; 4] = [
        DVec2::new(-HALF_CELL, -HALF_CELL),
        DVec2::new(-HALF_CELL, HALF_CELL),
        DVec2::new(HALF_CELL, -HALF_CELL),
        DVec2::new(HALF_CELL, HALF_CELL),
    ];

    let radius_sq = ball_radius * ball_radius;
    CORNERS
        .iter()
        .map(|corner| ball_pos - (center + *corner))
        // A ball centred exactly on a corner has no usable direction
        .filter(|off| {
            let len_sq = off.length_squared();
            len_sq <= radius_sq && len_sq > 0.0
        })
        .min_by(|a, b| a.length_squared().total_cmp(&b.length_squared()))
        .map(|off| Contact {
            normal: off / off.length(),
            resolved_pos: None,
        })
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: DVec2, normal: DVec2) -> DVec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce the ball if it is moving into the surface, keeping `restitution` of the reflected velocity
pub fn bounce(velocity: DVec2, normal: DVec2, restitution: f64) -> DVec2 {
    if normal.dot(velocity) < 0.0 {
        restitution * reflect_velocity(velocity, normal)
    } else {
        velocity
    }
}

#[inline]
fn sign(v: f64) -> f64 {
    if v > 0.0 { 1.0 } else { -1.0 }
}
