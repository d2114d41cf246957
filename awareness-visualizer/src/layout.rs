use awareness_common::{Vec2, angle_to_vec, clamp};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Ideal edge length; smaller values pull the drawing together.
const SPRING_K: f32 = 0.3;

/// Force-directed placement of the cells in the unit square.
///
/// Fruchterman-Reingold: every pair repels with `k^2 / d`, every edge attracts with `d^2 / k`,
/// and the maximum displacement per round cools linearly to zero.
pub fn spring_layout(
    num_cells: usize,
    edges: &[(u32, u32)],
    iterations: u32,
    seed: u64,
) -> Vec<Vec2> {
    if num_cells == 0 {
        return Vec::new();
    }
    if num_cells == 1 {
        return vec![Vec2::new(0.5, 0.5)];
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions: Vec<Vec2> = (0..num_cells)
        .map(|_| Vec2::new(rng.random::<f32>(), rng.random::<f32>()))
        .collect();

    let k = SPRING_K;
    let initial_temperature = 0.1;
    let mut displacement = vec![Vec2::zero(); num_cells];

    for round in 0..iterations {
        displacement.iter_mut().for_each(|d| *d = Vec2::zero());

        for i in 0..num_cells {
            for j in (i + 1)..num_cells {
                let mut delta = positions[i] - positions[j];
                let mut distance = delta.length();
                if distance < 1e-4 {
                    // Coincident points: push apart along a fixed direction per pair.
                    delta = angle_to_vec((i * 31 + j) as f32) * 1e-4;
                    distance = 1e-4;
                }
                let push = delta.normalize_or_zero() * (k * k / distance);
                displacement[i] += push;
                displacement[j] -= push;
            }
        }

        for &(a, b) in edges {
            let (a, b) = (a as usize, b as usize);
            if a >= num_cells || b >= num_cells {
                continue;
            }
            let delta = positions[a] - positions[b];
            let distance = delta.length();
            let pull = delta.normalize_or_zero() * (distance * distance / k);
            displacement[a] -= pull;
            displacement[b] += pull;
        }

        let temperature = initial_temperature * (1.0 - round as f32 / iterations as f32);
        for (position, step) in positions.iter_mut().zip(&displacement) {
            *position += step.clamp_length(temperature);
        }
    }

    normalize_to_unit_square(&mut positions);
    positions
}

/// Rescales positions so their bounding box fills `[0, 1]` on the wider axis, centered.
fn normalize_to_unit_square(positions: &mut [Vec2]) {
    let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
    let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
    for p in positions.iter() {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let span = (max_x - min_x).max(max_y - min_y);
    if span < 1e-9 {
        positions.iter_mut().for_each(|p| *p = Vec2::new(0.5, 0.5));
        return;
    }
    let offset_x = (span - (max_x - min_x)) / 2.0;
    let offset_y = (span - (max_y - min_y)) / 2.0;
    for p in positions.iter_mut() {
        p.x = clamp((p.x - min_x + offset_x) / span, 0.0, 1.0);
        p.y = clamp((p.y - min_y + offset_y) / span, 0.0, 1.0);
    }
}
