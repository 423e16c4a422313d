//! Random loop-shaped tracks for headless runs.

use std::f32::consts::TAU;

use checkrace_engine::{CheckpointPlacement, Point2};
use rand::Rng;

use crate::SimError;

/// Fewest checkpoints a generated loop may have.
pub const MIN_LOOP_CHECKPOINTS: usize = 3;

/// Generates one lap around a jittered ellipse centred on the origin.
///
/// The lap has `checkpoints` checkpoints plus a finish checkpoint on top of
/// the start. Every quarter of the lap is flagged as a respawn checkpoint.
pub fn generate_loop<R>(
    rng: &mut R,
    checkpoints: usize,
    capture_radius: f32,
) -> Result<Vec<CheckpointPlacement>, SimError>
where
    R: Rng + ?Sized,
{
    if checkpoints < MIN_LOOP_CHECKPOINTS {
        return Err(SimError::TooFewCheckpoints {
            requested: checkpoints,
        });
    }

    let radius_x = rng.random_range(40.0..80.0_f32);
    let radius_y = rng.random_range(25.0..radius_x);
    let quarter = (checkpoints / 4).max(1);

    #[expect(clippy::cast_precision_loss)]
    let mut placements = (0..checkpoints)
        .map(|i| {
            let theta = TAU * i as f32 / checkpoints as f32;
            let jitter = if i == 0 {
                1.0
            } else {
                rng.random_range(0.9..1.1)
            };
            let position = Point2::new(
                radius_x * theta.cos() * jitter,
                radius_y * theta.sin() * jitter,
            );
            let placement = CheckpointPlacement::new(position, capture_radius);
            if i > 0 && i % quarter == 0 {
                placement.with_respawn()
            } else {
                placement
            }
        })
        .collect::<Vec<_>>();

    let finish = CheckpointPlacement::new(placements[0].position, capture_radius);
    placements.push(finish);
    Ok(placements)
}

#[cfg(test)]
mod tests {
    use checkrace_engine::CheckpointGraph;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_loop_closes_on_start() {
        let mut rng = Pcg32::seed_from_u64(3);
        let placements = generate_loop(&mut rng, 12, 2.0).unwrap();
        assert_eq!(placements.len(), 13);
        assert_eq!(placements[0].position, placements[12].position);
        assert!(!placements[0].position.is_origin());

        let respawns = placements.iter().filter(|p| p.respawn_here).count();
        assert_eq!(respawns, 3);

        let graph = CheckpointGraph::build(&placements).unwrap();
        assert!(graph.track_length() > 0.0);
    }

    #[test]
    fn test_same_seed_same_track() {
        let a = generate_loop(&mut Pcg32::seed_from_u64(9), 8, 2.0).unwrap();
        let b = generate_loop(&mut Pcg32::seed_from_u64(9), 8, 2.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_too_few_checkpoints() {
        let err = generate_loop(&mut Pcg32::seed_from_u64(0), 2, 2.0).unwrap_err();
        assert!(matches!(err, SimError::TooFewCheckpoints { requested: 2 }));
    }
}
