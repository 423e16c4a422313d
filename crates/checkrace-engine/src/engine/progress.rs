//! Completion-score evaluation with checkpoint capture.
//!
//! An agent's score is the reward of everything it has captured plus a
//! partial reward for how close it is to the next checkpoint:
//!
//! ```text
//! score = accumulated_reward[cursor - 1] + reward_share[cursor] * fraction
//! fraction = clamp(1 - distance / distance_to_previous[cursor], 0, 1)
//! ```
//!
//! When the agent is inside the capture radius of its next checkpoint, that
//! checkpoint is captured and the same position is checked against the
//! following one. A fast agent (or a cluster of close checkpoints) can
//! therefore capture several checkpoints in a single evaluation. The loop runs
//! at most once per remaining checkpoint.
//!
//! [`evaluate`] is pure: it reports captures and respawn updates in the
//! returned [`Evaluation`] and the caller applies them.

use crate::{CheckpointGraph, Point2, RespawnState, Transform};

/// Result of evaluating one agent against the checkpoint graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Completion score in `[0, 1]`.
    pub score: f32,
    /// Index of the next checkpoint to capture.
    pub cursor: usize,
    /// Number of checkpoints captured by this evaluation.
    pub captured: usize,
    /// New track respawn point, if a `respawn_here` checkpoint was captured.
    /// With several such captures the last one wins.
    pub respawn: Option<RespawnState>,
}

impl Evaluation {
    const fn rejected(cursor: usize) -> Self {
        Self {
            score: 0.0,
            cursor,
            captured: 0,
            respawn: None,
        }
    }
}

/// Scores an agent at `position` whose next checkpoint is `cursor`.
///
/// A non-finite position scores 0 without capturing anything so that one
/// broken agent does not disturb the rest of the tick.
#[must_use]
pub fn evaluate(
    graph: &CheckpointGraph,
    position: Point2,
    rotation: f32,
    cursor: usize,
) -> Evaluation {
    if !position.is_finite() {
        tracing::warn!(?position, cursor, "non-finite agent position, scoring as 0");
        return Evaluation::rejected(cursor);
    }

    let mut cursor = cursor;
    let mut captured = 0;
    let mut respawn = None;

    while let Some(checkpoint) = graph.get(cursor) {
        if !checkpoint.is_captured_from(position) {
            let distance = checkpoint.position().distance(position);
            let score = graph.reward_before(cursor) + checkpoint.partial_reward(distance);
            return Evaluation {
                score: score.clamp(0.0, 1.0),
                cursor,
                captured,
                respawn,
            };
        }

        if checkpoint.respawn_here() {
            respawn = Some(RespawnState::new(
                Transform::new(position, rotation),
                cursor + 1,
            ));
        }
        tracing::debug!(
            checkpoint = cursor,
            respawn = checkpoint.respawn_here(),
            "checkpoint captured"
        );
        cursor += 1;
        captured += 1;
    }

    // every checkpoint captured
    Evaluation {
        score: 1.0,
        cursor,
        captured,
        respawn,
    }
}

#[cfg(test)]
mod tests {
    use crate::CheckpointPlacement;

    use super::*;

    fn straight_track(radius: f32) -> CheckpointGraph {
        CheckpointGraph::build(&[
            CheckpointPlacement::new(Point2::new(0.0, 0.0), radius),
            CheckpointPlacement::new(Point2::new(10.0, 0.0), radius),
            CheckpointPlacement::new(Point2::new(20.0, 0.0), radius),
        ])
        .unwrap()
    }

    fn clustered_track() -> CheckpointGraph {
        // checkpoints 1..=3 sit within 2 units of each other
        CheckpointGraph::build(&[
            CheckpointPlacement::new(Point2::new(0.0, 0.0), 1.0),
            CheckpointPlacement::new(Point2::new(10.0, 0.0), 3.0),
            CheckpointPlacement::new(Point2::new(11.0, 0.0), 3.0),
            CheckpointPlacement::new(Point2::new(12.0, 0.0), 1.0),
            CheckpointPlacement::new(Point2::new(30.0, 0.0), 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_capture_on_checkpoint_position() {
        let graph = straight_track(1.0);
        let evaluation = evaluate(&graph, Point2::new(10.0, 0.0), 0.0, 1);

        assert_eq!(evaluation.cursor, 2);
        assert_eq!(evaluation.captured, 1);
        assert!((evaluation.score - 0.5).abs() < 1e-6);
        assert!((evaluation.score - graph[1].accumulated_reward()).abs() < 1e-6);
    }

    #[test]
    fn test_partial_progress_is_linear() {
        let graph = straight_track(1.0);

        let start = evaluate(&graph, Point2::new(0.0, 0.0), 0.0, 1);
        assert_eq!(start.cursor, 1);
        assert!(start.score.abs() < 1e-6);

        let halfway = evaluate(&graph, Point2::new(5.0, 0.0), 0.0, 1);
        assert_eq!(halfway.cursor, 1);
        assert_eq!(halfway.captured, 0);
        assert!((halfway.score - 0.25).abs() < 1e-6);

        let second_leg = evaluate(&graph, Point2::new(15.0, 0.0), 0.0, 2);
        assert!((second_leg.score - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_score_grows_as_agent_approaches() {
        let graph = straight_track(0.5);
        let mut last = -1.0;
        for step in 0..=18 {
            #[expect(clippy::cast_precision_loss)]
            let x = step as f32 * 0.5;
            let evaluation = evaluate(&graph, Point2::new(x, 0.0), 0.0, 1);
            assert!(evaluation.score > last);
            last = evaluation.score;
        }
    }

    #[test]
    fn test_capture_boundary_is_inclusive() {
        let graph = straight_track(1.0);
        let evaluation = evaluate(&graph, Point2::new(9.0, 0.0), 0.0, 1);
        assert_eq!(evaluation.cursor, 2);

        let evaluation = evaluate(&graph, Point2::new(8.9, 0.0), 0.0, 1);
        assert_eq!(evaluation.cursor, 1);
    }

    #[test]
    fn test_evaluation_agrees_with_capture_test() {
        let graph = straight_track(1.0);
        for x in [-500.0, 8.5, 9.0, 9.5, 10.0, 11.0, 11.5, 300.0] {
            let position = Point2::new(x, 0.25);
            let evaluation = evaluate(&graph, position, 0.0, 1);
            assert_eq!(evaluation.captured > 0, graph[1].is_captured_from(position));
        }
    }

    #[test]
    fn test_repeated_evaluation_is_stable() {
        let graph = straight_track(1.0);
        let position = Point2::new(13.0, 2.0);

        let first = evaluate(&graph, position, 0.0, 2);
        let second = evaluate(&graph, position, 0.0, first.cursor);
        let third = evaluate(&graph, position, 0.0, second.cursor);

        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn test_skipping_ahead_captures_every_checkpoint_in_reach() {
        let graph = clustered_track();
        let evaluation = evaluate(&graph, Point2::new(12.0, 0.0), 0.0, 1);

        assert_eq!(evaluation.cursor, 4);
        assert_eq!(evaluation.captured, 3);
        assert!(evaluation.score >= graph[3].accumulated_reward());
        assert!(evaluation.score < graph[4].accumulated_reward());
    }

    #[test]
    fn test_capturing_the_last_checkpoint_completes_the_track() {
        let graph = straight_track(1.0);
        let evaluation = evaluate(&graph, Point2::new(20.0, 0.5), 0.0, 2);
        assert_eq!(evaluation.cursor, 3);
        assert!((evaluation.score - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cursor_past_the_end_scores_one() {
        let graph = straight_track(1.0);
        let evaluation = evaluate(&graph, Point2::new(-100.0, 40.0), 0.0, 3);
        assert_eq!(evaluation.cursor, 3);
        assert_eq!(evaluation.captured, 0);
        assert!((evaluation.score - 1.0).abs() < f32::EPSILON);

        let evaluation = evaluate(&graph, Point2::new(-100.0, 40.0), 0.0, 99);
        assert_eq!(evaluation.cursor, 99);
        assert!((evaluation.score - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cursor_zero_counts_from_the_start() {
        let graph = straight_track(1.0);

        let away = evaluate(&graph, Point2::new(-5.0, 0.0), 0.0, 0);
        assert_eq!(away.cursor, 0);
        assert!(away.score.abs() < f32::EPSILON);

        let on_start = evaluate(&graph, Point2::new(0.0, 0.0), 0.0, 0);
        assert_eq!(on_start.cursor, 1);
        assert_eq!(on_start.captured, 1);
    }

    #[test]
    fn test_non_finite_position_scores_zero_without_capture() {
        let graph = straight_track(1.0);
        for position in [
            Point2::new(f32::NAN, 0.0),
            Point2::new(10.0, f32::INFINITY),
            Point2::new(f32::NEG_INFINITY, f32::NAN),
        ] {
            let evaluation = evaluate(&graph, position, 0.0, 2);
            assert_eq!(evaluation.score, 0.0);
            assert_eq!(evaluation.cursor, 2);
            assert_eq!(evaluation.captured, 0);
            assert_eq!(evaluation.respawn, None);
        }
    }

    #[test]
    fn test_respawn_checkpoint_reports_new_spawn_point() {
        let graph = CheckpointGraph::build(&[
            CheckpointPlacement::new(Point2::new(0.0, 0.0), 1.0),
            CheckpointPlacement::new(Point2::new(10.0, 0.0), 1.0).with_respawn(),
            CheckpointPlacement::new(Point2::new(20.0, 0.0), 1.0),
        ])
        .unwrap();

        let position = Point2::new(10.5, 0.25);
        let evaluation = evaluate(&graph, position, 1.25, 1);
        let respawn = evaluation.respawn.unwrap();
        assert_eq!(respawn.spawn_position, position);
        assert!((respawn.spawn_rotation - 1.25).abs() < f32::EPSILON);
        assert_eq!(respawn.spawn_checkpoint_index, 2);

        let plain = evaluate(&graph, Point2::new(20.0, 0.0), 0.0, 2);
        assert_eq!(plain.respawn, None);
    }

    #[test]
    fn test_last_respawn_capture_wins() {
        let graph = CheckpointGraph::build(&[
            CheckpointPlacement::new(Point2::new(0.0, 0.0), 1.0),
            CheckpointPlacement::new(Point2::new(10.0, 0.0), 5.0).with_respawn(),
            CheckpointPlacement::new(Point2::new(12.0, 0.0), 5.0).with_respawn(),
            CheckpointPlacement::new(Point2::new(40.0, 0.0), 1.0),
        ])
        .unwrap();

        let evaluation = evaluate(&graph, Point2::new(11.0, 0.0), 0.0, 1);
        assert_eq!(evaluation.cursor, 3);
        assert_eq!(evaluation.respawn.unwrap().spawn_checkpoint_index, 3);
    }
}
