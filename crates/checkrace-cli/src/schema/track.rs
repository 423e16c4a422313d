use checkrace_engine::CheckpointPlacement;
use serde::{Deserialize, Serialize};

/// A track as stored on disk.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrackFile {
    pub name: String,
    pub checkpoints: Vec<CheckpointPlacement>,
}

#[cfg(test)]
mod tests {
    use checkrace_engine::{CheckpointGraph, Point2};

    use super::*;

    #[test]
    fn test_track_file_parses_with_optional_respawn_flag() {
        let json = r#"{
            "name": "hairpin",
            "checkpoints": [
                { "position": { "x": 0.0, "y": 0.0 }, "capture_radius": 2.0 },
                { "position": { "x": 20.0, "y": 0.0 }, "capture_radius": 2.0, "respawn_here": true },
                { "position": { "x": 20.0, "y": 15.0 }, "capture_radius": 2.0 }
            ]
        }"#;
        let track: TrackFile = serde_json::from_str(json).unwrap();
        assert_eq!(track.name, "hairpin");
        assert_eq!(track.checkpoints[1].position, Point2::new(20.0, 0.0));
        assert!(track.checkpoints[1].respawn_here);
        assert!(!track.checkpoints[2].respawn_here);

        let graph = CheckpointGraph::build(&track.checkpoints).unwrap();
        assert!((graph.track_length() - 35.0).abs() < 1e-5);
    }

    #[test]
    fn test_bundled_oval_track_is_valid() {
        let track: TrackFile =
            serde_json::from_str(include_str!("../../../../tracks/oval.json")).unwrap();
        assert!(CheckpointGraph::build(&track.checkpoints).is_ok());
    }
}
