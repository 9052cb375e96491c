use thiserror::Error;

use crate::types::{FingerId, FingerPose, LANDMARK_COUNT, LandmarkFrame};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("hand reported {got} landmarks, expected {LANDMARK_COUNT}")]
    TooFewLandmarks { got: usize },
}

/// Per-hand, per-frame geometry derived from raw landmarks. Computed
/// fresh every frame and never mutated; all smoothing happens later in
/// the dispatcher.
#[derive(Clone, Debug)]
pub struct FeatureSet {
    poses: [FingerPose; 5],
    tips: [(f32, f32); 5],
}

impl FeatureSet {
    pub fn pose(&self, finger: FingerId) -> FingerPose {
        self.poses[finger as usize]
    }

    /// Normalized (x, y) of the fingertip.
    pub fn tip(&self, finger: FingerId) -> (f32, f32) {
        self.tips[finger as usize]
    }

    /// Euclidean distance between two fingertips in normalized x,y,
    /// ignoring z.
    pub fn tip_distance(&self, a: FingerId, b: FingerId) -> f32 {
        let (ax, ay) = self.tip(a);
        let (bx, by) = self.tip(b);
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }
}

/// Deterministic geometric extraction, no side effects. A hand with
/// fewer than 21 points is discarded by the caller; the engine stays
/// live across it.
pub fn extract(hand: &LandmarkFrame) -> Result<FeatureSet, ExtractionError> {
    if hand.points.len() < LANDMARK_COUNT {
        return Err(ExtractionError::TooFewLandmarks {
            got: hand.points.len(),
        });
    }

    let mut poses = [FingerPose::Level; 5];
    let mut tips = [(0.0, 0.0); 5];

    for finger in FingerId::ALL {
        let tip = hand.points[finger.tip()];
        let mcp = hand.points[finger.mcp()];

        poses[finger as usize] = if tip[1] < mcp[1] {
            FingerPose::Raised
        } else if tip[1] > mcp[1] {
            FingerPose::Lowered
        } else {
            FingerPose::Level
        };
        tips[finger as usize] = (tip[0], tip[1]);
    }

    Ok(FeatureSet { poses, tips })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_hand() -> LandmarkFrame {
        LandmarkFrame {
            points: vec![[0.5, 0.5, 0.0]; LANDMARK_COUNT],
        }
    }

    fn set_point(hand: &mut LandmarkFrame, index: usize, x: f32, y: f32) {
        hand.points[index] = [x, y, 0.0];
    }

    #[test]
    fn raised_and_lowered_follow_tip_versus_knuckle() {
        let mut hand = flat_hand();
        set_point(&mut hand, FingerId::Index.tip(), 0.5, 0.2);
        set_point(&mut hand, FingerId::Index.mcp(), 0.5, 0.6);
        set_point(&mut hand, FingerId::Middle.tip(), 0.5, 0.8);
        set_point(&mut hand, FingerId::Middle.mcp(), 0.5, 0.6);

        let features = extract(&hand).unwrap();
        assert_eq!(features.pose(FingerId::Index), FingerPose::Raised);
        assert_eq!(features.pose(FingerId::Middle), FingerPose::Lowered);
    }

    #[test]
    fn equal_height_is_neither_up_nor_down() {
        let features = extract(&flat_hand()).unwrap();
        for finger in FingerId::ALL {
            assert_eq!(features.pose(finger), FingerPose::Level);
        }
    }

    #[test]
    fn tip_distance_ignores_z() {
        let mut hand = flat_hand();
        hand.points[FingerId::Index.tip()] = [0.3, 0.4, 0.9];
        hand.points[FingerId::Middle.tip()] = [0.3, 0.1, -0.5];

        let features = extract(&hand).unwrap();
        let gap = features.tip_distance(FingerId::Index, FingerId::Middle);
        assert!((gap - 0.3).abs() < 1e-6);
    }

    #[test]
    fn short_landmark_list_is_an_extraction_error() {
        let hand = LandmarkFrame {
            points: vec![[0.0, 0.0, 0.0]; 7],
        };
        let err = extract(&hand).unwrap_err();
        assert!(matches!(err, ExtractionError::TooFewLandmarks { got: 7 }));
    }
}
