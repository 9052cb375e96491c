use crate::{
    config::Thresholds,
    features::FeatureSet,
    types::{FingerId, FingerPose, GestureEvent, ZoneCommand},
};

/// Priority-ordered pose classifier. Classification is a pure function
/// of the feature set: no clocks, no history, so every rule stays
/// independently testable. Debounce and smoothing live in the
/// dispatcher.
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Classifier { thresholds }
    }

    /// First matching rule wins; the ordering makes mutual exclusion
    /// structural rather than incidental.
    pub fn classify(&self, features: &FeatureSet) -> GestureEvent {
        let t = &self.thresholds;
        let index = features.pose(FingerId::Index);
        let middle = features.pose(FingerId::Middle);
        let ring = features.pose(FingerId::Ring);

        let index_middle_gap = features.tip_distance(FingerId::Index, FingerId::Middle);
        let index_ring_gap = features.tip_distance(FingerId::Index, FingerId::Ring);

        // Rule 1: three-finger pinch. Most specific pose, checked
        // first so the looser scroll rule cannot shadow it.
        if index == FingerPose::Raised
            && middle == FingerPose::Raised
            && ring == FingerPose::Raised
            && index_middle_gap < t.click_distance
            && index_ring_gap < t.pinch_group_distance
        {
            return GestureEvent::Pinch3Click;
        }

        // Rule 2: two-finger scroll.
        if index_middle_gap < t.scroll_distance {
            if index == FingerPose::Raised && middle == FingerPose::Raised {
                return GestureEvent::ScrollUp;
            }
            if index == FingerPose::Lowered && middle == FingerPose::Lowered {
                return GestureEvent::ScrollDown;
            }
        }

        // Rule 3: pointer, with an edge-zone tag when the tip sits in
        // the left or right fraction of the frame.
        if index == FingerPose::Raised {
            let (x, y) = features.tip(FingerId::Index);
            let zone = if x < t.left_zone_fraction {
                Some(ZoneCommand::Left)
            } else if x > t.right_zone_fraction {
                Some(ZoneCommand::Right)
            } else {
                None
            };
            return GestureEvent::Point { x, y, zone };
        }

        GestureEvent::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        features::extract,
        types::{LANDMARK_COUNT, LandmarkFrame},
    };

    // Builds a hand whose index/middle/ring tips sit at the given
    // normalized positions, raised or lowered relative to their
    // knuckles at y = 0.5.
    fn hand(tips: &[(FingerId, f32, f32)]) -> LandmarkFrame {
        let mut points = vec![[0.5, 0.5, 0.0]; LANDMARK_COUNT];
        // Park every tip below its knuckle so unmentioned fingers
        // read as Lowered.
        for finger in FingerId::ALL {
            points[finger.tip()] = [0.5, 0.9, 0.0];
        }
        for &(finger, x, y) in tips {
            points[finger.tip()] = [x, y, 0.0];
        }
        LandmarkFrame { points }
    }

    fn classify(hand: &LandmarkFrame) -> GestureEvent {
        let classifier = Classifier::new(Thresholds::default());
        classifier.classify(&extract(hand).unwrap())
    }

    #[test]
    fn tight_three_finger_pinch_is_a_click() {
        // index-middle gap 0.02 < 0.05, index-ring gap 0.06 < 0.10.
        let hand = hand(&[
            (FingerId::Index, 0.50, 0.30),
            (FingerId::Middle, 0.52, 0.30),
            (FingerId::Ring, 0.56, 0.30),
        ]);
        assert_eq!(classify(&hand), GestureEvent::Pinch3Click);
    }

    #[test]
    fn loose_pinch_falls_through_to_scroll() {
        // Same fingers up but index-middle gap 0.08 sits between the
        // click threshold (0.05) and the scroll threshold (0.10).
        let hand = hand(&[
            (FingerId::Index, 0.50, 0.30),
            (FingerId::Middle, 0.58, 0.30),
            (FingerId::Ring, 0.56, 0.30),
        ]);
        assert_eq!(classify(&hand), GestureEvent::ScrollUp);
    }

    #[test]
    fn both_fingers_down_scrolls_down() {
        let hand = hand(&[
            (FingerId::Index, 0.50, 0.80),
            (FingerId::Middle, 0.55, 0.80),
        ]);
        assert_eq!(classify(&hand), GestureEvent::ScrollDown);
    }

    #[test]
    fn mixed_poses_never_scroll() {
        // Close tips but index up, middle down: rules 1-2 fail and the
        // raised index makes it a pointer frame.
        let hand = hand(&[
            (FingerId::Index, 0.50, 0.30),
            (FingerId::Middle, 0.52, 0.80),
        ]);
        assert!(matches!(classify(&hand), GestureEvent::Point { .. }));
    }

    #[test]
    fn lone_index_in_left_zone_points_with_zone_tag() {
        let hand = hand(&[(FingerId::Index, 0.05, 0.30)]);
        match classify(&hand) {
            GestureEvent::Point { x, y, zone } => {
                assert!((x - 0.05).abs() < 1e-6);
                assert!((y - 0.30).abs() < 1e-6);
                assert_eq!(zone, Some(ZoneCommand::Left));
            }
            other => panic!("expected a pointer event, got {other:?}"),
        }
    }

    #[test]
    fn right_edge_tags_the_right_zone() {
        let hand = hand(&[(FingerId::Index, 0.95, 0.30)]);
        assert!(matches!(
            classify(&hand),
            GestureEvent::Point {
                zone: Some(ZoneCommand::Right),
                ..
            }
        ));
    }

    #[test]
    fn center_pointer_has_no_zone() {
        let hand = hand(&[(FingerId::Index, 0.50, 0.30)]);
        assert!(matches!(
            classify(&hand),
            GestureEvent::Point { zone: None, .. }
        ));
    }

    #[test]
    fn no_raised_index_yields_nothing() {
        let hand = hand(&[]);
        assert_eq!(classify(&hand), GestureEvent::None);
    }

    #[test]
    fn classification_is_deterministic() {
        let hand = hand(&[
            (FingerId::Index, 0.50, 0.30),
            (FingerId::Middle, 0.52, 0.30),
            (FingerId::Ring, 0.56, 0.30),
        ]);
        let classifier = Classifier::new(Thresholds::default());
        let features = extract(&hand).unwrap();
        let first = classifier.classify(&features);
        for _ in 0..10 {
            assert_eq!(classifier.classify(&features), first);
        }
    }
}
