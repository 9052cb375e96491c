use std::time::Instant;

/// Landmarks per hand in the MediaPipe hand topology.
pub const LANDMARK_COUNT: usize = 21;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FingerId {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl FingerId {
    pub const ALL: [FingerId; 5] = [
        FingerId::Thumb,
        FingerId::Index,
        FingerId::Middle,
        FingerId::Ring,
        FingerId::Pinky,
    ];

    pub fn tip(self) -> usize {
        match self {
            FingerId::Thumb => 4,
            FingerId::Index => 8,
            FingerId::Middle => 12,
            FingerId::Ring => 16,
            FingerId::Pinky => 20,
        }
    }

    pub fn mcp(self) -> usize {
        match self {
            FingerId::Thumb => 2,
            FingerId::Index => 5,
            FingerId::Middle => 9,
            FingerId::Ring => 13,
            FingerId::Pinky => 17,
        }
    }
}

/// Tip strictly above the knuckle (smaller y in the mirrored, y-down
/// image) is Raised; strictly below is Lowered; exactly equal is Level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FingerPose {
    Raised,
    Level,
    Lowered,
}

/// One detected hand: 21 points with normalized x,y in [0,1] and
/// model-relative z.
#[derive(Clone, Debug)]
pub struct LandmarkFrame {
    pub points: Vec<[f32; 3]>,
}

/// Everything the hand-tracking collaborator reports for one video
/// frame. Zero hands is a normal quiet frame.
#[derive(Clone, Debug)]
pub struct TrackedFrame {
    pub hands: Vec<LandmarkFrame>,
    pub width: u32,
    pub height: u32,
    #[allow(dead_code)]
    pub timestamp: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneCommand {
    Left,
    Right,
}

/// Classifier output, at most one per hand per frame. The zone tag
/// rides on `Point` because pointer motion and a zone command can be
/// simultaneous; the dispatcher decides their order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    None,
    Point {
        x: f32,
        y: f32,
        zone: Option<ZoneCommand>,
    },
    Pinch3Click,
    ScrollUp,
    ScrollDown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
}

/// The engine's sole output, handed to the action sink.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActionCommand {
    MoveCursor(f32, f32),
    Click,
    Scroll(i32),
    KeyPress(KeyCode),
}
