// Hand keypoints and the finger-up classifier.
// Visual: nothing is drawn here; these types decide which mode the painter is in.

use crate::error::Error;
use crate::types::Point;

/// Number of landmarks the detector reports per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices (MediaPipe hand model convention).
#[allow(dead_code)]
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

use landmarks::*;

/// Landmark pairs joined when drawing the hand skeleton overlay.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_FINGER_MCP), (INDEX_FINGER_MCP, INDEX_FINGER_PIP),
    (INDEX_FINGER_PIP, INDEX_FINGER_DIP), (INDEX_FINGER_DIP, INDEX_FINGER_TIP),
    (INDEX_FINGER_MCP, MIDDLE_FINGER_MCP), (MIDDLE_FINGER_MCP, MIDDLE_FINGER_PIP),
    (MIDDLE_FINGER_PIP, MIDDLE_FINGER_DIP), (MIDDLE_FINGER_DIP, MIDDLE_FINGER_TIP),
    (MIDDLE_FINGER_MCP, RING_FINGER_MCP), (RING_FINGER_MCP, RING_FINGER_PIP),
    (RING_FINGER_PIP, RING_FINGER_DIP), (RING_FINGER_DIP, RING_FINGER_TIP),
    (RING_FINGER_MCP, PINKY_MCP), (WRIST, PINKY_MCP),
    (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
];

/// One frame's hand keypoints in pixel coordinates: either empty (no hand) or exactly 21 points.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeypointSet {
    points: Vec<Point>,
}

impl KeypointSet {
    /// "No hand in this frame."
    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    pub fn new(points: Vec<Point>) -> Result<Self, Error> {
        match points.len() {
            0 | LANDMARK_COUNT => Ok(Self { points }),
            n => Err(Error::InvalidKeypoints(n)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn get(&self, landmark: usize) -> Option<Point> {
        self.points.get(landmark).copied()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The drawing pointer.
    pub fn index_tip(&self) -> Option<Point> {
        self.get(INDEX_FINGER_TIP)
    }

    pub fn middle_tip(&self) -> Option<Point> {
        self.get(MIDDLE_FINGER_TIP)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Thumb = 0,
    Index = 1,
    Middle = 2,
    Ring = 3,
    Little = 4,
}

impl Finger {
    pub const ALL: [Finger; 5] = [Finger::Thumb, Finger::Index, Finger::Middle, Finger::Ring, Finger::Little];

    /// (tip, joint the tip is compared against)
    const fn landmark_pair(self) -> (usize, usize) {
        match self {
            Finger::Thumb => (THUMB_TIP, THUMB_IP),
            Finger::Index => (INDEX_FINGER_TIP, INDEX_FINGER_PIP),
            Finger::Middle => (MIDDLE_FINGER_TIP, MIDDLE_FINGER_PIP),
            Finger::Ring => (RING_FINGER_TIP, RING_FINGER_PIP),
            Finger::Little => (PINKY_TIP, PINKY_PIP),
        }
    }
}

/// Up/down per finger, thumb..little.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerFlags(pub [bool; 5]);

impl FingerFlags {
    pub fn is_up(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    #[cfg(test)]
    pub fn as_array(&self) -> [bool; 5] {
        self.0
    }
}

/// Classify which fingers are extended. Returns None for an empty set (no hand), in which case the
/// caller skips all gesture logic for the frame.
///
/// * index..little: up when the tip is above (smaller y than) the PIP joint.
/// * thumb: it folds sideways, so compare x instead; up when the tip is right of the IP joint
///   in the mirrored image.
pub fn fingers_up(keypoints: &KeypointSet) -> Option<FingerFlags> {
    if keypoints.is_empty() {
        return None;
    }
    let pts = keypoints.points();

    let mut flags = FingerFlags::default();
    for finger in Finger::ALL {
        let (tip, joint) = finger.landmark_pair();
        let (tip, joint) = (pts[tip], pts[joint]);
        flags.0[finger as usize] = match finger {
            Finger::Thumb => tip.x > joint.x,
            _ => tip.y < joint.y,
        };
    }
    Some(flags)
}
