//! Landmark identifiers and landmark values
//!
//! Landmarks are addressed by a fixed enumerated index, never by string at
//! frame time. The name table exists for configuration and diagnostics.

use std::fmt;
use std::str::FromStr;

use crate::{GesturaError, Point3};

/// Landmark group delivered by the pose engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LandmarkGroup {
    Body,
    LeftHand,
    RightHand,
    Face,
}

impl LandmarkGroup {
    /// All groups in snapshot order
    pub fn all() -> &'static [LandmarkGroup] {
        &[
            LandmarkGroup::Body,
            LandmarkGroup::LeftHand,
            LandmarkGroup::RightHand,
            LandmarkGroup::Face,
        ]
    }

    /// Canonical number of landmarks in a present group
    pub const fn size(self) -> usize {
        match self {
            LandmarkGroup::Body => BodyLandmark::COUNT,
            LandmarkGroup::LeftHand | LandmarkGroup::RightHand => HandLandmark::COUNT,
            LandmarkGroup::Face => FaceLandmark::COUNT,
        }
    }
}

/// Hand slot / side of the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandSide::Left => "left",
            HandSide::Right => "right",
        }
    }

    /// Landmark group carrying this hand's finger landmarks
    pub const fn hand_group(self) -> LandmarkGroup {
        match self {
            HandSide::Left => LandmarkGroup::LeftHand,
            HandSide::Right => LandmarkGroup::RightHand,
        }
    }

    pub const fn wrist(self) -> BodyLandmark {
        match self {
            HandSide::Left => BodyLandmark::LeftWrist,
            HandSide::Right => BodyLandmark::RightWrist,
        }
    }

    pub const fn elbow(self) -> BodyLandmark {
        match self {
            HandSide::Left => BodyLandmark::LeftElbow,
            HandSide::Right => BodyLandmark::RightElbow,
        }
    }

    pub const fn shoulder(self) -> BodyLandmark {
        match self {
            HandSide::Left => BodyLandmark::LeftShoulder,
            HandSide::Right => BodyLandmark::RightShoulder,
        }
    }
}

/// Body landmarks in pose-model order (33 points)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

const BODY_NAMES: [&str; BodyLandmark::COUNT] = [
    "nose",
    "left_eye_inner",
    "left_eye",
    "left_eye_outer",
    "right_eye_inner",
    "right_eye",
    "right_eye_outer",
    "left_ear",
    "right_ear",
    "mouth_left",
    "mouth_right",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_pinky",
    "right_pinky",
    "left_index",
    "right_index",
    "left_thumb",
    "right_thumb",
    "left_hip",
    "right_hip",
    "left_knee",
    "right_knee",
    "left_ankle",
    "right_ankle",
    "left_heel",
    "right_heel",
    "left_foot_index",
    "right_foot_index",
];

impl BodyLandmark {
    pub const COUNT: usize = 33;

    /// All body landmarks in index order
    pub fn all() -> &'static [BodyLandmark; BodyLandmark::COUNT] {
        use BodyLandmark::*;
        &[
            Nose,
            LeftEyeInner,
            LeftEye,
            LeftEyeOuter,
            RightEyeInner,
            RightEye,
            RightEyeOuter,
            LeftEar,
            RightEar,
            MouthLeft,
            MouthRight,
            LeftShoulder,
            RightShoulder,
            LeftElbow,
            RightElbow,
            LeftWrist,
            RightWrist,
            LeftPinky,
            RightPinky,
            LeftIndex,
            RightIndex,
            LeftThumb,
            RightThumb,
            LeftHip,
            RightHip,
            LeftKnee,
            RightKnee,
            LeftAnkle,
            RightAnkle,
            LeftHeel,
            RightHeel,
            LeftFootIndex,
            RightFootIndex,
        ]
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    pub fn name(self) -> &'static str {
        BODY_NAMES[self as usize]
    }
}

/// Hand landmarks in hand-model order (21 points)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

const HAND_NAMES: [&str; HandLandmark::COUNT] = [
    "hand_wrist",
    "thumb_cmc",
    "thumb_mcp",
    "thumb_ip",
    "thumb_tip",
    "index_finger_mcp",
    "index_finger_pip",
    "index_finger_dip",
    "index_finger_tip",
    "middle_finger_mcp",
    "middle_finger_pip",
    "middle_finger_dip",
    "middle_finger_tip",
    "ring_finger_mcp",
    "ring_finger_pip",
    "ring_finger_dip",
    "ring_finger_tip",
    "pinky_mcp",
    "pinky_pip",
    "pinky_dip",
    "pinky_tip",
];

impl HandLandmark {
    pub const COUNT: usize = 21;

    /// Fingertips from thumb to pinky
    pub const FINGERTIPS: [HandLandmark; 5] = [
        HandLandmark::ThumbTip,
        HandLandmark::IndexTip,
        HandLandmark::MiddleTip,
        HandLandmark::RingTip,
        HandLandmark::PinkyTip,
    ];

    pub fn all() -> &'static [HandLandmark; HandLandmark::COUNT] {
        use HandLandmark::*;
        &[
            Wrist, ThumbCmc, ThumbMcp, ThumbIp, ThumbTip, IndexMcp, IndexPip, IndexDip, IndexTip,
            MiddleMcp, MiddlePip, MiddleDip, MiddleTip, RingMcp, RingPip, RingDip, RingTip,
            PinkyMcp, PinkyPip, PinkyDip, PinkyTip,
        ]
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    pub fn name(self) -> &'static str {
        HAND_NAMES[self as usize]
    }
}

/// Face mesh indices used by the detectors (468-point mesh)
pub struct FaceLandmark;

impl FaceLandmark {
    pub const COUNT: usize = 468;

    /// Left face contour at eye height
    pub const LEFT_FACE_EDGE: u16 = 127;
    /// Outer corner of the left eye
    pub const LEFT_EYE_OUTER: u16 = 33;
    /// Right face contour at eye height
    pub const RIGHT_FACE_EDGE: u16 = 356;
    /// Outer corner of the right eye
    pub const RIGHT_EYE_OUTER: u16 = 263;
}

/// Fixed enumerated landmark address: group plus index within the group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LandmarkId {
    group: LandmarkGroup,
    index: u16,
}

impl LandmarkId {
    pub const fn body(landmark: BodyLandmark) -> Self {
        Self {
            group: LandmarkGroup::Body,
            index: landmark as u16,
        }
    }

    pub const fn hand(side: HandSide, landmark: HandLandmark) -> Self {
        Self {
            group: side.hand_group(),
            index: landmark as u16,
        }
    }

    /// Face mesh point; `None` if the index is outside the mesh
    pub fn face(index: u16) -> Option<Self> {
        ((index as usize) < FaceLandmark::COUNT).then_some(Self {
            group: LandmarkGroup::Face,
            index,
        })
    }

    pub const fn group(&self) -> LandmarkGroup {
        self.group
    }

    pub const fn index(&self) -> usize {
        self.index as usize
    }
}

impl From<BodyLandmark> for LandmarkId {
    fn from(landmark: BodyLandmark) -> Self {
        LandmarkId::body(landmark)
    }
}

impl fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.group {
            LandmarkGroup::Body => f.write_str(BODY_NAMES[self.index()]),
            LandmarkGroup::LeftHand => write!(f, "left_{}", HAND_NAMES[self.index()]),
            LandmarkGroup::RightHand => write!(f, "right_{}", HAND_NAMES[self.index()]),
            LandmarkGroup::Face => write!(f, "face_{}", self.index),
        }
    }
}

impl FromStr for LandmarkId {
    type Err = GesturaError;

    /// Parse `"right_wrist"`, `"left_index_finger_tip"`, `"face_263"`
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let unknown = || GesturaError::UnknownLandmark(name.to_string());

        if let Some(i) = BODY_NAMES.iter().position(|n| *n == name) {
            return BodyLandmark::from_index(i)
                .map(LandmarkId::body)
                .ok_or_else(unknown);
        }

        if let Some(index) = name.strip_prefix("face_") {
            return index
                .parse::<u16>()
                .ok()
                .and_then(LandmarkId::face)
                .ok_or_else(unknown);
        }

        let (side, rest) = if let Some(rest) = name.strip_prefix("left_") {
            (HandSide::Left, rest)
        } else if let Some(rest) = name.strip_prefix("right_") {
            (HandSide::Right, rest)
        } else {
            return Err(unknown());
        };

        HAND_NAMES
            .iter()
            .position(|n| *n == rest)
            .and_then(HandLandmark::from_index)
            .map(|landmark| LandmarkId::hand(side, landmark))
            .ok_or_else(unknown)
    }
}

/// A detected landmark: position plus optional visibility confidence
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub position: Point3,
    /// Visibility in [0, 1]; hand and face models do not report it
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility.clamp(0.0, 1.0));
        self
    }

    /// Visibility, treating an unreported value as fully visible
    pub fn visibility_or_full(&self) -> f32 {
        self.visibility.unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_sizes() {
        assert_eq!(LandmarkGroup::Body.size(), 33);
        assert_eq!(LandmarkGroup::LeftHand.size(), 21);
        assert_eq!(LandmarkGroup::RightHand.size(), 21);
        assert_eq!(LandmarkGroup::Face.size(), 468);
        assert_eq!(BodyLandmark::all().len(), BodyLandmark::COUNT);
        assert_eq!(HandLandmark::all().len(), HandLandmark::COUNT);
    }

    #[test]
    fn test_enum_index_matches_table() {
        for (i, landmark) in BodyLandmark::all().iter().enumerate() {
            assert_eq!(*landmark as usize, i);
        }
        for (i, landmark) in HandLandmark::all().iter().enumerate() {
            assert_eq!(*landmark as usize, i);
        }
        assert_eq!(BodyLandmark::LeftShoulder as usize, 11);
        assert_eq!(BodyLandmark::RightWrist as usize, 16);
        assert_eq!(HandLandmark::PinkyMcp as usize, 17);
    }

    #[test]
    fn test_parse_names() {
        let wrist: LandmarkId = "right_wrist".parse().unwrap();
        assert_eq!(wrist, LandmarkId::body(BodyLandmark::RightWrist));

        let tip: LandmarkId = "left_index_finger_tip".parse().unwrap();
        assert_eq!(tip, LandmarkId::hand(HandSide::Left, HandLandmark::IndexTip));

        let thumb: LandmarkId = "right_thumb_tip".parse().unwrap();
        assert_eq!(thumb.group(), LandmarkGroup::RightHand);

        let face: LandmarkId = "face_263".parse().unwrap();
        assert_eq!(face.index(), 263);
    }

    #[test]
    fn test_display_round_trips_names() {
        for landmark in BodyLandmark::all() {
            let id = LandmarkId::body(*landmark);
            assert_eq!(id.to_string().parse::<LandmarkId>().unwrap(), id);
        }
        let id = LandmarkId::hand(HandSide::Right, HandLandmark::Wrist);
        assert_eq!(id.to_string(), "right_hand_wrist");
    }

    #[test]
    fn test_unknown_names_rejected() {
        assert!("elbow".parse::<LandmarkId>().is_err());
        assert!("left_tail".parse::<LandmarkId>().is_err());
        assert!("face_468".parse::<LandmarkId>().is_err());
        assert!(LandmarkId::face(500).is_none());
    }

    #[test]
    fn test_visibility_clamped() {
        let lm = Landmark::new(0.5, 0.5, 0.0).with_visibility(1.5);
        assert_eq!(lm.visibility, Some(1.0));
        assert_eq!(Landmark::new(0.0, 0.0, 0.0).visibility_or_full(), 1.0);
    }
}
