//! Synthetic poses
//!
//! The standing pose faces the camera with shoulders 0.2 apart (subject's
//! left at the larger x) and a nose-to-mid-hip torso height of 0.5. Hand and
//! face helpers produce full-size groups with only the points the detectors
//! read placed meaningfully.

use gestura_core::{
    BodyLandmark, FaceLandmark, FrameSnapshot, FrameTime, GesturaResult, HandLandmark, HandSide,
    Landmark, LandmarkGroup, Point3,
};

/// Shoulder width of the standing pose
pub const SHOULDER_WIDTH: f32 = 0.2;

const STANDING: [(BodyLandmark, f32, f32); 33] = [
    (BodyLandmark::Nose, 0.50, 0.20),
    (BodyLandmark::LeftEyeInner, 0.52, 0.18),
    (BodyLandmark::LeftEye, 0.53, 0.18),
    (BodyLandmark::LeftEyeOuter, 0.54, 0.18),
    (BodyLandmark::RightEyeInner, 0.48, 0.18),
    (BodyLandmark::RightEye, 0.47, 0.18),
    (BodyLandmark::RightEyeOuter, 0.46, 0.18),
    (BodyLandmark::LeftEar, 0.56, 0.20),
    (BodyLandmark::RightEar, 0.44, 0.20),
    (BodyLandmark::MouthLeft, 0.52, 0.24),
    (BodyLandmark::MouthRight, 0.48, 0.24),
    (BodyLandmark::LeftShoulder, 0.60, 0.35),
    (BodyLandmark::RightShoulder, 0.40, 0.35),
    (BodyLandmark::LeftElbow, 0.63, 0.50),
    (BodyLandmark::RightElbow, 0.37, 0.50),
    (BodyLandmark::LeftWrist, 0.64, 0.65),
    (BodyLandmark::RightWrist, 0.36, 0.65),
    (BodyLandmark::LeftPinky, 0.65, 0.68),
    (BodyLandmark::RightPinky, 0.35, 0.68),
    (BodyLandmark::LeftIndex, 0.64, 0.69),
    (BodyLandmark::RightIndex, 0.36, 0.69),
    (BodyLandmark::LeftThumb, 0.63, 0.67),
    (BodyLandmark::RightThumb, 0.37, 0.67),
    (BodyLandmark::LeftHip, 0.56, 0.70),
    (BodyLandmark::RightHip, 0.44, 0.70),
    (BodyLandmark::LeftKnee, 0.56, 0.85),
    (BodyLandmark::RightKnee, 0.44, 0.85),
    (BodyLandmark::LeftAnkle, 0.56, 0.97),
    (BodyLandmark::RightAnkle, 0.44, 0.97),
    (BodyLandmark::LeftHeel, 0.57, 0.99),
    (BodyLandmark::RightHeel, 0.43, 0.99),
    (BodyLandmark::LeftFootIndex, 0.55, 0.99),
    (BodyLandmark::RightFootIndex, 0.45, 0.99),
];

/// Frame under construction
#[derive(Clone, Debug, Default)]
pub struct Pose {
    body: Option<Vec<Landmark>>,
    left_hand: Option<Vec<Landmark>>,
    right_hand: Option<Vec<Landmark>>,
    face: Option<Vec<Landmark>>,
}

impl Pose {
    /// Nothing detected
    pub fn empty() -> Self {
        Self::default()
    }

    /// Upright subject facing the camera, arms relaxed, no hands or face
    pub fn standing() -> Self {
        let mut body = vec![Landmark::default(); LandmarkGroup::Body.size()];
        for (landmark, x, y) in STANDING {
            body[landmark as usize] = Landmark::new(x, y, 0.0).with_visibility(0.99);
        }
        Pose {
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn with_body_point(mut self, landmark: BodyLandmark, position: Point3) -> Self {
        let body = self
            .body
            .get_or_insert_with(|| vec![Landmark::default(); LandmarkGroup::Body.size()]);
        body[landmark as usize].position = position;
        self
    }

    /// Move one body landmark by `delta`
    pub fn shift_body_point(self, landmark: BodyLandmark, delta: Point3) -> Self {
        let moved = self.body_point(landmark) + delta;
        self.with_body_point(landmark, moved)
    }

    pub fn with_visibility(mut self, landmark: BodyLandmark, visibility: f32) -> Self {
        if let Some(body) = self.body.as_mut() {
            body[landmark as usize].visibility = Some(visibility.clamp(0.0, 1.0));
        }
        self
    }

    pub fn with_hand(mut self, side: HandSide, hand: Vec<Landmark>) -> Self {
        match side {
            HandSide::Left => self.left_hand = Some(hand),
            HandSide::Right => self.right_hand = Some(hand),
        }
        self
    }

    pub fn with_face(mut self, face: Vec<Landmark>) -> Self {
        self.face = Some(face);
        self
    }

    /// Drop a whole landmark group, as the pose engine does on occlusion
    pub fn without(mut self, group: LandmarkGroup) -> Self {
        match group {
            LandmarkGroup::Body => self.body = None,
            LandmarkGroup::LeftHand => self.left_hand = None,
            LandmarkGroup::RightHand => self.right_hand = None,
            LandmarkGroup::Face => self.face = None,
        }
        self
    }

    /// Position of a body landmark, origin if the body is absent
    pub fn body_point(&self, landmark: BodyLandmark) -> Point3 {
        self.body
            .as_ref()
            .map(|b| b[landmark as usize].position)
            .unwrap_or_default()
    }

    pub fn snapshot(&self, captured_at: FrameTime) -> GesturaResult<FrameSnapshot> {
        let mut frame = FrameSnapshot::empty(captured_at);
        if let Some(body) = &self.body {
            frame = frame.with_body(body.clone())?;
        }
        if let Some(hand) = &self.left_hand {
            frame = frame.with_left_hand(hand.clone())?;
        }
        if let Some(hand) = &self.right_hand {
            frame = frame.with_right_hand(hand.clone())?;
        }
        if let Some(face) = &self.face {
            frame = frame.with_face(face.clone())?;
        }
        Ok(frame)
    }
}

/// Hand whose fingertips form a regular pentagon of the given raw area
///
/// A small area reads as a fist, a large one as a spread hand.
pub fn hand_with_tip_area(center: Point3, area: f32) -> Vec<Landmark> {
    // Regular pentagon: area = 5/2 * r^2 * sin(72 deg)
    let radius = (area.max(0.0) / (2.5 * 72f32.to_radians().sin())).sqrt();
    let mut hand = vec![Landmark::new(center.x, center.y + 0.04, center.z); LandmarkGroup::RightHand.size()];
    hand[HandLandmark::Wrist as usize] = Landmark::new(center.x, center.y + 0.08, center.z);
    for (i, tip) in HandLandmark::FINGERTIPS.iter().enumerate() {
        let angle = std::f32::consts::TAU * i as f32 / 5.0;
        hand[*tip as usize] = Landmark::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
            center.z,
        );
    }
    hand
}

/// Open upright palm; `tilt` lowers the index knuckle relative to the pinky
/// knuckle (negative raises it)
pub fn open_palm(center: Point3, tilt: f32) -> Vec<Landmark> {
    use HandLandmark::*;
    let mut hand = vec![Landmark::default(); LandmarkGroup::LeftHand.size()];
    let fingers = [
        ([IndexMcp, IndexPip, IndexDip, IndexTip], -0.03, tilt / 2.0),
        ([MiddleMcp, MiddlePip, MiddleDip, MiddleTip], -0.01, tilt / 6.0),
        ([RingMcp, RingPip, RingDip, RingTip], 0.01, -tilt / 6.0),
        ([PinkyMcp, PinkyPip, PinkyDip, PinkyTip], 0.03, -tilt / 2.0),
    ];
    for (joints, dx, dy) in fingers {
        let base = center.y + dy;
        for (joint, rise) in joints.iter().zip([0.0, 0.02, 0.035, 0.05]) {
            hand[*joint as usize] = Landmark::new(center.x + dx, base - rise, center.z);
        }
    }
    hand[Wrist as usize] = Landmark::new(center.x, center.y + 0.06, center.z);
    hand[ThumbCmc as usize] = Landmark::new(center.x - 0.04, center.y + 0.04, center.z);
    hand[ThumbMcp as usize] = Landmark::new(center.x - 0.05, center.y + 0.02, center.z);
    hand[ThumbIp as usize] = Landmark::new(center.x - 0.06, center.y, center.z);
    hand[ThumbTip as usize] = Landmark::new(center.x - 0.07, center.y - 0.01, center.z);
    hand
}

/// Face mesh with the edge and eye-corner points placed
///
/// `turn` widens the left edge-to-eye distance and narrows the right one;
/// `tilt` moves both eye corners down relative to the face edges.
pub fn face(turn: f32, tilt: f32) -> Vec<Landmark> {
    let mut face = vec![Landmark::new(0.5, 0.2, 0.0); FaceLandmark::COUNT];
    let base = 0.02;
    face[FaceLandmark::LEFT_FACE_EDGE as usize] = Landmark::new(0.56, 0.18, 0.0);
    face[FaceLandmark::LEFT_EYE_OUTER as usize] = Landmark::new(0.56 - (base + turn), 0.18 + tilt, 0.0);
    face[FaceLandmark::RIGHT_FACE_EDGE as usize] = Landmark::new(0.44, 0.18, 0.0);
    face[FaceLandmark::RIGHT_EYE_OUTER as usize] =
        Landmark::new(0.44 + (base - turn).max(0.001), 0.18 + tilt, 0.0);
    face
}

/// Timestamps poses at a fixed camera rate
#[derive(Clone, Debug)]
pub struct PoseStream {
    fps: f32,
    next_index: u64,
}

impl PoseStream {
    pub fn new(fps: f32) -> Self {
        Self { fps, next_index: 0 }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Capture time of the next frame
    pub fn peek_time(&self) -> FrameTime {
        FrameTime::from_frame_index(self.next_index, self.fps)
    }

    pub fn frame(&mut self, pose: &Pose) -> GesturaResult<FrameSnapshot> {
        let snapshot = pose.snapshot(self.peek_time())?;
        self.next_index += 1;
        Ok(snapshot)
    }

    /// Timestamp a whole sequence
    pub fn frames<'a>(
        &mut self,
        poses: impl IntoIterator<Item = &'a Pose>,
    ) -> GesturaResult<Vec<FrameSnapshot>> {
        poses.into_iter().map(|pose| self.frame(pose)).collect()
    }
}

impl Default for PoseStream {
    fn default() -> Self {
        Self::new(30.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standing_pose_geometry() {
        let pose = Pose::standing();
        let left = pose.body_point(BodyLandmark::LeftShoulder);
        let right = pose.body_point(BodyLandmark::RightShoulder);
        assert!((left.distance_xy(&right) - SHOULDER_WIDTH).abs() < 1e-6);
        assert!(left.x > right.x);
    }

    #[test]
    fn test_snapshot_groups() {
        let pose = Pose::standing()
            .with_hand(HandSide::Right, hand_with_tip_area(Point3::new(0.4, 0.3, 0.0), 0.002))
            .with_face(face(0.0, 0.0));
        let frame = pose.snapshot(FrameTime::ZERO).unwrap();
        assert!(frame.has_group(LandmarkGroup::Body));
        assert!(frame.has_group(LandmarkGroup::RightHand));
        assert!(!frame.has_group(LandmarkGroup::LeftHand));

        let frame = pose.without(LandmarkGroup::Body).snapshot(FrameTime::ZERO).unwrap();
        assert!(!frame.has_group(LandmarkGroup::Body));
    }

    #[test]
    fn test_stream_timestamps() {
        let mut stream = PoseStream::new(30.0);
        let pose = Pose::standing();
        let frames = stream.frames([&pose, &pose, &pose]).unwrap();
        assert_eq!(frames[0].captured_at(), FrameTime::ZERO);
        assert_eq!(frames[2].captured_at(), FrameTime::from_frame_index(2, 30.0));
    }
}
