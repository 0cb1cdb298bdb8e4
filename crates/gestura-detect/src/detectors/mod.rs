//! Built-in gesture detectors

pub mod attack;
pub mod crossing;
pub mod cursor;
pub mod look;
pub mod mining;
pub mod placing;
pub mod scroll;
pub mod shield;
pub mod strafe;
pub mod walk;

pub use attack::*;
pub use crossing::*;
pub use cursor::*;
pub use look::*;
pub use mining::*;
pub use placing::*;
pub use scroll::*;
pub use shield::*;
pub use strafe::*;
pub use walk::*;

#[cfg(test)]
pub(crate) mod testing {
    //! Synthetic poses for detector unit tests
    //!
    //! The standing pose faces the camera with shoulders 0.2 apart and a
    //! nose-to-mid-hip torso height of 0.5.

    use gestura_core::{
        BodyLandmark, FaceLandmark, FrameSnapshot, FrameTime, HandLandmark, HandSide, Landmark,
        LandmarkGroup, Point3,
    };
    use gestura_history::LandmarkHistory;

    pub const FPS: f32 = 30.0;
    pub const SHOULDER_WIDTH: f32 = 0.2;

    /// Mutable frame under construction
    #[derive(Clone, Debug, Default)]
    pub struct PoseFrame {
        pub body: Option<Vec<Landmark>>,
        pub left_hand: Option<Vec<Landmark>>,
        pub right_hand: Option<Vec<Landmark>>,
        pub face: Option<Vec<Landmark>>,
    }

    impl PoseFrame {
        pub fn with_body_point(mut self, landmark: BodyLandmark, position: Point3) -> Self {
            let body = self
                .body
                .get_or_insert_with(|| vec![Landmark::default(); LandmarkGroup::Body.size()]);
            body[landmark as usize].position = position;
            self
        }

        pub fn with_visibility(mut self, landmark: BodyLandmark, visibility: f32) -> Self {
            if let Some(body) = self.body.as_mut() {
                body[landmark as usize].visibility = Some(visibility);
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

        pub fn body_point(&self, landmark: BodyLandmark) -> Point3 {
            self.body
                .as_ref()
                .map(|b| b[landmark as usize].position)
                .unwrap_or_default()
        }

        pub fn into_snapshot(self, captured_at: FrameTime) -> FrameSnapshot {
            let mut frame = FrameSnapshot::empty(captured_at);
            if let Some(body) = self.body {
                frame = frame.with_body(body).unwrap();
            }
            if let Some(hand) = self.left_hand {
                frame = frame.with_left_hand(hand).unwrap();
            }
            if let Some(hand) = self.right_hand {
                frame = frame.with_right_hand(hand).unwrap();
            }
            if let Some(face) = self.face {
                frame = frame.with_face(face).unwrap();
            }
            frame
        }
    }

    /// Upright subject facing the camera, arms relaxed
    pub fn standing_frame(frame: PoseFrame) -> PoseFrame {
        use BodyLandmark::*;
        let points = [
            (Nose, 0.50, 0.20),
            (LeftEyeInner, 0.52, 0.18),
            (LeftEye, 0.53, 0.18),
            (LeftEyeOuter, 0.54, 0.18),
            (RightEyeInner, 0.48, 0.18),
            (RightEye, 0.47, 0.18),
            (RightEyeOuter, 0.46, 0.18),
            (LeftEar, 0.56, 0.20),
            (RightEar, 0.44, 0.20),
            (MouthLeft, 0.52, 0.24),
            (MouthRight, 0.48, 0.24),
            (LeftShoulder, 0.60, 0.35),
            (RightShoulder, 0.40, 0.35),
            (LeftElbow, 0.63, 0.50),
            (RightElbow, 0.37, 0.50),
            (LeftWrist, 0.64, 0.65),
            (RightWrist, 0.36, 0.65),
            (LeftPinky, 0.65, 0.68),
            (RightPinky, 0.35, 0.68),
            (LeftIndex, 0.64, 0.69),
            (RightIndex, 0.36, 0.69),
            (LeftThumb, 0.63, 0.67),
            (RightThumb, 0.37, 0.67),
            (LeftHip, 0.56, 0.70),
            (RightHip, 0.44, 0.70),
            (LeftKnee, 0.56, 0.85),
            (RightKnee, 0.44, 0.85),
            (LeftAnkle, 0.56, 0.97),
            (RightAnkle, 0.44, 0.97),
            (LeftHeel, 0.57, 0.99),
            (RightHeel, 0.43, 0.99),
            (LeftFootIndex, 0.55, 0.99),
            (RightFootIndex, 0.45, 0.99),
        ];
        let mut body = vec![Landmark::default(); LandmarkGroup::Body.size()];
        for (landmark, x, y) in points {
            body[landmark as usize] = Landmark::new(x, y, 0.0).with_visibility(0.99);
        }
        PoseFrame {
            body: Some(body),
            ..frame
        }
    }

    /// Hand whose five fingertips form a regular pentagon of the given raw
    /// area around `center`; fingers point up
    pub fn hand_with_tip_area(center: Point3, area: f32) -> Vec<Landmark> {
        // Regular pentagon: area = 5/2 * r^2 * sin(72 deg)
        let radius = (area / (2.5 * 72f32.to_radians().sin())).sqrt();
        let mut hand = vec![Landmark::default(); LandmarkGroup::RightHand.size()];
        for landmark in HandLandmark::all() {
            hand[*landmark as usize] = Landmark::new(center.x, center.y + 0.04, center.z);
        }
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

    /// Open upright hand with the index knuckle `tilt` below the pinky knuckle
    pub fn open_hand(center: Point3, tilt: f32) -> Vec<Landmark> {
        use HandLandmark::*;
        let mut hand = vec![Landmark::default(); LandmarkGroup::LeftHand.size()];
        let column = |x: f32, base: f32| [base, base - 0.02, base - 0.035, base - 0.05].map(|y| (x, y));
        let fingers = [
            ([IndexMcp, IndexPip, IndexDip, IndexTip], -0.03, tilt / 2.0),
            ([MiddleMcp, MiddlePip, MiddleDip, MiddleTip], -0.01, tilt / 6.0),
            ([RingMcp, RingPip, RingDip, RingTip], 0.01, -tilt / 6.0),
            ([PinkyMcp, PinkyPip, PinkyDip, PinkyTip], 0.03, -tilt / 2.0),
        ];
        for (joints, dx, dy) in fingers {
            for (joint, (x, y)) in joints.iter().zip(column(center.x + dx, center.y + dy)) {
                hand[*joint as usize] = Landmark::new(x, y, center.z);
            }
        }
        hand[Wrist as usize] = Landmark::new(center.x, center.y + 0.06, center.z);
        hand[ThumbCmc as usize] = Landmark::new(center.x - 0.04, center.y + 0.04, center.z);
        hand[ThumbMcp as usize] = Landmark::new(center.x - 0.05, center.y + 0.02, center.z);
        hand[ThumbIp as usize] = Landmark::new(center.x - 0.06, center.y, center.z);
        hand[ThumbTip as usize] = Landmark::new(center.x - 0.07, center.y - 0.01, center.z);
        hand
    }

    /// Face mesh with the four points used by the detectors
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

    /// Appends frames at 30 fps
    pub struct HistoryBuilder {
        history: LandmarkHistory,
        next_index: u64,
        last: PoseFrame,
    }

    impl HistoryBuilder {
        pub fn new() -> Self {
            Self {
                history: LandmarkHistory::new(),
                next_index: 0,
                last: PoseFrame::default(),
            }
        }

        /// Append a frame built from an empty one
        pub fn push(&mut self, build: impl FnOnce(PoseFrame) -> PoseFrame) -> &LandmarkHistory {
            let frame = build(PoseFrame::default());
            self.append(frame)
        }

        /// Append a copy of the previous frame, modified by `edit`
        pub fn push_edit(&mut self, edit: impl FnOnce(PoseFrame) -> PoseFrame) -> &LandmarkHistory {
            let frame = edit(self.last.clone());
            self.append(frame)
        }

        /// Append a copy of the previous frame with one body landmark moved
        pub fn extend_linear(&mut self, landmark: BodyLandmark, step: Point3) -> &LandmarkHistory {
            self.push_edit(|frame| {
                let moved = frame.body_point(landmark) + step;
                frame.with_body_point(landmark, moved)
            })
        }

        pub fn history(&self) -> &LandmarkHistory {
            &self.history
        }

        pub fn now(&self) -> FrameTime {
            self.history.now().unwrap_or(FrameTime::ZERO)
        }

        fn append(&mut self, frame: PoseFrame) -> &LandmarkHistory {
            let captured_at = FrameTime::from_frame_index(self.next_index, FPS);
            self.next_index += 1;
            self.last = frame.clone();
            self.history.append(frame.into_snapshot(captured_at));
            &self.history
        }
    }
}
