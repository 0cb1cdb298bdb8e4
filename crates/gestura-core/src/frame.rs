//! Frame snapshots
//!
//! One snapshot per processed camera frame. Each landmark group is either
//! fully present or absent; a present group always has its canonical size.

use crate::{FrameTime, GesturaError, GesturaResult, Landmark, LandmarkGroup, LandmarkId, Point3};

/// Immutable record of the landmarks detected in one camera frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    captured_at: FrameTime,
    body: Option<Vec<Landmark>>,
    left_hand: Option<Vec<Landmark>>,
    right_hand: Option<Vec<Landmark>>,
    face: Option<Vec<Landmark>>,
}

impl FrameSnapshot {
    /// Frame in which nothing was detected
    pub fn empty(captured_at: FrameTime) -> Self {
        Self {
            captured_at,
            body: None,
            left_hand: None,
            right_hand: None,
            face: None,
        }
    }

    /// Attach a landmark group, rejecting groups of the wrong size
    pub fn with_group(mut self, group: LandmarkGroup, landmarks: Vec<Landmark>) -> GesturaResult<Self> {
        if landmarks.len() != group.size() {
            return Err(GesturaError::InvalidGroupSize {
                group,
                expected: group.size(),
                actual: landmarks.len(),
            });
        }
        *self.slot_mut(group) = Some(landmarks);
        Ok(self)
    }

    pub fn with_body(self, landmarks: Vec<Landmark>) -> GesturaResult<Self> {
        self.with_group(LandmarkGroup::Body, landmarks)
    }

    pub fn with_left_hand(self, landmarks: Vec<Landmark>) -> GesturaResult<Self> {
        self.with_group(LandmarkGroup::LeftHand, landmarks)
    }

    pub fn with_right_hand(self, landmarks: Vec<Landmark>) -> GesturaResult<Self> {
        self.with_group(LandmarkGroup::RightHand, landmarks)
    }

    pub fn with_face(self, landmarks: Vec<Landmark>) -> GesturaResult<Self> {
        self.with_group(LandmarkGroup::Face, landmarks)
    }

    /// Copy of this snapshot with one group marked as not detected
    pub fn without_group(mut self, group: LandmarkGroup) -> Self {
        *self.slot_mut(group) = None;
        self
    }

    /// Copy of this snapshot re-stamped with another capture time
    pub fn at(mut self, captured_at: FrameTime) -> Self {
        self.captured_at = captured_at;
        self
    }

    pub fn captured_at(&self) -> FrameTime {
        self.captured_at
    }

    /// Landmarks of a group, if the group was detected this frame
    pub fn group(&self, group: LandmarkGroup) -> Option<&[Landmark]> {
        match group {
            LandmarkGroup::Body => self.body.as_deref(),
            LandmarkGroup::LeftHand => self.left_hand.as_deref(),
            LandmarkGroup::RightHand => self.right_hand.as_deref(),
            LandmarkGroup::Face => self.face.as_deref(),
        }
    }

    pub fn has_group(&self, group: LandmarkGroup) -> bool {
        self.group(group).is_some()
    }

    /// True if no group was detected
    pub fn is_empty(&self) -> bool {
        LandmarkGroup::all().iter().all(|g| !self.has_group(*g))
    }

    pub fn landmark(&self, id: LandmarkId) -> Option<&Landmark> {
        self.group(id.group()).and_then(|lms| lms.get(id.index()))
    }

    pub fn position(&self, id: LandmarkId) -> Option<Point3> {
        self.landmark(id).map(|lm| lm.position)
    }

    fn slot_mut(&mut self, group: LandmarkGroup) -> &mut Option<Vec<Landmark>> {
        match group {
            LandmarkGroup::Body => &mut self.body,
            LandmarkGroup::LeftHand => &mut self.left_hand,
            LandmarkGroup::RightHand => &mut self.right_hand,
            LandmarkGroup::Face => &mut self.face,
        }
    }
}
