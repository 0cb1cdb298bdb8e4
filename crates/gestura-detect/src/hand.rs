//! Hand shape measurements

use gestura_core::{polygon_area_xy, HandLandmark, HandSide, LandmarkId, Point3};
use gestura_history::LandmarkHistory;

/// Fingertip / middle-joint pairs checked for an extended finger
const EXTENDED_FINGERS: [(HandLandmark, HandLandmark); 4] = [
    (HandLandmark::IndexTip, HandLandmark::IndexPip),
    (HandLandmark::MiddleTip, HandLandmark::MiddlePip),
    (HandLandmark::RingTip, HandLandmark::RingPip),
    (HandLandmark::PinkyTip, HandLandmark::PinkyPip),
];

fn hand_point(history: &LandmarkHistory, side: HandSide, landmark: HandLandmark) -> Option<Point3> {
    history.position(LandmarkId::hand(side, landmark), 0)
}

/// Area of the polygon traced by the five fingertips (thumb to pinky),
/// in raw normalized units
///
/// Small for a closed fist, large for a spread hand.
pub fn fingertip_area(history: &LandmarkHistory, side: HandSide) -> Option<f32> {
    let mut tips = [Point3::zero(); 5];
    for (slot, tip) in tips.iter_mut().zip(HandLandmark::FINGERTIPS) {
        *slot = hand_point(history, side, tip)?;
    }
    Some(polygon_area_xy(&tips))
}

/// Upright open palm: every finger extended upward and the fingertips
/// spread wider than `min_spread` of the wrist-to-middle-knuckle length
pub fn is_open_upright(history: &LandmarkHistory, side: HandSide, min_spread: f32) -> Option<bool> {
    for (tip, joint) in EXTENDED_FINGERS {
        let tip = hand_point(history, side, tip)?;
        let joint = hand_point(history, side, joint)?;
        if tip.y >= joint.y {
            return Some(false);
        }
    }

    let index_tip = hand_point(history, side, HandLandmark::IndexTip)?;
    let pinky_tip = hand_point(history, side, HandLandmark::PinkyTip)?;
    let wrist = hand_point(history, side, HandLandmark::Wrist)?;
    let middle_base = hand_point(history, side, HandLandmark::MiddleMcp)?;
    let reference = wrist.distance_xy(&middle_base);
    if reference > f32::EPSILON && index_tip.distance_xy(&pinky_tip) < min_spread * reference {
        return Some(false);
    }
    Some(true)
}
