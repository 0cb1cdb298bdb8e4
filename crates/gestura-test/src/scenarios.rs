//! End-to-end scenarios
//!
//! Pose scripts for the reference gestures. Each runs through a full
//! session with the built-in detectors and a recording actuator.

use gestura_core::{BodyLandmark, HandSide, Point3};

use crate::{hand_with_tip_area, Pose, SHOULDER_WIDTH};

/// Fingertip area in raw units for an area in shoulder widths squared
pub fn tip_area(normalized: f32) -> f32 {
    normalized * SHOULDER_WIDTH * SHOULDER_WIDTH
}

/// Right wrist moving at a constant normalized velocity (shoulder widths
/// per second at 30 fps)
pub fn punch(frames: usize, vx: f32, vy: f32) -> Vec<Pose> {
    let step = Point3::new(vx * SHOULDER_WIDTH / 30.0, vy * SHOULDER_WIDTH / 30.0, 0.0);
    let start = Point3::new(0.30, 0.45, 0.0);
    (0..frames)
        .map(|i| {
            let wrist = start + step * i as f32;
            Pose::standing().with_body_point(BodyLandmark::RightWrist, wrist)
        })
        .collect()
}

/// Right hand with the given fingertip areas, one per frame
pub fn hand_opening(areas: &[f32]) -> Vec<Pose> {
    areas
        .iter()
        .map(|area| {
            Pose::standing().with_hand(
                HandSide::Right,
                hand_with_tip_area(Point3::new(0.40, 0.40, 0.0), tip_area(*area)),
            )
        })
        .collect()
}

/// Ankles bobbing in anti-phase; frames numbered from `first`
pub fn stepping(first: usize, frames: usize, amplitude: f32) -> Vec<Pose> {
    (first..first + frames)
        .map(|i| {
            let phase = (i as f32 * std::f32::consts::TAU / 10.0).sin() * amplitude;
            Pose::standing()
                .with_body_point(BodyLandmark::LeftAnkle, Point3::new(0.56, 0.97 - phase, 0.0))
                .with_body_point(BodyLandmark::RightAnkle, Point3::new(0.44, 0.97 + phase, 0.0))
        })
        .collect()
}

/// Closed right hand bouncing around shoulder height
pub fn mining_swing(i: usize) -> Pose {
    let y = if (i / 2) % 2 == 0 { 0.30 } else { 0.42 };
    Pose::standing()
        .with_body_point(BodyLandmark::RightWrist, Point3::new(0.36, y, 0.0))
        .with_hand(
            HandSide::Right,
            hand_with_tip_area(Point3::new(0.36, y - 0.05, 0.0), tip_area(0.02)),
        )
}

/// Left wrist placed at `offset` shoulder widths from the left shoulder
pub fn left_wrist_at(pose: Pose, offset: f32) -> Pose {
    let shoulder = pose.body_point(BodyLandmark::LeftShoulder);
    pose.with_body_point(
        BodyLandmark::LeftWrist,
        Point3::new(shoulder.x + offset * SHOULDER_WIDTH, 0.45, 0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActuatorCall, PointerScript, Scenario};
    use gestura_control::{Button, ControlMode, Key};
    use gestura_detect::{Detection, DetectorKind, HoldPhase};

    #[test]
    fn test_attack_clicks_once_per_cooldown() {
        // First trigger at frame 5, cooldown ends 9 frames (300 ms) later
        let poses = punch(14, 2.0, 0.1);
        let (mut session, result) = Scenario::new().with_poses(&poses).unwrap().run().unwrap();
        assert_eq!(result.frames_with(DetectorKind::Attack), 1);
        assert_eq!(session.actuator().count(ActuatorCall::Click(Button::Left, 1)), 1);
        session.shutdown().unwrap();

        let poses = punch(15, 2.0, 0.1);
        let (_, result) = Scenario::new().with_poses(&poses).unwrap().run().unwrap();
        assert_eq!(result.frames_with(DetectorKind::Attack), 2);
    }

    #[test]
    fn test_steep_punch_ignored() {
        let poses = punch(14, 2.0, 1.2);
        let (session, result) = Scenario::new().with_poses(&poses).unwrap().run().unwrap();
        assert_eq!(result.frames_with(DetectorKind::Attack), 0);
        assert!(session.actuator().calls().is_empty());
    }

    #[test]
    fn test_hand_opening_places() {
        let poses = hand_opening(&[0.02, 0.02, 0.06]);
        let (session, result) = Scenario::new().with_poses(&poses).unwrap().run().unwrap();

        let place = result
            .reports
            .iter()
            .find_map(|r| r.detections.get(DetectorKind::Placing).cloned());
        let Some(Detection::Place { confidence, .. }) = place else {
            panic!("no place detection");
        };
        assert!((0.3..=1.0).contains(&confidence));
        assert_eq!(session.actuator().calls(), &[ActuatorCall::Click(Button::Right, 1)]);
    }

    #[test]
    fn test_stepping_presses_and_releases_forward() {
        let mut poses = stepping(0, 40, 0.05);
        poses.extend(stepping(40, 40, 0.0));
        let (mut session, result) = Scenario::new().with_poses(&poses).unwrap().run().unwrap();

        assert!(result.frames_with(DetectorKind::Walk) > 0);
        let actuator = session.actuator();
        assert_eq!(actuator.count(ActuatorCall::PressKey(Key::Char('w'))), 1);
        assert_eq!(actuator.count(ActuatorCall::ReleaseKey(Key::Char('w'))), 1);
        assert!(actuator.violations().is_empty());
        assert!(actuator.is_idle());
        session.shutdown().unwrap();
    }

    #[test]
    fn test_menu_close_with_mining_in_menu() {
        // Pointer release enters the menu on frame 1
        let mut poses = vec![Pose::standing(), Pose::standing()];
        poses.extend((0..24).map(|i| left_wrist_at(mining_swing(i), -0.2)));
        poses.push(left_wrist_at(mining_swing(24), 0.2));

        let (mut session, result) = Scenario::new()
            .with_poses(&poses)
            .unwrap()
            .with_pointer(PointerScript::new([false, true]))
            .run()
            .unwrap();

        assert_eq!(result.reports[1].outcome.mode, ControlMode::Menu);
        assert!(result.frames_with(DetectorKind::Mining) > 0);
        assert_eq!(result.frames_with(DetectorKind::MenuClose), 1);
        assert_eq!(result.final_mode(), Some(ControlMode::Gameplay));

        let actuator = session.actuator();
        assert_eq!(actuator.count(ActuatorCall::PressKey(Key::Escape)), 1);
        assert_eq!(actuator.count(ActuatorCall::ReleaseKey(Key::Escape)), 1);
        assert!(!actuator
            .calls()
            .iter()
            .any(|c| matches!(c, ActuatorCall::PressButton(_) | ActuatorCall::ReleaseButton(_))));
        session.shutdown().unwrap();
    }

    #[test]
    fn test_tracking_loss_releases_mining_once() {
        let mut poses: Vec<Pose> = (0..20).map(mining_swing).collect();
        poses.extend(std::iter::repeat(Pose::empty()).take(3));
        let (mut session, result) = Scenario::new().with_poses(&poses).unwrap().run().unwrap();

        let stops = result
            .reports
            .iter()
            .filter(|r| {
                matches!(
                    r.detections.get(DetectorKind::Mining),
                    Some(Detection::Mining {
                        phase: HoldPhase::Stop
                    })
                )
            })
            .count();
        assert_eq!(stops, 1);

        let actuator = session.actuator();
        assert_eq!(actuator.count(ActuatorCall::PressButton(Button::Left)), 1);
        assert_eq!(actuator.count(ActuatorCall::ReleaseButton(Button::Left)), 1);
        assert_eq!(
            actuator.calls().last(),
            Some(&ActuatorCall::ReleaseButton(Button::Left))
        );

        session.shutdown().unwrap();
        assert_eq!(session.actuator().count(ActuatorCall::ReleaseButton(Button::Left)), 1);
    }
}
