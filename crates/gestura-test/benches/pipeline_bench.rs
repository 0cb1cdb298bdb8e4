//! Benchmarks for Gestura pipeline operations

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use gestura_control::{ActionCoordinator, ControlConfig};
use gestura_core::{HandSide, Point3};
use gestura_detect::{Detection, DetectorConfig, DetectorRegistry, FrameDetections, HoldPhase};
use gestura_history::LandmarkHistory;
use gestura_test::{hand_with_tip_area, stepping, tip_area, Pose, PoseStream, RecordingActuator, Scenario};

fn bench_history_append(c: &mut Criterion) {
    let mut history = LandmarkHistory::new();
    let mut stream = PoseStream::default();
    let pose = Pose::standing();

    c.bench_function("history_append", |b| {
        b.iter_batched(
            || stream.frame(&pose).unwrap(),
            |frame| history.append(black_box(frame)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_detect_all(c: &mut Criterion) {
    let mut history = LandmarkHistory::new();
    let mut stream = PoseStream::default();
    let mut registry = DetectorRegistry::from_config(&DetectorConfig::default());
    for pose in stepping(0, 60, 0.05) {
        let pose = pose.with_hand(
            HandSide::Right,
            hand_with_tip_area(Point3::new(0.40, 0.40, 0.0), tip_area(0.02)),
        );
        history.append(stream.frame(&pose).unwrap());
    }

    c.bench_function("registry_detect_all", |b| {
        b.iter(|| black_box(registry.detect_all(black_box(&history))))
    });
}

fn bench_coordinator_execute(c: &mut Criterion) {
    let mut coordinator = ActionCoordinator::new(ControlConfig::default(), RecordingActuator::new());
    let frames = [
        FrameDetections::new().with(Detection::Mining { phase: HoldPhase::Start }),
        FrameDetections::new().with(Detection::Walk {
            walking: true,
            backward: false,
            score: 0.5,
        }),
        FrameDetections::new().with(Detection::Mining { phase: HoldPhase::Stop }),
        FrameDetections::new(),
    ];

    c.bench_function("coordinator_execute", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = i.wrapping_add(1);
            let outcome = coordinator.execute(black_box(&frames[i % frames.len()]), false);
            coordinator.actuator_mut().clear_calls();
            black_box(outcome)
        })
    });
}

fn bench_session_walk(c: &mut Criterion) {
    let mut poses = stepping(0, 60, 0.05);
    poses.extend(stepping(60, 30, 0.0));

    c.bench_function("session_walk_90_frames", |b| {
        b.iter_batched(
            || Scenario::new().with_poses(&poses).unwrap(),
            |scenario| black_box(scenario.run().unwrap().1.reports.len()),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_history_append,
    bench_detect_all,
    bench_coordinator_execute,
    bench_session_walk,
);
criterion_main!(benches);
