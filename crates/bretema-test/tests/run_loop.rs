//! Run-loop behavior of a headless app.

use std::time::Duration;

use bretema_app::{AppConfig, AppError};
use bretema_platform::{HeadlessStep, WindowEvent};
use bretema_render::{Lifecycle, RenderError, Renderer, IN_FLIGHT};
use bretema_test::{create_test_camera, HeadlessHarness};
use glam::{UVec2, Vec3};

#[test]
fn close_mid_iteration_finishes_that_iteration_only() {
    let mut harness = HeadlessHarness::new("close").closing_after(3);
    harness.run().unwrap();

    assert!(harness.app().is_marked_to_close());
    assert_eq!(harness.iterations(), 3);
    assert_eq!(harness.frame_number().unwrap(), 3);

    let renderer = harness.renderer().unwrap();
    assert_eq!(renderer.state().lifecycle(), Lifecycle::CleanedUp);
    assert_eq!(renderer.frame_stats().outstanding(), 0);
    assert_eq!(harness.window_refs(), 1);
}

#[test]
fn cleanup_after_loop_is_a_no_op() {
    let mut harness = HeadlessHarness::new("cleanup").closing_after(2);
    harness.run().unwrap();
    let stats = harness.renderer().unwrap().frame_stats();

    harness.app_mut().cleanup();
    harness.app_mut().cleanup();

    assert!(harness.app().is_cleaned_up());
    assert_eq!(harness.renderer().unwrap().frame_stats(), stats);
    assert_eq!(harness.draws().unwrap().len(), 2);
}

#[test]
fn close_requested_before_first_iteration() {
    let mut harness = HeadlessHarness::new("early");
    harness.window().request_close();
    harness.run().unwrap();

    // The flag is only checked at the end of an iteration.
    assert_eq!(harness.iterations(), 1);
    assert_eq!(harness.frame_number().unwrap(), 1);
}

#[test]
fn survives_repeated_resizes() {
    let sizes = [
        UVec2::new(640, 480),
        UVec2::new(800, 600),
        UVec2::new(100, 50),
        UVec2::new(1920, 1080),
        UVec2::new(333, 777),
    ];
    let mut harness = HeadlessHarness::new("resize")
        .with_steps(sizes.iter().flat_map(|&size| [HeadlessStep::Resize(size), HeadlessStep::Idle]))
        .closing_after(12);
    harness.run().unwrap();

    let renderer = harness.renderer().unwrap();
    assert_eq!(renderer.viewport(), sizes[4]);
    assert_eq!(renderer.rebuilds(), 5);
    assert_eq!(renderer.frame_number(), harness.iterations());
    assert_eq!(renderer.frame_number(), 12);

    let last = harness.draws().unwrap().last().unwrap().clone();
    assert_eq!(last.viewport, sizes[4]);
    let camera = &harness.app().cameras()[0];
    assert!((camera.aspect - 333.0 / 777.0).abs() < 1e-6);
}

#[test]
fn minimized_window_still_counts_frames() {
    let mut harness = HeadlessHarness::new("minimize")
        .with_steps([
            HeadlessStep::Idle,
            HeadlessStep::Resize(UVec2::ZERO),
            HeadlessStep::Idle,
            HeadlessStep::Resize(UVec2::new(200, 100)),
        ])
        .closing_after(4);
    harness.run().unwrap();

    let renderer = harness.renderer().unwrap();
    assert_eq!(renderer.frame_number(), 4);
    assert_eq!(renderer.skipped_frames(), 2);
    let frames: Vec<u64> = renderer.draws().iter().map(|draw| draw.frame).collect();
    assert_eq!(frames, [0, 3]);
}

#[test]
fn in_flight_frames_are_bounded() {
    let config = AppConfig::new("bounded")
        .with_size(64, 64)
        .with_headless_latency(Duration::from_millis(2));
    let mut harness = HeadlessHarness::with_config("bounded", config).closing_after(4);
    for (i, z) in [1.0, 2.0].into_iter().enumerate() {
        harness
            .app_mut()
            .add_camera(create_test_camera(&format!("Extra{i}"), Vec3::new(0.0, 0.0, z)));
    }
    harness.run().unwrap();

    let draws = harness.draws().unwrap();
    assert_eq!(draws.len(), 12);
    for draw in draws {
        assert!(draw.outstanding <= IN_FLIGHT);
        if draw.frame >= IN_FLIGHT as u64 {
            assert!(draw.completed_at_submit >= draw.frame - IN_FLIGHT as u64 + 1);
        }
    }
}

#[test]
fn cameras_draw_in_registration_order() {
    let mut harness = HeadlessHarness::new("order").closing_after(2);
    harness.app_mut().add_camera(create_test_camera("Left", Vec3::NEG_X));
    harness.app_mut().add_camera(create_test_camera("Right", Vec3::X));
    harness.run().unwrap();

    let names: Vec<&str> = harness
        .draws()
        .unwrap()
        .iter()
        .map(|draw| draw.camera.as_str())
        .collect();
    assert_eq!(names, ["Main", "Left", "Right", "Main", "Left", "Right"]);
    assert_eq!(harness.frame_number().unwrap(), 6);
}

#[test]
fn reset_allows_another_run() {
    let mut harness = HeadlessHarness::new("reset").closing_after(2);
    harness.app_mut().add_camera(create_test_camera("Second", Vec3::ZERO));
    harness.run().unwrap();

    harness.app_mut().reset();
    assert!(harness.renderer().is_err());
    assert_eq!(harness.app().cameras().len(), 2);

    harness.window().push_step(HeadlessStep::Event(WindowEvent::CloseRequested));
    harness.run().unwrap();
    // A fresh renderer counts from zero.
    assert_eq!(harness.frame_number().unwrap(), 2);
}

#[test]
fn renderer_failure_ends_loop_and_cleans_up() {
    let config = AppConfig::new("lost")
        .with_size(64, 64)
        .with_headless_latency(Duration::ZERO)
        .with_headless_device_loss(2);
    let mut harness = HeadlessHarness::with_config("lost", config).closing_after(100);

    let result = harness.run();
    assert!(matches!(
        result,
        Err(bretema_test::TestError::App(AppError::Render(RenderError::DeviceLost)))
    ));
    assert!(harness.iterations() < 100);
    assert!(harness.app().is_cleaned_up());
    assert!(!harness.app().is_marked_to_close());

    let renderer = harness.renderer().unwrap();
    assert_eq!(renderer.state().lifecycle(), Lifecycle::CleanedUp);
    assert_eq!(renderer.frame_stats().outstanding(), 0);
    assert_eq!(harness.window_refs(), 1);

    // A second cleanup changes nothing.
    let frames = renderer.frame_number();
    harness.app_mut().cleanup();
    assert_eq!(harness.frame_number().unwrap(), frames);
}
