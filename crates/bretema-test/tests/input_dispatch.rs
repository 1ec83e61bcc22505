//! Input fan-out from the window to every camera.

use bretema_input::{dispatch_input, InputEvent, InputReceiver, KeyCode, MouseButton, UserInput};
use bretema_platform::{HeadlessStep, WindowEvent};
use bretema_test::{create_test_camera, key_event, HeadlessHarness};
use glam::{Vec2, Vec3};

fn three_cameras(harness: &mut HeadlessHarness) {
    harness.app_mut().add_camera(create_test_camera("Second", Vec3::X));
    harness.app_mut().add_camera(create_test_camera("Third", Vec3::Y));
}

#[test]
fn one_event_reaches_every_camera_once() {
    let mut harness = HeadlessHarness::new("input").closing_after(3);
    three_cameras(&mut harness);
    harness.window().push_event(key_event(KeyCode::KeyW, true));
    harness.run().unwrap();

    let revision = harness.app().input().revision();
    assert_eq!(revision, 1);
    for camera in harness.app().cameras() {
        assert_eq!(camera.input_updates(), 1, "{}", camera.name());
        assert_eq!(camera.last_input_revision(), Some(revision));
        assert_eq!(camera.move_intent(), Vec3::Z);
    }
}

#[test]
fn unchanged_input_is_not_dispatched() {
    let mut harness = HeadlessHarness::new("repeat")
        .with_steps([
            HeadlessStep::Event(key_event(KeyCode::KeyA, true)),
            // Key repeat: same state.
            HeadlessStep::Event(key_event(KeyCode::KeyA, true)),
            HeadlessStep::Event(key_event(KeyCode::KeyA, false)),
        ])
        .closing_after(3);
    three_cameras(&mut harness);
    harness.run().unwrap();

    for camera in harness.app().cameras() {
        assert_eq!(camera.input_updates(), 2);
        assert_eq!(camera.last_input_revision(), Some(2));
        assert_eq!(camera.move_intent(), Vec3::ZERO);
    }
}

#[test]
fn each_event_in_a_poll_is_dispatched() {
    let mut harness = HeadlessHarness::new("batch")
        .with_steps([HeadlessStep::Batch(vec![
            HeadlessStep::Event(WindowEvent::Input(InputEvent::MouseButton {
                button: MouseButton::Right,
                pressed: true,
            })),
            HeadlessStep::Event(WindowEvent::Input(InputEvent::MouseMotion(Vec2::new(50.0, 0.0)))),
        ])])
        .closing_after(1);
    three_cameras(&mut harness);
    let yaw = harness.app().cameras()[0].yaw;
    harness.run().unwrap();

    for camera in harness.app().cameras() {
        assert_eq!(camera.input_updates(), 2);
        assert!((camera.yaw - (yaw + 50.0 * camera.look_sensitivity)).abs() < 1e-6);
    }
}

#[test]
fn movement_follows_held_keys() {
    let mut harness = HeadlessHarness::new("move")
        .with_steps([HeadlessStep::Event(key_event(KeyCode::KeyD, true))])
        .closing_after(4);
    harness.run().unwrap();

    // dt is zero on the first iteration, positive afterwards.
    let camera = &harness.app().cameras()[0];
    assert!(camera.position.x > 0.0);
    assert!((camera.position.z - 5.0).abs() < 1e-6);
}

struct Recorder<'a> {
    id: usize,
    log: &'a std::cell::RefCell<Vec<(usize, u64)>>,
}

impl InputReceiver for Recorder<'_> {
    fn on_input_change(&mut self, input: &UserInput) {
        self.log.borrow_mut().push((self.id, input.revision()));
    }
}

#[test]
fn receivers_are_called_in_order() {
    let log = std::cell::RefCell::new(Vec::new());
    let mut receivers: Vec<Recorder<'_>> = (0..3).map(|id| Recorder { id, log: &log }).collect();

    let mut input = UserInput::new();
    assert!(input.process(&InputEvent::Key {
        code: KeyCode::Space,
        pressed: true,
    }));
    dispatch_input(&mut receivers, &input);

    assert_eq!(*log.borrow(), [(0, 1), (1, 1), (2, 1)]);
}
