//! End-to-end behavior of both scenes driven through the pointer dispatcher
//! and the frame tick, as the application shell drives them.

use orb_input::{ColorValue, PointerDispatcher, PointerEvent, PointerTranslator, Viewport};
use orb_scene::{
    ActiveScene, DayNightMode, SceneCommand, SceneController, SceneMode, SceneSettings,
};
use winit::event::{ElementState, TouchPhase};

fn controller(mode: SceneMode) -> (PointerDispatcher, SceneController) {
    let dispatcher = PointerDispatcher::new(Viewport::new(800, 600));
    let controller =
        SceneController::new(SceneSettings::default(), mode, DayNightMode::Day, &dispatcher);
    (dispatcher, controller)
}

fn ball_color(controller: &SceneController) -> ColorValue {
    match controller.active() {
        ActiveScene::Ball(ball) => ball.color(),
        ActiveScene::Earth(_) => panic!("ball scene not active"),
    }
}

#[test]
fn drag_across_window_then_release() {
    let (dispatcher, controller) = controller(SceneMode::Ball);
    let mut translator = PointerTranslator::new();

    dispatcher.dispatch(translator.on_cursor_moved(400.0, 300.0));
    dispatcher.dispatch(translator.on_mouse_button(ElementState::Pressed));
    dispatcher.dispatch(translator.on_cursor_moved(800.0, 600.0));
    assert_eq!(ball_color(&controller), ColorValue::new(255, 255, 150));

    dispatcher.dispatch(translator.on_mouse_button(ElementState::Released));
    dispatcher.dispatch(translator.on_cursor_moved(0.0, 0.0));
    assert_eq!(ball_color(&controller), ColorValue::new(255, 255, 150));
}

#[test]
fn hover_without_press_keeps_initial_color() {
    let (dispatcher, controller) = controller(SceneMode::Ball);
    for (x, y) in [(10.0, 10.0), (700.0, 20.0), (400.0, 599.0)] {
        dispatcher.dispatch(PointerEvent::Move { x, y });
    }
    assert_eq!(ball_color(&controller), ColorValue::new(80, 125, 150));
}

#[test]
fn two_finger_touch_uses_first_finger() {
    let (dispatcher, controller) = controller(SceneMode::Ball);
    let mut translator = PointerTranslator::new();

    let events = [
        translator.on_touch(1, TouchPhase::Started, 200.0, 150.0),
        translator.on_touch(2, TouchPhase::Started, 800.0, 600.0),
        translator.on_touch(2, TouchPhase::Moved, 790.0, 590.0),
        translator.on_touch(1, TouchPhase::Moved, 400.0, 300.0),
    ];
    for event in events.into_iter().flatten() {
        dispatcher.dispatch(event);
    }
    assert_eq!(ball_color(&controller), ColorValue::new(128, 128, 150));
}

#[test]
fn ten_frames_of_earth_rotation() {
    let (_dispatcher, mut controller) = controller(SceneMode::Earth);
    if let ActiveScene::Earth(earth) = controller.active_mut() {
        earth.mount_body();
        earth.mount_clouds();
    }
    for _ in 0..10 {
        controller.tick(0.016);
    }
    let ActiveScene::Earth(earth) = controller.active() else {
        panic!("earth scene not active");
    };
    let body = earth.layers().body.expect("body mounted").rotation;
    let clouds = earth.layers().clouds.expect("clouds mounted").rotation;
    assert!((body.x - 0.016).abs() < 1e-9, "body.x = {}", body.x);
    assert!((body.y - 0.016).abs() < 1e-9);
    assert_eq!(body.z, 0.0);
    assert!((clouds.x - 0.0176).abs() < 1e-9, "clouds.x = {}", clouds.x);
    assert!(clouds.x > body.x && clouds.y > body.y);
    assert_eq!(clouds.z, 0.0);
}

#[test]
fn frames_before_mount_are_not_replayed() {
    let (_dispatcher, mut controller) = controller(SceneMode::Earth);
    controller.tick(5.0);
    if let ActiveScene::Earth(earth) = controller.active_mut() {
        earth.mount_body();
    }
    controller.tick(1.0);
    let ActiveScene::Earth(earth) = controller.active() else {
        panic!("earth scene not active");
    };
    assert!((earth.layers().body.expect("mounted").rotation.x - 0.1).abs() < 1e-12);
    assert!(earth.layers().clouds.is_none());
}

#[test]
fn earth_pointer_drag_does_not_recolor_anything() {
    let (dispatcher, mut controller) = controller(SceneMode::Ball);
    controller.apply(SceneCommand::ShowEarth, &dispatcher);
    dispatcher.dispatch(PointerEvent::DragStart { at: None });
    dispatcher.dispatch(PointerEvent::Move { x: 0.0, y: 0.0 });
    dispatcher.dispatch(PointerEvent::DragEnd);
    controller.apply(SceneCommand::ShowBall, &dispatcher);
    assert_eq!(ball_color(&controller), ColorValue::INITIAL);
}
