//! Keyboard bindings.

use orb_scene::{DayNightMode, SceneCommand};
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Scene(SceneCommand),
    Quit,
}

/// `B` ball, `E` Earth, `D` day, `N` night, `Escape` quit.
#[must_use]
pub fn action_for_key(code: KeyCode) -> Option<AppAction> {
    let action = match code {
        KeyCode::KeyB => AppAction::Scene(SceneCommand::ShowBall),
        KeyCode::KeyE => AppAction::Scene(SceneCommand::ShowEarth),
        KeyCode::KeyD => AppAction::Scene(SceneCommand::SetDayNight(DayNightMode::Day)),
        KeyCode::KeyN => AppAction::Scene(SceneCommand::SetDayNight(DayNightMode::Night)),
        KeyCode::Escape => AppAction::Quit,
        _ => return None,
    };
    Some(action)
}
