//! OS adapters: screen capture, text injection and the global key hook.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use base64::Engine;
use predictor::Predictor;
use shared::collaborators::{ScreenCapture, TextInjector};
use shared::keys::KeyEvent;
use std::io::Cursor;
use std::thread;

/// Primary monitor as a base64 PNG.
pub struct XcapCapture;

impl XcapCapture {
    fn capture_png() -> Result<Vec<u8>> {
        let monitors = xcap::Monitor::all().map_err(|e| anyhow!("monitor error: {}", e))?;
        let primary = primary_or_first(monitors, |m| m.is_primary().unwrap_or(false))
            .ok_or_else(|| anyhow!("No monitor found"))?;

        let image = primary
            .capture_image()
            .map_err(|e| anyhow!("capture error: {}", e))?;

        let mut buf = Cursor::new(Vec::new());
        image
            .write_to(&mut buf, image::ImageFormat::Png)
            .context("PNG encode failed")?;
        Ok(buf.into_inner())
    }
}

/// The primary entry, else the first one.
fn primary_or_first<T>(items: Vec<T>, is_primary: impl Fn(&T) -> bool) -> Option<T> {
    let index = items.iter().position(is_primary).unwrap_or(0);
    items.into_iter().nth(index)
}

#[async_trait]
impl ScreenCapture for XcapCapture {
    async fn capture(&self) -> Result<String> {
        let png = tokio::task::spawn_blocking(Self::capture_png)
            .await
            .context("capture task panicked")??;
        Ok(base64::engine::general_purpose::STANDARD.encode(png))
    }
}

/// Types text through the OS input queue.
pub struct EnigoInjector;

impl TextInjector for EnigoInjector {
    fn type_text(&self, text: &str) -> Result<()> {
        use enigo::{Enigo, Keyboard, Settings};
        let mut enigo =
            Enigo::new(&Settings::default()).map_err(|e| anyhow!("input backend unavailable: {}", e))?;
        enigo
            .text(text)
            .map_err(|e| anyhow!("typing failed: {}", e))
    }
}

/// Name a key the way the global hook reports it ("A", "SPACE", "LEFT ALT").
pub fn key_name(key: rdev::Key) -> String {
    use rdev::Key::*;
    let name = match key {
        Alt => "LEFT ALT",
        AltGr => "RIGHT ALT",
        ControlLeft => "LEFT CTRL",
        ControlRight => "RIGHT CTRL",
        ShiftLeft => "LEFT SHIFT",
        ShiftRight => "RIGHT SHIFT",
        MetaLeft => "LEFT META",
        MetaRight => "RIGHT META",
        Space => "SPACE",
        Return | KpReturn => "RETURN",
        Backspace => "BACKSPACE",
        Tab => "TAB",
        Escape => "ESCAPE",
        Delete | KpDelete => "DELETE",
        Insert => "INS",
        Home => "HOME",
        End => "END",
        PageUp => "PAGE UP",
        PageDown => "PAGE DOWN",
        UpArrow => "UP ARROW",
        DownArrow => "DOWN ARROW",
        LeftArrow => "LEFT ARROW",
        RightArrow => "RIGHT ARROW",
        CapsLock => "CAPS LOCK",
        NumLock => "NUM LOCK",
        ScrollLock => "SCROLL LOCK",
        PrintScreen => "PRINT SCREEN",
        Pause => "PAUSE",
        Function => "FN",
        BackQuote => "SECTION",
        Minus | KpMinus => "MINUS",
        Equal => "EQUALS",
        LeftBracket => "SQUARE BRACKET OPEN",
        RightBracket => "SQUARE BRACKET CLOSE",
        SemiColon => "SEMICOLON",
        Quote => "QUOTE",
        BackSlash | IntlBackslash => "BACKSLASH",
        Comma => "COMMA",
        Dot => "DOT",
        Slash | KpDivide => "FORWARD SLASH",
        KpPlus => "NUMPAD PLUS",
        KpMultiply => "NUMPAD MULTIPLY",
        Unknown(code) => return format!("KEY {}", code),
        other => {
            // KeyA -> A, Num1 -> 1, Kp1 -> NUMPAD 1, F5 -> F5
            let debug = format!("{:?}", other);
            return if let Some(rest) = debug.strip_prefix("Key") {
                rest.to_string()
            } else if let Some(rest) = debug.strip_prefix("Num") {
                rest.to_string()
            } else if let Some(rest) = debug.strip_prefix("Kp") {
                format!("NUMPAD {}", rest)
            } else {
                debug.to_ascii_uppercase()
            };
        }
    };
    name.to_string()
}

pub fn button_name(button: rdev::Button) -> String {
    match button {
        rdev::Button::Left => "MOUSE LEFT".to_string(),
        rdev::Button::Right => "MOUSE RIGHT".to_string(),
        rdev::Button::Middle => "MOUSE MIDDLE".to_string(),
        rdev::Button::Unknown(n) => format!("MOUSE {}", n),
    }
}

/// Translate a raw hook event; motion and wheel events have no counterpart.
pub fn translate(event: &rdev::EventType) -> Option<KeyEvent> {
    use rdev::EventType::*;
    match event {
        KeyPress(key) => Some(KeyEvent::down(key_name(*key))),
        KeyRelease(key) => Some(KeyEvent::up(key_name(*key))),
        ButtonPress(button) => Some(KeyEvent::down(button_name(*button))),
        ButtonRelease(button) => Some(KeyEvent::up(button_name(*button))),
        MouseMove { .. } | Wheel { .. } => None,
    }
}

/// Listen to global input on a dedicated thread for the life of the process.
pub fn spawn_key_hook(predictor: Predictor) -> Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("key-hook".into())
        .spawn(move || {
            let result = rdev::listen(move |event| {
                if let Some(key) = translate(&event.event_type) {
                    predictor.handle_key(key);
                }
            });
            if let Err(e) = result {
                tracing::error!(error = ?e, "global key hook stopped");
            }
        })
        .context("failed to start key hook thread")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdev::{Button, EventType, Key};

    #[test]
    fn test_primary_monitor_preferred_then_first() {
        let monitors = vec![("left", false), ("main", true), ("right", false)];
        assert_eq!(primary_or_first(monitors, |m| m.1), Some(("main", true)));

        let monitors = vec![("left", false), ("right", false)];
        assert_eq!(primary_or_first(monitors, |m| m.1), Some(("left", false)));

        let none: Vec<(&str, bool)> = Vec::new();
        assert_eq!(primary_or_first(none, |m| m.1), None);
    }

    #[test]
    fn test_modifier_names_match_hook_scheme() {
        assert_eq!(key_name(Key::Alt), "LEFT ALT");
        assert_eq!(key_name(Key::ControlRight), "RIGHT CTRL");
        assert_eq!(key_name(Key::MetaLeft), "LEFT META");

        let alt = KeyEvent::down(key_name(Key::AltGr));
        assert!(alt.is_alt());
        assert!(!alt.is_content());
        assert!(KeyEvent::down(key_name(Key::ShiftLeft)).is_modifier());
    }

    #[test]
    fn test_content_key_names() {
        assert_eq!(key_name(Key::KeyA), "A");
        assert_eq!(key_name(Key::Num7), "7");
        assert_eq!(key_name(Key::Kp3), "NUMPAD 3");
        assert_eq!(key_name(Key::F5), "F5");
        assert_eq!(key_name(Key::Space), "SPACE");
        assert_eq!(key_name(Key::Unknown(42)), "KEY 42");
        assert!(KeyEvent::down(key_name(Key::Return)).is_content());
    }

    #[test]
    fn test_translate_events() {
        assert_eq!(
            translate(&EventType::KeyPress(Key::KeyH)),
            Some(KeyEvent::down("H"))
        );
        assert_eq!(
            translate(&EventType::KeyRelease(Key::KeyH)),
            Some(KeyEvent::up("H"))
        );

        let click = translate(&EventType::ButtonPress(Button::Left)).unwrap();
        assert_eq!(click.name, "MOUSE LEFT");
        assert!(click.is_pointer());

        assert_eq!(translate(&EventType::MouseMove { x: 1.0, y: 2.0 }), None);
        assert_eq!(translate(&EventType::Wheel { delta_x: 0, delta_y: 1 }), None);
    }
}
