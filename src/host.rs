//! Telegram Mini App bridge (`window.Telegram.WebApp`).
//!
//! Everything here is optional: outside Telegram, or off the browser, the
//! host is simply absent and every call is a no-op.

use crate::farm::feedback::HapticCue;
use crate::log;

#[cfg(target_arch = "wasm32")]
use js_sys::{Function, Reflect};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, JsValue};

pub struct TelegramHost {
    #[cfg(target_arch = "wasm32")]
    web_app: Option<JsValue>,
}

#[cfg(target_arch = "wasm32")]
fn prop(target: &JsValue, key: &str) -> Option<JsValue> {
    let value = Reflect::get(target, &JsValue::from_str(key)).ok()?;
    if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(value)
    }
}

#[cfg(target_arch = "wasm32")]
fn call(target: &JsValue, method: &str, arg: Option<&str>) -> Option<()> {
    let func: Function = prop(target, method)?.dyn_into().ok()?;
    let result = match arg {
        Some(a) => func.call1(target, &JsValue::from_str(a)),
        None => func.call0(target),
    };
    result.ok().map(|_| ())
}

#[cfg(target_arch = "wasm32")]
impl TelegramHost {
    /// Find the WebApp object and tell Telegram the app is ready.
    pub fn connect() -> Self {
        let web_app = web_sys::window()
            .map(JsValue::from)
            .and_then(|w| prop(&w, "Telegram"))
            .and_then(|tg| prop(&tg, "WebApp"));
        match &web_app {
            Some(app) => {
                call(app, "ready", None);
                call(app, "expand", None);
                // Swipe-down on Android would otherwise close the app mid-game.
                call(app, "enableClosingConfirmation", None);
                log::info("connected to Telegram WebApp");
            }
            None => log::info("Telegram WebApp not found, running standalone"),
        }
        Self { web_app }
    }

    pub fn is_available(&self) -> bool {
        self.web_app.is_some()
    }

    /// `initDataUnsafe.user.first_name`, if Telegram provided one.
    pub fn user_first_name(&self) -> Option<String> {
        let app = self.web_app.as_ref()?;
        let user = prop(&prop(app, "initDataUnsafe")?, "user")?;
        prop(&user, "first_name")?.as_string()
    }

    pub fn play(&self, cue: HapticCue) {
        let Some(haptics) = self.web_app.as_ref().and_then(|a| prop(a, "HapticFeedback")) else {
            return;
        };
        let done = match cue {
            HapticCue::Impact(style) => call(&haptics, "impactOccurred", Some(style.as_str())),
            HapticCue::Notification(kind) => {
                call(&haptics, "notificationOccurred", Some(kind.as_str()))
            }
            HapticCue::Selection => call(&haptics, "selectionChanged", None),
        };
        if done.is_none() {
            log::warn(&format!("haptic {cue:?} failed"));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl TelegramHost {
    pub fn connect() -> Self {
        log::info("Telegram WebApp not found, running standalone");
        Self {}
    }

    pub fn is_available(&self) -> bool {
        false
    }

    pub fn user_first_name(&self) -> Option<String> {
        None
    }

    pub fn play(&self, _cue: HapticCue) {}
}
