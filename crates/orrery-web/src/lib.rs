pub mod dom;
pub mod frame_loop;
pub mod hooks;
pub mod renderer;
pub mod runner;
pub mod textures;

pub use renderer::{FrameSlot, HostRenderer};
pub use runner::{resolve_config, OrreryRunner, WebOrrery};

/// Generate all `#[wasm_bindgen]` exports for an orrery page.
///
/// Generates:
/// - `thread_local!` storage for the OrreryRunner
/// - `with_runner()` helper function
/// - `orrery_start`, `orrery_stop`, `orrery_set_speed` and the two host hook setters
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// orrery_web::export_orrery!(include_str!("../assets/system.json"), "star-system");
/// ```
///
/// # Arguments
///
/// - `$manifest`: the system manifest JSON as a `&str`
/// - `$name`: A string literal used in the startup log message
#[macro_export]
macro_rules! export_orrery {
    ($manifest:expr, $name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::OrreryRunner>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&$crate::OrreryRunner) -> R) -> R {
            RUNNER.with(|cell| {
                let borrow = cell.borrow();
                let runner = borrow.as_ref().expect("Orrery not started. Call orrery_start() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn orrery_start(config_json: Option<String>) -> Result<(), JsValue> {
            console_error_panic_hook::set_once();
            let (config, config_error) = $crate::resolve_config(config_json.as_deref());
            let _ = console_log::init_with_level(config.log_level());
            if let Some(err) = config_error {
                log::error!("{}; using defaults", err);
            }

            if RUNNER.with(|cell| cell.borrow().is_some()) {
                log::warn!("{}: already started", $name);
                return Ok(());
            }

            let runner = $crate::OrreryRunner::start($manifest, config)?;
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            log::info!("{}: started", $name);
            Ok(())
        }

        #[wasm_bindgen]
        pub fn orrery_stop() {
            RUNNER.with(|cell| match cell.borrow().as_ref() {
                Some(runner) => runner.stop(),
                None => log::warn!("{}: stop before start", $name),
            });
        }

        #[wasm_bindgen]
        pub fn orrery_set_speed(name: &str, value: &str) -> bool {
            with_runner(|r| r.set_speed(name, value))
        }

        #[wasm_bindgen]
        pub fn orrery_set_draw_hook(hook: js_sys::Function) {
            $crate::hooks::set_draw_hook(hook);
        }

        #[wasm_bindgen]
        pub fn orrery_set_texture_hook(hook: js_sys::Function) {
            $crate::hooks::set_texture_hook(hook);
        }
    };
}
