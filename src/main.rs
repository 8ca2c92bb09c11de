#[cfg(target_arch = "wasm32")]
use leptos::prelude::mount_to_body;
#[cfg(target_arch = "wasm32")]
use student_marks::{app::App, app_lib::telemetry};

#[cfg(target_arch = "wasm32")]
pub fn main() {
    telemetry::init_browser();
    mount_to_body(App);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
