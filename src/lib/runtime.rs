//! Clock and timer shims so the core runs the same in the browser and under tokio.

use std::time::Duration;

/// Current time as unix seconds.
#[cfg(target_arch = "wasm32")]
pub fn now_unix_secs() -> u64 {
    (js_sys::Date::now() / 1000.0) as u64
}

/// Current time as unix seconds.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_unix_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}
