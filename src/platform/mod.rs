//! Platform abstraction for the few host services the engine needs: pacing and randomness.

use std::time::Duration;

/// Sleep for `duration`, spinning near the deadline on desktop for accurate frame pacing.
#[cfg(not(target_os = "emscripten"))]
pub fn sleep(duration: Duration) {
    spin_sleep::sleep(duration);
}

#[cfg(target_os = "emscripten")]
pub fn sleep(duration: Duration) {
    std::thread::sleep(duration);
}

#[cfg(not(target_os = "emscripten"))]
pub fn rng() -> rand::rngs::ThreadRng {
    rand::rng()
}

#[cfg(target_os = "emscripten")]
pub fn rng() -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::from_os_rng()
}
