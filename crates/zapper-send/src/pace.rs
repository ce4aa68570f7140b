use std::thread;
use std::time::Duration;

/// Blocks between two deliveries.
pub trait Pacer {
    fn pause(&mut self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Skips pauses entirely; for rehearsals that never reach a real helper.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPause;

impl Pacer for NoPause {
    fn pause(&mut self, _duration: Duration) {}
}

impl<T: Pacer + ?Sized> Pacer for Box<T> {
    fn pause(&mut self, duration: Duration) {
        (**self).pause(duration);
    }
}
