use super::EvmRunner;
use std::ops::{Deref, DerefMut};

/// Scoped suspension of gas metering.
///
/// Metering is stopped on construction and restarted when the guard is dropped,
/// so every exit path (including `?` propagation) leaves the runner metering again.
#[derive(Debug)]
pub struct MeteringPause<'a, R: EvmRunner + ?Sized> {
    runner: &'a mut R,
}

impl<'a, R: EvmRunner + ?Sized> MeteringPause<'a, R> {
    pub fn new(runner: &'a mut R) -> Self {
        runner.stop_gas_metering();
        Self { runner }
    }
}

impl<R: EvmRunner + ?Sized> Deref for MeteringPause<'_, R> {
    type Target = R;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.runner
    }
}

impl<R: EvmRunner + ?Sized> DerefMut for MeteringPause<'_, R> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.runner
    }
}

impl<R: EvmRunner + ?Sized> Drop for MeteringPause<'_, R> {
    fn drop(&mut self) {
        self.runner.start_gas_metering();
    }
}
