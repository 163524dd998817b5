use jni::{AttachGuard, JNIEnv};

use crate::error::Result;

use super::runtime::Runtime;
use super::registry::ClassRegistry;

/// Local references one adapter call may hold before the frame grows.
const LOCAL_FRAME_CAPACITY: i32 = 32;

/// A scoped, per-thread attachment to the embedded runtime.
///
/// If the thread was not attached when the context was acquired it is
/// detached again when the context drops; acquiring on an already attached
/// thread attaches nothing and detaches nothing.
pub struct CallContext<'rt> {
    runtime: &'rt Runtime,
    guard: AttachGuard<'rt>,
}

impl<'rt> CallContext<'rt> {
    pub(crate) fn new(runtime: &'rt Runtime, guard: AttachGuard<'rt>) -> Self {
        Self { runtime, guard }
    }

    #[must_use]
    pub fn runtime(&self) -> &'rt Runtime {
        self.runtime
    }

    #[must_use]
    pub fn registry(&self) -> &'rt ClassRegistry {
        self.runtime.registry()
    }

    /// The raw environment, for calls outside a local frame.
    pub fn env(&mut self) -> &mut JNIEnv<'rt> {
        &mut self.guard
    }

    /// Run `f` inside a local-reference frame.
    ///
    /// Every local reference created by `f` is released when it returns,
    /// whether it succeeded or failed. A panic in `f` leaves the frame on
    /// the thread's stack.
    pub fn with_frame<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut JNIEnv) -> Result<T>,
    {
        self.guard.with_local_frame(LOCAL_FRAME_CAPACITY, f)
    }
}
