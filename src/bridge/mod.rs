//! The cross-runtime bridge: attach, resolve, invoke, marshal.
//!
//! - `runtime`: JVM lifecycle and the process-wide live flag
//! - `context`: scoped per-thread attachment and local frames
//! - `registry`: the declared foreign surface and its cache
//! - `marshal`: exception checks and value conversion (crate-internal)

pub mod context;
pub(crate) mod marshal;
pub mod registry;
pub mod runtime;

pub use context::CallContext;
pub use registry::{ClassDescriptor, ClassRegistry, ForeignClass, MethodKind, MethodSpec, Op};
pub use runtime::Runtime;
