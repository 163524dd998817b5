//! Declared foreign surface and its resolution cache.
//!
//! Every method the adapters call is listed in a static table of
//! `{logical operation, name, signature, kind}`. The registry resolves a
//! whole table at once, so a mismatched archive fails when the runtime
//! starts rather than at the first incidental call.
//!
//! ## Threading
//!
//! Each class is resolved at most once. Concurrent first use blocks on the
//! cell until the winner finishes; afterwards reads take no lock.

use jni::objects::{GlobalRef, JClass, JMethodID, JStaticMethodID, JString};
use jni::signature::{Primitive, ReturnType};
use jni::JNIEnv;
use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;

use crate::error::{LudiiError, ResolutionError, Result};

use super::marshal;

/// Logical operations on the foreign surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    EngineVersion,
    Construct,
    ConstructWithOptions,
    NumPlayers,
    NumDistinctActions,
    StateTensorsShape,
    MaxGameLength,
    NewState,
    CopyState,
    Reset,
    CurrentPlayer,
    IsTerminal,
    Returns,
    LegalActions,
    ApplyAction,
    UndoLastMove,
    ActionToString,
    ToTensor,
    Render,
}

impl Op {
    /// Stable name used in logs and errors.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Op::EngineVersion => "ludiiVersion",
            Op::Construct | Op::ConstructWithOptions => "construct",
            Op::NumPlayers => "numPlayers",
            Op::NumDistinctActions => "numDistinctActions",
            Op::StateTensorsShape => "stateTensorsShape",
            Op::MaxGameLength => "maxGameLength",
            Op::NewState | Op::CopyState => "<init>",
            Op::Reset => "reset",
            Op::CurrentPlayer => "currentPlayer",
            Op::IsTerminal => "isTerminal",
            Op::Returns => "returns",
            Op::LegalActions => "legalActions",
            Op::ApplyAction => "applyAction",
            Op::UndoLastMove => "undoLastMove",
            Op::ActionToString => "actionToString",
            Op::ToTensor => "toTensor",
            Op::Render => "toString",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodKind {
    Instance,
    Static,
    Constructor,
}

/// Return category, used to pick the JNI call variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ret {
    Void,
    Boolean,
    Int,
    Object,
}

impl Ret {
    fn return_type(self) -> ReturnType {
        match self {
            Ret::Void => ReturnType::Primitive(Primitive::Void),
            Ret::Boolean => ReturnType::Primitive(Primitive::Boolean),
            Ret::Int => ReturnType::Primitive(Primitive::Int),
            Ret::Object => ReturnType::Object,
        }
    }
}

/// One row of the declared surface.
#[derive(Clone, Copy, Debug)]
pub struct MethodSpec {
    pub op: Op,
    pub name: &'static str,
    pub signature: &'static str,
    pub kind: MethodKind,
    pub ret: Ret,
}

const fn spec(op: Op, name: &'static str, signature: &'static str, kind: MethodKind, ret: Ret) -> MethodSpec {
    MethodSpec {
        op,
        name,
        signature,
        kind,
        ret,
    }
}

pub const GAME_CLASS: &str = "utils/LudiiGameWrapper";
pub const STATE_CLASS: &str = "utils/LudiiStateWrapper";

const GAME_METHODS: &[MethodSpec] = &[
    spec(Op::EngineVersion, "ludiiVersion", "()Ljava/lang/String;", MethodKind::Static, Ret::Object),
    spec(Op::Construct, "construct", "(Ljava/lang/String;)Lutils/LudiiGameWrapper;", MethodKind::Static, Ret::Object),
    spec(
        Op::ConstructWithOptions,
        "construct",
        "(Ljava/lang/String;[Ljava/lang/String;)Lutils/LudiiGameWrapper;",
        MethodKind::Static,
        Ret::Object,
    ),
    spec(Op::NumPlayers, "numPlayers", "()I", MethodKind::Instance, Ret::Int),
    spec(Op::NumDistinctActions, "numDistinctActions", "()I", MethodKind::Instance, Ret::Int),
    spec(Op::StateTensorsShape, "stateTensorsShape", "()[I", MethodKind::Instance, Ret::Object),
    spec(Op::MaxGameLength, "maxGameLength", "()I", MethodKind::Instance, Ret::Int),
];

const STATE_METHODS: &[MethodSpec] = &[
    spec(Op::NewState, "<init>", "(Lutils/LudiiGameWrapper;)V", MethodKind::Constructor, Ret::Void),
    spec(Op::CopyState, "<init>", "(Lutils/LudiiStateWrapper;)V", MethodKind::Constructor, Ret::Void),
    spec(Op::Reset, "reset", "()V", MethodKind::Instance, Ret::Void),
    spec(Op::CurrentPlayer, "currentPlayer", "()I", MethodKind::Instance, Ret::Int),
    spec(Op::IsTerminal, "isTerminal", "()Z", MethodKind::Instance, Ret::Boolean),
    spec(Op::Returns, "returns", "()[D", MethodKind::Instance, Ret::Object),
    spec(Op::LegalActions, "legalActions", "()[I", MethodKind::Instance, Ret::Object),
    spec(Op::ApplyAction, "applyAction", "(I)V", MethodKind::Instance, Ret::Void),
    spec(Op::UndoLastMove, "undoLastMove", "()V", MethodKind::Instance, Ret::Void),
    spec(Op::ActionToString, "actionToString", "(II)Ljava/lang/String;", MethodKind::Instance, Ret::Object),
    spec(Op::ToTensor, "toTensor", "()[[[F", MethodKind::Instance, Ret::Object),
    spec(Op::Render, "toString", "()Ljava/lang/String;", MethodKind::Instance, Ret::Object),
];

/// The foreign classes the adapters talk to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ForeignClass {
    Game,
    State,
}

impl ForeignClass {
    pub const ALL: [ForeignClass; 2] = [ForeignClass::Game, ForeignClass::State];

    /// JNI binary name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ForeignClass::Game => GAME_CLASS,
            ForeignClass::State => STATE_CLASS,
        }
    }

    #[must_use]
    pub fn methods(self) -> &'static [MethodSpec] {
        match self {
            ForeignClass::Game => GAME_METHODS,
            ForeignClass::State => STATE_METHODS,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum MethodHandle {
    Instance(JMethodID),
    Static(JStaticMethodID),
}

#[derive(Clone, Copy, Debug)]
pub struct ResolvedMethod {
    spec: &'static MethodSpec,
    handle: MethodHandle,
}

impl ResolvedMethod {
    #[must_use]
    pub fn spec(&self) -> &'static MethodSpec {
        self.spec
    }

    #[must_use]
    pub fn return_type(&self) -> ReturnType {
        self.spec.ret.return_type()
    }
}

/// A resolved class: global class reference plus method ids by operation.
pub struct ClassDescriptor {
    class: ForeignClass,
    class_ref: GlobalRef,
    methods: FxHashMap<Op, ResolvedMethod>,
}

/// What was missing when a table failed to resolve.
enum Missing {
    Class,
    Method(&'static MethodSpec),
}

impl ClassDescriptor {
    fn resolve(env: &mut JNIEnv, class: ForeignClass) -> Result<std::result::Result<Self, Missing>> {
        let local = match env.find_class(class.name()) {
            Ok(local) => local,
            Err(e) if is_not_found(&e) => {
                marshal::clear_pending(env);
                return Ok(Err(Missing::Class));
            }
            Err(e) => return Err(e.into()),
        };

        let mut methods = FxHashMap::default();
        for spec in class.methods() {
            match resolve_method(env, &local, spec) {
                Ok(handle) => {
                    methods.insert(spec.op, ResolvedMethod { spec, handle });
                }
                Err(e) if is_not_found(&e) => {
                    marshal::clear_pending(env);
                    return Ok(Err(Missing::Method(spec)));
                }
                Err(e) => return Err(e.into()),
            }
        }

        let class_ref = env.new_global_ref(&local)?;
        tracing::debug!(class = class.name(), methods = methods.len(), "foreign class resolved");
        Ok(Ok(Self {
            class,
            class_ref,
            methods,
        }))
    }

    #[must_use]
    pub fn class(&self) -> ForeignClass {
        self.class
    }

    /// The global class reference.
    #[must_use]
    pub fn class_ref(&self) -> &GlobalRef {
        &self.class_ref
    }

    /// Look up the resolved entry for `op`.
    pub fn get(&self, op: Op) -> Result<&ResolvedMethod> {
        self.methods.get(&op).ok_or_else(|| {
            ResolutionError::MethodNotFound {
                class: self.class.name(),
                method: op.name(),
                signature: "(undeclared)",
                engine_version: "n/a".to_string(),
            }
            .into()
        })
    }

    fn instance_handle(&self, op: Op, kind: MethodKind) -> Result<(JMethodID, ReturnType)> {
        let resolved = self.get(op)?;
        match resolved.handle {
            MethodHandle::Instance(id) if resolved.spec.kind == kind => Ok((id, resolved.return_type())),
            _ => Err(LudiiError::invocation(
                resolved.spec.name,
                format!("declared {:?}, requested as {kind:?}", resolved.spec.kind),
            )),
        }
    }

    /// Instance method id for `op`.
    pub fn method(&self, op: Op) -> Result<(JMethodID, ReturnType)> {
        self.instance_handle(op, MethodKind::Instance)
    }

    /// Constructor id for `op`.
    pub fn constructor(&self, op: Op) -> Result<JMethodID> {
        self.instance_handle(op, MethodKind::Constructor).map(|(id, _)| id)
    }

    /// Static method id for `op`.
    pub fn static_method(&self, op: Op) -> Result<(JStaticMethodID, ReturnType)> {
        let resolved = self.get(op)?;
        match resolved.handle {
            MethodHandle::Static(id) => Ok((id, resolved.return_type())),
            MethodHandle::Instance(_) => Err(LudiiError::invocation(
                resolved.spec.name,
                "declared instance, called as static method",
            )),
        }
    }
}

fn resolve_method(env: &mut JNIEnv, class: &JClass, spec: &MethodSpec) -> jni::errors::Result<MethodHandle> {
    match spec.kind {
        MethodKind::Instance | MethodKind::Constructor => env
            .get_method_id(class, spec.name, spec.signature)
            .map(MethodHandle::Instance),
        MethodKind::Static => env
            .get_static_method_id(class, spec.name, spec.signature)
            .map(MethodHandle::Static),
    }
}

fn is_not_found(e: &jni::errors::Error) -> bool {
    matches!(
        e,
        jni::errors::Error::JavaException
            | jni::errors::Error::MethodNotFound { .. }
            | jni::errors::Error::NullPtr(_)
    )
}

/// Cache of resolved classes, valid for the runtime's lifetime.
#[derive(Default)]
pub struct ClassRegistry {
    game: OnceCell<ClassDescriptor>,
    state: OnceCell<ClassDescriptor>,
}

impl ClassRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, class: ForeignClass) -> &OnceCell<ClassDescriptor> {
        match class {
            ForeignClass::Game => &self.game,
            ForeignClass::State => &self.state,
        }
    }

    /// Resolve `class` on first use; later calls are served from cache.
    pub fn resolve(&self, env: &mut JNIEnv, class: ForeignClass) -> Result<&ClassDescriptor> {
        self.cell(class).get_or_try_init(|| match ClassDescriptor::resolve(env, class)? {
            Ok(descriptor) => Ok(descriptor),
            Err(missing) => {
                let engine_version = probe_version(env);
                let err = match missing {
                    Missing::Class => ResolutionError::ClassNotFound {
                        class: class.name(),
                        engine_version,
                    },
                    Missing::Method(spec) => ResolutionError::MethodNotFound {
                        class: class.name(),
                        method: spec.name,
                        signature: spec.signature,
                        engine_version,
                    },
                };
                tracing::warn!(error = %err, "foreign surface mismatch");
                Err(LudiiError::from(err))
            }
        })
    }

    /// Validate every declared class.
    pub fn resolve_all(&self, env: &mut JNIEnv) -> Result<()> {
        for class in ForeignClass::ALL {
            self.resolve(env, class)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_resolved(&self, class: ForeignClass) -> bool {
        self.cell(class).get().is_some()
    }

    /// Drop every cached class reference. Only valid before the VM goes away.
    pub(crate) fn clear(&mut self) {
        self.game.take();
        self.state.take();
    }
}

/// Best-effort engine version for diagnostics, bypassing the cache.
fn probe_version(env: &mut JNIEnv) -> String {
    let version = env
        .call_static_method(GAME_CLASS, "ludiiVersion", "()Ljava/lang/String;", &[])
        .and_then(|v| v.l())
        .and_then(|obj| {
            let text = JString::from(obj);
            env.get_string(&text).map(String::from)
        });
    match version {
        Ok(v) => v,
        Err(_) => {
            marshal::clear_pending(env);
            "unknown".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tables_have_unique_ops() {
        for class in ForeignClass::ALL {
            let ops: HashSet<_> = class.methods().iter().map(|m| m.op).collect();
            assert_eq!(ops.len(), class.methods().len(), "{}", class.name());
        }
    }

    #[test]
    fn test_constructors_return_void() {
        for class in ForeignClass::ALL {
            for m in class.methods() {
                if m.kind == MethodKind::Constructor {
                    assert_eq!(m.name, "<init>");
                    assert!(m.signature.ends_with(")V"));
                    assert_eq!(m.ret, Ret::Void);
                }
            }
        }
    }

    #[test]
    fn test_return_categories_match_signatures() {
        for class in ForeignClass::ALL {
            for m in class.methods() {
                let (_, ret) = m.signature.rsplit_once(')').unwrap();
                let expected = match ret {
                    "V" => Ret::Void,
                    "Z" => Ret::Boolean,
                    "I" => Ret::Int,
                    _ => Ret::Object,
                };
                assert_eq!(m.ret, expected, "{}.{}{}", class.name(), m.name, m.signature);
            }
        }
    }

    #[test]
    fn test_state_constructor_takes_game_class() {
        let ctor = STATE_METHODS.iter().find(|m| m.op == Op::NewState).unwrap();
        assert!(ctor.signature.contains(GAME_CLASS));
        let copy = STATE_METHODS.iter().find(|m| m.op == Op::CopyState).unwrap();
        assert!(copy.signature.contains(STATE_CLASS));
    }

    #[test]
    fn test_op_names_match_tables() {
        for class in ForeignClass::ALL {
            for m in class.methods() {
                assert_eq!(m.op.name(), m.name);
            }
        }
    }

    #[test]
    fn test_registry_starts_empty() {
        let registry = ClassRegistry::new();
        assert!(!registry.is_resolved(ForeignClass::Game));
        assert!(!registry.is_resolved(ForeignClass::State));
    }
}
