//! `LudiiGame`: one foreign game definition.
//!
//! Metadata is queried once at construction and cached in [`GameInfo`],
//! which every derived state shares. Nothing here re-queries the engine
//! except [`LudiiGame::new_initial_state`] and [`LudiiGame::engine_version`].

use std::sync::Arc;

use jni::objects::{GlobalRef, JObject};
use jni::JNIEnv;
use serde::Serialize;

use crate::bridge::marshal::{self, obj_arg};
use crate::bridge::{ClassDescriptor, ForeignClass, Op, Runtime};
use crate::core::TensorShape;
use crate::error::{LudiiError, Result};
use crate::game::Game;

use super::params::{GameParams, LudOptions};
use super::state::LudiiState;

/// Static metadata of one constructed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameInfo {
    pub params: GameParams,
    pub num_players: usize,
    pub num_distinct_actions: usize,
    pub observation_shape: TensorShape,
    pub max_game_length: usize,
}

impl GameInfo {
    fn query(env: &mut JNIEnv, class: &ClassDescriptor, wrapper: &JObject, params: &GameParams) -> Result<Self> {
        let num_players = count(Op::NumPlayers, marshal::call_int(env, wrapper, class, Op::NumPlayers, &[])?)?;
        let num_distinct_actions = count(
            Op::NumDistinctActions,
            marshal::call_int(env, wrapper, class, Op::NumDistinctActions, &[])?,
        )?;
        let dims = marshal::call_object(env, wrapper, class, Op::StateTensorsShape, &[])?;
        let dims = marshal::read_int_array(env, dims)?;
        let observation_shape = observation_shape(&dims)?;
        let max_game_length = count(
            Op::MaxGameLength,
            marshal::call_int(env, wrapper, class, Op::MaxGameLength, &[])?,
        )?;

        Ok(Self {
            params: params.clone(),
            num_players,
            num_distinct_actions,
            observation_shape,
            max_game_length,
        })
    }
}

/// Channels, rows, columns.
const OBSERVATION_RANK: usize = 3;

fn observation_shape(dims: &[i32]) -> Result<TensorShape> {
    let shape = TensorShape::from_foreign(dims)?;
    if shape.rank() != OBSERVATION_RANK {
        return Err(LudiiError::invocation(
            Op::StateTensorsShape.name(),
            format!("expected a rank-{OBSERVATION_RANK} shape, got {shape}"),
        ));
    }
    Ok(shape)
}

fn count(op: Op, raw: i32) -> Result<usize> {
    usize::try_from(raw).map_err(|_| LudiiError::invocation(op.name(), format!("negative count {raw}")))
}

/// A foreign game definition, bound to the runtime that created it.
pub struct LudiiGame<'rt> {
    runtime: &'rt Runtime,
    wrapper: GlobalRef,
    info: Arc<GameInfo>,
}

impl<'rt> LudiiGame<'rt> {
    /// Load a game by name and options.
    ///
    /// With every option slot empty the engine's default variant is loaded.
    /// An unknown game or option is reported as [`LudiiError::Invocation`].
    pub fn new(runtime: &'rt Runtime, params: &GameParams) -> Result<Self> {
        let mut cx = runtime.call_context()?;
        let registry = runtime.registry();
        let (wrapper, info) = cx.with_frame(|env| {
            let class = registry.resolve(env, ForeignClass::Game)?;
            let name = env.new_string(&params.game_name)?;
            let active = params.options.active();
            let local = if active.is_empty() {
                marshal::call_static_object(env, class, Op::Construct, &[obj_arg(&name)])?
            } else {
                let options = marshal::new_string_array(env, &active)?;
                marshal::call_static_object(env, class, Op::ConstructWithOptions, &[obj_arg(&name), obj_arg(&options)])?
            };
            let info = GameInfo::query(env, class, &local, params)?;
            let wrapper = env.new_global_ref(&local)?;
            Ok((wrapper, info))
        })?;

        tracing::info!(
            game = %params,
            players = info.num_players,
            distinct_actions = info.num_distinct_actions,
            observation_shape = %info.observation_shape,
            max_game_length = info.max_game_length,
            "game loaded"
        );

        Ok(Self {
            runtime,
            wrapper,
            info: Arc::new(info),
        })
    }

    /// The named game with default options.
    pub fn by_name(runtime: &'rt Runtime, game_name: &str) -> Result<Self> {
        Self::new(runtime, &GameParams::new(game_name))
    }

    /// The game named in the runtime's configuration.
    pub fn from_config(runtime: &'rt Runtime) -> Result<Self> {
        Self::new(runtime, &runtime.config().game)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.params.game_name
    }

    #[must_use]
    pub fn options(&self) -> &LudOptions {
        &self.info.params.options
    }

    /// Cached metadata, shared with every state of this game.
    #[must_use]
    pub fn info(&self) -> &Arc<GameInfo> {
        &self.info
    }

    #[must_use]
    pub fn runtime(&self) -> &'rt Runtime {
        self.runtime
    }

    pub fn engine_version(&self) -> Result<String> {
        self.runtime.engine_version()
    }

    pub(crate) fn wrapper(&self) -> &GlobalRef {
        &self.wrapper
    }
}

impl<'rt> Game for LudiiGame<'rt> {
    type State = LudiiState<'rt>;
    type Error = LudiiError;

    fn num_distinct_actions(&self) -> usize {
        self.info.num_distinct_actions
    }

    fn num_players(&self) -> usize {
        self.info.num_players
    }

    // Utility bounds keep the trait defaults: every wrapped game is treated
    // as zero-sum win/loss in [-1, 1], whatever its actual payoffs.

    fn observation_tensor_shape(&self) -> &TensorShape {
        &self.info.observation_shape
    }

    fn max_game_length(&self) -> usize {
        self.info.max_game_length
    }

    fn new_initial_state(&self) -> Result<LudiiState<'rt>> {
        LudiiState::new_initial(self)
    }
}

impl std::fmt::Display for LudiiGame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.info.params)
    }
}

impl std::fmt::Debug for LudiiGame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LudiiGame").field("info", &self.info).finish_non_exhaustive()
    }
}
