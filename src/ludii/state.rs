//! `LudiiState`: one foreign game state.
//!
//! The foreign object is mutable and shared by reference on its own side;
//! here each `LudiiState` owns exactly one global reference and copies are
//! only made through [`State::clone_state`], which runs the foreign copy
//! constructor.
//!
//! ## Phases
//!
//! `Constructed` after creation or clone, `InProgress` while the history is
//! longer than it was at that point, `Terminal` whenever the engine reports
//! a finished game. Terminal is not absorbing: undo can leave it, and
//! undoing back to the starting length returns to `Constructed`.
//!
//! ## History
//!
//! Every successfully applied action is recorded with the player who took
//! it. Undo only proceeds when the request matches the last entry.

use std::sync::Arc;

use im::Vector;
use jni::objects::{GlobalRef, JObject};
use jni::JNIEnv;
use serde::{Deserialize, Serialize};

use crate::bridge::marshal::{self, int_arg, obj_arg};
use crate::bridge::{ClassDescriptor, ForeignClass, Op, Runtime};
use crate::core::{Action, CurrentPlayer, PlayerAction, PlayerId, TensorBuffer, TensorShape};
use crate::error::{LudiiError, Result};
use crate::game::State;

use super::game::{GameInfo, LudiiGame};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatePhase {
    Constructed,
    InProgress,
    Terminal,
}

/// A foreign game state owned by the host.
pub struct LudiiState<'rt> {
    runtime: &'rt Runtime,
    wrapper: GlobalRef,
    info: Arc<GameInfo>,
    history: Vector<PlayerAction>,
    /// History length when this state was created or cloned.
    base_len: usize,
}

impl<'rt> LudiiState<'rt> {
    pub(crate) fn new_initial(game: &LudiiGame<'rt>) -> Result<Self> {
        let runtime = game.runtime();
        let game_wrapper = game.wrapper();
        let mut cx = runtime.call_context()?;
        let registry = runtime.registry();
        let wrapper = cx.with_frame(|env| {
            let class = registry.resolve(env, ForeignClass::State)?;
            let local = marshal::new_object(env, class, Op::NewState, &[obj_arg(game_wrapper.as_obj())])?;
            marshal::call_void(env, &local, class, Op::Reset, &[])?;
            Ok(env.new_global_ref(&local)?)
        })?;

        tracing::debug!(game = %game, "initial state created");
        Ok(Self {
            runtime,
            wrapper,
            info: Arc::clone(game.info()),
            history: Vector::new(),
            base_len: 0,
        })
    }

    /// Run `f` against the foreign state inside one call context and frame.
    fn with_state<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut JNIEnv, &ClassDescriptor, &JObject) -> Result<T>,
    {
        let mut cx = self.runtime.call_context()?;
        let registry = self.runtime.registry();
        let wrapper = &self.wrapper;
        cx.with_frame(|env| {
            let class = registry.resolve(env, ForeignClass::State)?;
            f(env, class, wrapper.as_obj())
        })
    }

    fn check_player(&self, player: PlayerId) -> Result<()> {
        if player.index() >= self.info.num_players {
            return Err(LudiiError::InvalidParameter(format!(
                "{player} out of range for a {}-player game",
                self.info.num_players
            )));
        }
        Ok(())
    }

    /// Metadata of the game this state belongs to.
    #[must_use]
    pub fn game_info(&self) -> &Arc<GameInfo> {
        &self.info
    }

    /// Applied actions, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<PlayerAction> {
        &self.history
    }

    #[must_use]
    pub fn move_number(&self) -> usize {
        self.history.len()
    }

    pub fn phase(&self) -> Result<StatePhase> {
        Ok(phase_of(self.is_terminal()?, self.history.len(), self.base_len))
    }

    /// The engine's textual rendering of the position.
    pub fn render(&self) -> Result<String> {
        self.with_state(|env, class, obj| {
            let text = marshal::call_object(env, obj, class, Op::Render, &[])?;
            marshal::read_string(env, text)
        })
    }
}

impl<'rt> State for LudiiState<'rt> {
    type Error = LudiiError;

    fn current_player(&self) -> Result<CurrentPlayer> {
        self.with_state(|env, class, obj| {
            if marshal::call_bool(env, obj, class, Op::IsTerminal, &[])? {
                return Ok(CurrentPlayer::Terminal);
            }
            let raw = marshal::call_int(env, obj, class, Op::CurrentPlayer, &[])?;
            PlayerId::from_foreign(raw)
                .map(CurrentPlayer::Player)
                .ok_or_else(|| LudiiError::invocation(Op::CurrentPlayer.name(), format!("invalid player index {raw}")))
        })
    }

    fn legal_actions(&self) -> Result<Vec<Action>> {
        self.with_state(|env, class, obj| {
            if marshal::call_bool(env, obj, class, Op::IsTerminal, &[])? {
                return Ok(Vec::new());
            }
            let raw = marshal::call_object(env, obj, class, Op::LegalActions, &[])?;
            let raw = marshal::read_int_array(env, raw)?;
            let mut actions = raw
                .into_iter()
                .map(|id| {
                    Action::from_foreign(id).ok_or_else(|| {
                        LudiiError::invocation(Op::LegalActions.name(), format!("negative action id {id}"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            actions.sort_unstable();
            Ok(actions)
        })
    }

    fn action_to_string(&self, player: PlayerId, action: Action) -> Result<String> {
        let id = foreign_action(Op::ActionToString, action)?;
        self.with_state(|env, class, obj| {
            let text = marshal::call_object(
                env,
                obj,
                class,
                Op::ActionToString,
                &[int_arg(i32::from(player.0)), int_arg(id)],
            )?;
            marshal::read_string(env, text)
        })
    }

    fn apply_action(&mut self, action: Action) -> Result<()> {
        let id = foreign_action(Op::ApplyAction, action)?;
        let player = self.with_state(|env, class, obj| {
            let raw = marshal::call_int(env, obj, class, Op::CurrentPlayer, &[])?;
            let player = PlayerId::from_foreign(raw).ok_or_else(|| {
                LudiiError::invocation(Op::CurrentPlayer.name(), format!("invalid player index {raw}"))
            })?;
            marshal::call_void(env, obj, class, Op::ApplyAction, &[int_arg(id)])?;
            Ok(player)
        })?;

        tracing::trace!(%player, %action, move_number = self.history.len(), "action applied");
        self.history.push_back(PlayerAction::new(player, action));
        Ok(())
    }

    fn undo_action(&mut self, player: PlayerId, action: Action) -> Result<()> {
        let mismatch = |reason: String| LudiiError::UndoMismatch {
            player: player.0,
            action: action.0,
            reason,
        };
        match self.history.last() {
            None => return Err(mismatch("no action has been applied".into())),
            Some(last) if *last != PlayerAction::new(player, action) => {
                return Err(mismatch(format!(
                    "last applied was {} by {}",
                    last.action, last.player
                )))
            }
            Some(_) => {}
        }

        self.with_state(|env, class, obj| marshal::call_void(env, obj, class, Op::UndoLastMove, &[]))?;
        self.history.pop_back();
        Ok(())
    }

    fn returns(&self) -> Result<Vec<f64>> {
        let returns = self.with_state(|env, class, obj| {
            let raw = marshal::call_object(env, obj, class, Op::Returns, &[])?;
            marshal::read_double_array(env, raw)
        })?;
        if returns.len() != self.info.num_players {
            return Err(LudiiError::ShapeMismatch {
                expected: TensorShape::new(&[self.info.num_players]),
                actual: TensorShape::new(&[returns.len()]),
            });
        }
        Ok(returns)
    }

    fn is_terminal(&self) -> Result<bool> {
        self.with_state(|env, class, obj| marshal::call_bool(env, obj, class, Op::IsTerminal, &[]))
    }

    /// Ludii games are treated as perfect information: this is the
    /// rendering of the full position.
    fn information_state_string(&self, player: PlayerId) -> Result<String> {
        self.check_player(player)?;
        self.render()
    }

    fn observation_string(&self, player: PlayerId) -> Result<String> {
        self.check_player(player)?;
        self.render()
    }

    /// The engine's state tensor. Identical for every player.
    fn observation_tensor(&self, player: PlayerId) -> Result<TensorBuffer> {
        self.check_player(player)?;
        let expected = &self.info.observation_shape;
        self.with_state(|env, class, obj| {
            let raw = marshal::call_object(env, obj, class, Op::ToTensor, &[])?;
            let planes = marshal::read_planes(env, raw, Op::ToTensor)?;
            TensorBuffer::from_planes(expected, &planes)
        })
    }

    fn clone_state(&self) -> Result<Self> {
        let wrapper = self.with_state(|env, class, obj| {
            let local = marshal::new_object(env, class, Op::CopyState, &[obj_arg(obj)])?;
            Ok(env.new_global_ref(&local)?)
        })?;

        tracing::debug!(move_number = self.history.len(), "state cloned");
        Ok(Self {
            runtime: self.runtime,
            wrapper,
            info: Arc::clone(&self.info),
            history: self.history.clone(),
            base_len: self.history.len(),
        })
    }
}

fn phase_of(terminal: bool, moves: usize, base_len: usize) -> StatePhase {
    if terminal {
        StatePhase::Terminal
    } else if moves > base_len {
        StatePhase::InProgress
    } else {
        StatePhase::Constructed
    }
}

fn foreign_action(op: Op, action: Action) -> Result<i32> {
    action
        .to_foreign()
        .ok_or_else(|| LudiiError::invocation(op.name(), format!("{action} does not fit a jint")))
}

impl std::fmt::Display for LudiiState<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.render() {
            Ok(text) => f.write_str(&text),
            Err(e) => write!(f, "<state unavailable: {e}>"),
        }
    }
}

impl std::fmt::Debug for LudiiState<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LudiiState")
            .field("game", &self.info.params.game_name)
            .field("move_number", &self.history.len())
            .field("base_len", &self.base_len)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_action_range() {
        assert_eq!(foreign_action(Op::ApplyAction, Action::new(7)).unwrap(), 7);
        let err = foreign_action(Op::ApplyAction, Action::new(u32::MAX)).unwrap_err();
        assert!(matches!(err, LudiiError::Invocation { operation: "applyAction", .. }));
    }

    #[test]
    fn test_phase_follows_history_length() {
        assert_eq!(phase_of(false, 0, 0), StatePhase::Constructed);
        assert_eq!(phase_of(false, 1, 0), StatePhase::InProgress);
        // Undo back to the starting length.
        assert_eq!(phase_of(false, 0, 0), StatePhase::Constructed);
        // A clone starts from the copied history.
        assert_eq!(phase_of(false, 3, 3), StatePhase::Constructed);
        assert_eq!(phase_of(false, 4, 3), StatePhase::InProgress);
        assert_eq!(phase_of(false, 2, 3), StatePhase::Constructed);
        assert_eq!(phase_of(true, 5, 0), StatePhase::Terminal);
    }

    #[test]
    fn test_phase_serializes_by_name() {
        assert_eq!(serde_json::to_string(&StatePhase::InProgress).unwrap(), "\"InProgress\"");
    }
}
