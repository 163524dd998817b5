use numpy::{PyArray1, PyArrayDyn, PyArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{Action, CurrentPlayer, PlayerId};
use crate::game::State;
use crate::ludii::LudiiState;
use crate::playout::RandomPlayout;

use super::TERMINAL_PLAYER_ID;

/// Python wrapper for LudiiState.
#[pyclass(name = "LudiiState", unsendable)]
pub struct PyLudiiState {
    inner: LudiiState<'static>,
}

impl PyLudiiState {
    pub(crate) fn new(inner: LudiiState<'static>) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl PyLudiiState {
    /// Player to move, or `TERMINAL_PLAYER_ID` once the game is over.
    fn current_player(&self) -> PyResult<i32> {
        Ok(match self.inner.current_player()? {
            CurrentPlayer::Player(p) => i32::from(p.0),
            CurrentPlayer::Terminal => TERMINAL_PLAYER_ID,
        })
    }

    fn legal_actions(&self) -> PyResult<Vec<u32>> {
        Ok(self.inner.legal_actions()?.into_iter().map(Action::id).collect())
    }

    fn action_to_string(&self, player: u8, action: u32) -> PyResult<String> {
        Ok(self.inner.action_to_string(PlayerId::new(player), Action::new(action))?)
    }

    fn apply_action(&mut self, action: u32) -> PyResult<()> {
        Ok(self.inner.apply_action(Action::new(action))?)
    }

    fn undo_action(&mut self, player: u8, action: u32) -> PyResult<()> {
        Ok(self.inner.undo_action(PlayerId::new(player), Action::new(action))?)
    }

    fn returns(&self) -> PyResult<Vec<f64>> {
        Ok(self.inner.returns()?)
    }

    fn is_terminal(&self) -> PyResult<bool> {
        Ok(self.inner.is_terminal()?)
    }

    fn information_state_string(&self, player: u8) -> PyResult<String> {
        Ok(self.inner.information_state_string(PlayerId::new(player))?)
    }

    fn observation_string(&self, player: u8) -> PyResult<String> {
        Ok(self.inner.observation_string(PlayerId::new(player))?)
    }

    /// Observation as a numpy array of the game's tensor shape.
    fn observation_tensor<'py>(&self, py: Python<'py>, player: u8) -> PyResult<Bound<'py, PyArrayDyn<f32>>> {
        let tensor = self.inner.observation_tensor(PlayerId::new(player))?;
        let dims = tensor.shape().dims().to_vec();
        PyArray1::from_vec_bound(py, tensor.into_values())
            .reshape(dims)
            .map_err(|e| PyValueError::new_err(format!("{e}")))
    }

    /// Actions applied so far, as `(player, action)` pairs.
    fn history(&self) -> Vec<(u8, u32)> {
        self.inner
            .history()
            .iter()
            .map(|pa| (pa.player.0, pa.action.id()))
            .collect()
    }

    fn move_number(&self) -> usize {
        self.inner.move_number()
    }

    /// Mean returns of `playouts` uniformly random continuations.
    #[pyo3(signature = (playouts = 1, seed = 0))]
    fn random_rollout_returns(&self, playouts: usize, seed: u64) -> PyResult<Vec<f64>> {
        Ok(RandomPlayout::new(seed).average_returns(&self.inner, playouts)?)
    }

    fn clone(&self) -> PyResult<Self> {
        Ok(Self::new(self.inner.clone_state()?))
    }

    fn __copy__(&self) -> PyResult<Self> {
        self.clone()
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        format!("{:?}", self.inner)
    }
}
