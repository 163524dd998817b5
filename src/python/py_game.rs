use pyo3::prelude::*;

use crate::game::Game;
use crate::ludii::{GameParams, LudOptions, LudiiGame, DEFAULT_GAME_NAME};

use super::py_state::PyLudiiState;
use super::runtime;

/// Python wrapper for LudiiGame.
#[pyclass(name = "LudiiGame", unsendable)]
pub struct PyLudiiGame {
    inner: LudiiGame<'static>,
}

#[pymethods]
impl PyLudiiGame {
    /// Load a game. `options` fills the option slots in order; at most nine.
    #[new]
    #[pyo3(signature = (game_name = DEFAULT_GAME_NAME.to_string(), options = Vec::new()))]
    fn new(game_name: String, options: Vec<String>) -> PyResult<Self> {
        let params = GameParams {
            game_name,
            options: LudOptions::try_from(options)?,
        };
        let inner = LudiiGame::new(runtime()?, &params)?;
        Ok(Self { inner })
    }

    fn new_initial_state(&self) -> PyResult<PyLudiiState> {
        Ok(PyLudiiState::new(self.inner.new_initial_state()?))
    }

    fn num_players(&self) -> usize {
        self.inner.num_players()
    }

    fn num_distinct_actions(&self) -> usize {
        self.inner.num_distinct_actions()
    }

    fn observation_tensor_shape(&self) -> Vec<usize> {
        self.inner.observation_tensor_shape().dims().to_vec()
    }

    fn max_game_length(&self) -> usize {
        self.inner.max_game_length()
    }

    fn min_utility(&self) -> f64 {
        self.inner.min_utility()
    }

    fn max_utility(&self) -> f64 {
        self.inner.max_utility()
    }

    fn utility_sum(&self) -> f64 {
        self.inner.utility_sum()
    }

    #[getter]
    fn name(&self) -> String {
        self.inner.name().to_string()
    }

    fn __repr__(&self) -> String {
        format!("LudiiGame({})", self.inner)
    }
}
