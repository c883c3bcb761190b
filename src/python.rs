// src/python.rs
use numpy::PyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::{
    instances_from_ids, Advisor, DiscardHistory, EvalConfig, EvalError, EvalWeights, Meld,
    MeldKind, RoundSnapshot, Tile, TileCounts, NUM_OPPONENTS,
};

impl From<EvalError> for PyErr {
    fn from(e: EvalError) -> PyErr {
        PyValueError::new_err(e.to_string())
    }
}

/// Melds arrive as `(kind, tile_id)` pairs: `("pon", 27)`. A chi names its
/// lowest tile.
fn parse_melds(melds: Option<Vec<(String, u8)>>) -> PyResult<Vec<Meld>> {
    melds
        .unwrap_or_default()
        .into_iter()
        .map(|(kind, tile)| {
            let kind = match kind.as_str() {
                "chi" => MeldKind::Chi,
                "pon" => MeldKind::Pon,
                "kan" => MeldKind::Kan,
                other => return Err(PyValueError::new_err(format!("unknown meld kind {other:?}"))),
            };
            Ok(Meld::new(kind, Tile::try_from(tile)?)?)
        })
        .collect()
}

fn parse_history(own: Option<Vec<u8>>, opponents: Option<Vec<Vec<u8>>>) -> PyResult<DiscardHistory> {
    let opponents = opponents.unwrap_or_else(|| vec![Vec::new(); NUM_OPPONENTS]);
    if opponents.len() != NUM_OPPONENTS {
        return Err(PyValueError::new_err(format!(
            "expected {NUM_OPPONENTS} opponent rivers, got {}",
            opponents.len()
        )));
    }
    Ok(DiscardHistory::from_ids(
        &own.unwrap_or_default(),
        [opponents[0].as_slice(), opponents[1].as_slice(), opponents[2].as_slice()],
    )?)
}

fn parse_ready(ready: Option<Vec<bool>>) -> PyResult<[bool; NUM_OPPONENTS]> {
    let ready = ready.unwrap_or_else(|| vec![false; NUM_OPPONENTS]);
    ready.as_slice().try_into().map_err(|_| {
        PyValueError::new_err(format!(
            "expected {NUM_OPPONENTS} ready flags, got {}",
            ready.len()
        ))
    })
}

#[pyclass(name = "Advisor")]
struct PyAdvisor {
    inner: Advisor,
}

#[pymethods]
impl PyAdvisor {
    #[new]
    #[pyo3(signature = (shanten=None, effective_kinds=None, effective_supply=None, danger=None, expected_score=None))]
    fn new(
        shanten: Option<f32>,
        effective_kinds: Option<f32>,
        effective_supply: Option<f32>,
        danger: Option<f32>,
        expected_score: Option<f32>,
    ) -> Self {
        let d = EvalWeights::default();
        let weights = EvalWeights {
            shanten: shanten.unwrap_or(d.shanten),
            effective_kinds: effective_kinds.unwrap_or(d.effective_kinds),
            effective_supply: effective_supply.unwrap_or(d.effective_supply),
            danger: danger.unwrap_or(d.danger),
            expected_score: expected_score.unwrap_or(d.expected_score),
        };
        Self {
            inner: Advisor::new(EvalConfig { weights, ..EvalConfig::default() }),
        }
    }

    #[pyo3(signature = (hand, melds=None))]
    fn shanten(&self, hand: Vec<u8>, melds: Option<Vec<(String, u8)>>) -> PyResult<i8> {
        Ok(self.inner.shanten(&hand, &parse_melds(melds)?)?)
    }

    #[pyo3(signature = (hand, melds=None))]
    fn effective_tiles(&self, hand: Vec<u8>, melds: Option<Vec<(String, u8)>>) -> PyResult<Vec<u8>> {
        let tiles = self.inner.effective_tiles(&hand, &parse_melds(melds)?)?;
        Ok(tiles.into_iter().map(Tile::id).collect())
    }

    #[pyo3(signature = (hand, dora_indicators=None, own_discards=None, opponent_discards=None, melds=None))]
    fn best_discard(
        &self,
        hand: Vec<u8>,
        dora_indicators: Option<Vec<u8>>,
        own_discards: Option<Vec<u8>>,
        opponent_discards: Option<Vec<Vec<u8>>>,
        melds: Option<Vec<(String, u8)>>,
    ) -> PyResult<(u8, f32)> {
        let history = parse_history(own_discards, opponent_discards)?;
        let (tile, score) = self.inner.best_discard(
            &hand,
            &dora_indicators.unwrap_or_default(),
            &history,
            &parse_melds(melds)?,
        )?;
        Ok((tile.id(), score))
    }

    #[pyo3(signature = (tile, own_discards=None, opponent_discards=None, ready=None))]
    fn danger(
        &self,
        tile: u8,
        own_discards: Option<Vec<u8>>,
        opponent_discards: Option<Vec<Vec<u8>>>,
        ready: Option<Vec<bool>>,
    ) -> PyResult<f32> {
        let history = parse_history(own_discards, opponent_discards)?;
        Ok(self.inner.danger(tile, &history, &parse_ready(ready)?)?)
    }

    /// Full ranking as `(instance_id, score, reason)`, best first.
    #[pyo3(signature = (hand, dora_indicators=None, own_discards=None, opponent_discards=None, ready=None, melds=None))]
    fn advise(
        &self,
        hand: Vec<u8>,
        dora_indicators: Option<Vec<u8>>,
        own_discards: Option<Vec<u8>>,
        opponent_discards: Option<Vec<Vec<u8>>>,
        ready: Option<Vec<bool>>,
        melds: Option<Vec<(String, u8)>>,
    ) -> PyResult<Vec<(u8, f32, String)>> {
        let snapshot = RoundSnapshot::new(instances_from_ids(&hand)?, parse_melds(melds)?)?
            .with_dora_indicators(instances_from_ids(&dora_indicators.unwrap_or_default())?)
            .with_discards(parse_history(own_discards, opponent_discards)?)
            .with_opponents_ready(parse_ready(ready)?);
        let advice = self.inner.advise(&snapshot)?;
        Ok(advice
            .ranking
            .iter()
            .map(|c| (c.instance.id(), c.score, c.to_string()))
            .collect())
    }
}

#[pyfunction]
#[pyo3(signature = (hand, melds=None))]
fn compute_shanten(hand: Vec<u8>, melds: Option<Vec<(String, u8)>>) -> PyResult<i8> {
    Ok(crate::compute_shanten(&hand, &parse_melds(melds)?)?)
}

#[pyfunction]
#[pyo3(signature = (hand, melds=None))]
fn compute_effective_tiles(hand: Vec<u8>, melds: Option<Vec<(String, u8)>>) -> PyResult<Vec<u8>> {
    let tiles = crate::compute_effective_tiles(&hand, &parse_melds(melds)?)?;
    Ok(tiles.into_iter().map(Tile::id).collect())
}

#[pyfunction]
#[pyo3(signature = (hand, dora_indicators=None, own_discards=None, opponent_discards=None, melds=None))]
fn compute_best_discard(
    hand: Vec<u8>,
    dora_indicators: Option<Vec<u8>>,
    own_discards: Option<Vec<u8>>,
    opponent_discards: Option<Vec<Vec<u8>>>,
    melds: Option<Vec<(String, u8)>>,
) -> PyResult<(u8, f32)> {
    PyAdvisor { inner: Advisor::default() }.best_discard(
        hand,
        dora_indicators,
        own_discards,
        opponent_discards,
        melds,
    )
}

#[pyfunction]
#[pyo3(signature = (tile, own_discards=None, opponent_discards=None, ready=None))]
fn compute_danger(
    tile: u8,
    own_discards: Option<Vec<u8>>,
    opponent_discards: Option<Vec<Vec<u8>>>,
    ready: Option<Vec<bool>>,
) -> PyResult<f32> {
    let history = parse_history(own_discards, opponent_discards)?;
    Ok(crate::compute_danger(tile, &history, &parse_ready(ready)?)?)
}

/// 34-slot kind counts of a hand of instance ids.
#[pyfunction]
fn tile_counts<'py>(py: Python<'py>, hand: Vec<u8>) -> PyResult<Bound<'py, PyArray1<u8>>> {
    let counts = TileCounts::from_instances(&instances_from_ids(&hand)?)?;
    Ok(PyArray1::from_vec_bound(py, counts.to_array().to_vec()))
}

/// Danger of every kind under the default parameters.
#[pyfunction]
#[pyo3(signature = (own_discards=None, opponent_discards=None, ready=None))]
fn danger_table<'py>(
    py: Python<'py>,
    own_discards: Option<Vec<u8>>,
    opponent_discards: Option<Vec<Vec<u8>>>,
    ready: Option<Vec<bool>>,
) -> PyResult<Bound<'py, PyArray1<f32>>> {
    let history = parse_history(own_discards, opponent_discards)?;
    let table = crate::danger_table(&history, &parse_ready(ready)?, &EvalConfig::default().danger);
    Ok(PyArray1::from_vec_bound(py, table.to_vec()))
}

#[pyfunction]
fn tile_name(kind: u8) -> PyResult<String> {
    Ok(Tile::try_from(kind)?.to_string())
}

#[pymodule]
fn riichi_advisor(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(compute_shanten, m)?)?;
    m.add_function(wrap_pyfunction!(compute_effective_tiles, m)?)?;
    m.add_function(wrap_pyfunction!(compute_best_discard, m)?)?;
    m.add_function(wrap_pyfunction!(compute_danger, m)?)?;
    m.add_function(wrap_pyfunction!(tile_counts, m)?)?;
    m.add_function(wrap_pyfunction!(danger_table, m)?)?;
    m.add_function(wrap_pyfunction!(tile_name, m)?)?;
    m.add_class::<PyAdvisor>()?;
    Ok(())
}
