use std::cell::RefCell;
use std::rc::Rc;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::policy::QValues;

/// Randomness source shared by every stochastic component of one training run.
pub type SharedRng = Rc<RefCell<StdRng>>;

pub fn shared_rng(seed: Option<u64>) -> SharedRng {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Rc::new(RefCell::new(rng))
}

/// Index of the greatest value, ties broken uniformly at random.
pub fn select_max<R: Rng + ?Sized>(values: &QValues, rng: &mut R) -> Result<usize> {
    if values.is_empty() {
        return Err(Error::EmptyValues);
    }
    let mut best: Vec<usize> = vec![0];
    let mut best_value: f64 = values[0];
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > best_value {
            best.clear();
            best_value = v;
            best.push(i);
        } else if v == best_value {
            best.push(i);
        }
    }
    Ok(best[rng.gen_range(0..best.len())])
}

pub fn select_random<R: Rng + ?Sized>(values: &QValues, rng: &mut R) -> Result<usize> {
    if values.is_empty() {
        return Err(Error::EmptyValues);
    }
    Ok(rng.gen_range(0..values.len()))
}

/// Walks the cumulative distribution of `probs` and returns the first index
/// whose interval contains `random`. Rounding leftovers land on the last index.
pub fn categorical_sample(probs: &[f64], random: f64) -> usize {
    let mut upper: f64 = 0.0;
    for (i, p) in probs.iter().enumerate() {
        let lower = upper;
        upper += p;
        if random >= lower && random < upper {
            return i;
        }
    }
    probs.len().saturating_sub(1)
}

pub fn moving_average(window: usize, vector: &[f64]) -> Vec<f64> {
    let window = window.max(1);
    let mut aux: usize = 0;
    let mut result: Vec<f64> = vec![];
    while aux < vector.len() {
        let end: usize = if aux + window < vector.len() {
            aux + window
        } else {
            vector.len()
        };
        let slice: &[f64] = &vector[aux..end];
        let r: f64 = slice.iter().sum();
        result.push(r / window as f64);
        aux = end;
    }
    result
}
