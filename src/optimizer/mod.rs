//! Tabu-like hill-climbing optimiser over clustering labellings (spec
//! §4.G), grounded directly on `r_tabu.h`'s `_CVI_improve` (single-start)
//! and `_CVI_improve_turbo` (multi-start) entry points. Both share one
//! neighbourhood (single-point reassignment) and scoring loop: propose,
//! score via `modify`/`compute`/`undo`, keep the best, commit it for real.

mod tabu;

use rand::Rng;
use tracing::{debug, instrument};

use crate::cvi::Cvi;
use tabu::TabuSet;

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub allow_revisit: bool,
    pub max_iter_with_no_improvement: i64,
    pub max_iter: i64,
    /// `<= 0` means exhaustive enumeration of all n*K neighbours.
    pub max_samples: i64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            allow_revisit: false,
            max_iter_with_no_improvement: 250,
            max_iter: 10_000,
            max_samples: -1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TurboOptions {
    pub max_iter_with_no_improvement: i64,
    pub max_iter: i64,
}

impl Default for TurboOptions {
    fn default() -> Self {
        Self {
            max_iter_with_no_improvement: 250,
            max_iter: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptimizeResult {
    pub labels: Vec<u8>,
    pub value: f64,
    pub iterations: u64,
    pub convergence: i32,
    pub message: &'static str,
}

/// Single-start search from an initial labelling (spec §4.G "Single-start
/// search"). `interrupt` is polled once per outer iteration; on returning
/// `true` the search stops early and reports the best labelling found so
/// far, exactly as the cooperative user-interrupt hook in `r_tabu.h` does
/// via `Rcpp::checkUserInterrupt()`.
#[instrument(skip(index, rng, interrupt))]
pub fn run_single_start<I: Cvi, R: Rng>(
    index: &mut I,
    y0: &[u8],
    options: &SearchOptions,
    rng: &mut R,
    mut interrupt: impl FnMut() -> bool,
) -> Result<OptimizeResult, crate::error::CviError> {
    index.set_labels(y0)?;
    let n = index.get_n();
    let k = index.get_k();

    let mut y = y0.to_vec();
    let mut best_f = index.compute();
    let mut best_y = y.clone();

    let mut tabu = TabuSet::new();
    if !options.allow_revisit {
        tabu.insert(&y);
    }

    let (random_search, max_samples) = if options.max_samples <= 0
        || options.max_samples as usize >= n * k as usize
    {
        (false, n * k as usize)
    } else {
        (true, options.max_samples as usize)
    };

    let mut tabu_hits = 0u64;
    let mut remaining = options.max_iter_with_no_improvement;
    let mut iterations: i64 = 0;
    let mut message = "max_iter_with_no_improvement or max_iter reached";

    loop {
        iterations += 1;
        if interrupt() {
            message = "interrupted";
            break;
        }

        let mut cur_best_f = f64::NEG_INFINITY;
        let mut cur_best_i = 0usize;
        let mut cur_best_j = 0u8;

        for s in 0..max_samples {
            let (i, j) = if random_search {
                (rng.gen_range(0..n), rng.gen_range(0..k))
            } else {
                (s / k as usize, (s % k as usize) as u8)
            };

            if y[i] == j || index.get_count(y[i]) <= 1 {
                continue;
            }

            if !options.allow_revisit {
                let prior = y[i];
                y[i] = j;
                let is_tabu = tabu.contains(&y);
                y[i] = prior;
                if is_tabu {
                    tabu_hits += 1;
                    continue;
                }
            }

            index.modify(i, j);
            let res = index.compute();
            index.undo();

            if res > cur_best_f {
                cur_best_f = res;
                cur_best_i = i;
                cur_best_j = j;
            }
        }

        if cur_best_f == f64::NEG_INFINITY {
            // no legal neighbour this round -- nothing to commit.
            break;
        }

        y[cur_best_i] = cur_best_j;
        index.modify(cur_best_i, cur_best_j);
        if !options.allow_revisit {
            tabu.insert(&y);
        }

        if cur_best_f > best_f {
            best_f = cur_best_f;
            best_y = y.clone();
        } else {
            remaining -= 1;
        }

        debug!(iterations, best_f, cur_best_f, remaining, tabu_hits, "search step");

        if remaining <= 0 || iterations >= options.max_iter {
            break;
        }
    }

    Ok(OptimizeResult {
        labels: best_y,
        value: best_f,
        iterations: iterations.max(0) as u64,
        convergence: 0,
        message,
    })
}

/// Multi-start "turbo" search over a batch of candidate labellings (spec
/// §4.G "Multi-start 'turbo' search"), grounded on `_CVI_improve_turbo`.
/// Tabu enforcement is always on; the inner loop is always exhaustive.
#[instrument(skip(index, starts, interrupt))]
pub fn run_turbo<I: Cvi>(
    index: &mut I,
    starts: &[Vec<u8>],
    options: &TurboOptions,
    mut interrupt: impl FnMut() -> bool,
) -> Result<OptimizeResult, crate::error::CviError> {
    let k = index.get_k();
    let mut tabu = TabuSet::new();
    let mut best_f = f64::NEG_INFINITY;
    let mut best_y: Vec<u8> = Vec::new();
    let mut tabu_hits = 0u64;
    let mut message = "max_iter_with_no_improvement or max_iter reached";

    'starts: for y0 in starts {
        if tabu.contains(y0) {
            tabu_hits += 1;
            continue;
        }

        index.set_labels(y0)?;
        let n = index.get_n();
        let max_samples = n * k as usize;
        let mut y = y0.clone();

        let cur_f = index.compute();
        if cur_f > best_f {
            best_f = cur_f;
            best_y = y.clone();
        }
        tabu.insert(&y);

        let mut remaining = options.max_iter_with_no_improvement;
        let mut iterations: i64 = 0;

        loop {
            iterations += 1;
            if interrupt() {
                message = "interrupted";
                break 'starts;
            }

            let mut cur_best_f = f64::NEG_INFINITY;
            let mut cur_best_i = 0usize;
            let mut cur_best_j = 0u8;

            for s in 0..max_samples {
                let i = s / k as usize;
                let j = (s % k as usize) as u8;

                if y[i] == j || index.get_count(y[i]) <= 1 {
                    continue;
                }

                let prior = y[i];
                y[i] = j;
                let is_tabu = tabu.contains(&y);
                y[i] = prior;
                if is_tabu {
                    tabu_hits += 1;
                    continue;
                }

                index.modify(i, j);
                let res = index.compute();
                index.undo();

                if res > cur_best_f {
                    cur_best_f = res;
                    cur_best_i = i;
                    cur_best_j = j;
                }
            }

            if cur_best_f == f64::NEG_INFINITY {
                break;
            }

            y[cur_best_i] = cur_best_j;
            index.modify(cur_best_i, cur_best_j);
            tabu.insert(&y);

            if cur_best_f > best_f {
                best_f = cur_best_f;
                best_y = y.clone();
            } else {
                remaining -= 1;
            }

            if remaining <= 0 || iterations >= options.max_iter || best_f == f64::INFINITY {
                break;
            }
        }

        if best_f == f64::INFINITY {
            break;
        }
    }

    debug_assert!(best_f != f64::NEG_INFINITY, "turbo search couldn't be worse");

    Ok(OptimizeResult {
        labels: best_y,
        value: best_f,
        iterations: tabu.len() as u64,
        convergence: 0,
        message,
    })
}
