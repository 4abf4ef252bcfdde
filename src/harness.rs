//! Consistency and benchmark harness.
//!
//! Every registered [`Strategy`] is run `runs` times over the same `max_k`.
//! The harness records the mean wall-clock time, whether all runs agreed with
//! each other, and whether the result matches the first strategy in the
//! registry (the scalar reference). A panic inside one strategy is caught and
//! reported for that strategy only. If the reference itself fails, no entry
//! has a reference verdict.
//!
//! Panics raised while a strategy is contained do not reach the default panic
//! hook, so stderr stays quiet and the failure shows up once, in the table.
//! Panics on other threads, or outside the harness, are still printed.

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::hint::black_box;
use std::panic;
use std::sync::Once;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::SearchResult;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::simd::{BATCH_WIDTH, batch_search, formatted_batch_search};
use crate::simple_search;
use crate::wide::{WIDE_WIDTH, wide_search};

pub type SearchFn = fn(u32) -> SearchResult;

/// A named search implementation.
#[derive(Clone, Copy, Debug)]
pub struct Strategy {
    pub name: &'static str,
    pub search: SearchFn,
}

/// Printed when the 16-lane search is left out of the registry.
pub const WIDE_SKIP_NOTICE: &str = "CPU does not support 16-lane SIMD, skipping Wide x16.";

const RULE_WIDTH: usize = 80;

/// Whether the host has native 16 x 32-bit vector registers.
#[cfg(target_arch = "x86_64")]
pub fn cpu_supports_wide_lanes() -> bool {
    is_x86_feature_detected!("avx512f")
}

#[cfg(not(target_arch = "x86_64"))]
pub fn cpu_supports_wide_lanes() -> bool {
    false
}

/// All implementations, scalar reference first.
pub fn registry(include_wide: bool) -> Vec<Strategy> {
    let mut strategies = vec![
        Strategy {
            name: "Simple",
            search: simple_search,
        },
        Strategy {
            name: "Base SIMD",
            search: formatted_batch_search,
        },
        Strategy {
            name: "Batch x8",
            search: batch_search::<BATCH_WIDTH>,
        },
        Strategy {
            name: "Wide x8",
            search: wide_search::<BATCH_WIDTH>,
        },
    ];
    if include_wide {
        strategies.push(Strategy {
            name: "Wide x16",
            search: wide_search::<WIDE_WIDTH>,
        });
    }
    strategies
}

/// Timing and self-consistency of one implementation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// Result of the first run.
    pub result: SearchResult,
    pub mean_ms: f64,
    /// True when every run returned the same record.
    pub consistent: bool,
}

/// Run `search` `runs` times, timing each run.
pub(crate) fn measure(search: SearchFn, max_k: u32, runs: usize) -> Result<Measurement> {
    if runs == 0 {
        return Err(HarnessError::NoRuns);
    }

    let mut first: Option<SearchResult> = None;
    let mut consistent = true;
    let mut total = Duration::ZERO;

    for run in 0..runs {
        let start = Instant::now();
        let result = black_box(search(black_box(max_k)));
        let elapsed = start.elapsed();
        total += elapsed;

        debug!(
            run,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            max_val = result.max_val,
            best_k = result.best_k,
            "run complete"
        );

        match first {
            None => first = Some(result),
            Some(expected) => consistent &= expected == result,
        }
    }

    Ok(Measurement {
        result: first.unwrap_or_default(),
        mean_ms: total.as_secs_f64() * 1000.0 / runs as f64,
        consistent,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

thread_local! {
    static CONTAINING: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

// Wrap the current hook once so it skips panics raised under `Containment`.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !CONTAINING.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

// Marks the current thread as running a contained strategy until dropped,
// including when dropped during unwinding.
struct Containment {
    outer: bool,
}

impl Containment {
    fn enter() -> Self {
        install_quiet_hook();
        Containment {
            outer: CONTAINING.with(|flag| flag.replace(true)),
        }
    }
}

impl Drop for Containment {
    fn drop(&mut self) {
        CONTAINING.with(|flag| flag.set(self.outer));
    }
}

// Measure one strategy, turning a panic into a reported failure.
fn measure_contained(strategy: &Strategy, config: &HarnessConfig) -> Result<Measurement> {
    let search = strategy.search;
    panic::catch_unwind(|| {
        let _containment = Containment::enter();
        measure(search, config.max_k, config.runs)
    })
    .map_err(|payload| HarnessError::ImplementationFailed {
        name: strategy.name,
        message: panic_message(payload.as_ref()),
    })?
}

/// Harness output for one implementation.
#[derive(Clone, Debug)]
pub struct Entry {
    pub name: &'static str,
    pub outcome: Result<Measurement>,
    /// `None` when this implementation or the reference failed.
    pub agrees_with_reference: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct Report {
    entries: Vec<Entry>,
}

impl Report {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// True when every implementation completed, agreed with itself and with
    /// the reference.
    pub fn all_agree(&self) -> bool {
        self.entries.iter().all(|entry| {
            matches!(&entry.outcome, Ok(m) if m.consistent)
                && entry.agrees_with_reference == Some(true)
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &HarnessError> {
        self.entries.iter().filter_map(|entry| entry.outcome.as_ref().err())
    }
}

/// Run every strategy in order and collect a [`Report`].
///
/// Only an invalid `config` is an error; failures inside a strategy end up in
/// that strategy's [`Entry`]. The first strategy is the reference; when it
/// fails, every `agrees_with_reference` is `None`.
pub fn run(config: &HarnessConfig, strategies: &[Strategy]) -> Result<Report> {
    config.validate()?;

    let mut reference: Option<SearchResult> = None;
    let mut entries = Vec::with_capacity(strategies.len());

    for (index, strategy) in strategies.iter().enumerate() {
        info!(
            implementation = strategy.name,
            runs = config.runs,
            max_k = config.max_k,
            "running implementation"
        );

        let outcome = measure_contained(strategy, config);
        if index == 0 {
            reference = outcome.as_ref().ok().map(|m| m.result);
            if reference.is_none() {
                warn!(
                    implementation = strategy.name,
                    "reference failed, results cannot be cross-checked"
                );
            }
        }

        let agrees_with_reference = match &outcome {
            Ok(m) => {
                if !m.consistent {
                    warn!(implementation = strategy.name, "results differ between runs");
                }
                if !m.result.is_well_formed() {
                    warn!(
                        implementation = strategy.name,
                        result = ?m.result,
                        "result breaks pandigital invariants"
                    );
                }

                let agrees = reference.map(|expected| {
                    let agrees = m.result == expected;
                    if !agrees {
                        warn!(
                            implementation = strategy.name,
                            result = ?m.result,
                            reference = ?expected,
                            "result disagrees with reference"
                        );
                    }
                    agrees
                });
                info!(
                    implementation = strategy.name,
                    mean_ms = m.mean_ms,
                    consistent = m.consistent,
                    "implementation complete"
                );
                agrees
            }
            Err(err) => {
                warn!(implementation = strategy.name, error = %err, "implementation failed");
                None
            }
        };

        entries.push(Entry {
            name: strategy.name,
            outcome,
            agrees_with_reference,
        });
    }

    Ok(Report { entries })
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "{:<20}{:>15}{:>10}{:>10}{:>15}{:>10}",
            "Implementation", "Max Value", "Best K", "Best N", "Time (ms)", "Valid"
        )?;
        writeln!(f, "{rule}")?;

        for entry in &self.entries {
            match &entry.outcome {
                Ok(m) => writeln!(
                    f,
                    "{:<20}{:>15}{:>10}{:>10}{:>15.3}{:>10}",
                    entry.name,
                    m.result.max_val,
                    m.result.best_k,
                    m.result.best_n,
                    m.mean_ms,
                    if m.consistent { "Yes" } else { "No" }
                )?,
                Err(err) => writeln!(f, "{err}")?,
            }
        }

        writeln!(f, "{rule}")
    }
}
