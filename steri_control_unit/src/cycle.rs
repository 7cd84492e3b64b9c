//! Fixed-interval tick loop: poll → control → render → apply.
//!
//! Implements the host-side tick runner with tick time measurement, overrun
//! accounting, and a clean shutdown path. An overrun is logged and counted
//! but never aborts the loop; the controller timeline is wall-clock driven,
//! so a late tick simply picks up where the clock actually is.
//!
//! ## RT Setup Sequence
//! 1. `mlockall(MCL_CURRENT | MCL_FUTURE)` — lock all pages.
//! 2. Prefault stack pages.
//! 3. `sched_setaffinity` — pin to a CPU core.
//! 4. `sched_setscheduler(SCHED_FIFO, priority)` — RT priority.
//!
//! ## Tick Loop
//! With the `rt` feature: absolute-time sleep on `CLOCK_MONOTONIC` for
//! drift-free pacing. Without it: `std::thread::sleep` on the remaining
//! interval, good enough for the benchtop simulation.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use steri_common::controller::state::Millis;
use steri_common::hal::driver::{BoardDriver, HalError};

use crate::config::LoadedConfig;
use crate::controller::CycleController;
use crate::feedback::Panel;

// ─── Tick Statistics ────────────────────────────────────────────────

/// O(1) per-tick timing statistics.
///
/// Updated every tick with no allocation.
#[derive(Debug, Clone)]
pub struct TickStats {
    /// Total ticks executed.
    pub tick_count: u64,
    /// Last tick duration [ns].
    pub last_tick_ns: i64,
    /// Minimum tick duration [ns].
    pub min_tick_ns: i64,
    /// Maximum tick duration [ns].
    pub max_tick_ns: i64,
    /// Running sum for average computation.
    pub sum_tick_ns: i64,
    /// Number of overruns detected.
    pub overruns: u64,
    /// Maximum wake-up latency [ns] (expected vs. actual wake).
    pub max_latency_ns: i64,
}

impl TickStats {
    /// Create a new zeroed stats instance.
    pub const fn new() -> Self {
        Self {
            tick_count: 0,
            last_tick_ns: 0,
            min_tick_ns: i64::MAX,
            max_tick_ns: 0,
            sum_tick_ns: 0,
            overruns: 0,
            max_latency_ns: 0,
        }
    }

    /// Record a tick duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: i64, latency_ns: i64) {
        self.tick_count += 1;
        self.last_tick_ns = duration_ns;
        if duration_ns < self.min_tick_ns {
            self.min_tick_ns = duration_ns;
        }
        if duration_ns > self.max_tick_ns {
            self.max_tick_ns = duration_ns;
        }
        self.sum_tick_ns += duration_ns;
        if latency_ns > self.max_latency_ns {
            self.max_latency_ns = latency_ns;
        }
    }

    /// Average tick time [ns] (returns 0 if no ticks).
    #[inline]
    pub fn avg_tick_ns(&self) -> i64 {
        if self.tick_count == 0 {
            0
        } else {
            self.sum_tick_ns / self.tick_count as i64
        }
    }
}

// ─── Runner Error ───────────────────────────────────────────────────

/// Errors during RT setup or tick execution.
#[derive(Debug)]
pub enum RunnerError {
    /// RT system call failed.
    RtSetup(String),
    /// Board driver failure.
    Driver(HalError),
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RtSetup(msg) => write!(f, "RT setup error: {msg}"),
            Self::Driver(e) => write!(f, "driver error: {e}"),
        }
    }
}

impl std::error::Error for RunnerError {}

impl From<HalError> for RunnerError {
    fn from(e: HalError) -> Self {
        Self::Driver(e)
    }
}

// ─── RT Setup ───────────────────────────────────────────────────────

/// Lock all current and future memory pages (prevent page faults in the loop).
///
/// No-op when the `rt` feature is not enabled.
#[cfg(feature = "rt")]
fn rt_mlockall() -> Result<(), RunnerError> {
    use nix::sys::mman::{MlockallFlags, mlockall};
    mlockall(MlockallFlags::MCL_CURRENT | MlockallFlags::MCL_FUTURE)
        .map_err(|e| RunnerError::RtSetup(format!("mlockall failed: {e}")))?;
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_mlockall() -> Result<(), RunnerError> {
    Ok(()) // No-op in simulation mode
}

/// Prefault stack pages to prevent page faults during the tick loop.
fn prefault_stack() {
    // Touch 256 KB of stack to prefault pages.
    let mut buf = [0u8; 256 * 1024];
    // Prevent the compiler from optimizing away the write.
    for byte in buf.iter_mut() {
        unsafe { core::ptr::write_volatile(byte, 0xFF) };
    }
    core::hint::black_box(&buf);
}

/// Pin the current thread to a specific CPU core.
///
/// No-op when the `rt` feature is not enabled.
#[cfg(feature = "rt")]
fn rt_set_affinity(cpu: usize) -> Result<(), RunnerError> {
    use nix::sched::{CpuSet, sched_setaffinity};
    use nix::unistd::Pid;

    let mut cpuset = CpuSet::new();
    cpuset
        .set(cpu)
        .map_err(|e| RunnerError::RtSetup(format!("CpuSet::set({cpu}) failed: {e}")))?;
    sched_setaffinity(Pid::from_raw(0), &cpuset)
        .map_err(|e| RunnerError::RtSetup(format!("sched_setaffinity failed: {e}")))?;
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_set_affinity(_cpu: usize) -> Result<(), RunnerError> {
    Ok(()) // No-op in simulation mode
}

/// Set SCHED_FIFO with the given RT priority.
///
/// No-op when the `rt` feature is not enabled.
#[cfg(feature = "rt")]
fn rt_set_scheduler(priority: i32) -> Result<(), RunnerError> {
    let param = libc::sched_param {
        sched_priority: priority,
    };
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(RunnerError::RtSetup(format!(
            "sched_setscheduler(SCHED_FIFO, {priority}) failed: {err}"
        )));
    }
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_set_scheduler(_priority: i32) -> Result<(), RunnerError> {
    Ok(()) // No-op in simulation mode
}

/// Perform the full RT setup sequence.
///
/// Must be called before entering the tick loop. In simulation mode (no
/// `rt` feature), all RT calls are no-ops.
pub fn rt_setup(cpu_core: usize, rt_priority: i32) -> Result<(), RunnerError> {
    // 1. Lock all memory pages.
    rt_mlockall()?;

    // 2. Prefault stack pages.
    prefault_stack();

    // 3. Pin to CPU core.
    rt_set_affinity(cpu_core)?;

    // 4. Set RT scheduler.
    rt_set_scheduler(rt_priority)?;

    Ok(())
}

// ─── Tick Runner ────────────────────────────────────────────────────

/// The main fixed-interval tick runner.
///
/// Owns the controller core, the feedback panel, and the board driver.
/// `run()` drives the loop until the stop flag clears or the optional
/// duration budget is spent.
pub struct TickRunner {
    /// Loaded & validated configuration.
    pub config: LoadedConfig,
    controller: CycleController,
    panel: Panel,
    driver: Box<dyn BoardDriver>,
    stats: TickStats,
    /// Configured tick interval [ns].
    tick_interval_ns: i64,
}

impl TickRunner {
    /// Create a runner and initialize the driver.
    ///
    /// The controller timeline starts at 0 and maps to the monotonic clock
    /// at the instant `run()` is entered.
    pub fn new(config: LoadedConfig, mut driver: Box<dyn BoardDriver>) -> Result<Self, RunnerError> {
        driver.init()?;
        info!(
            "Board driver '{}' v{} initialized",
            driver.name(),
            driver.version()
        );
        let controller = CycleController::new(&config.controller, config.thresholds, 0);
        let tick_interval_ns = config.controller.tick_interval_ms as i64 * 1_000_000;
        Ok(Self {
            config,
            controller,
            panel: Panel::new(),
            driver,
            stats: TickStats::new(),
            tick_interval_ns,
        })
    }

    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// Enter the tick loop.
    ///
    /// Runs until `running` clears, or `duration_ms` of controller time has
    /// elapsed when given. Shuts the driver down and logs a timing summary
    /// on the way out.
    pub fn run(
        &mut self,
        running: &AtomicBool,
        duration_ms: Option<u32>,
    ) -> Result<(), RunnerError> {
        // Power-on output baseline before the first tick.
        let outputs = self
            .panel
            .outputs(self.controller.state(), self.controller.door());
        self.driver.apply(&outputs)?;

        #[cfg(feature = "rt")]
        {
            self.run_rt_loop(running, duration_ms)?;
        }

        #[cfg(not(feature = "rt"))]
        {
            self.run_sim_loop(running, duration_ms)?;
        }

        self.driver.shutdown()?;
        info!(
            "Tick loop done: {} ticks, avg {} ns, max {} ns, {} overruns",
            self.stats.tick_count,
            self.stats.avg_tick_ns(),
            self.stats.max_tick_ns,
            self.stats.overruns
        );
        Ok(())
    }

    /// RT tick loop using `clock_nanosleep(TIMER_ABSTIME)`.
    #[cfg(feature = "rt")]
    fn run_rt_loop(
        &mut self,
        running: &AtomicBool,
        duration_ms: Option<u32>,
    ) -> Result<(), RunnerError> {
        use nix::time::{ClockId, ClockNanosleepFlags, clock_gettime, clock_nanosleep};

        let clock = ClockId::CLOCK_MONOTONIC;
        let origin = clock_gettime(clock)
            .map_err(|e| RunnerError::RtSetup(format!("clock_gettime: {e}")))?;
        let mut next_wake = origin;

        while running.load(Ordering::SeqCst) {
            next_wake = timespec_add_ns(next_wake, self.tick_interval_ns);

            let tick_start = clock_gettime(clock)
                .map_err(|e| RunnerError::RtSetup(format!("clock_gettime: {e}")))?;
            let wake_latency_ns = timespec_diff_ns(&tick_start, &next_wake).abs();
            let now_ms = (timespec_diff_ns(&tick_start, &origin) / 1_000_000) as Millis;
            if let Some(limit) = duration_ms {
                if now_ms >= limit {
                    break;
                }
            }

            self.tick_body(now_ms)?;

            let tick_end = clock_gettime(clock)
                .map_err(|e| RunnerError::RtSetup(format!("clock_gettime: {e}")))?;
            let duration_ns = timespec_diff_ns(&tick_end, &tick_start);
            self.stats.record(duration_ns, wake_latency_ns);

            if duration_ns > self.tick_interval_ns {
                self.stats.overruns += 1;
                warn!(
                    "Tick overrun: {duration_ns}ns > {}ns budget",
                    self.tick_interval_ns
                );
            }

            // Sleep until the next tick boundary (absolute time).
            let _ = clock_nanosleep(clock, ClockNanosleepFlags::TIMER_ABSTIME, &next_wake);
        }
        Ok(())
    }

    /// Simulation tick loop using `std::thread::sleep`.
    #[cfg(not(feature = "rt"))]
    fn run_sim_loop(
        &mut self,
        running: &AtomicBool,
        duration_ms: Option<u32>,
    ) -> Result<(), RunnerError> {
        use std::time::Instant;

        let tick_duration =
            std::time::Duration::from_millis(self.config.controller.tick_interval_ms as u64);
        let started = Instant::now();

        while running.load(Ordering::SeqCst) {
            // Truncation wraps after ~49.7 days, same as the controller
            // timeline.
            let now_ms = started.elapsed().as_millis() as Millis;
            if let Some(limit) = duration_ms {
                if now_ms >= limit {
                    break;
                }
            }

            let tick_start = Instant::now();
            self.tick_body(now_ms)?;
            let elapsed = tick_start.elapsed();
            let duration_ns = elapsed.as_nanos() as i64;
            self.stats.record(duration_ns, 0);

            if duration_ns > self.tick_interval_ns {
                self.stats.overruns += 1;
                warn!(
                    "Tick overrun: {duration_ns}ns > {}ns budget",
                    self.tick_interval_ns
                );
            }

            // Sleep for the remaining interval.
            if let Some(remaining) = tick_duration.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }
        Ok(())
    }

    /// One tick: poll inputs, advance the controller, render, apply.
    fn tick_body(&mut self, now_ms: Millis) -> Result<(), RunnerError> {
        let inputs = self.driver.poll(now_ms)?;
        let outcome = self.controller.tick(now_ms, &inputs);
        self.panel.apply(&outcome);
        let outputs = self.panel.outputs(outcome.state, outcome.door);
        self.driver.apply(&outputs)?;
        Ok(())
    }
}

// ─── Time Helpers ───────────────────────────────────────────────────

/// Add nanoseconds to a TimeSpec.
#[cfg(feature = "rt")]
fn timespec_add_ns(ts: nix::sys::time::TimeSpec, ns: i64) -> nix::sys::time::TimeSpec {
    use nix::sys::time::TimeSpec;
    let mut secs = ts.tv_sec();
    let mut nanos = ts.tv_nsec() + ns;
    while nanos >= 1_000_000_000 {
        secs += 1;
        nanos -= 1_000_000_000;
    }
    while nanos < 0 {
        secs -= 1;
        nanos += 1_000_000_000;
    }
    TimeSpec::new(secs, nanos)
}

/// Compute the difference (a - b) in nanoseconds.
#[cfg(feature = "rt")]
fn timespec_diff_ns(a: &nix::sys::time::TimeSpec, b: &nix::sys::time::TimeSpec) -> i64 {
    (a.tv_sec() - b.tv_sec()) * 1_000_000_000 + (a.tv_nsec() - b.tv_nsec())
}

// ─── Tests ──────────────────────────────────────────────────────────
