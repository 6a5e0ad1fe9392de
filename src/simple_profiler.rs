//! Simple profiling guards using thread-local storage
//!
//! Lightweight timing of the engine's hot paths without changing function signatures.
//! Enable with environment variable: SNAKE_AGENT_PROFILE=1

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

/// Profiled code regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    FloodFill,
    Pathfind,
    TargetSelect,
    Fallback,
    Decide,
}

const CATEGORY_COUNT: usize = 5;

impl Category {
    fn index(self) -> usize {
        match self {
            Category::FloodFill => 0,
            Category::Pathfind => 1,
            Category::TargetSelect => 2,
            Category::Fallback => 3,
            Category::Decide => 4,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Category::FloodFill => "Flood Fill",
            Category::Pathfind => "Pathfinding",
            Category::TargetSelect => "Target Selection",
            Category::Fallback => "Safest Direction",
            Category::Decide => "Whole Decision",
        }
    }

    fn all() -> [Category; CATEGORY_COUNT] {
        [
            Category::FloodFill,
            Category::Pathfind,
            Category::TargetSelect,
            Category::Fallback,
            Category::Decide,
        ]
    }
}

thread_local! {
    static LOCAL_TIME: RefCell<[u64; CATEGORY_COUNT]> = RefCell::new([0; CATEGORY_COUNT]);
    static LOCAL_COUNT: RefCell<[usize; CATEGORY_COUNT]> = RefCell::new([0; CATEGORY_COUNT]);
}

// Global aggregators
#[allow(clippy::declare_interior_mutable_const)]
const ZERO_U64: AtomicU64 = AtomicU64::new(0);
#[allow(clippy::declare_interior_mutable_const)]
const ZERO_USIZE: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_TIME: [AtomicU64; CATEGORY_COUNT] = [ZERO_U64; CATEGORY_COUNT];
static GLOBAL_COUNT: [AtomicUsize; CATEGORY_COUNT] = [ZERO_USIZE; CATEGORY_COUNT];

#[inline]
pub fn is_profiling_enabled() -> bool {
    std::env::var("SNAKE_AGENT_PROFILE").is_ok()
}

pub struct ProfileGuard {
    start: Instant,
    category: Category,
}

impl ProfileGuard {
    pub fn new(category: Category) -> Option<Self> {
        if is_profiling_enabled() {
            Some(ProfileGuard {
                start: Instant::now(),
                category,
            })
        } else {
            None
        }
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;
        let idx = self.category.index();

        LOCAL_TIME.with(|t| t.borrow_mut()[idx] += elapsed_ns);
        LOCAL_COUNT.with(|c| c.borrow_mut()[idx] += 1);
    }
}

/// Moves this thread's counters into the global aggregators
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    LOCAL_TIME.with(|t| {
        let mut t = t.borrow_mut();
        for (idx, value) in t.iter_mut().enumerate() {
            GLOBAL_TIME[idx].fetch_add(*value, Ordering::Relaxed);
            *value = 0;
        }
    });
    LOCAL_COUNT.with(|c| {
        let mut c = c.borrow_mut();
        for (idx, value) in c.iter_mut().enumerate() {
            GLOBAL_COUNT[idx].fetch_add(*value, Ordering::Relaxed);
            *value = 0;
        }
    });
}

/// Total (nanoseconds, calls) merged so far for a category
pub fn totals(category: Category) -> (u64, usize) {
    let idx = category.index();
    (
        GLOBAL_TIME[idx].load(Ordering::Relaxed),
        GLOBAL_COUNT[idx].load(Ordering::Relaxed),
    )
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 PERFORMANCE PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    for category in Category::all() {
        let (time, count) = totals(category);
        let ms = time as f64 / 1_000_000.0;
        let pct = if total_ns > 0 { 100.0 * time as f64 / total_ns as f64 } else { 0.0 };
        let avg_us = if count > 0 { time as f64 / (count * 1000) as f64 } else { 0.0 };

        eprintln!("{}:", category.label());
        eprintln!("  Time:     {:.2}ms ({:.1}%)", ms, pct);
        eprintln!("  Calls:    {}", count);
        eprintln!("  Avg:      {:.2}µs/call\n", avg_us);
    }

    eprintln!("═══════════════════════════════════════════════════════════\n");
}

#[macro_export]
macro_rules! profile {
    ($category:expr, $code:block) => {{
        let _guard = $crate::simple_profiler::ProfileGuard::new($category);
        $code
    }};
}
