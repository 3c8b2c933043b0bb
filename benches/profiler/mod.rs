// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::str::FromStr;
use std::time::Duration;

use criterion::Criterion;

use pprof::criterion::{Output, PProfProfiler};

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Criterion tuned by `FISHBONE_BENCH_*` variables; flamegraphs unless `FISHBONE_BENCH_PROFILE=0`.
pub fn criterion() -> Criterion {
    let sample_size = env_or("FISHBONE_BENCH_SAMPLE_SIZE", 50_usize).clamp(10, 200);
    let warmup = env_or("FISHBONE_BENCH_WARMUP_SECS", 2_u64).clamp(1, 60);
    let measurement = env_or("FISHBONE_BENCH_MEASUREMENT_SECS", 4_u64).clamp(1, 120);

    let criterion = Criterion::default()
        .sample_size(sample_size)
        .warm_up_time(Duration::from_secs(warmup))
        .measurement_time(Duration::from_secs(measurement));

    let frequency = env_or("FISHBONE_BENCH_PROFILE", 100_i32);
    if frequency <= 0 {
        return criterion;
    }
    criterion.with_profiler(PProfProfiler::new(frequency.min(1000), Output::Flamegraph(None)))
}
