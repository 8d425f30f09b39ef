//! Per-run operation counters, shared across workers via plain atomics.
//! Grounded in the source's `Report` struct; this rewrite keeps only the
//! three counters the external result record (`takes`, `puts`, `steals`)
//! actually needs — the source's min/max/avg steal-timing fields are not
//! reproduced since `SPEC_FULL.md`'s result record has no place for them
//! and `stealTime`/`allTime` remain unimplemented toggles kept only for
//! JSON compatibility.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct Report {
    takes: AtomicU64,
    puts: AtomicU64,
    steals: AtomicU64,
}

impl Report {
    pub fn new() -> Self {
        Report::default()
    }

    pub fn record_take(&self) {
        self.takes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_steal(&self) {
        self.steals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn takes(&self) -> u64 {
        self.takes.load(Ordering::Relaxed)
    }

    pub fn puts(&self) -> u64 {
        self.puts.load(Ordering::Relaxed)
    }

    pub fn steals(&self) -> u64 {
        self.steals.load(Ordering::Relaxed)
    }
}
