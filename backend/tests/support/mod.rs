//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use oee_rust::db::LocalRepository;
use oee_rust::models::RawRecord;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// 2024-03-01 at `h:m`.
pub fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

/// A day shift on `LINE-1`:
///
/// - 08:00-09:00: model `A` (target 120/h), 100 pass and 20 fail, every 30 s
/// - 09:00-10:00: model `B` without a target, 40 pass
/// - 10:00-10:30: model `A`, 45 pass and 15 fail, every 30 s
///
/// `LINE-2` gets a single record so unit listings have two entries.
pub fn day_shift_repository() -> LocalRepository {
    let repo = LocalRepository::new();

    for i in 0..120 {
        let record = if i % 6 == 5 {
            RawRecord::fail("A", Some(120.0))
        } else {
            RawRecord::pass("A", Some(120.0))
        };
        repo.insert("LINE-1", at(8, 0) + Duration::seconds(30 * i), record);
    }
    for i in 0..40 {
        repo.insert("LINE-1", at(9, 0) + Duration::seconds(90 * i), RawRecord::pass("B", None));
    }
    for i in 0..60 {
        let record = if i % 4 == 3 {
            RawRecord::fail("A", Some(120.0))
        } else {
            RawRecord::pass("A", Some(120.0))
        };
        repo.insert("LINE-1", at(10, 0) + Duration::seconds(30 * i), record);
    }
    repo.insert("LINE-2", at(8, 30), RawRecord::pass("C", Some(10.0)));

    repo
}

/// Runs `f` with environment variables temporarily modified.
///
/// Access to the process environment is serialized and the previous values
/// are restored even if `f` panics.
///
/// `Some(v)` sets a variable, `None` removes it.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::apply(changes);
    f()
}

struct ScopedEnv {
    previous: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let previous = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (key, value) in changes {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }

        Self { previous }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            match value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
    }
}
