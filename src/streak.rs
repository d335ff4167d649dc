use crate::date_key::DateKey;
use crate::models::DerivedStats;
use crate::records::RecordStore;

pub fn build_stats(store: &RecordStore) -> DerivedStats {
    build_stats_at(&DateKey::today(), store)
}

pub fn build_stats_at(today: &DateKey, store: &RecordStore) -> DerivedStats {
    DerivedStats {
        today: today.clone(),
        total_count: total_count(store),
        current_streak: current_streak(store, today),
        longest_streak: longest_streak(store),
        completed_today: store.contains(today),
    }
}

/// Consecutive completed days ending today, or ending yesterday while today
/// is still open.
pub fn current_streak(store: &RecordStore, today: &DateKey) -> u32 {
    let mut cursor = if store.contains(today) {
        Some(today.clone())
    } else {
        today.previous()
    };

    // A run can never be longer than the number of records.
    let cap = store.total_count() + 2;
    let mut streak = 0u32;
    for _ in 0..cap {
        match cursor {
            Some(day) if store.contains(&day) => {
                streak += 1;
                cursor = day.previous();
            }
            _ => break,
        }
    }
    streak
}

pub fn total_count(store: &RecordStore) -> usize {
    store.total_count()
}

/// Longest run of consecutive days anywhere in the history.
pub fn longest_streak(store: &RecordStore) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut last: Option<&DateKey> = None;

    for day in store.iter() {
        let follows = last
            .and_then(|prev| prev.date().succ_opt())
            .is_some_and(|next| next == day.date());
        run = if follows { run + 1 } else { 1 };
        longest = longest.max(run);
        last = Some(day);
    }
    longest
}
