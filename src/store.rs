use crate::dates::today;
use crate::errors::StoreError;
use crate::history::{self, HistoryRow};
use crate::models::{CheckIn, RecordOutcome};
use crate::registry::{PrayerType, PrayerTypeRegistry};
use crate::storage::{BlobStore, get_json, set_json};
use crate::streak;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, btree_map::Entry};
use tracing::{info, warn};

pub const CHECKINS_KEY: &str = "checkins";
pub const PRAYER_TYPES_KEY: &str = "prayerTypes";
pub const BLOB_KEYS: [&str; 2] = [CHECKINS_KEY, PRAYER_TYPES_KEY];

/// Owns the check-in collection and prayer type registry and writes every
/// change through to its backend. Derived values are recomputed per call.
pub struct CheckInStore<B> {
    backend: B,
    check_ins: BTreeMap<NaiveDate, CheckIn>,
    prayer_types: PrayerTypeRegistry,
}

impl<B: BlobStore> CheckInStore<B> {
    pub fn open(backend: B) -> Self {
        let stored: Vec<serde_json::Value> = get_json(&backend, CHECKINS_KEY, Vec::new());
        let mut check_ins = BTreeMap::new();
        for entry in stored {
            let check_in: CheckIn = match serde_json::from_value(entry) {
                Ok(check_in) => check_in,
                Err(err) => {
                    warn!("dropping unreadable stored check-in: {err}");
                    continue;
                }
            };
            match check_ins.entry(check_in.date) {
                Entry::Vacant(slot) => {
                    slot.insert(check_in);
                }
                Entry::Occupied(_) => warn!("ignoring duplicate stored check-in for {}", check_in.date),
            }
        }

        let names: Option<Vec<String>> = get_json(&backend, PRAYER_TYPES_KEY, None);
        let prayer_types = names
            .map(PrayerTypeRegistry::from_names)
            .unwrap_or_default();

        info!(
            "loaded {} check-ins and {} prayer types",
            check_ins.len(),
            prayer_types.as_slice().len()
        );

        Self {
            backend,
            check_ins,
            prayer_types,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn record_check_in(
        &mut self,
        prayer_type: Option<PrayerType>,
    ) -> Result<RecordOutcome, StoreError> {
        self.record_check_in_at(today(), Utc::now(), prayer_type)
    }

    /// Records `today` unless it already has a check-in; the first one of
    /// the day is kept as is.
    pub fn record_check_in_at(
        &mut self,
        today: NaiveDate,
        now: DateTime<Utc>,
        prayer_type: Option<PrayerType>,
    ) -> Result<RecordOutcome, StoreError> {
        if let Some(existing) = self.check_ins.get(&today) {
            return Ok(RecordOutcome::AlreadyCheckedIn(existing.clone()));
        }

        let check_in = CheckIn {
            date: today,
            prayer_type,
            checked_in_at: now,
        };
        let mut next = self.check_ins.clone();
        next.insert(today, check_in.clone());
        self.write_check_ins(&next)?;
        self.check_ins = next;

        info!(
            "checked in for {today} ({})",
            check_in
                .prayer_type
                .as_ref()
                .map_or("untagged", PrayerType::as_str)
        );
        Ok(RecordOutcome::Recorded(check_in))
    }

    /// All check-ins, newest first.
    pub fn history(&self, limit: Option<usize>) -> Vec<CheckIn> {
        let newest_first = self.check_ins.values().rev().cloned();
        match limit {
            Some(limit) => newest_first.take(limit).collect(),
            None => newest_first.collect(),
        }
    }

    pub fn check_in_on(&self, day: NaiveDate) -> Option<&CheckIn> {
        self.check_ins.get(&day)
    }

    pub fn today_check_in(&self) -> Option<&CheckIn> {
        self.check_in_on(today())
    }

    pub fn is_checked_in_today(&self) -> bool {
        self.is_checked_in_on(today())
    }

    pub fn is_checked_in_on(&self, day: NaiveDate) -> bool {
        self.check_ins.contains_key(&day)
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak_at(today())
    }

    pub fn current_streak_at(&self, today: NaiveDate) -> u32 {
        let days_desc: Vec<NaiveDate> = self.check_ins.keys().rev().copied().collect();
        streak::current_streak_at(today, &days_desc)
    }

    pub fn longest_streak(&self) -> u32 {
        let days_asc: Vec<NaiveDate> = self.check_ins.keys().copied().collect();
        streak::longest_streak(&days_asc)
    }

    pub fn calendar(&self, days: u32) -> Vec<HistoryRow> {
        self.calendar_at(today(), days)
    }

    pub fn calendar_at(&self, today: NaiveDate, days: u32) -> Vec<HistoryRow> {
        history::project_at(today, days, self.check_ins.values())
    }

    pub fn prayer_types(&self) -> &[PrayerType] {
        self.prayer_types.as_slice()
    }

    /// Returns whether the registry changed.
    pub fn add_prayer_type(&mut self, prayer_type: PrayerType) -> Result<bool, StoreError> {
        let mut next = self.prayer_types.clone();
        if !next.add(prayer_type) {
            return Ok(false);
        }
        self.write_prayer_types(next)?;
        Ok(true)
    }

    /// Returns whether the registry changed. Check-ins tagged with the type keep their tag.
    pub fn remove_prayer_type(&mut self, prayer_type: &PrayerType) -> Result<bool, StoreError> {
        let mut next = self.prayer_types.clone();
        if !next.remove(prayer_type) {
            return Ok(false);
        }
        self.write_prayer_types(next)?;
        Ok(true)
    }

    /// Wipes the backend and every check-in, and restores the default prayer types.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.backend.clear_all()?;
        self.check_ins.clear();
        self.prayer_types = PrayerTypeRegistry::default();
        info!("all data reset");
        Ok(())
    }

    fn write_check_ins(&mut self, check_ins: &BTreeMap<NaiveDate, CheckIn>) -> Result<(), StoreError> {
        let newest_first: Vec<&CheckIn> = check_ins.values().rev().collect();
        set_json(&mut self.backend, CHECKINS_KEY, &newest_first)
    }

    fn write_prayer_types(&mut self, next: PrayerTypeRegistry) -> Result<(), StoreError> {
        set_json(&mut self.backend, PRAYER_TYPES_KEY, next.as_slice())?;
        self.prayer_types = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DEFAULT_PRAYER_TYPES;
    use crate::storage::MemoryStore;
    use std::io;

    fn day(value: &str) -> NaiveDate {
        crate::dates::parse_day(value).unwrap()
    }

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    fn pt(name: &str) -> PrayerType {
        PrayerType::new(name).unwrap()
    }

    fn empty_store() -> CheckInStore<MemoryStore> {
        CheckInStore::open(MemoryStore::new())
    }

    /// Accepts reads, fails every write.
    struct ReadOnlyStore(MemoryStore);

    impl BlobStore for ReadOnlyStore {
        fn get_blob(&self, key: &str) -> Option<String> {
            self.0.get_blob(key)
        }

        fn set_blob(&mut self, _key: &str, _value: String) -> Result<(), StoreError> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into())
        }

        fn clear_all(&mut self) -> Result<(), StoreError> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[test]
    fn second_check_in_same_day_keeps_the_first() {
        let mut store = empty_store();
        let today = day("2024-01-05");

        let first = store
            .record_check_in_at(today, at(1_000), Some(pt("rosary")))
            .unwrap();
        assert!(first.is_new());

        let second = store
            .record_check_in_at(today, at(2_000), Some(pt("mass")))
            .unwrap();
        assert!(!second.is_new());
        assert_eq!(second.check_in(), first.check_in());

        let history = store.history(None);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].prayer_type, Some(pt("rosary")));
        assert_eq!(history[0].checked_in_at, at(1_000));
    }

    #[test]
    fn dates_stay_unique_across_many_calls() {
        let mut store = empty_store();
        for (i, date) in ["2024-01-01", "2024-01-02", "2024-01-01", "2024-01-02", "2024-01-03"]
            .into_iter()
            .enumerate()
        {
            store.record_check_in_at(day(date), at(i as i64), None).unwrap();
        }
        let mut dates: Vec<NaiveDate> = store.history(None).iter().map(|c| c.date).collect();
        assert_eq!(dates.len(), 3);
        dates.dedup();
        assert_eq!(dates.len(), 3);
    }

    #[test]
    fn history_is_newest_first_and_limited() {
        let mut store = empty_store();
        for date in ["2024-01-02", "2024-01-04", "2024-01-03"] {
            store.record_check_in_at(day(date), at(0), None).unwrap();
        }

        let dates: Vec<NaiveDate> = store.history(None).iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![day("2024-01-04"), day("2024-01-03"), day("2024-01-02")]);
        assert_eq!(store.history(Some(2)).len(), 2);
        assert_eq!(store.history(Some(2))[0].date, day("2024-01-04"));
        assert_eq!(store.history(Some(10)).len(), 3);
    }

    #[test]
    fn streaks_are_derived_from_recorded_days() {
        let mut store = empty_store();
        for date in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-05", "2024-01-06"] {
            store.record_check_in_at(day(date), at(0), None).unwrap();
        }

        assert_eq!(store.longest_streak(), 3);
        assert_eq!(store.current_streak_at(day("2024-01-06")), 2);
        assert_eq!(store.current_streak_at(day("2024-01-07")), 2);
        assert_eq!(store.current_streak_at(day("2024-01-08")), 0);
        assert!(store.is_checked_in_on(day("2024-01-06")));
        assert!(!store.is_checked_in_on(day("2024-01-04")));
    }

    #[test]
    fn reopening_reproduces_the_collection() {
        let mut store = empty_store();
        store
            .record_check_in_at(day("2024-01-04"), at(1_704_355_200_000), Some(pt("scripture")))
            .unwrap();
        store
            .record_check_in_at(day("2024-01-05"), at(1_704_441_600_123), None)
            .unwrap();
        store.add_prayer_type(pt("vespers")).unwrap();

        let reopened = CheckInStore::open(store.backend().clone());
        assert_eq!(reopened.history(None), store.history(None));
        assert_eq!(reopened.prayer_types(), store.prayer_types());
    }

    #[test]
    fn check_ins_are_persisted_newest_first() {
        let mut store = empty_store();
        store.record_check_in_at(day("2024-01-04"), at(5), None).unwrap();
        store.record_check_in_at(day("2024-01-05"), at(6), Some(pt("mass"))).unwrap();

        let raw = store.backend().get_blob(CHECKINS_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"date": "2024-01-05", "prayerType": "mass", "checkedInAt": 6},
                {"date": "2024-01-04", "checkedInAt": 5}
            ])
        );
    }

    #[test]
    fn garbage_in_storage_falls_back_to_defaults() {
        let mut backend = MemoryStore::new();
        backend.set_blob(CHECKINS_KEY, "not json".to_string()).unwrap();
        backend.set_blob(PRAYER_TYPES_KEY, "{\"oops\":1}".to_string()).unwrap();

        let store = CheckInStore::open(backend);
        assert!(store.history(None).is_empty());
        assert_eq!(store.prayer_types(), PrayerTypeRegistry::default().as_slice());
    }

    #[test]
    fn stored_duplicates_keep_the_first_entry() {
        let mut backend = MemoryStore::new();
        backend
            .set_blob(
                CHECKINS_KEY,
                r#"[{"date":"2024-01-05","prayerType":"mass","checkedInAt":2},
                    {"date":"2024-01-05","checkedInAt":1}]"#
                    .to_string(),
            )
            .unwrap();

        let store = CheckInStore::open(backend);
        let history = store.history(None);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].prayer_type, Some(pt("mass")));
    }

    #[test]
    fn clock_reading_accessors_follow_the_local_day() {
        let mut store = empty_store();
        assert!(!store.is_checked_in_today());
        assert!(store.today_check_in().is_none());
        assert_eq!(store.current_streak(), 0);

        store.record_check_in(Some(pt("rosary"))).unwrap();

        assert!(store.is_checked_in_today());
        assert_eq!(
            store.today_check_in().and_then(|c| c.prayer_type.clone()),
            Some(pt("rosary"))
        );
        assert_eq!(store.current_streak(), 1);
        assert_eq!(store.longest_streak(), 1);
    }

    #[test]
    fn one_bad_stored_entry_does_not_lose_the_rest() {
        let mut backend = MemoryStore::new();
        backend
            .set_blob(
                CHECKINS_KEY,
                r#"[{"date":"2024-01-05","checkedInAt":1},
                    {"date":"2024-01-04","prayerType":"mass","checkedInAt":0},
                    {"date":"2024-13-01","checkedInAt":0},
                    {"checkedInAt":3}]"#
                    .to_string(),
            )
            .unwrap();

        let mut store = CheckInStore::open(backend);
        assert_eq!(store.history(None).len(), 2);

        store.record_check_in_at(day("2024-01-06"), at(2), None).unwrap();

        let stored: Vec<CheckIn> = get_json(store.backend(), CHECKINS_KEY, Vec::new());
        let dates: Vec<NaiveDate> = stored.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![day("2024-01-06"), day("2024-01-05"), day("2024-01-04")]);
        assert_eq!(stored[2].prayer_type, Some(pt("mass")));
        assert_eq!(store.longest_streak(), 3);
    }

    #[test]
    fn stored_empty_registry_stays_empty() {
        let mut backend = MemoryStore::new();
        backend.set_blob(PRAYER_TYPES_KEY, "[]".to_string()).unwrap();
        let store = CheckInStore::open(backend);
        assert!(store.prayer_types().is_empty());
    }

    #[test]
    fn registry_changes_are_persisted() {
        let mut store = empty_store();
        assert!(store.add_prayer_type(pt("vespers")).unwrap());
        assert!(!store.add_prayer_type(pt("vespers")).unwrap());
        assert!(store.remove_prayer_type(&pt("mass")).unwrap());
        assert!(!store.remove_prayer_type(&pt("compline")).unwrap());

        let stored: Vec<String> = get_json(store.backend(), PRAYER_TYPES_KEY, Vec::new());
        assert_eq!(stored, vec!["rosary", "scripture", "adoration", "vespers"]);
    }

    #[test]
    fn removing_a_type_leaves_tagged_check_ins_alone() {
        let mut store = empty_store();
        store
            .record_check_in_at(day("2024-01-05"), at(0), Some(pt("mass")))
            .unwrap();
        store.remove_prayer_type(&pt("mass")).unwrap();

        assert!(!store.prayer_types().contains(&pt("mass")));
        assert_eq!(store.history(None)[0].prayer_type, Some(pt("mass")));
    }

    #[test]
    fn reset_clears_everything_and_restores_defaults() {
        let mut store = empty_store();
        store.record_check_in_at(day("2024-01-05"), at(0), None).unwrap();
        store.add_prayer_type(pt("vespers")).unwrap();

        store.reset().unwrap();

        assert!(store.history(None).is_empty());
        assert_eq!(store.longest_streak(), 0);
        let names: Vec<&str> = store.prayer_types().iter().map(PrayerType::as_str).collect();
        assert_eq!(names, DEFAULT_PRAYER_TYPES.to_vec());
        assert_eq!(store.backend().get_blob(CHECKINS_KEY), None);
        assert_eq!(store.backend().get_blob(PRAYER_TYPES_KEY), None);
    }

    #[test]
    fn failed_writes_leave_state_untouched() {
        let mut store = CheckInStore::open(ReadOnlyStore(MemoryStore::new()));

        let err = store.record_check_in_at(day("2024-01-05"), at(0), None);
        assert!(matches!(err, Err(StoreError::Io(_))));
        assert!(!store.is_checked_in_on(day("2024-01-05")));

        assert!(store.add_prayer_type(pt("vespers")).is_err());
        assert!(!store.prayer_types().contains(&pt("vespers")));

        assert!(store.remove_prayer_type(&pt("mass")).is_err());
        assert!(store.prayer_types().contains(&pt("mass")));
    }

    #[test]
    fn calendar_reflects_recorded_days() {
        let mut store = empty_store();
        store
            .record_check_in_at(day("2024-01-05"), at(0), Some(pt("rosary")))
            .unwrap();

        let rows = store.calendar_at(day("2024-01-05"), 2);
        match &rows[1] {
            HistoryRow::Day(first) => {
                assert!(first.checked);
                assert_eq!(first.prayer_label.as_deref(), Some("Rosary"));
            }
            other => panic!("expected a day row, got {other:?}"),
        }
    }
}
