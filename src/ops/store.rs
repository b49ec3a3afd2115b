use uuid::Uuid;

use crate::io::persist::{Persistence, STORE_KEY};
use crate::io::recovery::{RecoveryCategory, RecoveryEntry};
use crate::model::day::Day;
use crate::model::task::{Priority, Task, TaskPatch, normalize_text};
use crate::model::week::Week;

use super::clock::Clock;

/// A committed mutation, delivered to observers after it has been saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Added { day: Day, id: Uuid },
    Toggled { day: Day, id: Uuid, completed: bool },
    Updated { day: Day, id: Uuid },
    Deleted { day: Day, id: Uuid },
    ClearedCompleted { day: Day, removed: usize },
    ClearedDay { day: Day, removed: usize },
}

impl StoreEvent {
    pub fn day(&self) -> Day {
        match self {
            StoreEvent::Added { day, .. }
            | StoreEvent::Toggled { day, .. }
            | StoreEvent::Updated { day, .. }
            | StoreEvent::Deleted { day, .. }
            | StoreEvent::ClearedCompleted { day, .. }
            | StoreEvent::ClearedDay { day, .. } => *day,
        }
    }
}

/// Observer callback, invoked synchronously for every committed mutation
pub type Observer = Box<dyn FnMut(&StoreEvent) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// How the initial load went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored yet
    Fresh,
    /// Stored collection loaded
    Loaded { tasks: usize },
    /// Stored data unusable; started empty. The raw data went to the recovery log.
    Recovered { reason: String },
}

/// A store whose initial load has not run yet. Only `finish` is available,
/// so no task can be read before the collection exists.
pub struct LoadingStore {
    persistence: Box<dyn Persistence>,
    clock: Box<dyn Clock>,
}

impl LoadingStore {
    /// Load the collection and hand back the ready store. Never fails: unusable
    /// data yields an empty week.
    pub fn finish(self) -> TaskStore {
        let (week, outcome) = load_week(self.persistence.as_ref());
        TaskStore {
            week,
            persistence: self.persistence,
            clock: self.clock,
            observers: Vec::new(),
            next_subscription: 0,
            last_save_error: None,
            load_outcome: outcome,
        }
    }
}

fn load_week(persistence: &dyn Persistence) -> (Week, LoadOutcome) {
    match persistence.load(STORE_KEY) {
        Ok(None) => (Week::new(), LoadOutcome::Fresh),
        Ok(Some(blob)) => match Week::from_json(&blob) {
            Ok(week) => {
                let tasks = week.len();
                (week, LoadOutcome::Loaded { tasks })
            }
            Err(e) => {
                persistence.record(
                    RecoveryEntry::new(RecoveryCategory::Load, "malformed task document")
                        .field("Key", STORE_KEY)
                        .field("Error", e.to_string())
                        .body(blob),
                );
                (
                    Week::new(),
                    LoadOutcome::Recovered {
                        reason: format!("malformed data: {}", e),
                    },
                )
            }
        },
        Err(e) => {
            persistence.record(
                RecoveryEntry::new(RecoveryCategory::Load, "task document unreadable")
                    .field("Key", STORE_KEY)
                    .field("Error", e.to_string()),
            );
            (
                Week::new(),
                LoadOutcome::Recovered {
                    reason: format!("could not read data: {}", e),
                },
            )
        }
    }
}

/// The single owner of every task. All operations are synchronous; a mutation
/// is saved and observers are notified before the call returns.
pub struct TaskStore {
    week: Week,
    persistence: Box<dyn Persistence>,
    clock: Box<dyn Clock>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
    last_save_error: Option<String>,
    load_outcome: LoadOutcome,
}

impl TaskStore {
    /// Begin opening a store. Call `finish` (possibly on another thread) to load.
    pub fn open(persistence: impl Persistence + 'static, clock: impl Clock + 'static) -> LoadingStore {
        LoadingStore {
            persistence: Box::new(persistence),
            clock: Box::new(clock),
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Tasks for `day` in stored (insertion) order
    pub fn tasks_for_day(&self, day: Day) -> &[Task] {
        self.week.tasks(day)
    }

    pub fn total_count(&self, day: Day) -> usize {
        self.week.tasks(day).len()
    }

    pub fn completed_count(&self, day: Day) -> usize {
        self.week.tasks(day).iter().filter(|t| t.completed).count()
    }

    pub fn find_task(&self, day: Day, id: Uuid) -> Option<&Task> {
        self.week.tasks(day).iter().find(|t| t.id == id)
    }

    /// `(completed, total)` across the whole week
    pub fn week_totals(&self) -> (usize, usize) {
        Day::ALL.iter().fold((0, 0), |(done, total), &day| {
            (done + self.completed_count(day), total + self.total_count(day))
        })
    }

    pub fn week(&self) -> &Week {
        &self.week
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Error from the most recent save, cleared by the next successful one
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Append a new incomplete task. Returns `None` (and changes nothing) when
    /// the text is blank.
    pub fn add_task(&mut self, day: Day, text: &str, priority: Priority) -> Option<Uuid> {
        let mut task = Task::new(text, priority, self.clock.now())?;
        while self.find_task(day, task.id).is_some() {
            task.id = Uuid::new_v4();
        }
        let id = task.id;
        self.week.tasks_mut(day).push(task);
        self.commit(StoreEvent::Added { day, id });
        Some(id)
    }

    /// Flip the completed flag. Returns false if no such task.
    pub fn toggle_task(&mut self, day: Day, id: Uuid) -> bool {
        let Some(task) = self.task_mut(day, id) else {
            return false;
        };
        task.completed = !task.completed;
        let completed = task.completed;
        self.commit(StoreEvent::Toggled { day, id, completed });
        true
    }

    /// Apply the set fields of `patch`. Returns false if no such task, if the
    /// patch is empty, or if it would blank the text (nothing is applied then).
    pub fn update_task(&mut self, day: Day, id: Uuid, patch: TaskPatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        let text = match patch.text.as_deref() {
            Some(raw) => match normalize_text(raw) {
                Some(t) => Some(t),
                None => return false,
            },
            None => None,
        };
        let Some(task) = self.task_mut(day, id) else {
            return false;
        };
        if let Some(text) = text {
            task.text = text;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        self.commit(StoreEvent::Updated { day, id });
        true
    }

    /// Remove a task. Returns false if no such task.
    pub fn delete_task(&mut self, day: Day, id: Uuid) -> bool {
        let tasks = self.week.tasks_mut(day);
        let Some(pos) = tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        tasks.remove(pos);
        self.commit(StoreEvent::Deleted { day, id });
        true
    }

    /// Remove every completed task of `day`; returns how many were removed.
    pub fn clear_completed(&mut self, day: Day) -> usize {
        let tasks = self.week.tasks_mut(day);
        let before = tasks.len();
        tasks.retain(|t| !t.completed);
        let removed = before - tasks.len();
        if removed > 0 {
            self.commit(StoreEvent::ClearedCompleted { day, removed });
        }
        removed
    }

    /// Remove every task of `day`. Confirmation is the caller's job.
    pub fn clear_day(&mut self, day: Day) -> usize {
        let removed = std::mem::take(self.week.tasks_mut(day)).len();
        if removed > 0 {
            self.commit(StoreEvent::ClearedDay { day, removed });
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    pub fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn task_mut(&mut self, day: Day, id: Uuid) -> Option<&mut Task> {
        self.week.tasks_mut(day).iter_mut().find(|t| t.id == id)
    }

    fn commit(&mut self, event: StoreEvent) {
        self.save();
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
    }

    /// Write the whole collection. On failure the in-memory state stays
    /// authoritative and the unsaved document goes to the recovery log.
    fn save(&mut self) {
        let blob = match self.week.to_json() {
            Ok(blob) => blob,
            Err(e) => {
                self.last_save_error = Some(e.to_string());
                return;
            }
        };
        match self.persistence.save(STORE_KEY, &blob) {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                self.persistence.record(
                    RecoveryEntry::new(RecoveryCategory::Write, "save failed")
                        .field("Key", STORE_KEY)
                        .field("Error", e.to_string())
                        .body(blob),
                );
                self.last_save_error = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::persist::MemoryStore;
    use crate::ops::clock::SteppingClock;
    use crate::ops::sort::display_order;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::sync::mpsc;

    fn clock() -> SteppingClock {
        SteppingClock::new(
            Utc.with_ymd_and_hms(2026, 10, 12, 9, 0, 0).unwrap(),
            Duration::minutes(1),
        )
    }

    fn store_with(mem: &MemoryStore) -> TaskStore {
        TaskStore::open(mem.clone(), clock()).finish()
    }

    fn texts(store: &TaskStore, day: Day) -> Vec<String> {
        display_order(store.tasks_for_day(day))
            .into_iter()
            .map(|t| t.text.clone())
            .collect()
    }

    #[test]
    fn fresh_store_is_empty() {
        let mem = MemoryStore::new();
        let store = store_with(&mem);
        assert_eq!(store.load_outcome(), &LoadOutcome::Fresh);
        for day in Day::ALL {
            assert!(store.tasks_for_day(day).is_empty());
            assert_eq!(store.total_count(day), 0);
            assert_eq!(store.completed_count(day), 0);
        }
    }

    #[test]
    fn add_creates_one_incomplete_task() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);
        let id = store.add_task(Day::Tuesday, "  Water plants ", Priority::Low).unwrap();

        let tasks = store.tasks_for_day(Day::Tuesday);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, id);
        assert_eq!(tasks[0].text, "Water plants");
        assert_eq!(tasks[0].priority, Priority::Low);
        assert!(!tasks[0].completed);
        assert_eq!(
            tasks[0].created_at,
            Utc.with_ymd_and_hms(2026, 10, 12, 9, 0, 0).unwrap()
        );
        assert!(store.tasks_for_day(Day::Monday).is_empty());
        assert_eq!(mem.save_count(), 1);
    }

    #[test]
    fn blank_add_is_a_no_op() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);
        store.add_task(Day::Monday, "Keep", Priority::Medium);
        let before = store.tasks_for_day(Day::Monday).to_vec();

        assert_eq!(store.add_task(Day::Monday, "   ", Priority::High), None);
        assert_eq!(store.add_task(Day::Monday, "", Priority::High), None);
        assert_eq!(store.tasks_for_day(Day::Monday), before.as_slice());
        assert_eq!(mem.save_count(), 1);
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);
        let id = store.add_task(Day::Friday, "Report", Priority::High).unwrap();

        assert!(store.toggle_task(Day::Friday, id));
        assert!(store.find_task(Day::Friday, id).unwrap().completed);
        assert!(store.toggle_task(Day::Friday, id));
        assert!(!store.find_task(Day::Friday, id).unwrap().completed);
    }

    #[test]
    fn missing_ids_are_no_ops() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);
        let id = store.add_task(Day::Monday, "Only", Priority::Medium).unwrap();
        let stranger = Uuid::new_v4();

        assert!(!store.toggle_task(Day::Monday, stranger));
        assert!(!store.update_task(Day::Monday, stranger, TaskPatch::text("x")));
        assert!(!store.delete_task(Day::Monday, stranger));
        // Right id, wrong day
        assert!(!store.toggle_task(Day::Tuesday, id));
        assert!(!store.delete_task(Day::Tuesday, id));

        assert_eq!(store.total_count(Day::Monday), 1);
        assert_eq!(mem.save_count(), 1);
    }

    #[test]
    fn update_applies_fields_and_keeps_identity() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);
        let id = store.add_task(Day::Monday, "Draft", Priority::Low).unwrap();
        let created = store.find_task(Day::Monday, id).unwrap().created_at;

        let patch = TaskPatch {
            text: Some(" Final draft ".into()),
            priority: Some(Priority::High),
            completed: Some(true),
        };
        assert!(store.update_task(Day::Monday, id, patch));

        let task = store.find_task(Day::Monday, id).unwrap();
        assert_eq!(task.text, "Final draft");
        assert_eq!(task.priority, Priority::High);
        assert!(task.completed);
        assert_eq!(task.id, id);
        assert_eq!(task.created_at, created);
    }

    #[test]
    fn update_rejects_blank_text_entirely() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);
        let id = store.add_task(Day::Monday, "Draft", Priority::Low).unwrap();

        let patch = TaskPatch {
            text: Some("   ".into()),
            priority: Some(Priority::High),
            completed: None,
        };
        assert!(!store.update_task(Day::Monday, id, patch));
        let task = store.find_task(Day::Monday, id).unwrap();
        assert_eq!(task.text, "Draft");
        assert_eq!(task.priority, Priority::Low);
        assert!(!store.update_task(Day::Monday, id, TaskPatch::default()));
    }

    #[test]
    fn delete_removes_only_that_task() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);
        let a = store.add_task(Day::Sunday, "A", Priority::Medium).unwrap();
        let b = store.add_task(Day::Sunday, "B", Priority::Medium).unwrap();

        assert!(store.delete_task(Day::Sunday, a));
        let ids: Vec<Uuid> = store.tasks_for_day(Day::Sunday).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![b]);
    }

    #[test]
    fn clear_completed_removes_exactly_completed() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);
        let a = store.add_task(Day::Monday, "A", Priority::Low).unwrap();
        let b = store.add_task(Day::Monday, "B", Priority::High).unwrap();
        let c = store.add_task(Day::Monday, "C", Priority::Medium).unwrap();
        store.add_task(Day::Monday, "D", Priority::High);
        store.toggle_task(Day::Monday, a);
        store.toggle_task(Day::Monday, c);
        let remaining_order = {
            let mut t = texts(&store, Day::Monday);
            t.retain(|s| s == "B" || s == "D");
            t
        };

        assert_eq!(store.clear_completed(Day::Monday), 2);
        assert_eq!(store.total_count(Day::Monday), 2);
        assert_eq!(store.completed_count(Day::Monday), 0);
        assert!(store.find_task(Day::Monday, b).is_some());
        assert_eq!(texts(&store, Day::Monday), remaining_order);

        // Nothing completed left: no-op, no save
        let saves = mem.save_count();
        assert_eq!(store.clear_completed(Day::Monday), 0);
        assert_eq!(mem.save_count(), saves);
    }

    #[test]
    fn clear_day_empties_only_that_day() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);
        store.add_task(Day::Monday, "A", Priority::Low);
        store.add_task(Day::Monday, "B", Priority::Low);
        store.add_task(Day::Tuesday, "C", Priority::Low);

        assert_eq!(store.clear_day(Day::Monday), 2);
        assert!(store.tasks_for_day(Day::Monday).is_empty());
        assert_eq!(store.total_count(Day::Tuesday), 1);
        assert_eq!(store.clear_day(Day::Monday), 0);
    }

    #[test]
    fn completed_never_exceeds_total() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);
        let mut ids = Vec::new();
        for i in 0..6 {
            ids.push(store.add_task(Day::Wednesday, &format!("t{}", i), Priority::Medium).unwrap());
        }
        for (i, id) in ids.iter().enumerate() {
            if i % 2 == 0 {
                store.toggle_task(Day::Wednesday, *id);
            }
            assert!(store.completed_count(Day::Wednesday) <= store.total_count(Day::Wednesday));
        }
        store.delete_task(Day::Wednesday, ids[0]);
        store.clear_completed(Day::Wednesday);
        assert!(store.completed_count(Day::Wednesday) <= store.total_count(Day::Wednesday));
        assert_eq!(store.week_totals(), (0, 3));
    }

    #[test]
    fn buy_milk_call_dentist_scenario() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);
        store.add_task(Day::Monday, "Buy milk", Priority::Medium);
        let dentist = store.add_task(Day::Monday, "Call dentist", Priority::High).unwrap();
        assert_eq!(store.total_count(Day::Monday), 2);
        assert_eq!(texts(&store, Day::Monday), vec!["Call dentist", "Buy milk"]);

        store.toggle_task(Day::Monday, dentist);
        assert_eq!(texts(&store, Day::Monday), vec!["Buy milk", "Call dentist"]);
        assert_eq!(store.completed_count(Day::Monday), 1);
    }

    #[test]
    fn persisted_collection_reloads_equal() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);
        store.add_task(Day::Monday, "Buy milk", Priority::Medium);
        let b = store.add_task(Day::Monday, "Call dentist", Priority::High).unwrap();
        store.add_task(Day::Thursday, "Gym", Priority::Low);
        store.add_task(Day::Sunday, "Plan next week", Priority::High);
        store.toggle_task(Day::Monday, b);

        let reloaded = store_with(&mem);
        assert_eq!(reloaded.week(), store.week());
        assert_eq!(reloaded.load_outcome(), &LoadOutcome::Loaded { tasks: 4 });
    }

    #[test]
    fn malformed_blob_starts_empty_and_is_recorded() {
        let mem = MemoryStore::with_blob(STORE_KEY, "{\"monday\": [oops");
        let store = store_with(&mem);
        assert!(store.week().is_empty());
        assert!(matches!(store.load_outcome(), LoadOutcome::Recovered { .. }));

        let recorded = mem.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].category, RecoveryCategory::Load);
        assert_eq!(recorded[0].body, "{\"monday\": [oops");
    }

    #[test]
    fn repeated_ids_load_as_separate_tasks() {
        let t = r#"{"id": "6f1c0a52-8d7e-4c53-9f59-5e4b2a1d0c14", "text": "Run",
            "completed": false, "priority": "medium", "createdAt": "2026-10-12T07:00:00Z"}"#;
        let mem = MemoryStore::with_blob(STORE_KEY, &format!(r#"{{"monday": [{t}, {t}]}}"#));
        let mut store = store_with(&mem);
        assert_eq!(store.load_outcome(), &LoadOutcome::Loaded { tasks: 2 });

        let ids: Vec<Uuid> = store.tasks_for_day(Day::Monday).iter().map(|t| t.id).collect();
        assert!(store.toggle_task(Day::Monday, ids[1]));
        assert!(!store.tasks_for_day(Day::Monday)[0].completed);
        assert!(store.tasks_for_day(Day::Monday)[1].completed);

        assert!(store.delete_task(Day::Monday, ids[0]));
        assert_eq!(store.total_count(Day::Monday), 1);
    }

    #[test]
    fn save_failure_keeps_memory_state() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);
        store.add_task(Day::Monday, "Saved", Priority::Medium);
        mem.set_fail_saves(true);

        let id = store.add_task(Day::Monday, "Unsaved", Priority::Medium).unwrap();
        assert!(store.find_task(Day::Monday, id).is_some());
        assert!(store.last_save_error().is_some());
        let recorded = mem.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].category, RecoveryCategory::Write);
        assert!(recorded[0].body.contains("Unsaved"));

        mem.set_fail_saves(false);
        store.toggle_task(Day::Monday, id);
        assert!(store.last_save_error().is_none());
        assert!(mem.blob(STORE_KEY).unwrap().contains("Unsaved"));
    }

    #[test]
    fn observers_see_every_commit_synchronously() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);
        let (tx, rx) = mpsc::channel();
        store.subscribe(Box::new(move |event: &StoreEvent| {
            let _ = tx.send(event.clone());
        }));

        let id = store.add_task(Day::Monday, "A", Priority::High).unwrap();
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::Added { day: Day::Monday, id });

        store.toggle_task(Day::Monday, id);
        assert_eq!(
            rx.try_recv().unwrap(),
            StoreEvent::Toggled {
                day: Day::Monday,
                id,
                completed: true
            }
        );

        // No-ops do not notify
        store.add_task(Day::Monday, " ", Priority::High);
        store.delete_task(Day::Monday, Uuid::new_v4());
        assert!(rx.try_recv().is_err());

        store.clear_completed(Day::Monday);
        assert_eq!(
            rx.try_recv().unwrap(),
            StoreEvent::ClearedCompleted {
                day: Day::Monday,
                removed: 1
            }
        );
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);
        let (tx, rx) = mpsc::channel();
        let sub = store.subscribe(Box::new(move |event: &StoreEvent| {
            let _ = tx.send(event.day());
        }));
        store.add_task(Day::Friday, "A", Priority::Low);
        assert_eq!(rx.try_recv().unwrap(), Day::Friday);

        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.add_task(Day::Friday, "B", Priority::Low);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn loading_can_finish_on_another_thread() {
        let mem = MemoryStore::new();
        store_with(&mem).add_task(Day::Saturday, "Market", Priority::Medium);

        let loading = TaskStore::open(mem.clone(), clock());
        let store = std::thread::spawn(move || loading.finish()).join().unwrap();
        assert_eq!(store.total_count(Day::Saturday), 1);
    }
}
