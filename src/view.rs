use crate::dialog::{ConfirmDialog, FormDialog, FormIntent, Notifier};
use crate::model::Workout;
use crate::service::WorkoutApi;
use crate::table::TableView;

/// The workout list screen: an in-memory list of records (the single source
/// of truth) plus a table widget derived from it.
///
/// Every structural change to the list swaps in a fresh `TableView` rather
/// than patching the old one, so widget state never outlives the snapshot it
/// was built over. On any service failure the list is left exactly as it
/// was and the notifier names the operation that failed.
pub struct WorkoutListView<S, N> {
    service: S,
    notifier: N,
    workouts: Vec<Workout>,
    table: TableView,
}

impl<S: WorkoutApi, N: Notifier> WorkoutListView<S, N> {
    pub fn new(service: S, notifier: N) -> Self {
        WorkoutListView {
            service,
            notifier,
            workouts: Vec::new(),
            table: TableView::new(Vec::new()),
        }
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn table(&self) -> &TableView {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableView {
        &mut self.table
    }

    /// Fetches the full collection. Returns whether the list was replaced.
    pub async fn load(&mut self) -> bool {
        match self.service.list().await {
            Ok(workouts) => {
                self.workouts = workouts;
                self.refresh_table();
                true
            }
            Err(e) => {
                self.notifier
                    .notify(&format!("Could not load workouts: {}", e));
                false
            }
        }
    }

    /// Narrows the table, never the list.
    pub fn apply_filter(&mut self, text: &str) {
        self.table.set_filter(text);
    }

    /// Runs the add/edit form flow. Returns whether the list changed.
    pub async fn open_form(&mut self, dialog: &mut impl FormDialog, intent: FormIntent) -> bool {
        let is_edit = matches!(intent, FormIntent::Edit(_));

        let result = match dialog.open(intent) {
            Some(result) => result,
            // Cancelled; nothing moves.
            None => return false,
        };

        if is_edit {
            match self.service.update(&result).await {
                Ok(updated) => {
                    self.replace_workout(updated);
                    true
                }
                Err(e) => {
                    self.notifier
                        .notify(&format!("Could not update workout: {}", e));
                    false
                }
            }
        } else {
            match self.service.create(&result).await {
                Ok(created) => {
                    self.workouts.push(created);
                    self.refresh_table();
                    true
                }
                Err(e) => {
                    self.notifier
                        .notify(&format!("Could not add workout: {}", e));
                    false
                }
            }
        }
    }

    /// Runs the delete confirmation flow. Returns whether the list changed.
    pub async fn delete_workout(
        &mut self,
        dialog: &mut impl ConfirmDialog,
        workout: &Workout,
    ) -> bool {
        let content = format!("Workout \"{}\"", workout.description);
        if !dialog.confirm("Are you sure you want to delete this?", &content) {
            return false;
        }

        let id = match workout.id {
            Some(id) => id,
            None => {
                self.notifier
                    .notify("Could not delete workout: record has no id.");
                return false;
            }
        };

        match self.service.delete(id).await {
            Ok(()) => {
                self.remove_workout(id);
                true
            }
            Err(e) => {
                self.notifier
                    .notify(&format!("Could not delete workout: {}", e));
                false
            }
        }
    }

    fn replace_workout(&mut self, updated: Workout) {
        if let Some(index) = self.workouts.iter().position(|w| w.id == updated.id) {
            self.workouts[index] = updated;
        }
        self.refresh_table();
    }

    fn remove_workout(&mut self, id: i64) {
        if let Some(index) = self.workouts.iter().position(|w| w.id == Some(id)) {
            self.workouts.remove(index);
        }
        self.refresh_table();
    }

    fn refresh_table(&mut self) {
        self.table = TableView::new(self.workouts.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DATE_FORMAT;
    use anyhow::{bail, Result};
    use chrono::{Duration, NaiveDateTime};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn workout(id: Option<i64>, sport: &str, description: &str) -> Workout {
        let date = NaiveDateTime::parse_from_str("2020-07-04 09:00:00", DATE_FORMAT).unwrap();

        Workout {
            id,
            sport: sport.to_string(),
            description: description.to_string(),
            date,
            end_date: date + Duration::minutes(30),
            location_name: "Lakefront".to_string(),
        }
    }

    struct FakeService {
        workouts: RefCell<Vec<Workout>>,
        next_id: Cell<i64>,
        fail: bool,
    }

    impl FakeService {
        fn with(workouts: Vec<Workout>) -> Self {
            let next_id = workouts.iter().filter_map(|w| w.id).max().unwrap_or(0) + 1;
            FakeService {
                workouts: RefCell::new(workouts),
                next_id: Cell::new(next_id),
                fail: false,
            }
        }

        fn failing() -> Self {
            FakeService {
                workouts: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
                fail: true,
            }
        }
    }

    impl WorkoutApi for FakeService {
        async fn list(&self) -> Result<Vec<Workout>> {
            if self.fail {
                bail!("service down");
            }
            Ok(self.workouts.borrow().clone())
        }

        async fn create(&self, workout: &Workout) -> Result<Workout> {
            if self.fail {
                bail!("service down");
            }
            let mut created = workout.clone();
            created.id = Some(self.next_id.get());
            self.next_id.set(self.next_id.get() + 1);
            self.workouts.borrow_mut().push(created.clone());
            Ok(created)
        }

        async fn update(&self, workout: &Workout) -> Result<Workout> {
            if self.fail {
                bail!("service down");
            }
            let mut workouts = self.workouts.borrow_mut();
            match workouts.iter_mut().find(|w| w.id == workout.id) {
                Some(stored) => {
                    *stored = workout.clone();
                    Ok(workout.clone())
                }
                None => bail!("no such workout"),
            }
        }

        async fn delete(&self, id: i64) -> Result<()> {
            if self.fail {
                bail!("service down");
            }
            self.workouts.borrow_mut().retain(|w| w.id != Some(id));
            Ok(())
        }
    }

    struct ScriptedForm {
        result: Option<Workout>,
    }

    impl FormDialog for ScriptedForm {
        fn open(&mut self, _intent: FormIntent) -> Option<Workout> {
            self.result.clone()
        }
    }

    struct ScriptedConfirm {
        answer: bool,
    }

    impl ConfirmDialog for ScriptedConfirm {
        fn confirm(&mut self, _title: &str, _content: &str) -> bool {
            self.answer
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        messages: Rc<RefCell<Vec<String>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    #[tokio::test]
    async fn load_replaces_the_list_and_rebuilds_the_table() {
        let service = FakeService::with(vec![
            workout(Some(1), "run", "5k"),
            workout(Some(2), "swim", "1500m"),
        ]);
        let mut view = WorkoutListView::new(service, RecordingNotifier::default());

        // Stale widget state must not survive the rebuild.
        view.apply_filter("swim");

        assert!(view.load().await);
        assert_eq!(view.workouts().len(), 2);
        assert_eq!(view.table().filter(), "");
        assert_eq!(view.table().visible_rows().len(), 2);
    }

    #[tokio::test]
    async fn failed_load_keeps_prior_state_and_notifies() {
        let notifier = RecordingNotifier::default();
        let mut view = WorkoutListView::new(FakeService::with(vec![workout(Some(1), "run", "5k")]),
            notifier.clone());
        assert!(view.load().await);

        let mut view = WorkoutListView {
            service: FakeService::failing(),
            notifier: notifier.clone(),
            workouts: view.workouts.clone(),
            table: TableView::new(view.workouts.clone()),
        };

        assert!(!view.load().await);
        assert_eq!(view.workouts().len(), 1);
        assert!(notifier.messages.borrow().last().unwrap().contains("load"));
    }

    #[tokio::test]
    async fn add_appends_the_server_returned_record_exactly_once() {
        let mut view =
            WorkoutListView::new(FakeService::with(Vec::new()), RecordingNotifier::default());
        let mut form = ScriptedForm {
            result: Some(workout(None, "run", "5k")),
        };

        assert!(view.open_form(&mut form, FormIntent::Add).await);

        assert_eq!(view.workouts().len(), 1);
        assert_eq!(view.workouts()[0].id, Some(1));
        assert_eq!(view.table().visible_rows().len(), 1);
    }

    #[tokio::test]
    async fn cancelled_add_changes_nothing() {
        let mut view =
            WorkoutListView::new(FakeService::with(Vec::new()), RecordingNotifier::default());
        let mut form = ScriptedForm { result: None };

        assert!(!view.open_form(&mut form, FormIntent::Add).await);
        assert!(view.workouts().is_empty());
    }

    #[tokio::test]
    async fn failed_add_keeps_the_list_and_notifies() {
        let notifier = RecordingNotifier::default();
        let mut view = WorkoutListView::new(FakeService::failing(), notifier.clone());
        let mut form = ScriptedForm {
            result: Some(workout(None, "run", "5k")),
        };

        assert!(!view.open_form(&mut form, FormIntent::Add).await);
        assert!(view.workouts().is_empty());
        assert!(notifier.messages.borrow().last().unwrap().contains("add"));
    }

    #[tokio::test]
    async fn cancelled_edit_changes_nothing() {
        let service = FakeService::with(vec![workout(Some(1), "run", "5k")]);
        let mut view = WorkoutListView::new(service, RecordingNotifier::default());
        view.load().await;
        let before = view.workouts().to_vec();

        let selected = before[0].clone();
        let mut form = ScriptedForm { result: None };

        assert!(
            !view
                .open_form(&mut form, FormIntent::Edit(selected))
                .await
        );
        assert_eq!(view.workouts(), before.as_slice());
    }

    #[tokio::test]
    async fn edit_replaces_the_matching_entry_without_duplicates() {
        let service = FakeService::with(vec![workout(Some(1), "run", "5k")]);
        let mut view = WorkoutListView::new(service, RecordingNotifier::default());
        view.load().await;

        let selected = view.workouts()[0].clone();
        let mut form = ScriptedForm {
            result: Some(workout(Some(1), "run", "10k")),
        };

        assert!(view.open_form(&mut form, FormIntent::Edit(selected)).await);

        assert_eq!(view.workouts().len(), 1);
        assert_eq!(view.workouts()[0].id, Some(1));
        assert_eq!(view.workouts()[0].description, "10k");
    }

    #[tokio::test]
    async fn failed_edit_keeps_the_original_record() {
        let notifier = RecordingNotifier::default();
        let mut view = WorkoutListView {
            service: FakeService::failing(),
            notifier: notifier.clone(),
            workouts: vec![workout(Some(1), "run", "5k")],
            table: TableView::new(vec![workout(Some(1), "run", "5k")]),
        };

        let selected = view.workouts()[0].clone();
        let mut form = ScriptedForm {
            result: Some(workout(Some(1), "run", "10k")),
        };

        assert!(
            !view
                .open_form(&mut form, FormIntent::Edit(selected))
                .await
        );
        assert_eq!(view.workouts()[0].description, "5k");
        assert!(notifier.messages.borrow().last().unwrap().contains("update"));
    }

    #[tokio::test]
    async fn confirmed_delete_removes_the_matching_entry() {
        let service = FakeService::with(vec![
            workout(Some(1), "run", "5k"),
            workout(Some(2), "swim", "1500m"),
        ]);
        let mut view = WorkoutListView::new(service, RecordingNotifier::default());
        view.load().await;

        let target = view.workouts()[1].clone();
        let mut confirm = ScriptedConfirm { answer: true };

        assert!(view.delete_workout(&mut confirm, &target).await);

        let ids: Vec<Option<i64>> = view.workouts().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![Some(1)]);
    }

    #[tokio::test]
    async fn declined_delete_changes_nothing() {
        let service = FakeService::with(vec![workout(Some(1), "run", "5k")]);
        let mut view = WorkoutListView::new(service, RecordingNotifier::default());
        view.load().await;
        let before = view.workouts().to_vec();

        let target = before[0].clone();
        let mut confirm = ScriptedConfirm { answer: false };

        assert!(!view.delete_workout(&mut confirm, &target).await);
        assert_eq!(view.workouts(), before.as_slice());
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_list_and_notifies() {
        let notifier = RecordingNotifier::default();
        let mut view = WorkoutListView {
            service: FakeService::failing(),
            notifier: notifier.clone(),
            workouts: vec![workout(Some(1), "run", "5k")],
            table: TableView::new(vec![workout(Some(1), "run", "5k")]),
        };

        let target = view.workouts()[0].clone();
        let mut confirm = ScriptedConfirm { answer: true };

        assert!(!view.delete_workout(&mut confirm, &target).await);
        assert_eq!(view.workouts().len(), 1);
        assert!(notifier.messages.borrow().last().unwrap().contains("delete"));
    }
}
