//! The application state store.
//!
//! All mutation goes through [`Store::dispatch`], which runs the pure
//! [`reduce`] function and then writes the whole state to local storage.
//! Snapshots handed out by [`Store::state`] are immutable.

use std::sync::Arc;

use chrono::Utc;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::identity::{self, CollegeInfo};
use crate::domain::{
    Applicant, ApplicantPatch, ApplicantStatus, ApplicationRecord, CurrentUser, Department, InterviewMethod,
    InterviewRecord, RecruitmentState, RegistrationDraft, ValidationError, ValidationResult, VolunteerChoice,
    VolunteerPlan, VolunteerType, new_id,
};
use crate::infrastructure::{
    IdentityLookup, KeyValueStore, MemoryStorage, SimulatedDirectory, read_json_or, write_json,
};

/// Storage slot holding the serialized state.
pub const STATE_KEY: &str = "recruitment-state";

/// Written to the global error field when a lookup fails.
pub const VERIFY_ERROR: &str = "验证过程中出错";
pub const RETRY_MESSAGE: &str = "系统错误，请稍后再试";
pub const CANCELLED_MESSAGE: &str = "验证已取消";

/// The closed set of state transitions.
///
/// The serialized form uses `{"type": ..., "payload": ...}`; a tag that is not
/// recognized decodes to [`Action::Unknown`], which the reducer ignores.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    SetApplicants(Vec<Applicant>),
    AddApplicant(Applicant),
    UpdateApplicant { id: String, updates: ApplicantPatch },
    DeleteApplicant(String),
    SetDepartments(Vec<Department>),
    SetCurrentUser(Option<CurrentUser>),
    SetLoading(bool),
    SetError(Option<String>),
    SetDraftProfile(RegistrationDraft),
    AddApplicationRecord(ApplicationRecord),
    UpdateInterviewRecord(InterviewRecord),
    SetAuthenticated(bool),
    Unknown,
}

/// Wire shape shared by every action, before the tag is looked at.
#[derive(Deserialize)]
struct RawAction {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Deserialize)]
struct UpdatePayload {
    id: String,
    updates: ApplicantPatch,
}

impl TryFrom<RawAction> for Action {
    type Error = serde_json::Error;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        let payload = raw.payload;
        let action = match raw.kind.as_str() {
            "SET_APPLICANTS" => Action::SetApplicants(serde_json::from_value(payload)?),
            "ADD_APPLICANT" => Action::AddApplicant(serde_json::from_value(payload)?),
            "UPDATE_APPLICANT" => {
                let UpdatePayload { id, updates } = serde_json::from_value(payload)?;
                Action::UpdateApplicant { id, updates }
            }
            "DELETE_APPLICANT" => Action::DeleteApplicant(serde_json::from_value(payload)?),
            "SET_DEPARTMENTS" => Action::SetDepartments(serde_json::from_value(payload)?),
            "SET_CURRENT_USER" => Action::SetCurrentUser(serde_json::from_value(payload)?),
            "SET_LOADING" => Action::SetLoading(serde_json::from_value(payload)?),
            "SET_ERROR" => Action::SetError(serde_json::from_value(payload)?),
            "SET_DRAFT_PROFILE" => Action::SetDraftProfile(serde_json::from_value(payload)?),
            "ADD_APPLICATION_RECORD" => Action::AddApplicationRecord(serde_json::from_value(payload)?),
            "UPDATE_INTERVIEW_RECORD" => Action::UpdateInterviewRecord(serde_json::from_value(payload)?),
            "SET_AUTHENTICATED" => Action::SetAuthenticated(serde_json::from_value(payload)?),
            _ => Action::Unknown,
        };
        Ok(action)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawAction::deserialize(deserializer)?;
        Action::try_from(raw).map_err(de::Error::custom)
    }
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetApplicants(_) => "SET_APPLICANTS",
            Action::AddApplicant(_) => "ADD_APPLICANT",
            Action::UpdateApplicant { .. } => "UPDATE_APPLICANT",
            Action::DeleteApplicant(_) => "DELETE_APPLICANT",
            Action::SetDepartments(_) => "SET_DEPARTMENTS",
            Action::SetCurrentUser(_) => "SET_CURRENT_USER",
            Action::SetLoading(_) => "SET_LOADING",
            Action::SetError(_) => "SET_ERROR",
            Action::SetDraftProfile(_) => "SET_DRAFT_PROFILE",
            Action::AddApplicationRecord(_) => "ADD_APPLICATION_RECORD",
            Action::UpdateInterviewRecord(_) => "UPDATE_INTERVIEW_RECORD",
            Action::SetAuthenticated(_) => "SET_AUTHENTICATED",
            Action::Unknown => "UNKNOWN",
        }
    }
}

/// Computes the state that follows `action`. `state` is never modified.
pub fn reduce(state: &RecruitmentState, action: Action) -> RecruitmentState {
    let mut next = state.clone();
    match action {
        Action::SetApplicants(applicants) => next.applicants = applicants,
        Action::AddApplicant(applicant) => {
            // Ids are unique within the list.
            if next.find_applicant(&applicant.id).is_none() {
                next.applicants.push(applicant);
            }
        }
        Action::UpdateApplicant { id, updates } => {
            if let Some(applicant) = next.applicants.iter_mut().find(|a| a.id == id) {
                applicant.apply(&updates);
            }
        }
        Action::DeleteApplicant(id) => next.applicants.retain(|a| a.id != id),
        Action::SetDepartments(departments) => next.departments = departments,
        Action::SetCurrentUser(user) => next.current_user = user,
        Action::SetLoading(loading) => next.loading = loading,
        Action::SetError(error) => next.error = error,
        Action::SetDraftProfile(draft) => next.draft_profile = Some(draft),
        Action::AddApplicationRecord(record) => next.applications.push(record),
        Action::UpdateInterviewRecord(record) => {
            if let Some(slot) = next.interviews.iter_mut().find(|i| i.id == record.id) {
                *slot = record;
            }
        }
        Action::SetAuthenticated(authenticated) => next.is_authenticated = authenticated,
        Action::Unknown => {}
    }
    next
}

/// Outcome of [`Store::verify_identity`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Verification {
    pub valid: bool,
    pub college: Option<String>,
    pub has_special: Option<bool>,
    pub message: Option<String>,
}

impl Verification {
    fn accepted(college: CollegeInfo) -> Self {
        Self {
            valid: true,
            college: Some(college.name),
            has_special: Some(college.has_special),
            message: None,
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Holds the loading flag up for as long as it lives.
///
/// Dropping it clears the flag, including when the verification future is
/// dropped mid-await.
struct LoadingGuard<'a> {
    store: &'a mut Store,
}

impl<'a> LoadingGuard<'a> {
    fn begin(store: &'a mut Store) -> Self {
        store.dispatch(Action::SetLoading(true));
        Self { store }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.store.dispatch(Action::SetLoading(false));
    }
}

/// Single authoritative container for applicant and session data.
pub struct Store {
    state: Arc<RecruitmentState>,
    storage: Box<dyn KeyValueStore>,
    directory: Box<dyn IdentityLookup>,
}

impl Store {
    /// Hydrates from `storage`, or seeds the default dataset when nothing
    /// usable is stored, and writes the result back.
    pub fn open(storage: Box<dyn KeyValueStore>, directory: Box<dyn IdentityLookup>) -> Self {
        let (mut state, restored) = read_json_or(&*storage, STATE_KEY, RecruitmentState::seeded);
        if restored {
            info!(applicants = state.applicants.len(), "restored persisted state");
        } else {
            info!(applicants = state.applicants.len(), "seeded default dataset");
        }
        // A verification cannot be in flight across restarts.
        state.loading = false;

        let mut store = Self {
            state: Arc::new(state),
            storage,
            directory,
        };
        store.persist();
        store
    }

    /// Memory-backed store with the default simulated directory.
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryStorage::default()), Box::new(SimulatedDirectory::default()))
    }

    pub fn state(&self) -> Arc<RecruitmentState> {
        Arc::clone(&self.state)
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        &*self.storage
    }

    pub fn dispatch(&mut self, action: Action) {
        let name = action.name();
        let next = reduce(&self.state, action);
        if next == *self.state {
            debug!(action = name, "action left state unchanged");
            return;
        }
        debug!(action = name, "state updated");
        self.state = Arc::new(next);
        self.persist();
    }

    fn persist(&mut self) {
        write_json(&mut *self.storage, STATE_KEY, &*self.state);
    }

    /// Validates a student id, resolves its college and makes sure an
    /// applicant record exists for it.
    ///
    /// When `cancel` fires before the lookup finishes, nothing but the loading
    /// flag is touched. The loading flag is cleared on every exit path.
    pub async fn verify_identity(&mut self, student_id: &str, cancel: &CancellationToken) -> Verification {
        let mut guard = LoadingGuard::begin(self);

        if let Err(rejection) = identity::check_student_id(student_id) {
            return Verification::rejected(rejection.to_string());
        }

        let resolved = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = guard.store.directory.resolve(student_id) => Some(result),
        };

        match resolved {
            None => {
                info!(student_id, "verification cancelled");
                Verification::rejected(CANCELLED_MESSAGE)
            }
            Some(Err(err)) => {
                warn!(student_id, error = %err, "student id lookup failed");
                guard.store.dispatch(Action::SetError(Some(VERIFY_ERROR.to_string())));
                Verification::rejected(RETRY_MESSAGE)
            }
            Some(Ok(college)) => {
                if guard.store.state.find_by_student_id(student_id).is_none() {
                    let applicant = Applicant::new_pending(student_id, &college.name);
                    info!(student_id, college = %college.name, "created applicant");
                    guard.store.dispatch(Action::AddApplicant(applicant));
                }
                Verification::accepted(college)
            }
        }
    }

    pub fn update_applicant_status(&mut self, id: &str, status: ApplicantStatus) {
        self.dispatch(Action::UpdateApplicant {
            id: id.to_string(),
            updates: ApplicantPatch::status(status),
        });
    }

    /// Appends a choice to the applicant with `student_id`; no-op if there is none.
    pub fn add_volunteer_choice(&mut self, student_id: &str, department: &str, kind: VolunteerType, priority: u32) {
        let Some(applicant) = self.state.find_by_student_id(student_id) else {
            debug!(student_id, "no applicant for volunteer choice");
            return;
        };
        let id = applicant.id.clone();
        let mut volunteers = applicant.volunteers.clone();
        volunteers.push(VolunteerChoice {
            department: department.to_string(),
            kind,
            priority,
        });
        self.dispatch(Action::UpdateApplicant {
            id,
            updates: ApplicantPatch::volunteers(volunteers),
        });
    }

    /// Sets `status` on every listed applicant. Returns how many were found.
    pub fn batch_update_status(&mut self, ids: &[String], status: ApplicantStatus) -> usize {
        let mut updated = 0;
        for id in ids {
            if self.state.find_applicant(id).is_some() {
                self.update_applicant_status(id, status);
                updated += 1;
            }
        }
        info!(updated, status = status.as_str(), "batch status update");
        updated
    }

    /// Replaces the applicant's choices with the submitted plan and records
    /// the application.
    pub fn submit_volunteer_plan(&mut self, student_id: &str, plan: &VolunteerPlan) -> ValidationResult<ApplicationRecord> {
        let choices = plan.to_volunteer_choices()?;
        let applicant_id = self
            .state
            .find_by_student_id(student_id)
            .map(|a| a.id.clone())
            .ok_or_else(|| ValidationError::UnknownApplicant(student_id.to_string()))?;

        let first = &choices[0];
        self.dispatch(Action::UpdateApplicant {
            id: applicant_id,
            updates: ApplicantPatch {
                department: Some(first.department.clone()),
                volunteer_type: Some(first.kind),
                volunteers: Some(choices.clone()),
                ..ApplicantPatch::default()
            },
        });

        let record = ApplicationRecord {
            id: new_id(),
            student_id: student_id.to_string(),
            choices,
            interview_method: plan.interview_method().unwrap_or(InterviewMethod::Joint),
            submitted_at: Utc::now(),
        };
        self.dispatch(Action::AddApplicationRecord(record.clone()));
        Ok(record)
    }

    /// Stores an interviewer's score and comment on the applicant and on any
    /// interview record already held for them.
    pub fn record_evaluation(&mut self, applicant_id: &str, score: u32, evaluation: &str) {
        self.dispatch(Action::UpdateApplicant {
            id: applicant_id.to_string(),
            updates: ApplicantPatch {
                score: Some(score),
                evaluation: Some(evaluation.to_string()),
                ..ApplicantPatch::default()
            },
        });

        let existing = self.state.interviews.iter().find(|i| i.applicant_id == applicant_id).cloned();
        if let Some(mut record) = existing {
            record.score = Some(score);
            record.evaluation = Some(evaluation.to_string());
            self.dispatch(Action::UpdateInterviewRecord(record));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::default_departments;
    use crate::domain::{Skill, UserRole};
    use crate::infrastructure::{LookupError, StorageError};
    use async_trait::async_trait;
    use std::time::Duration;

    struct OfflineDirectory;

    #[async_trait]
    impl IdentityLookup for OfflineDirectory {
        async fn resolve(&self, _student_id: &str) -> Result<CollegeInfo, LookupError> {
            Err(LookupError::Unavailable("offline".to_string()))
        }
    }

    struct ReadOnlyStorage;

    impl KeyValueStore for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }
        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
        fn clear(&mut self) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn empty_store() -> Store {
        let mut store = Store::in_memory();
        store.dispatch(Action::SetApplicants(Vec::new()));
        store
    }

    fn persisted(store: &Store) -> RecruitmentState {
        let raw = store.storage().get(STATE_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn applicant(student_id: &str) -> Applicant {
        Applicant::new_pending(student_id, "信息学院")
    }

    #[test]
    fn test_fresh_store_is_seeded_and_persisted() {
        let store = Store::in_memory();
        let state = store.state();
        assert_eq!(state.departments.len(), 5);
        assert_eq!(state.applicants.len(), 20);
        assert!(!state.is_authenticated);
        assert!(state.current_user.is_none());
        assert_eq!(persisted(&store), *state);
    }

    #[test]
    fn test_store_restores_persisted_state() {
        let mut storage = MemoryStorage::default();
        let saved = RecruitmentState {
            departments: default_departments(),
            applicants: vec![applicant("2023120000001")],
            is_authenticated: true,
            ..RecruitmentState::default()
        };
        storage.set(STATE_KEY, &serde_json::to_string(&saved).unwrap()).unwrap();

        let store = Store::open(Box::new(storage), Box::new(SimulatedDirectory::default()));

        assert_eq!(*store.state(), saved);
    }

    #[test]
    fn test_unreadable_blob_falls_back_to_defaults() {
        let mut storage = MemoryStorage::default();
        storage.set(STATE_KEY, "{ not json").unwrap();

        let store = Store::open(Box::new(storage), Box::new(SimulatedDirectory::default()));

        assert_eq!(store.state().departments.len(), 5);
        assert_eq!(store.state().applicants.len(), 20);
    }

    #[test]
    fn test_stale_loading_flag_is_cleared_on_open() {
        let mut storage = MemoryStorage::default();
        let saved = RecruitmentState {
            loading: true,
            ..RecruitmentState::default()
        };
        storage.set(STATE_KEY, &serde_json::to_string(&saved).unwrap()).unwrap();

        let store = Store::open(Box::new(storage), Box::new(SimulatedDirectory::default()));

        assert!(!store.state().loading);
    }

    #[test]
    fn test_failed_writes_are_dropped() {
        let mut store = Store::open(Box::new(ReadOnlyStorage), Box::new(SimulatedDirectory::default()));
        store.dispatch(Action::SetAuthenticated(true));
        assert!(store.state().is_authenticated);
        assert_eq!(store.storage().get(STATE_KEY).unwrap(), None);
    }

    #[test]
    fn test_snapshots_are_immutable() {
        let mut store = empty_store();
        let before = store.state();
        store.dispatch(Action::AddApplicant(applicant("2023120000001")));
        assert!(before.applicants.is_empty());
        assert_eq!(store.state().applicants.len(), 1);
    }

    #[test]
    fn test_every_action_persists_a_reloadable_snapshot() {
        let mut store = empty_store();
        let first = applicant("2023120000001");
        let first_id = first.id.clone();
        let actions = vec![
            Action::AddApplicant(first),
            Action::AddApplicant(applicant("2023120000002")),
            Action::UpdateApplicant { id: first_id.clone(), updates: ApplicantPatch::status(ApplicantStatus::Interview) },
            Action::SetCurrentUser(Some(CurrentUser {
                id: "u1".to_string(),
                role: UserRole::Interviewer,
                name: "王强".to_string(),
                department: Some("技术部".to_string()),
            })),
            Action::SetError(Some("oops".to_string())),
            Action::SetDraftProfile(RegistrationDraft {
                name: "李伟".to_string(),
                skills: vec![Skill { name: "Rust".to_string(), level: 4 }],
                avatar: Some("data:image/png;base64,AAAA".to_string()),
                ..RegistrationDraft::default()
            }),
            Action::AddApplicationRecord(ApplicationRecord {
                id: new_id(),
                student_id: "2023120000001".to_string(),
                choices: Vec::new(),
                interview_method: InterviewMethod::Joint,
                submitted_at: Utc::now(),
            }),
            Action::SetAuthenticated(true),
            Action::DeleteApplicant(first_id),
        ];

        for action in actions {
            store.dispatch(action);
            assert_eq!(persisted(&store), *store.state());
        }
        assert_eq!(store.state().applicants.len(), 1);
    }

    #[test]
    fn test_unknown_action_is_a_no_op() {
        let mut store = Store::in_memory();
        let before = store.state();

        let action: Action = serde_json::from_str(r#"{"type":"LAUNCH_ROCKETS","payload":42}"#).unwrap();
        assert_eq!(action, Action::Unknown);
        store.dispatch(action);

        for json in [
            r#"{"type":"LAUNCH_ROCKETS"}"#,
            r#"{"type":"LAUNCH_ROCKETS","payload":null}"#,
            r#"{"type":"LAUNCH_ROCKETS","payload":{"x":1}}"#,
            r#"{"type":"LAUNCH_ROCKETS","payload":[1,2,3]}"#,
        ] {
            let action: Action = serde_json::from_str(json).unwrap();
            assert_eq!(action, Action::Unknown);
            store.dispatch(action);
        }

        assert_eq!(*store.state(), *before);
    }

    #[test]
    fn test_action_wire_format() {
        let json = serde_json::to_value(Action::SetLoading(true)).unwrap();
        assert_eq!(json["type"], "SET_LOADING");
        assert_eq!(json["payload"], true);

        let parsed: Action =
            serde_json::from_str(r#"{"type":"UPDATE_APPLICANT","payload":{"id":"a","updates":{"status":"accepted"}}}"#)
                .unwrap();
        assert_eq!(
            parsed,
            Action::UpdateApplicant { id: "a".to_string(), updates: ApplicantPatch::status(ApplicantStatus::Accepted) }
        );

        let cleared: Action = serde_json::from_str(r#"{"type":"SET_ERROR","payload":null}"#).unwrap();
        assert_eq!(cleared, Action::SetError(None));
        assert!(serde_json::from_str::<Action>(r#"{"type":"SET_LOADING","payload":"yes"}"#).is_err());
    }

    #[test]
    fn test_duplicate_ids_are_not_added() {
        let mut store = empty_store();
        let a = applicant("2023120000001");
        store.dispatch(Action::AddApplicant(a.clone()));
        store.dispatch(Action::AddApplicant(a));
        assert_eq!(store.state().applicants.len(), 1);
    }

    #[test]
    fn test_update_status_does_not_touch_others() {
        let mut store = Store::in_memory();
        let before = store.state();
        let target = before.applicants[3].id.clone();

        store.update_applicant_status(&target, ApplicantStatus::Accepted);

        let after = store.state();
        for (old, new) in before.applicants.iter().zip(after.applicants.iter()) {
            if old.id == target {
                let mut expected = old.clone();
                expected.status = ApplicantStatus::Accepted;
                assert_eq!(*new, expected);
            } else {
                assert_eq!(old, new);
            }
        }
        assert_eq!(before.departments, after.departments);
    }

    #[test]
    fn test_interview_record_is_replaced_by_id_only() {
        let record = InterviewRecord {
            id: "i1".to_string(),
            applicant_id: "a1".to_string(),
            time: None,
            location: None,
            score: None,
            evaluation: None,
            status: ApplicantStatus::Interview,
        };
        let state = RecruitmentState {
            interviews: vec![record.clone()],
            ..RecruitmentState::default()
        };

        let mut updated = record.clone();
        updated.score = Some(90);
        let next = reduce(&state, Action::UpdateInterviewRecord(updated.clone()));
        assert_eq!(next.interviews, vec![updated]);

        let stranger = InterviewRecord { id: "i2".to_string(), ..record.clone() };
        let next = reduce(&state, Action::UpdateInterviewRecord(stranger));
        assert_eq!(next.interviews, vec![record]);
    }

    #[test]
    fn test_add_volunteer_choice() {
        let mut store = empty_store();
        store.dispatch(Action::AddApplicant(applicant("2023120000001")));

        store.add_volunteer_choice("2023120000001", "技术部", VolunteerType::Special, 1);
        store.add_volunteer_choice("2023120000001", "策划部", VolunteerType::Normal, 2);
        let before = store.state();
        store.add_volunteer_choice("2023129999999", "技术部", VolunteerType::Normal, 1);

        assert_eq!(*store.state(), *before);
        let volunteers = &store.state().applicants[0].volunteers;
        assert_eq!(volunteers.len(), 2);
        assert_eq!(volunteers[0].department, "技术部");
        assert_eq!(volunteers[1].priority, 2);
    }

    #[test]
    fn test_batch_update_status() {
        let mut store = Store::in_memory();
        let state = store.state();
        let ids = vec![state.applicants[0].id.clone(), state.applicants[1].id.clone(), "missing".to_string()];

        let updated = store.batch_update_status(&ids, ApplicantStatus::Waitlist);

        assert_eq!(updated, 2);
        let after = store.state();
        assert_eq!(after.applicants[0].status, ApplicantStatus::Waitlist);
        assert_eq!(after.applicants[1].status, ApplicantStatus::Waitlist);
    }

    #[test]
    fn test_submit_volunteer_plan() {
        let mut store = empty_store();
        store.dispatch(Action::AddApplicant(applicant("2023120000001")));
        let departments = default_departments();
        let mut plan = VolunteerPlan::new("信息学院", "软件工程");
        plan.add(&departments[0], true).unwrap();
        plan.add(&departments[3], false).unwrap();

        let record = store.submit_volunteer_plan("2023120000001", &plan).unwrap();

        assert_eq!(record.interview_method, InterviewMethod::Joint);
        let state = store.state();
        assert_eq!(state.applications, vec![record]);
        let a = &state.applicants[0];
        assert_eq!(a.department, "技术部");
        assert_eq!(a.volunteer_type, VolunteerType::Special);
        assert_eq!(a.volunteers.len(), 2);

        assert_eq!(
            store.submit_volunteer_plan("2023129999999", &plan),
            Err(ValidationError::UnknownApplicant("2023129999999".to_string()))
        );
    }

    #[test]
    fn test_record_evaluation() {
        let mut store = empty_store();
        let a = applicant("2023120000001");
        let id = a.id.clone();
        store.dispatch(Action::AddApplicant(a));

        store.record_evaluation(&id, 92, "技术功底扎实");

        let state = store.state();
        assert_eq!(state.applicants[0].score, Some(92));
        assert_eq!(state.applicants[0].evaluation.as_deref(), Some("技术功底扎实"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_rejects_malformed_ids() {
        let mut store = Store::in_memory();
        let count = store.state().applicants.len();

        for input in ["", "12345", "20231201920011", "2023-12019200", "abcdefghijklm"] {
            let result = store.verify_identity(input, &CancellationToken::new()).await;
            assert!(!result.valid);
            assert_eq!(result.message.as_deref(), Some("请输入正确的13位学号"));
        }

        let state = store.state();
        assert_eq!(state.applicants.len(), count);
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_rejects_other_years() {
        let mut store = Store::in_memory();
        let count = store.state().applicants.len();

        let result = store.verify_identity("2022120192001", &CancellationToken::new()).await;

        assert!(!result.valid);
        assert_eq!(result.message.as_deref(), Some("只允许2023级学生参与招新"));
        assert_eq!(store.state().applicants.len(), count);
        assert!(!store.state().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_creates_one_applicant() {
        let mut store = empty_store();
        let cancel = CancellationToken::new();

        let result = store.verify_identity("2023120192001", &cancel).await;

        assert_eq!(
            result,
            Verification {
                valid: true,
                college: Some("信息学院".to_string()),
                has_special: Some(true),
                message: None,
            }
        );
        let state = store.state();
        assert_eq!(state.applicants.len(), 1);
        let created = &state.applicants[0];
        assert_eq!(created.student_id, "2023120192001");
        assert_eq!(created.status, ApplicantStatus::Pending);
        assert_eq!(created.college, "信息学院");
        assert_eq!(created.volunteer_type, VolunteerType::Normal);
        assert!(created.name.is_empty());
        assert!(created.volunteers.is_empty());
        assert!(!state.loading);
        assert_eq!(persisted(&store), *state);
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_is_idempotent_per_student_id() {
        let mut store = empty_store();
        let cancel = CancellationToken::new();

        assert!(store.verify_identity("2023140000007", &cancel).await.valid);
        let second = store.verify_identity("2023140000007", &cancel).await;

        assert!(second.valid);
        assert_eq!(second.college.as_deref(), Some("经济管理学院"));
        assert_eq!(second.has_special, Some(false));
        let state = store.state();
        assert_eq!(state.applicants.iter().filter(|a| a.student_id == "2023140000007").count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_maps_unknown_college_codes() {
        let mut store = empty_store();
        let result = store.verify_identity("2023990000001", &CancellationToken::new()).await;
        assert!(result.valid);
        assert_eq!(result.college.as_deref(), Some("其他学院"));
        assert_eq!(result.has_special, Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_lookup_failure_sets_error() {
        let mut store = Store::open(Box::new(MemoryStorage::default()), Box::new(OfflineDirectory));
        let count = store.state().applicants.len();

        let result = store.verify_identity("2023120192001", &CancellationToken::new()).await;

        assert!(!result.valid);
        assert_eq!(result.message.as_deref(), Some(RETRY_MESSAGE));
        let state = store.state();
        assert_eq!(state.error.as_deref(), Some(VERIFY_ERROR));
        assert!(!state.loading);
        assert_eq!(state.applicants.len(), count);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_verification_writes_nothing() {
        let mut store = empty_store();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = store.verify_identity("2023120192001", &cancel).await;

        assert!(!result.valid);
        assert_eq!(result.message.as_deref(), Some(CANCELLED_MESSAGE));
        assert!(store.state().applicants.is_empty());
        assert!(!store.state().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_verification_clears_loading() {
        let mut store = empty_store();
        let cancel = CancellationToken::new();

        let outcome =
            tokio::time::timeout(Duration::from_millis(10), store.verify_identity("2023120192001", &cancel)).await;

        assert!(outcome.is_err());
        assert!(store.state().applicants.is_empty());
        assert!(!store.state().loading);
        assert!(!persisted(&store).loading);
    }
}
