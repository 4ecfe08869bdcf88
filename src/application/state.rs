//! Application state for the terminal front end.
//!
//! [`App`] owns the [`Store`] and whatever view state the current screen
//! needs: the registration wizard, the volunteer plan, the applicant filter
//! and the toast on screen.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use tracing::info;

use super::notice::{Notice, Toast};
use super::registration::{FormRow, INTEREST_OPTIONS, RegistrationWizard, Step};
use super::store::{Action, Store};
use crate::domain::{
    ApplicantFilter, ApplicantStatus, CsvExporter, CurrentUser, Skill, UserRole, VolunteerPlan,
};

/// The screen currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Registration,
    /// Landing view after registration: profile summary and volunteer choices.
    StudentHome,
    /// Interviewer view over all applicants.
    Applicants,
}

/// Represents the current mode of the application.
///
/// The mode decides how keys are interpreted, independently of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Navigation and shortcuts
    Normal,
    /// Typing into a form row
    Editing,
    /// Typing a search query on the applicant screen
    Search,
    /// Help popup is displayed
    Help,
}

/// Entries of the home menu, in display order.
pub const HOME_ITEMS: [&str; 4] = ["学生报名", "我的报名", "报名管理（面试官）", "退出"];

/// Main application state.
///
/// # Examples
///
/// ```
/// use recruit::application::{App, Screen, Store};
///
/// let app = App::new(Store::in_memory(), "applicants.csv".into());
/// assert_eq!(app.screen, Screen::Home);
/// assert!(app.wizard.is_none());
/// ```
pub struct App {
    pub store: Store,
    pub screen: Screen,
    pub mode: AppMode,
    pub wizard: Option<RegistrationWizard>,
    pub plan: Option<VolunteerPlan>,
    /// Highlighted entry of the home menu
    pub home_index: usize,
    /// Highlighted form row on the registration screen
    pub selected_field: usize,
    /// Highlighted department on the student home
    pub department_index: usize,
    /// Highlighted applicant within the filtered list
    pub selected_row: usize,
    /// Ids of applicants marked for a batch operation
    pub selection: BTreeSet<String>,
    pub filter: ApplicantFilter,
    /// Input buffer for editing and search
    pub input: String,
    /// Cursor position within the input buffer, in characters
    pub cursor_position: usize,
    pub help_scroll: usize,
    pub toast: Option<Toast>,
    /// When set, the student home opens once this instant has passed.
    pub pending_redirect: Option<Instant>,
    /// Whether a student id lookup is in flight
    pub verifying: bool,
    pub export_path: PathBuf,
}

impl App {
    pub fn new(store: Store, export_path: PathBuf) -> Self {
        Self {
            store,
            screen: Screen::Home,
            mode: AppMode::Normal,
            wizard: None,
            plan: None,
            home_index: 0,
            selected_field: 0,
            department_index: 0,
            selected_row: 0,
            selection: BTreeSet::new(),
            filter: ApplicantFilter::default(),
            input: String::new(),
            cursor_position: 0,
            help_scroll: 0,
            toast: None,
            pending_redirect: None,
            verifying: false,
            export_path,
        }
    }

    pub fn notify(&mut self, notice: Notice) {
        self.toast = Some(Toast::new(notice, Instant::now()));
    }

    /// Expires the toast and performs a due redirect.
    pub fn tick(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
        if self.pending_redirect.is_some_and(|at| now >= at) {
            self.pending_redirect = None;
            self.open_student_home();
        }
    }

    pub fn go_home(&mut self) {
        self.screen = Screen::Home;
        self.mode = AppMode::Normal;
        self.wizard = None;
        self.plan = None;
        self.pending_redirect = None;
        self.verifying = false;
    }

    pub fn activate_home_item(&mut self) {
        match self.home_index {
            0 => self.open_registration(),
            1 => self.open_student_home(),
            2 => self.open_applicants(),
            _ => {}
        }
    }

    pub fn open_registration(&mut self) {
        self.wizard = Some(RegistrationWizard::new());
        self.screen = Screen::Registration;
        self.mode = AppMode::Normal;
        self.selected_field = 0;
    }

    /// Opens the landing view for the registered student.
    ///
    /// Requires a committed draft profile; otherwise an error notice is shown
    /// and the screen does not change.
    pub fn open_student_home(&mut self) {
        let state = self.store.state();
        let Some(draft) = state.draft_profile.as_ref().filter(|_| state.is_authenticated) else {
            self.notify(Notice::error("请先完成报名"));
            return;
        };
        self.plan = Some(VolunteerPlan::new(&draft.college, &draft.major));
        self.wizard = None;
        self.department_index = 0;
        self.screen = Screen::StudentHome;
        self.mode = AppMode::Normal;
    }

    pub fn open_applicants(&mut self) {
        self.store.dispatch(Action::SetCurrentUser(Some(CurrentUser {
            id: "interviewer".to_string(),
            role: UserRole::Interviewer,
            name: "面试官".to_string(),
            department: None,
        })));
        self.wizard = None;
        self.selected_row = 0;
        self.selection.clear();
        self.screen = Screen::Applicants;
        self.mode = AppMode::Normal;
    }

    pub fn move_up(&mut self) {
        match self.screen {
            Screen::Home => self.home_index = self.home_index.saturating_sub(1),
            Screen::Registration => self.selected_field = self.selected_field.saturating_sub(1),
            Screen::StudentHome => self.department_index = self.department_index.saturating_sub(1),
            Screen::Applicants => self.selected_row = self.selected_row.saturating_sub(1),
        }
    }

    pub fn move_down(&mut self) {
        let len = match self.screen {
            Screen::Home => HOME_ITEMS.len(),
            Screen::Registration => self.wizard_rows().len(),
            Screen::StudentHome => self.store.state().departments.len(),
            Screen::Applicants => self.visible_count(),
        };
        let index = match self.screen {
            Screen::Home => &mut self.home_index,
            Screen::Registration => &mut self.selected_field,
            Screen::StudentHome => &mut self.department_index,
            Screen::Applicants => &mut self.selected_row,
        };
        if *index + 1 < len {
            *index += 1;
        }
    }

    pub fn wizard_rows(&self) -> Vec<FormRow> {
        self.wizard.as_ref().map(|w| w.rows()).unwrap_or_default()
    }

    pub fn current_row(&self) -> Option<FormRow> {
        self.wizard_rows().get(self.selected_field).copied()
    }

    fn clamp_selected_field(&mut self) {
        let len = self.wizard_rows().len();
        if self.selected_field >= len {
            self.selected_field = len.saturating_sub(1);
        }
    }

    /// Starts editing the highlighted form row.
    ///
    /// Interest rows toggle instead of opening the editor. The avatar row
    /// starts empty since it takes a file path rather than its stored value.
    pub fn start_editing(&mut self) {
        let Some(row) = self.current_row() else {
            return;
        };
        let Some(wizard) = self.wizard.as_mut() else {
            return;
        };
        match row {
            FormRow::Interest(i) => {
                wizard.toggle_interest(INTEREST_OPTIONS[i]);
            }
            FormRow::Avatar => {
                self.input.clear();
                self.cursor_position = 0;
                self.mode = AppMode::Editing;
            }
            _ => {
                self.input = wizard.row_value(row);
                self.cursor_position = self.input.chars().count();
                self.mode = AppMode::Editing;
            }
        }
    }

    /// Writes the input buffer into the highlighted row and returns to normal mode.
    pub fn finish_editing(&mut self) {
        let input = std::mem::take(&mut self.input);
        self.cursor_position = 0;
        self.mode = AppMode::Normal;

        let (Some(row), Some(wizard)) = (self.current_row(), self.wizard.as_mut()) else {
            return;
        };
        if let Err(err) = wizard.edit_row(row, &input) {
            self.notify(Notice::error(err.to_string()));
        }
    }

    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.input.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(self.input.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor_position);
        self.input.insert(at, c);
        self.cursor_position += 1;
        self.sync_search();
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let at = self.byte_offset(self.cursor_position - 1);
        self.input.remove(at);
        self.cursor_position -= 1;
        self.sync_search();
    }

    pub fn delete_at_cursor(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            let at = self.byte_offset(self.cursor_position);
            self.input.remove(at);
            self.sync_search();
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input.chars().count();
    }

    /// Whether the highlighted registration step is waiting on verification.
    pub fn can_verify(&self) -> bool {
        !self.verifying
            && self
                .wizard
                .as_ref()
                .is_some_and(|w| w.step() == Step::Identity && !w.is_identity_verified())
    }

    /// Runs the student id lookup for the open wizard.
    pub async fn run_verification(&mut self) {
        let Some(wizard) = self.wizard.as_mut() else {
            return;
        };
        self.verifying = true;
        let notice = wizard.verify(&mut self.store).await;
        self.verifying = false;
        if wizard.is_identity_verified() {
            self.selected_field = 0;
        }
        self.notify(notice);
    }

    /// Runs the lookup unless `abandon` resolves first, in which case the
    /// lookup is cancelled and the wizard is closed.
    ///
    /// Returns `true` when the wizard was abandoned.
    pub async fn run_verification_until<F>(&mut self, abandon: F) -> bool
    where
        F: Future<Output = ()>,
    {
        let Some(cancel) = self.wizard.as_ref().map(|w| w.cancellation_token()) else {
            return false;
        };
        let abandoned = {
            let verification = self.run_verification();
            tokio::pin!(verification);
            tokio::pin!(abandon);
            tokio::select! {
                biased;
                _ = &mut verification => false,
                _ = &mut abandon => {
                    cancel.cancel();
                    verification.await;
                    true
                }
            }
        };
        if abandoned {
            info!("verification abandoned");
            self.go_home();
        }
        abandoned
    }

    pub fn next_step(&mut self) {
        let Some(wizard) = self.wizard.as_mut() else {
            return;
        };
        match wizard.next() {
            Ok(()) => self.selected_field = 0,
            Err(err) => self.notify(Notice::error(err.to_string())),
        }
    }

    pub fn previous_step(&mut self) {
        if let Some(wizard) = self.wizard.as_mut() {
            wizard.back();
            self.selected_field = 0;
        }
    }

    pub fn reset_identity(&mut self) {
        if let Some(wizard) = self.wizard.as_mut() {
            wizard.reset_identity();
            self.selected_field = 0;
        }
    }

    /// Submits the registration and schedules the redirect to the student home.
    pub fn submit_registration(&mut self) {
        let Some(wizard) = self.wizard.as_mut() else {
            return;
        };
        match wizard.submit(&mut self.store) {
            Ok(completion) => {
                self.pending_redirect = Some(Instant::now() + completion.redirect_after);
                self.notify(completion.notice);
            }
            Err(err) => self.notify(Notice::error(err.to_string())),
        }
    }

    pub fn add_skill(&mut self) {
        if let Some(wizard) = self.wizard.as_mut().filter(|w| w.step() == Step::SkillsPortfolio) {
            wizard.add_skill();
            let skills = wizard.draft().skills.len();
            self.selected_field = (skills - 1) * 2;
        }
    }

    pub fn add_link(&mut self) {
        if let Some(wizard) = self.wizard.as_mut().filter(|w| w.step() == Step::SkillsPortfolio) {
            wizard.add_link();
            self.selected_field = wizard.rows().len() - 2;
        }
    }

    /// Removes the skill or link the highlighted row belongs to.
    pub fn remove_current_item(&mut self) {
        let Some(row) = self.current_row() else {
            return;
        };
        let Some(wizard) = self.wizard.as_mut() else {
            return;
        };
        match row {
            FormRow::SkillName(i) | FormRow::SkillLevel(i) => wizard.remove_skill(i),
            FormRow::LinkTitle(i) | FormRow::LinkUrl(i) => wizard.remove_link(i),
            FormRow::Avatar => wizard.clear_avatar(),
            _ => return,
        }
        self.clamp_selected_field();
    }

    pub fn adjust_skill_level(&mut self, delta: i8) {
        let Some(FormRow::SkillName(i) | FormRow::SkillLevel(i)) = self.current_row() else {
            return;
        };
        if let Some(wizard) = self.wizard.as_mut() {
            let current = wizard.draft().skills.get(i).map_or(Skill::MIN_LEVEL, |s| s.level);
            wizard.set_skill_level(i, current.saturating_add_signed(delta));
        }
    }

    /// Adds the highlighted department to the volunteer plan.
    pub fn add_choice(&mut self, special: bool) {
        let state = self.store.state();
        let (Some(plan), Some(department)) = (self.plan.as_mut(), state.departments.get(self.department_index)) else {
            return;
        };
        if let Err(err) = plan.add(department, special) {
            self.notify(Notice::warning(err.to_string()));
        }
    }

    pub fn remove_choice(&mut self) {
        let state = self.store.state();
        if let (Some(plan), Some(department)) = (self.plan.as_mut(), state.departments.get(self.department_index)) {
            plan.remove(&department.id);
        }
    }

    /// Moves the highlighted department's choice up one priority.
    pub fn promote_choice(&mut self) {
        let state = self.store.state();
        let (Some(plan), Some(department)) = (self.plan.as_mut(), state.departments.get(self.department_index)) else {
            return;
        };
        if let Some(pos) = plan.choices().iter().position(|c| c.department_id == department.id) {
            if pos > 0 {
                plan.move_choice(pos, pos - 1);
            }
        }
    }

    pub fn submit_plan(&mut self) {
        let state = self.store.state();
        let (Some(plan), Some(draft)) = (self.plan.as_ref(), state.draft_profile.as_ref()) else {
            return;
        };
        match self.store.submit_volunteer_plan(&draft.student_id, plan) {
            Ok(record) => {
                let message = format!("志愿提交成功，面试方式：{}", record.interview_method.label());
                self.notify(Notice::success(message));
            }
            Err(err) => self.notify(Notice::error(err.to_string())),
        }
    }

    fn visible_count(&self) -> usize {
        self.filter.apply(&self.store.state().applicants).len()
    }

    /// Id of the highlighted applicant in the filtered list.
    pub fn current_applicant_id(&self) -> Option<String> {
        let state = self.store.state();
        self.filter
            .apply(&state.applicants)
            .get(self.selected_row)
            .map(|a| a.id.clone())
    }

    pub fn next_tab(&mut self) {
        self.filter.tab = self.filter.tab.next();
        self.selected_row = 0;
    }

    pub fn previous_tab(&mut self) {
        self.filter.tab = self.filter.tab.previous();
        self.selected_row = 0;
    }

    pub fn start_search(&mut self) {
        self.mode = AppMode::Search;
        self.input = self.filter.query.clone();
        self.cursor_position = self.input.chars().count();
    }

    /// Keeps the filter query in step with the input while searching.
    fn sync_search(&mut self) {
        if self.mode == AppMode::Search {
            self.filter.query = self.input.trim().to_string();
            self.selected_row = 0;
        }
    }

    pub fn finish_search(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn cancel_search(&mut self) {
        self.filter.query.clear();
        self.selected_row = 0;
        self.finish_search();
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.current_applicant_id() {
            if !self.selection.remove(&id) {
                self.selection.insert(id);
            }
        }
    }

    /// Marks every applicant in the filtered list, or clears the marks if all are set.
    pub fn toggle_select_all(&mut self) {
        let state = self.store.state();
        let visible: Vec<String> = self.filter.apply(&state.applicants).iter().map(|a| a.id.clone()).collect();
        if visible.iter().all(|id| self.selection.contains(id)) {
            self.selection.clear();
        } else {
            self.selection.extend(visible);
        }
    }

    /// Applies `status` to the marked applicants, or to the highlighted one if none are marked.
    pub fn set_status(&mut self, status: ApplicantStatus) {
        let ids: Vec<String> = if self.selection.is_empty() {
            self.current_applicant_id().into_iter().collect()
        } else {
            self.selection.iter().cloned().collect()
        };
        if ids.is_empty() {
            return;
        }
        let updated = self.store.batch_update_status(&ids, status);
        self.selection.clear();
        self.selected_row = self.selected_row.min(self.visible_count().saturating_sub(1));
        self.notify(Notice::success(format!("已将 {updated} 名申请人标记为{}", status.label())));
    }

    pub fn export_csv(&mut self) {
        let state = self.store.state();
        match CsvExporter::export_to_file(&state.applicants, &self.export_path) {
            Ok(count) => {
                info!(count, path = %self.export_path.display(), "exported applicants");
                let message = format!("已导出 {count} 条记录到 {}", self.export_path.display());
                self.notify(Notice::success(message));
            }
            Err(err) => self.notify(Notice::error(format!("导出失败: {err}"))),
        }
    }

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn hide_help(&mut self) {
        self.mode = AppMode::Normal;
    }
}
