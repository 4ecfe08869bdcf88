//! The five-step registration wizard.
//!
//! A single [`RegistrationDraft`] lives for the whole wizard, so moving back and
//! forth between steps never loses input. Only identity verification gates
//! forward navigation; the remaining fields are checked once, on submit.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::notice::Notice;
use super::store::{Action, RETRY_MESSAGE, Store};
use crate::domain::identity::default_display_name;
use crate::domain::validation::validate_submission;
use crate::domain::{PortfolioLink, RegistrationDraft, Skill, ValidationError, ValidationResult};
use crate::infrastructure::{AvatarError, encode_data_url};

/// Delay between a successful submission and the switch to the student home.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

pub const VERIFIED_MESSAGE: &str = "学号验证成功";
pub const SUBMITTED_MESSAGE: &str = "报名信息提交成功！";

/// The fixed interest vocabulary offered on the last step.
pub const INTEREST_OPTIONS: [&str; 15] = [
    "编程开发",
    "网络技术",
    "人工智能",
    "数据分析",
    "机器学习",
    "活动策划",
    "宣传设计",
    "公关组织",
    "新媒体运营",
    "视频制作",
    "文案写作",
    "项目管理",
    "团队协作",
    "演讲辩论",
    "创新思维",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Identity,
    Contact,
    Profile,
    SkillsPortfolio,
    InterestsSubmit,
    /// Terminal state after a successful submission.
    Submitted,
}

impl Step {
    pub const FORM_STEPS: [Step; 5] = [
        Step::Identity,
        Step::Contact,
        Step::Profile,
        Step::SkillsPortfolio,
        Step::InterestsSubmit,
    ];

    /// One-based position shown in the progress bar.
    pub fn number(self) -> usize {
        match self {
            Step::Identity => 1,
            Step::Contact => 2,
            Step::Profile => 3,
            Step::SkillsPortfolio => 4,
            Step::InterestsSubmit | Step::Submitted => 5,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Identity => "基本信息",
            Step::Contact => "联系方式",
            Step::Profile => "个人简介",
            Step::SkillsPortfolio => "技能与作品",
            Step::InterestsSubmit | Step::Submitted => "兴趣与成就",
        }
    }

    fn following(self) -> Step {
        match self {
            Step::Identity => Step::Contact,
            Step::Contact => Step::Profile,
            Step::Profile => Step::SkillsPortfolio,
            Step::SkillsPortfolio | Step::InterestsSubmit => Step::InterestsSubmit,
            Step::Submitted => Step::Submitted,
        }
    }

    fn preceding(self) -> Step {
        match self {
            Step::Identity | Step::Contact => Step::Identity,
            Step::Profile => Step::Contact,
            Step::SkillsPortfolio => Step::Profile,
            Step::InterestsSubmit => Step::SkillsPortfolio,
            Step::Submitted => Step::Submitted,
        }
    }
}

/// Free-text draft fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    StudentId,
    Name,
    Major,
    Phone,
    Wechat,
    Email,
    Biography,
    Achievements,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::StudentId => "学号",
            Field::Name => "姓名",
            Field::Major => "专业",
            Field::Phone => "手机号码",
            Field::Wechat => "微信号",
            Field::Email => "邮箱",
            Field::Biography => "个人简介",
            Field::Achievements => "获奖经历",
        }
    }
}

/// One selectable line of the form for the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    Text(Field),
    Avatar,
    SkillName(usize),
    SkillLevel(usize),
    LinkTitle(usize),
    LinkUrl(usize),
    Interest(usize),
}

impl FormRow {
    pub fn label(self) -> String {
        match self {
            FormRow::Text(field) => field.label().to_string(),
            FormRow::Avatar => "头像".to_string(),
            FormRow::SkillName(i) => format!("技能 {}", i + 1),
            FormRow::SkillLevel(i) => format!("技能 {} 等级", i + 1),
            FormRow::LinkTitle(i) => format!("作品 {} 标题", i + 1),
            FormRow::LinkUrl(i) => format!("作品 {} 链接", i + 1),
            FormRow::Interest(i) => INTEREST_OPTIONS.get(i).copied().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Avatar(#[from] AvatarError),
    #[error("技能等级必须是1到5之间的数字")]
    InvalidLevel,
    #[error("该项不能直接编辑")]
    NotEditable,
}

/// Emitted once the draft has been committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub redirect_after: Duration,
    pub notice: Notice,
}

/// Wizard state for one registration attempt.
///
/// Dropping the wizard cancels any verification still waiting on the lookup.
#[derive(Debug)]
pub struct RegistrationWizard {
    step: Step,
    draft: RegistrationDraft,
    identity_verified: bool,
    has_special: bool,
    cancel: CancellationToken,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RegistrationWizard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self {
            step: Step::Identity,
            draft: RegistrationDraft::default(),
            identity_verified: false,
            has_special: false,
            cancel: CancellationToken::new(),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub fn is_identity_verified(&self) -> bool {
        self.identity_verified
    }

    /// Whether the verified college may use the special recruitment track.
    pub fn has_special(&self) -> bool {
        self.has_special
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn set_student_id(&mut self, student_id: &str) -> ValidationResult<()> {
        if self.identity_verified {
            return Err(ValidationError::StudentIdLocked);
        }
        self.draft.student_id = student_id.trim().to_string();
        Ok(())
    }

    /// Unlocks the student id and returns to the first step. Other draft data is kept.
    pub fn reset_identity(&mut self) {
        self.identity_verified = false;
        self.has_special = false;
        self.draft.college.clear();
        self.step = Step::Identity;
    }

    pub fn field_value(&self, field: Field) -> &str {
        match field {
            Field::StudentId => &self.draft.student_id,
            Field::Name => &self.draft.name,
            Field::Major => &self.draft.major,
            Field::Phone => &self.draft.phone,
            Field::Wechat => &self.draft.wechat,
            Field::Email => &self.draft.email,
            Field::Biography => &self.draft.biography,
            Field::Achievements => &self.draft.achievements,
        }
    }

    pub fn set_field(&mut self, field: Field, value: &str) -> ValidationResult<()> {
        let slot = match field {
            Field::StudentId => return self.set_student_id(value),
            Field::Name => &mut self.draft.name,
            Field::Major => &mut self.draft.major,
            Field::Phone => &mut self.draft.phone,
            Field::Wechat => &mut self.draft.wechat,
            Field::Email => &mut self.draft.email,
            Field::Biography => &mut self.draft.biography,
            Field::Achievements => &mut self.draft.achievements,
        };
        *slot = value.to_string();
        Ok(())
    }

    /// Verifies the entered student id through the store.
    ///
    /// On success the resolved college is merged into the draft, the name is
    /// filled in if still empty, and the wizard moves to the contact step.
    pub async fn verify(&mut self, store: &mut Store) -> Notice {
        if self.identity_verified {
            return Notice::info(VERIFIED_MESSAGE);
        }
        let student_id = self.draft.student_id.clone();
        let result = store.verify_identity(&student_id, &self.cancel).await;
        if !result.valid {
            return Notice::error(result.message.unwrap_or_else(|| RETRY_MESSAGE.to_string()));
        }

        self.draft.college = result.college.unwrap_or_default();
        self.has_special = result.has_special.unwrap_or(false);
        if self.draft.name.trim().is_empty() {
            if let Some(name) = default_display_name(&student_id) {
                self.draft.name = name;
            }
        }
        self.identity_verified = true;
        self.step = Step::Contact;
        Notice::success(VERIFIED_MESSAGE)
    }

    pub fn next(&mut self) -> ValidationResult<()> {
        if self.step == Step::Identity && !self.identity_verified {
            return Err(ValidationError::IdentityNotVerified);
        }
        self.step = self.step.following();
        Ok(())
    }

    pub fn back(&mut self) {
        self.step = self.step.preceding();
    }

    pub fn add_skill(&mut self) {
        self.draft.skills.push(Skill::default());
    }

    pub fn remove_skill(&mut self, index: usize) {
        if index < self.draft.skills.len() {
            self.draft.skills.remove(index);
        }
    }

    pub fn set_skill_name(&mut self, index: usize, name: &str) {
        if let Some(skill) = self.draft.skills.get_mut(index) {
            skill.name = name.to_string();
        }
    }

    /// Sets a skill level, clamped to the 1..=5 scale.
    pub fn set_skill_level(&mut self, index: usize, level: u8) {
        if let Some(skill) = self.draft.skills.get_mut(index) {
            skill.level = level.clamp(Skill::MIN_LEVEL, Skill::MAX_LEVEL);
        }
    }

    pub fn add_link(&mut self) {
        self.draft.portfolio_links.push(PortfolioLink::default());
    }

    pub fn remove_link(&mut self, index: usize) {
        if index < self.draft.portfolio_links.len() {
            self.draft.portfolio_links.remove(index);
        }
    }

    pub fn set_link_title(&mut self, index: usize, title: &str) {
        if let Some(link) = self.draft.portfolio_links.get_mut(index) {
            link.title = title.to_string();
        }
    }

    pub fn set_link_url(&mut self, index: usize, url: &str) {
        if let Some(link) = self.draft.portfolio_links.get_mut(index) {
            link.url = url.to_string();
        }
    }

    /// Toggles an interest from [`INTEREST_OPTIONS`]. Returns whether it is now selected.
    pub fn toggle_interest(&mut self, interest: &str) -> bool {
        if !INTEREST_OPTIONS.contains(&interest) {
            return false;
        }
        if let Some(pos) = self.draft.interests.iter().position(|i| i == interest) {
            self.draft.interests.remove(pos);
            false
        } else {
            self.draft.interests.push(interest.to_string());
            true
        }
    }

    pub fn has_interest(&self, interest: &str) -> bool {
        self.draft.interests.iter().any(|i| i == interest)
    }

    pub fn attach_avatar(&mut self, path: &Path) -> Result<(), AvatarError> {
        self.draft.avatar = Some(encode_data_url(path)?);
        Ok(())
    }

    pub fn clear_avatar(&mut self) {
        self.draft.avatar = None;
    }

    /// Selectable rows for the current step.
    pub fn rows(&self) -> Vec<FormRow> {
        match self.step {
            Step::Identity => vec![
                FormRow::Text(Field::StudentId),
                FormRow::Text(Field::Name),
                FormRow::Text(Field::Major),
            ],
            Step::Contact => vec![
                FormRow::Text(Field::Phone),
                FormRow::Text(Field::Wechat),
                FormRow::Text(Field::Email),
            ],
            Step::Profile => vec![FormRow::Text(Field::Biography), FormRow::Avatar],
            Step::SkillsPortfolio => {
                let skills = (0..self.draft.skills.len()).flat_map(|i| [FormRow::SkillName(i), FormRow::SkillLevel(i)]);
                let links =
                    (0..self.draft.portfolio_links.len()).flat_map(|i| [FormRow::LinkTitle(i), FormRow::LinkUrl(i)]);
                skills.chain(links).collect()
            }
            Step::InterestsSubmit => (0..INTEREST_OPTIONS.len())
                .map(FormRow::Interest)
                .chain(std::iter::once(FormRow::Text(Field::Achievements)))
                .collect(),
            Step::Submitted => Vec::new(),
        }
    }

    /// Current text of a row, as shown in the form.
    pub fn row_value(&self, row: FormRow) -> String {
        match row {
            FormRow::Text(field) => self.field_value(field).to_string(),
            FormRow::Avatar => match &self.draft.avatar {
                Some(url) => format!("已上传 ({} 字节)", url.len()),
                None => String::new(),
            },
            FormRow::SkillName(i) => self.draft.skills.get(i).map(|s| s.name.clone()).unwrap_or_default(),
            FormRow::SkillLevel(i) => self.draft.skills.get(i).map(|s| s.level.to_string()).unwrap_or_default(),
            FormRow::LinkTitle(i) => self.draft.portfolio_links.get(i).map(|l| l.title.clone()).unwrap_or_default(),
            FormRow::LinkUrl(i) => self.draft.portfolio_links.get(i).map(|l| l.url.clone()).unwrap_or_default(),
            FormRow::Interest(i) => {
                let selected = INTEREST_OPTIONS.get(i).is_some_and(|name| self.has_interest(name));
                if selected { "[x]".to_string() } else { "[ ]".to_string() }
            }
        }
    }

    /// Applies typed input to a row. For the avatar row the input is a file path.
    pub fn edit_row(&mut self, row: FormRow, input: &str) -> Result<(), EditError> {
        match row {
            FormRow::Text(field) => self.set_field(field, input)?,
            FormRow::Avatar => {
                let path = input.trim();
                if path.is_empty() {
                    self.clear_avatar();
                } else {
                    self.attach_avatar(Path::new(path))?;
                }
            }
            FormRow::SkillName(i) => self.set_skill_name(i, input),
            FormRow::SkillLevel(i) => {
                let level = input.trim().parse::<u8>().map_err(|_| EditError::InvalidLevel)?;
                self.set_skill_level(i, level);
            }
            FormRow::LinkTitle(i) => self.set_link_title(i, input),
            FormRow::LinkUrl(i) => self.set_link_url(i, input),
            FormRow::Interest(_) => return Err(EditError::NotEditable),
        }
        Ok(())
    }

    /// Commits the draft as the applicant's profile and signs the student in.
    ///
    /// Only possible from the last step. Submitting again repeats the same write.
    pub fn submit(&mut self, store: &mut Store) -> ValidationResult<Completion> {
        if !matches!(self.step, Step::InterestsSubmit | Step::Submitted) {
            return Err(ValidationError::NotAtFinalStep);
        }
        validate_submission(&self.draft)?;

        store.dispatch(Action::SetDraftProfile(self.draft.clone()));
        store.dispatch(Action::SetAuthenticated(true));
        info!(student_id = %self.draft.student_id, "registration submitted");

        self.step = Step::Submitted;
        Ok(Completion {
            redirect_after: REDIRECT_DELAY,
            notice: Notice::success(SUBMITTED_MESSAGE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::notice::NoticeKind;

    const STUDENT_ID: &str = "2023120192001";

    async fn verified(store: &mut Store) -> RegistrationWizard {
        let mut wizard = RegistrationWizard::new();
        wizard.set_student_id(STUDENT_ID).unwrap();
        let notice = wizard.verify(store).await;
        assert_eq!(notice.kind, NoticeKind::Success);
        wizard
    }

    fn fill_contact(wizard: &mut RegistrationWizard) {
        wizard.set_field(Field::Phone, "13812345678").unwrap();
        wizard.set_field(Field::Wechat, "wx_li").unwrap();
    }

    fn advance_to_last_step(wizard: &mut RegistrationWizard) {
        while wizard.step() != Step::InterestsSubmit {
            wizard.next().unwrap();
        }
    }

    #[test]
    fn test_new_wizard_is_locked_at_identity() {
        let mut wizard = RegistrationWizard::new();
        assert_eq!(wizard.step(), Step::Identity);
        assert_eq!(wizard.next(), Err(ValidationError::IdentityNotVerified));
        assert_eq!(wizard.step(), Step::Identity);
    }

    #[test]
    fn test_step_titles() {
        let titles: Vec<_> = Step::FORM_STEPS.iter().map(|s| s.title()).collect();
        assert_eq!(titles, ["基本信息", "联系方式", "个人简介", "技能与作品", "兴趣与成就"]);
        assert_eq!(Step::Submitted.number(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_success_advances_and_fills_defaults() {
        let mut store = Store::in_memory();
        let wizard = verified(&mut store).await;

        assert_eq!(wizard.step(), Step::Contact);
        assert!(wizard.is_identity_verified());
        assert!(wizard.has_special());
        assert_eq!(wizard.draft().college, "信息学院");
        assert_eq!(wizard.draft().name, "李芳");
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_keeps_typed_name() {
        let mut store = Store::in_memory();
        let mut wizard = RegistrationWizard::new();
        wizard.set_field(Field::Name, "王小明").unwrap();
        wizard.set_student_id(STUDENT_ID).unwrap();

        wizard.verify(&mut store).await;

        assert_eq!(wizard.draft().name, "王小明");
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_failure_stays_on_identity() {
        let mut store = Store::in_memory();
        let mut wizard = RegistrationWizard::new();
        wizard.set_student_id("2022120192001").unwrap();

        let notice = wizard.verify(&mut store).await;

        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "只允许2023级学生参与招新");
        assert_eq!(wizard.step(), Step::Identity);
        assert!(!wizard.is_identity_verified());
        assert!(wizard.draft().college.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_student_id_locked_until_reset() {
        let mut store = Store::in_memory();
        let mut wizard = verified(&mut store).await;

        assert_eq!(wizard.set_student_id("2023110000001"), Err(ValidationError::StudentIdLocked));
        assert_eq!(wizard.draft().student_id, STUDENT_ID);

        wizard.reset_identity();
        assert_eq!(wizard.step(), Step::Identity);
        assert!(wizard.set_student_id("2023110000001").is_ok());
        assert_eq!(wizard.next(), Err(ValidationError::IdentityNotVerified));
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_then_forward_preserves_values() {
        let mut store = Store::in_memory();
        let mut wizard = verified(&mut store).await;
        fill_contact(&mut wizard);
        wizard.next().unwrap();
        wizard.set_field(Field::Biography, "热爱开源").unwrap();

        wizard.back();
        wizard.back();
        assert_eq!(wizard.step(), Step::Identity);
        wizard.back();
        assert_eq!(wizard.step(), Step::Identity);
        wizard.next().unwrap();
        wizard.next().unwrap();

        assert_eq!(wizard.step(), Step::Profile);
        assert_eq!(wizard.field_value(Field::Phone), "13812345678");
        assert_eq!(wizard.field_value(Field::Wechat), "wx_li");
        assert_eq!(wizard.field_value(Field::Biography), "热爱开源");
    }

    #[test]
    fn test_skills_and_links_edit_in_place() {
        let mut wizard = RegistrationWizard::new();
        wizard.add_skill();
        wizard.add_skill();
        wizard.set_skill_name(0, "Rust");
        wizard.set_skill_level(0, 9);
        wizard.set_skill_level(1, 0);
        wizard.set_skill_name(7, "ignored");
        wizard.remove_skill(7);

        assert_eq!(wizard.draft().skills[0], Skill { name: "Rust".to_string(), level: 5 });
        assert_eq!(wizard.draft().skills[1].level, 1);

        wizard.add_link();
        wizard.set_link_title(0, "博客");
        wizard.set_link_url(0, "https://example.org");
        wizard.remove_skill(0);

        assert_eq!(wizard.draft().skills.len(), 1);
        assert_eq!(wizard.draft().portfolio_links[0].url, "https://example.org");
        wizard.remove_link(0);
        assert!(wizard.draft().portfolio_links.is_empty());
    }

    #[test]
    fn test_toggle_interest_only_accepts_vocabulary() {
        let mut wizard = RegistrationWizard::new();
        assert!(wizard.toggle_interest("人工智能"));
        assert!(!wizard.toggle_interest("打游戏"));
        assert_eq!(wizard.draft().interests, vec!["人工智能".to_string()]);
        assert!(!wizard.toggle_interest("人工智能"));
        assert!(wizard.draft().interests.is_empty());
    }

    #[test]
    fn test_edit_row() {
        let mut wizard = RegistrationWizard::new();
        wizard.add_skill();

        wizard.edit_row(FormRow::SkillLevel(0), "4").unwrap();
        assert_eq!(wizard.row_value(FormRow::SkillLevel(0)), "4");
        assert!(matches!(wizard.edit_row(FormRow::SkillLevel(0), "high"), Err(EditError::InvalidLevel)));
        assert!(matches!(wizard.edit_row(FormRow::Interest(0), "x"), Err(EditError::NotEditable)));

        wizard.toggle_interest(INTEREST_OPTIONS[0]);
        assert_eq!(wizard.row_value(FormRow::Interest(0)), "[x]");
        assert_eq!(wizard.row_value(FormRow::Interest(1)), "[ ]");
    }

    #[test]
    fn test_avatar_is_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("me.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        let mut wizard = RegistrationWizard::new();

        wizard.edit_row(FormRow::Avatar, path.to_str().unwrap()).unwrap();
        assert_eq!(wizard.draft().avatar.as_deref(), Some("data:image/png;base64,AQID"));

        wizard.edit_row(FormRow::Avatar, "").unwrap();
        assert!(wizard.draft().avatar.is_none());
    }

    #[test]
    fn test_submit_requires_last_step() {
        let mut store = Store::in_memory();
        let mut wizard = RegistrationWizard::new();
        assert_eq!(wizard.submit(&mut store), Err(ValidationError::NotAtFinalStep));
        assert!(!store.state().is_authenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_with_empty_name_is_blocked() {
        let mut store = Store::in_memory();
        let mut wizard = verified(&mut store).await;
        fill_contact(&mut wizard);
        wizard.set_field(Field::Name, "  ").unwrap();
        advance_to_last_step(&mut wizard);

        assert_eq!(wizard.submit(&mut store), Err(ValidationError::MissingName));
        assert_eq!(wizard.step(), Step::InterestsSubmit);
        assert!(!store.state().is_authenticated);
        assert!(store.state().draft_profile.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_checks_phone_then_wechat() {
        let mut store = Store::in_memory();
        let mut wizard = verified(&mut store).await;
        wizard.set_field(Field::Phone, "12812345678").unwrap();
        advance_to_last_step(&mut wizard);

        assert_eq!(wizard.submit(&mut store), Err(ValidationError::InvalidPhone));
        wizard.set_field(Field::Phone, "13812345678").unwrap();
        assert_eq!(wizard.submit(&mut store), Err(ValidationError::MissingWechat));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_commits_draft() {
        let mut store = Store::in_memory();
        let mut wizard = verified(&mut store).await;
        fill_contact(&mut wizard);
        advance_to_last_step(&mut wizard);
        wizard.toggle_interest("编程开发");

        let completion = wizard.submit(&mut store).unwrap();

        assert_eq!(completion.redirect_after, REDIRECT_DELAY);
        assert_eq!(completion.notice.message, SUBMITTED_MESSAGE);
        assert_eq!(wizard.step(), Step::Submitted);
        let state = store.state();
        assert!(state.is_authenticated);
        assert_eq!(state.draft_profile.as_ref(), Some(wizard.draft()));

        let again = wizard.submit(&mut store).unwrap();
        assert_eq!(again, completion);
        assert_eq!(*store.state(), *state);
    }

    #[test]
    fn test_dropping_wizard_cancels_verification() {
        let wizard = RegistrationWizard::new();
        let token = wizard.cancellation_token();
        assert!(!token.is_cancelled());
        drop(wizard);
        assert!(token.is_cancelled());
    }
}
