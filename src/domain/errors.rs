use thiserror::Error;

/// A user-correctable input problem.
///
/// The `Display` text is the message surfaced inline to the user. These are
/// never logged as faults and never written to the global error field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("请输入正确的13位学号")]
    MalformedStudentId,
    #[error("只允许2023级学生参与招新")]
    IneligibleYear,
    #[error("学号已验证，如需修改请重新验证")]
    StudentIdLocked,
    #[error("请先完成学号验证")]
    IdentityNotVerified,
    #[error("请先完成前面的步骤")]
    NotAtFinalStep,
    #[error("请输入姓名")]
    MissingName,
    #[error("请输入正确的手机号码")]
    InvalidPhone,
    #[error("请输入微信号")]
    MissingWechat,
    #[error("最多只能选择2个志愿")]
    TooManyChoices,
    #[error("该部门已在志愿列表中")]
    DuplicateChoice,
    #[error("您不符合该部门特招条件")]
    NotEligibleForSpecial,
    #[error("请至少选择一个志愿")]
    NoChoices,
    #[error("未找到部门: {0}")]
    UnknownDepartment(String),
    #[error("未找到学号为 {0} 的报名记录")]
    UnknownApplicant(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;
