//! Fixed reference data: the recruiting departments and their special tracks.

use super::models::Department;

/// Eligibility rule for one department's special recruitment track.
///
/// An applicant qualifies when either their major or their college is listed.
#[derive(Debug, Clone, Copy)]
pub struct SpecialTrack {
    pub department_id: &'static str,
    pub majors: &'static [&'static str],
    pub colleges: &'static [&'static str],
}

impl SpecialTrack {
    pub fn admits(&self, college: &str, major: &str) -> bool {
        self.majors.contains(&major) || self.colleges.contains(&college)
    }
}

pub const SPECIAL_TRACKS: &[SpecialTrack] = &[
    SpecialTrack {
        department_id: "tech",
        majors: &[
            "计算机科学与技术",
            "软件工程",
            "信息安全",
            "数据科学与大数据技术",
            "人工智能",
        ],
        colleges: &["信息学院", "数据科学学院"],
    },
    SpecialTrack {
        department_id: "event",
        majors: &["市场营销", "行政管理", "公共关系", "会展经济与管理"],
        colleges: &["管理学院", "经济学院", "工商管理学院"],
    },
];

pub fn special_track(department_id: &str) -> Option<&'static SpecialTrack> {
    SPECIAL_TRACKS.iter().find(|t| t.department_id == department_id)
}

fn department(id: &str, name: &str, has_special: bool, description: &str, requirements: &[&str]) -> Department {
    Department {
        id: id.to_string(),
        name: name.to_string(),
        has_special,
        description: description.to_string(),
        requirements: requirements.iter().map(|r| r.to_string()).collect(),
    }
}

pub fn default_departments() -> Vec<Department> {
    vec![
        department(
            "tech",
            "技术部",
            true,
            "负责校科联的技术支持，包括网站开发、小程序维护和技术培训",
            &["熟悉前端或后端技术栈", "对新技术有学习热情"],
        ),
        department(
            "pr",
            "宣传部",
            false,
            "负责校科联的形象推广、活动宣传和文案策划",
            &["具有较强的文字功底和创意能力", "审美能力较好"],
        ),
        department(
            "hr",
            "人力资源部",
            false,
            "负责校科联的人才管理、内部培训和团队建设",
            &["良好的沟通能力", "有出色的组织协调能力"],
        ),
        department(
            "event",
            "策划部",
            true,
            "负责校科联各类活动的策划、组织和执行",
            &["具有创新思维和策划能力", "能够高效处理突发状况"],
        ),
        department(
            "external",
            "外联部",
            false,
            "负责校科联的外部资源对接、赞助洽谈和合作维护",
            &["出色的沟通表达能力", "热情大方，有责任心"],
        ),
    ]
}
