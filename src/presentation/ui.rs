use crate::application::{App, AppMode, FormRow, HOME_ITEMS, NoticeKind, Screen, Step, Toast};
use crate::domain::{ApplicantStatus, StatusTab, VolunteerPlan, status_counts};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match app.screen {
        Screen::Home => render_home(f, app, chunks[1]),
        Screen::Registration => render_registration(f, app, chunks[1]),
        Screen::StudentHome => render_student_home(f, app, chunks[1]),
        Screen::Applicants => render_applicants(f, app, chunks[1]),
    }
    render_status_bar(f, app, chunks[2]);

    if let Some(toast) = &app.toast {
        render_toast(f, toast);
    }
    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let state = app.store.state();
    let user = match &state.current_user {
        Some(user) => user.name.clone(),
        None if state.is_authenticated => "学生".to_string(),
        None => "未登录".to_string(),
    };
    let loading = if state.loading { " | 处理中..." } else { "" };
    let header = Paragraph::new(format!("recruit - 社团招新 | 用户: {user}{loading}"))
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn highlight(selected: bool) -> Style {
    if selected {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else {
        Style::default()
    }
}

fn render_home(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = HOME_ITEMS
        .iter()
        .enumerate()
        .map(|(i, item)| ListItem::new(format!("  {item}")).style(highlight(i == app.home_index)))
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("欢迎参加社团招新"));
    f.render_widget(list, area);
}

fn render_progress(f: &mut Frame, step: Step, area: Rect) {
    let mut spans = Vec::new();
    for (i, s) in Step::FORM_STEPS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" → "));
        }
        let style = if s.number() == step.number() {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if s.number() < step.number() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{}. {}", s.number(), s.title()), style));
    }
    let progress = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title("报名进度"));
    f.render_widget(progress, area);
}

fn render_registration(f: &mut Frame, app: &App, area: Rect) {
    let Some(wizard) = app.wizard.as_ref() else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_progress(f, wizard.step(), chunks[0]);

    let draft = wizard.draft();
    let info = match wizard.step() {
        Step::Identity if app.verifying => "正在验证学号...".to_string(),
        Step::Identity if wizard.is_identity_verified() => format!("已验证 | 学院: {}", draft.college),
        Step::Identity => "输入13位学号后按 v 验证".to_string(),
        Step::SkillsPortfolio => "a: 添加技能 | l: 添加作品链接 | d: 删除 | +/-: 调整等级".to_string(),
        Step::InterestsSubmit => format!("已选兴趣 {} 项 | s: 提交报名", draft.interests.len()),
        Step::Submitted => "报名已提交，即将进入学生主页".to_string(),
        _ => format!("学号 {} | 学院 {}", draft.student_id, draft.college),
    };
    let info = Paragraph::new(info).block(Block::default().borders(Borders::ALL).title(wizard.step().title()));
    f.render_widget(info, chunks[1]);

    let rows: Vec<Row> = wizard
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let selected = i == app.selected_field;
            let value = if selected && matches!(app.mode, AppMode::Editing) {
                format!("{}▏", app.input)
            } else {
                wizard.row_value(row)
            };
            let label_style = match row {
                FormRow::Interest(_) => Style::default().fg(Color::Magenta),
                _ => Style::default().fg(Color::Yellow),
            };
            Row::new(vec![Cell::from(row.label()).style(label_style), Cell::from(value)]).style(highlight(selected))
        })
        .collect();
    let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(10)])
        .block(Block::default().borders(Borders::ALL).title("表单"))
        .column_spacing(1);
    f.render_widget(table, chunks[2]);
}

fn render_student_home(f: &mut Frame, app: &App, area: Rect) {
    let state = app.store.state();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let mut lines = Vec::new();
    if let Some(draft) = &state.draft_profile {
        lines.push(Line::from(format!("姓名: {}", draft.name)));
        lines.push(Line::from(format!("学号: {}", draft.student_id)));
        lines.push(Line::from(format!("学院: {}", draft.college)));
        lines.push(Line::from(format!("专业: {}", draft.major)));
        lines.push(Line::from(format!("手机: {}", draft.phone)));
        lines.push(Line::from(format!("兴趣: {}", draft.interests.join("、"))));
        if let Some(applicant) = state.find_by_student_id(&draft.student_id) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("当前状态: {}", applicant.status.label()),
                Style::default().fg(Color::Yellow),
            )));
            for v in &applicant.volunteers {
                lines.push(Line::from(format!("志愿{}: {} ({})", v.priority, v.department, v.kind.label())));
            }
            if let (Some(time), Some(location)) = (&applicant.interview_time, &applicant.interview_location) {
                lines.push(Line::from(format!("面试: {time} @ {location}")));
            }
        }
    }
    let profile = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("我的报名"));
    f.render_widget(profile, chunks[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(chunks[1]);

    let empty = VolunteerPlan::default();
    let plan = app.plan.as_ref().unwrap_or(&empty);
    let rows: Vec<Row> = state
        .departments
        .iter()
        .enumerate()
        .map(|(i, dept)| {
            let position = plan.choices().iter().position(|c| c.department_id == dept.id);
            let choice = match position {
                Some(p) if plan.choices()[p].special => format!("第{}志愿 (特招)", p + 1),
                Some(p) => format!("第{}志愿", p + 1),
                None => String::new(),
            };
            let special = if plan.is_eligible_for_special(dept) {
                "可特招"
            } else if dept.has_special {
                "有特招"
            } else {
                ""
            };
            Row::new(vec![
                Cell::from(dept.name.clone()),
                Cell::from(special),
                Cell::from(choice),
                Cell::from(dept.description.clone()),
            ])
            .style(highlight(i == app.department_index))
        })
        .collect();
    let table = Table::new(
        rows,
        [Constraint::Length(10), Constraint::Length(8), Constraint::Length(16), Constraint::Min(10)],
    )
    .header(Row::new(vec!["部门", "特招", "我的志愿", "简介"]).style(Style::default().fg(Color::Yellow)))
    .block(Block::default().borders(Borders::ALL).title("志愿填报"))
    .column_spacing(1);
    f.render_widget(table, right[0]);

    let method = plan
        .interview_method()
        .map(|m| m.label())
        .unwrap_or("尚未选择志愿");
    let summary = Paragraph::new(vec![
        Line::from(format!("已选 {}/{} | 面试方式: {method}", plan.choices().len(), VolunteerPlan::MAX_CHOICES)),
        Line::from("Enter: 普通志愿 | s: 特招志愿 | d: 移除 | u: 提前 | c: 提交志愿"),
    ])
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(summary, right[1]);
}

fn render_applicants(f: &mut Frame, app: &App, area: Rect) {
    let state = app.store.state();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let counts = status_counts(&state.applicants);
    let titles: Vec<Line> = StatusTab::TABS
        .iter()
        .map(|tab| {
            let count = match tab {
                StatusTab::All => state.applicants.len(),
                StatusTab::Only(status) => counts[status_index(*status)],
            };
            Line::from(format!("{} ({count})", tab.label()))
        })
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.filter.tab.index())
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("报名管理"));
    f.render_widget(tabs, chunks[0]);

    let visible = app.filter.apply(&state.applicants);
    let visible_rows = chunks[1].height.saturating_sub(3) as usize;
    let scroll = app.selected_row.saturating_sub(visible_rows.saturating_sub(1));
    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible_rows)
        .map(|(i, a)| {
            let mark = if app.selection.contains(&a.id) { "[x]" } else { "[ ]" };
            let score = a.score.map(|s| s.to_string()).unwrap_or_default();
            Row::new(vec![
                Cell::from(mark),
                Cell::from(a.student_id.clone()),
                Cell::from(a.name.clone()),
                Cell::from(a.college.clone()),
                Cell::from(a.department.clone()),
                Cell::from(a.volunteer_type.label()),
                Cell::from(a.status.label()),
                Cell::from(score),
            ])
            .style(highlight(i == app.selected_row))
        })
        .collect();

    let title = if app.filter.query.is_empty() {
        format!("申请人 {} 名 | 已选 {}", visible.len(), app.selection.len())
    } else {
        format!("搜索 \"{}\": {} 名 | 已选 {}", app.filter.query, visible.len(), app.selection.len())
    };
    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(5),
            Constraint::Length(7),
            Constraint::Length(5),
        ],
    )
    .header(
        Row::new(vec!["", "学号", "姓名", "学院", "部门", "类型", "状态", "分数"])
            .style(Style::default().fg(Color::Yellow)),
    )
    .block(Block::default().borders(Borders::ALL).title(title))
    .column_spacing(1);
    f.render_widget(table, chunks[1]);
}

fn status_index(status: ApplicantStatus) -> usize {
    ApplicantStatus::ALL
        .iter()
        .position(|s| *s == status)
        .unwrap_or(0)
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => match app.screen {
            Screen::Home => "↑↓: 选择 | Enter: 进入 | ?: 帮助 | q: 退出".to_string(),
            Screen::Registration => {
                "↑↓: 选择 | Enter: 编辑/勾选 | Tab: 下一步 | Shift+Tab: 上一步 | Esc: 返回 | ?: 帮助".to_string()
            }
            Screen::StudentHome => "↑↓: 选择部门 | Esc: 返回首页 | ?: 帮助".to_string(),
            Screen::Applicants => {
                "←→: 切换 | /: 搜索 | Space: 选择 | A: 全选 | 1-5: 设置状态 | e: 导出CSV | Esc: 返回".to_string()
            }
        },
        AppMode::Editing => format!("编辑: {} (Enter 保存, Esc 取消)", app.input),
        AppMode::Search => format!("搜索: {} (Enter 确认, Esc 清除)", app.input),
        AppMode::Help => "↑↓/jk: 滚动 | PgUp/PgDn: 快速滚动 | Home: 顶部 | Esc/q: 关闭".to_string(),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("状态"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Search => Style::default().fg(Color::Magenta),
            AppMode::Help => Style::default().fg(Color::Cyan),
        });
    f.render_widget(input, area);
}

fn render_toast(f: &mut Frame, toast: &Toast) {
    let area = f.area();
    let width = (toast.notice.message.chars().count() as u16 * 2 + 4).min(area.width);
    let popup_area = Rect {
        x: area.width.saturating_sub(width),
        y: 1,
        width,
        height: 3.min(area.height),
    };
    let color = match toast.notice.kind {
        NoticeKind::Success => Color::Green,
        NoticeKind::Error => Color::Red,
        NoticeKind::Info => Color::Cyan,
        NoticeKind::Warning => Color::Yellow,
    };

    f.render_widget(Clear, popup_area);
    let widget = Paragraph::new(toast.notice.message.clone())
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).style(Style::default().fg(color)));
    f.render_widget(widget, popup_area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("帮助 ({}/{})", start_line + 1, help_lines.len()))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"社团招新 使用说明

=== 学生报名 ===
报名共五步: 基本信息 → 联系方式 → 个人简介 → 技能与作品 → 兴趣与成就
• 第一步输入13位学号后按 v 验证, 仅限2023级学生
• 验证成功后学号锁定, 按 r 可重新输入学号
• 姓名为空时会自动填入默认姓名, 可随时修改
• 各步骤之间可以自由前进后退, 已填写的内容不会丢失
• 最后一步按 s 提交, 提交时检查姓名、手机号码和微信号

=== 表单操作 ===
↑↓ 或 j/k       选择表单项
Enter           编辑所选项 (兴趣项为勾选/取消)
Tab             下一步
Shift+Tab       上一步
a               添加技能 (技能与作品)
l               添加作品链接 (技能与作品)
d               删除所选技能、链接或头像
+ / -           调整技能等级 (1-5)
头像            编辑头像项时输入本地图片路径

=== 志愿填报 ===
最多填报2个不同部门的志愿
Enter           以普通志愿添加所选部门
s               以特招志愿添加 (需符合特招条件)
d               移除所选部门的志愿
u               将所选部门的志愿提前一位
c               提交志愿
全部为特招志愿时采用特招面试, 否则为联合面试

=== 报名管理 ===
← → 或 h/l      切换状态标签
/               按姓名、学号或学院搜索
Space           选择/取消选择申请人
A               全选/取消全选当前列表
1-5             设置状态: 待审核/待面试/候补/已录取/未通过
e               导出全部申请人到CSV文件

=== 通用 ===
F1 或 ?         显示帮助 (↑↓, PgUp/PgDn, Home 滚动)
Esc             返回首页
q               退出 (首页)"#;
