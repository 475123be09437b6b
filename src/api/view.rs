//! 页面视图
//!
//! 每次用户操作都会生成一个 [`PageView`]，再交给模板渲染为 HTML。

use minijinja::{Environment, Value};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};
use serde::Serialize;

use crate::error::Result;
use crate::models::affirmation::WeeklyLogItem;
use crate::services::SubmissionOutcome;

pub const SUCCESS_MESSAGE: &str = "Here are your affirmations for today:";
pub const EMPTY_INPUT_WARNING: &str = "Please share how you're feeling to get affirmations.";
pub const EMPTY_LOG_INFO: &str =
    "Your weekly log will appear here after you receive affirmations.";

pub fn generation_error_message(detail: &str) -> String {
    format!("Error generating affirmation: {detail}")
}

const PAGE_TEMPLATE_NAME: &str = "page.html";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Daily Affirmations</title>
  <link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>🌞</text></svg>">
  <style>
    body { font-family: sans-serif; max-width: 44rem; margin: 2rem auto; padding: 0 1rem; color: #262730; }
    form { display: flex; flex-direction: column; gap: .5rem; }
    input[type=text] { padding: .5rem; font-size: 1rem; }
    button { align-self: flex-start; padding: .4rem 1rem; }
    .message { padding: .75rem 1rem; border-radius: .4rem; margin: 1rem 0; }
    .success { background: #dff5e3; }
    .warning { background: #fff6d6; }
    .error { background: #ffe0e0; }
    .info { background: #e3efff; }
    details { border: 1px solid #ddd; border-radius: .4rem; padding: .5rem 1rem; margin: .5rem 0; }
  </style>
</head>
<body>
  <h1>🌞 Daily Affirmations Chatbot</h1>
  <p>Share how you're feeling today and receive personalized affirmations!</p>

  <form method="post" action="/" id="feeling-form">
    <label for="feeling">How are you feeling today?</label>
    <input type="text" id="feeling" name="feeling" value="{{ feeling }}" placeholder="E.g. anxious, excited, tired, hopeful...">
    <button type="submit">Get Affirmations</button>
    <p id="progress" hidden>Generating your personalized affirmations...</p>
  </form>

  {% if flash %}<div class="message {{ flash.kind }}">{{ flash.message }}</div>{% endif %}
  {% if affirmations %}<div class="affirmations">{{ affirmations | markdown }}</div>{% endif %}

  <hr>
  <h2>📅 Your Affirmation Log This Week</h2>
  {% for item in week %}
  <details>
    <summary>{{ item.day_name }}, {{ item.date }}: {{ item.feeling }}</summary>
    <div class="affirmations">{{ item.affirmations | markdown }}</div>
  </details>
  {% else %}
  <div class="message info">{{ empty_log_info }}</div>
  {% endfor %}

  <script>
    document.getElementById("feeling-form").addEventListener("submit", function () {
      document.getElementById("progress").hidden = false;
    });
  </script>
</body>
</html>
"#;

/// 将模型输出渲染为 HTML
///
/// 原始 HTML 按文本转义，链接和图片只保留文字；单个换行保留为 `<br />`。
pub fn render_markdown(text: &str) -> String {
    let events = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH).filter_map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
        Event::SoftBreak => Some(Event::HardBreak),
        Event::Start(Tag::Link { .. } | Tag::Image { .. })
        | Event::End(TagEnd::Link | TagEnd::Image) => None,
        other => Some(other),
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn markdown_filter(text: &str) -> Value {
    Value::from_safe_string(render_markdown(text))
}

/// 提示消息类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Warning,
    Error,
}

/// 提示消息
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn new(kind: FlashKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// 页面视图模型
#[derive(Debug, Clone, Serialize, Default)]
pub struct PageView {
    /// 输入框中保留的文本
    pub feeling: String,
    pub flash: Option<Flash>,
    /// 本次生成的肯定语
    pub affirmations: Option<String>,
    /// 本周日志
    pub week: Vec<WeeklyLogItem>,
    pub empty_log_info: &'static str,
}

impl PageView {
    /// 未提交时的页面
    pub fn idle(week: Vec<WeeklyLogItem>) -> Self {
        Self {
            week,
            empty_log_info: EMPTY_LOG_INFO,
            ..Self::default()
        }
    }

    /// 提交后的页面
    pub fn from_outcome(feeling: String, outcome: SubmissionOutcome, week: Vec<WeeklyLogItem>) -> Self {
        let (flash, affirmations) = match outcome {
            SubmissionOutcome::EmptyInput => (Flash::new(FlashKind::Warning, EMPTY_INPUT_WARNING), None),
            SubmissionOutcome::Generated(entry) => (
                Flash::new(FlashKind::Success, SUCCESS_MESSAGE),
                Some(entry.affirmations),
            ),
            SubmissionOutcome::Failed(detail) => (
                Flash::new(FlashKind::Error, generation_error_message(&detail)),
                None,
            ),
        };

        Self {
            feeling,
            flash: Some(flash),
            affirmations,
            ..Self::idle(week)
        }
    }
}

/// 页面渲染器
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_filter("markdown", markdown_filter);
        env.add_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render(&self, view: &PageView) -> Result<String> {
        let template = self.env.get_template(PAGE_TEMPLATE_NAME)?;
        Ok(template.render(view)?)
    }
}

impl std::fmt::Debug for PageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRenderer").finish_non_exhaustive()
    }
}
