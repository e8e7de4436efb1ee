//! Quick-start ideas offered by `autocoder templates` and `run --template`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdeaTemplate {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub idea: &'static str,
}

pub const TEMPLATES: &[IdeaTemplate] = &[
    IdeaTemplate {
        slug: "memory-game",
        title: "Memory Game",
        description: "Classic card matching game with emojis",
        icon: "🎮",
        idea: "Create a memory card game with emoji pairs, score tracking, timer, \
               difficulty levels (easy/medium/hard), flip animations, and high score \
               persistence using localStorage",
    },
    IdeaTemplate {
        slug: "todo-list",
        title: "Todo List App",
        description: "Task manager with categories",
        icon: "📝",
        idea: "Build a todo list app with categories, priority levels, due dates, \
               search/filter functionality, drag-and-drop reordering, and data \
               persistence in localStorage",
    },
    IdeaTemplate {
        slug: "pomodoro-timer",
        title: "Pomodoro Timer",
        description: "Productivity timer with stats",
        icon: "⏱️",
        idea: "Create a Pomodoro timer with work/break intervals, task tracking, daily \
               statistics, sound notifications, customizable durations, and \
               productivity charts",
    },
    IdeaTemplate {
        slug: "drawing-canvas",
        title: "Drawing Canvas",
        description: "Simple drawing application",
        icon: "🎨",
        idea: "Build a drawing app with multiple brush sizes, color picker, eraser, \
               undo/redo functionality, save to image, and drawing history",
    },
    IdeaTemplate {
        slug: "quiz-game",
        title: "Quiz Game",
        description: "Interactive trivia game",
        icon: "🧩",
        idea: "Create a quiz game with multiple categories, difficulty levels, timer, \
               score tracking, question progress bar, and results summary with correct \
               answers",
    },
    IdeaTemplate {
        slug: "markdown-editor",
        title: "Markdown Editor",
        description: "Live preview markdown editor",
        icon: "📄",
        idea: "Build a markdown editor with live preview, syntax highlighting, export to \
               HTML/PDF, auto-save, fullscreen mode, and markdown cheat sheet",
    },
];

/// Find a template by slug or title, ignoring case and surrounding space.
pub fn find(name: &str) -> Option<&'static IdeaTemplate> {
    let name = name.trim();
    TEMPLATES
        .iter()
        .find(|t| t.slug.eq_ignore_ascii_case(name) || t.title.eq_ignore_ascii_case(name))
}

pub fn slugs() -> Vec<&'static str> {
    TEMPLATES.iter().map(|t| t.slug).collect()
}
