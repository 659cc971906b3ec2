use std::fmt;

use crate::theme::Rgba;
use crate::ui::tabs::{BubbleId, BubbleStyle, TabId};

/// Tagged UI command descriptors.
///
/// Menu items and chrome buttons carry one of these instead of a closure;
/// everything funnels through `WindowUi::apply`, which makes every behavior
/// replayable from a plain value.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Tabs
    SelectTab(usize),
    CloseTab(usize),
    NewTab,
    BeginTabRename(usize),
    DuplicateTab(usize),
    // Bubbles
    BeginBubbleEdit(TabId, BubbleId),
    OpenStyleMenu(TabId, BubbleId),
    OpenColorMenu(TabId, BubbleId),
    SetBubbleStyle(TabId, BubbleId, BubbleStyle),
    SetBubbleColor(TabId, BubbleId, Rgba),
    ToggleBubbleBold(TabId, BubbleId),
    ToggleBubbleItalic(TabId, BubbleId),
    DuplicateBubble(TabId, BubbleId),
    DeleteBubble(TabId, BubbleId),
    // Sessions
    OpenSessionMenu,
    OpenSessionActions(String),
    PromptSaveSession,
    LoadSession(String),
    PromptRenameSession(String),
    DeleteSession(String),
    // Chrome
    ToggleDarkMode,
    SubmitInput,
    CloseMenu,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::SelectTab(_) => "Select tab",
            Action::CloseTab(_) => "Close tab",
            Action::NewTab => "New tab",
            Action::BeginTabRename(_) => "Rename tab",
            Action::DuplicateTab(_) => "Duplicate tab",
            Action::BeginBubbleEdit(..) => "Edit bubble",
            Action::OpenStyleMenu(..) => "Style menu",
            Action::OpenColorMenu(..) => "Color menu",
            Action::SetBubbleStyle(..) => "Set bubble style",
            Action::SetBubbleColor(..) => "Set bubble color",
            Action::ToggleBubbleBold(..) => "Toggle bold",
            Action::ToggleBubbleItalic(..) => "Toggle italic",
            Action::DuplicateBubble(..) => "Duplicate bubble",
            Action::DeleteBubble(..) => "Delete bubble",
            Action::OpenSessionMenu => "Session menu",
            Action::OpenSessionActions(_) => "Session actions",
            Action::PromptSaveSession => "Save session",
            Action::LoadSession(_) => "Load session",
            Action::PromptRenameSession(_) => "Rename session",
            Action::DeleteSession(_) => "Delete session",
            Action::ToggleDarkMode => "Toggle dark mode",
            Action::SubmitInput => "Submit input",
            Action::CloseMenu => "Close menu",
        };
        write!(f, "{}", s)
    }
}
