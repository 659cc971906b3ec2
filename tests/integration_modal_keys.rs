use std::time::Instant;

use bubble_wm::WindowRegistry;
use bubble_wm::actions::Action;
use bubble_wm::input::{InputMode, Key, KeyAction, Modifiers};

fn press(registry: &WindowRegistry, id: bubble_wm::WindowId, key: Key) {
    registry.key(id, key, KeyAction::Press, Modifiers::NONE);
}

fn type_text(registry: &WindowRegistry, id: bubble_wm::WindowId, text: &str) {
    for c in text.chars() {
        registry.char_input(id, c);
    }
}

#[test]
fn tab_rename_outranks_session_save() {
    let registry = WindowRegistry::in_memory();
    let id = registry.open_window(800.0, 600.0);
    registry.with_window(id, |ui| {
        ui.apply(Action::NewTab);
        ui.apply(Action::BeginTabRename(1));
        // A session-save prompt is requested while the rename is active.
        ui.apply(Action::PromptSaveSession);
    });

    // Enter goes to the rename handler only: the tab gets the buffer
    // contents and no session is created.
    press(&registry, id, Key::Enter);
    let (tab_name, renaming, sessions) = registry
        .with_window(id, |ui| {
            (
                ui.tabs().get(1).unwrap().name.clone(),
                ui.renaming_tab(),
                ui.session_list(),
            )
        })
        .unwrap();
    assert_eq!(tab_name, "Session name");
    assert_eq!(renaming, None);
    assert!(sessions.is_empty(), "no session may be created: {sessions:?}");
}

#[test]
fn save_prompt_commits_and_escapes() {
    let registry = WindowRegistry::in_memory();
    let id = registry.open_window(800.0, 600.0);
    type_text(&registry, id, "hello");
    press(&registry, id, Key::Enter);

    registry.with_window(id, |ui| ui.apply(Action::PromptSaveSession));
    let (mode, buffer) = registry
        .with_window(id, |ui| (ui.mode(), ui.input_text().to_owned()))
        .unwrap();
    assert_eq!(mode, InputMode::SavingSession);
    assert_eq!(buffer, "Session name");

    // Escape discards: back to normal, nothing stored.
    press(&registry, id, Key::Escape);
    let (mode, sessions) = registry
        .with_window(id, |ui| (ui.mode(), ui.session_list()))
        .unwrap();
    assert_eq!(mode, InputMode::Normal);
    assert!(sessions.is_empty());

    // Prompt again, type a real name over the placeholder, commit.
    registry.with_window(id, |ui| ui.apply(Action::PromptSaveSession));
    for _ in 0.."Session name".len() {
        press(&registry, id, Key::Backspace);
    }
    type_text(&registry, id, "afternoon");
    press(&registry, id, Key::Enter);
    let (mode, sessions) = registry
        .with_window(id, |ui| (ui.mode(), ui.session_list()))
        .unwrap();
    assert_eq!(mode, InputMode::Normal);
    assert_eq!(sessions, vec!["afternoon"]);
}

#[test]
fn placeholder_submission_saves_nothing() {
    let registry = WindowRegistry::in_memory();
    let id = registry.open_window(800.0, 600.0);
    registry.with_window(id, |ui| ui.apply(Action::PromptSaveSession));
    // Enter with the untouched placeholder: discard, no session.
    press(&registry, id, Key::Enter);
    let (mode, sessions) = registry
        .with_window(id, |ui| (ui.mode(), ui.session_list()))
        .unwrap();
    assert_eq!(mode, InputMode::Normal);
    assert!(sessions.is_empty());
}

#[test]
fn session_rename_clears_token_on_commit_and_cancel() {
    let registry = WindowRegistry::in_memory();
    let id = registry.open_window(800.0, 600.0);
    type_text(&registry, id, "content");
    press(&registry, id, Key::Enter);
    // Store a session through the prompt path.
    registry.with_window(id, |ui| ui.apply(Action::PromptSaveSession));
    for _ in 0.."Session name".len() {
        press(&registry, id, Key::Backspace);
    }
    type_text(&registry, id, "first");
    press(&registry, id, Key::Enter);
    assert_eq!(
        registry.with_window(id, |ui| ui.session_list()).unwrap(),
        vec!["first"]
    );

    // Cancelled rename: token cleared, name untouched.
    registry.with_window(id, |ui| {
        ui.apply(Action::PromptRenameSession("first".into()))
    });
    press(&registry, id, Key::Escape);
    assert_eq!(
        registry.with_window(id, |ui| (ui.mode(), ui.session_list())).unwrap(),
        (InputMode::Normal, vec!["first".to_owned()])
    );

    // Committed rename: the old name is gone.
    registry.with_window(id, |ui| {
        ui.apply(Action::PromptRenameSession("first".into()))
    });
    for _ in 0.."first".len() {
        press(&registry, id, Key::Backspace);
    }
    type_text(&registry, id, "second");
    press(&registry, id, Key::Enter);
    assert_eq!(
        registry.with_window(id, |ui| ui.session_list()).unwrap(),
        vec!["second"]
    );
}

#[test]
fn bubble_edit_outranks_normal_submit() {
    let registry = WindowRegistry::in_memory();
    let id = registry.open_window(800.0, 600.0);
    type_text(&registry, id, "original");
    press(&registry, id, Key::Enter);

    let (tab_id, bubble_id) = registry
        .with_window(id, |ui| {
            let tab = ui.tabs().active_tab();
            (tab.id, tab.bubbles[0].id)
        })
        .unwrap();
    registry.with_window(id, |ui| ui.apply(Action::BeginBubbleEdit(tab_id, bubble_id)));

    // With an edit in progress, Enter rewrites the bubble instead of
    // submitting a new one.
    registry.with_window(id, |ui| {
        ui.key(Key::End, KeyAction::Press, Modifiers::NONE);
    });
    type_text(&registry, id, " edited");
    press(&registry, id, Key::Enter);

    let (count, text) = registry
        .with_window(id, |ui| {
            let tab = ui.tabs().active_tab();
            (tab.bubbles.len(), tab.bubbles[0].text.clone())
        })
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(text, "original edited");
}

#[test]
fn history_recall_preserves_draft() {
    let registry = WindowRegistry::in_memory();
    let id = registry.open_window(800.0, 600.0);
    for line in ["first", "second"] {
        type_text(&registry, id, line);
        press(&registry, id, Key::Enter);
    }
    type_text(&registry, id, "wip");

    press(&registry, id, Key::Up);
    assert_eq!(
        registry.with_window(id, |ui| ui.input_text().to_owned()).unwrap(),
        "second"
    );
    press(&registry, id, Key::Up);
    assert_eq!(
        registry.with_window(id, |ui| ui.input_text().to_owned()).unwrap(),
        "first"
    );
    // Down walks back and finally restores the in-progress draft.
    press(&registry, id, Key::Down);
    assert_eq!(
        registry.with_window(id, |ui| ui.input_text().to_owned()).unwrap(),
        "second"
    );
    press(&registry, id, Key::Down);
    assert_eq!(
        registry.with_window(id, |ui| ui.input_text().to_owned()).unwrap(),
        "wip"
    );
}

#[test]
fn stale_rename_target_is_cleared_not_fatal() {
    let registry = WindowRegistry::in_memory();
    let id = registry.open_window(800.0, 600.0);
    registry.with_window(id, |ui| {
        ui.apply(Action::NewTab);
        ui.apply(Action::BeginTabRename(1));
        // The renamed tab disappears out from under the rename.
        ui.apply(Action::CloseTab(1));
    });
    // The stale flag must be dropped and the key handled normally.
    type_text(&registry, id, "hello");
    press(&registry, id, Key::Enter);
    let (renaming, bubbles) = registry
        .with_window(id, |ui| {
            (ui.renaming_tab(), ui.tabs().active_tab().bubbles.len())
        })
        .unwrap();
    assert_eq!(renaming, None);
    assert_eq!(bubbles, 1);
}

#[test]
fn ctrl_s_opens_the_session_menu() {
    let registry = WindowRegistry::in_memory();
    let id = registry.open_window(800.0, 600.0);
    registry.key(
        id,
        Key::Char('s'),
        KeyAction::Press,
        Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        },
    );
    let (open, mode) = registry
        .with_window(id, |ui| (ui.menu_open(), ui.mode()))
        .unwrap();
    assert!(open);
    assert_eq!(mode, InputMode::Modal);

    // Escape closes it again.
    press(&registry, id, Key::Escape);
    let open = registry.with_window(id, |ui| ui.menu_open()).unwrap();
    assert!(!open);
}

#[test]
fn frame_advances_and_reports_notice() {
    let registry = WindowRegistry::in_memory();
    let id = registry.open_window(800.0, 600.0);
    registry.with_window(id, |ui| ui.apply(Action::LoadSession("ghost".into())));
    let scene = registry.frame(id, Instant::now()).unwrap();
    assert!(scene.notice.is_some());
    // The notice is consumed once taken.
    assert!(registry.take_notice(id).is_some());
    assert!(registry.take_notice(id).is_none());
}
