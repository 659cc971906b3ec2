use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bubble_wm::WindowRegistry;
use bubble_wm::actions::Action;
use bubble_wm::input::{Key, KeyAction, Modifiers};

fn type_line(registry: &WindowRegistry, id: bubble_wm::WindowId, text: &str) {
    for c in text.chars() {
        registry.char_input(id, c);
    }
    registry.key(id, Key::Enter, KeyAction::Press, Modifiers::NONE);
}

#[test]
fn destroying_one_window_leaves_the_other_untouched() {
    let registry = WindowRegistry::in_memory();
    let a = registry.open_window(800.0, 600.0);
    let b = registry.open_window(800.0, 600.0);

    for text in ["one", "two", "three"] {
        type_line(&registry, a, text);
    }
    assert_eq!(
        registry
            .with_window(a, |ui| ui.tabs().active_tab().bubbles.len())
            .unwrap(),
        3
    );

    assert!(registry.close_window(a));
    assert!(!registry.contains(a));
    assert_eq!(registry.window_count(), 1);

    // B's state is exactly what a fresh window has.
    let (tabs, bubbles) = registry
        .with_window(b, |ui| (ui.tabs().len(), ui.tabs().active_tab().bubbles.len()))
        .unwrap();
    assert_eq!((tabs, bubbles), (1, 0));

    // Every entry point aimed at the dead handle is a no-op.
    type_line(&registry, a, "ghost");
    assert!(registry.frame(a, Instant::now()).is_none());
}

#[test]
fn destroy_cancels_in_flight_drag() {
    let registry = WindowRegistry::in_memory();
    let id = registry.open_window(800.0, 600.0);
    type_line(&registry, id, "held");
    let rect = registry.frame(id, Instant::now()).unwrap().bubbles[0].rect;

    registry.pointer_down(
        id,
        bubble_wm::input::PointerButton::Left,
        rect.x + 4.0,
        rect.y + 4.0,
        Modifiers::NONE,
    );
    registry.pointer_move(id, rect.x + 40.0, rect.y + 40.0);
    assert!(registry.with_window(id, |ui| ui.dragged().is_some()).unwrap());

    // One step: window gone, drag state gone with it, no release needed.
    assert!(registry.close_window(id));
    registry.pointer_up(
        id,
        bubble_wm::input::PointerButton::Left,
        rect.x + 40.0,
        rect.y + 40.0,
        Modifiers::NONE,
    );
    assert!(!registry.contains(id));
}

#[test]
fn sessions_are_shared_but_window_state_is_not() {
    let registry = WindowRegistry::in_memory();
    let a = registry.open_window(800.0, 600.0);
    let b = registry.open_window(800.0, 600.0);

    type_line(&registry, a, "saved from a");
    // Save through the prompt path on A.
    registry.with_window(a, |ui| ui.apply(Action::PromptSaveSession));
    for _ in 0.."Session name".len() {
        registry.key(a, Key::Backspace, KeyAction::Press, Modifiers::NONE);
    }
    for c in "shared".chars() {
        registry.char_input(a, c);
    }
    registry.key(a, Key::Enter, KeyAction::Press, Modifiers::NONE);

    // B sees the stored session (shared collaborator) but none of A's tabs.
    let sessions = registry.with_window(b, |ui| ui.session_list()).unwrap();
    assert_eq!(sessions, vec!["shared"]);
    assert_eq!(
        registry
            .with_window(b, |ui| ui.tabs().active_tab().bubbles.len())
            .unwrap(),
        0
    );

    // Loading it into B copies the content in.
    registry.with_window(b, |ui| ui.apply(Action::LoadSession("shared".into())));
    let text = registry
        .with_window(b, |ui| ui.tabs().active_tab().bubbles[0].text.clone())
        .unwrap();
    assert_eq!(text, "saved from a");
}

#[test]
fn parallel_threads_drive_disjoint_windows() {
    let registry = Arc::new(WindowRegistry::in_memory());
    let a = registry.open_window(800.0, 600.0);
    let b = registry.open_window(1024.0, 768.0);

    let handles: Vec<_> = [(a, "alpha"), (b, "beta")]
        .into_iter()
        .map(|(id, word)| {
            let registry = registry.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    for c in word.chars() {
                        registry.char_input(id, c);
                    }
                    registry.key(id, Key::Enter, KeyAction::Press, Modifiers::NONE);
                    registry.frame(id, Instant::now());
                    if i % 7 == 0 {
                        registry.resize(id, 700.0 + i as f32, 500.0 + i as f32);
                    }
                    thread::sleep(Duration::from_millis(1));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("window thread panicked");
    }

    let a_count = registry
        .with_window(a, |ui| ui.tabs().active_tab().bubbles.len())
        .unwrap();
    let b_count = registry
        .with_window(b, |ui| ui.tabs().active_tab().bubbles.len())
        .unwrap();
    assert_eq!(a_count, 25);
    assert_eq!(b_count, 25);
    let a_texts_ok = registry
        .with_window(a, |ui| {
            ui.tabs()
                .active_tab()
                .bubbles
                .iter()
                .all(|bubble| bubble.text == "alpha")
        })
        .unwrap();
    assert!(a_texts_ok, "cross-window contamination");
}

#[test]
fn registry_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<WindowRegistry>();
}
