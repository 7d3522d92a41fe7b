use std::path::PathBuf;

use notepad_shell::{Command, HostRequest, ShellController, ShellOptions};
use tempfile::tempdir;

fn controller() -> ShellController {
    ShellController::new(ShellOptions::default()).expect("コントローラー初期化に失敗しました")
}

#[test]
fn find_replace_flow_through_commands() {
    let mut controller = controller();
    controller
        .document_replaced("foo bar foo", Some(PathBuf::from("notes.txt")))
        .unwrap();

    controller.dispatch(Command::OpenReplace).unwrap();
    let replace = Command::SubmitReplace {
        term: "bar".into(),
        replacement: "baz".into(),
    };

    controller.dispatch(replace.clone()).unwrap();
    let snapshot = controller.snapshot().unwrap();
    assert_eq!(snapshot.content, "foo [bar] foo");
    assert_eq!(snapshot.selection.as_tuple(), (4, 9));
    assert_eq!(
        snapshot.session.as_ref().unwrap().pending_replacement.as_deref(),
        Some("baz")
    );

    controller.dispatch(replace).unwrap();
    let snapshot = controller.snapshot().unwrap();
    assert_eq!(snapshot.content, "foo baz foo");
    assert_eq!(snapshot.selection.as_tuple(), (7, 7));
    assert!(!snapshot.saved);

    let requests = controller.dispatch(Command::CloseSession).unwrap();
    assert_eq!(requests, vec![HostRequest::FocusDocument]);
    let requests = controller.dispatch(Command::Save).unwrap();
    assert_eq!(
        requests,
        vec![HostRequest::Persist {
            content: "foo baz foo".into()
        }]
    );
}

#[test]
fn focus_loss_restores_document() {
    let mut controller = controller();
    controller.content_edited("alpha beta", 2, 4).unwrap();
    controller.dispatch(Command::OpenFind).unwrap();
    controller
        .dispatch(Command::SubmitFind { term: "beta".into() })
        .unwrap();

    assert!(controller.search_focus_lost());
    let snapshot = controller.snapshot().unwrap();
    assert_eq!(snapshot.content, "alpha beta");
    assert_eq!(snapshot.selection.as_tuple(), (2, 4));
    assert!(snapshot.session.is_none());
}

#[test]
fn new_document_resets_everything() {
    let mut controller = controller();
    controller
        .document_replaced("text", Some(PathBuf::from("/a/b.md")))
        .unwrap();
    controller.dispatch(Command::OpenFind).unwrap();

    let requests = controller.dispatch(Command::NewDocument).unwrap();
    assert_eq!(
        requests,
        vec![
            HostRequest::SetTitle {
                title: "notepad".into()
            },
            HostRequest::FocusDocument
        ]
    );
    let snapshot = controller.snapshot().unwrap();
    assert_eq!(snapshot.content, "");
    assert_eq!(snapshot.default_filename, "*.txt");
    assert!(snapshot.session.is_none());
}

#[test]
fn unsaved_changes_guard_close_and_drop() {
    let mut controller = controller();
    assert!(!controller.close_requested());

    controller.content_edited("draft", 5, 5).unwrap();
    assert!(controller.close_requested());
    let dropped = PathBuf::from("/tmp/other.txt");
    assert_eq!(
        controller.file_dropped(&[dropped.clone()]),
        vec![HostRequest::ConfirmDiscard {
            path: dropped.clone()
        }]
    );

    controller.content_committed(Some(PathBuf::from("/tmp/draft.txt"))).unwrap();
    assert!(!controller.close_requested());
    assert_eq!(
        controller.file_dropped(&[dropped.clone()]),
        vec![HostRequest::OpenPath { path: dropped }]
    );
    assert!(controller.file_dropped(&[]).is_empty());
}

#[test]
fn json_commands_and_debug_log() {
    let temp = tempdir().unwrap();
    let log_path = temp.path().join("debug.log");
    let mut controller = ShellController::new(ShellOptions {
        debug_log: true,
        debug_log_path: Some(log_path.clone()),
        ..ShellOptions::default()
    })
    .unwrap();

    let requests = controller.dispatch_json(r#"{"command":"save-as"}"#).unwrap();
    assert_eq!(
        requests,
        vec![HostRequest::PersistAs {
            content: String::new()
        }]
    );
    assert!(controller.dispatch_json(r#"{"command":"print"}"#).is_err());

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.lines().count() >= 2);
    assert!(log.contains("\"event\":\"command\""));
    assert!(log.contains("\"event\":\"requests\""));
}
