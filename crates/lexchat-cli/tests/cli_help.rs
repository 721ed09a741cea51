use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("lexchat")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("sessions"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("stats"));
}

#[test]
fn test_sessions_help_shows_subcommands() {
    cargo_bin_cmd!("lexchat")
        .args(["sessions", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("rename"));
}

#[test]
fn test_chat_help_shows_document_options() {
    cargo_bin_cmd!("lexchat")
        .args(["chat", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--session"))
        .stdout(predicate::str::contains("--document"))
        .stdout(predicate::str::contains("--document-id"));
}

#[test]
fn test_chat_rejects_session_with_document() {
    cargo_bin_cmd!("lexchat")
        .args(["chat", "--session", "s1", "--document", "lease.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_unknown_session_type_is_rejected() {
    cargo_bin_cmd!("lexchat")
        .args(["sessions", "list", "--type", "contract"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown session type"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("lexchat")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lexchat"));
}
