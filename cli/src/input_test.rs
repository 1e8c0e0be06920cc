use super::*;

#[test]
fn plain_text_is_sent_as_is() {
    assert_eq!(parse_input("  what did I note about rust?\n"), Input::Text("  what did I note about rust?".into()));
}

#[test]
fn blank_line_is_empty_text() {
    assert_eq!(parse_input("\n"), Input::Text(String::new()));
}

#[test]
fn commands_and_aliases() {
    assert_eq!(parse_input("/quit"), Input::Quit);
    assert_eq!(parse_input("/q"), Input::Quit);
    assert_eq!(parse_input("/new"), Input::New);
    assert_eq!(parse_input(" /ls "), Input::List);
    assert_eq!(parse_input("/rm"), Input::Delete);
    assert_eq!(parse_input("/retry"), Input::Retry);
    assert_eq!(parse_input("/discard"), Input::Discard);
    assert_eq!(parse_input("/?"), Input::Help);
}

#[test]
fn switch_needs_positive_number() {
    assert_eq!(parse_input("/switch 2"), Input::Switch(2));
    assert_eq!(parse_input("/switch 0"), Input::Unknown("/switch 0".into()));
    assert_eq!(parse_input("/switch two"), Input::Unknown("/switch two".into()));
}

#[test]
fn unknown_command_is_reported() {
    assert_eq!(parse_input("/frobnicate"), Input::Unknown("/frobnicate".into()));
}
