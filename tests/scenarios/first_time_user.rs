//! Scenario: a new user builds a form from the command line and fills it.

use crate::common::TestEnv;

#[test]
fn scenario_first_form_from_the_cli() {
    let env = TestEnv::new();

    // Nothing saved yet
    let list = env.ok(&["list"]);
    assert!(list.stdout.contains("No saved forms."));

    env.ok(&["draft", "new", "Feedback"]);
    let rating = env.add_field("select");
    let comment = env.add_field("textarea");
    env.ok(&["draft", "update", &rating, "--label", "Rating", "--options", "Good,Bad"]);
    env.ok(&["draft", "update", &comment, "--label", "Comment", "--max-length", "10"]);

    let check = env.ok(&["check"]);
    assert!(check.stdout.contains("ok: 'Feedback' is ready to save"));
    env.ok(&["save"]);

    let set_rating = format!("{}=Good", rating);
    let set_comment = format!("{}=far too long a comment", comment);
    let rejected = env.run(&["fill", "--set", &set_rating, "--set", &set_comment]);
    assert_eq!(rejected.exit_code, 1);
    assert!(rejected.stdout.contains("Max length 10"), "{}", rejected.stdout);

    let set_comment = format!("{}=nice", comment);
    let accepted = env.ok(&["fill", "--set", &set_rating, "--set", &set_comment]);
    assert!(accepted.stdout.contains("Rating = Good"));
}
