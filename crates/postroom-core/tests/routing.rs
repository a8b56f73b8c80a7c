//! Integration tests for mail routing.
//!
//! These tests drive the [`MailClient`] interface end to end: accounts,
//! folders, rules, receiving and sending.

#![allow(clippy::unwrap_used)]

use postroom_core::{Error, MailClient, PostOffice, ValidationError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EXAM: &str = "sender: a@x.com\n\
                    subject: MJT exam\n\
                    recipients: b@x.com\n\
                    received: 2022-12-08 14:14";

const PARTY: &str = "sender: c@y.com\n\
                     subject: party on friday\n\
                     recipients: b@x.com\n\
                     received: 2022-12-09 20:00";

fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postroom_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

fn client() -> PostOffice {
    init_logging();
    let mut client = PostOffice::new();
    client.add_account("a", "a@x.com").unwrap();
    client.add_account("b", "b@x.com").unwrap();
    client
}

fn count(client: &PostOffice, account: &str, path: &str) -> usize {
    client.mails_in_folder(account, path).unwrap().len()
}

#[test]
fn test_account_name_must_be_unique() {
    let mut client = client();
    let err = client.add_account("a", "other@x.com").unwrap_err();
    assert!(err.is_already_exists());
    assert!(matches!(err, Error::AccountNameTaken(_)));
}

#[test]
fn test_account_email_must_be_unique() {
    let mut client = client();
    let err = client.add_account("other", "a@x.com").unwrap_err();
    assert!(err.is_already_exists());
    assert!(matches!(err, Error::AccountEmailTaken(_)));
    assert_eq!(client.registry().len(), 2);
}

#[test]
fn test_nested_folders() {
    let mut client = client();

    let err = client.create_folder("b", "/inbox/x/y").unwrap_err();
    assert!(matches!(err, Error::InvalidPath(_)));

    client.create_folder("b", "/inbox/x").unwrap();
    client.create_folder("b", "/inbox/x/y").unwrap();

    let err = client.create_folder("b", "/inbox/x").unwrap_err();
    assert!(matches!(err, Error::FolderAlreadyExists(_)));
}

#[test]
fn test_folders_outside_inbox_are_rejected() {
    let mut client = client();
    for path in ["/sent/x", "/x", "inbox/x", "/inbox/", "/inbox"] {
        let err = client.create_folder("b", path).unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)), "{path}");
    }
}

#[test]
fn test_exam_mail_without_rule_lands_in_inbox() {
    let mut client = client();
    client.receive_mail("b", EXAM, "good luck").unwrap();
    assert_eq!(count(&client, "b", "/inbox"), 1);
}

#[test]
fn test_exam_mail_with_rule_is_filed() {
    let mut client = client();
    client.create_folder("b", "/inbox/school").unwrap();
    client
        .add_rule("b", "/inbox/school", "subject-includes: exam", 5)
        .unwrap();

    client.receive_mail("b", EXAM, "good luck").unwrap();

    assert_eq!(count(&client, "b", "/inbox/school"), 1);
    assert_eq!(count(&client, "b", "/inbox"), 0);
}

#[test]
fn test_add_rule_moves_queued_mail() {
    let mut client = client();
    client.receive_mail("b", EXAM, "good luck").unwrap();
    client.receive_mail("b", PARTY, "bring snacks").unwrap();
    client.create_folder("b", "/inbox/school").unwrap();

    client
        .add_rule("b", "/inbox/school", "subject-includes: exam", 5)
        .unwrap();

    let school = client.mails_in_folder("b", "/inbox/school").unwrap();
    assert_eq!(school.len(), 1);
    assert!(school.iter().all(|mail| mail.subject == "MJT exam"));

    let inbox = client.mails_in_folder("b", "/inbox").unwrap();
    assert_eq!(inbox.len(), 1);
    assert!(inbox.iter().all(|mail| mail.subject == "party on friday"));
}

#[test]
fn test_lower_priority_rule_wins() {
    let mut client = client();
    client.create_folder("b", "/inbox/school").unwrap();
    client.create_folder("b", "/inbox/from-a").unwrap();
    client
        .add_rule("b", "/inbox/school", "subject-includes: exam", 7)
        .unwrap();
    client
        .add_rule("b", "/inbox/from-a", "from: a@x.com", 2)
        .unwrap();

    client.receive_mail("b", EXAM, "good luck").unwrap();

    assert_eq!(count(&client, "b", "/inbox/from-a"), 1);
    assert_eq!(count(&client, "b", "/inbox/school"), 0);
}

#[test]
fn test_multi_condition_rule() {
    let mut client = client();
    client.create_folder("b", "/inbox/mjt").unwrap();
    client
        .add_rule(
            "b",
            "/inbox/mjt",
            "subject-includes: mjt, exam\nrecipients-includes: z@x.com, b@x.com",
            3,
        )
        .unwrap();

    client.receive_mail("b", EXAM, "good luck").unwrap();
    client
        .receive_mail("b", &EXAM.replace("MJT exam", "exam"), "good luck")
        .unwrap();

    // Subject matching is case-sensitive: "MJT" does not contain "mjt".
    assert_eq!(count(&client, "b", "/inbox/mjt"), 0);
    assert_eq!(count(&client, "b", "/inbox"), 2);
}

#[test]
fn test_subject_or_body_rule() {
    let mut client = client();
    client.create_folder("b", "/inbox/izpit").unwrap();
    client
        .add_rule("b", "/inbox/izpit", "subject-or-body-includes: izpit", 4)
        .unwrap();

    client.receive_mail("b", PARTY, "no izpit tomorrow").unwrap();

    assert_eq!(count(&client, "b", "/inbox/izpit"), 1);
}

#[test]
fn test_duplicate_rule_key() {
    let mut client = client();
    client.create_folder("b", "/inbox/school").unwrap();

    for priority in [1, 10] {
        let err = client
            .add_rule(
                "b",
                "/inbox/school",
                "subject-includes: exam\nsubject-includes: test",
                priority,
            )
            .unwrap_err();
        assert!(err.is_conflict());
        assert!(matches!(err, Error::DuplicateRuleKey("subject-includes:")));
    }
}

#[test]
fn test_conflicting_rules() {
    let mut client = client();
    client.create_folder("b", "/inbox/one").unwrap();
    client.create_folder("b", "/inbox/two").unwrap();
    client
        .add_rule("b", "/inbox/one", "subject-includes: exam", 5)
        .unwrap();

    let err = client
        .add_rule("b", "/inbox/two", "subject-includes: exam", 5)
        .unwrap_err();
    assert!(matches!(err, Error::RuleConflict { priority: 5, .. }));

    client
        .add_rule("b", "/inbox/two", "subject-includes: exam", 6)
        .unwrap();
    client
        .add_rule("b", "/inbox/two", "subject-includes: party", 5)
        .unwrap();

    let mailbox = client.registry().mailbox("b").unwrap();
    let priorities: Vec<i32> = mailbox.rules().map(|rule| rule.priority()).collect();
    assert_eq!(priorities, vec![5, 5, 6]);
}

#[test]
fn test_equal_priority_keeps_insertion_order() {
    let mut client = client();
    client.create_folder("b", "/inbox/first").unwrap();
    client.create_folder("b", "/inbox/second").unwrap();
    client
        .add_rule("b", "/inbox/first", "from: a@x.com", 5)
        .unwrap();
    client
        .add_rule("b", "/inbox/second", "subject-includes: exam", 5)
        .unwrap();

    client.receive_mail("b", EXAM, "good luck").unwrap();

    assert_eq!(count(&client, "b", "/inbox/first"), 1);
    assert_eq!(count(&client, "b", "/inbox/second"), 0);
}

#[test]
fn test_send_delivers_to_local_recipients() {
    let mut client = client();
    client.add_account("c", "c@x.com").unwrap();
    let metadata = "sender: ignored@elsewhere.com\n\
                    subject: hello\n\
                    recipients: b@x.com, c@x.com, nobody@y.com,\n\
                    received: 2022-12-10 09:30";

    client.send_mail("a", metadata, "hi all").unwrap();

    let sent = client.mails_in_folder("a", "/sent").unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent.iter().all(|mail| mail.sender_email() == Some("a@x.com")));
    assert!(sent.iter().all(|mail| mail.recipients.len() == 3));

    assert_eq!(count(&client, "b", "/inbox"), 1);
    assert_eq!(count(&client, "c", "/inbox"), 1);
    assert_eq!(count(&client, "a", "/inbox"), 0);
}

#[test]
fn test_send_follows_recipient_rules() {
    let mut client = client();
    client.create_folder("b", "/inbox/school").unwrap();
    client
        .add_rule("b", "/inbox/school", "subject-includes: exam", 1)
        .unwrap();

    client.send_mail("a", EXAM, "good luck").unwrap();

    assert_eq!(count(&client, "a", "/sent"), 1);
    assert_eq!(count(&client, "b", "/inbox/school"), 1);
    assert_eq!(count(&client, "b", "/inbox"), 0);
}

#[test]
fn test_send_to_unknown_recipients_only() {
    let mut client = client();
    let metadata = EXAM.replace("recipients: b@x.com", "recipients: ghost@nowhere.com");

    client.send_mail("a", &metadata, "anyone?").unwrap();

    assert_eq!(count(&client, "a", "/sent"), 1);
    assert_eq!(count(&client, "b", "/inbox"), 0);
}

#[test]
fn test_identical_mail_is_stored_once() {
    let mut client = client();
    client.receive_mail("b", EXAM, "good luck").unwrap();
    client.receive_mail("b", EXAM, "good luck").unwrap();
    assert_eq!(count(&client, "b", "/inbox"), 1);
}

#[test]
fn test_blank_inputs() {
    let mut client = client();

    let cases = [
        client.create_folder(" ", "/inbox/x").unwrap_err(),
        client.create_folder("b", "").unwrap_err(),
        client.add_rule("b", "/inbox", " \n", 5).unwrap_err(),
        client.receive_mail("b", "", "body").unwrap_err(),
        client.send_mail("a", EXAM, "\t").unwrap_err(),
        client.mails_in_folder("", "/inbox").unwrap_err(),
    ];

    for err in cases {
        assert!(err.is_input_error(), "{err}");
    }
    assert_eq!(count(&client, "a", "/sent"), 0);
}

#[test]
fn test_priority_range() {
    let mut client = client();
    let err = client
        .add_rule("b", "/inbox", "subject-includes: exam", 11)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::PriorityOutOfRange {
            priority: 11,
            min: 1,
            max: 10
        })
    ));
}

#[test]
fn test_negative_priority() {
    let mut client = client();
    client.create_folder("b", "/inbox/school").unwrap();
    let err = client
        .add_rule("b", "/inbox/school", "subject-includes: exam", -1)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::PriorityOutOfRange {
            priority: -1,
            min: 1,
            max: 10
        })
    ));
    assert_eq!(client.registry().mailbox("b").unwrap().rules().count(), 0);
}

#[test]
fn test_unknown_account() {
    let mut client = client();
    assert!(client.receive_mail("ghost", EXAM, "x").unwrap_err().is_not_found());
    assert!(client.send_mail("ghost", EXAM, "x").unwrap_err().is_not_found());
    assert!(client.mails_in_folder("ghost", "/inbox").unwrap_err().is_not_found());
}
