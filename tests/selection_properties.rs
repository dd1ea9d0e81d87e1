use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use typen::engine::filter::CharFilter;
use typen::engine::metrics;
use typen::engine::normalize::{intake, normalize, practice_target};
use typen::session::drill::{CharClass, DrillState};
use typen::session::input::process_key;
use typen::session::selection::parse_range;
use typen::session::{KeyOutcome, PracticeSession, SelectionModel, SessionStatus};

fn model(n: usize) -> SelectionModel {
    SelectionModel::new((1..=n).map(|i| format!("paragraph {i}")).collect())
}

#[test]
fn confirm_joins_in_document_order_whatever_the_pick_order() {
    let orders: [&[usize]; 3] = [&[0, 3, 1], &[3, 1, 0], &[1, 0, 3]];
    for order in orders {
        let mut m = model(5);
        for &i in order {
            m.toggle(i, false);
        }
        assert_eq!(
            m.confirm().unwrap(),
            "paragraph 1 paragraph 2 paragraph 4",
            "pick order {order:?}"
        );
    }
}

#[test]
fn plain_toggle_twice_is_identity() {
    let mut m = model(4);
    m.toggle(1, false);
    m.toggle(2, false);
    let before = m.selected();
    m.toggle(3, false);
    m.toggle(3, false);
    assert_eq!(m.selected(), before);
}

#[test]
fn range_gesture_only_ever_adds() {
    let mut m = model(8);
    m.toggle(2, false);
    m.toggle(6, false);
    m.toggle(6, false);
    // Anchor is 6 and 6 is now off; the range turns it back on.
    m.toggle(4, true);
    assert_eq!(m.selected(), vec![2, 4, 5, 6]);

    m.toggle(0, true);
    assert_eq!(m.selected(), vec![0, 1, 2, 3, 4, 5, 6]);
    assert_eq!(m.anchor(), Some(0));
}

#[test]
fn range_gesture_without_anchor_is_a_plain_toggle() {
    let mut m = model(3);
    m.toggle(1, true);
    assert_eq!(m.selected(), vec![1]);
    assert_eq!(m.anchor(), Some(1));
}

#[test]
fn typed_ranges_clamp_and_union() {
    let mut m = model(6);
    m.toggle(0, false);
    let (from, to) = parse_range("9-5").unwrap();
    m.apply_range(from, to);
    assert_eq!(m.selected(), vec![0, 4, 5]);

    let (from, to) = parse_range("2").unwrap();
    m.apply_range(from, to);
    assert_eq!(m.selected(), vec![0, 1, 4, 5]);

    m.apply_range(0, 0);
    assert!(m.is_selected(0));
    assert_eq!(parse_range("1-2-3"), None);
    assert_eq!(parse_range("x"), None);
}

#[test]
fn clear_resets_selection_and_anchor() {
    let mut m = model(3);
    m.select_all();
    assert_eq!(m.selected_count(), 3);
    m.toggle(1, false);
    m.clear();
    assert!(!m.can_confirm());
    assert_eq!(m.anchor(), None);
    assert!(m.confirm().is_err());
}

#[test]
fn normalize_is_idempotent_on_its_own_output() {
    let raw = "  one\t two \r\n\r\n three   \n\u{2003}\nfour";
    let once = normalize(raw);
    let twice = normalize(&once.join("\n"));
    assert_eq!(once, twice);
    assert!(once.iter().all(|p| !p.is_empty() && p.trim() == p));
}

#[test]
fn normalize_composes_decomposed_accents() {
    let paragraphs = normalize("cafe\u{0301} au lait");
    assert_eq!(paragraphs, vec!["caf\u{e9} au lait"]);
}

#[test]
fn intake_sanitizes_before_length_check() {
    let filter = CharFilter::typing(true);
    assert!(intake("\u{2022}\u{2022}\u{2022} \u{25cf}\u{25cf}", &filter, 1).is_err());
    assert_eq!(
        intake("\u{2022} Item one\n\u{2022} Item two", &filter, 10).unwrap(),
        "Item one\nItem two"
    );
}

#[test]
fn practice_target_uses_line_breaks_between_paragraphs() {
    assert_eq!(practice_target("  a  b \n\n c "), "a b\nc");
}

#[test]
fn classification_is_positional() {
    let mut drill = DrillState::new("abcd");
    for ch in ['a', 'c', 'd'] {
        drill.append(ch);
    }
    assert_eq!(drill.classify(0), CharClass::Correct);
    assert_eq!(drill.classify(1), CharClass::Incorrect { typed: 'c' });
    assert_eq!(drill.classify(2), CharClass::Incorrect { typed: 'd' });
    assert_eq!(drill.classify(3), CharClass::Cursor);
    assert_eq!(drill.correct_count() + drill.incorrect_count(), drill.typed_len());
}

#[test]
fn input_never_outgrows_target() {
    let mut drill = DrillState::new("ab");
    assert!(drill.append('a'));
    assert!(drill.append('x'));
    assert!(!drill.append('b'));
    assert_eq!(drill.typed_len(), drill.target_len());
    assert!(drill.is_complete());
}

#[test]
fn shift_range_then_plain_toggle() {
    let mut m = model(6);
    m.toggle(1, false);
    m.toggle(4, true);
    assert_eq!(m.selected(), vec![1, 2, 3, 4]);
    m.toggle(2, false);
    assert_eq!(m.selected(), vec![1, 3, 4]);
}

#[test]
fn apply_range_ignores_argument_order() {
    let mut forward = model(7);
    let mut backward = model(7);
    forward.apply_range(2, 5);
    backward.apply_range(5, 2);
    assert_eq!(forward.selected(), backward.selected());
    assert_eq!(forward.selected(), vec![1, 2, 3, 4]);
}

#[test]
fn accuracy_and_wpm_worked_examples() {
    let mut drill = DrillState::new("hello");
    for ch in "helo".chars() {
        drill.append(ch);
    }
    assert_eq!(drill.correct_count(), 3);
    assert_eq!(metrics::accuracy(drill.correct_count(), drill.typed_len()), 75);
    assert_eq!(metrics::accuracy(0, 0), 100);
    assert_eq!(metrics::wpm(25, 60), 5);
    assert_eq!(metrics::wpm(25, 0), 0);
}

#[test]
fn only_character_keys_start_a_session() {
    let mut session = PracticeSession::start("id", "t", "ab").unwrap();
    let now = Instant::now();
    for code in [KeyCode::Left, KeyCode::Home, KeyCode::F(2), KeyCode::Enter] {
        let outcome = process_key(&mut session, &KeyEvent::new(code, KeyModifiers::NONE), now);
        assert_eq!(outcome, KeyOutcome::Ignored);
    }
    let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
    assert_eq!(process_key(&mut session, &ctrl_a, now), KeyOutcome::Ignored);
    assert_eq!(session.status(), SessionStatus::Idle);

    let shifted = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::SHIFT);
    assert_eq!(process_key(&mut session, &shifted, now), KeyOutcome::Accepted);
    assert_eq!(session.status(), SessionStatus::Running);
}

#[test]
fn finish_fires_once_then_rejects_input() {
    let mut session = PracticeSession::start("id", "t", "ab").unwrap();
    let now = Instant::now();
    session.handle_key('a', now);
    assert!(matches!(session.handle_key('b', now), KeyOutcome::Finished(_)));
    assert_eq!(session.handle_key('c', now), KeyOutcome::Ignored);
    assert_eq!(session.drill().typed_len(), 2);
    assert!(!session.exit());
    assert!(session.result().is_some());
}
