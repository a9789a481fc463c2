use std::cell::RefCell;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use spellbee::lookup::definition::Definition;
use spellbee::lookup::{LookupQueue, LookupReply, LookupTicket};
use spellbee::session::controller::{Ports, SessionController, SessionError, SessionState};
use spellbee::session::presenter::Presenter;
use spellbee::speech::{Narrator, Voice};
use spellbee::words::bank::{PracticeSet, WordBank};

#[derive(Default)]
struct Screen {
    panel_visible: bool,
    word: Option<(bool, String)>,
    definition: Option<Definition>,
    controls_enabled: bool,
    results: Option<(Vec<String>, Vec<String>)>,
}

impl Presenter for Screen {
    fn show_practice_panel(&mut self) {
        self.panel_visible = true;
    }

    fn hide_practice_panel(&mut self) {
        self.panel_visible = false;
    }

    fn render_current_word(&mut self, masked: bool, text: &str) {
        self.word = Some((masked, text.to_string()));
    }

    fn render_definition(&mut self, definition: &Definition) {
        self.definition = Some(definition.clone());
    }

    fn clear_definition(&mut self) {
        self.definition = None;
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }

    fn render_results(&mut self, correct_words: &[&str], incorrect_words: &[&str]) {
        self.results = Some((
            correct_words.iter().map(|w| w.to_string()).collect(),
            incorrect_words.iter().map(|w| w.to_string()).collect(),
        ));
    }
}

#[derive(Default)]
struct Speaker(RefCell<Vec<String>>);

impl Narrator for Speaker {
    fn speak(&self, text: &str, _voice: Option<&Voice>) {
        self.0.borrow_mut().push(text.to_string());
    }
}

#[derive(Default)]
struct Tickets(RefCell<Vec<LookupTicket>>);

impl LookupQueue for Tickets {
    fn submit(&self, ticket: LookupTicket) {
        self.0.borrow_mut().push(ticket);
    }
}

fn definition(text: &str) -> Definition {
    Definition {
        definition: text.to_string(),
        example: "N/A".to_string(),
    }
}

#[test]
fn two_word_session_end_to_end() {
    let mut screen = Screen::default();
    let speaker = Speaker::default();
    let tickets = Tickets::default();
    let mut session = SessionController::new();

    let set = PracticeSet::new(vec!["weird".to_string(), "siege".to_string()]);
    {
        let mut ports = Ports {
            presenter: &mut screen,
            narrator: &speaker,
            lookups: &tickets,
            voice: None,
        };
        session.start(set, &mut ports).unwrap();
    }
    assert_eq!(session.state(), SessionState::Presenting);
    assert!(screen.panel_visible);
    assert!(screen.controls_enabled);
    let first = session.current_word().unwrap().to_string();
    assert_eq!(screen.word, Some((true, first.clone())));

    let first_ticket = tickets.0.borrow()[0].clone();
    let reply = LookupReply {
        ticket: first_ticket.clone(),
        definition: definition("first meaning"),
    };
    assert!(session.apply_definition(&reply, &mut screen));
    assert_eq!(screen.definition.as_ref().unwrap().definition, "first meaning");

    {
        let mut ports = Ports {
            presenter: &mut screen,
            narrator: &speaker,
            lookups: &tickets,
            voice: None,
        };
        session.reveal(&mut ports).unwrap();
        session.judge(true, &mut ports).unwrap();
    }
    assert!(screen.definition.is_none());
    let second = session.current_word().unwrap().to_string();
    assert_ne!(first, second);

    // First word's lookup arriving late must not land on the second word
    let late = LookupReply {
        ticket: first_ticket,
        definition: definition("stale"),
    };
    assert!(!session.apply_definition(&late, &mut screen));
    assert!(screen.definition.is_none());

    {
        let mut ports = Ports {
            presenter: &mut screen,
            narrator: &speaker,
            lookups: &tickets,
            voice: None,
        };
        session.judge(false, &mut ports).unwrap();
        assert_eq!(
            session.judge(true, &mut ports),
            Err(SessionError::NoCurrentWord)
        );
    }

    assert_eq!(session.state(), SessionState::Finished);
    assert!(!screen.panel_visible);
    assert!(!screen.controls_enabled);
    assert_eq!(screen.results, Some((vec![first.clone()], vec![second.clone()])));
    assert_eq!(
        *speaker.0.borrow(),
        vec![first, second, "1 correct out of 2".to_string()]
    );
    assert_eq!(tickets.0.borrow().len(), 2);
}

#[test]
fn empty_session_speaks_summary_once() {
    let mut screen = Screen::default();
    let speaker = Speaker::default();
    let tickets = Tickets::default();
    let mut session = SessionController::new();

    let mut ports = Ports {
        presenter: &mut screen,
        narrator: &speaker,
        lookups: &tickets,
        voice: None,
    };
    session.start(PracticeSet::default(), &mut ports).unwrap();

    assert_eq!(session.state(), SessionState::Finished);
    assert_eq!(*speaker.0.borrow(), vec!["0 correct out of 0".to_string()]);
    assert!(tickets.0.borrow().is_empty());
    assert_eq!(screen.results, Some((Vec::new(), Vec::new())));
}

#[test]
fn oversized_request_uses_every_word_once() {
    let bank = WordBank::from_words(vec![
        "alpha".to_string(),
        "bravo".to_string(),
        "charlie".to_string(),
    ]);
    let mut rng = SmallRng::seed_from_u64(5);
    let set = bank.sample(5, &mut rng);
    assert_eq!(set.len(), 3);

    let mut screen = Screen::default();
    let speaker = Speaker::default();
    let tickets = Tickets::default();
    let mut session = SessionController::new();
    let mut ports = Ports {
        presenter: &mut screen,
        narrator: &speaker,
        lookups: &tickets,
        voice: None,
    };
    session.start(set, &mut ports).unwrap();
    for _ in 0..3 {
        session.judge(true, &mut ports).unwrap();
    }

    let result = session.result().unwrap();
    assert_eq!(result.total(), 3);
    let mut words = result.correct_words();
    words.sort_unstable();
    assert_eq!(words, vec!["alpha", "bravo", "charlie"]);
}

#[test]
fn restart_after_finish_begins_fresh() {
    let mut screen = Screen::default();
    let speaker = Speaker::default();
    let tickets = Tickets::default();
    let mut session = SessionController::new();
    let mut ports = Ports {
        presenter: &mut screen,
        narrator: &speaker,
        lookups: &tickets,
        voice: None,
    };

    session
        .start(PracticeSet::new(vec!["one".to_string()]), &mut ports)
        .unwrap();
    assert_eq!(
        session.start(PracticeSet::new(vec!["two".to_string()]), &mut ports),
        Err(SessionError::AlreadyRunning)
    );
    session.judge(false, &mut ports).unwrap();
    assert_eq!(session.state(), SessionState::Finished);

    session
        .start(PracticeSet::new(vec!["two".to_string()]), &mut ports)
        .unwrap();
    assert_eq!(session.state(), SessionState::Presenting);
    assert_eq!(session.current_word(), Some("two"));
    assert!(session.result().is_none());
}
