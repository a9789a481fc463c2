use std::mem;

use thiserror::Error;
use tracing::{debug, info};

use crate::lookup::{LookupQueue, LookupReply, LookupTicket};
use crate::session::presenter::Presenter;
use crate::session::result::{Judgment, SessionResult, WordJudgment};
use crate::speech::{Narrator, Voice};
use crate::words::bank::PracticeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Presenting,
    Finished,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a session is already running")]
    AlreadyRunning,
    #[error("no word is being presented")]
    NoCurrentWord,
}

/// Collaborators the controller drives while handling one command.
pub struct Ports<'a> {
    pub presenter: &'a mut dyn Presenter,
    pub narrator: &'a dyn Narrator,
    pub lookups: &'a dyn LookupQueue,
    pub voice: Option<&'a Voice>,
}

struct Presentation {
    word: String,
    epoch: u64,
    revealed: bool,
}

/// Practice session state machine: `Idle -> Presenting -> Finished`.
///
/// Words are popped from the back of the practice set. Each presentation
/// gets a fresh epoch; definition lookups carry the epoch they were issued
/// under and are dropped on arrival unless it still matches.
pub struct SessionController {
    state: SessionState,
    remaining: Vec<String>,
    current: Option<Presentation>,
    judgments: Vec<WordJudgment>,
    total: usize,
    epoch: u64,
    result: Option<SessionResult>,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            remaining: Vec::new(),
            current: None,
            judgments: Vec::new(),
            total: 0,
            epoch: 0,
            result: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current.as_ref().map(|p| p.word.as_str())
    }

    pub fn is_revealed(&self) -> bool {
        self.current.as_ref().is_some_and(|p| p.revealed)
    }

    /// Number of words presented so far, including the current one.
    pub fn presented(&self) -> usize {
        self.judgments.len() + usize::from(self.current.is_some())
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn correct_so_far(&self) -> usize {
        self.judgments.iter().filter(|j| j.judgment.is_correct()).count()
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// Begin a session. Rejected while another is presenting; from `Idle`
    /// or `Finished` the previous state is discarded.
    pub fn start(&mut self, set: PracticeSet, ports: &mut Ports<'_>) -> Result<(), SessionError> {
        if self.state == SessionState::Presenting {
            return Err(SessionError::AlreadyRunning);
        }

        self.total = set.len();
        self.remaining = set.into_words();
        self.current = None;
        self.judgments.clear();
        self.result = None;
        info!(words = self.total, "session started");

        if self.remaining.is_empty() {
            self.finish(ports);
            return Ok(());
        }

        self.state = SessionState::Presenting;
        ports.presenter.show_practice_panel();
        self.present_next(ports);
        Ok(())
    }

    pub fn judge(&mut self, correct: bool, ports: &mut Ports<'_>) -> Result<Judgment, SessionError> {
        if self.state != SessionState::Presenting {
            return Err(SessionError::NoCurrentWord);
        }
        let presentation = self.current.take().ok_or(SessionError::NoCurrentWord)?;
        let judgment = Judgment::from_correct(correct);
        debug!(word = %presentation.word, ?judgment, "word judged");
        self.judgments.push(WordJudgment {
            word: presentation.word,
            judgment,
        });
        self.present_next(ports);
        Ok(judgment)
    }

    pub fn repeat(&self, ports: &mut Ports<'_>) -> Result<(), SessionError> {
        let presentation = self.presenting()?;
        ports.narrator.speak(&presentation.word, ports.voice);
        Ok(())
    }

    /// Unmask the current word. Revealing twice is a no-op.
    pub fn reveal(&mut self, ports: &mut Ports<'_>) -> Result<(), SessionError> {
        self.presenting()?;
        let Some(presentation) = self.current.as_mut() else {
            return Err(SessionError::NoCurrentWord);
        };
        if presentation.revealed {
            return Ok(());
        }
        presentation.revealed = true;
        ports
            .presenter
            .render_current_word(false, &presentation.word);
        Ok(())
    }

    /// Show a lookup result if it belongs to the word on screen.
    /// Returns whether it was applied.
    pub fn apply_definition(&self, reply: &LookupReply, presenter: &mut dyn Presenter) -> bool {
        let fresh = self.state == SessionState::Presenting
            && self
                .current
                .as_ref()
                .is_some_and(|p| p.epoch == reply.ticket.epoch);
        if fresh {
            presenter.render_definition(&reply.definition);
        } else {
            debug!(
                word = %reply.ticket.word,
                epoch = reply.ticket.epoch,
                current = self.epoch,
                "discarding stale definition"
            );
        }
        fresh
    }

    /// Drop an in-progress session without producing results.
    pub fn abandon(&mut self, presenter: &mut dyn Presenter) {
        if self.state != SessionState::Presenting {
            return;
        }
        info!(presented = self.presented(), total = self.total, "session abandoned");
        self.state = SessionState::Idle;
        self.remaining.clear();
        self.current = None;
        self.judgments.clear();
        self.total = 0;
        presenter.set_controls_enabled(false);
        presenter.hide_practice_panel();
    }

    fn presenting(&self) -> Result<&Presentation, SessionError> {
        match (self.state, self.current.as_ref()) {
            (SessionState::Presenting, Some(p)) => Ok(p),
            _ => Err(SessionError::NoCurrentWord),
        }
    }

    fn present_next(&mut self, ports: &mut Ports<'_>) {
        let Some(word) = self.remaining.pop() else {
            self.finish(ports);
            return;
        };

        self.epoch += 1;
        ports.presenter.clear_definition();
        ports.presenter.render_current_word(true, &word);
        ports.presenter.set_controls_enabled(true);
        ports.narrator.speak(&word, ports.voice);
        ports.lookups.submit(LookupTicket {
            epoch: self.epoch,
            word: word.clone(),
        });
        self.current = Some(Presentation {
            word,
            epoch: self.epoch,
            revealed: false,
        });
    }

    fn finish(&mut self, ports: &mut Ports<'_>) {
        self.state = SessionState::Finished;
        self.current = None;
        let result = SessionResult::new(mem::take(&mut self.judgments));
        info!(
            correct = result.correct_count(),
            total = result.total(),
            "session finished"
        );

        ports.presenter.set_controls_enabled(false);
        ports.presenter.hide_practice_panel();
        ports
            .presenter
            .render_results(&result.correct_words(), &result.incorrect_words());
        ports.narrator.speak(&result.summary_utterance(), ports.voice);
        self.result = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::lookup::definition::Definition;

    #[derive(Debug, Clone, PartialEq)]
    enum Shown {
        PanelShown,
        PanelHidden,
        Word { masked: bool, text: String },
        Definition(String),
        DefinitionCleared,
        Controls(bool),
        Results { correct: Vec<String>, incorrect: Vec<String> },
    }

    #[derive(Default)]
    struct Recorder {
        log: Vec<Shown>,
    }

    impl Presenter for Recorder {
        fn show_practice_panel(&mut self) {
            self.log.push(Shown::PanelShown);
        }
        fn hide_practice_panel(&mut self) {
            self.log.push(Shown::PanelHidden);
        }
        fn render_current_word(&mut self, masked: bool, text: &str) {
            self.log.push(Shown::Word {
                masked,
                text: text.to_string(),
            });
        }
        fn render_definition(&mut self, definition: &Definition) {
            self.log.push(Shown::Definition(definition.definition.clone()));
        }
        fn clear_definition(&mut self) {
            self.log.push(Shown::DefinitionCleared);
        }
        fn set_controls_enabled(&mut self, enabled: bool) {
            self.log.push(Shown::Controls(enabled));
        }
        fn render_results(&mut self, correct: &[&str], incorrect: &[&str]) {
            self.log.push(Shown::Results {
                correct: correct.iter().map(|s| s.to_string()).collect(),
                incorrect: incorrect.iter().map(|s| s.to_string()).collect(),
            });
        }
    }

    #[derive(Default)]
    struct Spoken(RefCell<Vec<String>>);

    impl Narrator for Spoken {
        fn speak(&self, text: &str, _voice: Option<&Voice>) {
            self.0.borrow_mut().push(text.to_string());
        }
    }

    #[derive(Default)]
    struct Submitted(RefCell<Vec<LookupTicket>>);

    impl LookupQueue for Submitted {
        fn submit(&self, ticket: LookupTicket) {
            self.0.borrow_mut().push(ticket);
        }
    }

    #[derive(Default)]
    struct Harness {
        presenter: Recorder,
        narrator: Spoken,
        lookups: Submitted,
    }

    impl Harness {
        fn ports(&mut self) -> Ports<'_> {
            Ports {
                presenter: &mut self.presenter,
                narrator: &self.narrator,
                lookups: &self.lookups,
                voice: None,
            }
        }

        fn spoken(&self) -> Vec<String> {
            self.narrator.0.borrow().clone()
        }

        fn tickets(&self) -> Vec<LookupTicket> {
            self.lookups.0.borrow().clone()
        }
    }

    fn set(words: &[&str]) -> PracticeSet {
        PracticeSet::new(words.iter().map(|w| w.to_string()).collect())
    }

    fn reply(ticket: &LookupTicket, text: &str) -> LookupReply {
        LookupReply {
            ticket: ticket.clone(),
            definition: Definition {
                definition: text.to_string(),
                example: "N/A".to_string(),
            },
        }
    }

    #[test]
    fn presents_last_sampled_word_first() {
        let mut h = Harness::default();
        let mut session = SessionController::new();
        session.start(set(&["first", "second"]), &mut h.ports()).unwrap();

        assert_eq!(session.state(), SessionState::Presenting);
        assert_eq!(session.current_word(), Some("second"));
        assert!(!session.is_revealed());
        assert_eq!(h.spoken(), vec!["second"]);
        assert_eq!(h.tickets().len(), 1);
        assert_eq!(
            h.presenter.log,
            vec![
                Shown::PanelShown,
                Shown::DefinitionCleared,
                Shown::Word {
                    masked: true,
                    text: "second".to_string()
                },
                Shown::Controls(true),
            ]
        );
    }

    #[test]
    fn two_word_session_tallies_results() {
        let mut h = Harness::default();
        let mut session = SessionController::new();
        session.start(set(&["word2", "word1"]), &mut h.ports()).unwrap();

        assert_eq!(session.current_word(), Some("word1"));
        assert_eq!(session.judge(true, &mut h.ports()), Ok(Judgment::Correct));
        assert_eq!(session.current_word(), Some("word2"));
        assert_eq!(session.judge(false, &mut h.ports()), Ok(Judgment::Incorrect));

        assert_eq!(session.state(), SessionState::Finished);
        let result = session.result().unwrap();
        assert_eq!(result.correct_count(), 1);
        assert_eq!(result.incorrect_count(), 1);
        assert_eq!(result.correct_words(), vec!["word1"]);
        assert_eq!(result.incorrect_words(), vec!["word2"]);

        assert_eq!(h.spoken(), vec!["word1", "word2", "1 correct out of 2"]);
        assert_eq!(
            h.presenter.log.last(),
            Some(&Shown::Results {
                correct: vec!["word1".to_string()],
                incorrect: vec!["word2".to_string()],
            })
        );
    }

    #[test]
    fn empty_set_finishes_immediately() {
        let mut h = Harness::default();
        let mut session = SessionController::new();
        session.start(PracticeSet::default(), &mut h.ports()).unwrap();

        assert_eq!(session.state(), SessionState::Finished);
        let result = session.result().unwrap();
        assert_eq!(result.correct_count(), 0);
        assert!(result.correct_words().is_empty());
        assert!(result.incorrect_words().is_empty());
        assert_eq!(h.spoken(), vec!["0 correct out of 0"]);
        assert!(h.tickets().is_empty());
        assert!(!h.presenter.log.contains(&Shown::PanelShown));
    }

    #[test]
    fn commands_after_finish_are_rejected() {
        let mut h = Harness::default();
        let mut session = SessionController::new();
        session.start(set(&["only"]), &mut h.ports()).unwrap();
        session.judge(true, &mut h.ports()).unwrap();
        let log_len = h.presenter.log.len();

        assert_eq!(session.judge(true, &mut h.ports()), Err(SessionError::NoCurrentWord));
        assert_eq!(session.repeat(&mut h.ports()), Err(SessionError::NoCurrentWord));
        assert_eq!(session.reveal(&mut h.ports()), Err(SessionError::NoCurrentWord));

        assert_eq!(session.result().unwrap().total(), 1);
        assert_eq!(h.presenter.log.len(), log_len);
        assert_eq!(h.spoken(), vec!["only", "1 correct out of 1"]);
    }

    #[test]
    fn commands_while_idle_are_rejected() {
        let mut h = Harness::default();
        let mut session = SessionController::new();
        assert_eq!(session.judge(false, &mut h.ports()), Err(SessionError::NoCurrentWord));
        assert_eq!(session.repeat(&mut h.ports()), Err(SessionError::NoCurrentWord));
        assert_eq!(session.reveal(&mut h.ports()), Err(SessionError::NoCurrentWord));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(h.presenter.log.is_empty());
    }

    #[test]
    fn repeat_speaks_again_without_state_change() {
        let mut h = Harness::default();
        let mut session = SessionController::new();
        session.start(set(&["gauge"]), &mut h.ports()).unwrap();
        session.repeat(&mut h.ports()).unwrap();
        session.repeat(&mut h.ports()).unwrap();

        assert_eq!(h.spoken(), vec!["gauge", "gauge", "gauge"]);
        assert_eq!(session.current_word(), Some("gauge"));
        assert_eq!(session.presented(), 1);
        assert_eq!(h.tickets().len(), 1);
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut h = Harness::default();
        let mut session = SessionController::new();
        session.start(set(&["yacht"]), &mut h.ports()).unwrap();

        session.reveal(&mut h.ports()).unwrap();
        let after_once = h.presenter.log.clone();
        session.reveal(&mut h.ports()).unwrap();

        assert_eq!(h.presenter.log, after_once);
        assert!(session.is_revealed());
        assert_eq!(
            after_once.last(),
            Some(&Shown::Word {
                masked: false,
                text: "yacht".to_string()
            })
        );
    }

    #[test]
    fn next_word_starts_masked_after_reveal() {
        let mut h = Harness::default();
        let mut session = SessionController::new();
        session.start(set(&["b", "a"]), &mut h.ports()).unwrap();
        session.reveal(&mut h.ports()).unwrap();
        session.judge(true, &mut h.ports()).unwrap();

        assert!(!session.is_revealed());
        assert!(h.presenter.log.contains(&Shown::Word {
            masked: true,
            text: "b".to_string()
        }));
    }

    #[test]
    fn stale_definition_is_discarded() {
        let mut h = Harness::default();
        let mut session = SessionController::new();
        session.start(set(&["word_b", "word_a"]), &mut h.ports()).unwrap();
        session.judge(true, &mut h.ports()).unwrap();

        let tickets = h.tickets();
        assert_eq!(tickets[0].word, "word_a");
        assert_eq!(tickets[1].word, "word_b");

        let mut view = Recorder::default();
        assert!(!session.apply_definition(&reply(&tickets[0], "about a"), &mut view));
        assert!(view.log.is_empty());

        assert!(session.apply_definition(&reply(&tickets[1], "about b"), &mut view));
        assert_eq!(view.log, vec![Shown::Definition("about b".to_string())]);
    }

    #[test]
    fn definition_after_finish_is_discarded() {
        let mut h = Harness::default();
        let mut session = SessionController::new();
        session.start(set(&["solo"]), &mut h.ports()).unwrap();
        session.judge(false, &mut h.ports()).unwrap();

        let ticket = h.tickets()[0].clone();
        let mut view = Recorder::default();
        assert!(!session.apply_definition(&reply(&ticket, "late"), &mut view));
        assert!(view.log.is_empty());
    }

    #[test]
    fn same_word_in_new_session_does_not_accept_old_lookup() {
        let mut h = Harness::default();
        let mut session = SessionController::new();
        session.start(set(&["echo"]), &mut h.ports()).unwrap();
        session.judge(true, &mut h.ports()).unwrap();
        session.start(set(&["echo"]), &mut h.ports()).unwrap();

        let tickets = h.tickets();
        assert_eq!(tickets.len(), 2);
        assert_ne!(tickets[0].epoch, tickets[1].epoch);

        let mut view = Recorder::default();
        assert!(!session.apply_definition(&reply(&tickets[0], "old"), &mut view));
        assert!(session.apply_definition(&reply(&tickets[1], "new"), &mut view));
    }

    #[test]
    fn start_while_presenting_is_rejected() {
        let mut h = Harness::default();
        let mut session = SessionController::new();
        session.start(set(&["two", "one"]), &mut h.ports()).unwrap();

        assert_eq!(
            session.start(set(&["other"]), &mut h.ports()),
            Err(SessionError::AlreadyRunning)
        );
        assert_eq!(session.current_word(), Some("one"));
        assert_eq!(session.total(), 2);
    }

    #[test]
    fn restart_after_finish_begins_fresh() {
        let mut h = Harness::default();
        let mut session = SessionController::new();
        session.start(set(&["one"]), &mut h.ports()).unwrap();
        session.judge(true, &mut h.ports()).unwrap();

        session.start(set(&["three", "two"]), &mut h.ports()).unwrap();
        assert_eq!(session.state(), SessionState::Presenting);
        assert!(session.result().is_none());
        assert_eq!(session.presented(), 1);
        assert_eq!(session.total(), 2);
    }

    #[test]
    fn abandon_returns_to_idle_and_drops_lookups() {
        let mut h = Harness::default();
        let mut session = SessionController::new();
        session.start(set(&["two", "one"]), &mut h.ports()).unwrap();
        session.abandon(&mut h.presenter);

        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.result().is_none());
        assert_eq!(session.judge(true, &mut h.ports()), Err(SessionError::NoCurrentWord));

        let ticket = h.tickets()[0].clone();
        let mut view = Recorder::default();
        assert!(!session.apply_definition(&reply(&ticket, "gone"), &mut view));
    }

    #[test]
    fn every_word_judged_exactly_once() {
        let words = ["a", "b", "c", "d", "e", "f", "g"];
        let mut h = Harness::default();
        let mut session = SessionController::new();
        session.start(set(&words), &mut h.ports()).unwrap();

        let mut i = 0;
        while session.state() == SessionState::Presenting {
            session.judge(i % 3 == 0, &mut h.ports()).unwrap();
            i += 1;
        }

        let result = session.result().unwrap();
        assert_eq!(result.total(), words.len());
        let mut judged: Vec<&str> = result.entries().iter().map(|e| e.word.as_str()).collect();
        judged.sort();
        assert_eq!(judged, words.to_vec());
        assert_eq!(result.correct_count() + result.incorrect_count(), words.len());
        assert_eq!(
            result.correct_count(),
            result.entries().iter().filter(|e| e.judgment.is_correct()).count()
        );
    }
}
