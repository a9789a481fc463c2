#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Judgment {
    Correct,
    Incorrect,
}

impl Judgment {
    pub fn from_correct(correct: bool) -> Self {
        if correct {
            Judgment::Correct
        } else {
            Judgment::Incorrect
        }
    }

    pub fn is_correct(self) -> bool {
        self == Judgment::Correct
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordJudgment {
    pub word: String,
    pub judgment: Judgment,
}

/// Final tally of a finished session. Built once by the controller and
/// read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionResult {
    entries: Vec<WordJudgment>,
}

impl SessionResult {
    pub(crate) fn new(entries: Vec<WordJudgment>) -> Self {
        Self { entries }
    }

    /// Judgments in the order the words were presented.
    pub fn entries(&self) -> &[WordJudgment] {
        &self.entries
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn correct_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.judgment.is_correct())
            .count()
    }

    pub fn incorrect_count(&self) -> usize {
        self.total() - self.correct_count()
    }

    pub fn correct_words(&self) -> Vec<&str> {
        self.words_with(Judgment::Correct)
    }

    pub fn incorrect_words(&self) -> Vec<&str> {
        self.words_with(Judgment::Incorrect)
    }

    fn words_with(&self, judgment: Judgment) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.judgment == judgment)
            .map(|e| e.word.as_str())
            .collect()
    }

    pub fn accuracy(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.correct_count() as f64 / self.total() as f64 * 100.0
    }

    pub fn summary_utterance(&self) -> String {
        format!("{} correct out of {}", self.correct_count(), self.total())
    }
}
