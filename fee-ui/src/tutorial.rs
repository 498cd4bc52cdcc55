//! The guided tour shown to first-time users.

use tracing::{debug, info};

use crate::preferences::{PreferenceError, PreferenceStore, TUTORIAL_COMPLETED_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorialStep {
    pub title: &'static str,
    pub body: &'static str,
}

pub const STEPS: [TutorialStep; 6] = [
    TutorialStep {
        title: "Choose Property Type",
        body: "Start with `type land`, `type house` or `type unit`. Every item that \
               applies to that property type is selected for you.",
    },
    TutorialStep {
        title: "Understanding Icons",
        body: "In `list`, [x] marks a selected item. The Type column shows which items \
               match the chosen property type, and Notes flags free items and prices \
               that already include GST.",
    },
    TutorialStep {
        title: "Select Items & Quantities",
        body: "Use `check <id>` and `uncheck <id>` to include or drop items, and \
               `qty <id> <n>` to change how many of an item you need.",
    },
    TutorialStep {
        title: "Add Custom Items",
        body: "Need something not listed? `add` creates a custom item. Give it a \
               description with `desc <id> <text>` and a price with `cost <id> <amount>`.",
    },
    TutorialStep {
        title: "Review Totals",
        body: "`summary` shows the subtotal, GST and total including GST. All amounts \
               are in AUD.",
    },
    TutorialStep {
        title: "Print or Reset",
        body: "When ready, `print` the estimate (optionally to a file) or `reset` to \
               start over. That completes the tour!",
    },
];

/// Where the tour is after a navigation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourProgress {
    /// Showing the step at this 0-based index.
    Step(usize),
    Finished,
    NotRunning,
}

/// Tour position plus the persisted completion flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tutorial {
    current: Option<usize>,
    completed: bool,
}

impl Tutorial {
    pub fn new(completed: bool) -> Self {
        Self {
            current: None,
            completed,
        }
    }

    /// Reads the completion flag. An unset flag means the tour has not been
    /// completed.
    pub fn load<S: PreferenceStore + ?Sized>(store: &S) -> Result<Self, PreferenceError> {
        let completed = store.get_flag(TUTORIAL_COMPLETED_KEY)?.unwrap_or(false);
        debug!(completed, "tutorial state loaded");
        Ok(Self::new(completed))
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_step(&self) -> Option<(usize, &'static TutorialStep)> {
        self.current.map(|index| (index, &STEPS[index]))
    }

    /// Opens the tour at the first step, even if it was completed before.
    pub fn start(&mut self) -> TourProgress {
        self.current = Some(0);
        TourProgress::Step(0)
    }

    /// Advances one step. Moving past the last step finishes the tour and
    /// records it as completed.
    pub fn next<S: PreferenceStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<TourProgress, PreferenceError> {
        match self.current {
            None => Ok(TourProgress::NotRunning),
            Some(index) if index + 1 < STEPS.len() => {
                self.current = Some(index + 1);
                Ok(TourProgress::Step(index + 1))
            }
            Some(_) => self.finish(store),
        }
    }

    /// Goes back one step, staying on the first step if already there.
    pub fn back(&mut self) -> TourProgress {
        match self.current {
            None => TourProgress::NotRunning,
            Some(index) => {
                let previous = index.saturating_sub(1);
                self.current = Some(previous);
                TourProgress::Step(previous)
            }
        }
    }

    /// Closes a running tour and records it as completed.
    pub fn skip<S: PreferenceStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<TourProgress, PreferenceError> {
        if self.current.is_none() {
            return Ok(TourProgress::NotRunning);
        }
        self.finish(store)
    }

    fn finish<S: PreferenceStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<TourProgress, PreferenceError> {
        self.current = None;
        store.set_flag(TUTORIAL_COMPLETED_KEY, true)?;
        self.completed = true;
        info!("tutorial completed");
        Ok(TourProgress::Finished)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::preferences::MemoryPreferenceStore;

    #[test]
    fn steps_follow_the_tour_order() {
        let titles: Vec<_> = STEPS.iter().map(|step| step.title).collect();

        assert_eq!(
            titles,
            vec![
                "Choose Property Type",
                "Understanding Icons",
                "Select Items & Quantities",
                "Add Custom Items",
                "Review Totals",
                "Print or Reset",
            ]
        );
    }

    #[test]
    fn load_defaults_to_not_completed() {
        let store = MemoryPreferenceStore::new();

        let tutorial = Tutorial::load(&store).unwrap();

        assert!(!tutorial.is_completed());
        assert!(!tutorial.is_running());
    }

    #[test]
    fn next_walks_every_step_then_finishes() {
        let mut store = MemoryPreferenceStore::new();
        let mut tutorial = Tutorial::default();

        assert_eq!(tutorial.start(), TourProgress::Step(0));
        for expected in 1..STEPS.len() {
            assert_eq!(tutorial.next(&mut store).unwrap(), TourProgress::Step(expected));
        }
        assert_eq!(tutorial.next(&mut store).unwrap(), TourProgress::Finished);

        assert!(tutorial.is_completed());
        assert!(!tutorial.is_running());
        assert_eq!(store.get_flag(TUTORIAL_COMPLETED_KEY).unwrap(), Some(true));
    }

    #[test]
    fn back_stops_at_first_step() {
        let mut store = MemoryPreferenceStore::new();
        let mut tutorial = Tutorial::default();
        tutorial.start();
        tutorial.next(&mut store).unwrap();

        assert_eq!(tutorial.back(), TourProgress::Step(0));
        assert_eq!(tutorial.back(), TourProgress::Step(0));
        assert_eq!(tutorial.current_step().map(|(i, step)| (i, step.title)), Some((0, "Choose Property Type")));
    }

    #[test]
    fn skip_marks_completed() {
        let mut store = MemoryPreferenceStore::new();
        let mut tutorial = Tutorial::default();
        tutorial.start();

        assert_eq!(tutorial.skip(&mut store).unwrap(), TourProgress::Finished);

        assert!(tutorial.is_completed());
        assert_eq!(store.get_flag(TUTORIAL_COMPLETED_KEY).unwrap(), Some(true));
    }

    #[test]
    fn navigation_without_a_running_tour_does_nothing() {
        let mut store = MemoryPreferenceStore::new();
        let mut tutorial = Tutorial::default();

        assert_eq!(tutorial.next(&mut store).unwrap(), TourProgress::NotRunning);
        assert_eq!(tutorial.back(), TourProgress::NotRunning);
        assert_eq!(tutorial.skip(&mut store).unwrap(), TourProgress::NotRunning);
        assert_eq!(store.get_flag(TUTORIAL_COMPLETED_KEY).unwrap(), None);
    }
}
