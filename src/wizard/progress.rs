//! Wizard steps and tab gating.

use serde::{Deserialize, Serialize};

use crate::error::{OnboardError, Result};
use crate::models::FormProgress;

/// The seven tabs of the onboarding wizard, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    BasicInfo,
    Location,
    Amenities,
    Rooms,
    Media,
    Policies,
    Finance,
}

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        Self::BasicInfo,
        Self::Location,
        Self::Amenities,
        Self::Rooms,
        Self::Media,
        Self::Policies,
        Self::Finance,
    ];

    pub const FIRST: WizardStep = WizardStep::BasicInfo;
    pub const LAST: WizardStep = WizardStep::Finance;

    /// Zero-based tab index
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Info",
            Self::Location => "Location",
            Self::Amenities => "Amenities",
            Self::Rooms => "Rooms",
            Self::Media => "Media",
            Self::Policies => "Policies",
            Self::Finance => "Finance",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowest incomplete step, or the last step once everything is done
pub fn initial_step(progress: &FormProgress) -> WizardStep {
    progress.first_incomplete().unwrap_or(WizardStep::LAST)
}

/// Active tab plus the furthest tab reached in this session.
///
/// Completion flags come from the server record and are passed in on
/// every query rather than cached here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepNavigator {
    active: WizardStep,
    furthest: WizardStep,
}

impl StepNavigator {
    pub fn new(progress: &FormProgress) -> Self {
        let active = initial_step(progress);
        Self {
            active,
            furthest: active,
        }
    }

    pub fn active(&self) -> WizardStep {
        self.active
    }

    pub fn furthest(&self) -> WizardStep {
        self.furthest
    }

    /// A tab is clickable if it is the first one, the server reports it
    /// complete, or the user already reached it this session.
    pub fn is_enabled(&self, step: WizardStep, progress: &FormProgress) -> bool {
        step == WizardStep::FIRST || progress.is_complete(step) || step <= self.furthest
    }

    pub fn select(&mut self, step: WizardStep, progress: &FormProgress) -> Result<()> {
        if !self.is_enabled(step, progress) {
            return Err(OnboardError::InvalidState(format!(
                "Complete the earlier steps before opening {}",
                step.label()
            )));
        }
        self.visit(step);
        Ok(())
    }

    /// Move past the active step after a confirmed save.
    ///
    /// Returns the new active step, or `None` when the last step was saved.
    pub fn advance(&mut self) -> Option<WizardStep> {
        let next = self.active.next()?;
        self.visit(next);
        Some(next)
    }

    fn visit(&mut self, step: WizardStep) {
        self.active = step;
        if step > self.furthest {
            self.furthest = step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(done: &[WizardStep]) -> FormProgress {
        let mut p = FormProgress::default();
        for step in done {
            match step {
                WizardStep::BasicInfo => p.step1_completed = true,
                WizardStep::Location => p.step2_completed = true,
                WizardStep::Amenities => p.step3_completed = true,
                WizardStep::Rooms => p.step4_completed = true,
                WizardStep::Media => p.step5_completed = true,
                WizardStep::Policies => p.step6_completed = true,
                WizardStep::Finance => p.step7_completed = true,
            }
        }
        p
    }

    #[test]
    fn resumes_at_first_incomplete_step() {
        let p = progress(&[WizardStep::BasicInfo]);
        assert_eq!(initial_step(&p), WizardStep::Location);
        assert_eq!(initial_step(&p).index(), 1);
    }

    #[test]
    fn gaps_resume_at_lowest_gap() {
        let p = progress(&[WizardStep::BasicInfo, WizardStep::Amenities]);
        assert_eq!(initial_step(&p), WizardStep::Location);
    }

    #[test]
    fn fully_complete_lands_on_last_step() {
        assert_eq!(initial_step(&progress(&WizardStep::ALL)), WizardStep::Finance);
    }

    #[test]
    fn fresh_draft_starts_at_basic_info() {
        assert_eq!(initial_step(&FormProgress::default()), WizardStep::BasicInfo);
    }

    #[test]
    fn cannot_skip_ahead() {
        let p = progress(&[WizardStep::BasicInfo]);
        let mut nav = StepNavigator::new(&p);
        assert!(nav.is_enabled(WizardStep::BasicInfo, &p));
        assert!(nav.is_enabled(WizardStep::Location, &p));
        assert!(!nav.is_enabled(WizardStep::Rooms, &p));
        assert!(nav.select(WizardStep::Rooms, &p).is_err());
        assert_eq!(nav.active(), WizardStep::Location);
    }

    #[test]
    fn backward_navigation_keeps_reached_tabs_open() {
        let p = progress(&[WizardStep::BasicInfo, WizardStep::Location]);
        let mut nav = StepNavigator::new(&p);
        assert_eq!(nav.active(), WizardStep::Amenities);
        nav.select(WizardStep::BasicInfo, &p).unwrap();
        assert!(nav.is_enabled(WizardStep::Amenities, &p));
        nav.select(WizardStep::Amenities, &p).unwrap();
    }

    #[test]
    fn server_completed_tab_is_open_even_if_unvisited() {
        let p = progress(&[WizardStep::Media]);
        let nav = StepNavigator::new(&p);
        assert!(nav.is_enabled(WizardStep::Media, &p));
        assert!(!nav.is_enabled(WizardStep::Policies, &p));
    }

    #[test]
    fn advance_stops_after_last_step() {
        let p = progress(&WizardStep::ALL);
        let mut nav = StepNavigator::new(&p);
        assert_eq!(nav.advance(), None);
        assert_eq!(nav.active(), WizardStep::Finance);
    }

    #[test]
    fn step_index_round_trip() {
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::from_index(step.index()), Some(step));
        }
        assert_eq!(WizardStep::from_index(7), None);
        assert_eq!(WizardStep::BasicInfo.previous(), None);
    }
}
