use crate::core::bedtime::{BedtimeCalculator, BedtimeOutcome, SleepForm};
use crate::core::{Notification, SleepModel};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AlertState {
    #[default]
    Idle,
    Showing(Notification),
}

/// One notification slot: a calculation shows its result, a dismissal clears it.
pub struct BedtimeSession<M: SleepModel> {
    calculator: BedtimeCalculator<M>,
    state: AlertState,
}

impl<M: SleepModel> BedtimeSession<M> {
    pub fn new(calculator: BedtimeCalculator<M>) -> Self {
        Self {
            calculator,
            state: AlertState::Idle,
        }
    }

    /// 新結果直接取代目前顯示中的通知，不排隊
    pub fn calculate(&mut self, form: &SleepForm) -> BedtimeOutcome {
        let outcome = self.calculator.calculate(form);
        self.state = AlertState::Showing(outcome.notification());
        outcome
    }

    pub fn dismiss(&mut self) {
        self.state = AlertState::Idle;
    }

    pub fn state(&self) -> &AlertState {
        &self.state
    }

    pub fn notification(&self) -> Option<&Notification> {
        match &self.state {
            AlertState::Idle => None,
            AlertState::Showing(notification) => Some(notification),
        }
    }
}
