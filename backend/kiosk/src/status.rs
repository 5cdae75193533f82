use thiserror::Error;

pub const SUCCESS_MESSAGE: &str = "Thanks! You're checked in.";
pub const ERROR_MESSAGE: &str = "Something went wrong. Please try again or tell the front desk.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot move from {from:?} to {to:?}")]
pub struct InvalidTransition {
    pub from: FormStatus,
    pub to: FormStatus,
}

impl FormStatus {
    pub fn can_move_to(self, next: FormStatus) -> bool {
        use FormStatus::*;

        matches!(
            (self, next),
            (Idle | Success | Error, Submitting) | (Submitting, Idle | Success | Error) | (Error, Idle)
        )
    }

    pub fn move_to(&mut self, next: FormStatus) -> Result<(), InvalidTransition> {
        if !self.can_move_to(next) {
            return Err(InvalidTransition {
                from: *self,
                to: next,
            });
        }

        *self = next;
        Ok(())
    }

    /// The submit button is disabled while this is true.
    pub fn is_busy(self) -> bool {
        self == FormStatus::Submitting
    }

    /// What the kiosk shows under the submit button.
    pub fn message(self) -> Option<&'static str> {
        match self {
            FormStatus::Success => Some(SUCCESS_MESSAGE),
            FormStatus::Error => Some(ERROR_MESSAGE),
            FormStatus::Idle | FormStatus::Submitting => None,
        }
    }
}
