//! Welcome and dialog banners modelled as two independent state machines.

use overworld_core::{DialogBanner, WelcomeBanner};

/// Banner state owned by the world. The banners never constrain each other.
#[derive(Clone, Debug, Default)]
pub(crate) struct Interaction {
    welcome: WelcomeBanner,
    dialog: DialogBanner,
}

impl Interaction {
    pub(crate) fn welcome(&self) -> WelcomeBanner {
        self.welcome
    }

    pub(crate) fn dialog(&self) -> &DialogBanner {
        &self.dialog
    }

    /// Hides the welcome banner. Returns `true` when the state changed.
    pub(crate) fn dismiss_welcome(&mut self) -> bool {
        match self.welcome {
            WelcomeBanner::Shown => {
                self.welcome = WelcomeBanner::Hidden;
                true
            }
            WelcomeBanner::Hidden => false,
        }
    }

    /// Opens the dialog, replacing any text already shown.
    ///
    /// Empty text never produces a visible dialog and is ignored.
    pub(crate) fn show_dialog(&mut self, text: String) -> bool {
        if text.is_empty() {
            return false;
        }
        self.dialog = DialogBanner::Active(text);
        true
    }

    /// Closes the dialog. Returns `true` when a dialog was open.
    pub(crate) fn dismiss_dialog(&mut self) -> bool {
        match self.dialog {
            DialogBanner::Active(_) => {
                self.dialog = DialogBanner::Inactive;
                true
            }
            DialogBanner::Inactive => false,
        }
    }
}
