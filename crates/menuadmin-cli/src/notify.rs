//! Terminal notifier.

use tracing::debug;

use menuadmin_core::traits::{Notice, NoticeLevel, Notifier};

use crate::output;

/// Prints notices to the terminal.
///
/// Error notices are only traced: the failing command returns the error
/// and `main` prints it once, with its field messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => output::print_success(&notice.message),
            NoticeLevel::Info => output::print_info(&notice.message),
            NoticeLevel::Warning => output::print_warning(&notice.message),
            NoticeLevel::Error => debug!(message = %notice.message, "Error notice"),
        }
    }

    fn on_unauthorized(&self) {
        output::print_warning("Session rejected; refresh the session cookie (api.session_cookie)");
    }

    fn on_forbidden(&self) {
        output::print_warning("The session is not allowed to perform this action");
    }
}
