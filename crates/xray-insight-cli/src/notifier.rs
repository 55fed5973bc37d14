//! Terminal notices

use crossterm::style::{style, Stylize};
use tracing::debug;

use xray_insight_core::{Notice, NoticeKind, Notifier};

/// Prints notices to the terminal as they arrive
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    colored: bool,
}

impl ConsoleNotifier {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    /// One line of text for a notice, without styling
    pub fn render(notice: &Notice) -> String {
        match &notice.title {
            Some(title) => format!("{}: {}", title, notice.message),
            None => notice.message.clone(),
        }
    }

    fn marker(&self, kind: NoticeKind) -> String {
        let symbol = match kind {
            NoticeKind::Success => "[ok]",
            NoticeKind::Error => "[error]",
            NoticeKind::Info => "[info]",
        };
        if !self.colored {
            return symbol.to_string();
        }
        let styled = style(symbol);
        match kind {
            NoticeKind::Success => styled.green(),
            NoticeKind::Error => styled.red(),
            NoticeKind::Info => styled.cyan(),
        }
        .to_string()
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notice: &Notice) {
        debug!(kind = %notice.kind, "Notice");
        let line = format!("{} {}", self.marker(notice.kind), Self::render(notice));
        match notice.kind {
            NoticeKind::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}
