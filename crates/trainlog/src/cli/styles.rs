//! Terminal styles. `console` drops the escape codes on its own when the
//! stream is not a terminal or `NO_COLOR` is set.

use console::Style;
use trainlogapp::commands::MessageLevel;

pub struct Theme {
    pub title: Style,
    pub muted: Style,
    pub label: Style,
    pub patched: Style,
    pub success: Style,
    pub warning: Style,
    pub info: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::new().bold(),
            muted: Style::new().dim(),
            label: Style::new().cyan(),
            patched: Style::new().yellow(),
            success: Style::new().green(),
            warning: Style::new().yellow().bold(),
            info: Style::new(),
        }
    }
}

impl Theme {
    pub fn message(&self, level: &MessageLevel) -> &Style {
        match level {
            MessageLevel::Info => &self.info,
            MessageLevel::Success => &self.success,
            MessageLevel::Warning => &self.warning,
        }
    }
}
