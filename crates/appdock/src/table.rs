use appdock_core::ApplicationInstance;

pub struct TableFormatter {
    id_width: usize,
    app_width: usize,
    kind_width: usize,
    state_width: usize,
    pid_width: usize,
    window_width: usize,
    started_width: usize,
}

impl TableFormatter {
    pub fn new(instances: &[ApplicationInstance]) -> Self {
        let app_width = instances
            .iter()
            .map(|i| i.descriptor.display_name.len())
            .max()
            .unwrap_or(16)
            .clamp(3, 30);

        Self {
            // Instance ids are UUIDs; the short prefix is enough to
            // disambiguate interactively.
            id_width: 8,
            app_width,
            kind_width: 15,
            state_width: 14,
            pid_width: 7,
            window_width: 28,
            started_width: 19,
        }
    }

    pub fn print_table(&self, instances: &[ApplicationInstance]) {
        self.print_header();
        for instance in instances {
            self.print_row(instance);
        }
        self.print_footer();
    }

    fn print_header(&self) {
        println!("{}", self.top_border());
        println!("{}", self.header_row());
        println!("{}", self.separator());
    }

    fn print_footer(&self) {
        println!("{}", self.bottom_border());
    }

    fn print_row(&self, instance: &ApplicationInstance) {
        let pid_display = if instance.pid == 0 {
            "-".to_string()
        } else {
            instance.pid.to_string()
        };
        let window_display = instance
            .window
            .as_ref()
            .map(|w| w.title.clone())
            .unwrap_or_else(|| "-".to_string());
        let started = instance.started_at.format("%Y-%m-%d %H:%M:%S").to_string();

        println!(
            "│ {:<width_id$} │ {:<width_app$} │ {:<width_kind$} │ {:<width_state$} │ {:<width_pid$} │ {:<width_window$} │ {:<width_started$} │",
            truncate(&instance.id, self.id_width),
            truncate(&instance.descriptor.display_name, self.app_width),
            truncate(instance.descriptor.kind.as_str(), self.kind_width),
            truncate(instance.state.as_str(), self.state_width),
            truncate(&pid_display, self.pid_width),
            truncate(&window_display, self.window_width),
            truncate(&started, self.started_width),
            width_id = self.id_width,
            width_app = self.app_width,
            width_kind = self.kind_width,
            width_state = self.state_width,
            width_pid = self.pid_width,
            width_window = self.window_width,
            width_started = self.started_width,
        );
    }

    fn top_border(&self) -> String {
        format!(
            "┌{}┬{}┬{}┬{}┬{}┬{}┬{}┐",
            "─".repeat(self.id_width + 2),
            "─".repeat(self.app_width + 2),
            "─".repeat(self.kind_width + 2),
            "─".repeat(self.state_width + 2),
            "─".repeat(self.pid_width + 2),
            "─".repeat(self.window_width + 2),
            "─".repeat(self.started_width + 2),
        )
    }

    fn header_row(&self) -> String {
        format!(
            "│ {:<width_id$} │ {:<width_app$} │ {:<width_kind$} │ {:<width_state$} │ {:<width_pid$} │ {:<width_window$} │ {:<width_started$} │",
            "Id",
            "App",
            "Kind",
            "State",
            "PID",
            "Window",
            "Started",
            width_id = self.id_width,
            width_app = self.app_width,
            width_kind = self.kind_width,
            width_state = self.state_width,
            width_pid = self.pid_width,
            width_window = self.window_width,
            width_started = self.started_width,
        )
    }

    fn separator(&self) -> String {
        format!(
            "├{}┼{}┼{}┼{}┼{}┼{}┼{}┤",
            "─".repeat(self.id_width + 2),
            "─".repeat(self.app_width + 2),
            "─".repeat(self.kind_width + 2),
            "─".repeat(self.state_width + 2),
            "─".repeat(self.pid_width + 2),
            "─".repeat(self.window_width + 2),
            "─".repeat(self.started_width + 2),
        )
    }

    fn bottom_border(&self) -> String {
        format!(
            "└{}┴{}┴{}┴{}┴{}┴{}┴{}┘",
            "─".repeat(self.id_width + 2),
            "─".repeat(self.app_width + 2),
            "─".repeat(self.kind_width + 2),
            "─".repeat(self.state_width + 2),
            "─".repeat(self.pid_width + 2),
            "─".repeat(self.window_width + 2),
            "─".repeat(self.started_width + 2),
        )
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings.
fn truncate(s: &str, max_width: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        chars[..max_width].iter().collect()
    } else {
        let truncated: String = chars[..max_width - 3].iter().collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("a-very-long-title", 10), "a-very-...");
    }

    #[test]
    fn test_truncate_tiny_width() {
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_truncate_utf8() {
        assert_eq!(truncate("日本語のタイトルです", 6), "日本語...");
    }
}
