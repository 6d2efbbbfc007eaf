//! Terminal rendering surface.
//!
//! `TerminalHost` keeps the last state the sheet pushed to it and can draw
//! that state as a text panel. With `echo` on, every host call is also
//! printed as it happens.

use colored::Colorize;
use paysheet_lib::gesture::DragFrame;
use paysheet_lib::{MethodDisplay, SheetHost};

/// Width of the drawn panel, in columns.
const PANEL_WIDTH: usize = 44;

/// [`SheetHost`] that renders to text.
#[derive(Debug, Clone)]
pub struct TerminalHost {
    panel_height: f64,
    echo: bool,
    transcript: Vec<String>,
    visible: bool,
    scroll_locked: bool,
    drag: Option<DragFrame>,
    amount: String,
    header: String,
    methods: Vec<MethodDisplay>,
    selected: Option<usize>,
    password: (bool, usize, usize),
    swipe_enabled: bool,
    overlay_dismiss: bool,
}

impl TerminalHost {
    pub fn new(panel_height: f64) -> Self {
        Self {
            panel_height,
            echo: false,
            transcript: Vec::new(),
            visible: false,
            scroll_locked: false,
            drag: None,
            amount: String::new(),
            header: String::new(),
            methods: Vec::new(),
            selected: None,
            password: (false, 0, 0),
            swipe_enabled: false,
            overlay_dismiss: false,
        }
    }

    /// Print host calls as they happen.
    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    /// Every host call so far, one line each.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn drag_frame(&self) -> Option<DragFrame> {
        self.drag
    }

    pub fn methods(&self) -> &[MethodDisplay] {
        &self.methods
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn swipe_enabled(&self) -> bool {
        self.swipe_enabled
    }

    pub fn overlay_dismiss(&self) -> bool {
        self.overlay_dismiss
    }

    fn note(&mut self, line: String) {
        if self.echo {
            println!("  {} {}", "·".dimmed(), line.dimmed());
        }
        self.transcript.push(line);
    }

    /// Draw the sheet as it currently looks.
    pub fn render(&self) -> String {
        let rule = "─".repeat(PANEL_WIDTH);
        let mut out = Vec::new();

        out.push(format!("╭{}╮", rule));
        if self.swipe_enabled {
            out.push(row(&center("━━━━", PANEL_WIDTH)));
        }
        out.push(row(&center(&self.header, PANEL_WIDTH)));
        out.push(row(&center(&format!("¥ {}", self.amount), PANEL_WIDTH)));
        out.push(format!("├{}┤", rule));

        for (index, method) in self.methods.iter().enumerate() {
            let mark = if self.selected == Some(index) { "●" } else { "○" };
            out.push(row(&format!(" {} {} {}", mark, method.icon, method.title)));
            if !method.subtitle.is_empty() {
                out.push(row(&format!("     {}", method.subtitle)));
            }
        }
        out.push(format!("├{}┤", rule));

        let (enabled, length, filled) = self.password;
        if enabled {
            let dots: String = (0..length)
                .map(|i| if i < filled { "● " } else { "○ " })
                .collect();
            out.push(row(&center(dots.trim_end(), PANEL_WIDTH)));
        } else {
            out.push(row(&center("[ 取消 ]   [ 确认支付 ]", PANEL_WIDTH)));
        }
        out.push(format!("╰{}╯", rule));

        if let Some(frame) = self.drag {
            out.push(format!(
                "  dragged {:.0}px, backdrop {:.2}",
                frame.offset, frame.backdrop_opacity
            ));
        }
        out.join("\n")
    }
}

fn row(content: &str) -> String {
    let width = content.chars().count();
    let pad = PANEL_WIDTH.saturating_sub(width);
    format!("│{}{}│", content, " ".repeat(pad))
}

fn center(content: &str, width: usize) -> String {
    let len = content.chars().count();
    let left = width.saturating_sub(len) / 2;
    format!("{}{}", " ".repeat(left), content)
}

impl SheetHost for TerminalHost {
    fn panel_height(&self) -> f64 {
        self.panel_height
    }

    fn lock_scroll(&mut self) {
        self.scroll_locked = true;
        self.note("scroll locked".into());
    }

    fn unlock_scroll(&mut self) {
        self.scroll_locked = false;
        self.note("scroll unlocked".into());
    }

    fn schedule_show(&mut self) {
        self.visible = true;
        self.note("sheet shown".into());
    }

    fn hide(&mut self) {
        self.visible = false;
        self.note("sheet hidden".into());
    }

    fn set_transitions_enabled(&mut self, enabled: bool) {
        self.note(format!(
            "transitions {}",
            if enabled { "restored" } else { "suspended" }
        ));
    }

    fn apply_drag_frame(&mut self, frame: DragFrame) {
        self.drag = Some(frame);
        self.note(format!(
            "offset {:.1}px, backdrop {:.2}",
            frame.offset, frame.backdrop_opacity
        ));
    }

    fn clear_drag_frame(&mut self) {
        self.drag = None;
    }

    fn render_amount(&mut self, amount: &str) {
        self.amount = amount.to_string();
    }

    fn render_header(&mut self, title: &str) {
        self.header = title.to_string();
    }

    fn render_methods(&mut self, methods: &[MethodDisplay], selected: Option<usize>) {
        self.methods = methods.to_vec();
        self.selected = selected;
    }

    fn render_password(&mut self, enabled: bool, length: usize, filled: usize) {
        self.password = (enabled, length, filled);
    }

    fn set_swipe_enabled(&mut self, enabled: bool) {
        self.swipe_enabled = enabled;
    }

    fn set_overlay_dismiss(&mut self, enabled: bool) {
        self.overlay_dismiss = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paysheet_lib::PaymentSheet;

    #[test]
    fn test_render_shows_selection_and_amount() {
        let mut sheet = PaymentSheet::new(TerminalHost::new(400.0));
        sheet.open(Some(18.0));
        sheet.select_method(1);
        let text = sheet.host().render();
        assert!(text.contains("¥ 18.00"));
        assert!(text.contains("● 🅰 Alipay"));
        assert!(text.contains("○ 💬 WeChat Pay"));
        assert!(text.contains("确认支付"));
    }

    #[test]
    fn test_render_password_dots() {
        let mut sheet = PaymentSheet::new(TerminalHost::new(400.0));
        sheet.set_enable_password(true);
        sheet.set_password_length(4);
        sheet.open(None);
        sheet.press_digit('1');
        assert!(sheet.host().render().contains("● ○ ○ ○"));
    }

    #[test]
    fn test_transcript_records_lifecycle() {
        let mut sheet = PaymentSheet::new(TerminalHost::new(400.0));
        sheet.open(None);
        sheet.close();
        let transcript = sheet.host().transcript();
        assert_eq!(transcript.first().map(String::as_str), Some("scroll locked"));
        assert_eq!(transcript.last().map(String::as_str), Some("sheet hidden"));
        assert!(!sheet.host().is_visible());
    }
}
