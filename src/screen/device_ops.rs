// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Device status reports, device attributes, bell, and OSC-driven state
//! (title, icon name, hyperlinks).
//!
//! Anything that must reach the child's stdin (DSR and DA replies) is queued
//! as [`ScreenEvent::Response`]; the process driver drains the queue after
//! each feed and writes the payloads to the backend.

use super::{Screen, ScreenEvent};

impl Screen {
    /// BEL.
    pub fn bell(&mut self) { self.push_event(ScreenEvent::Bell); }

    /// DSR (`CSI n n`). `5` asks for operating status, `6` for the cursor
    /// position (1-based, viewport-relative).
    pub fn report_device_status(&mut self, request: usize) {
        match request {
            5 => self.push_event(ScreenEvent::Response("\x1b[0n".into())),
            6 => {
                let row = self.cursor.y - self.line_offset() + 1;
                let column = self.cursor.x + 1;
                self.push_event(ScreenEvent::Response(format!("\x1b[{row};{column}R")));
            }
            _ => {
                tracing::warn!("DSR {request}: unsupported status report request");
            }
        }
    }

    /// DA (`CSI c`).
    pub fn report_device_attributes(&mut self) {
        self.push_event(ScreenEvent::Response("\x1b[>84;0;0c".into()));
    }

    /// OSC 2 (and half of OSC 0).
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.push_event(ScreenEvent::TitleChanged(title.to_string()));
    }

    /// OSC 1 (and the other half of OSC 0).
    pub fn set_icon_name(&mut self, name: &str) {
        self.icon_name = name.to_string();
        self.push_event(ScreenEvent::IconNameChanged(name.to_string()));
    }

    /// OSC 8.
    pub fn set_hyperlink(&mut self, uri: &str) {
        self.push_event(ScreenEvent::Hyperlink { uri: uri.to_string() });
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn dsr_six_reports_the_viewport_relative_cursor() {
        let mut screen = Screen::new(24, 80);
        screen.cursor_position(Some(3), Some(7));
        screen.report_device_status(6);
        assert_eq!(
            screen.take_events(),
            vec![ScreenEvent::Response("\x1b[3;7R".into())]
        );
    }

    #[test]
    fn dsr_six_accounts_for_scrollback() {
        let mut screen = Screen::new(2, 10);
        for _ in 0..9 {
            screen.linefeed();
        }
        // Cursor at absolute row 9, viewport starts at row 8.
        screen.report_device_status(6);
        assert_eq!(
            screen.take_events(),
            vec![ScreenEvent::Response("\x1b[2;1R".into())]
        );
    }

    #[test]
    fn device_attributes_identify_as_vt() {
        let mut screen = Screen::new(24, 80);
        screen.report_device_attributes();
        assert_eq!(
            screen.take_events(),
            vec![ScreenEvent::Response("\x1b[>84;0;0c".into())]
        );
    }

    #[test]
    fn title_and_bell_are_queued_once() {
        let mut screen = Screen::new(24, 80);
        screen.bell();
        screen.set_title("vim");
        assert_eq!(screen.title, "vim");
        let events = screen.take_events();
        assert_eq!(
            events,
            vec![ScreenEvent::Bell, ScreenEvent::TitleChanged("vim".into())]
        );
        assert!(screen.take_events().is_empty());
    }
}
