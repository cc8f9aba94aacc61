use ratatui::layout::Rect;

/// Where a mouse press landed relative to the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelHit {
    Handle,
    Inside,
    Outside,
}

/// What a mouse press did to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Opened,
    Closed,
    /// An open dropdown was dismissed by a press outside it; the caller must
    /// cancel the in-progress selection.
    Dismissed,
    Ignored,
}

/// Dropdown host for the chapter picker: open/closed state plus the screen
/// rectangles recorded during render. Mouse capture itself is acquired in
/// `tui::init` and released in `tui::restore` on every exit path, so while
/// the app runs every press in the terminal reaches `on_mouse_down`.
#[derive(Debug, Default)]
pub struct Panel {
    pub open: bool,
    pub handle_area: Option<Rect>,
    pub dropdown_area: Option<Rect>,
}

fn contains(area: Option<Rect>, column: u16, row: u16) -> bool {
    area.is_some_and(|a| {
        column >= a.x && column < a.x + a.width && row >= a.y && row < a.y + a.height
    })
}

impl Panel {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.dropdown_area = None;
    }

    pub fn hit(&self, column: u16, row: u16) -> PanelHit {
        if contains(self.handle_area, column, row) {
            PanelHit::Handle
        } else if self.open && contains(self.dropdown_area, column, row) {
            PanelHit::Inside
        } else {
            PanelHit::Outside
        }
    }

    /// Route a global mouse press. Presses on the handle toggle; presses
    /// inside an open dropdown are left for the item hit lists; presses
    /// anywhere else dismiss an open dropdown.
    pub fn on_mouse_down(&mut self, column: u16, row: u16) -> PanelAction {
        match self.hit(column, row) {
            PanelHit::Handle => {
                if self.open {
                    self.close();
                    PanelAction::Closed
                } else {
                    self.open();
                    PanelAction::Opened
                }
            }
            PanelHit::Inside => PanelAction::Ignored,
            PanelHit::Outside => {
                if self.open {
                    self.close();
                    PanelAction::Dismissed
                } else {
                    PanelAction::Ignored
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> Panel {
        Panel {
            open: false,
            handle_area: Some(Rect::new(0, 0, 10, 1)),
            dropdown_area: Some(Rect::new(0, 1, 30, 10)),
        }
    }

    #[test]
    fn test_handle_press_toggles() {
        let mut panel = panel();
        assert_eq!(panel.on_mouse_down(5, 0), PanelAction::Opened);
        assert!(panel.open);
        panel.dropdown_area = Some(Rect::new(0, 1, 30, 10));
        assert_eq!(panel.on_mouse_down(5, 0), PanelAction::Closed);
        assert!(!panel.open);
    }

    #[test]
    fn test_outside_press_dismisses_only_when_open() {
        let mut panel = panel();
        assert_eq!(panel.on_mouse_down(50, 20), PanelAction::Ignored);
        panel.open();
        assert_eq!(panel.on_mouse_down(50, 20), PanelAction::Dismissed);
        assert!(!panel.open);
    }

    #[test]
    fn test_press_inside_dropdown_is_left_to_item_handling() {
        let mut panel = panel();
        panel.open();
        assert_eq!(panel.on_mouse_down(5, 5), PanelAction::Ignored);
        assert!(panel.open);
    }

    #[test]
    fn test_dropdown_area_ignored_while_closed() {
        let panel = panel();
        // Closed panel: the dropdown rectangle is stale and must not swallow
        // the press.
        assert_eq!(panel.hit(5, 5), PanelHit::Outside);
    }

    #[test]
    fn test_close_clears_dropdown_area() {
        let mut panel = panel();
        panel.open();
        panel.close();
        assert!(panel.dropdown_area.is_none());
    }
}
