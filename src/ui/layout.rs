//! Layout flags for the shell frame

/// Smallest terminal pane height in rows
pub const MIN_TERMINAL_HEIGHT: u16 = 4;

/// Largest terminal pane height in rows
pub const MAX_TERMINAL_HEIGHT: u16 = 30;

pub const DEFAULT_TERMINAL_HEIGHT: u16 = 10;

/// Terminal pane visibility and size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutState {
    terminal_open: bool,
    terminal_height: u16,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            terminal_open: false,
            terminal_height: DEFAULT_TERMINAL_HEIGHT,
        }
    }
}

impl LayoutState {
    pub fn new(terminal_open: bool, terminal_height: u16) -> Self {
        Self {
            terminal_open,
            terminal_height: clamp_height(terminal_height),
        }
    }

    pub fn is_terminal_open(&self) -> bool {
        self.terminal_open
    }

    pub fn toggle_terminal(&mut self) {
        self.terminal_open = !self.terminal_open;
    }

    pub fn open_terminal(&mut self) {
        self.terminal_open = true;
    }

    pub fn close_terminal(&mut self) {
        self.terminal_open = false;
    }

    pub fn terminal_height(&self) -> u16 {
        self.terminal_height
    }

    /// Grow (positive) or shrink (negative) the pane, staying within bounds
    pub fn resize_terminal(&mut self, delta: i32) {
        let next = (self.terminal_height as i32 + delta)
            .clamp(MIN_TERMINAL_HEIGHT as i32, MAX_TERMINAL_HEIGHT as i32);
        self.terminal_height = next as u16;
    }
}

fn clamp_height(height: u16) -> u16 {
    height.clamp(MIN_TERMINAL_HEIGHT, MAX_TERMINAL_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_flags() {
        let mut layout = LayoutState::default();
        assert!(!layout.is_terminal_open());

        layout.toggle_terminal();
        assert!(layout.is_terminal_open());
        layout.open_terminal();
        assert!(layout.is_terminal_open());
        layout.close_terminal();
        assert!(!layout.is_terminal_open());
    }

    #[test]
    fn test_height_is_clamped() {
        let mut layout = LayoutState::new(true, 200);
        assert_eq!(layout.terminal_height(), MAX_TERMINAL_HEIGHT);

        layout.resize_terminal(-100);
        assert_eq!(layout.terminal_height(), MIN_TERMINAL_HEIGHT);

        layout.resize_terminal(3);
        assert_eq!(layout.terminal_height(), MIN_TERMINAL_HEIGHT + 3);
    }
}
