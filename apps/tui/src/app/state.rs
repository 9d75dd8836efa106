use parajes_core::Selector;

/// Panel receiving the arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Regions,
    Layers,
    Map,
}

impl Focus {
    pub const fn next(self) -> Self {
        match self {
            Self::Regions => Self::Layers,
            Self::Layers => Self::Map,
            Self::Map => Self::Regions,
        }
    }

    pub const fn previous(self) -> Self {
        match self {
            Self::Regions => Self::Map,
            Self::Layers => Self::Regions,
            Self::Map => Self::Layers,
        }
    }

    /// The selector list behind this panel, if it is one.
    pub const fn selector(self) -> Option<Selector> {
        match self {
            Self::Regions => Some(Selector::Region),
            Self::Layers => Some(Selector::Layer),
            Self::Map => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Regions => "Departamentos",
            Self::Layers => "Capas",
            Self::Map => "Mapa",
        }
    }
}

/// Console state that the session does not own: focus and cursors.
///
/// Cursors only move the highlight; a selector value changes when the
/// operator commits it with Enter.
#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub focus: Focus,
    pub region_cursor: usize,
    pub layer_cursor: usize,
    pub feature_cursor: usize,
    pub show_help: bool,
    pub status_message: String,
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            focus: Focus::Regions,
            region_cursor: 0,
            layer_cursor: 0,
            feature_cursor: 0,
            show_help: false,
            status_message: String::new(),
        }
    }

    pub const fn cursor(&self, selector: Selector) -> usize {
        match selector {
            Selector::Region => self.region_cursor,
            Selector::Layer => self.layer_cursor,
        }
    }

    pub fn cursor_mut(&mut self, selector: Selector) -> &mut usize {
        match selector {
            Selector::Region => &mut self.region_cursor,
            Selector::Layer => &mut self.layer_cursor,
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_cycles_both_ways() {
        let mut focus = Focus::Regions;
        for _ in 0..3 {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::Regions);
        assert_eq!(Focus::Regions.previous(), Focus::Map);
        assert_eq!(Focus::Map.selector(), None);
    }

    #[test]
    fn cursors_are_per_selector() {
        let mut app = App::new();
        *app.cursor_mut(Selector::Layer) = 2;
        assert_eq!(app.cursor(Selector::Layer), 2);
        assert_eq!(app.cursor(Selector::Region), 0);
    }
}
