//! Top-level view selection. The selection is never persisted.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Files,
    Management,
}

impl View {
    pub const ALL: [View; 3] = [View::Dashboard, View::Files, View::Management];

    pub fn label(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Files => "Files",
            View::Management => "Management",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewRouter {
    current: View,
}

impl ViewRouter {
    pub fn current(&self) -> View {
        self.current
    }

    pub fn select(&mut self, view: View) {
        if self.current != view {
            tracing::debug!(from = ?self.current, to = ?view, "switching view");
        }
        self.current = view;
    }

    pub fn is_active(&self, view: View) -> bool {
        self.current == view
    }
}
