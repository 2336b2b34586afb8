use crate::model::{LatencyReport, Protocol};

pub struct UiState {
    /// Series currently drawn, always kept in `Protocol::ALL` order.
    pub visible: Vec<Protocol>,
    pub show_help: bool,
    pub info: String,
}

impl UiState {
    pub fn new(report: &LatencyReport) -> Self {
        let mut visible = report.plotted.clone();
        visible.sort();
        visible.dedup();
        Self {
            visible,
            show_help: false,
            info: String::new(),
        }
    }

    pub fn is_visible(&self, protocol: Protocol) -> bool {
        self.visible.contains(&protocol)
    }

    pub fn toggle(&mut self, protocol: Protocol) {
        if let Some(pos) = self.visible.iter().position(|p| *p == protocol) {
            self.visible.remove(pos);
            self.info = format!("{protocol} hidden");
        } else {
            self.visible.push(protocol);
            self.visible.sort();
            self.info = format!("{protocol} shown");
        }
        if self.visible.is_empty() {
            self.info = "No series visible (1/2/3 to show)".into();
        }
    }
}
