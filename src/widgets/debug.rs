use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Paragraph, Widget},
};

#[derive(Default)]
pub struct DebugState {
    pub num_events: usize,
    pub num_frames: usize,
    pub num_key_events: usize,
    pub last_key_event_name: String,
    /// Last action taken (e.g. "next_page") for debugging key handling.
    pub last_action: String,
    pub enabled: bool,
    /// Snapshot of controller state taken by the App just before rendering.
    pub in_flight_details: usize,
    pub expanded_rows: usize,
    pub page_generation: u64,
}

impl DebugState {
    pub fn on_key(&mut self, event: &crossterm::event::KeyEvent) {
        self.num_key_events += 1;
        self.last_key_event_name = format!("{:?}", event.code);
    }
}

impl Widget for &DebugState {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(format!(
            "events={} keys={} last_key={} last_action={} frames={} in_flight={} expanded={} page_gen={}",
            self.num_events,
            self.num_key_events,
            self.last_key_event_name,
            self.last_action,
            self.num_frames,
            self.in_flight_details,
            self.expanded_rows,
            self.page_generation,
        ))
        .render(area, buf);
    }
}
