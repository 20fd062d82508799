//! Input processing: event polling, layer resolution, global handler, pane dispatch.

use std::time::{Duration, Instant};

use super::AppRuntime;
use crate::global_actions::{
    handle_global_action, report_port_changes, sync_midi_state, sync_pane_layer, GlobalResult,
};
use crate::ui::layout_helpers::split_bottom;
use crate::ui::{Action, AppEvent, InputSource, LayerResult};

/// Events handled per loop iteration before ticking and rendering.
const MAX_EVENTS_PER_FRAME: u8 = 16;
/// How often the MIDI port list is rescanned for plugged or removed devices.
const PORT_SCAN_INTERVAL: Duration = Duration::from_secs(2);

impl AppRuntime {
    /// Process input events. Returns true if the app should quit.
    pub(crate) fn process_events(
        &mut self,
        backend: &mut crate::ui::RatatuiBackend,
    ) -> std::io::Result<bool> {
        let mut events_processed = 0u8;

        loop {
            let timeout = if events_processed == 0 {
                Duration::from_millis(2)
            } else {
                Duration::ZERO
            };
            let Some(app_event) = backend.poll_event(timeout) else {
                break;
            };
            events_processed += 1;

            let pane_action = match app_event {
                AppEvent::Resize(_, _) => {
                    self.render_needed = true;
                    Action::None
                }
                AppEvent::Mouse(mouse_event) => {
                    let (pane_area, _) = split_bottom(self.last_area, 1);
                    self.panes
                        .active_mut()
                        .handle_mouse(&mouse_event, pane_area, &self.state)
                }
                AppEvent::KeyRelease(event) => {
                    if self.layer_stack.has_layer("text_edit") {
                        Action::None
                    } else {
                        self.panes.active_mut().handle_key_release(&event, &self.state)
                    }
                }
                AppEvent::Key(event) => match self.layer_stack.resolve(&event) {
                    LayerResult::Action(action) => {
                        match handle_global_action(action, &self.state, &mut self.panes, &mut self.layer_stack) {
                            GlobalResult::Quit => return Ok(true),
                            GlobalResult::Handled => {
                                self.render_needed = true;
                                Action::None
                            }
                            GlobalResult::Dispatch(actions) => {
                                for action in &actions {
                                    if self.dispatch(action) {
                                        return Ok(true);
                                    }
                                }
                                Action::None
                            }
                            GlobalResult::NotHandled => {
                                self.panes.active_mut().handle_action(action, &event, &self.state)
                            }
                        }
                    }
                    LayerResult::Blocked | LayerResult::Unresolved => {
                        self.panes.active_mut().handle_raw_input(&event, &self.state)
                    }
                },
            };

            if self.handle_pane_action(pane_action) {
                return Ok(true);
            }

            if events_processed >= MAX_EVENTS_PER_FRAME {
                break;
            }
        }
        if events_processed > 0 {
            self.render_needed = true;
        }

        Ok(false)
    }

    /// Apply a pane's action: layer changes and navigation here, the rest
    /// through dispatch. Returns true to quit.
    fn handle_pane_action(&mut self, action: Action) -> bool {
        match &action {
            Action::PushLayer(name) => self.layer_stack.push(*name),
            Action::PopLayer(name) => self.layer_stack.pop(*name),
            Action::Nav(nav) => {
                let releases = self.panes.active_mut().release_all();
                for release in &releases {
                    self.dispatch(release);
                }
                self.panes.process_nav(*nav, &self.state);
            }
            _ => {}
        }

        let quit = self.dispatch(&action);
        sync_pane_layer(&mut self.panes, &mut self.layer_stack);
        quit
    }

    /// Process time-based updates: key releases from timeouts and MIDI
    /// port rescans.
    pub(crate) fn process_tick(&mut self) {
        let tick_actions = self.panes.active_mut().tick(&self.state);
        for action in &tick_actions {
            self.dispatch(action);
        }

        if self.last_port_scan.elapsed() >= PORT_SCAN_INTERVAL {
            self.last_port_scan = Instant::now();
            let changes = self.midi_input.rescan_ports();
            if !changes.is_empty() {
                report_port_changes(&changes, &mut self.status_bar);
                sync_midi_state(&mut self.state, &self.midi_input);
                self.panes.sync_all(&self.state);
                self.render_needed = true;
            }
        }
    }
}
