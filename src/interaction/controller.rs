//! Translation of pointer, touch and keyboard input into commands.

use serde::{Deserialize, Serialize};

use super::{Command, CommandQueue};
use crate::schema::InteractionConfig;

/// Placement of the drawing surface in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    /// Surface anchored at the client origin.
    pub fn sized(width: usize, height: usize) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: width as f32,
            height: height as f32,
        }
    }

    /// Client position as a fraction of the surface size.
    #[inline]
    pub fn normalize(&self, client_x: f32, client_y: f32) -> (f32, f32) {
        (
            (client_x - self.left) / self.width,
            (client_y - self.top) / self.height,
        )
    }

    /// Whether a normalized position lies on the surface.
    #[inline]
    pub fn contains_normalized(nx: f32, ny: f32) -> bool {
        (0.0..=1.0).contains(&nx) && (0.0..=1.0).contains(&ny)
    }

    /// `floor(normalized * grid_dim)` on both axes.
    ///
    /// A degenerate surface maps every position to `(-1, -1)`, outside any grid.
    pub fn to_grid(&self, client_x: f32, client_y: f32, width: usize, height: usize) -> (i64, i64) {
        if !(self.width > 0.0 && self.height > 0.0) {
            return (-1, -1);
        }
        let (nx, ny) = self.normalize(client_x, client_y);
        if !nx.is_finite() || !ny.is_finite() {
            return (-1, -1);
        }
        (
            (nx * width as f32).floor() as i64,
            (ny * height as f32).floor() as i64,
        )
    }
}

/// Raw input in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    /// `explore` reports whether the explore modifier is held.
    PointerMove { x: f32, y: f32, explore: bool },
    PointerUp,
    TouchStart { x: f32, y: f32 },
    TouchMove { x: f32, y: f32 },
    TouchEnd,
    ResetKey,
}

/// Last known pointer position in grid space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerState {
    pub grid_x: i64,
    pub grid_y: i64,
    /// Set between press and release.
    pub active: bool,
    /// Set once the pointer moved while pressed.
    pub dragging: bool,
}

/// Turns input events into queued commands.
#[derive(Debug, Clone)]
pub struct InteractionController {
    config: InteractionConfig,
    pointer: PointerState,
    exploring: bool,
}

impl InteractionController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            pointer: PointerState {
                grid_x: -1,
                grid_y: -1,
                ..Default::default()
            },
            exploring: false,
        }
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn is_exploring(&self) -> bool {
        self.exploring
    }

    /// Forget explore state after a reset restored the default parameters.
    pub fn clear_explore(&mut self) {
        self.exploring = false;
    }

    /// End any press or drag in progress.
    pub fn release(&mut self) {
        self.pointer.active = false;
        self.pointer.dragging = false;
    }

    /// Translate one event. Commands that do not fit the queue are dropped.
    pub fn handle(
        &mut self,
        event: InputEvent,
        rect: &SurfaceRect,
        grid_width: usize,
        grid_height: usize,
        queue: &mut CommandQueue,
    ) {
        let mut emit = |command: Command| {
            if let Err(e) = queue.push(command) {
                log::debug!("{e}");
            }
        };

        match event {
            InputEvent::PointerDown { x, y } | InputEvent::TouchStart { x, y } => {
                let (gx, gy) = rect.to_grid(x, y, grid_width, grid_height);
                self.pointer = PointerState {
                    grid_x: gx,
                    grid_y: gy,
                    active: true,
                    dragging: false,
                };
                emit(Command::Dose {
                    x: gx,
                    y: gy,
                    radius: self.config.drop_radius,
                });
            }
            InputEvent::PointerMove { x, y, explore } => {
                self.track_move(x, y, rect, grid_width, grid_height, &mut emit);
                if explore {
                    // Off-surface positions keep the current explore state.
                    let (nx, ny) = rect.normalize(x, y);
                    if SurfaceRect::contains_normalized(nx, ny) {
                        self.exploring = true;
                        emit(Command::Explore { nx, ny });
                    }
                } else if self.exploring {
                    self.exploring = false;
                    emit(Command::EndExplore);
                }
            }
            InputEvent::TouchMove { x, y } => {
                self.track_move(x, y, rect, grid_width, grid_height, &mut emit);
            }
            InputEvent::PointerUp | InputEvent::TouchEnd => self.release(),
            InputEvent::ResetKey => {
                self.exploring = false;
                emit(Command::Reset);
            }
        }
    }

    fn track_move(
        &mut self,
        x: f32,
        y: f32,
        rect: &SurfaceRect,
        grid_width: usize,
        grid_height: usize,
        emit: &mut impl FnMut(Command),
    ) {
        let (gx, gy) = rect.to_grid(x, y, grid_width, grid_height);
        self.pointer.grid_x = gx;
        self.pointer.grid_y = gy;
        if self.pointer.active {
            self.pointer.dragging = true;
            emit(Command::Dose {
                x: gx,
                y: gy,
                radius: self.config.drag_radius(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (InteractionController, SurfaceRect, CommandQueue) {
        (
            InteractionController::new(InteractionConfig::default()),
            SurfaceRect {
                left: 100.0,
                top: 50.0,
                width: 512.0,
                height: 512.0,
            },
            CommandQueue::new(16),
        )
    }

    #[test]
    fn test_client_to_grid_mapping() {
        let rect = SurfaceRect {
            left: 100.0,
            top: 50.0,
            width: 512.0,
            height: 256.0,
        };
        assert_eq!(rect.to_grid(100.0, 50.0, 256, 256), (0, 0));
        assert_eq!(rect.to_grid(611.0, 305.0, 256, 256), (255, 255));
        assert_eq!(rect.to_grid(99.0, 50.0, 256, 256), (-1, 0));
        assert_eq!(rect.to_grid(356.0, 178.0, 256, 256), (128, 128));
    }

    #[test]
    fn test_press_then_drag_doses() {
        let (mut controller, rect, mut queue) = setup();
        controller.handle(InputEvent::PointerDown { x: 356.0, y: 306.0 }, &rect, 256, 256, &mut queue);
        controller.handle(
            InputEvent::PointerMove { x: 358.0, y: 306.0, explore: false },
            &rect,
            256,
            256,
            &mut queue,
        );
        controller.handle(InputEvent::PointerUp, &rect, 256, 256, &mut queue);
        controller.handle(
            InputEvent::PointerMove { x: 360.0, y: 306.0, explore: false },
            &rect,
            256,
            256,
            &mut queue,
        );

        let commands: Vec<Command> = queue.drain().collect();
        assert_eq!(
            commands,
            vec![
                Command::Dose { x: 128, y: 128, radius: 10 },
                Command::Dose { x: 129, y: 128, radius: 6 },
            ]
        );
        assert!(!controller.pointer().active);
        assert_eq!(controller.pointer().grid_x, 130);
    }

    #[test]
    fn test_explore_toggles_per_event() {
        let (mut controller, rect, mut queue) = setup();
        let moves = [(true, 100.0), (true, 612.0), (false, 300.0), (false, 300.0)];
        for (explore, x) in moves {
            controller.handle(
                InputEvent::PointerMove { x, y: 50.0, explore },
                &rect,
                256,
                256,
                &mut queue,
            );
        }

        let commands: Vec<Command> = queue.drain().collect();
        assert_eq!(
            commands,
            vec![
                Command::Explore { nx: 0.0, ny: 0.0 },
                Command::Explore { nx: 1.0, ny: 0.0 },
                Command::EndExplore,
            ]
        );
        assert!(!controller.is_exploring());
    }

    #[test]
    fn test_touch_doses_without_explore() {
        let (mut controller, rect, mut queue) = setup();
        controller.handle(InputEvent::TouchStart { x: 100.0, y: 50.0 }, &rect, 64, 64, &mut queue);
        controller.handle(InputEvent::TouchMove { x: 108.0, y: 50.0 }, &rect, 64, 64, &mut queue);
        controller.handle(InputEvent::TouchEnd, &rect, 64, 64, &mut queue);

        let commands: Vec<Command> = queue.drain().collect();
        assert_eq!(
            commands,
            vec![
                Command::Dose { x: 0, y: 0, radius: 10 },
                Command::Dose { x: 1, y: 0, radius: 6 },
            ]
        );
    }

    #[test]
    fn test_reset_key_clears_explore() {
        let (mut controller, rect, mut queue) = setup();
        controller.handle(
            InputEvent::PointerMove { x: 200.0, y: 100.0, explore: true },
            &rect,
            256,
            256,
            &mut queue,
        );
        controller.handle(InputEvent::ResetKey, &rect, 256, 256, &mut queue);

        assert!(!controller.is_exploring());
        assert_eq!(queue.drain().last(), Some(Command::Reset));
    }

    #[test]
    fn test_degenerate_surface_maps_outside_grid() {
        let rect = SurfaceRect::sized(0, 0);
        assert_eq!(rect.to_grid(0.0, 0.0, 64, 64), (-1, -1));
        assert_eq!(rect.to_grid(5.0, 3.0, 64, 64), (-1, -1));

        let mut controller = InteractionController::new(InteractionConfig::default());
        let mut queue = CommandQueue::new(4);
        controller.handle(InputEvent::PointerDown { x: 0.0, y: 0.0 }, &rect, 64, 64, &mut queue);
        assert_eq!(
            queue.drain().next(),
            Some(Command::Dose { x: -1, y: -1, radius: 10 })
        );
    }

    #[test]
    fn test_explore_off_surface_emits_nothing() {
        let (mut controller, rect, mut queue) = setup();
        controller.handle(
            InputEvent::PointerMove { x: 50.0, y: 10.0, explore: true },
            &rect,
            256,
            256,
            &mut queue,
        );
        assert!(queue.is_empty());
        assert!(!controller.is_exploring());

        controller.handle(
            InputEvent::PointerMove { x: 356.0, y: 306.0, explore: true },
            &rect,
            256,
            256,
            &mut queue,
        );
        controller.handle(
            InputEvent::PointerMove { x: 900.0, y: 306.0, explore: true },
            &rect,
            256,
            256,
            &mut queue,
        );
        let commands: Vec<Command> = queue.drain().collect();
        assert_eq!(commands, vec![Command::Explore { nx: 0.5, ny: 0.5 }]);
        assert!(controller.is_exploring());
    }

    #[test]
    fn test_full_queue_drops_commands() {
        let mut controller = InteractionController::new(InteractionConfig::default());
        let rect = SurfaceRect::sized(64, 64);
        let mut queue = CommandQueue::new(1);
        controller.handle(InputEvent::PointerDown { x: 1.0, y: 1.0 }, &rect, 64, 64, &mut queue);
        controller.handle(InputEvent::ResetKey, &rect, 64, 64, &mut queue);

        assert_eq!(queue.len(), 1);
        assert!(matches!(queue.drain().next(), Some(Command::Dose { .. })));
    }
}
