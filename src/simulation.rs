//! Frame loop and lifecycle.
//!
//! A [`Simulation`] owns every piece of mutable state (parameters, field
//! buffers, mask, command queue) inside one context object. The host
//! drives it with one [`Simulation::tick`] per display refresh; input
//! delivered between ticks is queued and applied at the start of the next
//! tick, before integration reads the current buffer.

use crate::compute::{self, FieldStats, GridState, Seeder, ShapeMask, ShapeMaskBuilder};
use crate::interaction::{
    self, Command, CommandQueue, InputEvent, InteractionController, QueueFull, SurfaceRect,
};
use crate::render::{Overlay, Renderer, Surface};
use crate::schema::{ConfigError, HORSE_PATH, SimulationConfig, SimulationParams};

/// Lifecycle state of a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created, no buffers allocated.
    Idle,
    /// Ticks integrate and render; input is accepted.
    Running,
    /// Ticks are ignored; all buffers retained.
    Paused,
    /// Buffers released. Terminal.
    Destroyed,
}

/// Invalid lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("simulation already started")]
    AlreadyStarted,
    #[error("simulation has been destroyed")]
    Destroyed,
}

/// Everything allocated by `start` and released by `destroy`.
struct SimulationContext {
    params: SimulationParams,
    grid: GridState,
    mask: ShapeMask,
    seeder: Seeder,
    renderer: Renderer,
    commands: CommandQueue,
    controller: InteractionController,
}

/// Interactive Gray-Scott simulation biased toward a silhouette.
pub struct Simulation {
    config: SimulationConfig,
    state: Lifecycle,
    surface_size: (usize, usize),
    bounds: SurfaceRect,
    context: Option<SimulationContext>,
}

impl Simulation {
    /// Create an idle simulation from a validated configuration.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: Lifecycle::Idle,
            surface_size: (0, 0),
            bounds: SurfaceRect::sized(0, 0),
            context: None,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    /// Bind to a drawing target.
    pub fn init(&mut self, surface: &dyn Surface) {
        if self.state != Lifecycle::Idle {
            log::warn!("init ignored in state {:?}", self.state);
            return;
        }
        self.bind(surface.size());
        log::info!(
            "simulation bound to {}x{} surface",
            self.surface_size.0,
            self.surface_size.1
        );
    }

    /// Allocate the grid, build the mask, seed and begin running.
    pub fn start(&mut self, surface: &dyn Surface) -> Result<(), LifecycleError> {
        match self.state {
            Lifecycle::Running | Lifecycle::Paused => return Err(LifecycleError::AlreadyStarted),
            Lifecycle::Destroyed => return Err(LifecycleError::Destroyed),
            Lifecycle::Idle => {}
        }

        self.bind(surface.size());
        let mut seeder = Seeder::from_config(&self.config.seeding);
        let (grid, mask) = build_field(&self.config, self.surface_size, &mut seeder);
        log::info!(
            "simulation started: {}x{} grid, {} mask cells",
            grid.width,
            grid.height,
            mask.count()
        );

        self.context = Some(SimulationContext {
            params: SimulationParams::from_config(&self.config),
            grid,
            mask,
            seeder,
            renderer: Renderer::new(self.config.render.glow_pulse_speed),
            commands: CommandQueue::new(self.config.interaction.command_capacity),
            controller: InteractionController::new(self.config.interaction.clone()),
        });
        self.state = Lifecycle::Running;
        Ok(())
    }

    /// Stop integrating while keeping every buffer.
    pub fn pause(&mut self) {
        if self.state == Lifecycle::Running {
            self.state = Lifecycle::Paused;
            log::info!("simulation paused");
        }
    }

    /// Continue after [`Simulation::pause`] without reallocating.
    pub fn resume(&mut self) {
        if self.state == Lifecycle::Paused {
            self.state = Lifecycle::Running;
            log::info!("simulation resumed");
        }
    }

    /// Release all buffers and stop accepting input.
    pub fn destroy(&mut self) {
        if self.state == Lifecycle::Destroyed {
            return;
        }
        self.context = None;
        self.state = Lifecycle::Destroyed;
        log::info!("simulation destroyed");
    }

    /// Rebind to a new surface size, rebuilding mask and grid and reseeding.
    ///
    /// Pending commands and explore state are discarded.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.state == Lifecycle::Destroyed {
            return;
        }
        self.bind((width, height));

        let Some(ctx) = self.context.as_mut() else {
            return;
        };

        let (grid, mask) = build_field(&self.config, self.surface_size, &mut ctx.seeder);
        log::info!(
            "simulation resized to {}x{} surface, {}x{} grid",
            width,
            height,
            grid.width,
            grid.height
        );
        ctx.grid = grid;
        ctx.mask = mask;
        ctx.params.restore_defaults();
        ctx.controller.clear_explore();
        ctx.commands.clear();
    }

    /// Placement of the surface in client coordinates, used to map input.
    pub fn set_surface_bounds(&mut self, bounds: SurfaceRect) {
        self.bounds = bounds;
    }

    pub fn surface_bounds(&self) -> SurfaceRect {
        self.bounds
    }

    /// Translate an input event into queued commands.
    ///
    /// Only releases are honoured while paused, so a press never outlives
    /// its button. Everything else is ignored unless running.
    pub fn handle_input(&mut self, event: InputEvent) {
        let Some(ctx) = self.context.as_mut() else {
            return;
        };
        match (self.state, event) {
            (Lifecycle::Running, _) => ctx.controller.handle(
                event,
                &self.bounds,
                ctx.grid.width,
                ctx.grid.height,
                &mut ctx.commands,
            ),
            (Lifecycle::Paused, InputEvent::PointerUp | InputEvent::TouchEnd) => {
                ctx.controller.release()
            }
            _ => {}
        }
    }

    /// Queue a command for the next tick.
    ///
    /// Commands pushed before `start` or after `destroy` are discarded.
    pub fn push_command(&mut self, command: Command) -> Result<(), QueueFull> {
        match self.context.as_mut() {
            Some(ctx) => ctx.commands.push(command),
            None => {
                log::debug!("no simulation context, dropped {command:?}");
                Ok(())
            }
        }
    }

    /// Run one frame: apply queued commands, integrate, render, draw overlay.
    ///
    /// `timestamp_ms` is host wall-clock time and drives only the glow.
    /// Returns `false` without doing anything unless running.
    pub fn tick(&mut self, timestamp_ms: f64, surface: &mut dyn Surface) -> bool {
        if self.state != Lifecycle::Running {
            return false;
        }
        let Some(ctx) = self.context.as_mut() else {
            return false;
        };

        for command in ctx.commands.drain() {
            match command {
                Command::Dose { x, y, radius } => interaction::dose(&mut ctx.grid, x, y, radius),
                Command::Explore { nx, ny } => {
                    ctx.params.explore(nx, ny, &self.config.interaction)
                }
                Command::EndExplore => ctx.params.restore_defaults(),
                Command::Reset => {
                    ctx.seeder
                        .seed(&mut ctx.grid, &ctx.mask, &self.config.seeding);
                    ctx.params.restore_defaults();
                    ctx.controller.clear_explore();
                    log::info!("simulation reset");
                }
            }
        }

        compute::run_frame(&mut ctx.grid, &ctx.params);

        let (width, height) = surface.size();
        let time = (timestamp_ms * 0.001) as f32;
        let frame = ctx.renderer.render(&ctx.grid, time, width, height);
        surface.present(frame);
        surface.draw_overlay(&Overlay::from_params(&ctx.params));
        true
    }

    pub fn params(&self) -> Option<&SimulationParams> {
        self.context.as_ref().map(|ctx| &ctx.params)
    }

    pub fn grid(&self) -> Option<&GridState> {
        self.context.as_ref().map(|ctx| &ctx.grid)
    }

    pub fn mask(&self) -> Option<&ShapeMask> {
        self.context.as_ref().map(|ctx| &ctx.mask)
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.params().map(Overlay::from_params)
    }

    pub fn stats(&self) -> Option<FieldStats> {
        self.grid().map(FieldStats::from_grid)
    }

    fn bind(&mut self, (width, height): (usize, usize)) {
        self.surface_size = (width, height);
        self.bounds.width = width as f32;
        self.bounds.height = height as f32;
    }
}

/// Build a seeded grid and its mask for a surface size.
fn build_field(
    config: &SimulationConfig,
    (surface_width, surface_height): (usize, usize),
    seeder: &mut Seeder,
) -> (GridState, ShapeMask) {
    let (width, height) = config.grid_dimensions(surface_width, surface_height);
    let path = config.mask.silhouette.as_deref().unwrap_or(HORSE_PATH);
    let mask = ShapeMaskBuilder::from_config(&config.mask).build_from_path_data(path, width, height);

    let mut grid = GridState::new(width, height);
    seeder.seed(&mut grid, &mask, &config.seeding);
    (grid, mask)
}
