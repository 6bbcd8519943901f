use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::behavior::{Behaviors, Bounds, TapResponse};
use crate::book::{BookState, PageRequest, PageWindow, Slot, TurnRequest};
use crate::config::{ConfigError, CurlConfig};
use crate::consts::{ANIM_ENTER_DURATION_MS, ANIM_EXIT_DURATION_MS, ANIM_START_TIMEOUT_MS, TAP_Y_DELTA_RATIO};
use crate::drag::{DragDirection, DragEvent};
use crate::flow::{Animation, FlowState};
use crate::geom::Point;
use crate::mesh::{self, Mesh};
use crate::points::AllPoints;
use crate::regime::{Regime, Simulation};
use crate::render;
use crate::scene::{self, Scene};
use crate::synth::{LowerPage, SynthError};
use crate::tight;
use crate::viewport::Viewport;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers and frames for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Draw this page into the slot, then call `page_rendered`.
    RenderPage(PageRequest),
    /// A turn completed or was rejected at the first or last page.
    TurnPage(TurnRequest),
    RenderNeeded,
}

/// Everything the host needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Display polygon in surface pixels.
    pub points: AllPoints,
    pub mesh: Mesh,
    /// `None` until a polygon has been solved; draw the current page flat.
    pub scene: Option<Scene>,
    /// Slot whose texture curls.
    pub curl_slot: Slot,
    /// Slot revealed under the curl.
    pub under_slot: Slot,
    /// `points` are mirrored about the mid line.
    pub upside_down: bool,
    /// The picture changed since the previous frame.
    pub redraw: bool,
    pub actions: Vec<Action>,
}

impl Frame {
    fn idle() -> Self {
        Self {
            points: AllPoints::default(),
            mesh: Mesh::default(),
            scene: None,
            curl_slot: Slot::Current,
            under_slot: Slot::Next,
            upside_down: false,
            redraw: false,
            actions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    None,
    Tracking,
    /// The drag response rejected the gesture; its release is ignored.
    Interrupted,
    /// The finger left the band; later moves and the release are ignored.
    Ended,
}

/// The finger's part of the current gesture.
#[derive(Debug, Clone, Copy, Default)]
struct Gesture {
    phase: Phase,
    initial: Point,
    /// Last move, screen space.
    event: DragEvent,
    started_ms: f64,
    /// A direction was decided for this gesture.
    classified: bool,
}

/// Engine state and logic that does not depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub config: CurlConfig,
    pub viewport: Viewport,
    pub book: BookState,
    pub pages: PageWindow,
    pub behaviors: Behaviors,
    pub flow: FlowState,
    pub sim: Simulation,
    /// Last accepted polygon, screen space, in the solver's orientation.
    pub points: AllPoints,
    gesture: Gesture,
    animation: Animation,
    pending_turn: Option<bool>,
    exit_requested: bool,
    right_to_left: bool,
}

impl EngineCore {
    /// # Errors
    ///
    /// Returns the [`CurlConfig::validate`] error for an out-of-range config.
    pub fn new(config: CurlConfig, viewport: Viewport, book: BookState) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            viewport,
            book,
            pages: PageWindow::default(),
            behaviors: Behaviors::default(),
            flow: FlowState::Idle,
            sim: Simulation::default(),
            points: AllPoints::default(),
            gesture: Gesture::default(),
            animation: Animation::default(),
            pending_turn: None,
            exit_requested: false,
            right_to_left: false,
        })
    }

    /// Ask the host for the pages around the current one.
    pub fn start(&mut self) -> Vec<Action> {
        self.request_pages()
    }

    fn request_pages(&mut self) -> Vec<Action> {
        let mut actions: Vec<Action> = self
            .pages
            .request(self.book.current(), self.book.page_count())
            .into_iter()
            .map(Action::RenderPage)
            .collect();
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Data inputs ---

    /// The host finished drawing `page` into `slot`.
    pub fn page_rendered(&mut self, page: usize, slot: Slot) -> Vec<Action> {
        if !self.pages.page_rendered(page, slot) {
            debug!(page, ?slot, "stale page render ignored");
            return vec![];
        }
        vec![Action::RenderNeeded]
    }

    /// Host-driven page change. Pins the book and refreshes the page slots.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::book::BookError::PageOutOfRange`].
    pub fn set_current_page(&mut self, page: usize) -> Result<Vec<Action>, crate::book::BookError> {
        self.book.set_current(page)?;
        Ok(self.request_pages())
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // --- Queries ---

    #[must_use]
    pub fn flow(&self) -> FlowState {
        self.flow
    }

    #[must_use]
    pub fn regime(&self) -> Regime {
        self.sim.regime
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.book.current()
    }

    #[must_use]
    pub fn is_upside_down(&self) -> bool {
        self.sim.upside_down
    }

    // --- Input events ---

    fn accepts_input(&self, pt: Point) -> bool {
        self.flow == FlowState::Idle
            && self.viewport.drag_band().contains(pt.x)
            && self.pages.is_ready()
            && !self.config.disabled
    }

    fn tap_delta(&self) -> f64 {
        TAP_Y_DELTA_RATIO * self.viewport.height
    }

    fn drag_bounds(&self) -> Bounds {
        Bounds { left_top: self.viewport.origin, right_bottom: self.viewport.corner() }
    }

    pub fn on_tap(&mut self, pt: Point, now_ms: f64) -> Vec<Action> {
        let tap_delta = self.tap_delta();
        let local_y = pt.y - self.viewport.origin.y;
        if !self.accepts_input(pt) || local_y <= tap_delta {
            return vec![];
        }

        let bounds = Bounds {
            left_top: Point::new(self.viewport.origin.x, self.viewport.origin.y + tap_delta),
            right_bottom: self.viewport.corner(),
        };
        let forward = match self.behaviors.tap(&bounds, pt) {
            TapResponse::Forward => true,
            TapResponse::Backward => false,
            TapResponse::Ignore => return vec![],
        };
        if !self.book.can_turn(forward) {
            return vec![Action::TurnPage(self.book.turn(forward))];
        }

        let band_end = self.viewport.drag_band().end;
        let (start, end) = if forward {
            (Point::new(band_end, pt.y), Point::new(-0.5 * band_end, pt.y - tap_delta))
        } else {
            (Point::new(-0.5 * band_end, pt.y - tap_delta), Point::new(band_end, pt.y))
        };

        self.sim = Simulation { f: self.viewport.height - local_y.abs(), ..Simulation::default() };
        self.animation = Animation::new(DragEvent::new(start, end), now_ms, ANIM_ENTER_DURATION_MS + ANIM_EXIT_DURATION_MS);
        self.right_to_left = forward;
        self.pending_turn = Some(forward);
        self.set_flow(FlowState::ExitingAnimation);
        vec![Action::RenderNeeded]
    }

    pub fn on_drag_start(&mut self, pt: Point, now_ms: f64) -> Vec<Action> {
        if !self.accepts_input(pt) {
            self.gesture = Gesture { phase: Phase::Ended, ..Gesture::default() };
            return vec![];
        }

        self.gesture = Gesture {
            phase: Phase::Tracking,
            initial: pt,
            event: DragEvent::new(pt, pt),
            started_ms: now_ms,
            classified: false,
        };
        self.sim = Simulation { f: self.viewport.height - (pt.y - self.viewport.origin.y).abs(), ..Simulation::default() };
        vec![]
    }

    pub fn on_drag(&mut self, pt: Point, now_ms: f64) -> Vec<Action> {
        if self.gesture.phase != Phase::Tracking || !self.pages.is_ready() || self.config.disabled {
            return vec![];
        }

        self.gesture.event = DragEvent::new(self.gesture.event.current, pt);

        if !self.viewport.drag_band().contains(pt.x) {
            debug!(x = pt.x, "drag left the band");
            let actions = self.release(now_ms, true);
            self.gesture.phase = Phase::Ended;
            return actions;
        }

        if self.flow == FlowState::Idle && now_ms - self.gesture.started_ms > ANIM_START_TIMEOUT_MS {
            self.engage(pt, now_ms);
        }

        if self.flow == FlowState::Draggable && self.sim.regime == Regime::Tight {
            let event = self.sim.orient(self.gesture.event, &self.viewport);
            self.sim.theta = tight::drag_theta(&self.viewport, self.sim.f, self.sim.theta, &event);
        }

        if self.flow == FlowState::Idle { vec![] } else { vec![Action::RenderNeeded] }
    }

    /// Decide the drag's direction and start the entry animation.
    fn engage(&mut self, pt: Point, now_ms: f64) {
        let initial = self.gesture.initial;
        let path = DragEvent::new(initial, pt);
        let direction = path.to_cartesian(&self.viewport).direction_from_origin();
        if direction.is_in(&[DragDirection::Up, DragDirection::Down, DragDirection::Static]) {
            return;
        }

        let Some(right_to_left) = self.behaviors.drag(&self.drag_bounds(), initial, pt) else {
            debug!("drag interrupted by host");
            self.gesture.phase = Phase::Interrupted;
            return;
        };
        self.gesture.classified = true;
        self.right_to_left = right_to_left;

        if !self.book.can_turn(right_to_left) {
            return;
        }

        let band = self.viewport.drag_band();
        let start = Point::new(if right_to_left { band.end } else { band.start }, initial.y);
        if pt.y > initial.y {
            self.sim.upside_down = true;
            self.sim.f = self.viewport.height - self.sim.f;
        }
        self.animation = Animation::new(DragEvent::new(start, pt), now_ms, ANIM_ENTER_DURATION_MS);
        self.set_flow(FlowState::EnteringAnimation);
    }

    pub fn on_drag_end(&mut self, now_ms: f64) -> Vec<Action> {
        if self.gesture.phase != Phase::Tracking {
            self.gesture.phase = Phase::None;
            return vec![];
        }
        let actions = self.release(now_ms, false);
        self.gesture.phase = Phase::None;
        actions
    }

    /// The finger lifted, or left the band when `forced`.
    fn release(&mut self, now_ms: f64, forced: bool) -> Vec<Action> {
        match self.flow {
            FlowState::Draggable => {
                self.begin_exit(now_ms);
                vec![Action::RenderNeeded]
            }
            FlowState::EnteringAnimation => {
                self.exit_requested = true;
                vec![]
            }
            FlowState::Idle if self.gesture.classified && !forced => {
                let decision = self.behaviors.exit(
                    &self.drag_bounds(),
                    self.gesture.initial,
                    self.gesture.event.current,
                    self.right_to_left,
                );
                match decision.forward {
                    Some(forward) => vec![Action::TurnPage(self.book.turn(forward))],
                    None => vec![],
                }
            }
            _ => vec![],
        }
    }

    fn begin_exit(&mut self, now_ms: f64) {
        let vp = self.viewport;
        let j = self.points.j;
        let start = if self.sim.upside_down { j.reflect_about(&vp.mid_line()) } else { j };
        self.sim.f = j.distance_to(self.points.h).max(0.0);
        let y = vp.origin.y + if self.sim.upside_down { self.sim.f } else { vp.height - self.sim.f };

        let decision =
            self.behaviors.exit(&self.drag_bounds(), self.gesture.initial, self.gesture.event.current, self.right_to_left);
        if decision.forward.is_some() {
            self.pending_turn = decision.forward;
        }

        let band_end = vp.drag_band().end;
        let end = if decision.exits_left { Point::new(-0.5 * band_end, y) } else { Point::new(band_end, y) };
        self.animation = Animation::new(DragEvent::new(start, end), now_ms, ANIM_EXIT_DURATION_MS);
        self.sim.regime = Regime::Loose;
        self.exit_requested = false;
        self.set_flow(FlowState::ExitingAnimation);
    }

    fn set_flow(&mut self, next: FlowState) {
        debug!(from = ?self.flow, to = ?next, "flow state");
        self.flow = next;
    }

    // --- Frames ---

    /// Advance animations, solve the curl and build the frame at `now_ms`.
    pub fn on_frame(&mut self, now_ms: f64) -> Frame {
        if self.flow == FlowState::Idle {
            return Frame::idle();
        }

        let step = match self.flow {
            FlowState::EnteringAnimation | FlowState::ExitingAnimation => {
                let ratio = self.animation.tween.ratio(now_ms);
                Some(self.animation.advance(ratio))
            }
            FlowState::Draggable => Some(self.gesture.event),
            FlowState::Idle | FlowState::ExitPending => None,
        };

        let vp = self.viewport;
        let solved = step
            .filter(|event| !event.is_unmoved())
            .and_then(|event| self.sim.step(event, &vp, self.flow, self.config.loose_edge_blend));

        let mut points = self.surface_points(solved.unwrap_or(self.points));
        let mut mesh = self.warp(&points);
        if let Some(solved) = solved {
            if mesh.is_degenerate() {
                warn!(regime = ?self.sim.regime, "degenerate frame dropped");
                points = self.surface_points(self.points);
                mesh = self.warp(&points);
            } else {
                self.points = solved;
            }
        }

        let scene = points.is_solved().then(|| scene::build(&points, &mesh.edges, self.sim.upside_down));
        let (curl_slot, under_slot) =
            if self.right_to_left { (Slot::Current, Slot::Next) } else { (Slot::Previous, Slot::Current) };

        let upside_down = self.sim.upside_down;
        let actions = self.settle(now_ms);
        Frame { points, mesh, scene, curl_slot, under_slot, upside_down, redraw: true, actions }
    }

    /// Display polygon for `points`, in surface pixels relative to the page.
    fn surface_points(&self, points: AllPoints) -> AllPoints {
        let vp = self.viewport;
        self.sim.display(points, &vp).map(|p| vp.to_view(p - vp.origin))
    }

    fn warp(&self, surface_points: &AllPoints) -> Mesh {
        let surface = self.viewport.surface();
        mesh::build(&surface_points.to_cartesian(&surface), &surface, self.config.mesh_interval, self.sim.upside_down)
    }

    /// Move on once the running animation has finished.
    fn settle(&mut self, now_ms: f64) -> Vec<Action> {
        match self.flow {
            FlowState::EnteringAnimation if self.animation.tween.is_finished(now_ms) => {
                let next = if self.exit_requested { FlowState::ExitPending } else { FlowState::Draggable };
                self.set_flow(next);
                vec![Action::RenderNeeded]
            }
            FlowState::ExitPending => {
                self.begin_exit(now_ms);
                vec![Action::RenderNeeded]
            }
            FlowState::ExitingAnimation if self.animation.tween.is_finished(now_ms) => self.finish_turn(),
            _ => vec![],
        }
    }

    fn finish_turn(&mut self) -> Vec<Action> {
        let forward = self.pending_turn.take();
        self.reset();

        let mut actions = vec![Action::RenderNeeded];
        if let Some(forward) = forward {
            let turn = self.book.turn(forward);
            actions.push(Action::TurnPage(turn));
            if turn.success && !self.book.is_pinned() {
                actions.extend(self.request_pages());
            }
        }
        actions
    }

    /// Back to rest: no curl, no cached angle, nothing pending.
    fn reset(&mut self) {
        self.set_flow(FlowState::Idle);
        self.sim = Simulation::default();
        self.points = AllPoints::default();
        self.animation = Animation::default();
        self.exit_requested = false;
        self.pending_turn = None;
        self.right_to_left = false;
        self.gesture = Gesture::default();
    }
}

/// The full page-curl engine. Wraps `EngineCore` and owns the browser canvas
/// element plus the three page surfaces the host renders into.
pub struct Engine {
    canvas: HtmlCanvasElement,
    slots: [Option<HtmlCanvasElement>; 3],
    /// At most one slot may be held as RGB565 pixels instead of a surface.
    lower: Option<LowerPage>,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns the [`CurlConfig::validate`] error for an out-of-range config.
    pub fn new(
        canvas: HtmlCanvasElement,
        config: CurlConfig,
        viewport: Viewport,
        book: BookState,
    ) -> Result<Self, ConfigError> {
        Ok(Self { canvas, slots: [None, None, None], lower: None, core: EngineCore::new(config, viewport, book)? })
    }

    fn now_ms() -> f64 {
        js_sys::Date::now()
    }

    // --- Delegated data inputs ---

    pub fn start(&mut self) -> Vec<Action> {
        self.core.start()
    }

    /// Store the host's drawing of `page` and acknowledge it.
    pub fn page_rendered(&mut self, page: usize, slot: Slot, surface: HtmlCanvasElement) -> Vec<Action> {
        if self.lower.as_ref().is_some_and(|lower| lower.slot() == slot) {
            self.lower = None;
        }
        self.slots[slot.index()] = Some(surface);
        self.core.page_rendered(page, slot)
    }

    /// Store the host's RGB565 drawing of `page` and acknowledge it. While
    /// the page lies under the curl only the revealed part is expanded.
    ///
    /// # Errors
    ///
    /// [`SynthError::SizeMismatch`] if `pixels` is not `width · height`.
    pub fn page_rendered_rgb565(
        &mut self,
        page: usize,
        slot: Slot,
        width: usize,
        height: usize,
        pixels: Vec<u16>,
    ) -> Result<Vec<Action>, SynthError> {
        self.lower = Some(LowerPage::new(page, slot, width, height, pixels)?);
        self.slots[slot.index()] = None;
        Ok(self.core.page_rendered(page, slot))
    }

    /// # Errors
    ///
    /// Propagates [`crate::book::BookError::PageOutOfRange`].
    pub fn set_current_page(&mut self, page: usize) -> Result<Vec<Action>, crate::book::BookError> {
        self.core.set_current_page(page)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.core.set_viewport(viewport);
    }

    // --- Input events ---

    pub fn on_tap(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_tap(screen_pt, Self::now_ms())
    }

    pub fn on_drag_start(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_drag_start(screen_pt, Self::now_ms())
    }

    pub fn on_drag(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_drag(screen_pt, Self::now_ms())
    }

    pub fn on_drag_end(&mut self) -> Vec<Action> {
        self.core.on_drag_end(Self::now_ms())
    }

    // --- Render ---

    /// Advance one frame and draw it to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a canvas call fails.
    pub fn render(&mut self) -> Result<Vec<Action>, JsValue> {
        let frame = self.core.on_frame(Self::now_ms());
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        render::draw(&ctx, &frame, &self.slots, self.lower.as_mut(), &self.core.viewport, &self.core.config)?;
        Ok(frame.actions)
    }
}
