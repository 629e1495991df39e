//! The layout orchestrator.
//!
//! [`Layout`] owns every body and spring and drives the step pipeline:
//! harvest the previous round of parallel forces, add spring forces, integrate,
//! rebuild the quadtree over the new positions and dispatch the next round before
//! returning. Positions exported after step *k* were therefore integrated from
//! forces computed during step *k - 1*.
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(feature = "graph-changes")]
use crate::layout::GraphHooks;
use crate::layout::{BoundingBox, Completed, Frame, ResultBuffers, WorkerPool};
use crate::models::{Body, Spring, Vector2D};
use crate::spatial::ForceParams;
use crate::utils::{LayoutConfig, LayoutError, MAX_SPEED};

/// Where the step pipeline is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No step has run yet; the next step reports the current positions unchanged.
    Cold,
    /// A round of force accumulation is in flight.
    Warm,
}

pub struct Layout {
    config: LayoutConfig,
    bodies: HashMap<String, Body>,
    /// Keyed in id order so spring forces are summed the same way every run.
    springs: BTreeMap<String, Spring>,
    /// Ordered body index, in lock-step with the result buffers.
    order: Vec<String>,
    buffers: ResultBuffers,
    bounds: BoundingBox,
    phase: Phase,
    frame: Option<Arc<Frame>>,
    /// Ordered index as it was when the in-flight round was dispatched.
    dispatched: Vec<String>,
    workers: WorkerPool<Frame>,
    #[cfg_attr(not(feature = "graph-changes"), allow(dead_code))]
    pub(crate) rng: StdRng,
    #[cfg(feature = "graph-changes")]
    pub(crate) hooks: GraphHooks,
}

impl Layout {
    /// Creates a layout and starts its worker threads.
    ///
    /// Bodies keep the order they are given in; that order is the slot order of the
    /// exported position buffers. A repeated body id overwrites the earlier body.
    ///
    /// # Errors
    ///
    /// Returns the first validation error of `config`, of a body or of a spring, or
    /// `WorkerSpawn` if a worker thread could not be started.
    pub fn new(bodies: Vec<Body>, springs: Vec<Spring>, config: LayoutConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        let mut layout = Layout {
            config,
            bodies: HashMap::with_capacity(bodies.len()),
            springs: BTreeMap::new(),
            order: Vec::with_capacity(bodies.len()),
            buffers: ResultBuffers::new(),
            bounds: BoundingBox::new(),
            phase: Phase::Cold,
            frame: None,
            dispatched: Vec::new(),
            workers: WorkerPool::new(config.worker_count)?,
            rng: StdRng::seed_from_u64(config.seed.wrapping_add(1)),
            #[cfg(feature = "graph-changes")]
            hooks: GraphHooks::default(),
        };
        for body in bodies {
            let id = body.id.clone();
            layout.set_body(&id, body)?;
        }
        for spring in springs {
            let id = spring.id.clone();
            layout.set_spring(&id, spring)?;
        }
        info!(
            "layout constructed: {} bodies, {} springs, {} workers",
            layout.bodies.len(),
            layout.springs.len(),
            layout.workers.len()
        );
        Ok(layout)
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advances the pipeline by one round.
    ///
    /// # Errors
    ///
    /// Returns `WorkerDisconnected` if a worker died during the previous round.
    pub fn step(&mut self) -> Result<(), LayoutError> {
        if self.buffers.prepare(self.order.len()) {
            debug!(
                "result buffers reallocated for {} bodies (generation {})",
                self.order.len(),
                self.buffers.generation()
            );
        }
        match self.phase {
            Phase::Cold => {
                for (slot, id) in self.order.iter().enumerate() {
                    if let Some(body) = self.bodies.get(id) {
                        self.buffers.set(slot, body.position.x, body.position.y);
                    }
                }
            }
            Phase::Warm => {
                let completed = self.workers.harvest()?;
                self.apply_harvest(completed);
                self.apply_spring_forces();
                self.integrate();
            }
        }
        self.rebuild_index();
        if let Some(frame) = &self.frame {
            self.workers.dispatch(Arc::clone(frame), self.dispatched.len())?;
        }
        self.phase = Phase::Warm;
        trace!("step dispatched over {} bodies", self.dispatched.len());
        Ok(())
    }

    /// Runs `steps` consecutive steps.
    pub fn simulate(&mut self, steps: usize) -> Result<(), LayoutError> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    /// Copies the forces of the last round onto the bodies they were computed for.
    /// Bodies added since the dispatch start from a zero force.
    fn apply_harvest(&mut self, completed: Vec<Completed<Vec<Vector2D>>>) {
        for body in self.bodies.values_mut() {
            body.force = Vector2D::ZERO;
        }
        for Completed { range, output } in completed {
            for (slot, force) in range.zip(output) {
                if let Some(body) = self.dispatched.get(slot).and_then(|id| self.bodies.get_mut(id)) {
                    body.force = force;
                }
            }
        }
    }

    /// Adds every spring's force to its endpoints, deleting springs whose endpoints are gone.
    fn apply_spring_forces(&mut self) {
        let mut broken = Vec::new();
        for (id, spring) in &self.springs {
            let (Some(from), Some(to)) = (self.bodies.get(&spring.from), self.bodies.get(&spring.to)) else {
                broken.push(id.clone());
                continue;
            };
            let force = spring.force(from.position, to.position);
            if let Some(from) = self.bodies.get_mut(&spring.from) {
                from.force += force;
            }
            if let Some(to) = self.bodies.get_mut(&spring.to) {
                to.force -= force;
            }
        }
        for id in broken {
            debug!("removing spring {}: endpoint no longer exists", id);
            self.springs.remove(&id);
        }
    }

    /// Semi-implicit Euler with the speed clamped to [`MAX_SPEED`].
    /// Pinned bodies lose their velocity and keep their position.
    fn integrate(&mut self) {
        let dt = self.config.timestep;
        for (slot, id) in self.order.iter().enumerate() {
            let Some(body) = self.bodies.get_mut(id) else {
                continue;
            };
            if body.pinned {
                body.velocity = Vector2D::ZERO;
            } else {
                body.velocity += body.force * (dt / body.mass);
                let speed = body.velocity.length();
                if speed > MAX_SPEED {
                    body.velocity = body.velocity * (MAX_SPEED / speed);
                }
                body.position += body.velocity * dt;
            }
            self.buffers.set(slot, body.position.x, body.position.y);
            self.bounds.extend(body.position);
        }
    }

    /// Recycles the previous frame and rebuilds the tree over the current positions.
    fn rebuild_index(&mut self) {
        let params = ForceParams::from(&self.config);
        let mut frame = match self.frame.take().map(Arc::try_unwrap) {
            Some(Ok(frame)) => frame,
            Some(Err(_)) => {
                warn!("previous frame is still shared; allocating a new one");
                Frame::new(params, self.config.seed)
            }
            None => Frame::new(params, self.config.seed),
        };

        let bodies = &self.bodies;
        frame.rebuild(self.order.iter().filter_map(|id| bodies.get(id)));
        self.dispatched.clone_from(&self.order);

        // Coincident bodies may have been jittered while building.
        for (slot, id) in self.order.iter().enumerate() {
            let (Some(position), Some(body)) = (frame.position(slot), self.bodies.get_mut(id)) else {
                continue;
            };
            if body.position != position {
                body.position = position;
                self.bounds.extend(position);
            }
        }
        if frame.tree().dropped() > 0 {
            debug!("{} coincident bodies left out of this round's tree", frame.tree().dropped());
        }
        self.frame = Some(Arc::new(frame));
    }

    /// Returns a copy of the body, or the empty-id sentinel if it does not exist.
    pub fn get_body(&self, id: &str) -> Body {
        self.bodies.get(id).cloned().unwrap_or_default()
    }

    pub fn body(&self, id: &str) -> Option<&Body> {
        self.bodies.get(id)
    }

    /// Creates or overwrites the body stored under `id`.
    ///
    /// A new id is appended to the ordered index, which invalidates the position
    /// buffers until the next step reallocates them.
    pub fn set_body(&mut self, id: &str, mut body: Body) -> Result<(), LayoutError> {
        body.id = id.to_string();
        body.validate()?;
        if !self.bodies.contains_key(id) {
            self.order.push(id.to_string());
            self.buffers.invalidate();
        }
        self.bounds.extend(body.position);
        self.bodies.insert(id.to_string(), body);
        Ok(())
    }

    /// Removes a body and its slot in the ordered index.
    ///
    /// Springs attached to it are deleted on the next step. Forces still in flight
    /// for it are discarded, even if the id is reused before then. The bounding box
    /// is re-folded over the remaining bodies, which never shrinks it.
    pub fn remove_body(&mut self, id: &str) -> Option<Body> {
        let removed = self.bodies.remove(id)?;
        self.order.retain(|other| other != id);
        // An empty id never matches a body.
        if let Some(slot) = self.dispatched.iter_mut().find(|d| d.as_str() == id) {
            slot.clear();
        }
        self.buffers.invalidate();
        for body in self.bodies.values() {
            self.bounds.extend(body.position);
        }
        Some(removed)
    }

    /// Returns a copy of the spring, or the empty-id sentinel if it does not exist.
    pub fn get_spring(&self, id: &str) -> Spring {
        self.springs.get(id).cloned().unwrap_or_default()
    }

    pub fn spring(&self, id: &str) -> Option<&Spring> {
        self.springs.get(id)
    }

    /// Creates or overwrites the spring stored under `id`.
    ///
    /// Endpoints are not checked here; a spring with a missing endpoint is deleted
    /// by the next step.
    pub fn set_spring(&mut self, id: &str, mut spring: Spring) -> Result<(), LayoutError> {
        spring.id = id.to_string();
        spring.validate()?;
        self.springs.insert(id.to_string(), spring);
        Ok(())
    }

    pub fn remove_spring(&mut self, id: &str) -> Option<Spring> {
        self.springs.remove(id)
    }

    /// Sets the pinned flag. Does nothing if the body does not exist.
    pub fn pin_body(&mut self, id: &str, pinned: bool) {
        if let Some(body) = self.bodies.get_mut(id) {
            body.pinned = pinned;
        }
    }

    pub fn is_body_pinned(&self, id: &str) -> bool {
        self.bodies.get(id).is_some_and(|b| b.pinned)
    }

    pub fn body_position(&self, id: &str) -> Option<Vector2D> {
        self.bodies.get(id).map(|b| b.position)
    }

    /// Moves a body, e.g. while it is dragged. Does nothing if it does not exist.
    pub fn set_body_position(&mut self, id: &str, x: f64, y: f64) {
        if let Some(body) = self.bodies.get_mut(id) {
            body.position = Vector2D::new(x, y);
            self.bounds.extend(body.position);
        }
    }

    /// Current positions of a spring's `from` and `to` bodies.
    pub fn spring_endpoints(&self, id: &str) -> Option<(Vector2D, Vector2D)> {
        let spring = self.springs.get(id)?;
        let from = self.bodies.get(&spring.from)?;
        let to = self.bodies.get(&spring.to)?;
        Some((from.position, to.position))
    }

    /// Every body, in ordered index order.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.order.iter().filter_map(|id| self.bodies.get(id))
    }

    /// Every spring, in id order.
    pub fn springs(&self) -> impl Iterator<Item = &Spring> + '_ {
        self.springs.values()
    }

    /// Springs with `id` as either endpoint.
    pub fn springs_touching<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Spring> + 'a {
        self.springs.values().filter(move |s| s.touches(id))
    }

    /// Exported x positions, one per slot of the ordered index.
    pub fn positions_x(&self) -> &[f64] {
        self.buffers.xs()
    }

    /// Exported y positions, one per slot of the ordered index.
    pub fn positions_y(&self) -> &[f64] {
        self.buffers.ys()
    }

    /// Pairs every id of the ordered index with its exported position.
    pub fn positions(&self) -> impl Iterator<Item = (&str, Vector2D)> + '_ {
        self.order
            .iter()
            .zip(self.buffers.xs().iter().zip(self.buffers.ys()))
            .map(|(id, (&x, &y))| (id.as_str(), Vector2D::new(x, y)))
    }

    /// Ids in ordered index order.
    pub fn ordered_ids(&self) -> &[String] {
        &self.order
    }

    pub fn buffer_generation(&self) -> u64 {
        self.buffers.generation()
    }

    /// Top-left and bottom-right corners of the running bounding box.
    pub fn graph_rect(&self) -> (Vector2D, Vector2D) {
        (self.bounds.top_left(), self.bounds.bottom_right())
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    /// Drops every body and spring and resets the bounding box.
    ///
    /// Workers and the node pool stay alive, so the layout can be refilled.
    pub fn dispose(&mut self) {
        self.bodies.clear();
        self.springs.clear();
        self.order.clear();
        self.dispatched.clear();
        self.buffers.invalidate();
        self.bounds.reset();
        debug!("layout disposed");
    }
}
