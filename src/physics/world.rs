//! Rigid-body world
//!
//! Wraps the rapier2d pipeline: owns every body, collider and joint, exposes
//! factories that speak screen pixels, steps the simulation, and turns raw
//! collision-begin events into [`Contact`]s for registered listeners.
//!
//! Removal is deferred: [`PhysicsWorld::queue_destroy`] only records the
//! request, and the queue is drained at the entry of the next
//! [`PhysicsWorld::step`], never while contacts are being handed out.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::*;

use super::body::{BodyHandle, BodyId, BodyKind, BodySnapshot, Contact, FlipperJoint, Listener};
use super::coords::Projection;
use super::error::BuildError;
use super::shapes::{FlipperSide, filter_close_vertices, flipper_limits, flipper_outline};
use crate::tuning::{FlipperTuning, PhysicsTuning};

// ---------------------------------------------------------------------------
// glam <-> nalgebra conversions
// ---------------------------------------------------------------------------

fn to_na(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn to_point(v: Vec2) -> Point<Real> {
    point![v.x, v.y]
}

fn from_na(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

#[inline]
fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

// ---------------------------------------------------------------------------
// Event collection
// ---------------------------------------------------------------------------

/// Buffers collision-begin pairs while the pipeline runs.
#[derive(Default)]
struct ContactCollector {
    started: Mutex<Vec<(ColliderHandle, ColliderHandle)>>,
}

impl ContactCollector {
    fn drain(&self) -> Vec<(ColliderHandle, ColliderHandle)> {
        self.started
            .lock()
            .map(|mut pairs| std::mem::take(&mut *pairs))
            .unwrap_or_default()
    }
}

impl EventHandler for ContactCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let CollisionEvent::Started(a, b, _) = event {
            if let Ok(mut pairs) = self.started.lock() {
                pairs.push((a, b));
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Owner of all simulated bodies for one table.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    collector: ContactCollector,

    projection: Projection,
    tuning: PhysicsTuning,
    /// Live handles by id; the dispatcher only reports bodies found here
    handles: HashMap<BodyId, BodyHandle>,
    listeners: HashMap<BodyId, Listener>,
    pending_destroy: Vec<BodyId>,
    /// Bodies that received a continuous force this frame
    forced: Vec<RigidBodyHandle>,
    next_id: u32,
}

impl PhysicsWorld {
    /// Create an empty world for a table `screen_height` pixels tall.
    pub fn new(tuning: &PhysicsTuning, screen_height: f32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = tuning.fallback_dt;
        integration_parameters.num_solver_iterations =
            NonZeroUsize::new(tuning.solver_iterations).unwrap_or(NonZeroUsize::MIN);

        log::info!(
            "Physics world: gravity ({}, {}), {} px/m, {} solver iterations",
            tuning.gravity.x,
            tuning.gravity.y,
            tuning.pixels_per_meter,
            tuning.solver_iterations
        );

        Self {
            gravity: to_na(tuning.gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            collector: ContactCollector::default(),
            projection: Projection::new(tuning.pixels_per_meter, screen_height),
            tuning: tuning.clone(),
            handles: HashMap::new(),
            listeners: HashMap::new(),
            pending_destroy: Vec::new(),
            forced: Vec::new(),
            next_id: 1,
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Number of live bodies (pending removals still count).
    pub fn body_count(&self) -> usize {
        self.handles.len()
    }

    // -- Factories --

    /// Circle of `radius` pixels centered at screen (`x`, `y`).
    pub fn create_circle(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        kind: BodyKind,
    ) -> Result<BodyHandle, BuildError> {
        if kind == BodyKind::Sensor {
            return self.create_circle_sensor(x, y, radius);
        }
        if !positive(radius) {
            log::warn!("Rejected circle: radius {}", radius);
            return Err(BuildError::InvalidDimension);
        }
        let center = self.checked_position(x, y)?;
        let r = self.projection.length_to_world(radius);

        let collider = self.with_material(ColliderBuilder::ball(r), kind);
        let body = Self::body_builder(kind, center);
        Ok(self.insert(body, collider, kind, radius * 2.0, radius * 2.0))
    }

    /// Axis-aligned box `width`×`height` pixels centered at screen (`x`, `y`).
    pub fn create_box(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        kind: BodyKind,
    ) -> Result<BodyHandle, BuildError> {
        if kind == BodyKind::Sensor {
            return self.create_box_sensor(x, y, width, height);
        }
        if !positive(width) || !positive(height) {
            log::warn!("Rejected box: {}x{}", width, height);
            return Err(BuildError::InvalidDimension);
        }
        let center = self.checked_position(x, y)?;
        let hw = self.projection.length_to_world(width) * 0.5;
        let hh = self.projection.length_to_world(height) * 0.5;

        let collider = self.with_material(ColliderBuilder::cuboid(hw, hh), kind);
        let body = Self::body_builder(kind, center);
        Ok(self.insert(body, collider, kind, width, height))
    }

    /// Static box that reports overlaps without a contact response.
    pub fn create_box_sensor(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<BodyHandle, BuildError> {
        if !positive(width) || !positive(height) {
            log::warn!("Rejected box sensor: {}x{}", width, height);
            return Err(BuildError::InvalidDimension);
        }
        let center = self.checked_position(x, y)?;
        let hw = self.projection.length_to_world(width) * 0.5;
        let hh = self.projection.length_to_world(height) * 0.5;

        let collider = ColliderBuilder::cuboid(hw, hh).sensor(true);
        let body = RigidBodyBuilder::fixed().translation(to_na(center));
        Ok(self.insert(body, collider, BodyKind::Sensor, width, height))
    }

    /// Static circle that reports overlaps without a contact response.
    pub fn create_circle_sensor(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
    ) -> Result<BodyHandle, BuildError> {
        if !positive(radius) {
            log::warn!("Rejected circle sensor: radius {}", radius);
            return Err(BuildError::InvalidDimension);
        }
        let center = self.checked_position(x, y)?;
        let r = self.projection.length_to_world(radius);

        let collider = ColliderBuilder::ball(r).sensor(true);
        let body = RigidBodyBuilder::fixed().translation(to_na(center));
        Ok(self.insert(body, collider, BodyKind::Sensor, radius * 2.0, radius * 2.0))
    }

    /// Open static boundary through `points` (screen offsets from the origin).
    pub fn create_chain(
        &mut self,
        origin_x: f32,
        origin_y: f32,
        points: &[Vec2],
    ) -> Result<BodyHandle, BuildError> {
        let origin = self.checked_position(origin_x, origin_y)?;
        let vertices = self.prepare_vertices(points, 2)?;

        let collider = ColliderBuilder::polyline(vertices, None).friction(self.tuning.friction);
        let body = RigidBodyBuilder::fixed().translation(to_na(origin));
        Ok(self.insert(body, collider, BodyKind::Static, 0.0, 0.0))
    }

    /// Closed static loop through `points`, rotated by `rotation` radians
    /// (clockwise on screen) about the origin.
    pub fn create_polygon_loop(
        &mut self,
        origin_x: f32,
        origin_y: f32,
        points: &[Vec2],
        rotation: f32,
    ) -> Result<BodyHandle, BuildError> {
        if !rotation.is_finite() {
            return Err(BuildError::InvalidPosition);
        }
        let origin = self.checked_position(origin_x, origin_y)?;
        let vertices = self.prepare_vertices(points, 3)?;

        let n = vertices.len() as u32;
        let indices: Vec<[u32; 2]> = (0..n).map(|i| [i, (i + 1) % n]).collect();
        let collider = ColliderBuilder::polyline(vertices, Some(indices))
            .restitution(self.tuning.restitution)
            .friction(self.tuning.friction);
        let body = RigidBodyBuilder::fixed()
            .translation(to_na(origin))
            .rotation(self.projection.flip_angle(rotation));
        Ok(self.insert(body, collider, BodyKind::Static, 0.0, 0.0))
    }

    /// Static pivot plus a motorized arm hinged on it.
    ///
    /// `width` is the arm length and `height` its thickness at the pivot, both
    /// in pixels. The arm starts at rest and stays there until
    /// [`set_motor_speed`](Self::set_motor_speed) drives it.
    pub fn create_flipper(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        side: FlipperSide,
        flipper: &FlipperTuning,
    ) -> Result<FlipperJoint, BuildError> {
        if !positive(width) || !positive(height) || !positive(flipper.pivot_radius) {
            log::warn!("Rejected flipper: {}x{}", width, height);
            return Err(BuildError::InvalidDimension);
        }
        let center = self.checked_position(x, y)?;

        let length = self.projection.length_to_world(width);
        let thickness = self.projection.length_to_world(height);
        let outline: Vec<Point<Real>> = flipper_outline(length, thickness, side)
            .iter()
            .map(|&v| to_point(v))
            .collect();
        let arm_collider = ColliderBuilder::convex_hull(&outline)
            .ok_or(BuildError::DegenerateShape)?
            .density(flipper.density)
            .friction(flipper.friction);

        let pivot_r = self.projection.length_to_world(flipper.pivot_radius);
        let pivot = self.insert(
            RigidBodyBuilder::fixed().translation(to_na(center)),
            ColliderBuilder::ball(pivot_r),
            BodyKind::Static,
            flipper.pivot_radius * 2.0,
            flipper.pivot_radius * 2.0,
        );
        let arm = self.insert(
            RigidBodyBuilder::dynamic()
                .translation(to_na(center))
                .ccd_enabled(true),
            arm_collider,
            BodyKind::Dynamic,
            width,
            height,
        );

        let joint = RevoluteJointBuilder::new()
            .local_anchor1(point![0.0, 0.0])
            .local_anchor2(point![0.0, 0.0])
            .limits(flipper_limits(side, flipper.rest_angle, flipper.swing_angle))
            .motor_velocity(0.0, flipper.motor_gain)
            .motor_max_force(flipper.max_motor_torque)
            .contacts_enabled(false)
            .build();
        let joint = self
            .impulse_joints
            .insert(pivot.body, arm.body, joint, true);

        log::debug!("Flipper {:?} created at ({}, {})", side, x, y);
        Ok(FlipperJoint {
            side,
            pivot,
            arm,
            joint,
            motor_gain: flipper.motor_gain,
        })
    }

    // -- Stepping --

    /// Remove queued bodies, advance the simulation by `dt` seconds and
    /// return the contacts that began during the step.
    ///
    /// Non-positive deltas and deltas above the configured maximum are
    /// replaced by the fallback step so a frame hitch cannot tunnel the ball.
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        self.flush_destroyed();

        self.integration_parameters.dt = self.clamp_dt(dt);
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.collector,
        );

        // Continuous forces only last one step.
        for handle in self.forced.drain(..) {
            if let Some(rb) = self.bodies.get_mut(handle) {
                rb.reset_forces(false);
            }
        }

        self.dispatch()
    }

    /// The step length actually used for a requested `dt`.
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt > 0.0 && dt <= self.tuning.max_dt {
            dt
        } else {
            self.tuning.fallback_dt
        }
    }

    /// Ask for `handle` to be removed at the start of the next step.
    pub fn queue_destroy(&mut self, handle: &BodyHandle) {
        if self.handles.contains_key(&handle.id) && !self.pending_destroy.contains(&handle.id) {
            self.pending_destroy.push(handle.id);
        }
    }

    pub fn is_pending_destroy(&self, handle: &BodyHandle) -> bool {
        self.pending_destroy.contains(&handle.id)
    }

    fn flush_destroyed(&mut self) {
        for id in std::mem::take(&mut self.pending_destroy) {
            let Some(handle) = self.handles.remove(&id) else {
                continue;
            };
            self.listeners.remove(&id);
            self.bodies.remove(
                handle.body,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
            log::debug!("Destroyed body {:?}", id);
        }
    }

    fn dispatch(&mut self) -> Vec<Contact> {
        let mut contacts = Vec::new();
        for (a, b) in self.collector.drain() {
            let (Some(a), Some(b)) = (self.collider_owner(a), self.collider_owner(b)) else {
                continue;
            };
            if let Some(&listener) = self.listeners.get(&a.id) {
                contacts.push(Contact {
                    listener,
                    this: a,
                    other: b,
                });
            }
            if let Some(&listener) = self.listeners.get(&b.id) {
                contacts.push(Contact {
                    listener,
                    this: b,
                    other: a,
                });
            }
        }
        contacts
    }

    // -- Listeners --

    pub fn set_listener(&mut self, handle: &BodyHandle, listener: Listener) {
        if self.handles.contains_key(&handle.id) {
            self.listeners.insert(handle.id, listener);
        }
    }

    pub fn clear_listener(&mut self, handle: &BodyHandle) {
        self.listeners.remove(&handle.id);
    }

    pub fn listener(&self, handle: &BodyHandle) -> Option<Listener> {
        self.listeners.get(&handle.id).copied()
    }

    // -- Queries (screen space) --

    pub fn is_alive(&self, handle: &BodyHandle) -> bool {
        self.rigid_body(handle).is_some()
    }

    /// Body center in screen pixels.
    pub fn position(&self, handle: &BodyHandle) -> Option<Vec2> {
        self.rigid_body(handle)
            .map(|rb| self.projection.to_screen(from_na(rb.translation())))
    }

    /// Linear velocity in screen pixels per second.
    pub fn velocity(&self, handle: &BodyHandle) -> Option<Vec2> {
        self.rigid_body(handle)
            .map(|rb| self.projection.velocity_to_screen(from_na(rb.linvel())))
    }

    /// Rotation in radians, clockwise on screen.
    pub fn angle(&self, handle: &BodyHandle) -> Option<f32> {
        self.rigid_body(handle)
            .map(|rb| self.projection.flip_angle(rb.rotation().angle()))
    }

    /// Angular velocity in radians per second, simulation orientation.
    pub fn angular_velocity(&self, handle: &BodyHandle) -> Option<f32> {
        self.rigid_body(handle).map(|rb| rb.angvel())
    }

    /// Speed in meters per second.
    pub fn speed(&self, handle: &BodyHandle) -> Option<f32> {
        self.rigid_body(handle).map(|rb| rb.linvel().norm())
    }

    pub fn mass(&self, handle: &BodyHandle) -> Option<f32> {
        self.rigid_body(handle).map(|rb| rb.mass())
    }

    pub fn is_awake(&self, handle: &BodyHandle) -> Option<bool> {
        self.rigid_body(handle).map(|rb| !rb.is_sleeping())
    }

    // -- Queries and forces (simulation space) --

    /// Body center in meters, Y up.
    pub fn world_position(&self, handle: &BodyHandle) -> Option<Vec2> {
        self.rigid_body(handle).map(|rb| from_na(rb.translation()))
    }

    /// Add a force (newtons, Y up) at the center of mass for the next step.
    pub fn apply_world_force(&mut self, handle: &BodyHandle, force: Vec2) {
        if let Some(rb) = self.rigid_body_mut(handle) {
            rb.add_force(to_na(force), true);
            let body = handle.body;
            if !self.forced.contains(&body) {
                self.forced.push(body);
            }
        }
    }

    // -- Mutators (screen space) --

    /// Instantaneous impulse (N·s) given in screen orientation (Y down).
    pub fn apply_impulse(&mut self, handle: &BodyHandle, impulse: Vec2) {
        let impulse = self.projection.flip(impulse);
        if let Some(rb) = self.rigid_body_mut(handle) {
            rb.apply_impulse(to_na(impulse), true);
        }
    }

    pub fn set_position(&mut self, handle: &BodyHandle, position: Vec2) {
        let p = self.projection.to_world(position);
        if let Some(rb) = self.rigid_body_mut(handle) {
            rb.set_translation(to_na(p), true);
        }
    }

    pub fn set_velocity(&mut self, handle: &BodyHandle, velocity: Vec2) {
        let v = self.projection.velocity_to_world(velocity);
        if let Some(rb) = self.rigid_body_mut(handle) {
            rb.set_linvel(to_na(v), true);
        }
    }

    pub fn set_angular_velocity(&mut self, handle: &BodyHandle, angvel: f32) {
        if let Some(rb) = self.rigid_body_mut(handle) {
            rb.set_angvel(angvel, true);
        }
    }

    /// Disabled bodies stay in the world but are neither simulated nor touched.
    pub fn set_enabled(&mut self, handle: &BodyHandle, enabled: bool) {
        if let Some(rb) = self.rigid_body_mut(handle) {
            rb.set_enabled(enabled);
        }
    }

    /// Switch between simulated and frozen. Sensors cannot be switched.
    pub fn set_kind(&mut self, handle: &BodyHandle, kind: BodyKind) {
        let body_type = match kind {
            BodyKind::Static => RigidBodyType::Fixed,
            BodyKind::Dynamic => RigidBodyType::Dynamic,
            BodyKind::Sensor => return,
        };
        if let Some(rb) = self.rigid_body_mut(handle) {
            rb.set_body_type(body_type, true);
        }
    }

    /// Override a body's bounciness; contacts take the larger of the pair.
    pub fn set_restitution(&mut self, handle: &BodyHandle, restitution: f32) {
        if !self.handles.contains_key(&handle.id) {
            return;
        }
        if let Some(collider) = self.colliders.get_mut(handle.collider) {
            collider.set_restitution(restitution);
            collider.set_restitution_combine_rule(CoefficientCombineRule::Max);
        }
    }

    /// Drive a flipper motor. `speed` is in rad/s, counter-clockwise positive
    /// in simulation space; the joint's torque cap bounds how fast it gets there.
    pub fn set_motor_speed(&mut self, flipper: &FlipperJoint, speed: f32) {
        if let Some(joint) = self.impulse_joints.get_mut(flipper.joint) {
            if let Some(revolute) = joint.data.as_revolute_mut() {
                revolute.set_motor_velocity(speed, flipper.motor_gain);
            }
        }
        if let Some(rb) = self.rigid_body_mut(&flipper.arm) {
            rb.wake_up(true);
        }
    }

    // -- Snapshots --

    pub fn snapshot(&self, handle: &BodyHandle) -> Option<BodySnapshot> {
        let rb = self.rigid_body(handle)?;
        Some(BodySnapshot {
            position: from_na(rb.translation()),
            angle: rb.rotation().angle(),
            velocity: from_na(rb.linvel()),
            angular_velocity: rb.angvel(),
            awake: !rb.is_sleeping(),
        })
    }

    pub fn restore(&mut self, handle: &BodyHandle, snapshot: &BodySnapshot) {
        if let Some(rb) = self.rigid_body_mut(handle) {
            rb.set_translation(to_na(snapshot.position), false);
            rb.set_rotation(Rotation::new(snapshot.angle), false);
            rb.set_linvel(to_na(snapshot.velocity), false);
            rb.set_angvel(snapshot.angular_velocity, false);
            if snapshot.awake {
                rb.wake_up(true);
            } else {
                rb.sleep();
            }
        }
    }

    // -- private helpers --

    fn rigid_body(&self, handle: &BodyHandle) -> Option<&RigidBody> {
        if !self.handles.contains_key(&handle.id) {
            return None;
        }
        self.bodies.get(handle.body)
    }

    fn rigid_body_mut(&mut self, handle: &BodyHandle) -> Option<&mut RigidBody> {
        if !self.handles.contains_key(&handle.id) {
            return None;
        }
        self.bodies.get_mut(handle.body)
    }

    fn collider_owner(&self, collider: ColliderHandle) -> Option<BodyHandle> {
        let parent = self.colliders.get(collider)?.parent()?;
        let id = BodyId(self.bodies.get(parent)?.user_data as u32);
        self.handles.get(&id).copied()
    }

    fn checked_position(&self, x: f32, y: f32) -> Result<Vec2, BuildError> {
        let world = self.projection.to_world(Vec2::new(x, y));
        if !world.is_finite() {
            log::warn!("Rejected position ({}, {})", x, y);
            return Err(BuildError::InvalidPosition);
        }
        Ok(world)
    }

    /// Convert screen offsets to simulation points and drop near-duplicates.
    fn prepare_vertices(
        &self,
        points: &[Vec2],
        required: usize,
    ) -> Result<Vec<Point<Real>>, BuildError> {
        let mut converted = Vec::with_capacity(points.len());
        for (index, &p) in points.iter().enumerate() {
            let v = self.projection.offset_to_world(p);
            if !v.is_finite() {
                log::warn!("Rejected vertex {}: ({}, {})", index, p.x, p.y);
                return Err(BuildError::InvalidVertex { index });
            }
            converted.push(v);
        }

        let filtered = filter_close_vertices(&converted, self.tuning.min_vertex_distance);
        if filtered.len() < required {
            log::warn!(
                "Not enough vertices after filtering: {} (need {})",
                filtered.len(),
                required
            );
            return Err(BuildError::InsufficientVertices {
                required,
                found: filtered.len(),
            });
        }
        Ok(filtered.into_iter().map(to_point).collect())
    }

    fn body_builder(kind: BodyKind, center: Vec2) -> RigidBodyBuilder {
        match kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic()
                .translation(to_na(center))
                .ccd_enabled(true),
            BodyKind::Static | BodyKind::Sensor => {
                RigidBodyBuilder::fixed().translation(to_na(center))
            }
        }
    }

    fn with_material(&self, collider: ColliderBuilder, kind: BodyKind) -> ColliderBuilder {
        let collider = collider
            .restitution(self.tuning.restitution)
            .friction(self.tuning.friction);
        match kind {
            BodyKind::Dynamic => collider.density(self.tuning.density),
            BodyKind::Static | BodyKind::Sensor => collider,
        }
    }

    fn insert(
        &mut self,
        body: RigidBodyBuilder,
        collider: ColliderBuilder,
        kind: BodyKind,
        width: f32,
        height: f32,
    ) -> BodyHandle {
        let id = BodyId(self.next_id);
        self.next_id += 1;

        let body = self.bodies.insert(body.user_data(id.0 as u128));
        let collider = self.colliders.insert_with_parent(
            collider.active_events(ActiveEvents::COLLISION_EVENTS),
            body,
            &mut self.bodies,
        );

        let handle = BodyHandle {
            id,
            kind,
            width,
            height,
            body,
            collider,
        };
        self.handles.insert(id, handle);
        handle
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
