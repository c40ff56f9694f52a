//! Table geometry ingestion
//!
//! A [`TableGeometry`] is the already-parsed content of a level document:
//! tagged rectangles and point chains in the document's own units. It is
//! scaled to the table's logical size and turned into bodies and roles by
//! [`Table::build`]. Features that fail to build are logged and skipped.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionRoles, Role};
use crate::consts::{BALL_RADIUS, TABLE_HEIGHT, TABLE_WIDTH};
use crate::physics::{BodyHandle, BodyKind, BuildError, FlipperJoint, FlipperSide, Listener, PhysicsWorld};
use crate::tuning::Tuning;

/// What a tagged rectangle stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RectRole {
    Wall,
    Bumper,
    Target,
    SpecialTarget,
    BlackHole,
    LossSensor,
    /// Pivot on the rectangle's left edge, arm length = width
    FlipperLeft,
    /// Pivot on the rectangle's right edge, arm length = width
    FlipperRight,
    LaunchPoint,
    CollectibleRegion,
}

/// Axis-aligned rectangle, top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaggedRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub role: RectRole,
}

impl TaggedRect {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// Ordered points relative to `origin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointChain {
    pub origin: Vec2,
    pub points: Vec<Vec2>,
    /// Closed loops become polygons; open chains become boundaries
    #[serde(default)]
    pub closed: bool,
    /// Radians, clockwise on screen (closed loops only)
    #[serde(default)]
    pub rotation: f32,
    /// Scores as a special polygon instead of a wall
    #[serde(default)]
    pub special: bool,
}

/// Pre-parsed level description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableGeometry {
    /// Native width/height of the source document
    pub source_size: Vec2,
    #[serde(default)]
    pub rects: Vec<TaggedRect>,
    #[serde(default)]
    pub chains: Vec<PointChain>,
}

impl TableGeometry {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Rescale everything from `source_size` to `size`.
    pub fn scaled_to(&self, size: Vec2) -> Self {
        let scale = if self.source_size.x > 0.0 && self.source_size.y > 0.0 {
            size / self.source_size
        } else {
            log::warn!("Table source size {:?} unusable, not scaling", self.source_size);
            Vec2::ONE
        };

        Self {
            source_size: size,
            rects: self
                .rects
                .iter()
                .map(|r| TaggedRect {
                    x: r.x * scale.x,
                    y: r.y * scale.y,
                    width: r.width * scale.x,
                    height: r.height * scale.y,
                    role: r.role,
                })
                .collect(),
            chains: self
                .chains
                .iter()
                .map(|c| PointChain {
                    origin: c.origin * scale,
                    points: c.points.iter().map(|&p| p * scale).collect(),
                    closed: c.closed,
                    rotation: c.rotation,
                    special: c.special,
                })
                .collect(),
        }
    }

    /// Built-in single table, 600x1000 logical pixels.
    pub fn default_table() -> Self {
        let rect = |x, y, width, height, role| TaggedRect {
            x,
            y,
            width,
            height,
            role,
        };
        let open = |points: &[(f32, f32)]| PointChain {
            origin: Vec2::ZERO,
            points: points.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
            closed: false,
            rotation: 0.0,
            special: false,
        };

        Self {
            source_size: Vec2::new(TABLE_WIDTH, TABLE_HEIGHT),
            rects: vec![
                rect(175.0, 275.0, 50.0, 50.0, RectRole::Bumper),
                rect(325.0, 275.0, 50.0, 50.0, RectRole::Bumper),
                rect(250.0, 400.0, 50.0, 50.0, RectRole::Bumper),
                rect(45.0, 480.0, 15.0, 60.0, RectRole::Target),
                rect(485.0, 480.0, 15.0, 60.0, RectRole::Target),
                rect(250.0, 120.0, 50.0, 15.0, RectRole::SpecialTarget),
                rect(250.0, 580.0, 50.0, 50.0, RectRole::BlackHole),
                rect(20.0, 960.0, 500.0, 40.0, RectRole::LossSensor),
                rect(170.0, 870.0, 90.0, 20.0, RectRole::FlipperLeft),
                rect(290.0, 870.0, 90.0, 20.0, RectRole::FlipperRight),
                rect(540.0, 880.0, 20.0, 20.0, RectRole::LaunchPoint),
                rect(525.0, 930.0, 55.0, 10.0, RectRole::Wall),
                rect(120.0, 200.0, 360.0, 400.0, RectRole::CollectibleRegion),
            ],
            chains: vec![
                // Outer boundary, open at the drain
                open(&[
                    (20.0, 1000.0),
                    (20.0, 60.0),
                    (60.0, 20.0),
                    (540.0, 20.0),
                    (580.0, 60.0),
                    (580.0, 1000.0),
                ]),
                // Launch lane wall
                open(&[(520.0, 300.0), (520.0, 1000.0)]),
                // Inlanes feeding the flippers
                open(&[(20.0, 760.0), (165.0, 870.0)]),
                open(&[(520.0, 760.0), (385.0, 870.0)]),
                PointChain {
                    origin: Vec2::new(110.0, 680.0),
                    points: vec![
                        Vec2::new(0.0, 0.0),
                        Vec2::new(40.0, 0.0),
                        Vec2::new(20.0, -35.0),
                    ],
                    closed: true,
                    rotation: 0.0,
                    special: true,
                },
            ],
        }
    }
}

/// Bodies built from a [`TableGeometry`].
#[derive(Debug, Clone)]
pub struct Table {
    pub ball: BodyHandle,
    pub launch_point: Vec2,
    pub flippers: Vec<FlipperJoint>,
    pub bumpers: Vec<BodyHandle>,
    /// Screen y of the loss sensor's top edge; the ball is lost below it
    pub loss_line: Option<f32>,
    pub spawn_region: Option<(Vec2, Vec2)>,
}

impl Table {
    /// Create every body the geometry describes and register its role.
    ///
    /// Only the ball is required; anything else that fails is skipped.
    pub fn build(
        geometry: &TableGeometry,
        world: &mut PhysicsWorld,
        roles: &mut CollisionRoles,
        tuning: &Tuning,
    ) -> Result<Self, BuildError> {
        let mut launch_point = Vec2::new(TABLE_WIDTH - 50.0, TABLE_HEIGHT - 110.0);
        let mut flippers = Vec::new();
        let mut bumpers = Vec::new();
        let mut loss_line = None;
        let mut spawn_region = None;

        for rect in &geometry.rects {
            let c = rect.center();
            let built = match rect.role {
                RectRole::LaunchPoint => {
                    launch_point = c;
                    continue;
                }
                RectRole::CollectibleRegion => {
                    spawn_region = Some((
                        Vec2::new(rect.x, rect.y),
                        Vec2::new(rect.x + rect.width, rect.y + rect.height),
                    ));
                    continue;
                }
                RectRole::FlipperLeft | RectRole::FlipperRight => {
                    let (side, pivot_x) = if rect.role == RectRole::FlipperLeft {
                        (FlipperSide::Left, rect.x)
                    } else {
                        (FlipperSide::Right, rect.x + rect.width)
                    };
                    world
                        .create_flipper(pivot_x, c.y, rect.width, rect.height, side, &tuning.flipper)
                        .map(|flipper| {
                            register(roles, flipper.arm, Role::Flipper);
                            flippers.push(flipper);
                        })
                }
                RectRole::Wall => world
                    .create_box(c.x, c.y, rect.width, rect.height, BodyKind::Static)
                    .map(drop),
                RectRole::Bumper => {
                    let radius = rect.width.min(rect.height) * 0.5;
                    world
                        .create_circle(c.x, c.y, radius, BodyKind::Static)
                        .map(|bumper| {
                            world.set_restitution(&bumper, tuning.physics.bumper_restitution);
                            world.set_listener(&bumper, Listener::Bumper);
                            register(roles, bumper, Role::Bumper);
                            bumpers.push(bumper);
                        })
                }
                RectRole::Target | RectRole::SpecialTarget => {
                    let role = if rect.role == RectRole::Target {
                        Role::Target
                    } else {
                        Role::SpecialTarget
                    };
                    world
                        .create_box(c.x, c.y, rect.width, rect.height, BodyKind::Static)
                        .map(|target| register(roles, target, role))
                }
                RectRole::BlackHole => {
                    let radius = rect.width.min(rect.height) * 0.5;
                    world
                        .create_circle_sensor(c.x, c.y, radius)
                        .map(|hole| register(roles, hole, Role::BlackHole))
                }
                RectRole::LossSensor => world
                    .create_box_sensor(c.x, c.y, rect.width, rect.height)
                    .map(|sensor| {
                        register(roles, sensor, Role::LossSensor);
                        loss_line = Some(loss_line.map_or(rect.y, |y: f32| y.min(rect.y)));
                    }),
            };
            if let Err(e) = built {
                log::warn!("Skipping {:?} at ({}, {}): {}", rect.role, rect.x, rect.y, e);
            }
        }

        for chain in &geometry.chains {
            let built = if chain.closed {
                world
                    .create_polygon_loop(chain.origin.x, chain.origin.y, &chain.points, chain.rotation)
                    .map(|poly| {
                        if chain.special {
                            register(roles, poly, Role::SpecialPolygon);
                        }
                    })
            } else {
                world
                    .create_chain(chain.origin.x, chain.origin.y, &chain.points)
                    .map(drop)
            };
            if let Err(e) = built {
                log::warn!("Skipping chain at {:?}: {}", chain.origin, e);
            }
        }

        let ball = world.create_circle(launch_point.x, launch_point.y, BALL_RADIUS, BodyKind::Dynamic)?;
        world.set_listener(&ball, Listener::Ball);

        log::info!(
            "Table built: {} bodies, {} flippers, {} bumpers",
            world.body_count(),
            flippers.len(),
            bumpers.len()
        );

        Ok(Self {
            ball,
            launch_point,
            flippers,
            bumpers,
            loss_line,
            spawn_region,
        })
    }
}

fn register(roles: &mut CollisionRoles, handle: BodyHandle, role: Role) {
    if let Err(e) = roles.register(handle, role) {
        log::warn!("Role {:?} not registered: {}", role, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(geometry: &TableGeometry) -> (PhysicsWorld, CollisionRoles, Table) {
        let tuning = Tuning::default();
        let mut world = PhysicsWorld::new(&tuning.physics, TABLE_HEIGHT);
        let mut roles = CollisionRoles::new();
        let table = Table::build(geometry, &mut world, &mut roles, &tuning).unwrap();
        (world, roles, table)
    }

    #[test]
    fn test_default_table_registers_every_role() {
        let (world, roles, table) = build(&TableGeometry::default_table());
        assert_eq!(table.flippers.len(), 2);
        assert_eq!(table.bumpers.len(), 3);
        assert_eq!(roles.members(Role::Bumper).len(), 3);
        assert_eq!(roles.members(Role::Target).len(), 2);
        assert_eq!(roles.members(Role::SpecialTarget).len(), 1);
        assert_eq!(roles.members(Role::BlackHole).len(), 1);
        assert_eq!(roles.members(Role::LossSensor).len(), 1);
        assert_eq!(roles.members(Role::SpecialPolygon).len(), 1);
        assert_eq!(roles.members(Role::Flipper).len(), 2);
        assert_eq!(table.loss_line, Some(960.0));
        assert_eq!(world.listener(&table.ball), Some(Listener::Ball));
        assert_eq!(world.listener(&table.bumpers[0]), Some(Listener::Bumper));

        let ball = world.position(&table.ball).unwrap();
        assert!((ball - Vec2::new(550.0, 890.0)).length() < 1e-3);
    }

    #[test]
    fn test_broken_features_are_skipped() {
        let geometry = TableGeometry {
            source_size: Vec2::new(TABLE_WIDTH, TABLE_HEIGHT),
            rects: vec![
                TaggedRect {
                    x: 100.0,
                    y: 100.0,
                    width: 0.0,
                    height: 40.0,
                    role: RectRole::Bumper,
                },
                TaggedRect {
                    x: 300.0,
                    y: 100.0,
                    width: 40.0,
                    height: 40.0,
                    role: RectRole::Bumper,
                },
            ],
            chains: vec![PointChain {
                origin: Vec2::ZERO,
                points: vec![Vec2::new(10.0, 10.0)],
                closed: false,
                rotation: 0.0,
                special: false,
            }],
        };
        let (_world, roles, table) = build(&geometry);
        assert_eq!(table.bumpers.len(), 1);
        assert_eq!(roles.members(Role::Bumper).len(), 1);
        assert!(table.loss_line.is_none());
    }

    #[test]
    fn test_scaling_maps_source_to_logical_size() {
        let geometry = TableGeometry {
            source_size: Vec2::new(300.0, 500.0),
            rects: vec![TaggedRect {
                x: 10.0,
                y: 20.0,
                width: 30.0,
                height: 40.0,
                role: RectRole::Target,
            }],
            chains: vec![PointChain {
                origin: Vec2::new(5.0, 5.0),
                points: vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 50.0)],
                closed: false,
                rotation: 0.0,
                special: false,
            }],
        };
        let scaled = geometry.scaled_to(Vec2::new(600.0, 1000.0));
        assert_eq!(scaled.source_size, Vec2::new(600.0, 1000.0));
        assert_eq!(scaled.rects[0].x, 20.0);
        assert_eq!(scaled.rects[0].height, 80.0);
        assert_eq!(scaled.chains[0].origin, Vec2::new(10.0, 10.0));
        assert_eq!(scaled.chains[0].points[1], Vec2::new(200.0, 100.0));
    }

    #[test]
    fn test_geometry_loads_from_json() {
        let json = r#"{
            "source_size": [600.0, 1000.0],
            "rects": [
                { "x": 0.0, "y": 950.0, "width": 600.0, "height": 50.0, "role": "LossSensor" }
            ]
        }"#;
        let geometry = TableGeometry::from_json(json).unwrap();
        assert_eq!(geometry.rects[0].role, RectRole::LossSensor);
        assert!(geometry.chains.is_empty());
    }
}
