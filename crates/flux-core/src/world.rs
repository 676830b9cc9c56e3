// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Simulation context: owns the object list and every broad-phase structure.

use flux_geom::{
    BroadPhase, BruteForce, BuildReport, Bvh, CapacityError, SpatialHash, SweepAndPrune,
};
use tracing::{debug, instrument, warn};

use crate::body::RigidBody;
use crate::config::{BroadPhaseKind, PhysicsConfig};
use crate::error::ConfigError;
use crate::integrator::{apply_constraints, integrate_with_limit};
use crate::object::{ObjectKind, ObjectList, PhysicsObject};
use crate::response::{respond, ResponseParams};

/// A candidate pair handed to the contact callback.
///
/// Both bodies are borrowed mutably, so gameplay code can apply damage,
/// despawn flags, or its own impulses before or instead of [`Contact::respond`].
#[derive(Debug)]
pub struct Contact<'a> {
    /// First body of the pair.
    pub a: &'a mut RigidBody,
    /// Second body of the pair.
    pub b: &'a mut RigidBody,
    /// Role of `a`.
    pub kind_a: ObjectKind,
    /// Role of `b`.
    pub kind_b: ObjectKind,
    /// Index of `a` in the body slice.
    pub body_a: usize,
    /// Index of `b` in the body slice.
    pub body_b: usize,
    params: ResponseParams,
}

impl Contact<'_> {
    /// Runs the default impulse response for the two shapes.
    ///
    /// Returns the closing speed, or `0.0` if nothing was applied.
    pub fn respond(&mut self) -> f32 {
        respond(self.a, self.b, &self.params)
    }

    /// `true` when either side has role `kind`.
    pub fn involves(&self, kind: ObjectKind) -> bool {
        self.kind_a == kind || self.kind_b == kind
    }
}

/// Counters for one [`PhysicsWorld::step`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Bodies integrated this tick.
    pub integrated: usize,
    /// Registrations discarded for pointing past the body slice.
    pub skipped: usize,
    /// Pairs handed to the contact callback.
    pub candidate_pairs: usize,
    /// Proxies the broad phase dropped for lack of capacity.
    pub dropped: usize,
}

/// Builds `broad` over `objects` and hands every pair of distinct bodies to
/// `on_contact`. Returns the build report and the number of callbacks made.
fn stream_contacts<B, F>(
    broad: &mut B,
    objects: &[PhysicsObject],
    bodies: &mut [RigidBody],
    params: ResponseParams,
    on_contact: &mut F,
) -> (BuildReport, usize)
where
    B: BroadPhase,
    F: FnMut(&mut Contact<'_>),
{
    let report = broad.build(objects);
    let mut calls = 0;
    broad.for_each_pair(objects, |i, j| {
        let (oa, ob) = (&objects[i], &objects[j]);
        // Same body registered twice, or stale index: nothing to resolve.
        let Ok([a, b]) = bodies.get_disjoint_mut([oa.body(), ob.body()]) else {
            return;
        };
        calls += 1;
        on_contact(&mut Contact {
            a,
            b,
            kind_a: oa.kind(),
            kind_b: ob.kind(),
            body_a: oa.body(),
            body_b: ob.body(),
            params,
        });
    });
    (report, calls)
}

/// Owns per-tick physics state. Bodies stay with the caller.
#[derive(Debug)]
pub struct PhysicsWorld {
    config: PhysicsConfig,
    objects: ObjectList,
    bvh: Bvh,
    hash: SpatialHash,
    sap: SweepAndPrune,
    brute: BruteForce,
    integrated: Vec<usize>,
}

impl PhysicsWorld {
    /// Validates `config` and allocates every structure at its capacity.
    pub fn new(config: PhysicsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let max = config.max_objects;
        Ok(Self {
            objects: ObjectList::new(max),
            bvh: Bvh::with_leaf_size(max, config.bvh_leaf_size),
            hash: SpatialHash::new(
                max,
                config.hash_cell_size,
                config.hash_table_size,
                config.hash_bucket_capacity,
            ),
            sap: SweepAndPrune::new(max),
            brute: BruteForce::new(max),
            integrated: Vec::with_capacity(max),
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Switches the broad-phase strategy for subsequent steps.
    pub fn set_broad_phase(&mut self, kind: BroadPhaseKind) {
        self.config.broad_phase = kind;
    }

    /// Registered objects.
    pub fn objects(&self) -> &ObjectList {
        &self.objects
    }

    /// Registers `body` (an index into the slice passed to `step`).
    pub fn register(&mut self, body: usize, kind: ObjectKind) -> Result<(), CapacityError> {
        self.objects.push(body, kind)
    }

    /// Drops every registration, typically at the start of a tick.
    pub fn clear_objects(&mut self) {
        self.objects.clear();
    }

    /// Advances one tick.
    ///
    /// Integrates and constrains each registered body once, refreshes its
    /// bounds, rebuilds the configured broad phase, and calls `on_contact`
    /// for every overlapping pair of distinct bodies. Registrations whose
    /// index is past `bodies` are logged and removed.
    #[instrument(level = "debug", skip_all, fields(strategy = ?self.config.broad_phase, dt = dt))]
    pub fn step<F>(&mut self, bodies: &mut [RigidBody], dt: f32, mut on_contact: F) -> StepStats
    where
        F: FnMut(&mut Contact<'_>),
    {
        let mut stats = StepStats::default();

        let count = bodies.len();
        let before = self.objects.len();
        self.objects.retain(|o| o.body() < count);
        stats.skipped = before - self.objects.len();
        if stats.skipped > 0 {
            warn!(skipped = stats.skipped, bodies = count, "stale body indices skipped");
        }

        let max_dt = self.config.max_dt;
        let limits = self.config.constraints();
        // Distinct body indices, bounded by the object list rather than `bodies`.
        self.integrated.clear();
        self.integrated.extend(self.objects.iter().map(PhysicsObject::body));
        self.integrated.sort_unstable();
        self.integrated.dedup();
        for &idx in &self.integrated {
            let body = &mut bodies[idx];
            integrate_with_limit(body, dt, max_dt);
            apply_constraints(body, &limits);
        }
        stats.integrated = self.integrated.len();
        for obj in self.objects.iter_mut() {
            obj.set_bounds(bodies[obj.body()].world_aabb());
        }

        let params = self.config.response;
        let objects = self.objects.as_slice();
        let (report, calls) = match self.config.broad_phase {
            BroadPhaseKind::Bvh => {
                stream_contacts(&mut self.bvh, objects, bodies, params, &mut on_contact)
            }
            BroadPhaseKind::SpatialHash => {
                stream_contacts(&mut self.hash, objects, bodies, params, &mut on_contact)
            }
            BroadPhaseKind::SweepAndPrune => {
                stream_contacts(&mut self.sap, objects, bodies, params, &mut on_contact)
            }
            BroadPhaseKind::BruteForce => {
                stream_contacts(&mut self.brute, objects, bodies, params, &mut on_contact)
            }
        };
        stats.dropped = report.dropped;
        stats.candidate_pairs = calls;

        debug!(
            integrated = stats.integrated,
            pairs = stats.candidate_pairs,
            dropped = stats.dropped,
            "step complete"
        );
        stats
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use flux_math::Vec3;

    fn world(kind: BroadPhaseKind) -> PhysicsWorld {
        PhysicsWorld::new(PhysicsConfig {
            max_objects: 16,
            broad_phase: kind,
            ..PhysicsConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = PhysicsConfig {
            max_objects: 0,
            ..PhysicsConfig::default()
        };
        assert!(PhysicsWorld::new(cfg).is_err());
        let cfg = PhysicsConfig {
            max_objects: usize::MAX / 2,
            ..PhysicsConfig::default()
        };
        assert!(PhysicsWorld::new(cfg).is_err());
    }

    #[test]
    fn stale_index_is_skipped() {
        let mut w = world(BroadPhaseKind::Bvh);
        let mut bodies = vec![RigidBody::sphere(1.0, 1.0, Vec3::ZERO).unwrap()];
        w.register(0, ObjectKind::Player).unwrap();
        w.register(7, ObjectKind::Projectile).unwrap();
        let stats = w.step(&mut bodies, 0.01, |_| {});
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.integrated, 1);
        assert_eq!(w.objects().len(), 1);
    }

    #[test]
    fn duplicate_registration_integrates_once_and_never_self_collides() {
        let mut w = world(BroadPhaseKind::BruteForce);
        let mut bodies = vec![RigidBody::sphere(1.0, 1.0, Vec3::ZERO)
            .unwrap()
            .with_velocity(Vec3::UNIT_X)];
        w.register(0, ObjectKind::Field).unwrap();
        w.register(0, ObjectKind::Field).unwrap();
        let mut calls = 0;
        let stats = w.step(&mut bodies, 0.01, |_| calls += 1);
        assert_eq!(stats.integrated, 1);
        assert_eq!(calls, 0);
        assert!((bodies[0].position.x() - 0.01).abs() < 1e-7);
    }

    #[test]
    fn contact_reports_kinds_and_indices() {
        let mut w = world(BroadPhaseKind::SweepAndPrune);
        let mut bodies = vec![
            RigidBody::sphere(1.0, 1.0, Vec3::new(-0.5, 0.0, 0.0)).unwrap(),
            RigidBody::sphere(1.0, 1.0, Vec3::new(0.5, 0.0, 0.0)).unwrap(),
        ];
        w.register(1, ObjectKind::Projectile).unwrap();
        w.register(0, ObjectKind::Player).unwrap();
        let mut seen = Vec::new();
        w.step(&mut bodies, 0.0, |c| {
            assert!(c.involves(ObjectKind::Projectile));
            seen.push(((c.body_a, c.kind_a), (c.body_b, c.kind_b)));
        });
        assert_eq!(seen.len(), 1);
        let ((ia, ka), (ib, kb)) = seen[0];
        let mut pairs = [(ia, ka), (ib, kb)];
        pairs.sort_by_key(|p| p.0);
        assert_eq!(pairs, [(0, ObjectKind::Player), (1, ObjectKind::Projectile)]);
    }

    #[test]
    fn scratch_buffers_stay_within_object_capacity() {
        let mut w = world(BroadPhaseKind::SpatialHash);
        let mut bodies = vec![RigidBody::sphere(1.0, 1.0, Vec3::ZERO).unwrap(); 10_000];
        bodies[9_999].velocity = Vec3::UNIT_X;
        w.register(9_999, ObjectKind::Player).unwrap();
        w.register(9_999, ObjectKind::Player).unwrap();
        let stats = w.step(&mut bodies, 0.01, |_| {});
        assert_eq!(stats.integrated, 1);
        assert!(w.integrated.capacity() <= 16);
        assert!((bodies[9_999].position.x() - 0.01).abs() < 1e-7);
        assert_eq!(bodies[0].position, Vec3::ZERO);
    }
}
