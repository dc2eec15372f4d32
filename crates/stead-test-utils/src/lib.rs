//! Test utilities and mock types for Stead development.
//!
//! Provides mock implementations of the host collaborator traits
//! ([`TickSource`], [`ActorAdapter`], [`EntityAdapter`]) and a small
//! store builder for setting up claim scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::Cell;
use std::rc::Rc;

use stead_claims::ClaimStore;
use stead_core::{ActorAdapter, Dimension, EntityAdapter, TickId, TickSource};

/// A hand-driven tick source.
///
/// Clones share the underlying counter, so a test can hand one clone
/// to the code under test and keep another to advance time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    tick: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the counter to an absolute tick.
    pub fn set(&self, tick: u64) {
        self.tick.set(tick);
    }

    /// Advance the counter by one tick.
    pub fn advance(&self) {
        self.tick.set(self.tick.get() + 1);
    }
}

impl TickSource for ManualClock {
    fn current_tick(&self) -> TickId {
        TickId(self.tick.get())
    }
}

/// A scripted actor with a fixed name, position, and dimension.
#[derive(Clone, Debug)]
pub struct TestActor {
    pub name: String,
    pub position: (i32, i32, i32),
    pub dimension: Dimension,
}

impl TestActor {
    /// An actor at the origin of the overworld.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: (0, 64, 0),
            dimension: Dimension::Overworld,
        }
    }

    pub fn at(mut self, x: i32, y: i32, z: i32) -> Self {
        self.position = (x, y, z);
        self
    }

    pub fn in_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = dimension;
        self
    }
}

impl ActorAdapter for TestActor {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> (i32, i32, i32) {
        self.position
    }

    fn dimension(&self) -> Dimension {
        self.dimension
    }
}

/// A scripted damage victim for exercising the kill-passive gate.
#[derive(Clone, Debug)]
pub struct TestEntity {
    pub player: bool,
    pub families: Vec<String>,
    pub type_id: String,
}

impl TestEntity {
    /// A player victim.
    pub fn player() -> Self {
        Self {
            player: true,
            families: Vec::new(),
            type_id: String::from("minecraft:player"),
        }
    }

    /// A non-player victim with the given type identifier and no
    /// family tags.
    pub fn mob(type_id: impl Into<String>) -> Self {
        Self {
            player: false,
            families: Vec::new(),
            type_id: type_id.into(),
        }
    }

    pub fn with_families(mut self, families: &[&str]) -> Self {
        self.families = families.iter().map(|s| s.to_string()).collect();
        self
    }
}

impl EntityAdapter for TestEntity {
    fn is_player(&self) -> bool {
        self.player
    }

    fn families(&self) -> Vec<String> {
        self.families.clone()
    }

    fn type_id(&self) -> &str {
        &self.type_id
    }
}

/// Populate a store with `n` well-separated claims for one owner.
///
/// Claims land on a row along the x axis, far enough apart that none
/// of them overlap or buffer-conflict at the default rules.
pub fn row_of_claims(store: &mut ClaimStore, owner: &str, n: usize, dimension: Dimension) {
    for i in 0..n {
        store.create_claim(owner, (i as i32) * 10_000, 64, 0, 100, dimension, 200);
    }
}
