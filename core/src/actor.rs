//! Actors and the per-session actor registry.
//!
//! The registry is an arena keyed by ids from a per-session counter.
//! Anything that needs to look up an actor is handed the registry
//! explicitly; there is no global actor table.

use crate::{
    hex::Pos,
    level::Level,
    rng::GameRng,
    types::{ActorId, Tick},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A kind of autonomous creature and what its turn costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    pub delay: Tick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorKind {
    /// Driven by command input.
    Player,
    /// Driven by its own `act`.
    Autonomous { species: String },
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub delay: Tick,
    pub pos: Pos,
}

impl Actor {
    pub fn is_player(&self) -> bool {
        self.kind == ActorKind::Player
    }
}

#[derive(Debug, Default)]
pub struct ActorRegistry {
    actors: BTreeMap<ActorId, Actor>,
    next_id: ActorId,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self {
            actors: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Register a new actor and return its id. Ids are never reused.
    pub fn spawn(&mut self, kind: ActorKind, delay: Tick, pos: Pos) -> ActorId {
        let id = self.next_id;
        self.next_id += 1;
        self.actors.insert(id, Actor { id, kind, delay, pos });
        id
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// Drop every autonomous actor, keeping players. Used when the old
    /// floor's inhabitants are left behind.
    pub fn retain_players(&mut self) {
        self.actors.retain(|_, actor| actor.is_player());
    }

    pub fn is_occupied(&self, pos: Pos) -> bool {
        self.actors.values().any(|a| a.pos == pos)
    }

    /// The actor standing on `pos`, if any.
    pub fn occupant(&self, pos: Pos) -> Option<ActorId> {
        self.actors.values().find(|a| a.pos == pos).map(|a| a.id)
    }

    /// Actors in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

/// An autonomous actor's turn: step to a random open neighbour, or stay
/// put when boxed in. Returns the delay until its next turn.
pub fn act_autonomous(
    id: ActorId,
    actors: &mut ActorRegistry,
    level: &Level,
    rng: &mut GameRng,
) -> Option<Tick> {
    let actor = actors.get(id)?;
    let delay = actor.delay;
    let options: Vec<Pos> = actor
        .pos
        .neighbors()
        .filter(|&n| level.is_passable(n) && !actors.is_occupied(n))
        .collect();

    if let Some(&target) = rng.choose(&options) {
        if let Some(actor) = actors.get_mut(id) {
            log::trace!("actor {id}: {} -> {target}", actor.pos);
            actor.pos = target;
        }
    }
    Some(delay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cave_generator::CaveGenerator, level::Shape, rng::Seed};

    #[test]
    fn ids_start_at_one_and_are_not_reused() {
        let mut actors = ActorRegistry::new();
        let a = actors.spawn(ActorKind::Player, 12, Pos::new(1, 1));
        let b = actors.spawn(ActorKind::Autonomous { species: "rat".into() }, 8, Pos::new(2, 1));
        assert_eq!((a, b), (1, 2));

        actors.retain_players();
        let c = actors.spawn(ActorKind::Autonomous { species: "bat".into() }, 6, Pos::new(3, 1));
        assert_eq!(c, 3);
        assert_eq!(actors.len(), 2);
    }

    #[test]
    fn occupant_finds_who_stands_on_a_cell() {
        let mut actors = ActorRegistry::new();
        let player = actors.spawn(ActorKind::Player, 12, Pos::new(4, 4));
        let rat = actors.spawn(ActorKind::Autonomous { species: "rat".into() }, 8, Pos::new(5, 4));

        assert_eq!(actors.occupant(Pos::new(4, 4)), Some(player));
        assert_eq!(actors.occupant(Pos::new(5, 4)), Some(rat));
        assert_eq!(actors.occupant(Pos::new(6, 4)), None);
        assert!(actors.is_occupied(Pos::new(5, 4)));
    }

    #[test]
    fn wanderer_steps_onto_free_floor_and_returns_its_delay() {
        let shape = Shape::new(21, 21).expect("valid shape");
        let mut rng = GameRng::new(&Seed::from(42u64));
        let level = CaveGenerator::new(shape)
            .generate(&mut rng, Pos::new(10, 10))
            .expect("generation");

        let mut actors = ActorRegistry::new();
        let start = level.start();
        let id = actors.spawn(ActorKind::Autonomous { species: "rat".into() }, 8, start);
        for _ in 0..20 {
            assert_eq!(act_autonomous(id, &mut actors, &level, &mut rng), Some(8));
            let pos = actors.get(id).map(|a| a.pos).expect("actor");
            assert!(level.is_passable(pos), "wanderer left the floor at {pos}");
        }
        assert_eq!(act_autonomous(99, &mut actors, &level, &mut rng), None);
    }
}
