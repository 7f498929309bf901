//! The simulation kernel: one game session's world and its turn loop.
//!
//! EXECUTION ORDER for one input line (fixed, never reordered):
//!   1. Parse the line into a player command.
//!   2. The player acts; the command's effect lands and yields a delay.
//!   3. push_pop the player's next turn; the result is who acts next.
//!   4. Until that is the player again, the actor acts and is push_pop'd.
//!   5. Report what the player can now see.
//!
//! RULES:
//!   - A line is processed to completion before the next is accepted.
//!   - All randomness flows through the session's single GameRng.
//!   - Output for a line is returned in full; nothing is emitted later.

use crate::{
    actor::{act_autonomous, ActorKind, ActorRegistry},
    cave_generator::CaveGenerator,
    command::PlayerCommand,
    config::{GameConfig, TileReporting},
    error::{SimError, SimResult},
    event::{GameEvent, TileKind},
    hex::Pos,
    level::Level,
    rng::{GameRng, Seed},
    schedule::Schedule,
    types::{ActorId, Tick},
    visibility::field_of_view,
};
use std::collections::HashSet;

pub struct SimEngine {
    seed: Seed,
    config: GameConfig,
    rng: GameRng,
    level: Level,
    schedule: Schedule,
    actors: ActorRegistry,
    player: ActorId,
    depth: u32,
    /// Tiles already sent on this floor.
    reported: HashSet<Pos>,
}

impl SimEngine {
    /// Start a session: validate the config, generate the first floor
    /// and place the player on its start cell.
    pub fn new(seed: impl Into<Seed>, config: GameConfig) -> SimResult<Self> {
        config.validate()?;
        let seed = seed.into();
        let mut rng = GameRng::new(&seed);
        let level = generate_level(&config, &mut rng)?;

        let mut actors = ActorRegistry::new();
        let player = actors.spawn(ActorKind::Player, config.player_delay, level.start());

        let mut engine = Self {
            seed,
            config,
            rng,
            level,
            schedule: Schedule::new(),
            actors,
            player,
            depth: 1,
            reported: HashSet::new(),
        };
        engine.populate_floor();
        log::info!(
            "session start: seed={} player={} start={}",
            engine.seed,
            engine.player,
            engine.level.start()
        );
        Ok(engine)
    }

    /// Process one command line and return the output lines it produced.
    pub fn input(&mut self, line: &str) -> SimResult<Vec<String>> {
        Ok(self.input_events(line)?.iter().map(GameEvent::to_string).collect())
    }

    /// Process one command line and return its output as events.
    pub fn input_events(&mut self, line: &str) -> SimResult<Vec<GameEvent>> {
        let line = line.trim();
        let mut out = Vec::new();

        let (delay, full_report) = match line.parse::<PlayerCommand>() {
            Ok(command) => {
                out.push(GameEvent::Accepted { line: line.to_string() });
                self.act_player(command, &mut out)?
            }
            Err(SimError::MalformedCommand { reason, .. }) => {
                log::warn!("player {}: {reason}", self.player);
                out.push(GameEvent::Rejected { line: line.to_string() });
                (self.player_delay(), false)
            }
            Err(e) => return Err(e),
        };

        let drained = self.resolve_world(delay);
        log::debug!(
            "command '{line}' done: delay={delay} others_acted={drained} time={}",
            self.schedule.time()
        );

        self.report_view(full_report, &mut out);
        Ok(out)
    }

    /// Report the current view without spending a turn. Used to send the
    /// opening screen of a session.
    pub fn look(&mut self) -> Vec<GameEvent> {
        let mut out = Vec::new();
        self.report_view(false, &mut out);
        out
    }

    /// Apply the player's command. Returns the turn cost and whether the
    /// full visible set should be resent.
    fn act_player(
        &mut self,
        command: PlayerCommand,
        out: &mut Vec<GameEvent>,
    ) -> SimResult<(Tick, bool)> {
        let delay = self.player_delay();
        match command {
            PlayerCommand::Move { direction } => {
                let from = self.player_pos();
                let to = from + direction.offset();
                if !self.level.is_passable(to) {
                    log::debug!("player {}: move {from} -> {to} blocked by wall", self.player);
                } else if let Some(other) = self.actors.occupant(to) {
                    log::debug!("player {}: bumped into actor {other} at {to}", self.player);
                } else if let Some(player) = self.actors.get_mut(self.player) {
                    player.pos = to;
                }
                Ok((delay, false))
            }
            PlayerCommand::Wait => Ok((delay, false)),
            PlayerCommand::Look => Ok((delay, true)),
            PlayerCommand::Descend => {
                self.descend()?;
                out.push(GameEvent::Depth { depth: self.depth });
                Ok((delay, false))
            }
        }
    }

    /// Let every other actor whose turn falls before the player's next
    /// one take it. Returns how many turns were taken.
    fn resolve_world(&mut self, player_delay: Tick) -> usize {
        let mut taken = 0;
        let mut next = self.schedule.push_pop(self.player, player_delay);
        while next != self.player {
            let kind = self.actors.get(next).map(|a| a.kind.clone());
            next = match kind {
                Some(ActorKind::Autonomous { .. }) => {
                    taken += 1;
                    match act_autonomous(next, &mut self.actors, &self.level, &mut self.rng) {
                        Some(delay) => self.schedule.push_pop(next, delay),
                        None => match self.schedule.pop() {
                            Some(id) => id,
                            None => break,
                        },
                    }
                }
                // Stale entry for an actor that no longer exists, or a
                // second player this kernel does not drive.
                _ => match self.schedule.pop() {
                    Some(id) => id,
                    None => break,
                },
            };
        }
        taken
    }

    /// Replace the floor and the schedule. The player, the actor id
    /// counter and the random stream carry over.
    pub fn descend(&mut self) -> SimResult<()> {
        self.config.validate()?;
        self.level = generate_level(&self.config, &mut self.rng)?;
        self.schedule = Schedule::new();
        self.actors.retain_players();
        self.reported.clear();
        self.depth += 1;

        let start = self.level.start();
        if let Some(player) = self.actors.get_mut(self.player) {
            player.pos = start;
        }
        self.populate_floor();
        log::info!("player {} descended to depth {} at {start}", self.player, self.depth);
        Ok(())
    }

    /// Spawn this floor's wanderers on random free floor cells and put
    /// them on the schedule.
    fn populate_floor(&mut self) {
        for _ in 0..self.config.mobs_per_level {
            let free: Vec<Pos> = self
                .level
                .floor_positions()
                .into_iter()
                .filter(|&p| !self.actors.is_occupied(p))
                .collect();
            let Some(&pos) = self.rng.choose(&free) else {
                log::warn!("depth {}: no free floor left for wanderers", self.depth);
                break;
            };
            let Some(species) = self.rng.choose(&self.config.species).cloned() else {
                break;
            };
            let id = self.actors.spawn(
                ActorKind::Autonomous { species: species.name.clone() },
                species.delay,
                pos,
            );
            self.schedule.push(id, species.delay);
            log::debug!("depth {}: spawned {} #{id} at {pos}", self.depth, species.name);
        }
    }

    /// Append tile discoveries for the player's visible set, in row-major
    /// order.
    fn report_view(&mut self, full: bool, out: &mut Vec<GameEvent>) {
        let full = full || self.config.tile_reporting == TileReporting::Full;
        let mut tiles: Vec<Pos> = self
            .visible()
            .into_iter()
            .filter(|&p| self.level.shape().contains(p))
            .collect();
        tiles.sort_by_key(|p| (p.y, p.x));

        for pos in tiles {
            let fresh = self.reported.insert(pos);
            if fresh || full {
                let kind = if self.level.is_passable(pos) {
                    TileKind::Floor
                } else {
                    TileKind::Wall
                };
                out.push(GameEvent::NewTile { kind, pos });
            }
        }
    }

    /// Cells the player can currently see.
    pub fn visible(&self) -> HashSet<Pos> {
        field_of_view(self.player_pos(), |p| self.level.is_passable(p))
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn actors(&self) -> &ActorRegistry {
        &self.actors
    }

    pub fn player_id(&self) -> ActorId {
        self.player
    }

    pub fn player_pos(&self) -> Pos {
        self.actors
            .get(self.player)
            .map(|a| a.pos)
            .unwrap_or_else(|| self.level.start())
    }

    pub fn player_delay(&self) -> Tick {
        self.actors
            .get(self.player)
            .map(|a| a.delay)
            .unwrap_or(self.config.player_delay)
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn time(&self) -> Tick {
        self.schedule.time()
    }
}

fn generate_level(config: &GameConfig, rng: &mut GameRng) -> SimResult<Level> {
    CaveGenerator::new(config.shape()?)
        .with_min_cave_fraction(config.min_cave_fraction)
        .with_max_attempts(config.max_generation_attempts)
        .generate(rng, config.start_pos()?)
}
