//! Epoch-level evolution: spawn, simulate, rank, select, persist.
//!
//! [`Evolution`] is a state machine. Each call to [`Evolution::advance`]
//! executes one step of
//!
//! ```text
//! LoadChampion → SpawnGeneration → RunEpoch (× epoch_length) → Rank
//!     → SelectSurvivors → PersistChampion → SpawnGeneration → …
//! ```
//!
//! and ends in `Terminated` after `max_epochs` epochs or when the renderer
//! reports a quit request. A quit during an epoch discards that epoch
//! entirely; nothing is persisted for it.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::agent::Agent;
use super::brain::Network;
use super::champion::ChampionStore;
use super::clock::{Clock, FixedClock, WallClock};
use super::error::{NetworkError, SimulationError};
use super::history::{EpochHistory, EpochSummary};
use super::params::Params;
use super::renderer::Renderer;
use super::world::World;

/// Step of the evolution state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Read the stored champion, if any.
    LoadChampion,
    /// Build the next population.
    SpawnGeneration,
    /// Simulate one tick of the current epoch.
    RunEpoch,
    /// Order the surviving agents by cost.
    Rank,
    /// Turn the ranking into the next spawn pool.
    SelectSurvivors,
    /// Store the best network of the epoch.
    PersistChampion,
    /// The loop has stopped.
    Terminated(Termination),
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The configured number of epochs ran.
    Completed,
    /// The operator asked to quit.
    Cancelled,
}

/// A ranked network carried into the next epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivorRecord {
    /// Cost accumulated during the epoch.
    pub cost: f32,
    /// Network in the flat text format.
    pub network: String,
}

/// Drives epochs of the arena simulation and the selection between them.
pub struct Evolution {
    params: Params,
    store: ChampionStore,
    rng: StdRng,
    clock: Box<dyn Clock>,
    world: World,
    phase: Phase,
    epoch: u32,
    ranked: Vec<SurvivorRecord>,
    survivors: Vec<SurvivorRecord>,
    history: EpochHistory,
    epoch_started: DateTime<Utc>,
    inspected: Option<usize>,
}

impl Evolution {
    /// Validates `params` and prepares a loop that starts by loading the champion.
    ///
    /// The random source is seeded from `params.seed` when set; the clock is
    /// fixed when `params.fixed_dt` is set and wall-clock otherwise.
    pub fn new(params: Params) -> Result<Self, SimulationError> {
        params.validate()?;

        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let clock: Box<dyn Clock> = match params.fixed_dt {
            Some(dt) => Box::new(FixedClock(dt)),
            None => Box::new(WallClock::new()),
        };

        Ok(Self {
            store: ChampionStore::new(params.champion_path.clone()),
            params,
            rng,
            clock,
            world: World::new(),
            phase: Phase::LoadChampion,
            epoch: 0,
            ranked: Vec::new(),
            survivors: Vec::new(),
            history: EpochHistory::new(),
            epoch_started: Utc::now(),
            inspected: None,
        })
    }

    /// Replaces the tick clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Active parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Current arena state.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Step that the next call to [`advance`](Self::advance) executes.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of completed epochs.
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Spawn pool selected at the end of the last completed epoch.
    pub fn survivors(&self) -> &[SurvivorRecord] {
        &self.survivors
    }

    /// Statistics of every completed epoch.
    pub fn history(&self) -> &EpochHistory {
        &self.history
    }

    /// Champion store used by this loop.
    pub fn store(&self) -> &ChampionStore {
        &self.store
    }

    /// Selects the agent whose network is passed to [`Renderer::show_network`].
    pub fn set_inspected(&mut self, id: Option<usize>) {
        self.inspected = id;
    }

    /// The inspected agent, falling back to the first live agent.
    pub fn inspected_agent(&self) -> Option<&Agent> {
        self.inspected
            .and_then(|id| self.world.agent(id))
            .or_else(|| self.world.agents.first())
    }

    /// Executes the current phase and returns the phase that follows.
    pub fn advance(&mut self, renderer: &mut dyn Renderer) -> Result<Phase, SimulationError> {
        let next = match self.phase {
            Phase::LoadChampion => {
                self.load_champion();
                Phase::SpawnGeneration
            }
            Phase::SpawnGeneration => {
                self.spawn_generation()?;
                Phase::RunEpoch
            }
            Phase::RunEpoch => self.run_tick(renderer)?,
            Phase::Rank => {
                self.rank()?;
                Phase::SelectSurvivors
            }
            Phase::SelectSurvivors => {
                self.survivors = std::mem::take(&mut self.ranked);
                Phase::PersistChampion
            }
            Phase::PersistChampion => {
                self.persist_champion();
                self.epoch += 1;
                if self.params.max_epochs.is_some_and(|max| self.epoch >= max) {
                    info!(epochs = self.epoch, "evolution complete");
                    Phase::Terminated(Termination::Completed)
                } else if renderer.poll_quit() {
                    info!(epochs = self.epoch, "evolution cancelled between epochs");
                    Phase::Terminated(Termination::Cancelled)
                } else {
                    Phase::SpawnGeneration
                }
            }
            Phase::Terminated(reason) => Phase::Terminated(reason),
        };
        self.phase = next;
        Ok(next)
    }

    /// Advances until one simulation tick ran or the loop terminated.
    pub fn advance_frame(&mut self, renderer: &mut dyn Renderer) -> Result<Phase, SimulationError> {
        loop {
            let ticked = self.phase == Phase::RunEpoch;
            let next = self.advance(renderer)?;
            if ticked || matches!(next, Phase::Terminated(_)) {
                return Ok(next);
            }
        }
    }

    /// Runs the loop to termination, pausing `epoch_pause_ms` between epochs.
    pub fn run(&mut self, renderer: &mut dyn Renderer) -> Result<Termination, SimulationError> {
        loop {
            match self.advance(renderer)? {
                Phase::Terminated(reason) => return Ok(reason),
                Phase::SpawnGeneration if self.epoch > 0 && self.params.epoch_pause_ms > 0 => {
                    std::thread::sleep(Duration::from_millis(self.params.epoch_pause_ms));
                }
                _ => {}
            }
        }
    }

    fn load_champion(&mut self) {
        match self.store.load(&self.params.layer_sizes) {
            Ok(Some(network)) => {
                info!(path = %self.store.path().display(), "loaded champion");
                self.survivors = vec![SurvivorRecord {
                    cost: 0.0,
                    network: network.serialize(),
                }];
            }
            Ok(None) => info!("no stored champion, starting from a random population"),
            Err(e) => warn!(error = %e, "ignoring stored champion, starting from a random population"),
        }
    }

    fn spawn_generation(&mut self) -> Result<(), NetworkError> {
        self.world.clear();
        self.epoch_started = Utc::now();

        let topology = self.params.layer_sizes.clone();
        let population = self.params.population;
        let pool = self.params.survivor_pool_size.min(self.survivors.len());
        let clones = if pool == 0 {
            0
        } else {
            ((population as f32 * self.params.clone_fraction).round() as usize).min(population)
        };

        let mut mutated = 0;
        for i in 0..population {
            let mut network = if i < clones {
                let record = &self.survivors[i % pool];
                match Network::deserialize(&record.network, &topology) {
                    Ok(network) => network,
                    Err(e) => {
                        warn!(error = %e, "survivor failed to decode, using a random network");
                        Network::new_random(&topology, &mut self.rng)?
                    }
                }
            } else {
                Network::new_random(&topology, &mut self.rng)?
            };

            if self
                .rng
                .random_bool(f64::from(self.params.mutation_probability))
            {
                network.mutate(self.params.mutation_amount, &mut self.rng);
                mutated += 1;
            }

            self.world.spawn(network, &self.params, &mut self.rng);
        }

        // bookkeeping between epochs must not leak into the first tick
        self.clock.reset();

        debug!(epoch = self.epoch, population, clones, mutated, "spawned generation");
        Ok(())
    }

    fn run_tick(&mut self, renderer: &mut dyn Renderer) -> Result<Phase, SimulationError> {
        if renderer.poll_quit() {
            info!(epoch = self.epoch, tick = self.world.ticks, "evolution cancelled mid-epoch");
            return Ok(Phase::Terminated(Termination::Cancelled));
        }

        self.world
            .tick(&self.params, self.clock.as_mut(), &mut self.rng)?;

        renderer.present(&self.world.agents, &self.world.obstacles);
        if let Some(agent) = self.inspected_agent() {
            renderer.show_network(&agent.network);
        }

        if self.world.ticks >= u64::from(self.params.epoch_length) {
            Ok(Phase::Rank)
        } else {
            Ok(Phase::RunEpoch)
        }
    }

    fn rank(&mut self) -> Result<(), NetworkError> {
        let survivors = self.world.agents.len();
        let mut ranked = rank_agents(&self.world.agents);

        let best_cost = ranked.first().map(|r| r.cost);
        let mean_cost = (!ranked.is_empty())
            .then(|| ranked.iter().map(|r| r.cost).sum::<f32>() / ranked.len() as f32);

        if ranked.is_empty() {
            warn!(epoch = self.epoch, "no agent survived, seeding the pool with a random network");
            let network = Network::new_random(&self.params.layer_sizes, &mut self.rng)?;
            ranked.push(SurvivorRecord {
                cost: 0.0,
                network: network.serialize(),
            });
        }

        let summary = EpochSummary {
            epoch: self.epoch,
            best_cost,
            mean_cost,
            survivors,
            started_at: self.epoch_started,
            finished_at: Utc::now(),
        };
        info!(
            epoch = summary.epoch,
            best_cost = ?summary.best_cost,
            mean_cost = ?summary.mean_cost,
            survivors = summary.survivors,
            "epoch complete"
        );
        self.history.record(summary);
        self.ranked = ranked;
        Ok(())
    }

    fn persist_champion(&mut self) {
        let had_survivors = self.history.last().is_some_and(|s| s.survivors > 0);
        match self.survivors.first() {
            Some(best) if had_survivors => {
                if let Err(e) = self.store.save_raw(&best.network) {
                    warn!(error = %e, "could not persist champion, keeping the previous one");
                }
            }
            _ => debug!(epoch = self.epoch, "no surviving champion to persist"),
        }

        if let Some(path) = &self.params.history_path {
            if let Err(e) = self.history.save_to_file(path) {
                warn!(error = %e, "could not write epoch history");
            }
        }
    }
}

/// Serializes every agent and sorts by ascending cost, keeping roster order on ties.
pub fn rank_agents(agents: &[Agent]) -> Vec<SurvivorRecord> {
    let mut ranked: Vec<SurvivorRecord> = agents
        .iter()
        .map(|agent| SurvivorRecord {
            cost: agent.cost,
            network: agent.network.serialize(),
        })
        .collect();
    ranked.sort_by(|a, b| a.cost.total_cmp(&b.cost));
    ranked
}
