#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use geo::coord;
use neuroarena::simulation::brain::Network;
use neuroarena::simulation::clock::FixedClock;
use neuroarena::simulation::obstacle::Obstacle;
use neuroarena::simulation::params::{GoalRegion, Params};
use neuroarena::simulation::world::World;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

fn create_test_params() -> Params {
    Params {
        arena_width: 500.0,
        arena_height: 500.0,
        population: 12,
        deadzone: 0.0,
        input_noise: 0.0,
        novelty_weight: 0.0,
        proximity_weight: 0.0,
        goal_region: None,
        ..Params::default()
    }
}

#[test]
fn test_positions_stay_inside_arena() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(10);
    let mut world = World::new();
    for _ in 0..params.population {
        let network = Network::new_random(&params.layer_sizes, &mut rng).unwrap();
        world.spawn(network, &params, &mut rng);
    }

    for _ in 0..500 {
        world.step(&params, 0.05, &mut rng).unwrap();
        for agent in &world.agents {
            assert!((0.0..params.arena_width).contains(&agent.pos.x), "x = {}", agent.pos.x);
            assert!((0.0..params.arena_height).contains(&agent.pos.y), "y = {}", agent.pos.y);
            assert!((0.0..360.0).contains(&agent.direction));
            assert!(agent.speed.abs() <= params.max_speed);
            assert!(agent.angular_velocity.abs() <= params.max_angular_velocity);
        }
        for obstacle in &world.obstacles {
            assert!(!obstacle.is_out_of_bounds(params.arena_width, params.arena_height));
        }
    }
    assert_eq!(world.ticks, 500);
}

#[test]
fn test_zero_network_drives_at_half_speed() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(11);
    let mut world = World::new();
    let network = Network::zeroed(&params.layer_sizes).unwrap();
    let id = world.spawn_at(coord! { x: 100.0, y: 100.0 }, 0.0, network, &params);

    world.step(&params, 0.1, &mut rng).unwrap();

    let agent = world.agent(id).unwrap();
    let outputs = &agent.network.layers()[2].values;
    assert!(outputs.iter().all(|&v| v == 0.5));
    assert_eq!(agent.speed, 0.5 * params.max_speed);
    assert_eq!(agent.angular_velocity, 0.0);
    assert_eq!(agent.direction, 0.0);
    assert!((agent.pos.x - (100.0 + 0.5 * params.max_speed * 0.1)).abs() < 1e-3);
    assert!((agent.pos.y - 100.0).abs() < 1e-3);

    // a fire flag of exactly 0.5 fires
    assert_eq!(agent.cost, params.fire_cost);
    assert_eq!(world.obstacles.len(), 1);
    assert_eq!(world.obstacles[0].creator, id);
}

#[test]
fn test_cooldown_blocks_second_shot() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(12);
    let mut world = World::new();
    let network = Network::zeroed(&params.layer_sizes).unwrap();
    let id = world.spawn_at(coord! { x: 100.0, y: 100.0 }, 0.0, network, &params);

    world.step(&params, 0.1, &mut rng).unwrap();
    world.step(&params, 0.1, &mut rng).unwrap();

    let agent = world.agent(id).unwrap();
    assert_eq!(agent.cost, params.fire_cost);
    assert!((agent.cooldown - (params.fire_cooldown - 0.2)).abs() < 1e-5);
}

#[test]
fn test_obstacle_hit_charges_victim_and_rewards_shooter() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(13);
    let mut world = World::new();
    let shooter = world.spawn_at(
        coord! { x: 100.0, y: 100.0 },
        0.0,
        Network::zeroed(&params.layer_sizes).unwrap(),
        &params,
    );
    let victim = world.spawn_at(
        coord! { x: 130.0, y: 100.0 },
        0.0,
        Network::zeroed(&params.layer_sizes).unwrap(),
        &params,
    );
    for agent in &mut world.agents {
        agent.cooldown = 100.0;
    }
    world
        .obstacles
        .push(Obstacle::new(coord! { x: 110.0, y: 100.0 }, 0.0, params.projectile_speed, shooter));

    for _ in 0..20 {
        world.step(&params, 0.01, &mut rng).unwrap();
        if world.obstacles.is_empty() {
            break;
        }
    }

    assert!(world.obstacles.is_empty());
    let victim = world.agent(victim).unwrap();
    assert_eq!(victim.health, params.initial_health - 1);
    assert_eq!(victim.cost, params.hit_cost);
    let shooter = world.agent(shooter).unwrap();
    assert_eq!(shooter.health, params.initial_health);
    assert_eq!(shooter.cost, params.hit_reward);
}

#[test]
fn test_last_hit_removes_victim() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(14);
    let mut world = World::new();
    let shooter = world.spawn_at(
        coord! { x: 100.0, y: 100.0 },
        0.0,
        Network::zeroed(&params.layer_sizes).unwrap(),
        &params,
    );
    let victim = world.spawn_at(
        coord! { x: 115.0, y: 100.0 },
        0.0,
        Network::zeroed(&params.layer_sizes).unwrap(),
        &params,
    );
    for agent in &mut world.agents {
        agent.cooldown = 100.0;
        if agent.id == victim {
            agent.health = 1;
        }
    }
    world
        .obstacles
        .push(Obstacle::new(coord! { x: 108.0, y: 100.0 }, 0.0, params.projectile_speed, shooter));

    world.step(&params, 0.01, &mut rng).unwrap();

    assert!(world.agent(victim).is_none());
    assert_eq!(world.agents.len(), 1);
    assert!(world.obstacles.is_empty());
}

#[test]
fn test_escaped_obstacle_is_removed_without_cost() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(15);
    let mut world = World::new();
    world
        .obstacles
        .push(Obstacle::new(coord! { x: 499.0, y: 250.0 }, 0.0, params.projectile_speed, 7));

    world.step(&params, 0.05, &mut rng).unwrap();

    assert!(world.obstacles.is_empty());
}

#[test]
fn test_sense_sees_agent_ahead() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(16);
    let mut world = World::new();
    let observer = world.spawn_at(
        coord! { x: 100.0, y: 100.0 },
        0.0,
        Network::zeroed(&params.layer_sizes).unwrap(),
        &params,
    );
    world.spawn_at(
        coord! { x: 200.0, y: 100.0 },
        0.0,
        Network::zeroed(&params.layer_sizes).unwrap(),
        &params,
    );
    let hitboxes: Vec<_> = world
        .agents
        .iter()
        .map(|a| (a.id, a.hitbox(params.agent_size)))
        .collect();

    let observer = world.agents.iter_mut().find(|a| a.id == observer).unwrap();
    observer.update_rays();
    let inputs = observer.sense(hitboxes.iter().map(|(id, r)| (*id, r)), &params, &mut rng);

    assert_eq!(inputs.len(), params.num_rays + 2);
    let expected = (100.0 - params.agent_size / 2.0) / params.max_ray_distance();
    assert!((inputs[params.num_rays / 2] - expected).abs() < 1e-4);
    assert_eq!(inputs[0], 1.0);
    assert_eq!(inputs[params.num_rays - 1], 1.0);
    // standing still maps to the middle of the proprioceptive range
    assert_eq!(inputs[params.num_rays], 0.5);
    assert_eq!(inputs[params.num_rays + 1], 0.5);
}

/// Senses from (100, 100) facing east with a second agent 100 units ahead.
fn sense_facing_neighbour(params: &Params, rng: &mut StdRng) -> Vec<f32> {
    let mut world = World::new();
    let observer = world.spawn_at(
        coord! { x: 100.0, y: 100.0 },
        0.0,
        Network::zeroed(&params.layer_sizes).unwrap(),
        params,
    );
    world.spawn_at(
        coord! { x: 200.0, y: 100.0 },
        0.0,
        Network::zeroed(&params.layer_sizes).unwrap(),
        params,
    );
    let hitboxes: Vec<_> = world
        .agents
        .iter()
        .map(|a| (a.id, a.hitbox(params.agent_size)))
        .collect();

    let observer = world.agents.iter_mut().find(|a| a.id == observer).unwrap();
    observer.update_rays();
    observer.sense(hitboxes.iter().map(|(id, r)| (*id, r)), params, rng)
}

#[test]
fn test_input_noise_is_clamped() {
    let params = Params {
        input_noise: 5.0,
        ..create_test_params()
    };

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let inputs = sense_facing_neighbour(&params, &mut rng);
        for &reading in &inputs[..params.num_rays] {
            assert!((0.0..=1.0).contains(&reading), "seed {seed}: {reading}");
        }
        // proprioception is never perturbed
        assert_eq!(inputs[params.num_rays], 0.5);
        assert_eq!(inputs[params.num_rays + 1], 0.5);
    }
}

#[test]
fn test_input_noise_depends_on_seed() {
    let params = Params {
        input_noise: 0.05,
        ..create_test_params()
    };
    let middle = params.num_rays / 2;
    let clean = (100.0 - params.agent_size / 2.0) / params.max_ray_distance();

    let first = sense_facing_neighbour(&params, &mut StdRng::seed_from_u64(1))[middle];
    let second = sense_facing_neighbour(&params, &mut StdRng::seed_from_u64(2))[middle];
    let repeat = sense_facing_neighbour(&params, &mut StdRng::seed_from_u64(1))[middle];

    assert_ne!(first, second);
    assert_eq!(first, repeat);
    for reading in [first, second] {
        assert!((reading - clean).abs() <= params.input_noise + 1e-6);
    }
}

#[test]
fn test_zero_input_noise_leaves_rng_untouched() {
    let params = create_test_params();
    assert_eq!(params.input_noise, 0.0);

    let mut rng = StdRng::seed_from_u64(5);
    sense_facing_neighbour(&params, &mut rng);

    let next: u64 = rng.random();
    let fresh: u64 = StdRng::seed_from_u64(5).random();
    assert_eq!(next, fresh);
}

#[test]
fn test_agent_at_finds_hitbox_under_point() {
    let params = create_test_params();
    let mut world = World::new();
    let left = world.spawn_at(
        coord! { x: 100.0, y: 100.0 },
        0.0,
        Network::zeroed(&params.layer_sizes).unwrap(),
        &params,
    );
    let right = world.spawn_at(
        coord! { x: 300.0, y: 100.0 },
        0.0,
        Network::zeroed(&params.layer_sizes).unwrap(),
        &params,
    );
    let half = params.agent_size / 2.0;

    assert_eq!(world.agent_at(coord! { x: 100.0, y: 100.0 }, params.agent_size), Some(left));
    assert_eq!(
        world.agent_at(coord! { x: 300.0 + half - 0.5, y: 100.0 - half + 0.5 }, params.agent_size),
        Some(right)
    );
    assert_eq!(world.agent_at(coord! { x: 200.0, y: 100.0 }, params.agent_size), None);
    assert_eq!(world.agent_at(coord! { x: 100.0, y: 100.0 + half + 1.0 }, params.agent_size), None);
}

#[test]
fn test_goal_region_reduces_cost() {
    let params = Params {
        goal_region: Some(GoalRegion {
            x: 0.0,
            y: 0.0,
            width: 250.0,
            height: 500.0,
        }),
        goal_reward: 2.0,
        fire_cost: 0.0,
        ..create_test_params()
    };
    let mut rng = StdRng::seed_from_u64(17);
    let mut world = World::new();
    let inside = world.spawn_at(
        coord! { x: 50.0, y: 50.0 },
        180.0,
        Network::zeroed(&params.layer_sizes).unwrap(),
        &params,
    );
    let outside = world.spawn_at(
        coord! { x: 400.0, y: 400.0 },
        0.0,
        Network::zeroed(&params.layer_sizes).unwrap(),
        &params,
    );

    world.step(&params, 0.1, &mut rng).unwrap();

    assert!((world.agent(inside).unwrap().cost + 0.2).abs() < 1e-5);
    assert_eq!(world.agent(outside).unwrap().cost, 0.0);
}

#[test]
fn test_tick_floors_clock_delta() {
    let params = Params {
        min_dt: 0.01,
        ..create_test_params()
    };
    let mut rng = StdRng::seed_from_u64(18);
    let mut world = World::new();

    let dt = world.tick(&params, &mut FixedClock(0.0), &mut rng).unwrap();
    assert_eq!(dt, 0.01);
    let dt = world.tick(&params, &mut FixedClock(f32::NAN), &mut rng).unwrap();
    assert_eq!(dt, 0.01);
    let dt = world.tick(&params, &mut FixedClock(0.25), &mut rng).unwrap();
    assert_eq!(dt, 0.25);

    assert_eq!(world.ticks, 3);
    assert!((world.time - 0.27).abs() < 1e-6);
}

#[test]
fn test_clear_resets_epoch() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(19);
    let mut world = World::new();
    world.spawn(
        Network::zeroed(&params.layer_sizes).unwrap(),
        &params,
        &mut rng,
    );
    world.step(&params, 0.1, &mut rng).unwrap();

    world.clear();

    assert!(world.agents.is_empty());
    assert!(world.obstacles.is_empty());
    assert_eq!(world.ticks, 0);
    assert_eq!(world.time, 0.0);
    let id = world.spawn(
        Network::zeroed(&params.layer_sizes).unwrap(),
        &params,
        &mut rng,
    );
    assert_eq!(id, 0);
}
