//! A top-down corridor for agents to run along.
//!
//! Agents start side by side near the bottom of the corridor,
//! move forward at constant speed and steer with two outputs.
//! They die when they touch a side wall or an obstacle, or
//! when they move backwards, which also zeroes their fitness.
//! Fitness is the time survived.
use crate::errors::PlacementError;
use crate::evolution::Environment;

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::f32::consts::PI;

/// Number of distance sensors per agent.
pub const SENSOR_COUNT: usize = 7;
/// Number of steering outputs per agent: right force, then left force.
pub const OUTPUT_COUNT: usize = 2;

/// Sensor directions relative to the heading, in fractions
/// of a half turn, ordered from leftmost to rightmost.
const SENSOR_ANGLES: [f32; SENSOR_COUNT] = [0.5, 0.25, 0.04175, 0.0, -0.04175, -0.25, -0.5];

/// Corridor and agent parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorConfig {
    pub agents: usize,
    pub width: f32,
    pub length: f32,
    /// Starting distance of agents from the bottom of the corridor.
    pub start_y: f32,
    /// Horizontal position of the leftmost agent.
    pub first_agent_x: f32,
    /// Horizontal position of the rightmost agent.
    pub last_agent_x: f32,
    pub agent_radius: f32,
    /// Forward speed in units per second.
    pub speed: f32,
    /// Turn rate at full steering difference, in degrees per second.
    pub max_rotation: f32,
    /// Sensor range.
    pub line_of_sight: f32,
    /// Length of the obstacle-free zone at the start.
    pub start_clearance: f32,
    /// Length of the corridor sections obstacles are placed in.
    pub region_length: f32,
    pub obstacle_radius: f32,
    pub min_obstacles: usize,
    pub max_obstacles: usize,
    /// Number of random positions tried per obstacle
    /// before placement is given up.
    pub placement_attempts: usize,
}

impl CorridorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.agents == 0 {
            return Err("corridor needs at least one agent".to_string());
        }
        if self.width <= 2.0 * self.agent_radius {
            return Err("corridor is too narrow for its agents".to_string());
        }
        if self.line_of_sight <= 0.0 {
            return Err("line_of_sight must be positive".to_string());
        }
        if self.min_obstacles > self.max_obstacles {
            return Err("min_obstacles exceeds max_obstacles".to_string());
        }
        if self.max_obstacles > 0
            && (self.width < 2.0 * self.obstacle_radius
                || self.region_length < 2.0 * self.obstacle_radius)
        {
            return Err("obstacles don't fit in a corridor region".to_string());
        }
        Ok(())
    }
}

impl Default for CorridorConfig {
    fn default() -> CorridorConfig {
        CorridorConfig {
            agents: 11,
            width: 53.0,
            length: 6000.0,
            start_y: 5.0,
            first_agent_x: 6.5,
            last_agent_x: 46.5,
            agent_radius: 0.5,
            speed: 30.0,
            max_rotation: 180.0,
            line_of_sight: 45.0,
            start_clearance: 30.0,
            region_length: 40.0,
            obstacle_radius: 2.5,
            min_obstacles: 1,
            max_obstacles: 2,
            placement_attempts: 1000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Obstacle {
    x: f32,
    y: f32,
    radius: f32,
}

#[derive(Clone, Debug, PartialEq)]
struct Agent {
    x: f32,
    y: f32,
    /// Heading in radians, counter-clockwise from the +x axis.
    heading: f32,
    alive: bool,
    lifespan: f32,
    progress: f32,
    fitness: f32,
}

impl Agent {
    fn new(x: f32, y: f32) -> Agent {
        Agent {
            x,
            y,
            heading: PI / 2.0,
            alive: true,
            lifespan: 0.0,
            progress: y,
            fitness: 0.0,
        }
    }
}

/// The corridor environment.
#[derive(Clone, Debug)]
pub struct Corridor {
    config: CorridorConfig,
    obstacles: Vec<Obstacle>,
    agents: Vec<Agent>,
}

impl Corridor {
    /// Creates a corridor with randomly placed obstacles.
    ///
    /// Each region past the start clearance receives between
    /// `min_obstacles` and `max_obstacles` non-overlapping obstacles.
    ///
    /// # Errors
    /// Returns an error if an obstacle can't be placed
    /// within the configured number of attempts.
    pub fn new<R: Rng + ?Sized>(config: CorridorConfig, rng: &mut R) -> Result<Corridor, PlacementError> {
        let mut obstacles = Vec::new();
        let mut region_start = config.start_clearance;
        let mut region = 0;
        while region_start + config.region_length <= config.length {
            let count = rng.gen_range(config.min_obstacles..=config.max_obstacles);
            let mut placed: Vec<Obstacle> = Vec::with_capacity(count);
            for _ in 0..count {
                let obstacle = place_obstacle(&config, region, region_start, &placed, rng)?;
                placed.push(obstacle);
            }
            obstacles.extend(placed);
            region_start += config.region_length;
            region += 1;
        }
        log::debug!("placed {} obstacles in {} regions", obstacles.len(), region);

        let mut corridor = Corridor {
            config,
            obstacles,
            agents: Vec::new(),
        };
        corridor.reset();
        Ok(corridor)
    }

    pub fn config(&self) -> &CorridorConfig {
        &self.config
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Returns the position of an agent.
    pub fn agent_position(&self, agent: usize) -> (f32, f32) {
        (self.agents[agent].x, self.agents[agent].y)
    }

    /// Returns the distance from `(x, y)` along `angle` to the
    /// nearest wall or obstacle, capped at the line of sight.
    fn cast_ray(&self, x: f32, y: f32, angle: f32) -> f32 {
        let (dx, dy) = (angle.cos(), angle.sin());
        let mut nearest = self.config.line_of_sight;

        if dx < 0.0 {
            nearest = nearest.min(-x / dx);
        } else if dx > 0.0 {
            nearest = nearest.min((self.config.width - x) / dx);
        }

        let reach = self.config.line_of_sight + self.config.obstacle_radius;
        for obstacle in self.obstacles.iter().filter(|o| (o.y - y).abs() <= reach) {
            // Ray-circle intersection, with the ray origin at (x, y).
            let (mx, my) = (x - obstacle.x, y - obstacle.y);
            let b = mx * dx + my * dy;
            let c = mx * mx + my * my - obstacle.radius * obstacle.radius;
            if c > 0.0 && b > 0.0 {
                continue;
            }
            let discriminant = b * b - c;
            if discriminant < 0.0 {
                continue;
            }
            nearest = nearest.min((-b - discriminant.sqrt()).max(0.0));
        }

        nearest
    }

    fn collides(&self, agent: &Agent) -> bool {
        let radius = self.config.agent_radius;
        if agent.x - radius <= 0.0 || agent.x + radius >= self.config.width {
            return true;
        }
        self.obstacles.iter().any(|o| {
            let (dx, dy) = (agent.x - o.x, agent.y - o.y);
            let reach = o.radius + radius;
            dx * dx + dy * dy < reach * reach
        })
    }
}

/// Picks a random position for an obstacle in the region
/// starting at `region_start`, clear of the `placed` ones.
fn place_obstacle<R: Rng + ?Sized>(
    config: &CorridorConfig,
    region: usize,
    region_start: f32,
    placed: &[Obstacle],
    rng: &mut R,
) -> Result<Obstacle, PlacementError> {
    let radius = config.obstacle_radius;
    for _ in 0..config.placement_attempts {
        let candidate = Obstacle {
            x: rng.gen_range(radius..=config.width - radius),
            y: region_start + rng.gen_range(radius..=config.region_length - radius),
            radius,
        };
        let overlaps = placed.iter().any(|o| {
            let (dx, dy) = (candidate.x - o.x, candidate.y - o.y);
            (dx * dx + dy * dy).sqrt() < candidate.radius + o.radius
        });
        if !overlaps {
            return Ok(candidate);
        }
    }
    Err(PlacementError {
        region,
        attempts: config.placement_attempts,
    })
}

impl Environment for Corridor {
    fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Returns one reading per sensor, leftmost first: 0 when nothing
    /// is in sight, approaching 1 as the nearest hit gets closer.
    fn sense(&self, agent: usize) -> Vec<f32> {
        let agent = &self.agents[agent];
        SENSOR_ANGLES
            .iter()
            .map(|offset| {
                let distance = self.cast_ray(agent.x, agent.y, agent.heading + offset * PI);
                1.0 - distance / self.config.line_of_sight
            })
            .collect()
    }

    fn act(&mut self, agent: usize, outputs: &[f32], dt: f32) {
        assert_eq!(
            outputs.len(),
            OUTPUT_COUNT,
            "agent {} received {} steering outputs",
            agent,
            outputs.len()
        );
        let (right, left) = (outputs[0], outputs[1]);
        let turn = (right - left) * self.config.max_rotation.to_radians() * dt;
        let speed = self.config.speed;

        let mut state = self.agents[agent].clone();
        if !state.alive {
            return;
        }
        state.heading -= turn;
        state.x += speed * state.heading.cos() * dt;
        state.y += speed * state.heading.sin() * dt;
        state.lifespan += dt;
        state.fitness = state.lifespan;

        if self.collides(&state) {
            state.alive = false;
        }
        if state.y < state.progress {
            state.alive = false;
            state.fitness = 0.0;
        } else {
            state.progress = state.y;
        }

        self.agents[agent] = state;
    }

    fn is_alive(&self, agent: usize) -> bool {
        self.agents[agent].alive
    }

    fn fitness(&self, agent: usize) -> f32 {
        self.agents[agent].fitness
    }

    fn reset(&mut self) {
        let count = self.config.agents;
        let spacing = if count > 1 {
            (self.config.last_agent_x - self.config.first_agent_x) / (count - 1) as f32
        } else {
            0.0
        };
        self.agents = (0..count)
            .map(|i| {
                Agent::new(
                    self.config.first_agent_x + spacing * i as f32,
                    self.config.start_y,
                )
            })
            .collect();
    }
}
