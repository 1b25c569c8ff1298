//! Path evaluator: deterministic simulation of a visiting order.
//!
//! The route starts at [`Point::ORIGIN`] with no load. Each path entry is a
//! deliberate move; before moving, every uncollected target within
//! `collision_radius` of the travelled segment is swept up. The first move
//! that would exceed either budget ends the simulation, so the result is in
//! general a function of a prefix of the input.
//!
//! [`evaluate`] and [`trace_route`] share one simulation routine and cannot
//! disagree.

use crate::instance::collected::CollectedSet;
use crate::instance::target::{Point, TargetId, TargetSet};
use crate::motion::geometry::point_segment_distance;
use crate::motion::params::MotionParams;

/// Weight of collected reward in the fitness.
pub const REWARD_WEIGHT: f64 = 1e10;
/// Weight of unused resource in the fitness.
pub const RESOURCE_SLACK_WEIGHT: f64 = 1e5;
/// Weight of unused time in the fitness.
pub const TIME_SLACK_WEIGHT: f64 = 1.0;

/// Outcome of simulating one visiting order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Composite score; see [`fitness`].
    pub fitness: f64,
    /// Sum of rewards of every collected target (targeted or swept).
    pub reward: f64,
    /// Resource drawn by the executed moves.
    pub resource_used: f64,
    /// Time spent by the executed moves.
    pub time_used: f64,
    /// Number of deliberate moves executed.
    pub steps_executed: usize,
    /// Number of targets collected, targeted or swept.
    pub collected: usize,
    /// Whether a budget check ended the simulation before the path ran out.
    pub halted_by_budget: bool,
}

/// How a target ended up after a simulated route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetStatus {
    /// Reached by a deliberate move.
    Targeted,
    /// Collected incidentally while passing by.
    Swept,
    /// Never collected.
    Missed,
}

impl TargetStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Targeted => "targeted",
            Self::Swept => "swept",
            Self::Missed => "missed",
        }
    }
}

/// Per-target outcome of a simulated route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTrace {
    /// Status of every target, indexed by id.
    pub statuses: Vec<TargetStatus>,
    /// Deliberately visited ids, in execution order.
    pub targeted: Vec<TargetId>,
    /// Swept ids, in collection order.
    pub swept: Vec<TargetId>,
    pub evaluation: Evaluation,
}

impl RouteTrace {
    /// Positions the vehicle actually drives to, in order (origin excluded).
    #[must_use]
    pub fn waypoints(&self, targets: &TargetSet) -> Vec<Point> {
        targets.positions(&self.targeted)
    }

    /// Count of targets with the given status.
    #[must_use]
    pub fn count(&self, status: TargetStatus) -> usize {
        self.statuses.iter().filter(|&&s| s == status).count()
    }
}

/// Lexicographically weighted fitness: reward, then resource slack, then
/// time slack.
#[must_use]
pub fn fitness(reward: f64, resource_used: f64, time_used: f64, params: &MotionParams) -> f64 {
    reward * REWARD_WEIGHT
        + (params.resource_budget - resource_used) * RESOURCE_SLACK_WEIGHT
        + (params.time_budget - time_used) * TIME_SLACK_WEIGHT
}

/// Score a visiting order.
///
/// Entries already collected (duplicates, or targets swept earlier) are
/// skipped. Ids outside the table are ignored.
#[must_use]
pub fn evaluate(path: &[TargetId], targets: &TargetSet, params: &MotionParams) -> Evaluation {
    simulate(path, targets, params, |_| {})
}

/// Simulate a visiting order and record what happened to every target.
#[must_use]
pub fn trace_route(path: &[TargetId], targets: &TargetSet, params: &MotionParams) -> RouteTrace {
    let mut statuses = vec![TargetStatus::Missed; targets.len()];
    let mut targeted = Vec::new();
    let mut swept = Vec::new();
    let evaluation = simulate(path, targets, params, |event| match event {
        RouteEvent::Targeted(id) => {
            statuses[id as usize] = TargetStatus::Targeted;
            targeted.push(id);
        }
        RouteEvent::Swept(id) => {
            statuses[id as usize] = TargetStatus::Swept;
            swept.push(id);
        }
    });
    RouteTrace {
        statuses,
        targeted,
        swept,
        evaluation,
    }
}

#[derive(Debug, Clone, Copy)]
enum RouteEvent {
    Targeted(TargetId),
    Swept(TargetId),
}

fn simulate<F>(path: &[TargetId], targets: &TargetSet, params: &MotionParams, mut observe: F) -> Evaluation
where
    F: FnMut(RouteEvent),
{
    let mut collected = CollectedSet::with_capacity(targets.len());
    let mut swept_scratch: Vec<TargetId> = Vec::new();

    let mut position = Point::ORIGIN;
    let mut mass = 0.0;
    let mut time = 0.0;
    let mut resource = 0.0;
    let mut reward = 0.0;
    let mut steps_executed = 0;
    let mut halted_by_budget = false;

    for &target_id in path {
        if collected.contains(target_id) {
            continue;
        }
        let Some(target) = targets.get(target_id) else {
            continue;
        };

        let distance = position.distance_to(target.position);
        let delta_time = distance / params.speed(mass);
        let delta_resource = params.draw_rate(mass) * distance;

        if time + delta_time > params.time_budget
            || resource + delta_resource > params.resource_budget
        {
            halted_by_budget = true;
            break;
        }

        swept_scratch.clear();
        for other in targets {
            if other.id == target_id || collected.contains(other.id) {
                continue;
            }
            if point_segment_distance(position, target.position, other.position)
                <= params.collision_radius
            {
                swept_scratch.push(other.id);
            }
        }

        position = target.position;
        time += delta_time;
        resource += delta_resource;
        steps_executed += 1;

        collected.insert(target_id);
        mass += target.mass;
        reward += target.reward;
        observe(RouteEvent::Targeted(target_id));

        for &swept_id in &swept_scratch {
            if let Some(swept) = targets.get(swept_id) {
                collected.insert(swept_id);
                mass += swept.mass;
                reward += swept.reward;
                observe(RouteEvent::Swept(swept_id));
            }
        }
    }

    Evaluation {
        fitness: fitness(reward, resource, time, params),
        reward,
        resource_used: resource,
        time_used: time,
        steps_executed,
        collected: collected.len(),
        halted_by_budget,
    }
}
