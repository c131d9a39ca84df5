//! Search driver (spec model §4.4). There is no off-the-shelf CP-SAT engine
//! in this stack, so the driver instead runs many randomized-restart greedy
//! builds in parallel (`std::thread::scope`, mirroring the teacher's
//! thread-per-job shape), scores each complete one against the soft-rule
//! objective, and keeps the best incumbent under an early-stop policy.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shared::ShiftType;

use crate::hard_rules::{can_assign, check_day, day_off_is_forced, ScheduleState};
use crate::model::{Model, Schedule};
use crate::soft_rules;

const DAY_RETRY_ATTEMPTS: usize = 40;
const DEFAULT_WALL_CLOCK_CAP_SECS: u64 = 30 * 60;
const DEFAULT_MAX_ATTEMPTS: usize = 2000;

/// Process-wide tunables for the early-stop policy, read once at startup
/// (spec.md §9: "no hidden state" — this is a plain record, not globals).
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub early_stop_enabled: bool,
    pub score_threshold: i64,
    pub min_solutions: usize,
    pub no_improvement_timeout: Duration,
    pub wall_clock_cap: Duration,
    pub max_attempts: usize,
}

impl SearchConfig {
    pub fn from_env() -> Self {
        Self {
            early_stop_enabled: env_var("EARLY_STOP_ENABLED", false),
            score_threshold: env_var("EARLY_STOP_SCORE_THRESHOLD", 800),
            min_solutions: env_var("EARLY_STOP_MIN_SOLUTIONS", 10),
            no_improvement_timeout: Duration::from_secs(env_var(
                "EARLY_STOP_NO_IMPROVEMENT_SEC",
                600,
            )),
            wall_clock_cap: Duration::from_secs(DEFAULT_WALL_CLOCK_CAP_SECS),
            max_attempts: env_var("SEARCH_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS as u64) as usize,
        }
    }
}

fn env_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

enum StopReason {
    EarlyStop,
    Timeout,
    BudgetExhausted,
}

pub enum SearchOutcome {
    /// A feasible schedule was found. `optimal` distinguishes a search that
    /// ran its full attempt budget from one cut short by the wall-clock cap
    /// or the early-stop policy.
    Feasible {
        schedule: Schedule,
        objective: i64,
        solutions_explored: u64,
        optimal: bool,
    },
    Infeasible { reason: String },
}

struct RunState {
    best: Option<(Schedule, i64)>,
    solutions: u64,
    last_improvement: Instant,
    attempts: usize,
}

/// Runs the randomized-restart search to completion and returns the best
/// incumbent found, or an infeasibility report if none was found at all.
pub fn run(model: &Model, config: &SearchConfig) -> SearchOutcome {
    let start = Instant::now();
    let state = Mutex::new(RunState {
        best: None,
        solutions: 0,
        last_improvement: start,
        attempts: 0,
    });

    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .min(8);

    std::thread::scope(|scope| {
        for worker in 0..workers {
            let state = &state;
            scope.spawn(move || {
                let mut rng = rand::rngs::StdRng::seed_from_u64(worker as u64 ^ 0x5eed);
                loop {
                    if start.elapsed() >= config.wall_clock_cap {
                        return;
                    }
                    {
                        let guard = state.lock().unwrap();
                        if should_stop(&guard, config, start) {
                            return;
                        }
                    }

                    let built = try_build_schedule(model, &mut rng);

                    let mut guard = state.lock().unwrap();
                    guard.attempts += 1;
                    if let Some(schedule) = built {
                        let objective = soft_rules::objective(model, &schedule);
                        guard.solutions += 1;
                        let improved = guard
                            .best
                            .as_ref()
                            .map(|(_, best_objective)| objective < *best_objective)
                            .unwrap_or(true);
                        if improved {
                            guard.last_improvement = Instant::now();
                            tracing::info!(
                                solutions = guard.solutions,
                                objective,
                                elapsed_ms = start.elapsed().as_millis() as u64,
                                "new incumbent"
                            );
                            guard.best = Some((schedule, objective));
                        }
                    }
                }
            });
        }
    });

    let guard = state.into_inner().unwrap();
    match guard.best {
        Some((schedule, objective)) => {
            let stop_reason = if start.elapsed() >= config.wall_clock_cap {
                StopReason::Timeout
            } else if config.early_stop_enabled
                && guard.solutions as usize >= config.min_solutions
                && (objective < config.score_threshold
                    || guard.last_improvement.elapsed() >= config.no_improvement_timeout)
            {
                StopReason::EarlyStop
            } else {
                StopReason::BudgetExhausted
            };
            SearchOutcome::Feasible {
                schedule,
                objective,
                solutions_explored: guard.solutions,
                optimal: matches!(stop_reason, StopReason::BudgetExhausted),
            }
        }
        None => SearchOutcome::Infeasible {
            reason: "no feasible schedule satisfies every hard rule within the search budget"
                .to_string(),
        },
    }
}

fn should_stop(state: &RunState, config: &SearchConfig, start: Instant) -> bool {
    if state.attempts >= config.max_attempts {
        return true;
    }
    if !config.early_stop_enabled {
        return false;
    }
    if state.solutions as usize < config.min_solutions {
        return false;
    }
    let Some((_, objective)) = &state.best else {
        return false;
    };
    *objective < config.score_threshold
        || state.last_improvement.elapsed() >= config.no_improvement_timeout
        || start.elapsed() >= config.wall_clock_cap
}

/// One randomized greedy pass over the whole horizon. Returns `None` if any
/// day's coverage/demand/leader-support rules cannot be satisfied within
/// [`DAY_RETRY_ATTEMPTS`] reshuffles.
fn try_build_schedule(model: &Model, rng: &mut impl rand::Rng) -> Option<Schedule> {
    let mut state = ScheduleState::new();
    state.reserve_days_off(model, rng);

    for &date in &model.dates {
        if !build_day(model, &mut state, date, rng) {
            return None;
        }
    }

    Some(state.into_schedule())
}

fn build_day(
    model: &Model,
    state: &mut ScheduleState,
    date: NaiveDate,
    rng: &mut impl rand::Rng,
) -> bool {
    for _ in 0..DAY_RETRY_ATTEMPTS {
        let mut order: Vec<usize> = (0..model.employees.len()).collect();
        order.shuffle(rng);

        let mut day_assignment: HashMap<usize, ShiftType> = HashMap::new();
        let mut pin_conflict = false;

        for &idx in &order {
            let employee = &model.employees[idx];
            if employee.allowed.is_empty() {
                continue;
            }

            if let Some(shift_id) = model.fixed_shifts(idx).get(&date) {
                match employee.shift(shift_id) {
                    Some(shift) if can_assign(model, state, idx, date, shift) => {
                        day_assignment.insert(idx, shift.clone());
                    }
                    Some(_) => {
                        tracing::warn!(
                            employee = %employee.employee.id,
                            shift = %shift_id,
                            "fixed shift conflicts with an already-satisfied hard rule"
                        );
                        pin_conflict = true;
                        break;
                    }
                    None => {
                        tracing::warn!(
                            employee = %employee.employee.id,
                            shift = %shift_id,
                            "fixed shift refers to a shift outside the employee's allowed set"
                        );
                    }
                }
                continue;
            }

            if day_off_is_forced(model, state, idx, date) {
                continue;
            }

            let mut choices: Vec<&ShiftType> = employee
                .allowed
                .iter()
                .filter(|shift| can_assign(model, state, idx, date, shift))
                .collect();
            choices.shuffle(rng);
            if let Some(shift) = choices.first() {
                day_assignment.insert(idx, (*shift).clone());
            }
        }

        if pin_conflict {
            continue;
        }

        let refs: HashMap<usize, &ShiftType> =
            day_assignment.iter().map(|(&idx, shift)| (idx, shift)).collect();
        if check_day(model, date, &refs).is_empty() {
            for (idx, shift) in day_assignment {
                state.record(idx, date, shift);
            }
            return true;
        }
    }
    false
}
