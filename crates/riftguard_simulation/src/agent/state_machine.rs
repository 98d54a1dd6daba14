//! Agent FSM: Patrol → Idle → Chase → Damage → Death.
//!
//! Каждое состояние имеет enter / tick / fixed_tick / exit. Переключение
//! всегда exit(старое) → enter(новое), даже если состояние то же самое.
//! Damage и Death ставятся только снаружи (combat).

use bevy::prelude::*;

use super::components::{AgentConfig, PatrolRoute};
use crate::bridge::{AnimTrigger, AnimationSignals, NavAgent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AgentState {
    Patrol,
    Idle,
    Chase,
    Damage,
    /// Терминальное: выйти нельзя
    Death,
}

/// Доступ к мосту хоста на время одного вызова
pub struct AgentContext<'a> {
    pub nav: &'a mut NavAgent,
    pub anim: &'a mut AnimationSignals,
    pub route: &'a PatrolRoute,
    pub config: &'a AgentConfig,
}

/// Результат perception + позиции за тик
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AgentSenses {
    pub position: Vec3,
    /// Perception check прошёл
    pub player_detected: bool,
    /// `None` если игрок мёртв или отсутствует
    pub player_position: Option<Vec3>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentTick {
    Continue,
    /// Death анимация доиграна, агента надо уничтожить (ровно один раз)
    Destroy,
}

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AgentStateMachine {
    state: AgentState,
    /// Индекс следующей patrol точки (живёт между состояниями)
    next_waypoint: usize,
    /// Idle: сколько ещё стоять
    dwell_remaining: f32,
    /// Chase: до следующей атаки
    attack_cooldown: f32,
    /// Chase: до следующего set_destination
    repoll_remaining: f32,
    destroyed: bool,
}

impl AgentStateMachine {
    /// Создаёт FSM в Patrol и сразу выполняет его enter
    pub fn start(ctx: &mut AgentContext) -> Self {
        let mut machine = Self {
            state: AgentState::Patrol,
            next_waypoint: 0,
            dwell_remaining: 0.0,
            attack_cooldown: 0.0,
            repoll_remaining: 0.0,
            destroyed: false,
        };
        machine.enter(ctx);
        machine
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn next_waypoint(&self) -> usize {
        self.next_waypoint
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Переключение состояния. `None` или выход из Death = нет перехода.
    pub fn transition(&mut self, next: Option<AgentState>, ctx: &mut AgentContext) -> bool {
        let Some(next) = next else {
            return false;
        };
        if self.state == AgentState::Death {
            return false;
        }

        let previous = self.state;
        self.exit(ctx);
        self.state = next;
        self.enter(ctx);

        crate::log(&format!("AgentFsm: {:?} → {:?}", previous, next));
        true
    }

    /// Внешний переход (combat)
    pub fn force(&mut self, next: AgentState, ctx: &mut AgentContext) -> bool {
        self.transition(Some(next), ctx)
    }

    fn enter(&mut self, ctx: &mut AgentContext) {
        match self.state {
            AgentState::Patrol => self.go_to_next_waypoint(ctx),
            AgentState::Idle => {
                self.dwell_remaining = ctx.config.idle_dwell_secs;
                ctx.nav.halt();
            }
            AgentState::Chase => {
                // Первая атака только после полного cooldown
                self.attack_cooldown = ctx.config.attack_cooldown_secs;
                self.repoll_remaining = 0.0;
            }
            AgentState::Damage => {
                ctx.anim.set_trigger(AnimTrigger::Damage);
                ctx.nav.halt();
            }
            AgentState::Death => {
                ctx.anim.set_trigger(AnimTrigger::Death);
                ctx.nav.halt();
            }
        }
    }

    fn exit(&mut self, ctx: &mut AgentContext) {
        match self.state {
            AgentState::Patrol => {}
            AgentState::Idle => ctx.nav.resume(),
            AgentState::Chase => {
                ctx.anim.reset_trigger(AnimTrigger::Attack);
                ctx.nav.resume();
            }
            AgentState::Damage => {
                ctx.anim.reset_trigger(AnimTrigger::Damage);
                ctx.nav.resume();
            }
            AgentState::Death => {}
        }
    }

    fn go_to_next_waypoint(&mut self, ctx: &mut AgentContext) {
        if ctx.route.is_empty() {
            return;
        }

        let index = self.next_waypoint % ctx.route.len();
        if let Some(point) = ctx.route.get(index) {
            ctx.nav.set_destination(point);
        }
        self.next_waypoint = (index + 1) % ctx.route.len();
    }

    /// Logic tick (каждый кадр)
    pub fn tick(&mut self, senses: &AgentSenses, delta: f32, ctx: &mut AgentContext) -> AgentTick {
        match self.state {
            AgentState::Patrol => {
                // Perception перекрывает арривал
                if senses.player_detected {
                    self.transition(Some(AgentState::Chase), ctx);
                } else if ctx.nav.has_arrived() {
                    self.transition(Some(AgentState::Idle), ctx);
                }
            }

            AgentState::Idle => {
                if senses.player_detected {
                    self.transition(Some(AgentState::Chase), ctx);
                    return AgentTick::Continue;
                }

                self.dwell_remaining -= delta;
                if self.dwell_remaining <= 0.0 {
                    self.transition(Some(AgentState::Patrol), ctx);
                }
            }

            AgentState::Chase => self.tick_chase(senses, delta, ctx),

            AgentState::Damage => {
                if ctx.anim.is_settled_at(1.0) {
                    self.transition(Some(AgentState::Chase), ctx);
                }
            }

            AgentState::Death => {
                if !self.destroyed && ctx.anim.is_settled_at(1.0) {
                    self.destroyed = true;
                    return AgentTick::Destroy;
                }
            }
        }

        AgentTick::Continue
    }

    fn tick_chase(&mut self, senses: &AgentSenses, delta: f32, ctx: &mut AgentContext) {
        self.attack_cooldown -= delta;
        self.repoll_remaining -= delta;

        let (true, Some(player_position)) = (senses.player_detected, senses.player_position) else {
            self.transition(Some(AgentState::Idle), ctx);
            return;
        };

        if self.repoll_remaining <= 0.0 {
            ctx.nav.set_destination(player_position);
            self.repoll_remaining = ctx.config.destination_repoll_secs;
        }

        let distance = senses.position.distance(player_position);
        if distance <= ctx.config.attack_distance && self.attack_cooldown <= 0.0 {
            ctx.anim.set_trigger(AnimTrigger::Attack);
            self.attack_cooldown = ctx.config.attack_cooldown_secs;
            ctx.nav.halt();
            crate::log(&format!("AgentFsm: attack (distance {:.2})", distance));
        } else {
            ctx.nav.resume();
        }
    }

    /// Physics tick: скорость навигации и поворот
    pub fn fixed_tick(
        &mut self,
        transform: &mut Transform,
        senses: &AgentSenses,
        delta: f32,
        ctx: &mut AgentContext,
    ) {
        ctx.nav.speed = if self.state == AgentState::Chase {
            ctx.config.sprint_speed
        } else {
            ctx.config.walk_speed
        };

        let facing = match (self.state, senses.player_position) {
            (AgentState::Chase, Some(player)) => player - transform.translation,
            _ => ctx.nav.velocity,
        };

        let planar = Vec3::new(facing.x, 0.0, facing.z);
        if planar.length_squared() <= 1e-6 {
            return;
        }

        let target = yaw_toward(planar);
        let factor = (ctx.config.turn_rate * delta).clamp(0.0, 1.0);
        transform.rotation = transform.rotation.slerp(target, factor);
    }
}

/// Поворот вокруг Y так, чтобы forward (-Z) смотрел вдоль `direction`
pub fn yaw_toward(direction: Vec3) -> Quat {
    Quat::from_rotation_y(f32::atan2(-direction.x, -direction.z))
}
