//! Tests for the agent FSM (без ECS, мост хоста подменён напрямую).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::components::{AgentConfig, PatrolRoute};
    use super::super::state_machine::{
        yaw_toward, AgentContext, AgentSenses, AgentState, AgentStateMachine, AgentTick,
    };
    use crate::bridge::{AnimTrigger, AnimationSignals, NavAgent};

    struct Rig {
        nav: NavAgent,
        anim: AnimationSignals,
        route: PatrolRoute,
        config: AgentConfig,
    }

    impl Rig {
        fn new(points: usize) -> Self {
            let config = AgentConfig::default();
            Self {
                nav: NavAgent::new(config.walk_speed, config.attack_distance),
                anim: AnimationSignals::default(),
                route: PatrolRoute::new(
                    (0..points).map(|i| Vec3::new(i as f32 * 4.0, 0.0, -3.0)).collect(),
                ),
                config,
            }
        }

        fn ctx(&mut self) -> AgentContext<'_> {
            AgentContext {
                nav: &mut self.nav,
                anim: &mut self.anim,
                route: &self.route,
                config: &self.config,
            }
        }

        /// Хост довёл агента до текущей точки
        fn arrive(&mut self) {
            self.nav.path_pending = false;
            self.nav.remaining_distance = 0.5;
        }
    }

    fn unseen() -> AgentSenses {
        AgentSenses {
            position: Vec3::ZERO,
            player_detected: false,
            player_position: Some(Vec3::new(50.0, 0.0, 50.0)),
        }
    }

    fn seen_at(player: Vec3) -> AgentSenses {
        AgentSenses {
            position: Vec3::ZERO,
            player_detected: true,
            player_position: Some(player),
        }
    }

    #[test]
    fn test_start_heads_to_first_waypoint() {
        let mut rig = Rig::new(3);
        let machine = AgentStateMachine::start(&mut rig.ctx());

        assert_eq!(machine.state(), AgentState::Patrol);
        assert_eq!(rig.nav.destination(), rig.route.get(0));
        assert_eq!(machine.next_waypoint(), 1);
        assert!(rig.nav.path_pending);
    }

    #[test]
    fn test_patrol_cycles_after_n_arrivals() {
        let mut rig = Rig::new(3);
        let mut machine = AgentStateMachine::start(&mut rig.ctx());
        let dwell = rig.config.idle_dwell_secs;

        for _ in 0..3 {
            rig.arrive();
            machine.tick(&unseen(), 0.016, &mut rig.ctx());
            assert_eq!(machine.state(), AgentState::Idle);
            assert!(rig.nav.is_stopped());

            machine.tick(&unseen(), dwell, &mut rig.ctx());
            assert_eq!(machine.state(), AgentState::Patrol);
            assert!(!rig.nav.is_stopped());
        }

        assert_eq!(rig.nav.destination(), rig.route.get(0));
    }

    #[test]
    fn test_pending_path_is_not_arrival() {
        let mut rig = Rig::new(2);
        let mut machine = AgentStateMachine::start(&mut rig.ctx());

        rig.nav.remaining_distance = 0.0;
        rig.nav.path_pending = true;
        machine.tick(&unseen(), 0.016, &mut rig.ctx());

        assert_eq!(machine.state(), AgentState::Patrol);
    }

    #[test]
    fn test_detection_overrides_arrival() {
        let mut rig = Rig::new(2);
        let mut machine = AgentStateMachine::start(&mut rig.ctx());

        rig.arrive();
        machine.tick(&seen_at(Vec3::new(0.0, 0.0, -5.0)), 0.016, &mut rig.ctx());

        assert_eq!(machine.state(), AgentState::Chase);
    }

    #[test]
    fn test_idle_dwell_counts_down() {
        let mut rig = Rig::new(2);
        let mut machine = AgentStateMachine::start(&mut rig.ctx());
        rig.arrive();
        machine.tick(&unseen(), 0.0, &mut rig.ctx());
        assert_eq!(machine.state(), AgentState::Idle);

        for _ in 0..4 {
            machine.tick(&unseen(), 1.0, &mut rig.ctx());
            assert_eq!(machine.state(), AgentState::Idle);
        }

        machine.tick(&unseen(), 1.0, &mut rig.ctx());
        assert_eq!(machine.state(), AgentState::Patrol);
        assert_eq!(rig.nav.destination(), rig.route.get(1));
    }

    #[test]
    fn test_idle_escalates_to_chase() {
        let mut rig = Rig::new(2);
        let mut machine = AgentStateMachine::start(&mut rig.ctx());
        rig.arrive();
        machine.tick(&unseen(), 0.0, &mut rig.ctx());

        machine.tick(&seen_at(Vec3::new(0.0, 0.0, -4.0)), 0.016, &mut rig.ctx());
        assert_eq!(machine.state(), AgentState::Chase);
        // Exit Idle снял остановку
        assert!(!rig.nav.is_stopped());
    }

    #[test]
    fn test_chase_repolls_destination_at_interval() {
        let mut rig = Rig::new(2);
        let mut machine = AgentStateMachine::start(&mut rig.ctx());
        machine.force(AgentState::Chase, &mut rig.ctx());

        let first = Vec3::new(0.0, 0.0, -5.0);
        machine.tick(&seen_at(first), 0.016, &mut rig.ctx());
        assert_eq!(rig.nav.destination(), Some(first));

        // Игрок сместился, но repoll ещё не прошёл
        let second = Vec3::new(1.0, 0.0, -5.0);
        machine.tick(&seen_at(second), 0.05, &mut rig.ctx());
        assert_eq!(rig.nav.destination(), Some(first));

        machine.tick(&seen_at(second), 0.06, &mut rig.ctx());
        assert_eq!(rig.nav.destination(), Some(second));
    }

    #[test]
    fn test_chase_attacks_only_in_range_after_cooldown() {
        let mut rig = Rig::new(2);
        let mut machine = AgentStateMachine::start(&mut rig.ctx());
        machine.force(AgentState::Chase, &mut rig.ctx());

        let close = Vec3::new(0.0, 0.0, -1.0);
        // Cooldown 3с ещё не истёк
        for _ in 0..5 {
            machine.tick(&seen_at(close), 0.5, &mut rig.ctx());
            assert!(!rig.anim.is_triggered(AnimTrigger::Attack));
            assert!(!rig.nav.is_stopped());
        }

        machine.tick(&seen_at(close), 0.5, &mut rig.ctx());
        assert!(rig.anim.is_triggered(AnimTrigger::Attack));
        assert!(rig.nav.is_stopped());
        assert_eq!(machine.state(), AgentState::Chase);

        // Атака = side effect, после неё снова движемся
        rig.anim.take_triggers();
        machine.tick(&seen_at(close), 0.5, &mut rig.ctx());
        assert!(!rig.anim.is_triggered(AnimTrigger::Attack));
        assert!(!rig.nav.is_stopped());
    }

    #[test]
    fn test_chase_out_of_range_never_attacks() {
        let mut rig = Rig::new(2);
        let mut machine = AgentStateMachine::start(&mut rig.ctx());
        machine.force(AgentState::Chase, &mut rig.ctx());

        for _ in 0..20 {
            machine.tick(&seen_at(Vec3::new(0.0, 0.0, -4.0)), 0.5, &mut rig.ctx());
        }
        assert!(!rig.anim.is_triggered(AnimTrigger::Attack));
    }

    #[test]
    fn test_chase_loses_player_to_idle() {
        let mut rig = Rig::new(2);
        let mut machine = AgentStateMachine::start(&mut rig.ctx());
        machine.force(AgentState::Chase, &mut rig.ctx());

        machine.tick(&unseen(), 0.016, &mut rig.ctx());
        assert_eq!(machine.state(), AgentState::Idle);

        // Мёртвый игрок: позиции нет
        machine.force(AgentState::Chase, &mut rig.ctx());
        let senses = AgentSenses {
            position: Vec3::ZERO,
            player_detected: true,
            player_position: None,
        };
        machine.tick(&senses, 0.016, &mut rig.ctx());
        assert_eq!(machine.state(), AgentState::Idle);
    }

    #[test]
    fn test_damage_waits_for_animation() {
        let mut rig = Rig::new(2);
        let mut machine = AgentStateMachine::start(&mut rig.ctx());
        machine.force(AgentState::Damage, &mut rig.ctx());
        assert!(rig.anim.is_triggered(AnimTrigger::Damage));

        // Прогресс застрял ниже 1.0: никогда не выходим
        rig.anim.set_normalized_time(0.99);
        for _ in 0..10_000 {
            machine.tick(&seen_at(Vec3::new(0.0, 0.0, -2.0)), 0.1, &mut rig.ctx());
        }
        assert_eq!(machine.state(), AgentState::Damage);

        // Доиграно, но аниматор ещё в переходе
        rig.anim.set_normalized_time(1.0);
        rig.anim.is_transitioning = true;
        machine.tick(&unseen(), 0.1, &mut rig.ctx());
        assert_eq!(machine.state(), AgentState::Damage);

        rig.anim.is_transitioning = false;
        machine.tick(&unseen(), 0.1, &mut rig.ctx());
        assert_eq!(machine.state(), AgentState::Chase);
    }

    #[test]
    fn test_death_is_terminal_and_destroys_once() {
        let mut rig = Rig::new(2);
        let mut machine = AgentStateMachine::start(&mut rig.ctx());
        assert!(machine.force(AgentState::Death, &mut rig.ctx()));
        assert!(rig.nav.is_stopped());

        assert!(!machine.force(AgentState::Chase, &mut rig.ctx()));
        assert!(!machine.force(AgentState::Death, &mut rig.ctx()));
        assert_eq!(machine.state(), AgentState::Death);

        assert_eq!(machine.tick(&unseen(), 0.1, &mut rig.ctx()), AgentTick::Continue);

        rig.anim.set_normalized_time(1.0);
        assert_eq!(machine.tick(&unseen(), 0.1, &mut rig.ctx()), AgentTick::Destroy);
        assert!(machine.is_destroyed());
        assert_eq!(machine.tick(&unseen(), 0.1, &mut rig.ctx()), AgentTick::Continue);
    }

    #[test]
    fn test_null_target_is_no_transition() {
        let mut rig = Rig::new(2);
        let mut machine = AgentStateMachine::start(&mut rig.ctx());

        assert!(!machine.transition(None, &mut rig.ctx()));
        assert_eq!(machine.state(), AgentState::Patrol);
    }

    #[test]
    fn test_same_state_switch_runs_exit_and_enter() {
        let mut rig = Rig::new(2);
        let mut machine = AgentStateMachine::start(&mut rig.ctx());
        machine.force(AgentState::Damage, &mut rig.ctx());
        rig.anim.take_triggers();
        rig.anim.set_normalized_time(0.7);

        // Второй удар: exit снимает триггер, enter ставит заново и перематывает
        machine.force(AgentState::Damage, &mut rig.ctx());
        assert!(rig.anim.is_triggered(AnimTrigger::Damage));
        assert_eq!(rig.anim.normalized_time(), 0.0);
        assert!(rig.nav.is_stopped());

        // Chase → Chase: висящий Attack триггер сброшен, cooldown заново
        rig.anim.set_normalized_time(1.0);
        machine.tick(&unseen(), 0.1, &mut rig.ctx());
        assert_eq!(machine.state(), AgentState::Chase);
        rig.anim.set_trigger(AnimTrigger::Attack);
        machine.force(AgentState::Chase, &mut rig.ctx());
        assert!(!rig.anim.is_triggered(AnimTrigger::Attack));
        assert!(!rig.nav.is_stopped());
    }

    #[test]
    fn test_fixed_tick_speed_and_facing() {
        let mut rig = Rig::new(2);
        let mut machine = AgentStateMachine::start(&mut rig.ctx());
        let mut transform = Transform::default();

        machine.fixed_tick(&mut transform, &unseen(), 1.0 / 60.0, &mut rig.ctx());
        assert_eq!(rig.nav.speed, rig.config.walk_speed);

        machine.force(AgentState::Chase, &mut rig.ctx());
        let senses = seen_at(Vec3::new(5.0, 0.0, 0.0));
        // dt = 1 → slerp фактор 1.0 (clamp), разворот за один шаг
        machine.fixed_tick(&mut transform, &senses, 1.0, &mut rig.ctx());

        assert_eq!(rig.nav.speed, rig.config.sprint_speed);
        let forward = transform.forward().as_vec3();
        assert!((forward - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_yaw_toward_axes() {
        let forward = yaw_toward(Vec3::NEG_Z) * Vec3::NEG_Z;
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);

        let forward = yaw_toward(Vec3::new(-3.0, 0.0, 0.0)) * Vec3::NEG_Z;
        assert!((forward - Vec3::NEG_X).length() < 1e-5);
    }
}
