//! Headless аниматор: линейные клипы фиксированной длины.
//!
//! Потребляет триггеры, крутит `normalized_time` и шлёт окна урона
//! для клипа атаки (замена animation events хоста).

use bevy::prelude::*;

use crate::bridge::{AnimTrigger, AnimationSignals};
use crate::combat::{Weapon, WeaponWindow};

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct HeadlessAnimator {
    /// Длина любого клипа (секунды)
    pub clip_secs: f32,
    /// Прогресс атаки, на котором открывается окно урона
    pub window_open_at: f32,
    pub window_close_at: f32,
}

impl Default for HeadlessAnimator {
    fn default() -> Self {
        Self {
            clip_secs: 1.0,
            window_open_at: 0.3,
            window_close_at: 0.6,
        }
    }
}

impl HeadlessAnimator {
    /// Один кадр аниматора для одной entity.
    ///
    /// Возвращает окна урона в порядке срабатывания.
    pub fn step(&self, anim: &mut AnimationSignals, weapon_enabled: bool, delta: f32) -> Vec<WindowEdge> {
        let mut edges = Vec::new();

        let triggers = anim.take_triggers();
        if let Some(&clip) = triggers.last() {
            // Клип перезапущен посреди окна урона
            if weapon_enabled {
                edges.push(WindowEdge::Close);
            }
            anim.active_clip = Some(clip);
            anim.rewind();
        }

        anim.is_transitioning = false;
        let Some(clip) = anim.active_clip else {
            return edges;
        };

        let before = anim.normalized_time();
        let step = if self.clip_secs > 0.0 { delta / self.clip_secs } else { 1.0 };
        anim.set_normalized_time(before + step);
        let after = anim.normalized_time();

        if clip == AnimTrigger::Attack {
            if before < self.window_open_at && after >= self.window_open_at {
                edges.push(WindowEdge::Open);
            }
            if before < self.window_close_at && after >= self.window_close_at {
                edges.push(WindowEdge::Close);
            }
        }

        edges
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEdge {
    Open,
    Close,
}

/// Система: продвинуть все клипы на dt кадра
pub fn advance_animations(
    animator: Res<HeadlessAnimator>,
    time: Res<Time>,
    mut animated: Query<(Entity, &mut AnimationSignals, Option<&Weapon>)>,
    mut window_events: EventWriter<WeaponWindow>,
) {
    let delta = time.delta_secs();

    for (entity, mut anim, weapon) in animated.iter_mut() {
        let enabled = weapon.is_some_and(|weapon| weapon.enabled);

        for edge in animator.step(&mut anim, enabled, delta) {
            if weapon.is_none() {
                continue;
            }
            window_events.write(match edge {
                WindowEdge::Open => WeaponWindow::Open(entity),
                WindowEdge::Close => WeaponWindow::Close(entity),
            });
        }
    }
}
