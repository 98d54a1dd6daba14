//! Сигналы аниматору хоста (fire-and-forget triggers) и обратная телеметрия.

use bevy::prelude::*;

/// Триггеры аниматора (в оригинале строковые имена параметров)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AnimTrigger {
    Move,
    Fall,
    Land,
    Attack,
    Damage,
    Death,
    Victory,
}

/// Мост к аниматору: core ставит / снимает триггеры, хост потребляет их
/// (`take_triggers`) и пишет `normalized_time` / `is_transitioning`.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimationSignals {
    pending: Vec<AnimTrigger>,
    normalized_time: f32,
    /// Аниматор в blend'е между состояниями
    pub is_transitioning: bool,
    /// Root motion: движение ведёт анимация (атака игрока)
    pub root_motion: bool,
    /// Текущий клип по данным хоста
    pub active_clip: Option<AnimTrigger>,
}

impl AnimationSignals {
    /// Ставит триггер и перематывает прогресс в 0, чтобы старое 1.0 не
    /// "завершило" только что запрошенный клип.
    pub fn set_trigger(&mut self, trigger: AnimTrigger) {
        if !self.pending.contains(&trigger) {
            self.pending.push(trigger);
        }
        self.normalized_time = 0.0;
    }

    pub fn reset_trigger(&mut self, trigger: AnimTrigger) {
        self.pending.retain(|pending| *pending != trigger);
    }

    pub fn is_triggered(&self, trigger: AnimTrigger) -> bool {
        self.pending.contains(&trigger)
    }

    /// Хост забирает поставленные триггеры (в порядке постановки)
    pub fn take_triggers(&mut self) -> Vec<AnimTrigger> {
        std::mem::take(&mut self.pending)
    }

    pub fn normalized_time(&self) -> f32 {
        self.normalized_time
    }

    /// Хост пишет прогресс клипа, clamp в [0, 1]
    pub fn set_normalized_time(&mut self, value: f32) {
        self.normalized_time = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    }

    pub fn rewind(&mut self) {
        self.normalized_time = 0.0;
    }

    /// Клип доигран и аниматор не в переходе
    pub fn is_settled_at(&self, threshold: f32) -> bool {
        !self.is_transitioning && self.normalized_time >= threshold
    }
}
