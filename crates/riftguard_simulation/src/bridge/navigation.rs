//! Контракт с navmesh сервисом хоста.
//!
//! ECS пишет intent (destination / halt / resume / speed), хост (или
//! `headless::drive_navigation`) исполняет путь и пишет телеметрию обратно.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    destination: Option<Vec3>,
    is_stopped: bool,
    /// Желаемая скорость (м/с), ставит AI
    pub speed: f32,
    /// Дистанция, на которой хост прекращает движение к цели
    pub stopping_distance: f32,

    // === Телеметрия хоста ===
    /// true пока хост не пересчитал путь после `set_destination`
    pub path_pending: bool,
    pub velocity: Vec3,
    pub remaining_distance: f32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self::new(2.5, 1.5)
    }
}

impl NavAgent {
    pub fn new(speed: f32, stopping_distance: f32) -> Self {
        Self {
            destination: None,
            is_stopped: false,
            speed,
            stopping_distance,
            path_pending: false,
            velocity: Vec3::ZERO,
            remaining_distance: 0.0,
        }
    }

    pub fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
        self.path_pending = true;
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn halt(&mut self) {
        self.is_stopped = true;
    }

    pub fn resume(&mut self) {
        self.is_stopped = false;
    }

    pub fn is_stopped(&self) -> bool {
        self.is_stopped
    }

    /// Арривал по телеметрии: путь посчитан и осталось меньше stopping distance
    pub fn has_arrived(&self) -> bool {
        !self.path_pending && self.remaining_distance < self.stopping_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_destination_marks_pending() {
        let mut nav = NavAgent::new(2.5, 1.5);
        nav.set_destination(Vec3::new(3.0, 0.0, 4.0));

        assert_eq!(nav.destination(), Some(Vec3::new(3.0, 0.0, 4.0)));
        assert!(nav.path_pending);
        assert!(!nav.has_arrived());

        // Хост посчитал путь и довёл агента
        nav.path_pending = false;
        nav.remaining_distance = 0.4;
        assert!(nav.has_arrived());
    }

    #[test]
    fn test_halt_resume() {
        let mut nav = NavAgent::default();
        nav.halt();
        assert!(nav.is_stopped());
        nav.resume();
        assert!(!nav.is_stopped());
    }
}
