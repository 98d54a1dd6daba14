//! Ростеры живых агентов и spawn points.
//!
//! Вместо ленивой чистки null-ссылок: явный sweep раз в кадр.
//! Агент считается живым пока entity существует (Death клип ещё играет),
//! spawn point выбывает сразу при нуле health.

use bevy::prelude::*;

use super::components::SpawnPoint;
use crate::agent::Agent;
use crate::vitals::VitalStats;

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Roster {
    pub living_agents: Vec<Entity>,
    pub living_spawners: Vec<Entity>,
}

impl Roster {
    pub fn clear(&mut self) {
        self.living_agents.clear();
        self.living_spawners.clear();
    }

    pub fn has_living_spawners(&self) -> bool {
        !self.living_spawners.is_empty()
    }

    pub fn has_living_agents(&self) -> bool {
        !self.living_agents.is_empty()
    }

    /// Добавить свежезаспавненного агента (без ожидания следующего rebuild)
    pub fn push_agent(&mut self, entity: Entity) {
        if !self.living_agents.contains(&entity) {
            self.living_agents.push(entity);
        }
    }

    /// Агенты: пока не despawn'нуты. Spawn points: существуют и живы.
    pub fn sweep(&mut self, vitals: &Query<&VitalStats>) {
        self.living_agents.retain(|entity| vitals.contains(*entity));
        self.living_spawners
            .retain(|entity| vitals.get(*entity).is_ok_and(VitalStats::is_alive));
    }
}

/// Система: sweep ростеров (только пока игра идёт, иначе они пусты)
pub fn sweep_rosters(mut roster: ResMut<Roster>, vitals: Query<&VitalStats>) {
    let before = (roster.living_agents.len(), roster.living_spawners.len());
    roster.sweep(&vitals);
    let after = (roster.living_agents.len(), roster.living_spawners.len());

    if before != after {
        crate::log(&format!(
            "Roster sweep: agents {} → {}, spawners {} → {}",
            before.0, after.0, before.1, after.1
        ));
    }
}

/// Пересобрать ростеры из всех живых агентов / spawn points мира (старт игры)
pub fn rebuild_roster(
    roster: &mut Roster,
    agents: &Query<(Entity, &VitalStats), (With<Agent>, Without<SpawnPoint>)>,
    spawners: &Query<(Entity, &VitalStats), (With<SpawnPoint>, Without<Agent>)>,
) {
    roster.living_agents = agents
        .iter()
        .filter(|(_, vitals)| vitals.is_alive())
        .map(|(entity, _)| entity)
        .collect();
    roster.living_spawners = spawners
        .iter()
        .filter(|(_, vitals)| vitals.is_alive())
        .map(|(entity, _)| entity)
        .collect();

    // Порядок query не гарантирован, а индекс spawner'а выбирает RNG
    roster.living_agents.sort();
    roster.living_spawners.sort();
}
