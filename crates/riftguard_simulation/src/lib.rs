//! Riftguard Simulation Core
//!
//! ECS-симуляция боевого ядра на Bevy 0.16: AI агентов, FSM игрока,
//! волны врагов, spawn points, резолв урона.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = правила игры (состояния, таймеры, урон, волны)
//! - Хост = исполнение (navmesh, аниматор, физика, рендер)
//! - `headless` = минимальный хост для бинарника и тестов

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod agent;
pub mod bridge;
pub mod combat;
pub mod config;
pub mod headless;
pub mod logger;
pub mod player;
pub mod schedule;
pub mod session;
pub mod spawn;
pub mod vitals;
pub mod waves;

// Re-export базовых типов для удобства
pub use agent::{AgentPlugin, AgentState};
pub use bridge::BridgePlugin;
pub use combat::{CombatPlugin, DamageDealt};
pub use config::{ConfigError, GameConfig};
pub use headless::HeadlessPlugin;
pub use logger::{
    init_logger, log, log_error, log_info, log_level, log_warning, log_with_level,
    set_log_level, set_logger, set_logger_if_needed, LogLevel, LogPrinter,
};
pub use player::{PlayerPlugin, PlayerState};
pub use session::{GameEnded, SessionCommand, SessionPlugin};
pub use spawn::SpawnPlugin;
pub use vitals::VitalsPlugin;
pub use waves::{WavePhase, WavesPlugin};

/// Порядок логики внутри кадра (Update)
///
/// Damage / Death от combat применяются до тика FSM агентов, поэтому
/// убитый в этом кадре агент уже в Death к проверке auto-destroy.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Хост → ECS (тела геометрии, прогресс анимаций)
    HostSync,
    /// Start / End команды
    Session,
    /// Снимок ввода игрока
    Input,
    /// Окна оружия, overlap → урон
    Combat,
    /// Perception + FSM агентов, kill tally
    Agents,
    Player,
    /// Sweep ростеров живых агентов / spawn points
    Roster,
    /// Секундный тик волн
    Waves,
    /// Победа / поражение
    Outcome,
}

/// Порядок внутри physics тика (FixedUpdate)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicsSet {
    /// fixed_tick FSM (скорости, ground probe, таймеры stamina)
    Logic,
    /// Исполнение хостом (навигация, интеграция, overlap)
    Host,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для physics tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Хост может загрузить свой GameConfig до плагина
            .init_resource::<GameConfig>();

        // Детерминистичный RNG (seed по умолчанию, если хост не задал свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.configure_sets(
            Update,
            (
                SimulationSet::HostSync,
                SimulationSet::Session,
                SimulationSet::Input,
                SimulationSet::Combat,
                SimulationSet::Agents,
                SimulationSet::Player,
                SimulationSet::Roster,
                SimulationSet::Waves,
                SimulationSet::Outcome,
            )
                .chain(),
        )
        .configure_sets(FixedUpdate, (PhysicsSet::Logic, PhysicsSet::Host).chain());

        // Подсистемы
        app.add_plugins((
            VitalsPlugin,
            BridgePlugin,
            CombatPlugin,
            AgentPlugin,
            PlayerPlugin,
            SpawnPlugin,
            WavesPlugin,
            SessionPlugin,
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Хост = `HeadlessPlugin`. `SimulationPlugin` добавляет вызывающий.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)) // 60Hz FixedUpdate
        .add_plugins(HeadlessPlugin);

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
