//! Simulation tuning. Loaded from `aegis.ron` at startup.
//!
//! Every constant the resolvers use lives here so balance can be tweaked
//! without touching code. Missing fields fall back to the shipped defaults.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "aegis.ron";

/// Static shell geometry, sector damage and hazards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Radius of the Dyson shell around the sun.
    pub radius: f32,
    /// Ship is kept at least this far inside the shell.
    pub boundary_margin: f32,
    pub sector_count: usize,
    /// Damage at which a sector collapses.
    pub collapse_threshold: f32,
    /// Plasma vents opened per collapse.
    pub vents_per_collapse: usize,
    /// Vents sit this far outside the shell surface.
    pub vent_radial_offset: f32,
    pub hazard_radius: f32,
    /// Shield drain per dt while inside a vent.
    pub hazard_shield_rate: f32,
    /// Heat gain per dt while inside a vent.
    pub hazard_heat_rate: f32,
    /// Counts of static surface structures: panels, conduits, towers, ruins.
    pub surface_structures: [usize; 4],
    pub obstacle_contact_radius: f32,
    pub obstacle_push: f32,
    pub obstacle_speed_penalty: f32,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            radius: 400.0,
            boundary_margin: 5.0,
            sector_count: 24,
            collapse_threshold: 100.0,
            vents_per_collapse: 3,
            vent_radial_offset: 2.0,
            hazard_radius: 15.0,
            hazard_shield_rate: 2.0,
            hazard_heat_rate: 1.0,
            surface_structures: [200, 50, 30, 15],
            obstacle_contact_radius: 8.0,
            obstacle_push: 0.5,
            obstacle_speed_penalty: 0.7,
        }
    }
}

/// Ship handling and status pools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub max_speed: f32,
    pub acceleration: f32,
    pub pitch_rate: f32,
    pub yaw_rate: f32,
    /// Visual bank reached at full yaw.
    pub max_bank: f32,
    /// Exponential easing factor per dt for the bank angle.
    pub bank_easing: f32,
    pub max_shields: f32,
    pub max_hull: f32,
    pub max_heat: f32,
    /// Damage flash duration in dt units (100 ms at 60 Hz).
    pub damage_flash: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            max_speed: 5.0,
            acceleration: 0.05,
            pitch_rate: 0.03,
            yaw_rate: 0.03,
            max_bank: PI / 3.0,
            bank_easing: 0.1,
            max_shields: 100.0,
            max_hull: 100.0,
            max_heat: 100.0,
            damage_flash: 6.0,
        }
    }
}

/// Corroder swarm behaviour, spawning and replication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub initial_population: usize,
    /// Cumulative roll thresholds for the initial mix: below [0] mite,
    /// below [1] processor, else assembler.
    pub initial_mix: [f32; 2],
    pub population_cap: usize,
    pub replication_cooldown_ms: u64,
    /// Per-tick replication chance is `density × alert × this`.
    pub replication_chance: f32,
    /// Full width of the replication offset box per axis.
    pub replication_spread: f32,
    /// Population is divided by this to get swarm density.
    pub density_normalizer: f32,
    pub communication_radius: f32,
    pub cohesion_strength: f32,
    pub hunt_radius: f32,
    pub contact_range: f32,
    /// Contact damage per dt applied to shields and hull by a mite.
    pub contact_shield_damage: f32,
    pub contact_hull_damage: f32,
    /// Factory cooldown is `base − alert × alert_scale` milliseconds.
    pub factory_cooldown_base_ms: f32,
    pub factory_cooldown_alert_scale_ms: f32,
    /// Full width of the factory spawn offset box per axis.
    pub factory_spread: f32,
    /// Agents farther than shell radius plus this are culled.
    pub out_of_bounds_margin: f32,
    pub alert_gain: f32,
    /// Distance over which ship presence falls off outside the shell.
    pub alert_falloff: f32,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            initial_population: 60,
            initial_mix: [0.4, 0.8],
            population_cap: 150,
            replication_cooldown_ms: 5000,
            replication_chance: 0.01,
            replication_spread: 10.0,
            density_normalizer: 100.0,
            communication_radius: 50.0,
            cohesion_strength: 0.3,
            hunt_radius: 50.0,
            contact_range: 5.0,
            contact_shield_damage: 0.5,
            contact_hull_damage: 0.2,
            factory_cooldown_base_ms: 3000.0,
            factory_cooldown_alert_scale_ms: 2000.0,
            factory_spread: 20.0,
            out_of_bounds_margin: 100.0,
            alert_gain: 0.01,
            alert_falloff: 50.0,
        }
    }
}

/// Quad laser settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub projectile_speed: f32,
    /// Bolt lifetime in ticks.
    pub projectile_lifetime: u32,
    /// Ticks between bursts.
    pub fire_cooldown: u32,
    /// Hardpoints as (right, up) offsets from the ship origin.
    pub hardpoints: Vec<[f32; 2]>,
    pub bolt_length: f32,
    pub bolt_radius: f32,
    pub damage_per_hit: f32,
    /// Sector damage applied where a corroder dies.
    pub kill_sector_damage: f32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            projectile_speed: 8.0,
            projectile_lifetime: 40,
            fire_cooldown: 8,
            hardpoints: vec![[-3.0, 1.0], [3.0, 1.0], [-3.0, -1.0], [3.0, -1.0]],
            bolt_length: 8.0,
            bolt_radius: 0.2,
            damage_per_hit: 1.0,
            kill_sector_damage: 5.0,
        }
    }
}

/// Zone transitions and inner-sanctum rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Entering the sanctum requires being this far inside the shell.
    pub entry_depth: f32,
    pub transition_guard_ms: u64,
    pub sanctum_entry: [f32; 3],
    pub battlefield_entry: [f32; 3],
    /// Heat multiplier falls to its floor at this distance from the core.
    pub heat_falloff: f32,
    pub min_heat_multiplier: f32,
    /// Shield drain per dt as a fraction of the heat multiplier.
    pub shield_bleed: f32,
    pub critical_heat: f32,
    /// Hull damage per dt per point of heat above critical.
    pub critical_heat_hull_rate: f32,
    pub junction_count: usize,
    /// Full width of the junction placement box per axis.
    pub junction_spread: f32,
    pub junction_hp: f32,
    pub junction_spawn_chance: f32,
    /// Full width of the junction raider spawn box per axis.
    pub junction_spawn_spread: f32,
    /// Chance a junction raider is a mite rather than a processor.
    pub junction_raider_mite_chance: f32,
    pub junction_attack_range: f32,
    pub junction_attack_rate: f32,
    pub battlefield_sun_intensity: f32,
    pub sanctum_sun_intensity: f32,
    /// Junction explosion effect lifetime in dt units (3 s at 60 Hz).
    pub explosion_lifetime: f32,
    /// Drifting plasma clouds around the core. Visual only.
    pub plasma_clouds: usize,
    pub plasma_cloud_spread: f32,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            entry_depth: 10.0,
            transition_guard_ms: 1000,
            sanctum_entry: [0.0, 0.0, -50.0],
            battlefield_entry: [0.0, 0.0, -350.0],
            heat_falloff: 80.0,
            min_heat_multiplier: 0.1,
            shield_bleed: 0.5,
            critical_heat: 80.0,
            critical_heat_hull_rate: 0.1,
            junction_count: 8,
            junction_spread: 100.0,
            junction_hp: 20.0,
            junction_spawn_chance: 0.005,
            junction_spawn_spread: 30.0,
            junction_raider_mite_chance: 0.7,
            junction_attack_range: 10.0,
            junction_attack_rate: 0.5,
            battlefield_sun_intensity: 1.5,
            sanctum_sun_intensity: 3.0,
            explosion_lifetime: 180.0,
            plasma_clouds: 20,
            plasma_cloud_spread: 200.0,
        }
    }
}

/// Complete simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub shell: ShellConfig,
    pub flight: FlightConfig,
    pub swarm: SwarmConfig,
    pub weapons: WeaponConfig,
    pub zone: ZoneConfig,
    /// Fixed RNG seed for reproducible runs; entropy when absent.
    pub seed: Option<u64>,
}

impl SimConfig {
    /// Load config from `aegis.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = ron::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save config as pretty RON.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let s = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, s).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject configs the resolvers cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        if self.shell.radius <= 0.0 {
            return invalid("shell.radius must be positive");
        }
        if self.shell.boundary_margin < 0.0 || self.shell.boundary_margin >= self.shell.radius {
            return invalid("shell.boundary_margin must lie in [0, radius)");
        }
        if self.shell.sector_count == 0 {
            return invalid("shell.sector_count must be at least 1");
        }
        if self.shell.collapse_threshold <= 0.0 {
            return invalid("shell.collapse_threshold must be positive");
        }
        if self.swarm.population_cap == 0 {
            return invalid("swarm.population_cap must be at least 1");
        }
        if self.swarm.communication_radius <= 0.0 {
            return invalid("swarm.communication_radius must be positive");
        }
        if self.weapons.projectile_lifetime == 0 {
            return invalid("weapons.projectile_lifetime must be at least 1 tick");
        }
        if self.weapons.hardpoints.is_empty() {
            return invalid("weapons.hardpoints must not be empty");
        }
        if self.zone.heat_falloff <= 0.0 {
            return invalid("zone.heat_falloff must be positive");
        }
        Ok(())
    }

    /// Ship clamp distance from the shell centre.
    pub fn boundary_limit(&self) -> f32 {
        self.shell.radius - self.shell.boundary_margin
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE)
}
