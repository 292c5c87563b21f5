//! Scenario files: agents, their blueprints and a timed world script.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};

use brain_core::{AgentBody, AgentId, BeaconType, ResourceKey};
use brain_planner::{Blueprint, PlannerConfig};

/// A simulation setup, loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Seconds per tick
    #[serde(default = "default_dt_seconds")]
    pub dt_seconds: f32,

    #[serde(default)]
    pub seed: u64,

    /// Ticks to run unless overridden on the command line
    #[serde(default = "default_ticks")]
    pub ticks: u64,

    /// Ticks an agent steering toward a sensible beacon needs to reach it
    #[serde(default = "default_travel_ticks")]
    pub travel_ticks: u32,

    /// Upper bound on planner reactions per dispatch
    #[serde(default = "default_max_cascade")]
    pub max_cascade: u32,

    /// Named blueprints agents can share
    pub blueprints: BTreeMap<String, Blueprint>,

    pub agents: Vec<AgentSpec>,

    #[serde(default)]
    pub script: Vec<ScriptEvent>,
}

fn default_dt_seconds() -> f32 {
    0.5
}

fn default_ticks() -> u64 {
    20
}

fn default_travel_ticks() -> u32 {
    2
}

fn default_max_cascade() -> u32 {
    PlannerConfig::default().max_cascade
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    pub id: AgentId,
    pub blueprint: String,
    #[serde(default)]
    pub resources: Vec<ResourceSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub name: ResourceKey,
    #[serde(default)]
    pub min: f32,
    pub max: f32,
    /// Defaults to `max`
    #[serde(default)]
    pub initial: Option<f32>,
}

/// A world change applied at the start of tick `at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptEvent {
    pub at: u64,
    /// Every agent when absent
    #[serde(default)]
    pub agent: Option<AgentId>,
    #[serde(flatten)]
    pub change: WorldChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldChange {
    Sense(BeaconType),
    Lose(BeaconType),
    Reach(BeaconType),
    Leave(BeaconType),
    Set { resource: ResourceKey, value: f32 },
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario from {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to load scenario from {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Self = serde_yaml::from_str(content).context("Invalid scenario YAML")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.dt_seconds.is_finite() && self.dt_seconds > 0.0,
            "dt_seconds must be positive, got {}",
            self.dt_seconds
        );
        ensure!(self.max_cascade > 0, "max_cascade must be at least 1");
        ensure!(!self.agents.is_empty(), "scenario has no agents");

        let mut ids = BTreeSet::new();
        for agent in &self.agents {
            if !ids.insert(agent.id) {
                bail!("{} is defined twice", agent.id);
            }
            if !self.blueprints.contains_key(&agent.blueprint) {
                bail!("{} uses unknown blueprint `{}`", agent.id, agent.blueprint);
            }
            for resource in &agent.resources {
                resource
                    .validate()
                    .with_context(|| format!("{} resource `{}`", agent.id, resource.name))?;
            }
        }

        for event in &self.script {
            if let Some(agent) = event.agent {
                ensure!(
                    ids.contains(&agent),
                    "script event at tick {} targets unknown {}",
                    event.at,
                    agent
                );
            }
        }
        Ok(())
    }

    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            max_cascade: self.max_cascade,
        }
    }

    pub fn blueprint_for(&self, agent: &AgentSpec) -> Result<&Blueprint> {
        self.blueprints
            .get(&agent.blueprint)
            .with_context(|| format!("unknown blueprint `{}`", agent.blueprint))
    }
}

impl ResourceSpec {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.min.is_finite() && self.max.is_finite(),
            "bounds must be finite"
        );
        ensure!(self.min <= self.max, "min {} exceeds max {}", self.min, self.max);
        if let Some(initial) = self.initial {
            ensure!(initial.is_finite(), "initial value must be finite");
        }
        Ok(())
    }
}

impl AgentSpec {
    /// A fresh body with this agent's resources defined.
    pub fn body(&self) -> AgentBody {
        let mut body = AgentBody::new();
        for resource in &self.resources {
            body.status.define(
                resource.name.clone(),
                resource.min,
                resource.max,
                resource.initial.unwrap_or(resource.max),
            );
        }
        body
    }
}
