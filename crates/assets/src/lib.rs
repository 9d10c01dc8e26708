//! Scene asset loading.
//!
//! Two asset kinds exist: a hierarchical chain description (JSON, a named
//! root joint with nested children) and a scenario config (YAML, swarm
//! population plus optional asset paths). Loading may fail or never finish;
//! the simulation runs on empty collections either way, so every load is
//! optional by contract.
//!
//! Chain loads run on a background thread and publish through a channel. The
//! frame loop drains the channel between ticks, so a tick never observes a
//! partially installed chain.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tidepool_kernel::Joint;

/// Errors from asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("chain description parse error: {0}")]
    Chain(#[from] serde_json::Error),
    #[error("scenario parse error: {0}")]
    Scenario(#[from] serde_yaml::Error),
}

/// A named joint with nested children, as authored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointNode {
    pub name: String,
    #[serde(default)]
    pub children: Vec<JointNode>,
}

/// Hierarchical description of the articulated chain: a named root joint
/// plus nested child joints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainDescription {
    pub root: JointNode,
}

impl ChainDescription {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = File::open(path.as_ref())?;
        let description = serde_json::from_reader(BufReader::new(file))?;
        Ok(description)
    }

    /// Flatten the hierarchy into the ordered chain, parent before child,
    /// depth-first. A joint's position in this sequence is its pose index,
    /// so the order is load-bearing and never changes after construction.
    pub fn joints(&self) -> Vec<Joint> {
        let mut joints = Vec::new();
        collect(&self.root, &mut joints);
        joints
    }
}

fn collect(node: &JointNode, out: &mut Vec<Joint>) {
    out.push(Joint::named(node.name.clone()));
    for child in &node.children {
        collect(child, out);
    }
}

/// Swarm population and optional asset paths for one scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub bodies: usize,
    pub seed: u64,
    /// Scatter radius around the origin.
    pub spread: f32,
    /// Half extent of every body, uniform on all axes.
    pub half_extent: f32,
    /// Equirectangular backdrop image, if the scene has one.
    #[serde(default)]
    pub environment: Option<PathBuf>,
    /// Chain description to load in the background, if any.
    #[serde(default)]
    pub chain: Option<PathBuf>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            bodies: 24,
            seed: 42,
            spread: 2.0,
            half_extent: 0.25,
            environment: None,
            chain: None,
        }
    }
}

impl ScenarioConfig {
    /// Load from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = File::open(path.as_ref())?;
        let config = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(config)
    }
}

/// Load a chain description on a background thread.
///
/// The result arrives on the returned channel whenever the load finishes;
/// the caller drains it between ticks and installs the flattened joints in
/// one shot. If the load fails the chain simply stays empty.
pub fn spawn_chain_loader(
    path: PathBuf,
) -> mpsc::Receiver<Result<ChainDescription, AssetError>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        tracing::debug!(path = %path.display(), "loading chain description");
        let result = ChainDescription::load(&path);
        // The receiver may already be gone if the app shut down.
        let _ = tx.send(result);
    });
    rx
}

pub fn crate_info() -> &'static str {
    "tidepool-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CHAIN_JSON: &str = r#"{
        "root": {
            "name": "tentacle_root",
            "children": [
                { "name": "seg_1", "children": [
                    { "name": "seg_2", "children": [
                        { "name": "tip" }
                    ]}
                ]}
            ]
        }
    }"#;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn chain_flattens_parent_before_child() {
        let file = write_temp(CHAIN_JSON);
        let description = ChainDescription::load(file.path()).unwrap();
        let joints = description.joints();
        let names: Vec<&str> = joints.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, ["tentacle_root", "seg_1", "seg_2", "tip"]);
    }

    #[test]
    fn chain_with_branching_children_is_depth_first() {
        let file = write_temp(
            r#"{ "root": { "name": "r", "children": [
                { "name": "a", "children": [ { "name": "a1" } ] },
                { "name": "b" }
            ]}}"#,
        );
        let description = ChainDescription::load(file.path()).unwrap();
        let names: Vec<String> = description.joints().iter().map(|j| j.name.clone()).collect();
        assert_eq!(names, ["r", "a", "a1", "b"]);
    }

    #[test]
    fn missing_chain_file_is_an_io_error() {
        let err = ChainDescription::load("/nonexistent/tentacle.json").unwrap_err();
        assert!(matches!(err, AssetError::Io(_)));
    }

    #[test]
    fn malformed_chain_is_a_parse_error() {
        let file = write_temp("{ not json");
        let err = ChainDescription::load(file.path()).unwrap_err();
        assert!(matches!(err, AssetError::Chain(_)));
    }

    #[test]
    fn scenario_roundtrip() {
        let file = write_temp(
            "bodies: 8\nseed: 7\nspread: 1.5\nhalf_extent: 0.1\nchain: tentacle.json\n",
        );
        let config = ScenarioConfig::load(file.path()).unwrap();
        assert_eq!(config.bodies, 8);
        assert_eq!(config.seed, 7);
        assert_eq!(config.spread, 1.5);
        assert_eq!(config.chain, Some(PathBuf::from("tentacle.json")));
        assert!(config.environment.is_none());
    }

    #[test]
    fn scenario_defaults_are_usable() {
        let config = ScenarioConfig::default();
        assert!(config.bodies > 0);
        assert!(config.half_extent > 0.0);
    }

    #[test]
    fn loader_delivers_result_on_channel() {
        let file = write_temp(CHAIN_JSON);
        let rx = spawn_chain_loader(file.path().to_path_buf());
        let result = rx.recv().unwrap();
        assert_eq!(result.unwrap().joints().len(), 4);
    }

    #[test]
    fn loader_delivers_failure_without_panicking() {
        let rx = spawn_chain_loader(PathBuf::from("/nonexistent/tentacle.json"));
        let result = rx.recv().unwrap();
        assert!(result.is_err());
    }
}
