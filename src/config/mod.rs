/*! Input configuration

The analysis input is a JSON document with three optional lists
(`cpus`, `tasks`, `resources`) and an optional `analysis` section:

```json
{
  "cpus": [0, 1],
  "tasks": [
    { "name": "t0", "cpu": 0, "T": 10, "D": 10, "C": 1, "P": 5,
      "req": { "1": 1 }, "pid_hint": 3 }
  ],
  "resources": [ { "id": 1, "c": 1 } ],
  "analysis": { "back_to_back": true, "elevation": "raise" }
}
```

Missing sections default to empty. Request maps are keyed by resource
id (as a string) and keep their document order, which determines the
order of the exported table. */

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use thiserror::Error;

use crate::assignment::AssignmentParams;
use crate::model::{ModelError, Priority, ProcessorId, Resource, ResourceId, Task, TaskSystem};
use crate::time::Duration;

/// Reasons why an input configuration cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// The root of an input document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(alias = "processors")]
    pub cpus: Vec<u32>,
    pub tasks: Vec<TaskConfig>,
    pub resources: Vec<ResourceConfig>,
    pub analysis: AssignmentParams,
}

/// A task as described in the input document.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    pub name: String,
    pub cpu: u32,
    #[serde(rename = "T")]
    pub period: f64,
    #[serde(rename = "D")]
    pub deadline: f64,
    #[serde(rename = "C", default)]
    pub wcet: f64,
    #[serde(rename = "P")]
    pub priority: i64,
    #[serde(default, deserialize_with = "ordered_requests")]
    pub req: Vec<(String, u32)>,
    #[serde(default)]
    pub pid_hint: i64,
}

/// A resource as described in the input document.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    pub id: u32,
    pub c: f64,
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Validate the described model and build the task system.
    pub fn build(&self) -> Result<TaskSystem, ModelError> {
        let declared: Vec<ResourceId> = self.resources.iter().map(|r| ResourceId::from(r.id)).collect();
        let tasks = self
            .tasks
            .iter()
            .map(|t| t.build(&declared))
            .collect::<Result<Vec<_>, _>>()?;
        let resources = self
            .resources
            .iter()
            .map(|r| Resource::new(ResourceId::from(r.id), Duration::from(r.c)))
            .collect();
        let processors = self.cpus.iter().copied().map(ProcessorId::from).collect();
        TaskSystem::new(processors, tasks, resources)
    }
}

impl TaskConfig {
    /// Zero-count requests are dropped, but must still name a
    /// resource in `declared`.
    fn build(&self, declared: &[ResourceId]) -> Result<Task, ModelError> {
        let priority = u32::try_from(self.priority).map_err(|_| ModelError::InvalidPriority {
            task: self.name.clone(),
            priority: self.priority,
        })?;
        let mut task = Task::new(
            self.name.as_str(),
            ProcessorId::from(self.cpu),
            Duration::from(self.period),
            Duration::from(self.deadline),
            Duration::from(self.wcet),
            Priority::from(priority),
        )
        .with_pid_hint(self.pid_hint);
        for (key, count) in &self.req {
            let id = key
                .trim()
                .parse::<u32>()
                .map_err(|_| ModelError::InvalidResourceKey {
                    task: self.name.clone(),
                    key: key.clone(),
                })
                .map(ResourceId::from)?;
            if !declared.contains(&id) {
                return Err(ModelError::UnknownResource {
                    task: self.name.clone(),
                    resource: id,
                });
            }
            task = task.with_request(id, *count);
        }
        Ok(task)
    }
}

/// Deserialize a JSON object into its entries, preserving document order.
fn ordered_requests<'de, D>(deserializer: D) -> Result<Vec<(String, u32)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct RequestsVisitor;

    impl<'de> Visitor<'de> for RequestsVisitor {
        type Value = Vec<(String, u32)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map from resource ids to access counts")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut requests = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, u32>()? {
                requests.push(entry);
            }
            Ok(requests)
        }
    }

    deserializer.deserialize_map(RequestsVisitor)
}
