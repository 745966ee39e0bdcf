/*! Offline spin-priority assignment for spin-based multiprocessor
locking protocols.

Under a spin-based locking protocol, a task that finds a shared
resource locked busy-waits at its *spin priority*, which may be
elevated above its base priority. This crate computes, offline, a
static table of spin priorities for every (task, resource) pair such
that, as far as an approximate blocking analysis can tell, each task's
worst-case blocking fits into its slack.

The pipeline, leaves first:

- [model]: tasks, resources, and the validated [model::TaskSystem];
- [rate]: per-task and per-processor resource access rates;
- [contention]: the set of remote tasks that cannot be preempted by a
  spinning task;
- [blocking]: the approximate blocking bound Ψ;
- [slack]: per-task slack;
- [spin]: the spin-priority store and its initialization;
- [assignment]: the greedy refinement heuristic;
- [config] and [table]: JSON input and C header output.

```rust
use spin_priority::assignment::{self, ElevationPolicy};
use spin_priority::config::Config;
use spin_priority::table;

let config = Config::from_json(r#"{
    "cpus": [0, 1],
    "tasks": [
        { "name": "a", "cpu": 0, "T": 10, "D": 10, "C": 1, "P": 2, "req": { "1": 1 } },
        { "name": "b", "cpu": 1, "T": 10, "D": 10, "C": 1, "P": 1, "req": { "1": 1 } }
    ],
    "resources": [ { "id": 1, "c": 1 } ],
    "analysis": { "elevation": "overwrite" }
}"#).unwrap();
assert_eq!(config.analysis.elevation, ElevationPolicy::Overwrite);
let system = config.build().unwrap();
let result = assignment::assign(&system, &config.analysis);
assert!(result.infeasible().next().is_none());
assert_eq!(table::entries(&system, &result.priorities).len(), 2);
```
*/

pub mod assignment;
pub mod blocking;
pub mod config;
pub mod contention;
pub mod model;
pub mod rate;
pub mod slack;
pub mod spin;
pub mod table;
pub mod time;
