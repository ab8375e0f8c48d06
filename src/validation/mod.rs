//! Validation of the storage setup before the partitioner lets the user go on.
//!
//! The validation runs as a small state machine:
//!
//! ```text
//! Checking ──> Blocked ───────────────────────────> Done(reject)
//!     │
//!     ├──────> AwaitingUser ──(decline)───────────> Done(reject)
//!     │             │
//!     │          (accept)
//!     │             v
//!     └──────> PackageCheck ──────────────────────> Done(accept | reject)
//! ```

use log::{debug, info};

use partitioner_api::devicegraph::DeviceGraph;

use crate::collaborators::{
    CorrectnessChecker, EnvironmentFlags, FeaturePackageResolver, PackageInstaller, UserPrompt,
};

pub mod presenter;
mod state;

pub use state::{Outcome, ValidationState};

pub struct SetupValidator<'a> {
    checker: &'a dyn CorrectnessChecker,
    resolver: &'a dyn FeaturePackageResolver,
    installer: &'a dyn PackageInstaller,
    prompt: &'a dyn UserPrompt,
    flags: &'a dyn EnvironmentFlags,
}

impl<'a> SetupValidator<'a> {
    pub fn new(
        checker: &'a dyn CorrectnessChecker,
        resolver: &'a dyn FeaturePackageResolver,
        installer: &'a dyn PackageInstaller,
        prompt: &'a dyn UserPrompt,
        flags: &'a dyn EnvironmentFlags,
    ) -> Self {
        Self {
            checker,
            resolver,
            installer,
            prompt,
            flags,
        }
    }

    /// Runs the whole validation. Returns whether the setup can be used.
    pub fn validate(&self, graph: &DeviceGraph) -> bool {
        self.run(graph) == Outcome::Accept
    }

    /// Drives the state machine until it is done.
    pub fn run(&self, graph: &DeviceGraph) -> Outcome {
        info!("Validating storage setup");
        let mut state = ValidationState::Checking;
        loop {
            debug!("Validation state: {state:?}");
            state = match state {
                ValidationState::Done(outcome) => {
                    info!("Storage setup validation finished: {outcome:?}");
                    return outcome;
                }
                state => self.step(state, graph),
            };
        }
    }
}
