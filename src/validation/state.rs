use log::{debug, error, info, warn};

use partitioner_api::devicegraph::{DeviceGraph, Finding};

use crate::collaborators::Answer;

use super::{presenter, SetupValidator};

/// Final result of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The setup can be used.
    Accept,

    /// The caller must not go on with the setup.
    Reject,
}

/// States of a validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationState {
    /// Running the correctness checks.
    Checking,

    /// Fatal findings were found; the user is told and the run rejected.
    Blocked(Vec<Finding>),

    /// Only advisory findings were found; the user decides.
    AwaitingUser(Vec<Finding>),

    /// Making sure the packages for the storage features in use are there.
    PackageCheck,

    Done(Outcome),
}

impl SetupValidator<'_> {
    /// Performs a single transition of the validation state machine.
    pub fn step(&self, state: ValidationState, graph: &DeviceGraph) -> ValidationState {
        match state {
            ValidationState::Checking => self.check(graph),
            ValidationState::Blocked(findings) => self.block(&findings),
            ValidationState::AwaitingUser(findings) => self.ask(&findings),
            ValidationState::PackageCheck => self.check_packages(graph),
            ValidationState::Done(outcome) => ValidationState::Done(outcome),
        }
    }

    fn check(&self, graph: &DeviceGraph) -> ValidationState {
        let report = match self.checker.check(graph) {
            Ok(report) => report,
            Err(e) => {
                error!("Failed to check the storage setup: {e:?}");
                return ValidationState::Done(Outcome::Reject);
            }
        };

        let mut findings = report.findings;
        if !report.valid && findings.is_empty() {
            findings.push(Finding::advisory("The storage setup is not valid"));
        }
        debug!("Storage setup check returned {} finding(s)", findings.len());

        if findings.iter().any(Finding::is_fatal) {
            ValidationState::Blocked(findings)
        } else if !findings.is_empty() {
            ValidationState::AwaitingUser(findings)
        } else {
            ValidationState::PackageCheck
        }
    }

    fn block(&self, findings: &[Finding]) -> ValidationState {
        for finding in findings {
            warn!("Storage setup issue ({}): {}", finding.severity, finding.description);
        }
        if let Err(e) = self.prompt.notify(&presenter::error_report(findings)) {
            error!("Failed to report storage setup errors: {e:?}");
        }
        ValidationState::Done(Outcome::Reject)
    }

    fn ask(&self, findings: &[Finding]) -> ValidationState {
        match self.prompt.confirm(&presenter::advisory_question(findings)) {
            Ok(Answer::Accept) => {
                info!("Storage setup issues accepted by the user");
                ValidationState::PackageCheck
            }
            Ok(Answer::Decline) => {
                info!("Storage setup issues declined by the user");
                ValidationState::Done(Outcome::Reject)
            }
            Err(e) => {
                error!("Failed to ask the user about storage setup issues: {e:?}");
                ValidationState::Done(Outcome::Reject)
            }
        }
    }

    fn check_packages(&self, graph: &DeviceGraph) -> ValidationState {
        let packages = match self.resolver.required_packages(graph) {
            Ok(packages) => packages,
            Err(e) => {
                error!("Failed to determine the required packages: {e:?}");
                return ValidationState::Done(Outcome::Reject);
            }
        };

        if packages.is_empty() {
            debug!("No packages required by the storage setup");
            return ValidationState::Done(Outcome::Accept);
        }

        if self.flags.is_first_installation() {
            debug!(
                "Skipping installation of {} package(s) during first installation",
                packages.len()
            );
            return ValidationState::Done(Outcome::Accept);
        }

        match self.installer.ensure_installed(&packages) {
            Ok(true) => ValidationState::Done(Outcome::Accept),
            Ok(false) => {
                warn!("Not all packages required by the storage setup are installed");
                ValidationState::Done(Outcome::Reject)
            }
            Err(e) => {
                error!("Failed to install the packages required by the storage setup: {e:?}");
                ValidationState::Done(Outcome::Reject)
            }
        }
    }
}
