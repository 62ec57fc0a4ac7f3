//! Pipeline steps, the plan that orders them, and the record a run leaves.
//!
//! The plan is a flat list built by conditional appending. Ordering is part
//! of the contract: tests compare whole lists.

use std::fmt;

use serde::Serialize;

/// One named unit of pipeline work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Generate,
    Support,
    Stub,
    VerifyAppTemplate,
    VerifyAppTools,
    Code { test_mode: bool },
    Requirements { test_mode: bool },
    Resources,
    Cleanup,
}

impl Step {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Support => "support",
            Self::Stub => "stub",
            Self::VerifyAppTemplate => "verify-app-template",
            Self::VerifyAppTools => "verify-app-tools",
            Self::Code { .. } => "code",
            Self::Requirements { .. } => "requirements",
            Self::Resources => "resources",
            Self::Cleanup => "cleanup",
        }
    }

    /// The fresh/update flag, for steps that carry one.
    pub const fn flag(&self) -> Option<bool> {
        match self {
            Self::Code { test_mode } | Self::Requirements { test_mode } => Some(*test_mode),
            _ => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered steps to run once the template has been generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPlan {
    steps: Vec<Step>,
}

impl StepPlan {
    /// Steps that follow `generate`.
    ///
    /// `stub` is inserted right after `support` when the template declared a
    /// stub binary revision.
    pub fn after_generate(requires_stub: bool, test_mode: bool) -> Self {
        let mut steps = vec![Step::Support];
        if requires_stub {
            steps.push(Step::Stub);
        }
        steps.extend([
            Step::VerifyAppTemplate,
            Step::VerifyAppTools,
            Step::Code { test_mode },
            Step::Requirements { test_mode },
            Step::Resources,
            Step::Cleanup,
        ]);
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<'a> IntoIterator for &'a StepPlan {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// `(step, app, flag)` entry of a run's action log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: &'static str,
    pub app: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<bool>,
}

impl StepRecord {
    pub fn new(step: Step, app: impl Into<String>) -> Self {
        Self {
            step: step.name(),
            app: app.into(),
            flag: step.flag(),
        }
    }
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.flag {
            Some(flag) => write!(f, "({}, {}, {})", self.step, self.app, flag),
            None => write!(f, "({}, {})", self.step, self.app),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(plan: &StepPlan) -> Vec<&'static str> {
        plan.steps().iter().map(Step::name).collect()
    }

    #[test]
    fn plan_without_stub() {
        let plan = StepPlan::after_generate(false, false);
        assert_eq!(
            names(&plan),
            [
                "support",
                "verify-app-template",
                "verify-app-tools",
                "code",
                "requirements",
                "resources",
                "cleanup",
            ]
        );
    }

    #[test]
    fn stub_goes_between_support_and_verification() {
        let plan = StepPlan::after_generate(true, false);
        assert_eq!(&names(&plan)[..3], ["support", "stub", "verify-app-template"]);
        assert_eq!(plan.len(), 8);
    }

    #[test]
    fn only_code_and_requirements_carry_the_flag() {
        let plan = StepPlan::after_generate(true, true);
        let flagged: Vec<_> = plan
            .steps()
            .iter()
            .filter_map(|s| s.flag().map(|f| (s.name(), f)))
            .collect();
        assert_eq!(flagged, [("code", true), ("requirements", true)]);
    }

    #[test]
    fn record_display() {
        assert_eq!(
            StepRecord::new(Step::Code { test_mode: false }, "first").to_string(),
            "(code, first, false)"
        );
        assert_eq!(
            StepRecord::new(Step::Cleanup, "first").to_string(),
            "(cleanup, first)"
        );
    }
}
