//! Decide which capabilities, and therefore which instructions, are left out
//! of the generated code.

use crate::config::Config;
use crate::grammar::{Enumerant, Grammar, Instruction};
use log::debug;
use std::collections::BTreeSet;
use std::fmt;

/// The capability, extension and operand-kind sets instructions are checked
/// against. Built once by [`Exclusions::resolve`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Exclusions {
    unsupported_capabilities: BTreeSet<String>,
    supported_extensions: BTreeSet<String>,
    unsupported_kinds: BTreeSet<String>,
}

/// Why an instruction was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    /// Every capability the instruction declares is unsupported.
    Capabilities,
    /// The instruction requires an extension that is not supported.
    Extension(String),
    /// An operand has an unsupported kind.
    Kind(String),
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::Capabilities => write!(f, "all required capabilities are unsupported"),
            Exclusion::Extension(e) => write!(f, "requires unsupported extension {e}"),
            Exclusion::Kind(k) => write!(f, "has an operand of unsupported kind {k}"),
        }
    }
}

impl Exclusions {
    /// Grows the configured unsupported capabilities over the `Capability`
    /// kind of `grammar`.
    ///
    /// Enumerants are visited once, in declaration order. A capability becomes
    /// unsupported if all of its prerequisite capabilities are (and it has at
    /// least one), or else if any extension it requires is not supported. A
    /// capability whose prerequisite is only marked later in the list is not
    /// revisited.
    pub fn resolve(grammar: &Grammar, config: &Config) -> Self {
        let mut exclusions = Self {
            unsupported_capabilities: config.unsupported_capabilities().clone(),
            supported_extensions: config.supported_extensions(),
            unsupported_kinds: config.unsupported_kinds().clone(),
        };

        let capabilities = grammar
            .operand_kinds
            .iter()
            .filter(|k| k.name() == "Capability")
            .flat_map(|k| k.enumerants());
        for capability in capabilities {
            if exclusions.requires_unsupported_capability(&capability.capabilities) {
                debug!(
                    "Capability {} is unsupported: depends on {:?}",
                    capability.enumerant, capability.capabilities
                );
                exclusions.add(capability);
                continue;
            }
            if exclusions.requires_unsupported_extension(&capability.extensions) {
                debug!(
                    "Capability {} is unsupported: requires one of {:?}",
                    capability.enumerant, capability.extensions
                );
                exclusions.add(capability);
            }
        }
        exclusions
    }

    fn add(&mut self, capability: &Enumerant) {
        self.unsupported_capabilities
            .insert(capability.enumerant.clone());
    }

    /// True if `capabilities` is non-empty and every entry is unsupported.
    pub fn requires_unsupported_capability(&self, capabilities: &[String]) -> bool {
        !capabilities.is_empty()
            && capabilities
                .iter()
                .all(|c| self.unsupported_capabilities.contains(c))
    }

    /// True if any of `extensions` is not supported.
    pub fn requires_unsupported_extension(&self, extensions: &[String]) -> bool {
        self.unsupported_extension(extensions).is_some()
    }

    fn unsupported_extension<'a>(&self, extensions: &'a [String]) -> Option<&'a String> {
        extensions
            .iter()
            .find(|e| !self.supported_extensions.contains(*e))
    }

    /// Returns why `inst` must be left out, or `None` if code is generated for
    /// it.
    pub fn exclusion(&self, inst: &Instruction) -> Option<Exclusion> {
        if self.requires_unsupported_capability(&inst.capabilities) {
            return Some(Exclusion::Capabilities);
        }
        if let Some(e) = self.unsupported_extension(&inst.extensions) {
            return Some(Exclusion::Extension(e.clone()));
        }
        inst.operands
            .iter()
            .find(|o| self.unsupported_kinds.contains(&o.kind))
            .map(|o| Exclusion::Kind(o.kind.clone()))
    }

    pub fn unsupported_capabilities(&self) -> &BTreeSet<String> {
        &self.unsupported_capabilities
    }

    pub fn is_capability_supported(&self, name: &str) -> bool {
        !self.unsupported_capabilities.contains(name)
    }
}
