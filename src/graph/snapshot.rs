// src/graph/snapshot.rs
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDeclaration {
    pub name: String,
    #[serde(default)]
    pub owning_module: Option<String>,
}

/// Components forming one cycle, in the order the host reports them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CircularDependency {
    pub components: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Configuration,
    Service,
    Resource,
    Bundle,
    Custom,
}

impl DependencyKind {
    /// The four fixed categories, in reporting order.
    pub const STANDARD: [DependencyKind; 4] = [
        DependencyKind::Configuration,
        DependencyKind::Service,
        DependencyKind::Resource,
        DependencyKind::Bundle,
    ];

    fn plural(self) -> &'static str {
        match self {
            DependencyKind::Configuration => "configuration(s)",
            DependencyKind::Service => "service(s)",
            DependencyKind::Resource => "resource(s)",
            DependencyKind::Bundle => "bundle(s)",
            DependencyKind::Custom => "custom dependency(ies)",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingDependency {
    pub name: String,
    pub owning_module: String,
    pub kind: DependencyKind,
    #[serde(default)]
    pub custom_type: Option<String>,
}

impl MissingDependency {
    pub fn new(name: impl Into<String>, owning_module: impl Into<String>, kind: DependencyKind) -> Self {
        Self {
            name: name.into(),
            owning_module: owning_module.into(),
            kind,
            custom_type: None,
        }
    }

    pub fn custom(
        name: impl Into<String>,
        owning_module: impl Into<String>,
        custom_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            owning_module: owning_module.into(),
            kind: DependencyKind::Custom,
            custom_type: Some(custom_type.into()),
        }
    }

    pub fn issue(&self) -> String {
        match self.kind {
            DependencyKind::Custom => format!(
                "Missing custom dependency {}({}) for bundle {}",
                self.name,
                self.custom_type.as_deref().unwrap_or("custom"),
                self.owning_module
            ),
            _ => format!(
                "Missing dependency {} for bundle {}",
                self.name, self.owning_module
            ),
        }
    }
}

/// Point-in-time view of the host's component wiring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyGraphSnapshot {
    #[serde(default)]
    pub unregistered: Vec<ComponentDeclaration>,
    #[serde(default)]
    pub circular: Vec<CircularDependency>,
    #[serde(default)]
    pub missing: Vec<MissingDependency>,
}

impl DependencyGraphSnapshot {
    pub fn is_empty(&self) -> bool {
        self.unregistered.is_empty() && self.circular.is_empty() && self.missing.is_empty()
    }

    /// Missing dependencies of one category, in host order.
    pub fn missing_of(&self, kind: DependencyKind) -> impl Iterator<Item = &MissingDependency> {
        self.missing.iter().filter(move |m| m.kind == kind)
    }
}
