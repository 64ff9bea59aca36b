//! Package ecosystem identifiers recognized in update declarations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported package ecosystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ecosystem {
    /// Bun (bun.lockb)
    Bun,
    /// Ruby (Gemfile)
    Bundler,
    /// Rust (Cargo.toml)
    Cargo,
    /// PHP (composer.json)
    Composer,
    /// Dev container features (devcontainer.json)
    Devcontainers,
    /// Container images (Dockerfile)
    Docker,
    /// Compose files (docker-compose.yml)
    DockerCompose,
    /// .NET SDK (global.json)
    DotnetSdk,
    /// Elm (elm.json)
    Elm,
    /// CI actions (workflow files)
    GithubActions,
    /// Git submodules (.gitmodules)
    Gitsubmodule,
    /// Go modules (go.mod)
    Gomod,
    /// Gradle (build.gradle)
    Gradle,
    /// Helm charts (Chart.yaml)
    Helm,
    /// Maven (pom.xml)
    Maven,
    /// Elixir (mix.exs)
    Mix,
    /// Node.js (package.json)
    Npm,
    /// .NET packages (*.csproj)
    Nuget,
    /// Python (requirements.txt, pyproject.toml)
    Pip,
    /// Dart (pubspec.yaml)
    Pub,
    /// Swift (Package.swift)
    Swift,
    /// Terraform (*.tf)
    Terraform,
    /// Python via uv (uv.lock)
    Uv,
}

impl Ecosystem {
    /// Returns the identifier used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Bun => "bun",
            Ecosystem::Bundler => "bundler",
            Ecosystem::Cargo => "cargo",
            Ecosystem::Composer => "composer",
            Ecosystem::Devcontainers => "devcontainers",
            Ecosystem::Docker => "docker",
            Ecosystem::DockerCompose => "docker-compose",
            Ecosystem::DotnetSdk => "dotnet-sdk",
            Ecosystem::Elm => "elm",
            Ecosystem::GithubActions => "github-actions",
            Ecosystem::Gitsubmodule => "gitsubmodule",
            Ecosystem::Gomod => "gomod",
            Ecosystem::Gradle => "gradle",
            Ecosystem::Helm => "helm",
            Ecosystem::Maven => "maven",
            Ecosystem::Mix => "mix",
            Ecosystem::Npm => "npm",
            Ecosystem::Nuget => "nuget",
            Ecosystem::Pip => "pip",
            Ecosystem::Pub => "pub",
            Ecosystem::Swift => "swift",
            Ecosystem::Terraform => "terraform",
            Ecosystem::Uv => "uv",
        }
    }

    /// Returns the display name for this ecosystem
    pub fn display_name(&self) -> &'static str {
        match self {
            Ecosystem::Bun => "Bun",
            Ecosystem::Bundler => "Bundler",
            Ecosystem::Cargo => "Cargo",
            Ecosystem::Composer => "Composer",
            Ecosystem::Devcontainers => "Dev Containers",
            Ecosystem::Docker => "Docker",
            Ecosystem::DockerCompose => "Docker Compose",
            Ecosystem::DotnetSdk => ".NET SDK",
            Ecosystem::Elm => "Elm",
            Ecosystem::GithubActions => "GitHub Actions",
            Ecosystem::Gitsubmodule => "Git submodules",
            Ecosystem::Gomod => "Go modules",
            Ecosystem::Gradle => "Gradle",
            Ecosystem::Helm => "Helm",
            Ecosystem::Maven => "Maven",
            Ecosystem::Mix => "Mix",
            Ecosystem::Npm => "npm",
            Ecosystem::Nuget => "NuGet",
            Ecosystem::Pip => "pip",
            Ecosystem::Pub => "pub",
            Ecosystem::Swift => "Swift",
            Ecosystem::Terraform => "Terraform",
            Ecosystem::Uv => "uv",
        }
    }

    /// Returns true if this ecosystem needs `enable-beta-ecosystems: true`
    pub fn is_beta(&self) -> bool {
        matches!(
            self,
            Ecosystem::Bun | Ecosystem::DockerCompose | Ecosystem::DotnetSdk | Ecosystem::Helm
        )
    }

    /// Returns all recognized ecosystems
    pub fn all() -> &'static [Ecosystem] {
        &[
            Ecosystem::Bun,
            Ecosystem::Bundler,
            Ecosystem::Cargo,
            Ecosystem::Composer,
            Ecosystem::Devcontainers,
            Ecosystem::Docker,
            Ecosystem::DockerCompose,
            Ecosystem::DotnetSdk,
            Ecosystem::Elm,
            Ecosystem::GithubActions,
            Ecosystem::Gitsubmodule,
            Ecosystem::Gomod,
            Ecosystem::Gradle,
            Ecosystem::Helm,
            Ecosystem::Maven,
            Ecosystem::Mix,
            Ecosystem::Npm,
            Ecosystem::Nuget,
            Ecosystem::Pip,
            Ecosystem::Pub,
            Ecosystem::Swift,
            Ecosystem::Terraform,
            Ecosystem::Uv,
        ]
    }
}

impl FromStr for Ecosystem {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ecosystem::all()
            .iter()
            .copied()
            .find(|ecosystem| ecosystem.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
