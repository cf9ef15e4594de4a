// ─── Artifact Resolver Core ───
// Version discovery and verified downloads for Minecraft server builds.
//
// Architecture:
//   core/
//     error/     — Central error taxonomy
//     config/    — On-disk resolver configuration
//     http/      — GET primitive (text or streamed bytes)
//     integrity/ — File size + streaming SHA-1
//     flavor/    — Build flavor tag and artifact naming
//     version/   — Mojang manifest models
//     catalog/   — Vanilla, Forge, Fabric, Bedrock catalogs + factory
//     fetcher/   — Scratch download, verification, atomic publish
//     selector/  — latest / all / exact selection and bulk policy

pub mod catalog;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod flavor;
pub mod http;
pub mod integrity;
pub mod selector;
pub mod version;

#[cfg(test)]
pub(crate) mod testing;
