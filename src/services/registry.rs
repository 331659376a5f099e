// ABOUTME: Process-wide registry of services with a flattened tool and prompt namespace
// ABOUTME: Copy-on-write resolution table so readers never see a partially registered service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Service Registry
//!
//! Owns the set of registered services and flattens their declarations into
//! one addressable namespace.
//!
//! ## Naming
//!
//! Every tool and prompt is reachable by its qualified name `service.tool`.
//! It is additionally exposed under one caller-visible name, decided at
//! registration by the [`CollisionPolicy`]:
//!
//! - `Reject`: the exposed name is the bare declared name; a service whose
//!   bare names collide with already exposed ones is rejected with
//!   `AmbiguousTool` and the registry is left unchanged.
//! - `Namespace`: non-colliding names are exposed bare, colliding ones under
//!   their qualified name. Exposed names never change after registration.
//!
//! ## Concurrency
//!
//! The resolution table is immutable and shared behind an `Arc`. Mutations
//! build a new table under the write lock and swap it in whole; readers
//! clone the `Arc` and release the lock before doing anything else, so a
//! running handler never holds the lock.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::constants::QUALIFIED_NAME_SEPARATOR;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::tools::{Handler, Prompt, Tool};

use super::Service;

/// How the registry treats a bare tool or prompt name declared by more than one service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Refuse the later registration with `AmbiguousTool`
    #[default]
    Reject,
    /// Expose the later registration's colliding names as `service.name`
    Namespace,
}

impl FromStr for CollisionPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "namespace" => Ok(Self::Namespace),
            other => Err(AppError::config(format!(
                "Invalid collision policy '{other}' (expected 'reject' or 'namespace')"
            ))),
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Namespace => write!(f, "namespace"),
        }
    }
}

/// Build the qualified `service.name` form
#[must_use]
pub fn qualified_name(service: &str, name: &str) -> String {
    format!("{service}{QUALIFIED_NAME_SEPARATOR}{name}")
}

struct ExposedTool {
    exposed_name: String,
    tool: Arc<Tool>,
    handler: Handler,
}

struct ExposedPrompt {
    exposed_name: String,
    prompt: Arc<Prompt>,
}

struct ServiceEntry {
    name: String,
    description: String,
    tools: Vec<ExposedTool>,
    prompts: Vec<ExposedPrompt>,
}

/// (entry, position of the declaration within the entry)
type Slot = (Arc<ServiceEntry>, usize);

/// Immutable snapshot of everything registered
#[derive(Default)]
struct RegistryTable {
    services: Vec<Arc<ServiceEntry>>,
    tools: HashMap<String, Vec<Slot>>,
    prompts: HashMap<String, Vec<Slot>>,
}

impl RegistryTable {
    fn from_services(services: Vec<Arc<ServiceEntry>>) -> Self {
        let mut tools: HashMap<String, Vec<Slot>> = HashMap::new();
        let mut prompts: HashMap<String, Vec<Slot>> = HashMap::new();

        for entry in &services {
            for (index, exposed) in entry.tools.iter().enumerate() {
                for name in lookup_names(&entry.name, &exposed.tool.name, &exposed.exposed_name) {
                    tools.entry(name).or_default().push((Arc::clone(entry), index));
                }
            }
            for (index, exposed) in entry.prompts.iter().enumerate() {
                for name in
                    lookup_names(&entry.name, &exposed.prompt.name, &exposed.exposed_name)
                {
                    prompts.entry(name).or_default().push((Arc::clone(entry), index));
                }
            }
        }

        Self {
            services,
            tools,
            prompts,
        }
    }

    fn find_service(&self, name: &str) -> Option<usize> {
        self.services.iter().position(|entry| entry.name == name)
    }

    fn tool_exposed(&self, name: &str) -> bool {
        self.services
            .iter()
            .any(|entry| entry.tools.iter().any(|t| t.exposed_name == name))
    }

    fn prompt_exposed(&self, name: &str) -> bool {
        self.services
            .iter()
            .any(|entry| entry.prompts.iter().any(|p| p.exposed_name == name))
    }
}

/// Exposed name plus qualified name, deduplicated
fn lookup_names(service: &str, declared: &str, exposed: &str) -> Vec<String> {
    let qualified = qualified_name(service, declared);
    if qualified == exposed {
        vec![qualified]
    } else {
        vec![exposed.to_owned(), qualified]
    }
}

/// A tool resolved to its owning service and handler
#[derive(Clone)]
pub struct ResolvedTool {
    /// Owning service
    pub service: String,
    /// Declared tool descriptor
    pub tool: Arc<Tool>,
    /// Handler reference
    pub handler: Handler,
}

impl fmt::Debug for ResolvedTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedTool")
            .field("service", &self.service)
            .field("tool", &self.tool.name)
            .finish_non_exhaustive()
    }
}

/// A prompt resolved to its owning service
#[derive(Debug, Clone)]
pub struct ResolvedPrompt {
    /// Owning service
    pub service: String,
    /// Declared prompt descriptor
    pub prompt: Arc<Prompt>,
}

/// One entry of the tool discovery listing
#[derive(Debug, Clone)]
pub struct ListedTool {
    /// Caller-visible name
    pub name: String,
    /// Owning service
    pub service: String,
    /// Declared tool descriptor
    pub tool: Arc<Tool>,
}

/// One entry of the prompt discovery listing
#[derive(Debug, Clone)]
pub struct ListedPrompt {
    /// Caller-visible name
    pub name: String,
    /// Owning service
    pub service: String,
    /// Declared prompt descriptor
    pub prompt: Arc<Prompt>,
}

/// Registered service overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    /// Service name
    pub name: String,
    /// Service description
    pub description: String,
    /// Caller-visible tool names
    pub tools: Vec<String>,
    /// Caller-visible prompt names
    pub prompts: Vec<String>,
}

/// Process-wide table mapping tool and prompt names to their owning service
///
/// Constructed explicitly and shared by `Arc`; there is no global instance.
pub struct ServiceRegistry {
    policy: CollisionPolicy,
    table: RwLock<Arc<RegistryTable>>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new(CollisionPolicy::default())
    }
}

impl ServiceRegistry {
    /// Create an empty registry with the given collision policy
    #[must_use]
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            table: RwLock::new(Arc::new(RegistryTable::default())),
        }
    }

    /// Collision policy configured at construction
    #[must_use]
    pub const fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    async fn snapshot(&self) -> Arc<RegistryTable> {
        Arc::clone(&*self.table.read().await)
    }

    /// Register every service in order
    ///
    /// Stops at the first failure; services registered before it stay registered.
    ///
    /// # Errors
    ///
    /// Returns the first registration error
    pub async fn initialize(&self, services: Vec<Service>) -> AppResult<()> {
        let count = services.len();
        for service in services {
            self.register(service).await?;
        }
        info!(services = count, policy = %self.policy, "Service registry initialized");
        Ok(())
    }

    /// Register a service
    ///
    /// # Errors
    ///
    /// - `InvalidService` if the service is internally inconsistent
    /// - `DuplicateServiceName` if a service with that name exists
    /// - `AmbiguousTool` under the `Reject` policy when a bare tool or prompt
    ///   name is already exposed by another service
    pub async fn register(&self, service: Service) -> AppResult<()> {
        let problems = service.problems();
        if !problems.is_empty() {
            warn!(service = %service.name(), ?problems, "Rejected invalid service");
            return Err(AppError::new(
                ErrorCode::InvalidService,
                format!("Service '{}' is invalid: {}", service.name(), problems.join("; ")),
            )
            .with_details(json!({ "service": service.name(), "problems": problems })));
        }

        let mut guard = self.table.write().await;
        let current = Arc::clone(&*guard);

        if current.find_service(service.name()).is_some() {
            warn!(service = %service.name(), "Rejected duplicate service name");
            return Err(AppError::new(
                ErrorCode::DuplicateServiceName,
                format!("Service '{}' is already registered", service.name()),
            )
            .with_details(json!({ "service": service.name() })));
        }

        let entry = self.build_entry(&current, &service)?;
        let tool_count = entry.tools.len();
        let prompt_count = entry.prompts.len();

        let mut services = current.services.clone();
        services.push(Arc::new(entry));
        *guard = Arc::new(RegistryTable::from_services(services));
        drop(guard);

        info!(
            service = %service.name(),
            tools = tool_count,
            prompts = prompt_count,
            "Registered service"
        );
        Ok(())
    }

    fn build_entry(&self, current: &RegistryTable, service: &Service) -> AppResult<ServiceEntry> {
        let colliding_tools: Vec<&str> = service
            .tools()
            .iter()
            .filter(|t| current.tool_exposed(&t.name))
            .map(|t| t.name.as_str())
            .collect();
        let colliding_prompts: Vec<&str> = service
            .prompts()
            .iter()
            .filter(|p| current.prompt_exposed(&p.name))
            .map(|p| p.name.as_str())
            .collect();

        if self.policy == CollisionPolicy::Reject
            && !(colliding_tools.is_empty() && colliding_prompts.is_empty())
        {
            warn!(
                service = %service.name(),
                tools = ?colliding_tools,
                prompts = ?colliding_prompts,
                "Rejected service with colliding names"
            );
            return Err(AppError::new(
                ErrorCode::AmbiguousTool,
                format!(
                    "Service '{}' declares names already exposed by other services: {}",
                    service.name(),
                    colliding_tools
                        .iter()
                        .chain(colliding_prompts.iter())
                        .copied()
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )
            .with_details(json!({
                "service": service.name(),
                "tools": colliding_tools,
                "prompts": colliding_prompts,
            })));
        }

        let colliding_tools: HashSet<&str> = colliding_tools.into_iter().collect();
        let colliding_prompts: HashSet<&str> = colliding_prompts.into_iter().collect();
        let expose = |name: &str, collides: bool| {
            if collides {
                qualified_name(service.name(), name)
            } else {
                name.to_owned()
            }
        };

        let mut tools = Vec::with_capacity(service.tools().len());
        for tool in service.tools() {
            let handler = service.handler(&tool.name).ok_or_else(|| {
                AppError::new(
                    ErrorCode::InvalidService,
                    format!("Tool '{}' has no handler", tool.name),
                )
            })?;
            let exposed_name = expose(&tool.name, colliding_tools.contains(tool.name.as_str()));
            debug!(
                service = %service.name(),
                tool = %exposed_name,
                hints = %tool.hints.describe(),
                "Exposing tool"
            );
            tools.push(ExposedTool {
                exposed_name,
                tool: Arc::new(tool.clone()),
                handler: Arc::clone(handler),
            });
        }

        let prompts = service
            .prompts()
            .iter()
            .map(|prompt| ExposedPrompt {
                exposed_name: expose(
                    &prompt.name,
                    colliding_prompts.contains(prompt.name.as_str()),
                ),
                prompt: Arc::new(prompt.clone()),
            })
            .collect();

        Ok(ServiceEntry {
            name: service.name().to_owned(),
            description: service.description().to_owned(),
            tools,
            prompts,
        })
    }

    /// Remove a service and all of its tool and prompt entries
    ///
    /// # Errors
    ///
    /// Returns `ServiceNotFound` if no service has that name
    pub async fn unregister(&self, name: &str) -> AppResult<()> {
        let mut guard = self.table.write().await;
        let Some(position) = guard.find_service(name) else {
            return Err(AppError::new(
                ErrorCode::ServiceNotFound,
                format!("Service '{name}' is not registered"),
            )
            .with_details(json!({ "service": name })));
        };

        let mut services = guard.services.clone();
        services.remove(position);
        *guard = Arc::new(RegistryTable::from_services(services));
        drop(guard);

        info!(service = %name, "Unregistered service");
        Ok(())
    }

    /// Unregister every service in reverse registration order
    ///
    /// Returns the number of services removed.
    pub async fn teardown(&self) -> usize {
        let names: Vec<String> = self
            .snapshot()
            .await
            .services
            .iter()
            .rev()
            .map(|entry| entry.name.clone())
            .collect();

        let mut removed = 0;
        for name in names {
            match self.unregister(&name).await {
                Ok(()) => removed += 1,
                // A concurrent unregister got there first
                Err(e) => debug!(service = %name, error = %e, "Skipped during teardown"),
            }
        }
        info!(services = removed, "Service registry torn down");
        removed
    }

    /// Every registered tool, by service registration order then declaration order
    pub async fn list_tools(&self) -> Vec<ListedTool> {
        let table = self.snapshot().await;
        table
            .services
            .iter()
            .flat_map(|entry| {
                entry.tools.iter().map(|exposed| ListedTool {
                    name: exposed.exposed_name.clone(),
                    service: entry.name.clone(),
                    tool: Arc::clone(&exposed.tool),
                })
            })
            .collect()
    }

    /// Every registered prompt, by service registration order then declaration order
    pub async fn list_prompts(&self) -> Vec<ListedPrompt> {
        let table = self.snapshot().await;
        table
            .services
            .iter()
            .flat_map(|entry| {
                entry.prompts.iter().map(|exposed| ListedPrompt {
                    name: exposed.exposed_name.clone(),
                    service: entry.name.clone(),
                    prompt: Arc::clone(&exposed.prompt),
                })
            })
            .collect()
    }

    /// Resolve a caller-visible or qualified tool name to its handler
    ///
    /// # Errors
    ///
    /// - `MethodNotFound` if no service exposes the name
    /// - `AmbiguousTool` if more than one service matches
    pub async fn resolve(&self, name: &str) -> AppResult<ResolvedTool> {
        let table = self.snapshot().await;
        let (entry, index) = unique_slot(table.tools.get(name), name, "tool")?;
        let exposed = &entry.tools[*index];
        Ok(ResolvedTool {
            service: entry.name.clone(),
            tool: Arc::clone(&exposed.tool),
            handler: Arc::clone(&exposed.handler),
        })
    }

    /// Resolve a caller-visible or qualified prompt name
    ///
    /// # Errors
    ///
    /// - `MethodNotFound` if no service exposes the name
    /// - `AmbiguousTool` if more than one service matches
    pub async fn resolve_prompt(&self, name: &str) -> AppResult<ResolvedPrompt> {
        let table = self.snapshot().await;
        let (entry, index) = unique_slot(table.prompts.get(name), name, "prompt")?;
        Ok(ResolvedPrompt {
            service: entry.name.clone(),
            prompt: Arc::clone(&entry.prompts[*index].prompt),
        })
    }

    /// Overview of every registered service, in registration order
    pub async fn services(&self) -> Vec<ServiceSummary> {
        self.snapshot()
            .await
            .services
            .iter()
            .map(|entry| ServiceSummary {
                name: entry.name.clone(),
                description: entry.description.clone(),
                tools: entry.tools.iter().map(|t| t.exposed_name.clone()).collect(),
                prompts: entry.prompts.iter().map(|p| p.exposed_name.clone()).collect(),
            })
            .collect()
    }

    /// Number of registered services
    pub async fn service_count(&self) -> usize {
        self.snapshot().await.services.len()
    }

    /// Whether a service with this name is registered
    pub async fn contains(&self, name: &str) -> bool {
        self.snapshot().await.find_service(name).is_some()
    }
}

fn unique_slot<'a>(slots: Option<&'a Vec<Slot>>, name: &str, what: &str) -> AppResult<&'a Slot> {
    match slots.map(Vec::as_slice) {
        None | Some([]) => Err(AppError::new(
            ErrorCode::MethodNotFound,
            format!("Unknown {what}: {name}"),
        )
        .with_details(json!({ "name": name }))),
        Some([slot]) => Ok(slot),
        Some(many) => {
            let services: Vec<&str> = many.iter().map(|(entry, _)| entry.name.as_str()).collect();
            Err(AppError::new(
                ErrorCode::AmbiguousTool,
                format!("{what} '{name}' is declared by several services: {}", services.join(", ")),
            )
            .with_details(json!({ "name": name, "services": services })))
        }
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
