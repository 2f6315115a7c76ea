//! In-process template registry and readiness queries.
//!
//! # Responsibility
//! - Keep finalized templates in registration order.
//! - Answer "which templates fire at this instant" and batch previews.
//!
//! # Invariants
//! - Registration order is preserved by every query.
//! - Duplicates are allowed; each registration gets its own `TemplateId`.
//! - The list is append-only; callers synchronize concurrent `define` calls.

use crate::model::instance::TaskInstance;
use crate::template::builder::{TaskTemplate, TemplateError};
use crate::template::resolved::ResolvedTemplate;
use crate::time::Instant;
use log::{debug, trace};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable handle for one registration.
pub type TemplateId = Uuid;

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Template registration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    InvalidTemplate(TemplateError),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTemplate(err) => write!(f, "template rejected: {err}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTemplate(err) => Some(err),
        }
    }
}

impl From<TemplateError> for RegistryError {
    fn from(value: TemplateError) -> Self {
        Self::InvalidTemplate(value)
    }
}

/// Registered template snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredTemplate {
    pub id: TemplateId,
    pub template: ResolvedTemplate,
}

/// Ordered collection of resolved templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    entries: Vec<RegisteredTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalizes `template` and appends it.
    pub fn define(&mut self, template: &TaskTemplate) -> RegistryResult<TemplateId> {
        let resolved = template.finalize()?;
        Ok(self.register(resolved))
    }

    /// Invokes `factory` with a fresh empty template, then finalizes and
    /// appends its result.
    pub fn define_with<F>(&mut self, factory: F) -> RegistryResult<TemplateId>
    where
        F: FnOnce(TaskTemplate) -> TaskTemplate,
    {
        let template = factory(TaskTemplate::new());
        self.define(&template)
    }

    /// Appends an already finalized template.
    pub fn register(&mut self, template: ResolvedTemplate) -> TemplateId {
        let id = Uuid::new_v4();
        debug!(
            "event=registry_define module=registry status=ok id={} name={} position={}",
            id,
            template.name(),
            self.entries.len()
        );
        self.entries.push(RegisteredTemplate { id, template });
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns one registration by id.
    pub fn get(&self, id: TemplateId) -> Option<&ResolvedTemplate> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.template)
    }

    /// Iterates registrations in order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredTemplate> {
        self.entries.iter()
    }

    /// Templates for which `instant` is a create boundary, in registration order.
    pub fn ready_to_create_at(&self, instant: Instant) -> Vec<&ResolvedTemplate> {
        let ready: Vec<&ResolvedTemplate> = self
            .templates()
            .filter(|template| template.should_be_created_at(instant))
            .collect();
        trace!(
            "event=registry_ready_scan module=registry status=ok registered={} ready={}",
            self.entries.len(),
            ready.len()
        );
        ready
    }

    /// Templates for which `instant` is a due boundary, in registration order.
    pub fn due_at(&self, instant: Instant) -> Vec<&ResolvedTemplate> {
        self.templates()
            .filter(|template| template.should_be_due_at(instant))
            .collect()
    }

    /// Strict instances for every template ready at `instant`.
    pub fn instances_at(&self, instant: Instant) -> Vec<TaskInstance> {
        self.ready_to_create_at(instant)
            .into_iter()
            .map(|template| template.current_instance(instant))
            .collect()
    }

    /// Preview instance for every registered template, one per registration.
    pub fn next_instances_at(&self, instant: Instant) -> Vec<TaskInstance> {
        self.templates()
            .map(|template| template.next_instance(instant))
            .collect()
    }

    fn templates(&self) -> impl Iterator<Item = &ResolvedTemplate> {
        self.entries.iter().map(|entry| &entry.template)
    }
}
