//! 令牌游戏：持有当前标识，提供可激发查询与两步式发射协议。
use serde::Serialize;
use thiserror::Error;

use crate::gateway::{GatewayBehavior, GatewayError, GatewayRegistry};
use crate::net::{Graph, Marking, Transition};

#[derive(Debug, Error)]
pub enum FireError {
    #[error("transition {transition:?} violated a firing precondition: {source}")]
    Precondition {
        transition: String,
        source: GatewayError,
    },
}

/// Why a fire request was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFiredReason {
    UnknownTransition,
    Disabled,
    SelectionRequired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireOutcome {
    Fired(Marking),
    NotFired(NotFiredReason),
}

impl FireOutcome {
    pub fn is_fired(&self) -> bool {
        matches!(self, FireOutcome::Fired(_))
    }

    pub fn marking(&self) -> Option<&Marking> {
        match self {
            FireOutcome::Fired(marking) => Some(marking),
            FireOutcome::NotFired(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputOption {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransitionOptions {
    pub requires_selection: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_outputs: Option<Vec<OutputOption>>,
}

impl TransitionOptions {
    pub fn none() -> Self {
        Self::default()
    }
}

pub struct TokenGame {
    graph: Graph,
    marking: Marking,
    registry: &'static GatewayRegistry,
}

impl TokenGame {
    pub fn new(graph: Graph) -> Self {
        Self::with_registry(graph, GatewayRegistry::global())
    }

    pub fn with_registry(graph: Graph, registry: &'static GatewayRegistry) -> Self {
        let marking = graph.initial_marking();
        log::debug!("token game initialised: {}", marking);
        Self {
            graph,
            marking,
            registry,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn is_transition_enabled(&self, transition: &Transition) -> bool {
        match self.registry.resolve(transition.gateway) {
            Ok(behavior) => {
                behavior.is_enabled(&self.graph.incoming(&transition.id), &self.marking)
            }
            Err(err) => {
                log::error!("transition {:?}: {}", transition.id, err);
                false
            }
        }
    }

    /// Same as [`Self::is_transition_enabled`], by id. Unknown ids are disabled.
    pub fn is_enabled(&self, transition_id: &str) -> bool {
        self.graph
            .transition(transition_id)
            .is_some_and(|transition| self.is_transition_enabled(transition))
    }

    /// Enabled transition ids in node declaration order.
    pub fn enabled_transitions(&self) -> Vec<String> {
        self.graph
            .transitions()
            .filter(|transition| self.is_transition_enabled(transition))
            .map(|transition| transition.id.clone())
            .collect()
    }

    pub fn transition_options(&self, transition_id: &str) -> TransitionOptions {
        let Some(transition) = self.graph.transition(transition_id) else {
            return TransitionOptions::none();
        };
        if !self.is_transition_enabled(transition) {
            return TransitionOptions::none();
        }
        let needs_selection = self
            .registry
            .resolve(transition.gateway)
            .is_ok_and(GatewayBehavior::requires_output_selection);
        if !needs_selection {
            return TransitionOptions::none();
        }

        let outputs = self
            .graph
            .outgoing(transition_id)
            .into_iter()
            .map(|arc| OutputOption {
                id: arc.target.clone(),
                label: self.graph.label_of(&arc.target).to_owned(),
            })
            .collect();
        TransitionOptions {
            requires_selection: true,
            available_outputs: Some(outputs),
        }
    }

    /// Fires `transition_id`.
    ///
    /// Unknown or disabled transitions, and selecting transitions called
    /// without `selected_output`, return [`FireOutcome::NotFired`] and leave
    /// the marking alone. An empty `selected_output` counts as no selection. A selection that names no output place is an
    /// error, as is any other broken firing precondition.
    pub fn fire_transition(
        &mut self,
        transition_id: &str,
        selected_output: Option<&str>,
    ) -> Result<FireOutcome, FireError> {
        let registry = self.registry;
        let selected_output = selected_output.filter(|output| !output.is_empty());
        let Some(transition) = self.graph.transition(transition_id) else {
            log::debug!("fire {:?}: no such transition", transition_id);
            return Ok(FireOutcome::NotFired(NotFiredReason::UnknownTransition));
        };
        let behavior = registry
            .resolve(transition.gateway)
            .map_err(|source| FireError::Precondition {
                transition: transition_id.to_owned(),
                source,
            })?;

        let incoming = self.graph.incoming(transition_id);
        if !behavior.is_enabled(&incoming, &self.marking) {
            log::debug!("fire {:?}: not enabled", transition_id);
            return Ok(FireOutcome::NotFired(NotFiredReason::Disabled));
        }
        if behavior.requires_output_selection() && selected_output.is_none() {
            log::debug!("fire {:?}: waiting for output selection", transition_id);
            return Ok(FireOutcome::NotFired(NotFiredReason::SelectionRequired));
        }

        let outgoing = self.graph.outgoing(transition_id);
        let next = behavior
            .execute_flow(&incoming, &outgoing, &self.marking, selected_output)
            .map_err(|source| FireError::Precondition {
                transition: transition_id.to_owned(),
                source,
            })?;

        self.marking = next;
        log::debug!("fired {:?}: {}", transition_id, self.marking);
        Ok(FireOutcome::Fired(self.marking.clone()))
    }

    /// Restores every place to its declared token count.
    pub fn reset(&mut self) {
        self.marking = self.graph.initial_marking();
        log::debug!("token game reset: {}", self.marking);
    }

    pub fn current_marking(&self) -> Marking {
        self.marking.clone()
    }
}
