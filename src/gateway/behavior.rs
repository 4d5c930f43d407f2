use crate::gateway::GatewayError;
use crate::net::{Arc, Marking};

/// How a transition consumes from its input places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinRule {
    /// Every incoming arc must be satisfied; all of them are consumed.
    All,
    /// At least one incoming arc must be satisfied; only the first one in
    /// declared order is consumed.
    AnyOne,
}

/// How a transition produces into its output places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitRule {
    All,
    /// Exactly one outgoing arc, chosen by the caller, receives tokens.
    Choose,
}

/// Stateless firing rule: a join rule paired with a split rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GatewayBehavior {
    pub join: JoinRule,
    pub split: SplitRule,
}

impl GatewayBehavior {
    /// Rule for transitions without a gateway annotation.
    pub const PLAIN: Self = Self::new(JoinRule::All, SplitRule::All);
    pub const AND_SPLIT: Self = Self::new(JoinRule::All, SplitRule::All);
    pub const AND_JOIN: Self = Self::new(JoinRule::All, SplitRule::All);
    pub const XOR_SPLIT: Self = Self::new(JoinRule::All, SplitRule::Choose);
    pub const XOR_JOIN: Self = Self::new(JoinRule::AnyOne, SplitRule::All);
    pub const AND_JOIN_SPLIT: Self = Self::new(JoinRule::All, SplitRule::All);
    pub const XOR_JOIN_SPLIT: Self = Self::new(JoinRule::AnyOne, SplitRule::Choose);
    pub const AND_JOIN_XOR_SPLIT: Self = Self::new(JoinRule::All, SplitRule::Choose);
    pub const XOR_JOIN_AND_SPLIT: Self = Self::new(JoinRule::AnyOne, SplitRule::All);

    pub const fn new(join: JoinRule, split: SplitRule) -> Self {
        Self { join, split }
    }

    pub const fn requires_output_selection(&self) -> bool {
        matches!(self.split, SplitRule::Choose)
    }

    /// Only input arcs are consulted; output places never affect enablement.
    pub fn is_enabled(&self, incoming: &[&Arc], marking: &Marking) -> bool {
        match self.join {
            JoinRule::All => incoming.iter().all(|arc| satisfied(arc, marking)),
            JoinRule::AnyOne => incoming.iter().any(|arc| satisfied(arc, marking)),
        }
    }

    /// Computes the marking after firing. `marking` itself is never touched;
    /// on error no successor marking exists.
    pub fn execute_flow(
        &self,
        incoming: &[&Arc],
        outgoing: &[&Arc],
        marking: &Marking,
        selected_output: Option<&str>,
    ) -> Result<Marking, GatewayError> {
        let produce: Vec<&Arc> = match self.split {
            SplitRule::All => outgoing.to_vec(),
            SplitRule::Choose => {
                let selected = selected_output.ok_or(GatewayError::SelectionMissing)?;
                let arc = outgoing
                    .iter()
                    .find(|arc| arc.target == selected)
                    .ok_or_else(|| GatewayError::SelectionNotAnOutput(selected.to_owned()))?;
                vec![*arc]
            }
        };

        let consume: Vec<&Arc> = match self.join {
            JoinRule::All => incoming.to_vec(),
            JoinRule::AnyOne => {
                let arc = incoming
                    .iter()
                    .find(|arc| satisfied(arc, marking))
                    .ok_or(GatewayError::NoEnabledInput)?;
                vec![*arc]
            }
        };

        let mut next = marking.clone();
        for arc in consume {
            let available = next.tokens(&arc.source);
            next.checked_sub(&arc.source, arc.weight)
                .ok_or_else(|| GatewayError::InsufficientTokens {
                    place: arc.source.clone(),
                    required: arc.weight,
                    available,
                })?;
        }
        for arc in produce {
            next.checked_add(&arc.target, arc.weight)
                .ok_or_else(|| GatewayError::Overflow(arc.target.clone()))?;
        }
        Ok(next)
    }
}

fn satisfied(arc: &Arc, marking: &Marking) -> bool {
    marking.tokens(&arc.source) >= arc.weight
}
