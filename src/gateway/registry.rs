//! 网关类型到激发规则的固定映射表，进程内只构建一次。
use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::gateway::{GatewayBehavior, GatewayError, GatewayKind};

static STANDARD: Lazy<GatewayRegistry> = Lazy::new(GatewayRegistry::standard);

#[derive(Debug, Clone)]
pub struct GatewayRegistry {
    behaviors: IndexMap<GatewayKind, GatewayBehavior>,
}

impl GatewayRegistry {
    /// The shared table used by every token game.
    pub fn global() -> &'static GatewayRegistry {
        &STANDARD
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (GatewayKind, GatewayBehavior)>,
    {
        Self {
            behaviors: entries.into_iter().collect(),
        }
    }

    fn standard() -> Self {
        Self::from_entries([
            (GatewayKind::AndSplit, GatewayBehavior::AND_SPLIT),
            (GatewayKind::AndJoin, GatewayBehavior::AND_JOIN),
            (GatewayKind::XorSplit, GatewayBehavior::XOR_SPLIT),
            (GatewayKind::XorJoin, GatewayBehavior::XOR_JOIN),
            (GatewayKind::AndJoinSplit, GatewayBehavior::AND_JOIN_SPLIT),
            (GatewayKind::XorJoinSplit, GatewayBehavior::XOR_JOIN_SPLIT),
            (GatewayKind::AndJoinXorSplit, GatewayBehavior::AND_JOIN_XOR_SPLIT),
            (GatewayKind::XorJoinAndSplit, GatewayBehavior::XOR_JOIN_AND_SPLIT),
            // UNKNOWN operators fire like an AND-split.
            (GatewayKind::Unknown, GatewayBehavior::AND_SPLIT),
        ])
    }

    pub fn get(&self, kind: GatewayKind) -> Result<&GatewayBehavior, GatewayError> {
        self.behaviors
            .get(&kind)
            .ok_or(GatewayError::Unregistered(kind))
    }

    /// Behavior for a transition's optional gateway tag; untagged
    /// transitions get [`GatewayBehavior::PLAIN`].
    pub fn resolve(&self, kind: Option<GatewayKind>) -> Result<&GatewayBehavior, GatewayError> {
        match kind {
            Some(kind) => self.get(kind),
            None => Ok(&GatewayBehavior::PLAIN),
        }
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}
