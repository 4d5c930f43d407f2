//! # 网关迁移的激发语义
//!
//! 每种网关由一条汇合规则（消耗输入）与一条分支规则（产生输出）组合而成：
//!
//! | 类型                | 汇合   | 分支     | 需选择输出 |
//! |---------------------|--------|----------|------------|
//! | AND-split           | 全部   | 全部     | 否         |
//! | AND-join            | 全部   | 全部     | 否         |
//! | XOR-split           | 全部   | 选定一条 | 是         |
//! | XOR-join            | 任一   | 全部     | 否         |
//! | AND-join-split      | 全部   | 全部     | 否         |
//! | XOR-join-split      | 任一   | 选定一条 | 是         |
//! | AND-join-XOR-split  | 全部   | 选定一条 | 是         |
//! | XOR-join-AND-split  | 任一   | 全部     | 否         |
//! | UNKNOWN             | 按 AND-split 处理              |
//!
//! "任一" 汇合总是消耗按声明顺序第一条满足权重的输入弧。
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::net::Weight;

mod behavior;
pub mod registry;

pub use behavior::{GatewayBehavior, JoinRule, SplitRule};
pub use registry::GatewayRegistry;

/// Workflow operator attached to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum GatewayKind {
    AndSplit,
    AndJoin,
    XorSplit,
    XorJoin,
    AndJoinSplit,
    XorJoinSplit,
    AndJoinXorSplit,
    XorJoinAndSplit,
    /// Explicit fallback for operators without a dedicated rule.
    Unknown,
}

impl GatewayKind {
    pub const ALL: [GatewayKind; 9] = [
        GatewayKind::AndSplit,
        GatewayKind::AndJoin,
        GatewayKind::XorSplit,
        GatewayKind::XorJoin,
        GatewayKind::AndJoinSplit,
        GatewayKind::XorJoinSplit,
        GatewayKind::AndJoinXorSplit,
        GatewayKind::XorJoinAndSplit,
        GatewayKind::Unknown,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            GatewayKind::AndSplit => "AND-split",
            GatewayKind::AndJoin => "AND-join",
            GatewayKind::XorSplit => "XOR-split",
            GatewayKind::XorJoin => "XOR-join",
            GatewayKind::AndJoinSplit => "AND-join-split",
            GatewayKind::XorJoinSplit => "XOR-join-split",
            GatewayKind::AndJoinXorSplit => "AND-join-XOR-split",
            GatewayKind::XorJoinAndSplit => "XOR-join-AND-split",
            GatewayKind::Unknown => "UNKNOWN",
        }
    }

    /// WoPeD operator type code used in PNML tool-specific sections.
    pub const fn operator_code(self) -> &'static str {
        match self {
            GatewayKind::AndSplit => "101",
            GatewayKind::AndJoin => "102",
            GatewayKind::XorSplit => "104",
            GatewayKind::XorJoin => "105",
            GatewayKind::XorJoinSplit => "106",
            GatewayKind::AndJoinSplit => "107",
            GatewayKind::AndJoinXorSplit => "108",
            GatewayKind::XorJoinAndSplit => "109",
            GatewayKind::Unknown => "0",
        }
    }

    pub fn from_operator_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.operator_code() == code)
    }
}

impl fmt::Display for GatewayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown gateway kind or operator code: {0:?}")]
pub struct ParseGatewayKindError(pub String);

impl FromStr for GatewayKind {
    type Err = ParseGatewayKindError;

    /// Accepts either the canonical name (`"XOR-split"`, case-insensitive)
    /// or the numeric operator code (`"104"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::from_operator_code(s)
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| ParseGatewayKindError(s.to_owned()))
    }
}

impl TryFrom<String> for GatewayKind {
    type Error = ParseGatewayKindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GatewayKind> for &'static str {
    fn from(kind: GatewayKind) -> Self {
        kind.as_str()
    }
}

/// Precondition violations raised while computing a firing.
///
/// None of these can happen when the caller checked enablement and supplied
/// a valid output; they signal a bug in the calling code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("output selection is required but none was given")]
    SelectionMissing,
    #[error("selected output {0:?} is not the target of any outgoing arc")]
    SelectionNotAnOutput(String),
    #[error("no incoming arc is satisfied under the current marking")]
    NoEnabledInput,
    #[error("place {place:?} holds {available} tokens, arc needs {required}")]
    InsufficientTokens {
        place: String,
        required: Weight,
        available: Weight,
    },
    #[error("token count overflow on place {0:?}")]
    Overflow(String),
    #[error("no behavior registered for gateway kind {0}")]
    Unregistered(GatewayKind),
}
