//! # 令牌游戏使用的网模型
//!
//! 网由库所（place）、迁移（transition）与带权有向弧组成，节点 id 在整个图内唯一。
//! 对标识 `M` 与普通迁移 `t`：
//!
//! * `t` **可激发** 当且仅当对每条输入弧 `(p, t)` 有 `M[p] ≥ w(p, t)`；
//! * 发射后 `M'[p] = M[p] - w(p, t)`（输入弧）再 `M'[p] += w(t, p)`（输出弧）。
//!
//! 带网关类型的迁移按 [`crate::gateway`] 中的汇合/分支规则计算。
//!
//! ## 示例
//!
//! ```rust
//! use pn_token_game::net::Graph;
//!
//! let graph = Graph::builder()
//!     .place("p0", 1)
//!     .place("p1", 0)
//!     .transition("t0")
//!     .arc("p0", "t0")
//!     .arc("t0", "p1")
//!     .build();
//!
//! let marking = graph.initial_marking();
//! assert_eq!(marking.tokens("p0"), 1);
//! assert_eq!(graph.outgoing("t0")[0].target, "p1");
//! ```

pub mod ids;
pub mod incidence;
pub mod index_vec;
pub mod io;
pub mod marking;
pub mod structure;

pub use ids::{ArcId, NodeId};
pub use incidence::Incidence;
pub use index_vec::{Idx, IndexVec};
pub use marking::Marking;
pub use structure::{Arc, Graph, GraphBuilder, Node, Place, Transition, Weight};
