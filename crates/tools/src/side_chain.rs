use primitive_types::H160;
use serde::{Deserialize, Serialize};

/// Registration lifecycle as tracked by the anchor chain's management
/// contract. `Quit` is a soft delete: the anchor keeps the history but
/// stops accepting relay traffic for the ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideChainState {
    Unregistered,
    Requested,
    Active,
    QuitRequested,
    Quit,
}

/// One registered bridge endpoint. `chain_id` is immutable once the
/// chain is active; the remaining metadata may only change through an
/// update while active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideChain {
    pub chain_id: u64,
    pub router: u64,
    pub name: String,
    pub relay_contract: H160,
    pub state: SideChainState,
}
