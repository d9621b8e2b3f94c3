use bs_core::{AgentId, BsError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] BsError),

    #[error("failed to spawn thread for agent {agent}: {source}")]
    Spawn {
        agent:  AgentId,
        #[source]
        source: std::io::Error,
    },

    #[error("agent {0} panicked")]
    AgentPanicked(AgentId),
}

pub type SimResult<T> = Result<T, SimError>;
