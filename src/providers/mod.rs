pub mod ai;
pub mod explorer;
pub mod rpc;

pub use ai::AiClient;
pub use explorer::{ExplorerClient, VerifiedSource};
pub use rpc::RpcProvider;
