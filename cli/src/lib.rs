// rpc-probe library

// Enforce panic-free code in production
#![cfg_attr(not(test), warn(clippy::unwrap_used))]
#![cfg_attr(not(test), warn(clippy::expect_used))]
#![cfg_attr(not(test), warn(clippy::panic))]
// Test-specific allows
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod commands;
pub mod config;
pub mod probes;
pub mod report;
pub mod rpc;

pub use probes::{default_plan, ParamsMode, ProbePlan, ProbeSpec};
pub use rpc::{invoke, RpcClient, RpcOutcome, RpcRequest};
