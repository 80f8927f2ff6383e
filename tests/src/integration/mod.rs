//! Integration flows across bc-01 and bc-02.

pub mod gateway_flows;
pub mod voting_flows;
