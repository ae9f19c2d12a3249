//! Edge service (`service-a`): validates a CEP and relays the resolver's
//! answer.

pub mod domain;
pub mod inbound;
pub mod outbound;
