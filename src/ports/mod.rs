//! Port traits: the seams between the domain and the outside world.

pub mod bond_source_port;
pub mod config_port;
pub mod explain_port;
pub mod random_port;
pub mod report_port;
