//! Panel-driven virtual pet care: a per-frame core that slides UI panes,
//! schedules tips and runs a daily points economy, plus a terminal host.

pub mod app;
pub mod config;
pub mod driver;
pub mod floating;
pub mod infobox;
mod input;
pub mod ledger;
pub mod model;
pub mod panes;
mod render;
