//! Domain-level features (session, transport, records, view) and their shared
//! logic. The UI imports these modules to keep view code focused while keeping
//! authentication and backend handling in dedicated feature areas.

pub mod records;
pub mod session;
pub mod transport;
pub mod view;
