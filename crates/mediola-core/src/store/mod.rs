// ── Snapshot store ──
//
// Holds the last successfully fetched shutter list. Readers load an
// `Arc<Snapshot>` without locking; the coordinator is the only writer.

mod snapshot;

pub use snapshot::{ShutterStore, Snapshot};
