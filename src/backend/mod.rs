//! Backend adapters: one uniform contract over five engines.
//!
//! | Selector     | Engine                              | Concurrent | Stores |
//! |--------------|-------------------------------------|------------|--------|
//! | `stdmap`     | `HashMap`                           | no         | `V`    |
//! | `lockedmap`  | `RwLock<HashMap>`                   | yes        | `V`    |
//! | `dashmap`    | `DashMap`                           | yes        | `V`    |
//! | `quickcache` | `quick_cache::sync::Cache`          | yes        | bytes  |
//! | `moka`       | `moka::sync::Cache` with a TTL      | yes        | bytes  |
//!
//! The byte-oriented adapters are generic over a
//! [`PayloadCodec`](crate::codec::PayloadCodec) and implement
//! `Backend<C::Value>`; the map adapters are generic over the value type.

pub mod dash_map;
pub mod locked_map;
pub mod quick;
pub mod std_map;
pub mod traits;
pub mod windowed;

pub use dash_map::DashMapBackend;
pub use locked_map::LockedMapBackend;
pub use quick::QuickCacheBackend;
pub use std_map::StdMapBackend;
pub use traits::{Backend, BackendKind, CapacityHints};
pub use windowed::MokaBackend;
