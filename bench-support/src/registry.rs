//! Central registry of benchmarked backends.
//!
//! This is the single source of truth for which backends a benchmark body
//! runs against and the names they are reported under. To add a backend,
//! modify this file only.

// ============================================================================
// Backend Registry
// ============================================================================

/// Executes monomorphic code for each backend, given a payload codec.
///
/// # Usage
///
/// ```ignore
/// for_each_backend! {
///     codec = BinaryCodec;
///     with |display_name, B| {
///         let m = driver.measure_set::<B>(iters);
///     }
/// }
/// ```
///
/// Each expanded block defines:
/// - `display_name`: &str - human-readable backend name
/// - `B`: type alias for the backend storing the codec's value type
///
/// Map backends store `Codec::Value` directly; byte caches route it through
/// the codec.
#[macro_export]
macro_rules! for_each_backend {
    (codec = $codec:ty; with |$display_name:ident, $backend:ident| $body:block) => {{
        {
            let $display_name = "HashMap";
            type $backend = ::cachebench::backend::StdMapBackend<
                <$codec as ::cachebench::codec::PayloadCodec>::Value,
            >;
            $body
        }
        $crate::for_each_concurrent_backend! {
            codec = $codec;
            with |$display_name, $backend| $body
        }
    }};
}

/// Like [`for_each_backend!`] but only for backends that are `Sync`.
#[macro_export]
macro_rules! for_each_concurrent_backend {
    (codec = $codec:ty; with |$display_name:ident, $backend:ident| $body:block) => {{
        {
            let $display_name = "RwLock<HashMap>";
            type $backend = ::cachebench::backend::LockedMapBackend<
                <$codec as ::cachebench::codec::PayloadCodec>::Value,
            >;
            $body
        }
        {
            let $display_name = "DashMap";
            type $backend = ::cachebench::backend::DashMapBackend<
                <$codec as ::cachebench::codec::PayloadCodec>::Value,
            >;
            $body
        }
        {
            let $display_name = "quick_cache";
            type $backend = ::cachebench::backend::QuickCacheBackend<$codec>;
            $body
        }
        {
            let $display_name = "moka";
            type $backend = ::cachebench::backend::MokaBackend<$codec>;
            $body
        }
    }};
}
