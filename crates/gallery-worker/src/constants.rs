pub const SERVICE_NAME: &str = "gallery-worker";

/// Used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "gallery_worker=debug,gallery_services=debug,gallery_storage=debug,gallery_db=debug,gallery_infra=debug,tower_http=debug";
