//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `hyauth_core::defaults`.

use hyauth_core::defaults;

/// Generate default value functions that forward to hyauth_core::defaults constants.
macro_rules! default_fns {
    // For Copy types (integers, bool, etc.)
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_shutdown_timeout_secs  => DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64,
    default_refresh_interval_secs  => DEFAULT_REFRESH_INTERVAL_SECS: u64,
    default_http_timeout_secs      => DEFAULT_HTTP_STORE_TIMEOUT_SECS: u64,
    default_mismatch_delay_ms      => DEFAULT_MISMATCH_DELAY_MS: u64,
}

default_string_fns! {
    default_listen              => DEFAULT_LISTEN,
    default_store_kind          => DEFAULT_STORE_KIND,
    default_users_file          => DEFAULT_USERS_FILE,
    default_expired_date_policy => DEFAULT_EXPIRED_DATE_POLICY,
}
