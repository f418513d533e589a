//! Test-only helpers for mutating process-global state.
//!
//! Environment variables are process-wide, so tests that touch them must
//! also be serialized:
//!
//! ```rust
//! use llamastack_async::test_support::EnvGuard;
//! use serial_test::serial;
//!
//! #[test]
//! #[serial(env)]
//! fn example() {
//!     let _env = EnvGuard::set("LLAMA_STACK_BASE_URL", "http://localhost:9999");
//!     // ... test body ...
//! }
//! ```

/// Scoped override of one environment variable.
///
/// On drop, the variable is restored to whatever it was before the guard was
/// created, including "not set".
pub struct EnvGuard {
    key: String,
    saved: Option<String>,
}

impl EnvGuard {
    /// Sets `key` to `val` until the guard is dropped.
    ///
    /// `std::env::set_var` is unsafe to call concurrently with other env
    /// access; callers must hold the `#[serial(env)]` lock.
    #[must_use]
    pub fn set(key: impl Into<String>, val: &str) -> Self {
        let key = key.into();
        let saved = std::env::var(&key).ok();
        unsafe { std::env::set_var(&key, val) };
        Self { key, saved }
    }

    /// Unsets `key` until the guard is dropped.
    ///
    /// Same concurrency caveat as [`set`](Self::set).
    #[must_use]
    pub fn remove(key: impl Into<String>) -> Self {
        let key = key.into();
        let saved = std::env::var(&key).ok();
        unsafe { std::env::remove_var(&key) };
        Self { key, saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.saved {
            Some(v) => unsafe { std::env::set_var(&self.key, v) },
            None => unsafe { std::env::remove_var(&self.key) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(env)]
    fn restores_to_unset() {
        let key = "STACK_TEST_ENVVAR_A";
        let _clear = EnvGuard::remove(key);
        {
            let _g = EnvGuard::set(key, "123");
            assert_eq!(std::env::var(key).unwrap(), "123");
        }
        assert!(std::env::var(key).is_err());
    }

    #[test]
    #[serial(env)]
    fn restores_shadowed_value() {
        let key = "STACK_TEST_ENVVAR_B";
        let _orig = EnvGuard::set(key, "orig");
        {
            let _g = EnvGuard::set(key, "shadow");
            assert_eq!(std::env::var(key).unwrap(), "shadow");
        }
        assert_eq!(std::env::var(key).unwrap(), "orig");
    }

    #[test]
    #[serial(env)]
    fn remove_then_restore() {
        let key = "STACK_TEST_ENVVAR_C";
        let _orig = EnvGuard::set(key, "value");
        {
            let _g = EnvGuard::remove(key);
            assert!(std::env::var(key).is_err());
        }
        assert_eq!(std::env::var(key).unwrap(), "value");
    }
}
